//! uid → component registry for one system, with an index of which uids
//! handle which events.

use std::collections::HashMap;

use crate::component::ComponentId;

#[derive(Debug, Clone, Default)]
pub struct Registry {
    components: HashMap<String, ComponentId>,
    /// event name → uids with a handler, in registration order.
    handlers: HashMap<String, Vec<String>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `component` under `uid` with the events it handles.
    ///
    /// Registering the same component again refreshes its event index. A
    /// different component under a taken uid is rejected with the id of the
    /// one already there.
    pub fn register<'a>(
        &mut self,
        uid: &str,
        component: ComponentId,
        events: impl IntoIterator<Item = &'a String>,
    ) -> Result<(), ComponentId> {
        match self.components.get(uid) {
            Some(&existing) if existing != component => return Err(existing),
            Some(_) => {
                tracing::trace!(uid, "re-registering component");
                self.remove_handlers(uid);
            }
            None => {}
        }
        self.components.insert(uid.to_owned(), component);
        for event in events {
            self.handlers
                .entry(event.clone())
                .or_default()
                .push(uid.to_owned());
        }
        Ok(())
    }

    /// Remove `uid` if it is registered to `component`.
    pub fn unregister(&mut self, uid: &str, component: ComponentId) {
        if self.components.get(uid) == Some(&component) {
            self.components.remove(uid);
            self.remove_handlers(uid);
        }
    }

    fn remove_handlers(&mut self, uid: &str) {
        for uids in self.handlers.values_mut() {
            uids.retain(|u| u != uid);
        }
        self.handlers.retain(|_, uids| !uids.is_empty());
    }

    pub fn get_by_uid(&self, uid: &str) -> Option<ComponentId> {
        self.components.get(uid).copied()
    }

    /// The component registered under `uid`, if it handles `event`.
    pub fn handler_for(&self, event: &str, uid: &str) -> Option<ComponentId> {
        self.handlers
            .get(event)
            .filter(|uids| uids.iter().any(|u| u == uid))
            .and_then(|_| self.get_by_uid(uid))
    }

    /// Every component handling `event`, in registration order.
    pub fn filter(&self, event: &str) -> Vec<ComponentId> {
        self.handlers
            .get(event)
            .map(|uids| uids.iter().filter_map(|u| self.get_by_uid(u)).collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}
