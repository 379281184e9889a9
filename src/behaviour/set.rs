//! Per-component behaviour instances.

use std::any::Any;
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use super::{Behaviour, ConfiguredBehaviour};
use crate::event::EventMap;
use crate::spec::DomModification;

// ---------------------------------------------------------------------------
// BehaviourInstance
// ---------------------------------------------------------------------------

/// One behaviour as instantiated on one component: its config and its state.
pub trait BehaviourInstance {
    fn name(&self) -> &str;
    fn exhibit(&self) -> DomModification;
    fn events(&self) -> EventMap;
    /// Debug rendering of the current state.
    fn describe_state(&self) -> String;
    fn as_any(&self) -> &dyn Any;
}

impl dyn BehaviourInstance {
    /// Typed access, if this instance was configured from `B`.
    pub fn typed<B: Behaviour>(&self) -> Option<BehaviourRef<B>> {
        self.as_any()
            .downcast_ref::<Instance<B>>()
            .map(|inst| BehaviourRef {
                config: Rc::clone(&inst.config),
                state: Rc::clone(&inst.state),
            })
    }
}

pub(crate) struct Instance<B: Behaviour> {
    pub(crate) name: String,
    pub(crate) config: Rc<B::Config>,
    pub(crate) state: Rc<RefCell<B::State>>,
}

impl<B: Behaviour> BehaviourInstance for Instance<B> {
    fn name(&self) -> &str {
        &self.name
    }

    fn exhibit(&self) -> DomModification {
        B::exhibit(&self.config, &self.state.borrow())
    }

    fn events(&self) -> EventMap {
        B::events(&self.config, &self.state)
    }

    fn describe_state(&self) -> String {
        format!("{:?}", self.state.borrow())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ---------------------------------------------------------------------------
// BehaviourRef
// ---------------------------------------------------------------------------

/// Typed handle to one behaviour's config and state on a component.
pub struct BehaviourRef<B: Behaviour> {
    config: Rc<B::Config>,
    state: Rc<RefCell<B::State>>,
}

impl<B: Behaviour> BehaviourRef<B> {
    pub fn config(&self) -> &B::Config {
        &self.config
    }

    pub fn state(&self) -> Ref<'_, B::State> {
        self.state.borrow()
    }

    pub fn state_mut(&self) -> RefMut<'_, B::State> {
        self.state.borrow_mut()
    }
}

impl<B: Behaviour> fmt::Debug for BehaviourRef<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BehaviourRef")
            .field("name", &B::NAME)
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

impl<B: Behaviour> Clone for BehaviourRef<B> {
    fn clone(&self) -> Self {
        Self {
            config: Rc::clone(&self.config),
            state: Rc::clone(&self.state),
        }
    }
}

// ---------------------------------------------------------------------------
// BehaviourSet
// ---------------------------------------------------------------------------

/// The behaviours instantiated on one component, in declaration order.
#[derive(Clone, Default)]
pub struct BehaviourSet {
    entries: Vec<Rc<dyn BehaviourInstance>>,
}

impl BehaviourSet {
    /// Instantiate every configured behaviour once. A later entry with the
    /// same name replaces an earlier one in place.
    pub fn generate(configured: &[ConfiguredBehaviour]) -> Self {
        let mut entries: Vec<Rc<dyn BehaviourInstance>> = Vec::with_capacity(configured.len());
        for cb in configured {
            let instance = cb.instantiate();
            match entries.iter().position(|e| e.name() == cb.name) {
                Some(i) => entries[i] = instance,
                None => entries.push(instance),
            }
        }
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&Rc<dyn BehaviourInstance>> {
        self.entries.iter().find(|e| e.name() == name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name().to_owned()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rc<dyn BehaviourInstance>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Each behaviour's DOM contribution, in declaration order.
    pub fn exhibits(&self) -> Vec<DomModification> {
        self.entries.iter().map(|e| e.exhibit()).collect()
    }

    /// Each behaviour's event contribution, tagged with its name.
    pub fn event_sources(&self) -> Vec<(String, EventMap)> {
        self.entries
            .iter()
            .map(|e| (e.name().to_owned(), e.events()))
            .collect()
    }
}
