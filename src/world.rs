//! The world: sole owner of the DOM, the components and the systems.
//!
//! Everything in the engine is addressed by arena keys ([`NodeId`],
//! [`ComponentId`], [`SystemId`]) and reached through a `&mut World`. Handlers
//! and behaviour APIs receive the world explicitly instead of capturing it.

use std::collections::VecDeque;
use std::fmt;

use serde_json::Value;
use slotmap::{SecondaryMap, SlotMap};

use crate::behaviour::{Behaviour, BehaviourRef};
use crate::component::{Component, ComponentId};
use crate::dom::{Dom, NodeId};
use crate::error::{AlloyError, Result};
use crate::event::names::EXECUTE;
use crate::event::{DispatchOutcome, EventPayload};
use crate::spec::uid::ID_ATTR;
use crate::system::{gui, GuiState, SystemId};

/// A task queued with [`World::defer`].
pub type Deferred = Box<dyn FnOnce(&mut World)>;

pub struct World {
    pub(crate) dom: Dom,
    pub(crate) components: SlotMap<ComponentId, Component>,
    pub(crate) by_element: SecondaryMap<NodeId, ComponentId>,
    pub(crate) systems: SlotMap<SystemId, GuiState>,
    pub(crate) focused: Option<NodeId>,
    deferred: VecDeque<Deferred>,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    pub fn new() -> Self {
        Self {
            dom: Dom::new(),
            components: SlotMap::with_key(),
            by_element: SecondaryMap::new(),
            systems: SlotMap::with_key(),
            focused: None,
            deferred: VecDeque::new(),
        }
    }

    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut Dom {
        &mut self.dom
    }

    // ── Lookup ──────────────────────────────────────────────────────

    pub fn component(&self, id: ComponentId) -> Result<&Component> {
        self.components.get(id).ok_or(AlloyError::UnknownComponent)
    }

    pub(crate) fn component_mut(&mut self, id: ComponentId) -> Result<&mut Component> {
        self.components.get_mut(id).ok_or(AlloyError::UnknownComponent)
    }

    pub fn element(&self, id: ComponentId) -> Result<NodeId> {
        self.component(id).map(|c| c.element)
    }

    pub fn uid(&self, id: ComponentId) -> Result<&str> {
        self.component(id).map(|c| c.uid.as_str())
    }

    pub fn contains(&self, id: ComponentId) -> bool {
        self.components.contains_key(id)
    }

    /// The component whose element is exactly `node`.
    pub fn get_by_element(&self, node: NodeId) -> Option<ComponentId> {
        self.by_element.get(node).copied()
    }

    /// The nearest component at or above `node`.
    pub fn closest_component(&self, node: NodeId) -> Option<ComponentId> {
        std::iter::once(node)
            .chain(self.dom.ancestors(node))
            .find_map(|n| self.get_by_element(n))
    }

    /// The element the last unhandled focus request landed on.
    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    // ── Behaviours ──────────────────────────────────────────────────

    /// Typed access to behaviour `B` on `component`.
    pub fn configured<B: Behaviour>(&self, component: ComponentId) -> Result<BehaviourRef<B>> {
        let c = self.component(component)?;
        c.behaviours
            .get(B::NAME)
            .and_then(|instance| instance.typed::<B>())
            .ok_or_else(|| AlloyError::MissingBehaviour {
                behaviour: B::NAME.to_owned(),
                uid: c.uid.clone(),
                configured: c.behaviours.names(),
            })
    }

    pub fn has_configured(&self, component: ComponentId, behaviour: &str) -> bool {
        self.component(component)
            .is_ok_and(|c| c.behaviours.has(behaviour))
    }

    /// Debug rendering of one behaviour's state.
    pub fn read_state(&self, component: ComponentId, behaviour: &str) -> String {
        self.component(component)
            .ok()
            .and_then(|c| c.behaviours.get(behaviour))
            .map(|b| b.describe_state())
            .unwrap_or_else(|| "not enabled".to_owned())
    }

    /// Call an API function the spec exposed on this component.
    pub fn call_api(&mut self, component: ComponentId, name: &str, args: Value) -> Result<Value> {
        let c = self.component(component)?;
        let api = c
            .apis
            .get(name)
            .cloned()
            .ok_or_else(|| AlloyError::MissingApi {
                uid: c.uid.clone(),
                name: name.to_owned(),
            })?;
        api(self, component, args)
    }

    // ── System context ──────────────────────────────────────────────

    /// The system the component is attached to.
    pub fn system(&self, component: ComponentId) -> Result<SystemId> {
        self.component(component)?
            .system
            .ok_or_else(|| self.not_in_system("system", component))
    }

    pub(crate) fn not_in_system(&self, operation: &str, component: ComponentId) -> AlloyError {
        AlloyError::NotInSystem {
            operation: operation.to_owned(),
            html: self.outer_html(component).unwrap_or_default(),
        }
    }

    pub(crate) fn unregister_uid(&mut self, system: SystemId, uid: &str, id: ComponentId) {
        if let Some(state) = self.systems.get_mut(system) {
            state.registry.unregister(uid, id);
        }
    }

    /// Re-read the component's children from its element's DOM children.
    pub fn sync_components(&mut self, component: ComponentId) -> Result<()> {
        let element = self.element(component)?;
        let children: Vec<ComponentId> = self
            .dom
            .children(element)
            .iter()
            .filter_map(|&n| self.get_by_element(n))
            .collect();
        self.component_mut(component)?.components = children;
        Ok(())
    }

    // ── Events ──────────────────────────────────────────────────────

    /// Dispatch `event` from the component's element. A no-op, with a
    /// warning, when the component is not in a system.
    pub fn emit(&mut self, component: ComponentId, event: &str) {
        self.emit_with(component, event, EventPayload::None);
    }

    pub fn emit_execute(&mut self, component: ComponentId) {
        self.emit(component, EXECUTE);
    }

    pub fn emit_with(&mut self, component: ComponentId, event: &str, payload: EventPayload) {
        let Ok(element) = self.element(component) else {
            tracing::warn!(event, "emit on a component that no longer exists");
            return;
        };
        self.dispatch_with(component, element, event, payload);
    }

    /// Dispatch `event` from `target` through the component's system.
    pub fn dispatch_with(
        &mut self,
        component: ComponentId,
        target: NodeId,
        event: &str,
        payload: EventPayload,
    ) -> Option<DispatchOutcome> {
        match self.component(component).map(|c| c.system) {
            Ok(Some(system)) => Some(gui::dispatch(self, system, event, target, payload)),
            _ => {
                tracing::warn!(
                    event,
                    html = %self.outer_html(component).unwrap_or_default(),
                    "The component must be in a context to send: {event}",
                );
                None
            }
        }
    }

    // ── Lifetime ────────────────────────────────────────────────────

    /// Forget a component and its descendants and free its element.
    pub fn dispose(&mut self, component: ComponentId) {
        let Some(element) = self.components.get(component).map(|c| c.element) else {
            return;
        };
        self.forget(component);
        self.dom.remove(element);
    }

    fn forget(&mut self, component: ComponentId) {
        let Some(c) = self.components.remove(component) else {
            return;
        };
        if self.by_element.get(c.element) == Some(&component) {
            self.by_element.remove(c.element);
        }
        if let Some(system) = c.system {
            self.unregister_uid(system, &c.uid, component);
        }
        for child in c.components {
            self.forget(child);
        }
    }

    /// Queue `task` to run on the next [`run_pending`](Self::run_pending).
    pub fn defer(&mut self, task: impl FnOnce(&mut World) + 'static) {
        self.deferred.push_back(Box::new(task));
    }

    /// Run queued tasks, including any they queue, and return how many ran.
    pub fn run_pending(&mut self) -> usize {
        let mut ran = 0;
        while let Some(task) = self.deferred.pop_front() {
            task(self);
            ran += 1;
        }
        ran
    }

    pub fn has_pending(&self) -> bool {
        !self.deferred.is_empty()
    }

    // ── Rendering ───────────────────────────────────────────────────

    pub fn outer_html(&self, component: ComponentId) -> Result<String> {
        Ok(self.dom.outer_html(self.element(component)?))
    }

    /// Outer HTML with generated uid attributes stripped.
    pub fn outer_html_without_uids(&self, component: ComponentId) -> String {
        self.element(component)
            .map(|el| self.dom.outer_html_without(el, &[ID_ATTR]))
            .unwrap_or_default()
    }
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("nodes", &self.dom.len())
            .field("components", &self.components.len())
            .field("systems", &self.systems.len())
            .field("deferred", &self.deferred.len())
            .finish()
    }
}
