//! Live components.
//!
//! A [`Component`] is one built node: its element, its uid, the behaviours it
//! carries, its combined event handlers and its child components. Components
//! live in the [`World`](crate::world::World)'s arena and are addressed by
//! [`ComponentId`].

pub mod builder;
pub mod reconcile;

use std::collections::HashMap;
use std::fmt;

use slotmap::new_key_type;

use crate::behaviour::BehaviourSet;
use crate::dom::NodeId;
use crate::event::EventMap;
use crate::spec::{ApiFn, DomDefinition};
use crate::system::SystemId;

new_key_type! {
    /// Handle to a component in the world's arena.
    pub struct ComponentId;
}

/// How a component came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    /// Built from a sketch.
    Built,
    /// A bare text node.
    Text,
    /// Wraps a DOM node built elsewhere.
    External,
}

pub struct Component {
    pub(crate) uid: String,
    pub(crate) element: NodeId,
    pub(crate) kind: ComponentKind,
    pub(crate) definition: Option<DomDefinition>,
    pub(crate) events: EventMap,
    pub(crate) behaviours: BehaviourSet,
    pub(crate) components: Vec<ComponentId>,
    pub(crate) system: Option<SystemId>,
    pub(crate) apis: HashMap<String, ApiFn>,
}

impl Component {
    pub(crate) fn bare(uid: String, element: NodeId, kind: ComponentKind) -> Self {
        Self {
            uid,
            element,
            kind,
            definition: None,
            events: EventMap::new(),
            behaviours: BehaviourSet::default(),
            components: Vec::new(),
            system: None,
            apis: HashMap::new(),
        }
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn element(&self) -> NodeId {
        self.element
    }

    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    /// The merged definition it was built from. `None` for text and external
    /// components.
    pub fn definition(&self) -> Option<&DomDefinition> {
        self.definition.as_ref()
    }

    pub fn events(&self) -> &EventMap {
        &self.events
    }

    pub fn has_handler(&self, event: &str) -> bool {
        self.events.contains_key(event)
    }

    pub fn behaviours(&self) -> &BehaviourSet {
        &self.behaviours
    }

    /// Child components, as last built or synced.
    pub fn components(&self) -> &[ComponentId] {
        &self.components
    }

    /// The system this component is attached to, if any.
    pub fn system(&self) -> Option<SystemId> {
        self.system
    }

    pub fn is_connected(&self) -> bool {
        self.system.is_some()
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("uid", &self.uid)
            .field("element", &self.element)
            .field("kind", &self.kind)
            .field("behaviours", &self.behaviours.names())
            .field("events", &self.events.keys().collect::<Vec<_>>())
            .field("components", &self.components)
            .field("system", &self.system)
            .finish()
    }
}
