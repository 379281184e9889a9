//! Declarative component descriptions.
//!
//! A [`ComponentSpec`] says what a component should be: its element
//! ([`DomSpec`]), its children ([`AlloySpec`]), the behaviours it carries, its
//! own event handlers and the order in which contributions to one event run.
//! Specs are immutable inputs; [`World::build`](crate::world::World::build)
//! derives everything else from them.

pub mod decode;
pub mod definition;
pub mod uid;

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::behaviour::ConfiguredBehaviour;
use crate::component::ComponentId;
use crate::dom::NodeId;
use crate::error::AlloyError;
use crate::event::{EventHandler, EventMap};
use crate::world::World;

pub use definition::{DomDefinition, DomModification};

/// A named function exposed on a component, called through
/// [`World::call_api`](crate::world::World::call_api).
pub type ApiFn = Rc<dyn Fn(&mut World, ComponentId, Value) -> Result<Value, AlloyError>>;

// ---------------------------------------------------------------------------
// DomSpec
// ---------------------------------------------------------------------------

/// The element part of a spec.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomSpec {
    pub tag: String,
    pub classes: Vec<String>,
    pub attributes: BTreeMap<String, String>,
    pub styles: BTreeMap<String, String>,
    pub inner_html: Option<String>,
    pub value: Option<String>,
}

impl DomSpec {
    pub fn tag(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn with_classes(mut self, classes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.classes.extend(classes.into_iter().map(Into::into));
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_style(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.styles.insert(name.into(), value.into());
        self
    }

    pub fn with_inner_html(mut self, html: impl Into<String>) -> Self {
        self.inner_html = Some(html.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

// ---------------------------------------------------------------------------
// AlloySpec
// ---------------------------------------------------------------------------

/// A child entry of a spec.
#[derive(Clone)]
pub enum AlloySpec {
    /// To be built.
    Sketch(Box<ComponentSpec>),
    /// Already built; embedded as is and never patched over.
    Premade(ComponentId),
    /// A bare text node. Never registered in a system.
    Text(String),
    /// An existing DOM node wrapped as a behaviour-less component.
    External {
        element: NodeId,
        uid: Option<String>,
    },
}

impl AlloySpec {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn external(element: NodeId) -> Self {
        Self::External { element, uid: None }
    }

    pub fn external_with_uid(element: NodeId, uid: impl Into<String>) -> Self {
        Self::External {
            element,
            uid: Some(uid.into()),
        }
    }
}

impl From<ComponentSpec> for AlloySpec {
    fn from(spec: ComponentSpec) -> Self {
        Self::Sketch(Box::new(spec))
    }
}

impl fmt::Debug for AlloySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sketch(spec) => f.debug_tuple("Sketch").field(spec).finish(),
            Self::Premade(id) => f.debug_tuple("Premade").field(id).finish(),
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::External { element, uid } => f
                .debug_struct("External")
                .field("element", element)
                .field("uid", uid)
                .finish(),
        }
    }
}

// ---------------------------------------------------------------------------
// ComponentSpec
// ---------------------------------------------------------------------------

/// Everything needed to build one component.
#[derive(Clone, Default)]
pub struct ComponentSpec {
    pub uid: Option<String>,
    pub dom: DomSpec,
    pub components: Vec<AlloySpec>,
    /// Configured behaviours, in declaration order.
    pub behaviours: Vec<ConfiguredBehaviour>,
    /// Handlers contributed under the base source name.
    pub events: EventMap,
    /// Per-event execution order of contributing sources. Replaces the
    /// default order for the same event.
    pub event_order: HashMap<String, Vec<String>>,
    pub dom_modification: Option<DomModification>,
    pub apis: HashMap<String, ApiFn>,
}

impl ComponentSpec {
    pub fn new(dom: DomSpec) -> Self {
        Self {
            dom,
            ..Self::default()
        }
    }

    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = Some(uid.into());
        self
    }

    pub fn with_component(mut self, child: impl Into<AlloySpec>) -> Self {
        self.components.push(child.into());
        self
    }

    pub fn with_components(mut self, children: impl IntoIterator<Item = AlloySpec>) -> Self {
        self.components.extend(children);
        self
    }

    pub fn with_behaviour(mut self, behaviour: ConfiguredBehaviour) -> Self {
        self.behaviours.push(behaviour);
        self
    }

    /// `None` means the behaviour is explicitly not configured.
    pub fn with_behaviour_opt(self, behaviour: Option<ConfiguredBehaviour>) -> Self {
        match behaviour {
            Some(b) => self.with_behaviour(b),
            None => self,
        }
    }

    pub fn with_event(mut self, name: impl Into<String>, handler: EventHandler) -> Self {
        self.events.insert(name.into(), handler);
        self
    }

    pub fn with_event_order<I, S>(mut self, event: impl Into<String>, order: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.event_order
            .insert(event.into(), order.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_dom_modification(mut self, modification: DomModification) -> Self {
        self.dom_modification = Some(modification);
        self
    }

    pub fn with_api(
        mut self,
        name: impl Into<String>,
        api: impl Fn(&mut World, ComponentId, Value) -> Result<Value, AlloyError> + 'static,
    ) -> Self {
        self.apis.insert(name.into(), Rc::new(api));
        self
    }

    /// Names of the configured behaviours, in declaration order.
    pub fn behaviour_names(&self) -> Vec<&str> {
        self.behaviours.iter().map(|b| b.name.as_str()).collect()
    }
}

impl fmt::Debug for ComponentSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut apis: Vec<&String> = self.apis.keys().collect();
        apis.sort();
        f.debug_struct("ComponentSpec")
            .field("uid", &self.uid)
            .field("dom", &self.dom)
            .field("components", &self.components)
            .field("behaviours", &self.behaviour_names())
            .field("events", &self.events.keys().collect::<Vec<_>>())
            .field("event_order", &self.event_order)
            .field("dom_modification", &self.dom_modification)
            .field("apis", &apis)
            .finish()
    }
}
