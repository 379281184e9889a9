//! Behaviours: named capability bundles attached to components.
//!
//! A behaviour is a type implementing [`Behaviour`]. It owns no data itself;
//! [`Behaviour::config`] pairs it with a config value, producing a
//! [`ConfiguredBehaviour`] that goes into a spec. At build time every
//! configured behaviour is instantiated exactly once per component: its state
//! is created from the config and owned by the component's [`BehaviourSet`],
//! keyed by the behaviour's name.
//!
//! Behaviours contribute to the component in two ways:
//! - [`Behaviour::exhibit`] adds classes, attributes and styles to the element.
//! - [`Behaviour::events`] adds event handlers, which are combined with other
//!   contributors according to the component's event order.
//!
//! API functions are plain associated functions on the behaviour type that
//! look up their `(config, state)` through
//! [`World::configured`](crate::world::World::configured).

pub mod registry;
pub mod set;

use std::cell::RefCell;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use crate::event::EventMap;
use crate::spec::DomModification;

pub use registry::{BehaviourRegistry, DataBehaviour};
pub use set::{BehaviourInstance, BehaviourRef, BehaviourSet};

// ---------------------------------------------------------------------------
// Behaviour
// ---------------------------------------------------------------------------

/// A reusable capability: config, per-component state, DOM and event
/// contributions.
pub trait Behaviour: 'static {
    /// Name under which the behaviour is stored and ordered.
    const NAME: &'static str;

    type Config: 'static;
    type State: fmt::Debug + 'static;

    /// Fresh state for one component.
    fn init_state(config: &Self::Config) -> Self::State;

    /// Classes, attributes and styles this behaviour adds to the element.
    fn exhibit(_config: &Self::Config, _state: &Self::State) -> DomModification {
        DomModification::new()
    }

    /// Event handlers this behaviour contributes.
    fn events(_config: &Rc<Self::Config>, _state: &Rc<RefCell<Self::State>>) -> EventMap {
        EventMap::new()
    }

    /// Pair this behaviour with a config, for use in a spec.
    fn config(config: Self::Config) -> ConfiguredBehaviour
    where
        Self: Sized,
    {
        ConfiguredBehaviour::named::<Self>(Self::NAME, config)
    }
}

// ---------------------------------------------------------------------------
// ConfiguredBehaviour
// ---------------------------------------------------------------------------

/// Builds per-component instances of one configured behaviour.
pub(crate) trait Instantiate {
    fn instantiate(&self, name: &str) -> Rc<dyn BehaviourInstance>;
}

struct Configured<B: Behaviour> {
    config: Rc<B::Config>,
    _marker: PhantomData<B>,
}

impl<B: Behaviour> Instantiate for Configured<B> {
    fn instantiate(&self, name: &str) -> Rc<dyn BehaviourInstance> {
        let state = B::init_state(&self.config);
        Rc::new(set::Instance::<B> {
            name: name.to_owned(),
            config: Rc::clone(&self.config),
            state: Rc::new(RefCell::new(state)),
        })
    }
}

/// A behaviour paired with its config, as it appears in a spec.
#[derive(Clone)]
pub struct ConfiguredBehaviour {
    pub name: String,
    source: Rc<dyn Instantiate>,
}

impl ConfiguredBehaviour {
    /// Configure `B` under an explicit name. Used by behaviours whose name is
    /// chosen per use, such as [`AddEvents`](crate::behaviours::AddEvents).
    pub fn named<B: Behaviour>(name: impl Into<String>, config: B::Config) -> Self {
        Self {
            name: name.into(),
            source: Rc::new(Configured::<B> {
                config: Rc::new(config),
                _marker: PhantomData,
            }),
        }
    }

    pub(crate) fn instantiate(&self) -> Rc<dyn BehaviourInstance> {
        self.source.instantiate(&self.name)
    }
}

impl fmt::Debug for ConfiguredBehaviour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfiguredBehaviour")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
