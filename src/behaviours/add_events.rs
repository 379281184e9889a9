//! Ad-hoc event handlers under a name of the caller's choosing, so they can
//! take part in event ordering like any other behaviour.

use std::cell::RefCell;
use std::rc::Rc;

use crate::behaviour::{Behaviour, ConfiguredBehaviour};
use crate::event::{EventEntry, EventMap};

pub struct AddEvents;

impl Behaviour for AddEvents {
    const NAME: &'static str = "add-events";
    type Config = EventMap;
    type State = ();

    fn init_state(_config: &EventMap) {}

    fn events(config: &Rc<EventMap>, _state: &Rc<RefCell<()>>) -> EventMap {
        config.as_ref().clone()
    }
}

impl AddEvents {
    /// Configure the handlers in `entries` as behaviour `name`.
    pub fn named(name: impl Into<String>, entries: impl IntoIterator<Item = EventEntry>) -> ConfiguredBehaviour {
        ConfiguredBehaviour::named::<Self>(name, entries.into_iter().collect())
    }
}
