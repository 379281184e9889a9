//! Receiving: per-channel handlers for broadcast messages.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::behaviour::Behaviour;
use crate::component::ComponentId;
use crate::event::{derive, run_on_receive, EventMap};
use crate::world::World;

pub type ChannelHandler = Rc<dyn Fn(&mut World, ComponentId, &Value)>;

#[derive(Clone, Default)]
pub struct ReceivingConfig {
    pub channels: BTreeMap<String, ChannelHandler>,
}

impl ReceivingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(
        mut self,
        channel: impl Into<String>,
        f: impl Fn(&mut World, ComponentId, &Value) + 'static,
    ) -> Self {
        self.channels.insert(channel.into(), Rc::new(f));
        self
    }
}

impl fmt::Debug for ReceivingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.channels.keys()).finish()
    }
}

pub struct Receiving;

impl Behaviour for Receiving {
    const NAME: &'static str = "receiving";
    type Config = ReceivingConfig;
    type State = ();

    fn init_state(_config: &ReceivingConfig) {}

    fn events(config: &Rc<ReceivingConfig>, _state: &Rc<RefCell<()>>) -> EventMap {
        let config = Rc::clone(config);
        derive([run_on_receive(move |world, component, event| {
            let Some(message) = event.message() else {
                return;
            };
            for (channel, handler) in &config.channels {
                if message.universal || message.channels.iter().any(|c| c == channel) {
                    handler(world, component, &message.data);
                }
            }
        })])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::spec::{ComponentSpec, DomSpec};
    use crate::system::{Gui, GuiConfig};
    use pretty_assertions::assert_eq;

    type Inbox = Rc<RefCell<Vec<String>>>;

    fn listener(inbox: &Inbox, uid: &str) -> ComponentSpec {
        let (a, b) = (Rc::clone(inbox), Rc::clone(inbox));
        let (ua, ub) = (uid.to_owned(), uid.to_owned());
        ComponentSpec::new(DomSpec::tag("div"))
            .with_uid(uid)
            .with_behaviour(Receiving::config(
                ReceivingConfig::new()
                    .on("alpha", move |_, _, data| a.borrow_mut().push(format!("{ua}:alpha:{data}")))
                    .on("beta", move |_, _, data| b.borrow_mut().push(format!("{ub}:beta:{data}"))),
            ))
    }

    #[test]
    fn channel_messages_reach_only_matching_handlers() {
        let inbox: Inbox = Rc::default();
        let mut world = World::new();
        let root = world
            .build(ComponentSpec::new(DomSpec::tag("div")).with_component(listener(&inbox, "one")))
            .unwrap();
        let gui = Gui::takeover(&mut world, root, GuiConfig::new()).unwrap();

        gui.broadcast_on(&mut world, ["beta"], json!(1));
        assert_eq!(*inbox.borrow(), vec!["one:beta:1"]);
    }

    #[test]
    fn universal_messages_reach_every_channel() {
        let inbox: Inbox = Rc::default();
        let mut world = World::new();
        let root = world
            .build(
                ComponentSpec::new(DomSpec::tag("div"))
                    .with_component(listener(&inbox, "one"))
                    .with_component(listener(&inbox, "two")),
            )
            .unwrap();
        let gui = Gui::takeover(&mut world, root, GuiConfig::new()).unwrap();

        gui.broadcast(&mut world, json!("hi"));
        let mut got = inbox.borrow().clone();
        got.sort();
        assert_eq!(
            got,
            vec![
                "one:alpha:\"hi\"",
                "one:beta:\"hi\"",
                "two:alpha:\"hi\"",
                "two:beta:\"hi\"",
            ]
        );
    }

    #[test]
    fn unmatched_channel_is_ignored() {
        let inbox: Inbox = Rc::default();
        let mut world = World::new();
        let root = world.build(listener(&inbox, "solo")).unwrap();
        let gui = Gui::takeover(&mut world, root, GuiConfig::new()).unwrap();
        gui.broadcast_on(&mut world, ["gamma"], json!(null));
        assert!(inbox.borrow().is_empty());
    }
}
