//! Toggling: an on/off state reflected as a class and an aria attribute.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Deserialize;
use serde_json::json;

use crate::behaviour::{Behaviour, DataBehaviour};
use crate::component::ComponentId;
use crate::error::Result;
use crate::event::{derive, run_on_execute, run_on_init, EventMap};
use crate::schema::{boolean, choose_on, defaulted_of, option_of, obj_of_only, string, ValueSchema};
use crate::spec::DomModification;
use crate::world::World;

/// Which aria attribute mirrors the toggle.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum ToggleAria {
    #[default]
    None,
    Pressed {
        /// Also keep `aria-expanded` in step.
        #[serde(rename = "syncWithExpanded")]
        sync_with_expanded: bool,
    },
    Checked,
    Expanded,
    Selected,
}

impl ToggleAria {
    fn attributes(&self) -> &'static [&'static str] {
        match self {
            Self::None => &[],
            Self::Pressed {
                sync_with_expanded: true,
            } => &["aria-pressed", "aria-expanded"],
            Self::Pressed { .. } => &["aria-pressed"],
            Self::Checked => &["aria-checked"],
            Self::Expanded => &["aria-expanded"],
            Self::Selected => &["aria-selected"],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TogglingConfig {
    pub toggle_class: Option<String>,
    pub toggle_on_execute: bool,
    /// Initial state.
    pub selected: bool,
    pub aria: ToggleAria,
}

impl Default for TogglingConfig {
    fn default() -> Self {
        Self {
            toggle_class: None,
            toggle_on_execute: true,
            selected: false,
            aria: ToggleAria::None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ToggleState {
    pub on: bool,
}

pub struct Toggling;

impl Behaviour for Toggling {
    const NAME: &'static str = "toggling";
    type Config = TogglingConfig;
    type State = ToggleState;

    fn init_state(config: &TogglingConfig) -> ToggleState {
        ToggleState {
            on: config.selected,
        }
    }

    fn exhibit(config: &TogglingConfig, state: &ToggleState) -> DomModification {
        let mut modification = DomModification::new();
        if state.on {
            if let Some(class) = &config.toggle_class {
                modification = modification.with_class(class.as_str());
            }
        }
        for attr in config.aria.attributes() {
            modification = modification.with_attribute(*attr, state.on.to_string());
        }
        modification
    }

    fn events(config: &Rc<TogglingConfig>, state: &Rc<RefCell<ToggleState>>) -> EventMap {
        let mut entries = Vec::new();
        if config.toggle_on_execute {
            let (config, state) = (Rc::clone(config), Rc::clone(state));
            entries.push(run_on_execute(move |world, component, _| {
                let on = !state.borrow().on;
                state.borrow_mut().on = on;
                report(reflect(world, component, &config, on));
            }));
        }
        let (config, state) = (Rc::clone(config), Rc::clone(state));
        entries.push(run_on_init(move |world, component, _| {
            state.borrow_mut().on = config.selected;
            report(reflect(world, component, &config, config.selected));
        }));
        derive(entries)
    }
}

impl DataBehaviour for Toggling {
    fn schema() -> ValueSchema {
        obj_of_only(vec![
            option_of("toggleClass", string()),
            defaulted_of("toggleOnExecute", true, boolean()),
            defaulted_of("selected", false, boolean()),
            defaulted_of(
                "aria",
                json!({ "mode": "none" }),
                choose_on(
                    "mode",
                    vec![
                        ("none", vec![]),
                        (
                            "pressed",
                            vec![defaulted_of("syncWithExpanded", false, boolean())],
                        ),
                        ("checked", vec![]),
                        ("expanded", vec![]),
                        ("selected", vec![]),
                    ],
                ),
            ),
        ])
    }
}

fn report(result: Result<()>) {
    if let Err(err) = result {
        tracing::warn!(%err, "toggling could not update its element");
    }
}

fn reflect(world: &mut World, component: ComponentId, config: &TogglingConfig, on: bool) -> Result<()> {
    let element = world.element(component)?;
    let data = world.dom_mut().element_mut(element)?;
    if let Some(class) = &config.toggle_class {
        if on {
            data.add_class(class);
        } else {
            data.remove_class(class);
        }
    }
    for attr in config.aria.attributes() {
        data.set_attribute(attr, on.to_string())?;
    }
    Ok(())
}

impl Toggling {
    pub fn is_on(world: &World, component: ComponentId) -> Result<bool> {
        Ok(world.configured::<Self>(component)?.state().on)
    }

    pub fn set(world: &mut World, component: ComponentId, on: bool) -> Result<()> {
        let behaviour = world.configured::<Self>(component)?;
        behaviour.state_mut().on = on;
        let config = behaviour.config().clone();
        reflect(world, component, &config, on)
    }

    pub fn on(world: &mut World, component: ComponentId) -> Result<()> {
        Self::set(world, component, true)
    }

    pub fn off(world: &mut World, component: ComponentId) -> Result<()> {
        Self::set(world, component, false)
    }

    pub fn toggle(world: &mut World, component: ComponentId) -> Result<()> {
        let on = Self::is_on(world, component)?;
        Self::set(world, component, !on)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behaviour::registry::decode_config;
    use crate::spec::{ComponentSpec, DomSpec};
    use crate::system::{Gui, GuiConfig};
    use pretty_assertions::assert_eq;

    fn button(config: TogglingConfig) -> (World, ComponentId) {
        let mut world = World::new();
        let c = world
            .build(
                ComponentSpec::new(DomSpec::tag("button"))
                    .with_behaviour(Toggling::config(config)),
            )
            .unwrap();
        (world, c)
    }

    fn element_has_class(world: &World, c: ComponentId, class: &str) -> bool {
        let el = world.element(c).unwrap();
        world.dom().get(el).unwrap().has_class(class)
    }

    #[test]
    fn api_updates_state_class_and_aria() {
        let (mut world, c) = button(TogglingConfig {
            toggle_class: Some("active".into()),
            aria: ToggleAria::Pressed {
                sync_with_expanded: true,
            },
            ..TogglingConfig::default()
        });
        assert!(!Toggling::is_on(&world, c).unwrap());

        Toggling::toggle(&mut world, c).unwrap();
        assert!(Toggling::is_on(&world, c).unwrap());
        assert!(element_has_class(&world, c, "active"));
        let el = world.element(c).unwrap();
        let data = world.dom().get(el).unwrap();
        assert_eq!(data.attribute("aria-pressed"), Some("true"));
        assert_eq!(data.attribute("aria-expanded"), Some("true"));

        Toggling::off(&mut world, c).unwrap();
        assert!(!element_has_class(&world, c, "active"));
        assert_eq!(world.read_state(c, "toggling"), "ToggleState { on: false }");
    }

    #[test]
    fn execute_toggles_when_enabled() {
        let (mut world, c) = button(TogglingConfig {
            toggle_class: Some("on".into()),
            ..TogglingConfig::default()
        });
        Gui::takeover(&mut world, c, GuiConfig::new()).unwrap();
        world.emit_execute(c);
        assert!(Toggling::is_on(&world, c).unwrap());
        world.emit_execute(c);
        assert!(!Toggling::is_on(&world, c).unwrap());
    }

    #[test]
    fn execute_ignored_when_disabled_in_config() {
        let (mut world, c) = button(TogglingConfig {
            toggle_on_execute: false,
            ..TogglingConfig::default()
        });
        assert!(!world.component(c).unwrap().has_handler(crate::event::names::EXECUTE));
        Gui::takeover(&mut world, c, GuiConfig::new()).unwrap();
        world.emit_execute(c);
        assert!(!Toggling::is_on(&world, c).unwrap());
    }

    #[test]
    fn init_applies_selected() {
        let (mut world, c) = button(TogglingConfig {
            selected: true,
            aria: ToggleAria::Checked,
            ..TogglingConfig::default()
        });
        Toggling::off(&mut world, c).unwrap();
        Gui::takeover(&mut world, c, GuiConfig::new()).unwrap();
        assert!(Toggling::is_on(&world, c).unwrap());
    }

    #[test]
    fn decodes_aria_branches() {
        let cb = decode_config::<Toggling>(&json!({
            "toggleClass": "x",
            "aria": { "mode": "pressed" }
        }))
        .unwrap();
        let inst = cb.instantiate();
        let behaviour = inst.typed::<Toggling>().unwrap();
        assert_eq!(
            behaviour.config().aria,
            ToggleAria::Pressed {
                sync_with_expanded: false
            }
        );
        assert!(behaviour.config().toggle_on_execute);
    }

    #[test]
    fn unknown_aria_mode_is_a_missing_branch() {
        let err = decode_config::<Toggling>(&json!({ "aria": { "mode": "bogus" } })).unwrap_err();
        assert!(err.to_string().contains("\"bogus\" did not exist"));
    }
}
