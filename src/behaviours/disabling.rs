//! Disabling: blocks `alloy.execute` and marks the element disabled.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::Deserialize;

use crate::behaviour::{Behaviour, DataBehaviour};
use crate::component::ComponentId;
use crate::error::Result;
use crate::event::names::EXECUTE;
use crate::event::{abort, derive, run_on_init, EventMap};
use crate::schema::{boolean, defaulted_of, obj_of_only, option_of, string, ValueSchema};
use crate::spec::DomModification;
use crate::world::World;

/// Tags that understand the native `disabled` attribute.
const NATIVE_TAGS: &[&str] = &["input", "button", "textarea", "select", "option", "optgroup"];

pub type DisableHook = Rc<dyn Fn(&mut World, ComponentId)>;

#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisablingConfig {
    /// Start disabled.
    pub disabled: bool,
    /// Use the `disabled` attribute on form controls instead of `aria-disabled`.
    pub use_native: bool,
    pub disable_class: Option<String>,
    #[serde(skip)]
    pub on_disabled: Option<DisableHook>,
    #[serde(skip)]
    pub on_enabled: Option<DisableHook>,
}

impl Default for DisablingConfig {
    fn default() -> Self {
        Self {
            disabled: false,
            use_native: true,
            disable_class: None,
            on_disabled: None,
            on_enabled: None,
        }
    }
}

impl DisablingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn with_use_native(mut self, use_native: bool) -> Self {
        self.use_native = use_native;
        self
    }

    pub fn with_disable_class(mut self, class: impl Into<String>) -> Self {
        self.disable_class = Some(class.into());
        self
    }

    pub fn with_on_disabled(mut self, f: impl Fn(&mut World, ComponentId) + 'static) -> Self {
        self.on_disabled = Some(Rc::new(f));
        self
    }

    pub fn with_on_enabled(mut self, f: impl Fn(&mut World, ComponentId) + 'static) -> Self {
        self.on_enabled = Some(Rc::new(f));
        self
    }
}

impl fmt::Debug for DisablingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DisablingConfig")
            .field("disabled", &self.disabled)
            .field("use_native", &self.use_native)
            .field("disable_class", &self.disable_class)
            .field("on_disabled", &self.on_disabled.is_some())
            .field("on_enabled", &self.on_enabled.is_some())
            .finish()
    }
}

pub struct Disabling;

impl Behaviour for Disabling {
    const NAME: &'static str = "disabling";
    type Config = DisablingConfig;
    type State = ();

    fn init_state(_config: &DisablingConfig) {}

    fn exhibit(config: &DisablingConfig, _state: &()) -> DomModification {
        match (&config.disable_class, config.disabled) {
            (Some(class), true) => DomModification::new().with_class(class.as_str()),
            _ => DomModification::new(),
        }
    }

    fn events(config: &Rc<DisablingConfig>, _state: &Rc<RefCell<()>>) -> EventMap {
        let on_init = {
            let config = Rc::clone(config);
            run_on_init(move |world, component, _| {
                if config.disabled {
                    if let Err(err) = toggle(world, component, &config, true) {
                        tracing::warn!(%err, "disabling could not update its element");
                    }
                }
            })
        };
        derive([
            abort(EXECUTE, |world, component, _| {
                Disabling::is_disabled(world, component)
            }),
            on_init,
        ])
    }
}

impl DataBehaviour for Disabling {
    fn schema() -> ValueSchema {
        obj_of_only(vec![
            defaulted_of("disabled", false, boolean()),
            defaulted_of("useNative", true, boolean()),
            option_of("disableClass", string()),
        ])
    }
}

fn uses_native(world: &World, config: &DisablingConfig, component: ComponentId) -> bool {
    config.use_native
        && world
            .element(component)
            .ok()
            .and_then(|el| world.dom().get(el))
            .is_some_and(|data| NATIVE_TAGS.contains(&data.tag.as_str()))
}

fn toggle(world: &mut World, component: ComponentId, config: &DisablingConfig, disabled: bool) -> Result<()> {
    let native = uses_native(world, config, component);
    let element = world.element(component)?;
    let data = world.dom_mut().element_mut(element)?;
    if native {
        if disabled {
            data.set_attribute("disabled", "disabled")?;
        } else {
            data.remove_attribute("disabled");
        }
    } else {
        data.set_attribute("aria-disabled", disabled.to_string())?;
    }
    if let Some(class) = &config.disable_class {
        if disabled {
            data.add_class(class);
        } else {
            data.remove_class(class);
        }
    }
    let hook = if disabled {
        &config.on_disabled
    } else {
        &config.on_enabled
    };
    if let Some(hook) = hook {
        hook(world, component);
    }
    Ok(())
}

impl Disabling {
    /// Disabled as seen on the element, so a reused element keeps its state.
    pub fn is_disabled(world: &World, component: ComponentId) -> bool {
        let Ok(behaviour) = world.configured::<Self>(component) else {
            return false;
        };
        let Some(data) = world.element(component).ok().and_then(|el| world.dom().get(el)) else {
            return false;
        };
        if uses_native(world, behaviour.config(), component) {
            data.has_attribute("disabled")
        } else {
            data.attribute("aria-disabled") == Some("true")
        }
    }

    pub fn set(world: &mut World, component: ComponentId, disabled: bool) -> Result<()> {
        let config = world.configured::<Self>(component)?.config().clone();
        toggle(world, component, &config, disabled)
    }

    pub fn disable(world: &mut World, component: ComponentId) -> Result<()> {
        Self::set(world, component, true)
    }

    pub fn enable(world: &mut World, component: ComponentId) -> Result<()> {
        Self::set(world, component, false)
    }
}
