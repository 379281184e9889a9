//! Behaviours configured from data.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{Behaviour, ConfiguredBehaviour};
use crate::error::AlloyError;
use crate::schema::{as_raw, ValueSchema};

/// A behaviour whose config can arrive as JSON.
///
/// The raw value is validated against [`DataBehaviour::schema`] first (which
/// also fills in defaults), then deserialized into the config type.
pub trait DataBehaviour: Behaviour {
    fn schema() -> ValueSchema;
}

/// Validate and decode a raw config for `B`.
pub fn decode_config<B>(raw: &Value) -> Result<ConfiguredBehaviour, AlloyError>
where
    B: DataBehaviour,
    B::Config: DeserializeOwned,
{
    let validated = as_raw(B::NAME, &B::schema(), raw)?;
    let config: B::Config = serde_json::from_value(validated)?;
    Ok(B::config(config))
}

type Decoder = Rc<dyn Fn(&Value) -> Result<ConfiguredBehaviour, AlloyError>>;

/// Maps behaviour names to config decoders.
#[derive(Clone, Default)]
pub struct BehaviourRegistry {
    decoders: BTreeMap<String, Decoder>,
}

impl BehaviourRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry knowing the built-in data behaviours.
    pub fn with_defaults() -> Self {
        use crate::behaviours::{Disabling, Toggling};
        let mut registry = Self::new();
        registry.register::<Toggling>();
        registry.register::<Disabling>();
        registry
    }

    pub fn register<B>(&mut self)
    where
        B: DataBehaviour,
        B::Config: DeserializeOwned,
    {
        self.decoders
            .insert(B::NAME.to_owned(), Rc::new(decode_config::<B>));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.decoders.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.decoders.keys().map(String::as_str).collect()
    }

    /// Decode one behaviour entry of a data spec.
    pub fn decode(&self, name: &str, raw: &Value) -> Result<ConfiguredBehaviour, AlloyError> {
        let decoder = self
            .decoders
            .get(name)
            .ok_or_else(|| AlloyError::UnknownBehaviour(name.to_owned()))?;
        decoder(raw)
    }
}

impl fmt::Debug for BehaviourRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BehaviourRegistry")
            .field("behaviours", &self.names())
            .finish()
    }
}
