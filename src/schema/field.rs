//! Field schemas: how a single key of an object is read, defaulted, and
//! validated.

use std::fmt;
use std::rc::Rc;

use serde_json::{Map, Value};

use super::error::{SchemaError, SchemaErrorKind};
use super::value::{any_value, ValueSchema};

/// Computes a value from the whole input object.
pub type Thunk = Rc<dyn Fn(&Map<String, Value>) -> Value>;

// ---------------------------------------------------------------------------
// FieldPresence
// ---------------------------------------------------------------------------

/// What to do when a key is absent (or `null`, which counts as absent).
#[derive(Clone)]
pub enum FieldPresence {
    /// Absence is an error.
    Required,
    /// Absence is replaced by a fixed fallback.
    Defaulted(Value),
    /// Absence is replaced by a fallback computed from the whole object.
    DefaultedThunk(Thunk),
    /// Absence produces `null` (the `None` of the output).
    AsOption,
    /// Absence produces `null`; the literal `true` is replaced by the
    /// computed fallback.
    AsDefaultedOption(Thunk),
    /// The value is deep-merged over a base object; absence yields the base.
    MergeWith(Value),
    /// Like `MergeWith`, with the base computed from the whole object.
    MergeWithThunk(Thunk),
}

impl fmt::Debug for FieldPresence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => write!(f, "Required"),
            Self::Defaulted(v) => write!(f, "Defaulted({v})"),
            Self::DefaultedThunk(_) => write!(f, "DefaultedThunk(<fn>)"),
            Self::AsOption => write!(f, "AsOption"),
            Self::AsDefaultedOption(_) => write!(f, "AsDefaultedOption(<fn>)"),
            Self::MergeWith(v) => write!(f, "MergeWith({v})"),
            Self::MergeWithThunk(_) => write!(f, "MergeWithThunk(<fn>)"),
        }
    }
}

// ---------------------------------------------------------------------------
// FieldSchema
// ---------------------------------------------------------------------------

/// One entry in an object schema.
#[derive(Clone)]
pub enum FieldSchema {
    /// Read `key` from the input, write the validated value to `output_key`.
    Field {
        key: String,
        output_key: String,
        presence: FieldPresence,
        schema: ValueSchema,
    },
    /// Computed output that is never read from the input.
    State {
        output_key: String,
        instantiator: Thunk,
    },
}

impl fmt::Debug for FieldSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field {
                key,
                output_key,
                presence,
                schema,
            } => f
                .debug_struct("Field")
                .field("key", key)
                .field("output_key", output_key)
                .field("presence", presence)
                .field("schema", schema)
                .finish(),
            Self::State { output_key, .. } => f
                .debug_struct("State")
                .field("output_key", output_key)
                .finish(),
        }
    }
}

impl FieldSchema {
    /// The key read from the input. `None` for computed state fields.
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Field { key, .. } => Some(key),
            Self::State { .. } => None,
        }
    }

    /// The key written to the output.
    pub fn output_key(&self) -> &str {
        match self {
            Self::Field { output_key, .. } | Self::State { output_key, .. } => output_key,
        }
    }

    /// Extract this field from `input` into `output`, appending failures to
    /// `errors`.
    pub(crate) fn extract(
        &self,
        path: &[String],
        input: &Map<String, Value>,
        output: &mut Map<String, Value>,
        errors: &mut Vec<SchemaError>,
    ) {
        let (key, output_key, presence, schema) = match self {
            Self::State {
                output_key,
                instantiator,
            } => {
                output.insert(output_key.clone(), instantiator(input));
                return;
            }
            Self::Field {
                key,
                output_key,
                presence,
                schema,
            } => (key, output_key, presence, schema),
        };

        let mut field_path = path.to_vec();
        field_path.push(key.clone());
        let raw = input.get(key).filter(|v| !v.is_null());

        let candidate = match presence {
            FieldPresence::Required => match raw {
                Some(v) => v.clone(),
                None => {
                    errors.push(SchemaError::new(
                        &field_path,
                        SchemaErrorKind::MissingField { key: key.clone() },
                    ));
                    return;
                }
            },
            FieldPresence::Defaulted(fallback) => raw.cloned().unwrap_or_else(|| fallback.clone()),
            FieldPresence::DefaultedThunk(thunk) => raw.cloned().unwrap_or_else(|| thunk(input)),
            FieldPresence::AsOption => match raw {
                Some(v) => v.clone(),
                None => {
                    output.insert(output_key.clone(), Value::Null);
                    return;
                }
            },
            FieldPresence::AsDefaultedOption(thunk) => match raw {
                Some(Value::Bool(true)) => thunk(input),
                Some(v) => v.clone(),
                None => {
                    output.insert(output_key.clone(), Value::Null);
                    return;
                }
            },
            FieldPresence::MergeWith(base) => deep_merge(base, raw),
            FieldPresence::MergeWithThunk(thunk) => deep_merge(&thunk(input), raw),
        };

        match schema.extract(&field_path, &candidate) {
            Ok(value) => {
                output.insert(output_key.clone(), value);
            }
            Err(mut errs) => errors.append(&mut errs),
        }
    }
}

/// Merge `overlay` over `base`: objects merge recursively, anything else in
/// the overlay replaces the base.
pub fn deep_merge(base: &Value, overlay: Option<&Value>) -> Value {
    match (base, overlay) {
        (_, None) => base.clone(),
        (Value::Object(b), Some(Value::Object(o))) => {
            let mut merged = b.clone();
            for (k, v) in o {
                let next = match merged.get(k) {
                    Some(existing) => deep_merge(existing, Some(v)),
                    None => v.clone(),
                };
                merged.insert(k.clone(), next);
            }
            Value::Object(merged)
        }
        (_, Some(o)) => o.clone(),
    }
}

// ---------------------------------------------------------------------------
// Constructors
// ---------------------------------------------------------------------------

/// General constructor: read `key`, write `output_key`.
pub fn field(
    key: impl Into<String>,
    output_key: impl Into<String>,
    presence: FieldPresence,
    schema: ValueSchema,
) -> FieldSchema {
    FieldSchema::Field {
        key: key.into(),
        output_key: output_key.into(),
        presence,
        schema,
    }
}

fn same_key(key: impl Into<String>, presence: FieldPresence, schema: ValueSchema) -> FieldSchema {
    let key = key.into();
    field(key.clone(), key, presence, schema)
}

pub fn required(key: impl Into<String>) -> FieldSchema {
    same_key(key, FieldPresence::Required, any_value())
}

pub fn required_of(key: impl Into<String>, schema: ValueSchema) -> FieldSchema {
    same_key(key, FieldPresence::Required, schema)
}

pub fn defaulted(key: impl Into<String>, fallback: impl Into<Value>) -> FieldSchema {
    same_key(key, FieldPresence::Defaulted(fallback.into()), any_value())
}

pub fn defaulted_of(
    key: impl Into<String>,
    fallback: impl Into<Value>,
    schema: ValueSchema,
) -> FieldSchema {
    same_key(key, FieldPresence::Defaulted(fallback.into()), schema)
}

/// Defaulted field whose fallback depends on the rest of the input.
pub fn defaulted_thunk(
    key: impl Into<String>,
    thunk: impl Fn(&Map<String, Value>) -> Value + 'static,
) -> FieldSchema {
    same_key(key, FieldPresence::DefaultedThunk(Rc::new(thunk)), any_value())
}

pub fn option(key: impl Into<String>) -> FieldSchema {
    same_key(key, FieldPresence::AsOption, any_value())
}

pub fn option_of(key: impl Into<String>, schema: ValueSchema) -> FieldSchema {
    same_key(key, FieldPresence::AsOption, schema)
}

/// Optional field where `true` means "use the computed fallback".
pub fn defaulted_option(
    key: impl Into<String>,
    thunk: impl Fn(&Map<String, Value>) -> Value + 'static,
    schema: ValueSchema,
) -> FieldSchema {
    same_key(key, FieldPresence::AsDefaultedOption(Rc::new(thunk)), schema)
}

pub fn merge_with(key: impl Into<String>, base: Value, schema: ValueSchema) -> FieldSchema {
    same_key(key, FieldPresence::MergeWith(base), schema)
}

/// Computed output, never read from the input.
pub fn state(
    output_key: impl Into<String>,
    instantiator: impl Fn(&Map<String, Value>) -> Value + 'static,
) -> FieldSchema {
    FieldSchema::State {
        output_key: output_key.into(),
        instantiator: Rc::new(instantiator),
    }
}

// ===========================================================================
// Tests
// ===========================================================================
