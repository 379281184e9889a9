//! Value schemas: scalars, objects, arrays, open-keyed sets, and variants.

use std::fmt;
use std::rc::Rc;

use serde_json::{Map, Value};

use super::error::{SchemaError, SchemaErrorKind};
use super::field::FieldSchema;

/// Validates (and may normalize) a single scalar value.
pub type Predicate = Rc<dyn Fn(&Value) -> Result<Value, String>>;

/// A schema for one JSON value.
#[derive(Clone)]
pub enum ValueSchema {
    /// Accepts anything unchanged.
    Any,
    /// Custom scalar check.
    Value { expected: String, check: Predicate },
    /// Object with declared fields. `strict` rejects undeclared keys.
    Object { fields: Vec<FieldSchema>, strict: bool },
    /// Every element validated; all element failures reported.
    Array(Box<ValueSchema>),
    /// Object with arbitrary keys; every value validated.
    SetOf(Box<ValueSchema>),
    /// Discriminated variant chosen by the value at `key`.
    Choose {
        key: String,
        branches: Vec<(String, Vec<FieldSchema>)>,
    },
}

impl fmt::Debug for ValueSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

impl ValueSchema {
    /// Short structural description, used in diagnostics.
    pub fn describe(&self) -> String {
        match self {
            Self::Any => "anyValue()".to_owned(),
            Self::Value { expected, .. } => format!("value({expected})"),
            Self::Object { fields, strict } => {
                let keys: Vec<&str> = fields.iter().map(FieldSchema::output_key).collect();
                let name = if *strict { "objOfOnly" } else { "objOf" };
                format!("{name}({})", keys.join(", "))
            }
            Self::Array(inner) => format!("array({})", inner.describe()),
            Self::SetOf(inner) => format!("setOf({})", inner.describe()),
            Self::Choose { key, branches } => {
                let names: Vec<&str> = branches.iter().map(|(n, _)| n.as_str()).collect();
                format!("chooseOn({key}, [{}])", names.join(", "))
            }
        }
    }

    /// Validate `input`. On failure, every collected error is returned.
    pub fn extract(&self, path: &[String], input: &Value) -> Result<Value, Vec<SchemaError>> {
        match self {
            Self::Any => Ok(input.clone()),
            Self::Value { expected, check } => check(input).map_err(|message| {
                let kind = if message.is_empty() {
                    SchemaErrorKind::WrongType {
                        expected: expected.clone(),
                        actual: type_name(input).to_owned(),
                    }
                } else {
                    SchemaErrorKind::Custom(message)
                };
                vec![SchemaError::new(path, kind)]
            }),
            Self::Object { fields, strict } => {
                let obj = expect_object(path, input)?;
                if *strict {
                    let unsupported: Vec<String> = obj
                        .keys()
                        .filter(|k| !fields.iter().any(|f| f.key() == Some(k.as_str())))
                        .cloned()
                        .collect();
                    if !unsupported.is_empty() {
                        return Err(vec![SchemaError::new(
                            path,
                            SchemaErrorKind::UnsupportedFields {
                                fields: unsupported,
                            },
                        )]);
                    }
                }
                extract_fields(path, fields, obj)
            }
            Self::Array(inner) => {
                let items = match input {
                    Value::Array(items) => items,
                    other => return Err(wrong_type(path, "array", other)),
                };
                let mut out = Vec::with_capacity(items.len());
                let mut errors = Vec::new();
                for (i, item) in items.iter().enumerate() {
                    let mut item_path = path.to_vec();
                    item_path.push(format!("[{i}]"));
                    match inner.extract(&item_path, item) {
                        Ok(v) => out.push(v),
                        Err(mut errs) => errors.append(&mut errs),
                    }
                }
                if errors.is_empty() {
                    Ok(Value::Array(out))
                } else {
                    Err(errors)
                }
            }
            Self::SetOf(inner) => {
                let obj = expect_object(path, input)?;
                let mut out = Map::new();
                let mut errors = Vec::new();
                for (k, v) in obj {
                    let mut item_path = path.to_vec();
                    item_path.push(k.clone());
                    match inner.extract(&item_path, v) {
                        Ok(value) => {
                            out.insert(k.clone(), value);
                        }
                        Err(mut errs) => errors.append(&mut errs),
                    }
                }
                if errors.is_empty() {
                    Ok(Value::Object(out))
                } else {
                    Err(errors)
                }
            }
            Self::Choose { key, branches } => {
                let obj = expect_object(path, input)?;
                let chosen = match obj.get(key).and_then(Value::as_str) {
                    Some(chosen) => chosen,
                    None => {
                        let mut key_path = path.to_vec();
                        key_path.push(key.clone());
                        return Err(vec![SchemaError::new(
                            &key_path,
                            SchemaErrorKind::MissingField { key: key.clone() },
                        )]);
                    }
                };
                let Some((_, fields)) = branches.iter().find(|(name, _)| name == chosen) else {
                    return Err(vec![SchemaError::new(
                        path,
                        SchemaErrorKind::MissingBranch {
                            branch: chosen.to_owned(),
                            available: branches.iter().map(|(n, _)| n.clone()).collect(),
                        },
                    )]);
                };
                let mut branch_path = path.to_vec();
                branch_path.push(format!("branch: {chosen}"));
                let mut out = extract_fields(&branch_path, fields, obj)?;
                if let Value::Object(map) = &mut out {
                    map.insert(key.clone(), Value::String(chosen.to_owned()));
                }
                Ok(out)
            }
        }
    }
}

fn extract_fields(
    path: &[String],
    fields: &[FieldSchema],
    obj: &Map<String, Value>,
) -> Result<Value, Vec<SchemaError>> {
    let mut out = Map::new();
    let mut errors = Vec::new();
    for f in fields {
        f.extract(path, obj, &mut out, &mut errors);
    }
    if errors.is_empty() {
        Ok(Value::Object(out))
    } else {
        Err(errors)
    }
}

fn expect_object<'a>(
    path: &[String],
    input: &'a Value,
) -> Result<&'a Map<String, Value>, Vec<SchemaError>> {
    match input {
        Value::Object(obj) => Ok(obj),
        other => Err(wrong_type(path, "object", other)),
    }
}

fn wrong_type(path: &[String], expected: &str, actual: &Value) -> Vec<SchemaError> {
    vec![SchemaError::new(
        path,
        SchemaErrorKind::WrongType {
            expected: expected.to_owned(),
            actual: type_name(actual).to_owned(),
        },
    )]
}

/// JSON type name used in error messages.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ---------------------------------------------------------------------------
// Constructors
// ---------------------------------------------------------------------------

pub fn any_value() -> ValueSchema {
    ValueSchema::Any
}

/// Scalar check. Return `Err(String::new())` for a plain type mismatch, or
/// `Err(message)` for a custom failure.
pub fn value(
    expected: impl Into<String>,
    check: impl Fn(&Value) -> Result<Value, String> + 'static,
) -> ValueSchema {
    ValueSchema::Value {
        expected: expected.into(),
        check: Rc::new(check),
    }
}

fn of_type(expected: &'static str, accept: fn(&Value) -> bool) -> ValueSchema {
    value(expected, move |v| {
        if accept(v) {
            Ok(v.clone())
        } else {
            Err(String::new())
        }
    })
}

pub fn string() -> ValueSchema {
    of_type("string", Value::is_string)
}

pub fn number() -> ValueSchema {
    of_type("number", Value::is_number)
}

pub fn boolean() -> ValueSchema {
    of_type("boolean", Value::is_boolean)
}

/// A string restricted to one of `values`.
pub fn string_enum(values: &[&str]) -> ValueSchema {
    let allowed: Vec<String> = values.iter().map(|v| (*v).to_owned()).collect();
    let expected = format!("one of [{}]", allowed.join(", "));
    value(expected, move |v| match v.as_str() {
        Some(s) if allowed.iter().any(|a| a == s) => Ok(v.clone()),
        Some(s) => Err(format!(
            "Value \"{s}\" is not one of [{}]",
            allowed.join(", ")
        )),
        None => Err(String::new()),
    })
}

pub fn obj_of(fields: Vec<FieldSchema>) -> ValueSchema {
    ValueSchema::Object {
        fields,
        strict: false,
    }
}

pub fn obj_of_only(fields: Vec<FieldSchema>) -> ValueSchema {
    ValueSchema::Object {
        fields,
        strict: true,
    }
}

pub fn arr_of(schema: ValueSchema) -> ValueSchema {
    ValueSchema::Array(Box::new(schema))
}

pub fn arr_of_obj(fields: Vec<FieldSchema>) -> ValueSchema {
    arr_of(obj_of(fields))
}

pub fn set_of(schema: ValueSchema) -> ValueSchema {
    ValueSchema::SetOf(Box::new(schema))
}

pub fn choose_on(key: impl Into<String>, branches: Vec<(&str, Vec<FieldSchema>)>) -> ValueSchema {
    ValueSchema::Choose {
        key: key.into(),
        branches: branches
            .into_iter()
            .map(|(name, fields)| (name.to_owned(), fields))
            .collect(),
    }
}

// ===========================================================================
// Tests
// ===========================================================================
