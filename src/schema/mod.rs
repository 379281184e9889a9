//! Runtime validation for specs that arrive as data.
//!
//! Internally constructed specs are shaped by the type system; this module is
//! only used at the JSON boundary ([`crate::spec::decode`] and data-configured
//! behaviours). A schema is a tree of [`ValueSchema`]s whose object nodes hold
//! [`FieldSchema`]s. Validation never stops at the first failure: every
//! path-qualified [`SchemaError`] is collected and [`as_raw`] wraps them into a
//! [`ValidationError`] report.

pub mod error;
pub mod field;
pub mod value;

pub use error::{format_errors, format_obj, SchemaError, SchemaErrorKind, ValidationError};
pub use field::{
    deep_merge, defaulted, defaulted_of, defaulted_option, defaulted_thunk, field, merge_with,
    option, option_of, required, required_of, state, FieldPresence, FieldSchema,
};
pub use value::{
    any_value, arr_of, arr_of_obj, boolean, choose_on, number, obj_of, obj_of_only, set_of,
    string, string_enum, type_name, value, ValueSchema,
};

use serde_json::Value;

/// Validate `input` against `schema`, labelling every error path with `label`.
pub fn as_raw(label: &str, schema: &ValueSchema, input: &Value) -> Result<Value, ValidationError> {
    schema
        .extract(&[label.to_owned()], input)
        .map_err(|errors| ValidationError {
            label: label.to_owned(),
            errors,
            input: input.clone(),
        })
}
