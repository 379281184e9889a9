//! Validation errors: path-qualified [`SchemaError`]s and the aggregated
//! [`ValidationError`] report.
//!
//! A report lists at most ten failures and ends with a pretty JSON dump of the
//! offending input, unless that input is an object with more than a hundred
//! keys.

use std::fmt;

use serde_json::Value;

/// Maximum number of failures rendered in a report.
const MAX_REPORTED_ERRORS: usize = 10;

/// Objects with more keys than this are not dumped into reports.
const MAX_DUMPED_KEYS: usize = 100;

// ---------------------------------------------------------------------------
// SchemaErrorKind
// ---------------------------------------------------------------------------

/// What went wrong at a single path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaErrorKind {
    #[error("Could not find valid *required* value for \"{key}\"")]
    MissingField { key: String },
    #[error("Expected type: {expected} but got: {actual}")]
    WrongType { expected: String, actual: String },
    #[error("There are unsupported fields: [{}] specified", .fields.join(", "))]
    UnsupportedFields { fields: Vec<String> },
    #[error(
        "The chosen schema: \"{branch}\" did not exist in branches: [{}]",
        .available.join(", ")
    )]
    MissingBranch {
        branch: String,
        available: Vec<String>,
    },
    #[error("{0}")]
    Custom(String),
}

// ---------------------------------------------------------------------------
// SchemaError
// ---------------------------------------------------------------------------

/// A single failure, qualified by the field path that led to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaError {
    /// Field-name segments from the top-level label down to the failing value.
    pub path: Vec<String>,
    pub kind: SchemaErrorKind,
}

impl SchemaError {
    pub fn new(path: &[String], kind: SchemaErrorKind) -> Self {
        Self {
            path: path.to_vec(),
            kind,
        }
    }

    /// The path rendered as `a > b > c`.
    pub fn path_string(&self) -> String {
        self.path.join(" > ")
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failed path: ({})\n{}", self.path_string(), self.kind)
    }
}

impl std::error::Error for SchemaError {}

// ---------------------------------------------------------------------------
// ValidationError
// ---------------------------------------------------------------------------

/// Every failure produced while validating one input, plus the input itself.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{}", render_report(.errors, .input))]
pub struct ValidationError {
    pub label: String,
    pub errors: Vec<SchemaError>,
    pub input: Value,
}

impl ValidationError {
    /// Whether any failure's path ends with the given segments.
    pub fn has_error_at(&self, path_suffix: &[&str]) -> bool {
        self.errors.iter().any(|e| {
            e.path.len() >= path_suffix.len()
                && e.path[e.path.len() - path_suffix.len()..]
                    .iter()
                    .zip(path_suffix)
                    .all(|(a, b)| a == b)
        })
    }
}

/// Render each failure, capped at [`MAX_REPORTED_ERRORS`].
pub fn format_errors(errors: &[SchemaError]) -> Vec<String> {
    let mut lines: Vec<String> = errors
        .iter()
        .take(MAX_REPORTED_ERRORS)
        .map(ToString::to_string)
        .collect();
    if errors.len() > MAX_REPORTED_ERRORS {
        lines.push("Failed path: ()\n... (only showing first ten failures)".to_owned());
    }
    lines
}

/// Pretty JSON for diagnostics, or a placeholder for oversized objects.
pub fn format_obj(input: &Value) -> String {
    match input {
        Value::Object(map) if map.len() > MAX_DUMPED_KEYS => " removed due to size".to_owned(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}

fn render_report(errors: &[SchemaError], input: &Value) -> String {
    format!(
        "Errors: \n{}\n\nInput object: {}",
        format_errors(errors).join("\n"),
        format_obj(input)
    )
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn missing(key: &str) -> SchemaError {
        SchemaError::new(
            &["spec".to_owned(), key.to_owned()],
            SchemaErrorKind::MissingField { key: key.to_owned() },
        )
    }

    #[test]
    fn display_includes_path_and_message() {
        let err = missing("tag");
        let text = err.to_string();
        assert!(text.starts_with("Failed path: (spec > tag)"));
        assert!(text.contains("*required* value for \"tag\""));
    }

    #[test]
    fn unsupported_fields_lists_keys() {
        let kind = SchemaErrorKind::UnsupportedFields {
            fields: vec!["a".into(), "b".into()],
        };
        assert_eq!(kind.to_string(), "There are unsupported fields: [a, b] specified");
    }

    #[test]
    fn format_errors_caps_at_ten() {
        let errors: Vec<SchemaError> = (0..12).map(|i| missing(&format!("k{i}"))).collect();
        let lines = format_errors(&errors);
        assert_eq!(lines.len(), 11);
        assert!(lines[10].contains("only showing first ten failures"));
    }

    #[test]
    fn format_errors_under_cap_has_no_note() {
        let errors = vec![missing("a"), missing("b")];
        let lines = format_errors(&errors);
        assert_eq!(lines.len(), 2);
        assert!(!lines.iter().any(|l| l.contains("first ten")));
    }

    #[test]
    fn format_obj_small_is_pretty_json() {
        let dump = format_obj(&json!({"tag": "div"}));
        assert!(dump.contains("\"tag\": \"div\""));
    }

    #[test]
    fn format_obj_large_is_placeholder() {
        let map: serde_json::Map<String, Value> =
            (0..101).map(|i| (format!("k{i}"), json!(i))).collect();
        assert_eq!(format_obj(&Value::Object(map)), " removed due to size");
    }

    #[test]
    fn validation_error_report() {
        let err = ValidationError {
            label: "spec".into(),
            errors: vec![missing("tag")],
            input: json!({}),
        };
        let text = err.to_string();
        assert!(text.starts_with("Errors: \nFailed path: (spec > tag)"));
        assert!(text.ends_with("Input object: {}"));
        assert!(err.has_error_at(&["tag"]));
        assert!(!err.has_error_at(&["uid"]));
    }
}
