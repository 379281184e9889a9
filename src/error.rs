//! Crate-level error type.

use crate::dom::DomError;
use crate::schema::ValidationError;

/// Errors surfaced by building, attaching and querying components.
#[derive(Debug, thiserror::Error)]
pub enum AlloyError {
    /// A spec or behaviour config failed validation.
    #[error(transparent)]
    Schema(#[from] ValidationError),

    /// A behaviour's API was used on a component that does not configure it.
    #[error("Could not find behaviour \"{behaviour}\" on component \"{uid}\". Configured behaviours: [{}]", .configured.join(", "))]
    MissingBehaviour {
        behaviour: String,
        uid: String,
        configured: Vec<String>,
    },

    /// Contributions to one or more events have no usable execution order.
    #[error("Event ordering problem in component \"{uid}\":\n{}", .problems.join("\n"))]
    EventOrder { uid: String, problems: Vec<String> },

    /// A mutating operation needed a system but the component is detached.
    #[error("The component must be in a context to execute: {operation}\n{html}\nis not in context.")]
    NotInSystem { operation: String, html: String },

    /// A different component is already registered under this uid.
    #[error("Internal error: {uid} is already registered to a different component:\n{existing}\nCannot register:\n{incoming}")]
    DuplicateUid {
        uid: String,
        existing: String,
        incoming: String,
    },

    #[error("Could not find component with uid: {0}")]
    UnknownUid(String),

    #[error("component no longer exists")]
    UnknownComponent,

    /// The Gui was destroyed.
    #[error("system no longer exists")]
    UnknownSystem,

    /// A data spec names a behaviour the registry cannot decode.
    #[error("Unknown behaviour \"{0}\"")]
    UnknownBehaviour(String),

    #[error("DOM error: {0}")]
    Dom(#[from] DomError),

    #[error("Could not decode configuration: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Component \"{uid}\" has no API named \"{name}\"")]
    MissingApi { uid: String, name: String },
}

/// Crate-wide result alias.
pub type Result<T, E = AlloyError> = std::result::Result<T, E>;
