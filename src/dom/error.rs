//! Recoverable DOM operation failures.

/// A DOM operation was rejected.
///
/// These are the "browser quirk" class of failures: the builder treats them as
/// recoverable during patching and falls back to a fresh render.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("invalid attribute name: {0:?}")]
    InvalidAttributeName(String),
    #[error("node does not exist")]
    MissingNode,
    #[error("node is not an element")]
    NotAnElement,
    #[error("the new child is an ancestor of the parent")]
    HierarchyRequest,
    #[error("reference node is not a child of this parent")]
    NotAChild,
}
