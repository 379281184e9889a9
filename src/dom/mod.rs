//! DOM arena: slotmap-backed retained document with attribute/class queries.

pub mod error;
pub mod node;
pub mod query;
pub mod render;
pub mod tree;

pub use error::DomError;
pub use node::{NodeData, NodeId, NodeKind};
pub use tree::Dom;
