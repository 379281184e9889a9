//! DOM queries: by attribute, class, tag; generic predicate matching.

use super::node::{NodeData, NodeId};
use super::tree::Dom;

impl Dom {
    /// Find the first node whose attribute `name` equals `value`.
    ///
    /// Iterates all nodes in the arena, detached ones included.
    pub fn query_by_attribute(&self, name: &str, value: &str) -> Option<NodeId> {
        self.iter_nodes()
            .find(|(_, data)| data.attribute(name) == Some(value))
            .map(|(node_id, _)| node_id)
    }

    /// Find all nodes that have the given CSS class.
    pub fn query_by_class(&self, class: &str) -> Vec<NodeId> {
        self.query_all(|data| data.has_class(class))
    }

    /// Find all elements with the given tag.
    pub fn query_by_tag(&self, tag: &str) -> Vec<NodeId> {
        self.query_all(|data| data.is_element() && data.tag.eq_ignore_ascii_case(tag))
    }

    /// Find all nodes matching an arbitrary predicate.
    pub fn query_all(&self, predicate: impl Fn(&NodeData) -> bool) -> Vec<NodeId> {
        self.iter_nodes()
            .filter(|(_, data)| predicate(data))
            .map(|(node_id, _)| node_id)
            .collect()
    }

    /// The first node matching `predicate` among `start` and its subtree, in
    /// tree order.
    pub fn descendant(&self, start: NodeId, predicate: impl Fn(&NodeData) -> bool) -> Option<NodeId> {
        self.walk_depth_first(start)
            .into_iter()
            .find(|&id| self.get(id).is_some_and(&predicate))
    }

    /// The nearest inclusive ancestor of `start` matching `predicate`.
    pub fn closest(&self, start: NodeId, predicate: impl Fn(&NodeData) -> bool) -> Option<NodeId> {
        std::iter::once(start)
            .chain(self.ancestors(start))
            .find(|&id| self.get(id).is_some_and(&predicate))
    }

    /// Iterate over all `(NodeId, &NodeData)` pairs in the arena.
    ///
    /// Slotmap insertion order: deterministic but not tree-order.
    fn iter_nodes(&self) -> impl Iterator<Item = (NodeId, &NodeData)> {
        self.nodes.iter()
    }
}
