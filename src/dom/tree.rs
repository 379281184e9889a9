//! Tree operations: create, append, insert-before, replace, detach, remove, walk.

use std::collections::VecDeque;

use slotmap::{SecondaryMap, SlotMap};

use super::error::DomError;
use super::node::{NodeData, NodeId};

/// Empty slice constant for returning when a node has no children.
const EMPTY_CHILDREN: &[NodeId] = &[];

/// The retained document, backed by a slotmap arena.
///
/// All nodes live in a single `SlotMap`. Parent/child relationships are stored
/// in secondary maps so that node removal is O(subtree size) and lookup is O(1).
/// A node created with [`Dom::create`] is detached until it is appended
/// somewhere; only nodes under [`Dom::body`] are "in the document".
pub struct Dom {
    pub(crate) nodes: SlotMap<NodeId, NodeData>,
    children: SecondaryMap<NodeId, Vec<NodeId>>,
    parent: SecondaryMap<NodeId, NodeId>,
    body: NodeId,
}

impl Dom {
    /// Create a document containing only an empty `<body>`.
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let body = nodes.insert(NodeData::element("body"));
        let mut children = SecondaryMap::new();
        children.insert(body, Vec::new());
        Self {
            nodes,
            children,
            parent: SecondaryMap::new(),
            body,
        }
    }

    /// The document body. Never removed.
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Create a detached node.
    pub fn create(&mut self, data: NodeData) -> NodeId {
        let id = self.nodes.insert(data);
        self.children.insert(id, Vec::new());
        id
    }

    /// Create a node and append it to `parent`.
    pub fn insert_child(&mut self, parent: NodeId, data: NodeData) -> Result<NodeId, DomError> {
        self.ensure_element(parent)?;
        let id = self.create(data);
        self.append_child(parent, id)?;
        Ok(id)
    }

    /// Move `child` to the end of `parent`'s children, detaching it from its
    /// previous parent first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.check_insert(parent, child)?;
        self.detach(child);
        self.parent.insert(child, parent);
        self.children_mut(parent)?.push(child);
        Ok(())
    }

    /// Move `child` directly before `reference`, which must be a child of
    /// `parent`.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: NodeId,
    ) -> Result<(), DomError> {
        self.check_insert(parent, child)?;
        if child == reference {
            return Ok(());
        }
        if self.parent(reference) != Some(parent) {
            return Err(DomError::NotAChild);
        }
        self.detach(child);
        let siblings = self.children_mut(parent)?;
        let index = siblings
            .iter()
            .position(|&c| c == reference)
            .ok_or(DomError::NotAChild)?;
        siblings.insert(index, child);
        self.parent.insert(child, parent);
        Ok(())
    }

    /// Put `new_child` where `old_child` is and detach `old_child`.
    pub fn replace_child(
        &mut self,
        parent: NodeId,
        new_child: NodeId,
        old_child: NodeId,
    ) -> Result<(), DomError> {
        if new_child == old_child {
            return Ok(());
        }
        self.insert_before(parent, new_child, old_child)?;
        self.detach(old_child);
        Ok(())
    }

    /// Unlink a node from its parent. The node and its subtree stay alive.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(old_parent) = self.parent.remove(id) {
            if let Some(siblings) = self.children.get_mut(old_parent) {
                siblings.retain(|&child| child != id);
            }
        }
    }

    /// Remove a node and all its descendants recursively.
    ///
    /// Returns the `NodeData` for the removed node, or `None` if it didn't
    /// exist. The body cannot be removed.
    pub fn remove(&mut self, id: NodeId) -> Option<NodeData> {
        if !self.nodes.contains_key(id) || id == self.body {
            return None;
        }
        self.detach(id);

        let mut to_remove = VecDeque::new();
        to_remove.push_back(id);
        let mut removed_root_data = None;

        while let Some(current) = to_remove.pop_front() {
            if let Some(kids) = self.children.remove(current) {
                for &child in &kids {
                    to_remove.push_back(child);
                }
            }
            self.parent.remove(current);
            let data = self.nodes.remove(current);
            if current == id {
                removed_root_data = data;
            }
        }

        removed_root_data
    }

    /// Get the parent of a node, if it has one.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parent.get(id).copied()
    }

    /// Get the children of a node. Returns an empty slice if the node has no
    /// children or does not exist.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.children
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(EMPTY_CHILDREN)
    }

    /// The child at `index`, if any.
    pub fn child(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.children(id).get(index).copied()
    }

    /// Position of `id` among its siblings.
    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&c| c == id)
    }

    /// Walk from `id` up to the topmost ancestor.
    ///
    /// The returned vec does **not** include `id` itself; it starts with the
    /// immediate parent.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut current = id;
        while let Some(p) = self.parent.get(current).copied() {
            result.push(p);
            current = p;
        }
        result
    }

    /// Whether `ancestor` is `id` or one of its ancestors.
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        id == ancestor || self.ancestors(id).contains(&ancestor)
    }

    /// Whether the node is attached under the body.
    pub fn in_document(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id) && self.is_inclusive_ancestor(self.body, id)
    }

    /// Immutable access to a node's data.
    pub fn get(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id)
    }

    /// Mutable access to a node's data.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.nodes.get_mut(id)
    }

    /// Mutable access to an element's data.
    pub fn element_mut(&mut self, id: NodeId) -> Result<&mut NodeData, DomError> {
        let data = self.nodes.get_mut(id).ok_or(DomError::MissingNode)?;
        if data.is_element() {
            Ok(data)
        } else {
            Err(DomError::NotAnElement)
        }
    }

    /// Number of nodes in the arena, detached ones included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena holds nothing but the body.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Whether the arena contains a node with the given id.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Pre-order depth-first traversal starting from `start`.
    pub fn walk_depth_first(&self, start: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if !self.nodes.contains_key(current) {
                continue;
            }
            result.push(current);
            // Push children in reverse so the first child is visited first.
            for &child in self.children(current).iter().rev() {
                stack.push(child);
            }
        }
        result
    }

    /// Breadth-first traversal starting from `start`.
    pub fn walk_breadth_first(&self, start: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut queue = VecDeque::new();
        queue.push_back(start);
        while let Some(current) = queue.pop_front() {
            if !self.nodes.contains_key(current) {
                continue;
            }
            result.push(current);
            for &child in self.children(current) {
                queue.push_back(child);
            }
        }
        result
    }

    fn ensure_element(&self, id: NodeId) -> Result<(), DomError> {
        match self.nodes.get(id) {
            None => Err(DomError::MissingNode),
            Some(data) if !data.is_element() => Err(DomError::NotAnElement),
            Some(_) => Ok(()),
        }
    }

    fn check_insert(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.ensure_element(parent)?;
        if !self.nodes.contains_key(child) {
            return Err(DomError::MissingNode);
        }
        if child == self.body || self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest);
        }
        Ok(())
    }

    fn children_mut(&mut self, id: NodeId) -> Result<&mut Vec<NodeId>, DomError> {
        self.children.get_mut(id).ok_or(DomError::MissingNode)
    }
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a small test tree:
    /// ```text
    ///       body
    ///      /    \
    ///    a        b
    ///   / \
    ///  c   d
    /// ```
    fn build_tree() -> (Dom, NodeId, NodeId, NodeId, NodeId, NodeId) {
        let mut dom = Dom::new();
        let body = dom.body();
        let a = dom
            .insert_child(body, NodeData::element("div").with_class("left"))
            .unwrap();
        let b = dom
            .insert_child(body, NodeData::element("div").with_class("right"))
            .unwrap();
        let c = dom.insert_child(a, NodeData::element("button")).unwrap();
        let d = dom.insert_child(a, NodeData::element("span")).unwrap();
        (dom, body, a, b, c, d)
    }

    #[test]
    fn new_has_body() {
        let dom = Dom::new();
        assert_eq!(dom.get(dom.body()).unwrap().tag, "body");
        assert!(dom.is_empty());
        assert_eq!(dom.len(), 1);
    }

    #[test]
    fn insert_child_parent_relationship() {
        let (dom, body, a, _b, c, _d) = build_tree();
        assert_eq!(dom.parent(a), Some(body));
        assert_eq!(dom.parent(c), Some(a));
        assert_eq!(dom.parent(body), None);
    }

    #[test]
    fn children_list() {
        let (dom, body, a, b, c, d) = build_tree();
        assert_eq!(dom.children(body), &[a, b]);
        assert_eq!(dom.children(a), &[c, d]);
        assert!(dom.children(c).is_empty());
        assert_eq!(dom.child(a, 1), Some(d));
        assert_eq!(dom.child(a, 2), None);
        assert_eq!(dom.index_of(d), Some(1));
    }

    #[test]
    fn ancestors() {
        let (dom, body, a, _b, c, _d) = build_tree();
        assert_eq!(dom.ancestors(c), vec![a, body]);
        assert!(dom.ancestors(body).is_empty());
    }

    #[test]
    fn created_node_is_detached() {
        let mut dom = Dom::new();
        let n = dom.create(NodeData::element("div"));
        assert!(!dom.in_document(n));
        dom.append_child(dom.body(), n).unwrap();
        assert!(dom.in_document(n));
    }

    #[test]
    fn append_moves_node() {
        let (mut dom, body, a, b, c, _d) = build_tree();
        dom.append_child(b, c).unwrap();
        assert_eq!(dom.parent(c), Some(b));
        assert!(!dom.children(a).contains(&c));
        assert_eq!(dom.ancestors(c), vec![b, body]);
    }

    #[test]
    fn append_rejects_cycles() {
        let (mut dom, body, a, _b, c, _d) = build_tree();
        assert_eq!(dom.append_child(c, a), Err(DomError::HierarchyRequest));
        assert_eq!(dom.append_child(a, a), Err(DomError::HierarchyRequest));
        assert_eq!(dom.append_child(a, body), Err(DomError::HierarchyRequest));
    }

    #[test]
    fn append_to_text_node_fails() {
        let mut dom = Dom::new();
        let t = dom.insert_child(dom.body(), NodeData::text("hi")).unwrap();
        let n = dom.create(NodeData::element("b"));
        assert_eq!(dom.append_child(t, n), Err(DomError::NotAnElement));
    }

    #[test]
    fn insert_before_positions() {
        let (mut dom, _body, a, _b, c, d) = build_tree();
        let e = dom.create(NodeData::element("em"));
        dom.insert_before(a, e, d).unwrap();
        assert_eq!(dom.children(a), &[c, e, d]);
        dom.insert_before(a, d, c).unwrap();
        assert_eq!(dom.children(a), &[d, c, e]);
    }

    #[test]
    fn insert_before_non_child_fails() {
        let (mut dom, _body, a, b, _c, _d) = build_tree();
        let e = dom.create(NodeData::element("em"));
        assert_eq!(dom.insert_before(a, e, b), Err(DomError::NotAChild));
    }

    #[test]
    fn replace_child_keeps_old_alive() {
        let (mut dom, _body, a, _b, c, d) = build_tree();
        let e = dom.create(NodeData::element("em"));
        dom.replace_child(a, e, c).unwrap();
        assert_eq!(dom.children(a), &[e, d]);
        assert!(dom.contains(c));
        assert_eq!(dom.parent(c), None);
    }

    #[test]
    fn remove_subtree() {
        let (mut dom, body, a, b, c, d) = build_tree();
        dom.remove(a);
        assert!(!dom.contains(a));
        assert!(!dom.contains(c));
        assert!(!dom.contains(d));
        assert_eq!(dom.children(body), &[b]);
        assert_eq!(dom.len(), 2);
    }

    #[test]
    fn remove_body_is_refused() {
        let (mut dom, body, ..) = build_tree();
        assert!(dom.remove(body).is_none());
        assert!(dom.contains(body));
    }

    #[test]
    fn remove_nonexistent() {
        let mut dom = Dom::new();
        let id = dom.create(NodeData::element("x"));
        dom.remove(id);
        assert!(dom.remove(id).is_none());
    }

    #[test]
    fn element_mut_rejects_text() {
        let mut dom = Dom::new();
        let t = dom.create(NodeData::text("hi"));
        assert_eq!(dom.element_mut(t).err(), Some(DomError::NotAnElement));
    }

    #[test]
    fn walk_depth_first() {
        let (dom, body, a, b, c, d) = build_tree();
        assert_eq!(dom.walk_depth_first(body), vec![body, a, c, d, b]);
        assert_eq!(dom.walk_depth_first(a), vec![a, c, d]);
    }

    #[test]
    fn walk_breadth_first() {
        let (dom, body, a, b, c, d) = build_tree();
        assert_eq!(dom.walk_breadth_first(body), vec![body, a, b, c, d]);
    }
}
