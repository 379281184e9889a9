//! Node types: NodeId, NodeKind, NodeData.

use std::collections::BTreeMap;

use slotmap::new_key_type;

use super::error::DomError;

new_key_type! {
    /// Unique identifier for a DOM node. Copy, lightweight (u64).
    pub struct NodeId;
}

/// What kind of node this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Element,
    Text,
    /// Placeholder marker, used while replacing a child in place.
    Comment,
}

/// Data associated with a single DOM node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeData {
    pub kind: NodeKind,
    /// Lower-case tag name. Empty for text and comment nodes.
    pub tag: String,
    /// Class list, in insertion order.
    pub classes: Vec<String>,
    /// Attributes other than `class` and `style`.
    pub attributes: BTreeMap<String, String>,
    /// Inline styles.
    pub styles: BTreeMap<String, String>,
    /// Inner html for elements, text content for text and comment nodes.
    pub text: Option<String>,
    /// Form value property. Never rendered as an attribute.
    pub value: Option<String>,
}

impl NodeData {
    fn with_kind(kind: NodeKind, tag: String, text: Option<String>) -> Self {
        Self {
            kind,
            tag,
            classes: Vec::new(),
            attributes: BTreeMap::new(),
            styles: BTreeMap::new(),
            text,
            value: None,
        }
    }

    /// Create an element with the given tag.
    pub fn element(tag: impl Into<String>) -> Self {
        Self::with_kind(NodeKind::Element, tag.into().to_ascii_lowercase(), None)
    }

    /// Create a text node.
    pub fn text(content: impl Into<String>) -> Self {
        Self::with_kind(NodeKind::Text, String::new(), Some(content.into()))
    }

    /// Create a comment node.
    pub fn comment(content: impl Into<String>) -> Self {
        Self::with_kind(NodeKind::Comment, String::new(), Some(content.into()))
    }

    pub fn is_element(&self) -> bool {
        self.kind == NodeKind::Element
    }

    /// Add a single CSS class (builder).
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        if !self.classes.contains(&class) {
            self.classes.push(class);
        }
        self
    }

    /// Add multiple CSS classes (builder).
    pub fn with_classes(mut self, classes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        for class in classes {
            let class = class.into();
            if !self.classes.contains(&class) {
                self.classes.push(class);
            }
        }
        self
    }

    /// Set an attribute (builder). Invalid names are ignored; use
    /// [`NodeData::set_attribute`] to observe the error.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.set_attribute(&name.into(), value);
        self
    }

    /// Set an inline style (builder).
    pub fn with_style(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.styles.insert(name.into(), value.into());
        self
    }

    /// Check whether this node has a given CSS class.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Add a CSS class. No-op if already present.
    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_owned());
        }
    }

    /// Remove a CSS class. No-op if not present.
    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    /// Toggle a CSS class: add if absent, remove if present.
    pub fn toggle_class(&mut self, class: &str) {
        if self.has_class(class) {
            self.remove_class(class);
        } else {
            self.add_class(class);
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Set an attribute, rejecting names a browser would reject.
    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) -> Result<(), DomError> {
        validate_attribute_name(name)?;
        self.attributes.insert(name.to_owned(), value.into());
        Ok(())
    }

    pub fn remove_attribute(&mut self, name: &str) {
        self.attributes.remove(name);
    }

    pub fn style(&self, name: &str) -> Option<&str> {
        self.styles.get(name).map(String::as_str)
    }

    pub fn set_style(&mut self, name: &str, value: impl Into<String>) {
        self.styles.insert(name.to_owned(), value.into());
    }

    pub fn remove_style(&mut self, name: &str) {
        self.styles.remove(name);
    }
}

/// Attribute names must be non-empty and free of whitespace, quotes, `<`,
/// `>`, `/` and `=`.
pub fn validate_attribute_name(name: &str) -> Result<(), DomError> {
    let bad = name.is_empty()
        || name
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '"' | '\'' | '<' | '>' | '/' | '='));
    if bad {
        Err(DomError::InvalidAttributeName(name.to_owned()))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_defaults() {
        let data = NodeData::element("BUTTON");
        assert_eq!(data.kind, NodeKind::Element);
        assert_eq!(data.tag, "button");
        assert!(data.classes.is_empty());
        assert!(data.attributes.is_empty());
        assert!(data.text.is_none());
        assert!(data.value.is_none());
    }

    #[test]
    fn text_and_comment() {
        let t = NodeData::text("hello");
        assert_eq!(t.kind, NodeKind::Text);
        assert_eq!(t.text.as_deref(), Some("hello"));
        assert!(!t.is_element());
        assert_eq!(NodeData::comment("x").kind, NodeKind::Comment);
    }

    #[test]
    fn builder_with_class_dedup() {
        let data = NodeData::element("div").with_class("primary").with_class("primary");
        assert_eq!(data.classes, vec!["primary"]);
    }

    #[test]
    fn builder_with_classes() {
        let data = NodeData::element("div").with_class("a").with_classes(["a", "b"]);
        assert_eq!(data.classes, vec!["a", "b"]);
    }

    #[test]
    fn toggle_class() {
        let mut data = NodeData::element("div");
        data.toggle_class("active");
        assert!(data.has_class("active"));
        data.toggle_class("active");
        assert!(!data.has_class("active"));
    }

    #[test]
    fn remove_class_noop() {
        let mut data = NodeData::element("div");
        data.remove_class("nonexistent");
        assert!(data.classes.is_empty());
    }

    #[test]
    fn attributes_roundtrip() {
        let mut data = NodeData::element("input").with_attribute("type", "text");
        assert_eq!(data.attribute("type"), Some("text"));
        data.remove_attribute("type");
        assert!(!data.has_attribute("type"));
    }

    #[test]
    fn invalid_attribute_names() {
        let mut data = NodeData::element("div");
        for name in ["", "a b", "a=b", "<x", "a\"", "a/b"] {
            assert_eq!(
                data.set_attribute(name, "v"),
                Err(DomError::InvalidAttributeName(name.to_owned()))
            );
        }
        assert!(data.set_attribute("aria-pressed", "true").is_ok());
    }

    #[test]
    fn styles() {
        let mut data = NodeData::element("div").with_style("color", "red");
        assert_eq!(data.style("color"), Some("red"));
        data.set_style("color", "blue");
        assert_eq!(data.style("color"), Some("blue"));
        data.remove_style("color");
        assert!(data.style("color").is_none());
    }

    #[test]
    fn node_id_is_copy() {
        fn assert_copy<T: Copy>() {}
        assert_copy::<NodeId>();
    }
}
