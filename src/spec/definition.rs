//! Resolved DOM descriptions: what a component's element should look like.

use std::collections::BTreeMap;

use super::DomSpec;

/// A contribution to an element's classes, attributes and styles.
///
/// Produced by behaviours (`exhibit`) and by a spec's own `dom_modification`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomModification {
    pub classes: Vec<String>,
    pub attributes: BTreeMap<String, String>,
    pub styles: BTreeMap<String, String>,
}

impl DomModification {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn with_classes(mut self, classes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.classes.extend(classes.into_iter().map(Into::into));
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_style(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.styles.insert(name.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.attributes.is_empty() && self.styles.is_empty()
    }

    /// Layer `other` on top of `self`: classes concatenate without
    /// de-duplication, attributes and styles are overwritten per key.
    pub fn merge(&mut self, other: &DomModification) {
        self.classes.extend(other.classes.iter().cloned());
        self.attributes
            .extend(other.attributes.iter().map(|(k, v)| (k.clone(), v.clone())));
        self.styles
            .extend(other.styles.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    /// Fold a sequence of modifications, earliest first.
    pub fn combine<'a>(mods: impl IntoIterator<Item = &'a DomModification>) -> DomModification {
        mods.into_iter().fold(DomModification::new(), |mut acc, m| {
            acc.merge(m);
            acc
        })
    }
}

/// The fully merged description the builder renders or patches onto.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomDefinition {
    pub uid: String,
    pub tag: String,
    pub classes: Vec<String>,
    pub attributes: BTreeMap<String, String>,
    pub styles: BTreeMap<String, String>,
    pub inner_html: Option<String>,
    pub value: Option<String>,
}

impl DomDefinition {
    /// The spec's own `dom` with `modification` layered on top.
    pub fn from_spec(uid: impl Into<String>, dom: &DomSpec, modification: &DomModification) -> Self {
        let mut classes = dom.classes.clone();
        classes.extend(modification.classes.iter().cloned());
        let mut attributes = dom.attributes.clone();
        attributes.extend(
            modification
                .attributes
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        let mut styles = dom.styles.clone();
        styles.extend(modification.styles.iter().map(|(k, v)| (k.clone(), v.clone())));
        Self {
            uid: uid.into(),
            tag: dom.tag.clone(),
            classes,
            attributes,
            styles,
            inner_html: dom.inner_html.clone(),
            value: dom.value.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn merge_concatenates_classes() {
        let mut a = DomModification::new().with_class("x");
        a.merge(&DomModification::new().with_classes(["x", "y"]));
        assert_eq!(a.classes, vec!["x", "x", "y"]);
    }

    #[test]
    fn merge_later_wins_per_key() {
        let mut a = DomModification::new()
            .with_attribute("role", "button")
            .with_style("color", "red");
        a.merge(
            &DomModification::new()
                .with_attribute("role", "menuitem")
                .with_attribute("aria-pressed", "false"),
        );
        assert_eq!(a.attributes["role"], "menuitem");
        assert_eq!(a.attributes["aria-pressed"], "false");
        assert_eq!(a.styles["color"], "red");
    }

    #[test]
    fn combine_in_order() {
        let first = DomModification::new().with_attribute("k", "1");
        let second = DomModification::new().with_attribute("k", "2");
        assert_eq!(
            DomModification::combine([&first, &second]).attributes["k"],
            "2"
        );
        assert!(DomModification::combine([]).is_empty());
    }

    #[test]
    fn definition_layers_modification_over_dom() {
        let dom = DomSpec::tag("button")
            .with_class("base")
            .with_attribute("role", "button")
            .with_style("width", "1px")
            .with_inner_html("Bold");
        let m = DomModification::new()
            .with_class("on")
            .with_attribute("role", "switch");
        let def = DomDefinition::from_spec("u1", &dom, &m);
        assert_eq!(def.uid, "u1");
        assert_eq!(def.tag, "button");
        assert_eq!(def.classes, vec!["base", "on"]);
        assert_eq!(def.attributes["role"], "switch");
        assert_eq!(def.styles["width"], "1px");
        assert_eq!(def.inner_html.as_deref(), Some("Bold"));
    }
}
