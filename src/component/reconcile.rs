//! Patching an existing element to match a definition.
//!
//! Both diffs are position-based: attributes, classes and styles are compared
//! by name, children by index. There are no keys and no move detection, so a
//! reordering of children shows up as one replacement per moved index. Diffs
//! return explicit edit scripts which [`apply`] and [`apply_children`] then
//! carry out.

use crate::dom::{Dom, DomError, NodeData, NodeId};
use crate::spec::DomDefinition;

/// One change to an element's own data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomEdit {
    SetAttribute(String, String),
    RemoveAttribute(String),
    AddClass(String),
    RemoveClass(String),
    SetStyle(String, String),
    RemoveStyle(String),
    SetInnerHtml(Option<String>),
    SetValue(Option<String>),
}

/// One change to an element's child list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildEdit {
    /// Nothing is at this index yet.
    Append(NodeId),
    /// Put `new` at `index`, displacing `old`.
    ReplaceAt {
        index: usize,
        old: NodeId,
        new: NodeId,
    },
    /// Drop a surplus old child.
    Remove(NodeId),
}

/// Edits that turn `current` into `definition`.
pub fn diff(definition: &DomDefinition, current: &NodeData) -> Vec<DomEdit> {
    let mut edits = Vec::new();

    for name in current.attributes.keys() {
        if !definition.attributes.contains_key(name) {
            edits.push(DomEdit::RemoveAttribute(name.clone()));
        }
    }
    for (name, value) in &definition.attributes {
        if current.attribute(name) != Some(value.as_str()) {
            edits.push(DomEdit::SetAttribute(name.clone(), value.clone()));
        }
    }

    for class in &current.classes {
        if !definition.classes.contains(class) {
            edits.push(DomEdit::RemoveClass(class.clone()));
        }
    }
    let mut added: Vec<&String> = Vec::new();
    for class in &definition.classes {
        if !current.has_class(class) && !added.contains(&class) {
            added.push(class);
            edits.push(DomEdit::AddClass(class.clone()));
        }
    }

    for name in current.styles.keys() {
        if !definition.styles.contains_key(name) {
            edits.push(DomEdit::RemoveStyle(name.clone()));
        }
    }
    for (name, value) in &definition.styles {
        if current.style(name) != Some(value.as_str()) {
            edits.push(DomEdit::SetStyle(name.clone(), value.clone()));
        }
    }

    if definition.inner_html != current.text {
        edits.push(DomEdit::SetInnerHtml(definition.inner_html.clone()));
    }
    if definition.value != current.value {
        edits.push(DomEdit::SetValue(definition.value.clone()));
    }
    edits
}

/// Apply element edits to `id`.
pub fn apply(dom: &mut Dom, id: NodeId, edits: &[DomEdit]) -> Result<(), DomError> {
    let data = dom.element_mut(id)?;
    for edit in edits {
        match edit {
            DomEdit::SetAttribute(name, value) => data.set_attribute(name, value.clone())?,
            DomEdit::RemoveAttribute(name) => data.remove_attribute(name),
            DomEdit::AddClass(class) => data.add_class(class),
            DomEdit::RemoveClass(class) => data.remove_class(class),
            DomEdit::SetStyle(name, value) => data.set_style(name, value.clone()),
            DomEdit::RemoveStyle(name) => data.remove_style(name),
            DomEdit::SetInnerHtml(html) => data.text = html.clone(),
            DomEdit::SetValue(value) => data.value = value.clone(),
        }
    }
    Ok(())
}

/// Child edits that make `parent`'s children exactly `wanted`, by index.
pub fn diff_children(dom: &Dom, parent: NodeId, wanted: &[NodeId]) -> Vec<ChildEdit> {
    let current = dom.children(parent);
    let mut edits = Vec::new();
    for (index, &new) in wanted.iter().enumerate() {
        match current.get(index) {
            Some(&old) if old == new => {}
            Some(&old) => edits.push(ChildEdit::ReplaceAt { index, old, new }),
            None => edits.push(ChildEdit::Append(new)),
        }
    }
    for &old in current.iter().skip(wanted.len()) {
        edits.push(ChildEdit::Remove(old));
    }
    edits
}

/// Apply child edits. Displaced and removed children are detached and
/// returned so the caller can decide whether to free them.
///
/// A replacement first parks a comment marker in front of the old child, so
/// the position survives even when the new child is currently a later sibling
/// of the same parent.
pub fn apply_children(
    dom: &mut Dom,
    parent: NodeId,
    edits: &[ChildEdit],
) -> Result<Vec<NodeId>, DomError> {
    let mut displaced = Vec::new();
    for edit in edits {
        match *edit {
            ChildEdit::Append(new) => dom.append_child(parent, new)?,
            ChildEdit::ReplaceAt { index, old, new } => {
                // `old` may already have moved if it was wanted earlier.
                let anchor = dom.child(parent, index);
                let marker = dom.create(NodeData::comment("alloy-replace"));
                match anchor {
                    Some(anchor) => dom.insert_before(parent, marker, anchor)?,
                    None => dom.append_child(parent, marker)?,
                }
                if dom.parent(old) == Some(parent) && Some(old) == anchor {
                    dom.detach(old);
                    displaced.push(old);
                } else if dom.parent(old).is_none() {
                    displaced.push(old);
                }
                dom.replace_child(parent, new, marker)?;
                dom.remove(marker);
            }
            ChildEdit::Remove(old) => {
                if dom.parent(old) == Some(parent) {
                    dom.detach(old);
                    displaced.push(old);
                }
            }
        }
    }
    // Children displaced by one replacement may be re-used by a later one.
    displaced.retain(|&n| dom.parent(n).is_none());
    displaced.dedup();
    Ok(displaced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use pretty_assertions::assert_eq;

    fn def(classes: &[&str], attrs: &[(&str, &str)]) -> DomDefinition {
        DomDefinition {
            uid: "u".into(),
            tag: "div".into(),
            classes: classes.iter().map(|c| (*c).to_owned()).collect(),
            attributes: attrs
                .iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect(),
            styles: BTreeMap::new(),
            inner_html: None,
            value: None,
        }
    }

    #[test]
    fn diff_identical_is_empty() {
        let node = NodeData::element("div")
            .with_class("a")
            .with_attribute("role", "x");
        assert!(diff(&def(&["a"], &[("role", "x")]), &node).is_empty());
    }

    #[test]
    fn diff_attributes() {
        let node = NodeData::element("div")
            .with_attribute("stale", "1")
            .with_attribute("role", "x");
        let edits = diff(&def(&[], &[("role", "y"), ("new", "2")]), &node);
        assert_eq!(
            edits,
            vec![
                DomEdit::RemoveAttribute("stale".into()),
                DomEdit::SetAttribute("new".into(), "2".into()),
                DomEdit::SetAttribute("role".into(), "y".into()),
            ]
        );
    }

    #[test]
    fn diff_classes_and_styles() {
        let node = NodeData::element("div")
            .with_classes(["keep", "old"])
            .with_style("color", "red");
        let mut d = def(&["keep", "new", "new"], &[]);
        d.styles.insert("width".into(), "1px".into());
        let edits = diff(&d, &node);
        assert_eq!(
            edits,
            vec![
                DomEdit::RemoveClass("old".into()),
                DomEdit::AddClass("new".into()),
                DomEdit::RemoveStyle("color".into()),
                DomEdit::SetStyle("width".into(), "1px".into()),
            ]
        );
    }

    #[test]
    fn diff_inner_html_and_value() {
        let node = NodeData::element("div");
        let mut d = def(&[], &[]);
        d.inner_html = Some("<b>x</b>".into());
        d.value = Some("v".into());
        assert_eq!(
            diff(&d, &node),
            vec![
                DomEdit::SetInnerHtml(Some("<b>x</b>".into())),
                DomEdit::SetValue(Some("v".into())),
            ]
        );
    }

    #[test]
    fn apply_rejects_bad_attribute() {
        let mut dom = Dom::new();
        let n = dom.create(NodeData::element("div"));
        let err = apply(&mut dom, n, &[DomEdit::SetAttribute("bad name".into(), "x".into())]);
        assert_eq!(err, Err(DomError::InvalidAttributeName("bad name".into())));
    }

    #[test]
    fn children_append_replace_remove() {
        let mut dom = Dom::new();
        let p = dom.create(NodeData::element("ul"));
        let a = dom.insert_child(p, NodeData::element("li")).unwrap();
        let b = dom.insert_child(p, NodeData::element("li")).unwrap();
        let c = dom.insert_child(p, NodeData::element("li")).unwrap();
        let x = dom.create(NodeData::element("li"));

        let edits = diff_children(&dom, p, &[a, x]);
        assert_eq!(
            edits,
            vec![
                ChildEdit::ReplaceAt { index: 1, old: b, new: x },
                ChildEdit::Remove(c),
            ]
        );
        let displaced = apply_children(&mut dom, p, &edits).unwrap();
        assert_eq!(dom.children(p), &[a, x]);
        assert_eq!(displaced, vec![b, c]);

        let y = dom.create(NodeData::element("li"));
        let edits = diff_children(&dom, p, &[a, x, y]);
        assert_eq!(edits, vec![ChildEdit::Append(y)]);
        apply_children(&mut dom, p, &edits).unwrap();
        assert_eq!(dom.children(p), &[a, x, y]);
    }

    #[test]
    fn reorder_is_positional() {
        let mut dom = Dom::new();
        let p = dom.create(NodeData::element("ul"));
        let a = dom.insert_child(p, NodeData::element("li")).unwrap();
        let b = dom.insert_child(p, NodeData::element("li")).unwrap();

        let edits = diff_children(&dom, p, &[b, a]);
        assert_eq!(edits.len(), 2);
        let displaced = apply_children(&mut dom, p, &edits).unwrap();
        assert_eq!(dom.children(p), &[b, a]);
        assert!(displaced.is_empty());
        assert!(dom.children(p).iter().all(|&n| dom.get(n).unwrap().is_element()));
    }
}
