//! HTML serialization, for diagnostics and snapshot tests.

use super::node::{NodeData, NodeId, NodeKind};
use super::tree::Dom;

impl Dom {
    /// Serialize `id` and its subtree.
    pub fn outer_html(&self, id: NodeId) -> String {
        self.outer_html_without(id, &[])
    }

    /// Serialize `id` and its subtree, leaving out the named attributes
    /// (used to strip generated uids from snapshots).
    pub fn outer_html_without(&self, id: NodeId, skip: &[&str]) -> String {
        let mut out = String::new();
        self.write_node(&mut out, id, skip);
        out
    }

    /// Serialize the children of `id` only.
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        if let Some(text) = self.get(id).and_then(|d| d.text.as_deref()) {
            out.push_str(text);
        }
        for &child in self.children(id) {
            self.write_node(&mut out, child, &[]);
        }
        out
    }

    fn write_node(&self, out: &mut String, id: NodeId, skip: &[&str]) {
        let Some(data) = self.get(id) else {
            return;
        };
        match data.kind {
            NodeKind::Text => out.push_str(&escape_text(data.text.as_deref().unwrap_or_default())),
            NodeKind::Comment => {
                out.push_str("<!--");
                out.push_str(data.text.as_deref().unwrap_or_default());
                out.push_str("-->");
            }
            NodeKind::Element => {
                write_open_tag(out, data, skip);
                if let Some(html) = &data.text {
                    out.push_str(html);
                }
                for &child in self.children(id) {
                    self.write_node(out, child, skip);
                }
                out.push_str("</");
                out.push_str(&data.tag);
                out.push('>');
            }
        }
    }
}

fn write_open_tag(out: &mut String, data: &NodeData, skip: &[&str]) {
    out.push('<');
    out.push_str(&data.tag);
    if !data.classes.is_empty() {
        out.push_str(" class=\"");
        out.push_str(&escape_attr(&data.classes.join(" ")));
        out.push('"');
    }
    for (name, value) in &data.attributes {
        if skip.contains(&name.as_str()) {
            continue;
        }
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape_attr(value));
        out.push('"');
    }
    if !data.styles.is_empty() {
        let styles: Vec<String> = data
            .styles
            .iter()
            .map(|(k, v)| format!("{k}: {v};"))
            .collect();
        out.push_str(" style=\"");
        out.push_str(&escape_attr(&styles.join(" ")));
        out.push('"');
    }
    out.push('>');
}

fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;").replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_element_with_everything() {
        let mut dom = Dom::new();
        let b = dom
            .insert_child(
                dom.body(),
                NodeData::element("button")
                    .with_classes(["tox-tbtn", "on"])
                    .with_attribute("type", "button")
                    .with_attribute("aria-pressed", "true")
                    .with_style("width", "10px"),
            )
            .unwrap();
        dom.insert_child(b, NodeData::text("Bold & <b>")).unwrap();
        assert_eq!(
            dom.outer_html(b),
            r#"<button class="tox-tbtn on" aria-pressed="true" type="button" style="width: 10px;">Bold &amp; &lt;b&gt;</button>"#
        );
    }

    #[test]
    fn inner_html_is_raw() {
        let mut dom = Dom::new();
        let mut data = NodeData::element("span");
        data.text = Some("<b>x</b>".into());
        let s = dom.insert_child(dom.body(), data).unwrap();
        assert_eq!(dom.outer_html(s), "<span><b>x</b></span>");
        assert_eq!(dom.inner_html(s), "<b>x</b>");
    }

    #[test]
    fn skips_named_attributes() {
        let mut dom = Dom::new();
        let d = dom.create(
            NodeData::element("div")
                .with_attribute("data-alloy-id", "uid_1")
                .with_attribute("role", "menu"),
        );
        assert_eq!(
            dom.outer_html_without(d, &["data-alloy-id"]),
            r#"<div role="menu"></div>"#
        );
    }

    #[test]
    fn renders_comments() {
        let mut dom = Dom::new();
        let d = dom.create(NodeData::element("div"));
        dom.insert_child(d, NodeData::comment("replace")).unwrap();
        assert_eq!(dom.outer_html(d), "<div><!--replace--></div>");
    }
}
