//! Snapshot rendering helpers.
//!
//! Functions for turning a component tree and dispatch traces into stable
//! plain text for `insta` snapshots and assertions. Generated uids are left
//! out; explicit uids are kept only where they identify a level of a trace.

use crate::component::ComponentId;
use crate::dom::{Dom, NodeId, NodeKind};
use crate::event::DispatchTrace;
use crate::spec::uid::ID_ATTR;
use crate::world::World;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// One-line html of a component without generated uids.
pub fn html(world: &World, component: ComponentId) -> String {
    world.outer_html_without_uids(component)
}

/// Indented html of a component, one node per line, without uids.
///
/// Each element's open tag sits on its own line with children indented two
/// spaces below it. Text nodes are printed verbatim.
pub fn html_tree(world: &World, component: ComponentId) -> String {
    let Ok(element) = world.element(component) else {
        return String::new();
    };
    let mut lines = Vec::new();
    write_tree(world.dom(), element, 0, &mut lines);
    lines.join("\n")
}

fn write_tree(dom: &Dom, node: NodeId, depth: usize, lines: &mut Vec<String>) {
    let Some(data) = dom.get(node) else {
        return;
    };
    let indent = "  ".repeat(depth);
    match data.kind {
        NodeKind::Element if dom.children(node).is_empty() => {
            lines.push(format!("{indent}{}", dom.outer_html_without(node, &[ID_ATTR])));
        }
        NodeKind::Element => {
            let full = dom.outer_html_without(node, &[ID_ATTR]);
            let open = full.split_inclusive('>').next().unwrap_or_default();
            lines.push(format!("{indent}{open}"));
            for &child in dom.children(node) {
                write_tree(dom, child, depth + 1, lines);
            }
            lines.push(format!("{indent}</{}>", data.tag));
        }
        NodeKind::Text | NodeKind::Comment => {
            lines.push(format!("{indent}{}", dom.outer_html(node)));
        }
    }
}

/// One line per trace: `event: level (outcome) -> level (outcome)`.
pub fn traces_to_string(traces: &[DispatchTrace]) -> String {
    traces
        .iter()
        .map(|trace| {
            let path = trace
                .steps
                .iter()
                .map(|s| format!("{} ({})", s.element, s.outcome))
                .collect::<Vec<_>>()
                .join(" -> ");
            format!("{}: {path}", trace.event)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{TraceOutcome, TraceStep};
    use crate::event::EventLogMode;
    use crate::spec::{AlloySpec, ComponentSpec, DomSpec};

    #[test]
    fn tree_indents_children() {
        let mut world = World::new();
        let c = world
            .build(
                ComponentSpec::new(DomSpec::tag("ul").with_class("list"))
                    .with_component(
                        ComponentSpec::new(DomSpec::tag("li")).with_component(AlloySpec::text("one")),
                    )
                    .with_component(ComponentSpec::new(DomSpec::tag("li"))),
            )
            .unwrap();
        insta::assert_snapshot!(html_tree(&world, c), @r#"
        <ul class="list">
          <li>
            one
          </li>
          <li></li>
        </ul>
        "#);
        assert_eq!(
            html(&world, c),
            r#"<ul class="list"><li>one</li><li></li></ul>"#
        );
    }

    #[test]
    fn unknown_component_renders_empty() {
        let mut world = World::new();
        let c = world.build(ComponentSpec::new(DomSpec::tag("p"))).unwrap();
        world.dispose(c);
        assert_eq!(html_tree(&world, c), "");
    }

    #[test]
    fn traces_render_one_per_line() {
        let trace = DispatchTrace {
            event: "alloy.execute".into(),
            target: "<button>".into(),
            mode: EventLogMode::Logging,
            steps: vec![
                TraceStep {
                    outcome: TraceOutcome::Response,
                    element: "<button>".into(),
                },
                TraceStep {
                    outcome: TraceOutcome::NoParent,
                    element: "<div>".into(),
                },
            ],
        };
        assert_eq!(
            traces_to_string(&[trace]),
            "alloy.execute: <button> (response) -> <div> (no-parent)"
        );
    }
}
