//! Turning specs into live components.
//!
//! Building is depth-first: children are built (or patched) before their
//! parent's element is rendered, then placed under it. When an obsoleted node
//! is supplied and is compatible with the new definition, the builder patches
//! it in place instead of creating a fresh element.

use serde_json::json;

use super::reconcile::{apply, apply_children, diff, diff_children, DomEdit};
use super::{Component, ComponentId, ComponentKind};
use crate::behaviour::BehaviourSet;
use crate::dom::node::validate_attribute_name;
use crate::dom::{DomError, NodeData, NodeId};
use crate::error::Result;
use crate::event::combine_events;
use crate::event::names::{resolve_event_order, BASE_BEHAVIOUR};
use crate::schema::{SchemaError, SchemaErrorKind, ValidationError};
use crate::spec::uid::{self, ID_ATTR, PREMADE_ATTR};
use crate::spec::{AlloySpec, ComponentSpec, DomDefinition, DomModification};
use crate::world::World;

const SPEC_LABEL: &str = "component.spec";

impl World {
    /// Build a component from scratch.
    pub fn build(&mut self, spec: impl Into<AlloySpec>) -> Result<ComponentId> {
        self.build_or_patch(spec, None)
    }

    /// Build a component, reusing `obsoleted` as its element when it can be
    /// patched into shape.
    ///
    /// A reused element keeps its place in the DOM. The component that
    /// previously owned it, and any of that component's descendants not
    /// carried over, are retired.
    pub fn build_or_patch(
        &mut self,
        spec: impl Into<AlloySpec>,
        obsoleted: Option<NodeId>,
    ) -> Result<ComponentId> {
        match spec.into() {
            AlloySpec::Premade(id) => {
                self.component(id)?;
                Ok(id)
            }
            AlloySpec::Text(text) => Ok(self.build_text(text)),
            AlloySpec::External { element, uid } => self.build_external(element, uid),
            AlloySpec::Sketch(spec) => self.build_sketch(*spec, obsoleted),
        }
    }

    /// Mark a built component as premade so it can be embedded in another
    /// spec. Its element is never patched over.
    pub fn premade(&mut self, component: ComponentId) -> Result<AlloySpec> {
        let (element, uid) = {
            let c = self.component(component)?;
            (c.element, c.uid.clone())
        };
        self.dom.element_mut(element)?.set_attribute(PREMADE_ATTR, uid)?;
        Ok(AlloySpec::Premade(component))
    }

    fn build_text(&mut self, text: String) -> ComponentId {
        let element = self.dom.create(NodeData::text(text));
        let id = self.components.insert(Component::bare(
            uid::generate("text"),
            element,
            ComponentKind::Text,
        ));
        self.by_element.insert(element, id);
        id
    }

    fn build_external(&mut self, element: NodeId, uid: Option<String>) -> Result<ComponentId> {
        if let Some(&existing) = self.by_element.get(element) {
            return Ok(existing);
        }
        let uid = uid.unwrap_or_else(|| uid::generate("external"));
        self.dom
            .element_mut(element)?
            .set_attribute(ID_ATTR, uid.clone())?;
        let id = self
            .components
            .insert(Component::bare(uid, element, ComponentKind::External));
        self.by_element.insert(element, id);
        Ok(id)
    }

    fn build_sketch(
        &mut self,
        spec: ComponentSpec,
        obsoleted: Option<NodeId>,
    ) -> Result<ComponentId> {
        let ComponentSpec {
            uid,
            dom,
            components,
            behaviours: configured,
            events: own_events,
            event_order,
            dom_modification,
            apis,
        } = spec;

        let uid = uid.unwrap_or_else(|| uid::generate("uid"));
        if dom.tag.trim().is_empty() {
            return Err(missing_tag(&uid, &dom.tag).into());
        }

        let behaviours = BehaviourSet::generate(&configured);
        let base = dom_modification.unwrap_or_default();
        let exhibits = behaviours.exhibits();
        let modification = DomModification::combine(std::iter::once(&base).chain(&exhibits));
        let mut definition = DomDefinition::from_spec(uid.clone(), &dom, &modification);
        definition.attributes.insert(ID_ATTR.to_owned(), uid.clone());
        for name in definition.attributes.keys() {
            validate_attribute_name(name)?;
        }

        let mut sources = behaviours.event_sources();
        if !own_events.is_empty() {
            sources.push((BASE_BEHAVIOUR.to_owned(), own_events));
        }
        let events = combine_events(&uid, sources, &resolve_event_order(&event_order))?;

        // Settle on patching before any child touches the old node's subtree.
        let plan = obsoleted
            .filter(|&node| self.is_patchable(node, &definition, !components.is_empty()))
            .and_then(|node| match self.plan_patch(node, &definition) {
                Ok(edits) => Some((node, edits)),
                Err(err) => {
                    tracing::trace!(%uid, %err, "patch rejected, rendering a fresh element");
                    None
                }
            });
        let reusable = plan.as_ref().map(|(node, _)| *node);

        let mut children: Vec<ComponentId> = Vec::with_capacity(components.len());
        for (index, child) in components.into_iter().enumerate() {
            let old = reusable.and_then(|node| self.dom.child(node, index));
            match self.build_or_patch(child, old) {
                Ok(id) => children.push(id),
                Err(err) => {
                    self.dispose_loose(&children);
                    return Err(err);
                }
            }
        }

        let patched = plan.is_some();
        let element = match self.realize(plan, &definition) {
            Ok(element) => element,
            Err(err) => {
                self.dispose_loose(&children);
                return Err(err);
            }
        };

        if patched {
            if let Some(&previous) = self.by_element.get(element) {
                self.retire(previous);
            }
        }

        if let Err(err) = self.place_children(element, patched, &children) {
            if !patched {
                for node in self.dom.children(element).to_vec() {
                    self.dom.detach(node);
                }
                self.dom.remove(element);
            }
            self.dispose_loose(&children);
            return Err(err.into());
        }

        let component = Component {
            uid,
            element,
            kind: ComponentKind::Built,
            definition: Some(definition),
            events,
            behaviours,
            components: children,
            system: None,
            apis,
        };
        let id = self.components.insert(component);
        self.by_element.insert(element, id);
        Ok(id)
    }

    fn is_patchable(&self, node: NodeId, definition: &DomDefinition, has_children: bool) -> bool {
        let Some(data) = self.dom.get(node) else {
            return false;
        };
        data.is_element()
            && data.tag == definition.tag
            && !data.has_attribute(PREMADE_ATTR)
            && !(definition.inner_html.is_some() && has_children)
    }

    /// The edits that turn `node` into `definition`, or why it cannot be
    /// patched.
    fn plan_patch(
        &self,
        node: NodeId,
        definition: &DomDefinition,
    ) -> std::result::Result<Vec<DomEdit>, DomError> {
        let current = self.dom.get(node).ok_or(DomError::MissingNode)?;
        if !current.is_element() {
            return Err(DomError::NotAnElement);
        }
        Ok(diff(definition, current))
    }

    /// Apply a patch plan, or render a fresh element without one.
    fn realize(
        &mut self,
        plan: Option<(NodeId, Vec<DomEdit>)>,
        definition: &DomDefinition,
    ) -> Result<NodeId> {
        match plan {
            Some((node, edits)) => {
                apply(&mut self.dom, node, &edits)?;
                Ok(node)
            }
            None => self.render_element(definition),
        }
    }

    fn place_children(
        &mut self,
        element: NodeId,
        patched: bool,
        children: &[ComponentId],
    ) -> std::result::Result<(), DomError> {
        let child_nodes: Vec<NodeId> = children
            .iter()
            .filter_map(|&id| self.components.get(id).map(|c| c.element))
            .collect();
        if patched {
            let edits = diff_children(&self.dom, element, &child_nodes);
            for node in apply_children(&mut self.dom, element, &edits)? {
                self.release_node(node);
            }
        } else {
            for node in child_nodes {
                self.dom.append_child(element, node)?;
            }
        }
        Ok(())
    }

    fn render_element(&mut self, definition: &DomDefinition) -> Result<NodeId> {
        let mut data = NodeData::element(definition.tag.as_str());
        for class in &definition.classes {
            data.add_class(class);
        }
        for (name, value) in &definition.attributes {
            data.set_attribute(name, value.clone())?;
        }
        for (name, value) in &definition.styles {
            data.set_style(name, value.clone());
        }
        data.text = definition.inner_html.clone();
        data.value = definition.value.clone();
        Ok(self.dom.create(data))
    }

    /// Free the children built for a component that failed to assemble.
    fn dispose_loose(&mut self, children: &[ComponentId]) {
        for &id in children {
            if self.is_loose(id) {
                self.dispose(id);
            }
        }
    }

    /// A freshly built child that has not been placed anywhere yet.
    fn is_loose(&self, id: ComponentId) -> bool {
        self.components
            .get(id)
            .is_some_and(|c| self.dom.parent(c.element).is_none())
    }

    /// Drop a component replaced by a patch, along with the descendants it
    /// still holds. Premade descendants and DOM nodes are left alone.
    fn retire(&mut self, id: ComponentId) {
        let Some(component) = self.components.remove(id) else {
            return;
        };
        if self.by_element.get(component.element) == Some(&id) {
            self.by_element.remove(component.element);
        }
        if let Some(system) = component.system {
            self.unregister_uid(system, &component.uid, id);
        }
        for child in component.components {
            let premade = self
                .components
                .get(child)
                .and_then(|c| self.dom.get(c.element))
                .is_some_and(|d| d.has_attribute(PREMADE_ATTR));
            if !premade {
                self.retire(child);
            }
        }
    }

    /// Free a node displaced by a patch unless a live component still owns
    /// something inside it.
    fn release_node(&mut self, node: NodeId) {
        let owned = self
            .dom
            .walk_depth_first(node)
            .into_iter()
            .any(|n| self.by_element.contains_key(n));
        if !owned {
            self.dom.remove(node);
        }
    }
}

fn missing_tag(uid: &str, tag: &str) -> ValidationError {
    let path = [SPEC_LABEL.to_owned(), "dom".to_owned(), "tag".to_owned()];
    ValidationError {
        label: SPEC_LABEL.to_owned(),
        errors: vec![SchemaError::new(
            &path,
            SchemaErrorKind::MissingField {
                key: "tag".to_owned(),
            },
        )],
        input: json!({ "uid": uid, "dom": { "tag": tag } }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behaviour::Behaviour;
    use crate::error::AlloyError;
    use crate::behaviours::{Toggling, TogglingConfig};
    use crate::event::names::EXECUTE;
    use crate::event::{run_on_execute, EventHandler};
    use crate::spec::DomSpec;
    use pretty_assertions::assert_eq;

    fn html(world: &World, id: ComponentId) -> String {
        world.outer_html_without_uids(id)
    }

    #[test]
    fn builds_nested_children_in_order() {
        let mut world = World::new();
        let c = world
            .build(
                ComponentSpec::new(DomSpec::tag("ul").with_class("list"))
                    .with_component(ComponentSpec::new(DomSpec::tag("li").with_inner_html("a")))
                    .with_component(ComponentSpec::new(DomSpec::tag("li").with_inner_html("b")))
                    .with_component(AlloySpec::text("tail")),
            )
            .unwrap();
        assert_eq!(
            html(&world, c),
            r#"<ul class="list"><li>a</li><li>b</li>tail</ul>"#
        );
        assert_eq!(world.component(c).unwrap().components().len(), 3);
    }

    #[test]
    fn uid_is_written_to_the_element() {
        let mut world = World::new();
        let c = world
            .build(ComponentSpec::new(DomSpec::tag("div")).with_uid("fixed"))
            .unwrap();
        let el = world.element(c).unwrap();
        assert_eq!(world.dom().get(el).unwrap().attribute(ID_ATTR), Some("fixed"));
        assert_eq!(world.uid(c).unwrap(), "fixed");
    }

    #[test]
    fn generated_uids_differ() {
        let mut world = World::new();
        let a = world.build(ComponentSpec::new(DomSpec::tag("div"))).unwrap();
        let b = world.build(ComponentSpec::new(DomSpec::tag("div"))).unwrap();
        assert_ne!(world.uid(a).unwrap(), world.uid(b).unwrap());
    }

    #[test]
    fn empty_tag_is_a_schema_error() {
        let mut world = World::new();
        let err = world.build(ComponentSpec::new(DomSpec::tag(""))).unwrap_err();
        match err {
            AlloyError::Schema(v) => assert!(v.has_error_at(&["dom", "tag"])),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn behaviour_exhibits_are_layered_over_the_dom() {
        let mut world = World::new();
        let c = world
            .build(
                ComponentSpec::new(DomSpec::tag("button").with_class("btn"))
                    .with_dom_modification(DomModification::new().with_attribute("role", "button"))
                    .with_behaviour(Toggling::config(TogglingConfig {
                        selected: true,
                        toggle_class: Some("on".into()),
                        ..TogglingConfig::default()
                    })),
            )
            .unwrap();
        assert_eq!(
            html(&world, c),
            r#"<button class="btn on" role="button"></button>"#
        );
    }

    #[test]
    fn unordered_event_conflict_fails_the_build() {
        let mut world = World::new();
        let spec = ComponentSpec::new(DomSpec::tag("button"))
            .with_behaviour(Toggling::config(TogglingConfig::default()))
            .with_event(EXECUTE, EventHandler::new())
            .with_event_order(EXECUTE, ["toggling"]);
        let err = world.build(spec).unwrap_err();
        assert!(matches!(err, AlloyError::EventOrder { .. }));
        assert!(err.to_string().contains("alloy.base.behaviour"));
    }

    #[test]
    fn invalid_attribute_name_is_a_dom_error() {
        let mut world = World::new();
        let err = world
            .build(ComponentSpec::new(DomSpec::tag("div").with_attribute("bad name", "x")))
            .unwrap_err();
        assert!(matches!(err, AlloyError::Dom(_)));
    }

    #[test]
    fn rejected_patch_leaves_old_tree_intact() {
        let mut world = World::new();
        let old = world
            .build(
                ComponentSpec::new(DomSpec::tag("div"))
                    .with_component(ComponentSpec::new(DomSpec::tag("span").with_inner_html("old"))),
            )
            .unwrap();
        let old_el = world.element(old).unwrap();
        let old_child = world.component(old).unwrap().components()[0];
        let nodes = world.dom().len();

        let err = world
            .build_or_patch(
                ComponentSpec::new(DomSpec::tag("div").with_attribute("bad name", "x"))
                    .with_component(ComponentSpec::new(DomSpec::tag("span").with_inner_html("new"))),
                Some(old_el),
            )
            .unwrap_err();

        assert!(matches!(err, AlloyError::Dom(DomError::InvalidAttributeName(_))));
        assert_eq!(html(&world, old), "<div><span>old</span></div>");
        assert!(world.contains(old));
        assert!(world.contains(old_child));
        assert_eq!(world.component(old).unwrap().components(), &[old_child]);
        assert_eq!(world.dom().len(), nodes);
    }

    #[test]
    fn rejected_element_frees_its_children() {
        let mut world = World::new();
        let before = world.dom().len();
        let err = world.build(
            ComponentSpec::new(DomSpec::tag("div").with_attribute("a=b", "x"))
                .with_component(ComponentSpec::new(DomSpec::tag("span")))
                .with_component(AlloySpec::text("tail")),
        );
        assert!(err.is_err());
        assert_eq!(world.dom().len(), before);
    }

    #[test]
    fn failed_child_disposes_built_siblings() {
        let mut world = World::new();
        let before = world.dom().len();
        let err = world.build(
            ComponentSpec::new(DomSpec::tag("div"))
                .with_component(ComponentSpec::new(DomSpec::tag("span")))
                .with_component(ComponentSpec::new(DomSpec::tag(""))),
        );
        assert!(err.is_err());
        assert_eq!(world.dom().len(), before);
    }

    #[test]
    fn patch_reuses_compatible_element() {
        let mut world = World::new();
        let first = world
            .build(
                ComponentSpec::new(DomSpec::tag("div").with_class("old"))
                    .with_component(ComponentSpec::new(DomSpec::tag("span").with_inner_html("x")))
                    .with_component(ComponentSpec::new(DomSpec::tag("i"))),
            )
            .unwrap();
        let old_el = world.element(first).unwrap();
        let old_span = world.dom().child(old_el, 0).unwrap();

        let second = world
            .build_or_patch(
                ComponentSpec::new(DomSpec::tag("div").with_class("new"))
                    .with_component(ComponentSpec::new(DomSpec::tag("span").with_inner_html("y"))),
                Some(old_el),
            )
            .unwrap();

        assert_eq!(world.element(second).unwrap(), old_el);
        assert_eq!(world.dom().child(old_el, 0), Some(old_span));
        assert_eq!(html(&world, second), r#"<div class="new"><span>y</span></div>"#);
        assert!(world.component(first).is_err());
    }

    #[test]
    fn patch_matches_fresh_render() {
        let make = || {
            ComponentSpec::new(DomSpec::tag("section").with_attribute("role", "region"))
                .with_component(ComponentSpec::new(DomSpec::tag("p").with_inner_html("one")))
                .with_component(AlloySpec::text("two"))
        };
        let mut world = World::new();
        let fresh = world.build(make()).unwrap();
        let old = world
            .build(
                ComponentSpec::new(DomSpec::tag("section").with_class("stale"))
                    .with_component(ComponentSpec::new(DomSpec::tag("h1"))),
            )
            .unwrap();
        let old_el = world.element(old).unwrap();
        let patched = world.build_or_patch(make(), Some(old_el)).unwrap();
        assert_eq!(html(&world, patched), html(&world, fresh));
    }

    #[test]
    fn different_tag_renders_fresh() {
        let mut world = World::new();
        let old = world.build(ComponentSpec::new(DomSpec::tag("div"))).unwrap();
        let old_el = world.element(old).unwrap();
        let new = world
            .build_or_patch(ComponentSpec::new(DomSpec::tag("span")), Some(old_el))
            .unwrap();
        assert_ne!(world.element(new).unwrap(), old_el);
        assert!(world.component(old).is_ok());
    }

    #[test]
    fn premade_is_embedded_not_patched() {
        let mut world = World::new();
        let inner = world.build(ComponentSpec::new(DomSpec::tag("span"))).unwrap();
        let premade = world.premade(inner).unwrap();
        let outer = world
            .build(ComponentSpec::new(DomSpec::tag("div")).with_component(premade))
            .unwrap();
        assert_eq!(world.component(outer).unwrap().components(), &[inner]);
        let inner_el = world.element(inner).unwrap();
        assert!(world.dom().get(inner_el).unwrap().has_attribute(PREMADE_ATTR));

        let replacement = world
            .build_or_patch(ComponentSpec::new(DomSpec::tag("span")), Some(inner_el))
            .unwrap();
        assert_ne!(world.element(replacement).unwrap(), inner_el);
    }

    #[test]
    fn external_wraps_existing_node() {
        let mut world = World::new();
        let node = world.dom_mut().create(NodeData::element("canvas"));
        let c = world.build(AlloySpec::external_with_uid(node, "ext")).unwrap();
        assert_eq!(world.element(c).unwrap(), node);
        assert_eq!(world.component(c).unwrap().kind(), ComponentKind::External);
        assert!(world.component(c).unwrap().events().is_empty());
        assert_eq!(world.dom().get(node).unwrap().attribute(ID_ATTR), Some("ext"));
    }

    #[test]
    fn own_events_are_kept() {
        let mut world = World::new();
        let c = world
            .build({
                let (name, handler) = run_on_execute(|_, _, _| {});
                ComponentSpec::new(DomSpec::tag("button")).with_event(name, handler)
            })
            .unwrap();
        assert!(world.component(c).unwrap().has_handler(EXECUTE));
    }
}
