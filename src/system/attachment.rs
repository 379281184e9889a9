//! Attaching components to systems and to the document.
//!
//! Two things happen on attach: the component joins a system (registration
//! and `alloy.system.init`), and, if it lands inside the document, it and its
//! descendants are told `alloy.system.attached`. Detach reverses both.
//! Notifications run child before parent in both directions. Attach
//! notifications only fire for nodes in the document; detach notifications
//! always fire.

use super::gui::Gui;
use crate::component::{ComponentId, ComponentKind};
use crate::dom::{Dom, DomError, NodeId};
use crate::error::{AlloyError, Result};
use crate::event::names::{ATTACHED_TO_DOM, DETACHED_FROM_DOM};
use crate::world::World;

fn gui_of(world: &World, parent: ComponentId, operation: &str) -> Result<Gui> {
    let system = world
        .component(parent)?
        .system
        .ok_or_else(|| world.not_in_system(operation, parent))?;
    Gui::for_system(world, system).ok_or(AlloyError::UnknownSystem)
}

/// Append `child` to `parent`'s element and attach it to `parent`'s system.
pub fn attach(world: &mut World, parent: ComponentId, child: ComponentId) -> Result<()> {
    attach_with(world, parent, child, |dom, p, c| dom.append_child(p, c))
}

/// Like [`attach`], placing the child's element with `insert`.
pub fn attach_with(
    world: &mut World,
    parent: ComponentId,
    child: ComponentId,
    insert: impl FnOnce(&mut Dom, NodeId, NodeId) -> std::result::Result<(), DomError>,
) -> Result<()> {
    let gui = gui_of(world, parent, "attach")?;
    let parent_element = world.element(parent)?;
    let child_element = world.element(child)?;
    gui.add_to_world(world, child)?;
    insert(world.dom_mut(), parent_element, child_element)?;
    if world.dom().in_document(parent_element) {
        fire_attaching(world, child);
    }
    world.sync_components(parent)
}

/// Join `parent`'s system without touching the DOM.
pub fn virtual_attach(world: &mut World, parent: ComponentId, child: ComponentId) -> Result<()> {
    let gui = gui_of(world, parent, "virtual_attach")?;
    let parent_element = world.element(parent)?;
    gui.add_to_world(world, child)?;
    if world.dom().in_document(parent_element) {
        fire_attaching(world, child);
    }
    Ok(())
}

/// Take `component` out of the DOM and out of its system.
pub fn detach(world: &mut World, component: ComponentId) -> Result<()> {
    let element = world.element(component)?;
    let parent = world
        .dom()
        .parent(element)
        .and_then(|p| world.get_by_element(p));
    detach_internal(world, component)?;
    if let Some(parent) = parent {
        world.sync_components(parent)?;
    }
    Ok(())
}

/// Leave the system but keep the element where it is.
pub fn virtual_detach(world: &mut World, component: ComponentId) -> Result<()> {
    fire_detaching(world, component);
    disconnect(world, component)
}

/// Detach every child component, then clear the element.
pub fn detach_children(world: &mut World, component: ComponentId) -> Result<()> {
    let children = world.component(component)?.components.clone();
    for child in children {
        detach_internal(world, child)?;
    }
    let element = world.element(component)?;
    let leftovers = world.dom().children(element).to_vec();
    for node in leftovers {
        world.dom_mut().remove(node);
    }
    world.sync_components(component)
}

fn detach_internal(world: &mut World, component: ComponentId) -> Result<()> {
    fire_detaching(world, component);
    let element = world.element(component)?;
    world.dom_mut().detach(element);
    disconnect(world, component)
}

fn disconnect(world: &mut World, component: ComponentId) -> Result<()> {
    match world.component(component)?.system.and_then(|s| Gui::for_system(world, s)) {
        Some(gui) => gui.remove_from_world(world, component),
        None => Ok(()),
    }
}

/// Insert the Gui's root element into `container` and notify the root's
/// children.
pub fn attach_system(world: &mut World, container: NodeId, gui: Gui) -> Result<()> {
    let root = gui.element(world)?;
    world.dom_mut().append_child(container, root)?;
    notify_root_children(world, gui, root);
    Ok(())
}

/// Insert the Gui's root element directly after `marker`.
pub fn attach_system_after(world: &mut World, marker: NodeId, gui: Gui) -> Result<()> {
    let root = gui.element(world)?;
    let parent = world.dom().parent(marker).ok_or(DomError::NotAChild)?;
    let next = world
        .dom()
        .index_of(marker)
        .and_then(|i| world.dom().child(parent, i + 1));
    match next {
        Some(next) => world.dom_mut().insert_before(parent, root, next)?,
        None => world.dom_mut().append_child(parent, root)?,
    }
    notify_root_children(world, gui, root);
    Ok(())
}

fn notify_root_children(world: &mut World, gui: Gui, root: NodeId) {
    let children = world.dom().children(root).to_vec();
    for child in children {
        if let Ok(component) = gui.get_by_dom(world, child) {
            fire_attaching(world, component);
        }
    }
}

/// Notify the root's children and take the root element out of the DOM.
pub fn detach_system(world: &mut World, gui: Gui) -> Result<()> {
    let root = gui.element(world)?;
    let children = world.dom().children(root).to_vec();
    for child in children {
        if let Ok(component) = gui.get_by_dom(world, child) {
            fire_detaching(world, component);
        }
    }
    world.dom_mut().detach(root);
    Ok(())
}

fn fire_attaching(world: &mut World, component: ComponentId) {
    fire(world, component, ATTACHED_TO_DOM);
}

fn fire_detaching(world: &mut World, component: ComponentId) {
    fire(world, component, DETACHED_FROM_DOM);
}

fn fire(world: &mut World, component: ComponentId, event: &str) {
    let Ok(c) = world.component(component) else {
        return;
    };
    if c.kind == ComponentKind::Text || c.system.is_none() {
        return;
    }
    for child in c.components.clone() {
        fire(world, child, event);
    }
    world.emit(component, event);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::event::{run_on_attached, run_on_detached};
    use crate::spec::{AlloySpec, ComponentSpec, DomSpec};
    use crate::system::GuiConfig;
    use pretty_assertions::assert_eq;

    type Log = Rc<RefCell<Vec<String>>>;

    fn tracked(log: &Log, label: &str) -> ComponentSpec {
        let (a, on_attach) = {
            let log = Rc::clone(log);
            let label = format!("attached:{label}");
            run_on_attached(move |_, _, _| log.borrow_mut().push(label.clone()))
        };
        let (d, on_detach) = {
            let log = Rc::clone(log);
            let label = format!("detached:{label}");
            run_on_detached(move |_, _, _| log.borrow_mut().push(label.clone()))
        };
        ComponentSpec::new(DomSpec::tag("div"))
            .with_uid(label)
            .with_event(a, on_attach)
            .with_event(d, on_detach)
    }

    fn family(log: &Log) -> ComponentSpec {
        tracked(log, "parent")
            .with_component(tracked(log, "child"))
            .with_component(AlloySpec::text("text"))
    }

    #[test]
    fn attach_notifies_children_first_when_in_document() {
        let log: Log = Rc::default();
        let mut world = World::new();
        let gui = Gui::create(&mut world, GuiConfig::new()).unwrap();
        let body = world.dom().body();
        attach_system(&mut world, body, gui).unwrap();

        let comp = world.build(family(&log)).unwrap();
        gui.add(&mut world, comp).unwrap();
        assert_eq!(*log.borrow(), vec!["attached:child", "attached:parent"]);
        assert_eq!(world.component(gui.root()).unwrap().components(), &[comp]);
    }

    #[test]
    fn attach_outside_document_registers_without_notifying() {
        let log: Log = Rc::default();
        let mut world = World::new();
        let gui = Gui::create(&mut world, GuiConfig::new()).unwrap();
        let comp = world.build(family(&log)).unwrap();
        gui.add(&mut world, comp).unwrap();
        assert!(log.borrow().is_empty());
        assert!(gui.get_by_uid(&world, "child").is_ok());

        let body = world.dom().body();
        attach_system(&mut world, body, gui).unwrap();
        assert_eq!(*log.borrow(), vec!["attached:child", "attached:parent"]);
    }

    #[test]
    fn duplicate_uid_rolls_the_whole_attach_back() {
        let mut world = World::new();
        let gui = Gui::create(&mut world, GuiConfig::new()).unwrap();
        let taken = world
            .build(ComponentSpec::new(DomSpec::tag("p")).with_uid("taken"))
            .unwrap();
        gui.add(&mut world, taken).unwrap();

        let incoming = world
            .build(
                ComponentSpec::new(DomSpec::tag("section"))
                    .with_uid("incoming")
                    .with_component(ComponentSpec::new(DomSpec::tag("i")).with_uid("fresh"))
                    .with_component(ComponentSpec::new(DomSpec::tag("p")).with_uid("taken")),
            )
            .unwrap();
        let err = attach(&mut world, gui.root(), incoming).unwrap_err();
        assert!(matches!(err, AlloyError::DuplicateUid { ref uid, .. } if uid == "taken"));

        assert!(world.system(incoming).is_err());
        for &child in world.component(incoming).unwrap().components() {
            assert!(world.system(child).is_err());
        }
        assert!(gui.get_by_uid(&world, "incoming").is_err());
        assert!(gui.get_by_uid(&world, "fresh").is_err());
        assert_eq!(gui.get_by_uid(&world, "taken").unwrap(), taken);
        assert_eq!(world.component(gui.root()).unwrap().components(), &[taken]);
        assert!(world.dom().parent(world.element(incoming).unwrap()).is_none());
    }

    #[test]
    fn detach_notifies_children_first_and_unregisters() {
        let log: Log = Rc::default();
        let mut world = World::new();
        let gui = Gui::create(&mut world, GuiConfig::new()).unwrap();
        let comp = world.build(family(&log)).unwrap();
        gui.add(&mut world, comp).unwrap();

        gui.remove(&mut world, comp).unwrap();
        assert_eq!(*log.borrow(), vec!["detached:child", "detached:parent"]);
        assert!(gui.get_by_uid(&world, "parent").is_err());
        assert!(world.component(gui.root()).unwrap().components().is_empty());
        assert!(world.dom().parent(world.element(comp).unwrap()).is_none());
    }

    #[test]
    fn attach_to_detached_parent_fails() {
        let mut world = World::new();
        let parent = world.build(ComponentSpec::new(DomSpec::tag("div"))).unwrap();
        let child = world.build(ComponentSpec::new(DomSpec::tag("p"))).unwrap();
        let err = attach(&mut world, parent, child).unwrap_err();
        assert!(matches!(err, AlloyError::NotInSystem { ref operation, .. } if operation == "attach"));
    }

    #[test]
    fn detach_children_clears_element() {
        let log: Log = Rc::default();
        let mut world = World::new();
        let gui = Gui::create(&mut world, GuiConfig::new()).unwrap();
        let comp = world.build(family(&log)).unwrap();
        gui.add(&mut world, comp).unwrap();

        detach_children(&mut world, comp).unwrap();
        let el = world.element(comp).unwrap();
        assert!(world.dom().children(el).is_empty());
        assert!(world.component(comp).unwrap().components().is_empty());
        assert_eq!(*log.borrow(), vec!["detached:child"]);
    }

    #[test]
    fn virtual_attach_keeps_dom_untouched() {
        let mut world = World::new();
        let gui = Gui::create(&mut world, GuiConfig::new()).unwrap();
        let comp = world
            .build(ComponentSpec::new(DomSpec::tag("aside")).with_uid("floating"))
            .unwrap();
        virtual_attach(&mut world, gui.root(), comp).unwrap();
        assert_eq!(gui.get_by_uid(&world, "floating").unwrap(), comp);
        assert!(world.dom().parent(world.element(comp).unwrap()).is_none());

        virtual_detach(&mut world, comp).unwrap();
        assert!(gui.get_by_uid(&world, "floating").is_err());
    }

    #[test]
    fn detach_system_notifies_and_removes_root() {
        let log: Log = Rc::default();
        let mut world = World::new();
        let gui = Gui::create(&mut world, GuiConfig::new()).unwrap();
        let body = world.dom().body();
        attach_system(&mut world, body, gui).unwrap();
        let comp = world.build(tracked(&log, "only")).unwrap();
        gui.add(&mut world, comp).unwrap();
        log.borrow_mut().clear();

        detach_system(&mut world, gui).unwrap();
        assert_eq!(*log.borrow(), vec!["detached:only"]);
        assert!(!world.dom().in_document(gui.element(&world).unwrap()));
    }
}
