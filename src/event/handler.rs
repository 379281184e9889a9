//! Event handler descriptors and the helpers that build event maps.
//!
//! An [`EventHandler`] is a `can`/`abort`/`run` triple. All three are optional
//! and default to pass-through: `can` passes, `abort` does not fire, `run`
//! does nothing. Handlers contributed to one event by several sources are
//! fused into one with [`EventHandler::fuse`].

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use super::names;
use super::simulated::SimulatedEvent;
use crate::component::ComponentId;
use crate::world::World;

/// Side-effect-free check on a component and event.
pub type Predicate = Rc<dyn Fn(&World, ComponentId, &SimulatedEvent) -> bool>;

/// A handler body.
pub type Action = Rc<dyn Fn(&mut World, ComponentId, &SimulatedEvent)>;

/// Handlers keyed by event name.
pub type EventMap = BTreeMap<String, EventHandler>;

// ---------------------------------------------------------------------------
// EventHandler
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
pub struct EventHandler {
    can: Option<Predicate>,
    abort: Option<Predicate>,
    run: Option<Action>,
}

impl EventHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// A handler that only runs `f`.
    pub fn from_run(f: impl Fn(&mut World, ComponentId, &SimulatedEvent) + 'static) -> Self {
        Self::new().with_run(f)
    }

    pub fn with_can(
        mut self,
        f: impl Fn(&World, ComponentId, &SimulatedEvent) -> bool + 'static,
    ) -> Self {
        self.can = Some(Rc::new(f));
        self
    }

    pub fn with_abort(
        mut self,
        f: impl Fn(&World, ComponentId, &SimulatedEvent) -> bool + 'static,
    ) -> Self {
        self.abort = Some(Rc::new(f));
        self
    }

    pub fn with_run(mut self, f: impl Fn(&mut World, ComponentId, &SimulatedEvent) + 'static) -> Self {
        self.run = Some(Rc::new(f));
        self
    }

    pub fn can(&self, world: &World, component: ComponentId, event: &SimulatedEvent) -> bool {
        self.can.as_ref().map_or(true, |f| f(world, component, event))
    }

    pub fn abort(&self, world: &World, component: ComponentId, event: &SimulatedEvent) -> bool {
        self.abort
            .as_ref()
            .is_some_and(|f| f(world, component, event))
    }

    pub fn run(&self, world: &mut World, component: ComponentId, event: &SimulatedEvent) {
        if let Some(f) = &self.run {
            f(world, component, event);
        }
    }

    /// Evaluate the triple: a firing `abort` stops the event, otherwise `run`
    /// executes when `can` passes.
    pub fn invoke(&self, world: &mut World, component: ComponentId, event: &SimulatedEvent) {
        if self.abort(world, component, event) {
            event.stop();
        } else if self.can(world, component, event) {
            self.run(world, component, event);
        }
    }

    /// Combine handlers already sorted into execution order.
    ///
    /// `abort` fires if any contributor's abort fires. `run` executes each
    /// contributor whose own `can` passes, in order. `can` passes if any
    /// contributor's does.
    pub fn fuse(handlers: Vec<EventHandler>) -> EventHandler {
        if handlers.len() == 1 {
            return handlers.into_iter().next().unwrap_or_default();
        }
        let handlers: Rc<[EventHandler]> = handlers.into();
        let for_can = Rc::clone(&handlers);
        let for_abort = Rc::clone(&handlers);
        EventHandler::new()
            .with_can(move |w, c, e| for_can.iter().any(|h| h.can(w, c, e)))
            .with_abort(move |w, c, e| for_abort.iter().any(|h| h.abort(w, c, e)))
            .with_run(move |w, c, e| {
                for h in handlers.iter() {
                    if h.can(w, c, e) {
                        h.run(w, c, e);
                    }
                }
            })
    }
}

impl fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHandler")
            .field("can", &self.can.is_some())
            .field("abort", &self.abort.is_some())
            .field("run", &self.run.is_some())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Event map helpers
// ---------------------------------------------------------------------------

/// One `(event name, handler)` entry.
pub type EventEntry = (String, EventHandler);

/// Collect entries into a map. A later entry for the same event replaces an
/// earlier one.
pub fn derive(entries: impl IntoIterator<Item = EventEntry>) -> EventMap {
    entries.into_iter().collect()
}

pub fn run(
    event: impl Into<String>,
    f: impl Fn(&mut World, ComponentId, &SimulatedEvent) + 'static,
) -> EventEntry {
    (event.into(), EventHandler::from_run(f))
}

pub fn run_on_execute(f: impl Fn(&mut World, ComponentId, &SimulatedEvent) + 'static) -> EventEntry {
    run(names::EXECUTE, f)
}

/// Like [`run`], but only when the event targets this component's own
/// element. Lifecycle events bubble, so ancestors would otherwise see every
/// descendant's notification.
pub fn run_on_source(
    event: impl Into<String>,
    f: impl Fn(&mut World, ComponentId, &SimulatedEvent) + 'static,
) -> EventEntry {
    run(event, move |world, component, e| {
        if world.element(component).ok() == Some(e.target()) {
            f(world, component, e);
        }
    })
}

pub fn run_on_init(f: impl Fn(&mut World, ComponentId, &SimulatedEvent) + 'static) -> EventEntry {
    run_on_source(names::SYSTEM_INIT, f)
}

pub fn run_on_attached(f: impl Fn(&mut World, ComponentId, &SimulatedEvent) + 'static) -> EventEntry {
    run_on_source(names::ATTACHED_TO_DOM, f)
}

pub fn run_on_detached(f: impl Fn(&mut World, ComponentId, &SimulatedEvent) + 'static) -> EventEntry {
    run_on_source(names::DETACHED_FROM_DOM, f)
}

pub fn run_on_receive(f: impl Fn(&mut World, ComponentId, &SimulatedEvent) + 'static) -> EventEntry {
    run(names::RECEIVE, f)
}

/// A handler whose only part is a `can` predicate.
pub fn can(
    event: impl Into<String>,
    f: impl Fn(&World, ComponentId, &SimulatedEvent) -> bool + 'static,
) -> EventEntry {
    (event.into(), EventHandler::new().with_can(f))
}

/// A handler whose only part is an `abort` predicate.
pub fn abort(
    event: impl Into<String>,
    f: impl Fn(&World, ComponentId, &SimulatedEvent) -> bool + 'static,
) -> EventEntry {
    (event.into(), EventHandler::new().with_abort(f))
}

/// Handle the event here without letting it reach ancestors.
pub fn cut(event: impl Into<String>) -> EventEntry {
    run(event, |_, _, e| e.cut())
}

/// Stop the event here.
pub fn stop(event: impl Into<String>) -> EventEntry {
    run(event, |_, _, e| e.stop())
}

/// Re-emit `event` as `target_event` on the same component.
pub fn redirect(event: impl Into<String>, target_event: impl Into<String>) -> EventEntry {
    let target_event = target_event.into();
    run(event, move |world, component, _| {
        world.emit(component, &target_event);
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use crate::spec::{ComponentSpec, DomSpec};
    use crate::event::simulated::EventPayload;

    fn setup() -> (World, ComponentId) {
        let mut world = World::new();
        let c = world
            .build(ComponentSpec::new(DomSpec::tag("div")))
            .unwrap();
        (world, c)
    }

    fn event_for(world: &World, c: ComponentId) -> SimulatedEvent {
        SimulatedEvent::new(world.element(c).unwrap(), EventPayload::None)
    }

    #[test]
    fn defaults_pass_through() {
        let (mut world, c) = setup();
        let h = EventHandler::new();
        let e = event_for(&world, c);
        assert!(h.can(&world, c, &e));
        assert!(!h.abort(&world, c, &e));
        h.invoke(&mut world, c, &e);
        assert!(!e.is_stopped());
    }

    #[test]
    fn abort_stops_without_running() {
        let (mut world, c) = setup();
        let ran = Rc::new(RefCell::new(false));
        let r = Rc::clone(&ran);
        let h = EventHandler::new()
            .with_abort(|_, _, _| true)
            .with_run(move |_, _, _| *r.borrow_mut() = true);
        let e = event_for(&world, c);
        h.invoke(&mut world, c, &e);
        assert!(e.is_stopped());
        assert!(!*ran.borrow());
    }

    #[test]
    fn failing_can_skips_run() {
        let (mut world, c) = setup();
        let ran = Rc::new(RefCell::new(false));
        let r = Rc::clone(&ran);
        let h = EventHandler::new()
            .with_can(|_, _, _| false)
            .with_run(move |_, _, _| *r.borrow_mut() = true);
        let e = event_for(&world, c);
        h.invoke(&mut world, c, &e);
        assert!(!*ran.borrow());
        assert!(!e.is_stopped());
    }

    #[test]
    fn fuse_runs_in_order_respecting_each_can() {
        let (mut world, c) = setup();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mk = |name: &'static str, allowed: bool| {
            let log = Rc::clone(&log);
            EventHandler::new()
                .with_can(move |_, _, _| allowed)
                .with_run(move |_, _, _| log.borrow_mut().push(name))
        };
        let fused = EventHandler::fuse(vec![mk("a", true), mk("b", false), mk("c", true)]);
        let e = event_for(&world, c);
        fused.invoke(&mut world, c, &e);
        assert_eq!(*log.borrow(), vec!["a", "c"]);
    }

    #[test]
    fn fuse_abort_is_any() {
        let (mut world, c) = setup();
        let fused = EventHandler::fuse(vec![
            EventHandler::new(),
            EventHandler::new().with_abort(|_, _, _| true),
        ]);
        let e = event_for(&world, c);
        fused.invoke(&mut world, c, &e);
        assert!(e.is_stopped());
    }

    #[test]
    fn derive_collects_entries() {
        let map = derive([run_on_execute(|_, _, _| {}), cut("keydown"), stop("click")]);
        let keys: Vec<&String> = map.keys().collect();
        assert_eq!(keys, vec!["alloy.execute", "click", "keydown"]);
    }

    #[test]
    fn source_handlers_ignore_descendant_targets() {
        let (mut world, c) = setup();
        let ran = Rc::new(RefCell::new(0));
        let r = Rc::clone(&ran);
        let (_, h) = run_on_init(move |_, _, _| *r.borrow_mut() += 1);
        let own = event_for(&world, c);
        h.invoke(&mut world, c, &own);
        let elsewhere = SimulatedEvent::new(world.dom().body(), EventPayload::None);
        h.invoke(&mut world, c, &elsewhere);
        assert_eq!(*ran.borrow(), 1);
    }

    #[test]
    fn cut_helper_cuts() {
        let (mut world, c) = setup();
        let (_, h) = cut("keydown");
        let e = event_for(&world, c);
        h.invoke(&mut world, c, &e);
        assert!(e.is_cut());
        assert!(!e.is_stopped());
    }
}
