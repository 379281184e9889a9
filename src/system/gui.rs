//! The Gui root: takes over a component tree and routes events through it.

use serde_json::Value;

use super::config::GuiConfig;
use super::native::TapMonitor;
use super::registry::Registry;
use super::{attachment, SystemId};
use crate::component::{ComponentId, ComponentKind};
use crate::dom::NodeId;
use crate::error::{AlloyError, Result};
use crate::event::debug::DispatchLogger;
use crate::event::names::{FOCUS, RECEIVE, SYSTEM_INIT};
use crate::event::trigger::{self, describe, DispatchOutcome, Found};
use crate::event::{DispatchTrace, EventPayload, ReceiveMessage, SimulatedEvent};
use crate::spec::uid::ID_ATTR;
use crate::spec::{ComponentSpec, DomSpec};
use crate::world::World;

/// Per-system data held by the world.
pub(crate) struct GuiState {
    pub(crate) root: ComponentId,
    pub(crate) registry: Registry,
    pub(crate) config: GuiConfig,
    pub(crate) traces: Vec<DispatchTrace>,
    pub(crate) tap: TapMonitor,
    /// Targets with an `alloy.focus` dispatch in progress.
    focusing: Vec<NodeId>,
}

impl GuiState {
    fn new(root: ComponentId, config: GuiConfig) -> Self {
        Self {
            root,
            registry: Registry::new(),
            config,
            traces: Vec::new(),
            tap: TapMonitor::default(),
            focusing: Vec::new(),
        }
    }
}

/// Handle to a Gui root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gui {
    id: SystemId,
    root: ComponentId,
}

impl Gui {
    /// Make `root` the root of a new system, registering it and its
    /// descendants and firing `alloy.system.init` on each.
    pub fn takeover(world: &mut World, root: ComponentId, config: GuiConfig) -> Result<Gui> {
        world.component(root)?;
        let id = world.systems.insert(GuiState::new(root, config));
        let gui = Gui { id, root };
        if let Err(err) = gui.add_to_world(world, root) {
            world.systems.remove(id);
            return Err(err);
        }
        tracing::debug!(uid = %world.uid(root)?, "gui takeover");
        Ok(gui)
    }

    /// Take over a fresh empty `<div>`.
    pub fn create(world: &mut World, config: GuiConfig) -> Result<Gui> {
        let root = world.build(ComponentSpec::new(DomSpec::tag("div")))?;
        Self::takeover(world, root, config)
    }

    pub(crate) fn for_system(world: &World, id: SystemId) -> Option<Gui> {
        world.systems.get(id).map(|s| Gui { id, root: s.root })
    }

    pub fn id(self) -> SystemId {
        self.id
    }

    pub fn root(self) -> ComponentId {
        self.root
    }

    pub fn element(self, world: &World) -> Result<NodeId> {
        world.element(self.root)
    }

    /// Whether the Gui has not been destroyed.
    pub fn is_alive(self, world: &World) -> bool {
        world.systems.contains_key(self.id)
    }

    pub fn config(self, world: &World) -> Option<&GuiConfig> {
        world.systems.get(self.id).map(|s| &s.config)
    }

    fn state_mut(self, world: &mut World) -> Result<&mut GuiState> {
        world.systems.get_mut(self.id).ok_or(AlloyError::UnknownSystem)
    }

    // ── World membership ────────────────────────────────────────────

    /// Connect `component` and its descendants to this system and fire
    /// `alloy.system.init` on each, children before parents. Text components
    /// are connected but never registered.
    ///
    /// On failure the whole subtree is disconnected again.
    pub fn add_to_world(self, world: &mut World, component: ComponentId) -> Result<()> {
        self.connect(world, component).inspect_err(|_| {
            if let Err(err) = self.remove_from_world(world, component) {
                tracing::warn!(%err, "could not roll back a failed add");
            }
        })
    }

    fn connect(self, world: &mut World, component: ComponentId) -> Result<()> {
        let (uid, kind, events, children, previous) = {
            let c = world.component(component)?;
            (
                c.uid.clone(),
                c.kind,
                c.events.keys().cloned().collect::<Vec<_>>(),
                c.components.clone(),
                c.system,
            )
        };
        if let Some(other) = previous.filter(|&s| s != self.id) {
            if let Some(gui) = Gui::for_system(world, other) {
                gui.remove_from_world(world, component)?;
            }
        }
        if kind == ComponentKind::Text {
            world.component_mut(component)?.system = Some(self.id);
            return Ok(());
        }

        if let Err(existing) = self.state_mut(world)?.registry.register(&uid, component, &events) {
            return Err(AlloyError::DuplicateUid {
                uid,
                existing: world.outer_html(existing).unwrap_or_default(),
                incoming: world.outer_html(component).unwrap_or_default(),
            });
        }
        world.component_mut(component)?.system = Some(self.id);
        for child in children {
            self.connect(world, child)?;
        }
        let element = world.element(component)?;
        dispatch(world, self.id, SYSTEM_INIT, element, EventPayload::None);
        Ok(())
    }

    /// Disconnect `component` and its descendants, children first.
    pub fn remove_from_world(self, world: &mut World, component: ComponentId) -> Result<()> {
        let (uid, children) = {
            let c = world.component(component)?;
            (c.uid.clone(), c.components.clone())
        };
        for child in children {
            self.remove_from_world(world, child)?;
        }
        if let Some(state) = world.systems.get_mut(self.id) {
            state.registry.unregister(&uid, component);
        }
        world.component_mut(component)?.system = None;
        Ok(())
    }

    /// Append `component` to the root and attach it.
    pub fn add(self, world: &mut World, component: ComponentId) -> Result<()> {
        attachment::attach(world, self.root, component)
    }

    /// Detach `component` from wherever it is.
    pub fn remove(self, world: &mut World, component: ComponentId) -> Result<()> {
        attachment::detach(world, component)
    }

    // ── Lookup ──────────────────────────────────────────────────────

    pub fn get_by_uid(self, world: &World, uid: &str) -> Result<ComponentId> {
        world
            .systems
            .get(self.id)
            .ok_or(AlloyError::UnknownSystem)?
            .registry
            .get_by_uid(uid)
            .ok_or_else(|| AlloyError::UnknownUid(uid.to_owned()))
    }

    /// The registered component whose element is `node`.
    pub fn get_by_dom(self, world: &World, node: NodeId) -> Result<ComponentId> {
        let uid = world
            .dom()
            .get(node)
            .and_then(|d| d.attribute(ID_ATTR))
            .ok_or_else(|| AlloyError::UnknownUid(describe(world, node)))?;
        self.get_by_uid(world, uid)
    }

    // ── Dispatch ────────────────────────────────────────────────────

    /// Bubble `event` from `target` until stopped or out of handlers.
    pub fn trigger_event(
        self,
        world: &mut World,
        event: &str,
        target: NodeId,
        payload: EventPayload,
    ) -> DispatchOutcome {
        dispatch(world, self.id, event, target, payload)
    }

    /// Run only the nearest handler for `event`, without bubbling.
    pub fn trigger_handler(
        self,
        world: &mut World,
        event: &str,
        target: NodeId,
        payload: EventPayload,
    ) -> DispatchOutcome {
        run(world, self.id, event, target, payload, Reach::Nearest)
    }

    /// Ask for focus on `target`. Components get an `alloy.focus` dispatch;
    /// plain nodes are focused directly.
    pub fn trigger_focus(self, world: &mut World, target: NodeId, originator: NodeId) -> DispatchOutcome {
        if world.get_by_element(target).is_none() {
            world.focused = Some(target);
            return DispatchOutcome::Complete;
        }
        let Some(state) = world.systems.get_mut(self.id) else {
            return DispatchOutcome::Complete;
        };
        if state.focusing.contains(&target) {
            tracing::warn!(target = %describe(world, target), "alloy.focus triggered recursively, ignoring");
            return DispatchOutcome::Complete;
        }
        state.focusing.push(target);
        let outcome = dispatch(world, self.id, FOCUS, target, EventPayload::Focus { originator });
        if let Some(state) = world.systems.get_mut(self.id) {
            state.focusing.retain(|&n| n != target);
        }
        if !outcome.is_stopped() {
            world.focused = Some(target);
        }
        outcome
    }

    /// Send `data` to every receiver.
    pub fn broadcast(self, world: &mut World, data: Value) {
        self.broadcast_event(world, RECEIVE, EventPayload::Receive(ReceiveMessage::universal(data)));
    }

    /// Send `data` to receivers listening on any of `channels`.
    pub fn broadcast_on<I, S>(self, world: &mut World, channels: I, data: Value)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let message = ReceiveMessage::on_channels(channels, data);
        self.broadcast_event(world, RECEIVE, EventPayload::Receive(message));
    }

    /// Invoke every registered handler for `event` directly, without
    /// bubbling. The receivers are fixed before the first one runs.
    pub fn broadcast_event(self, world: &mut World, event: &str, payload: EventPayload) {
        let receivers = match world.systems.get(self.id) {
            Some(state) => state.registry.filter(event),
            None => return,
        };
        for receiver in receivers {
            let Some((element, handler)) = world
                .components
                .get(receiver)
                .and_then(|c| Some((c.element, c.events.get(event)?.clone())))
            else {
                continue;
            };
            let simulated = SimulatedEvent::new(element, payload.clone());
            handler.invoke(world, receiver, &simulated);
        }
    }

    /// Dispatch traces recorded since the last call.
    pub fn take_traces(self, world: &mut World) -> Vec<DispatchTrace> {
        world
            .systems
            .get_mut(self.id)
            .map(|s| std::mem::take(&mut s.traces))
            .unwrap_or_default()
    }

    /// Tear the Gui down: disconnect the tree, take the root out of the DOM
    /// and stop accepting native events.
    pub fn destroy(self, world: &mut World) -> Result<()> {
        if world.contains(self.root) {
            self.remove_from_world(world, self.root)?;
            let element = world.element(self.root)?;
            world.dom_mut().detach(element);
        }
        world.systems.remove(self.id);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reach {
    Bubble,
    Nearest,
}

/// Bubbling dispatch through `system`.
pub(crate) fn dispatch(
    world: &mut World,
    system: SystemId,
    event: &str,
    target: NodeId,
    payload: EventPayload,
) -> DispatchOutcome {
    run(world, system, event, target, payload, Reach::Bubble)
}

fn run(
    world: &mut World,
    system: SystemId,
    event: &str,
    target: NodeId,
    payload: EventPayload,
    reach: Reach,
) -> DispatchOutcome {
    let Some(state) = world.systems.get(system) else {
        tracing::warn!(event, "dispatch through a destroyed gui");
        return DispatchOutcome::Complete;
    };
    let mode = state.config.debug.mode_for(event);
    let mut logger = DispatchLogger::new(mode, event, describe(world, target));
    let simulated = SimulatedEvent::new(target, payload);
    let lookup = |w: &World, node: NodeId| find_handler(w, system, event, node);
    let outcome = match reach {
        Reach::Bubble => trigger::trigger_until_stopped(world, &lookup, &simulated, &mut logger),
        Reach::Nearest => trigger::trigger_once(world, &lookup, &simulated, &mut logger),
    };
    if let Some(trace) = logger.finish() {
        if let Some(state) = world.systems.get_mut(system) {
            state.traces.push(trace);
        }
    }
    outcome
}

/// Walk up from `start` to the root element looking for a registered
/// component handling `event`.
fn find_handler(world: &World, system: SystemId, event: &str, start: NodeId) -> Option<Found> {
    let state = world.systems.get(system)?;
    let root = world.components.get(state.root)?.element;
    let mut current = Some(start);
    while let Some(node) = current {
        let found = world
            .dom
            .get(node)
            .and_then(|d| d.attribute(ID_ATTR))
            .and_then(|uid| state.registry.handler_for(event, uid))
            .and_then(|component| {
                let handler = world.components.get(component)?.events.get(event)?;
                Some(Found {
                    component,
                    element: node,
                    handler: handler.clone(),
                })
            });
        if found.is_some() || node == root {
            return found;
        }
        current = world.dom.parent(node);
    }
    None
}
