//! The dispatch state machine.
//!
//! ```text
//! Searching ──(handler found)──▶ Found ──▶ Stopped   (abort fired or stop())
//!     ▲                            │   ──▶ Complete  (cut() or no parent)
//!     └──────── Resume(parent) ◀───┘
//! ```
//!
//! Searching walks up from an element to the nearest component with a handler
//! for the event. Found evaluates that handler; the flags it leaves on the
//! [`SimulatedEvent`] decide whether the walk resumes from the element's
//! parent.

use super::debug::{DispatchLogger, TraceOutcome};
use super::handler::EventHandler;
use super::simulated::SimulatedEvent;
use crate::component::ComponentId;
use crate::dom::NodeId;
use crate::world::World;

/// A handler located by a search.
#[derive(Debug, Clone)]
pub struct Found {
    pub component: ComponentId,
    pub element: NodeId,
    pub handler: EventHandler,
}

/// Finds the nearest handler at or above an element.
pub(crate) type Lookup<'a> = &'a dyn Fn(&World, NodeId) -> Option<Found>;

/// How a dispatch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Stopped,
    Complete,
}

impl DispatchOutcome {
    pub fn is_stopped(self) -> bool {
        self == Self::Stopped
    }
}

enum Step {
    Done(DispatchOutcome),
    Resume(NodeId),
}

pub(crate) fn describe(world: &World, node: NodeId) -> String {
    world
        .dom()
        .get(node)
        .map(|d| {
            let uid = d
                .attribute(crate::spec::uid::ID_ATTR)
                .map(|u| format!(" {}=\"{u}\"", crate::spec::uid::ID_ATTR))
                .unwrap_or_default();
            format!("<{}{uid}>", d.tag)
        })
        .unwrap_or_else(|| "<detached>".to_owned())
}

fn step(
    world: &mut World,
    found: Found,
    event: &SimulatedEvent,
    logger: &mut DispatchLogger,
) -> Step {
    found.handler.invoke(world, found.component, event);
    if event.is_stopped() {
        logger.log(TraceOutcome::Stopped, || describe(world, found.element));
        return Step::Done(DispatchOutcome::Stopped);
    }
    if event.is_cut() {
        logger.log(TraceOutcome::Cut, || describe(world, found.element));
        return Step::Done(DispatchOutcome::Complete);
    }
    match world.dom().parent(found.element) {
        None => {
            logger.log(TraceOutcome::NoParent, || describe(world, found.element));
            Step::Done(DispatchOutcome::Complete)
        }
        Some(parent) => {
            logger.log(TraceOutcome::Response, || describe(world, found.element));
            Step::Resume(parent)
        }
    }
}

/// Bubble from `event.target()` until stopped, cut, or out of handlers.
pub(crate) fn trigger_until_stopped(
    world: &mut World,
    lookup: Lookup<'_>,
    event: &SimulatedEvent,
    logger: &mut DispatchLogger,
) -> DispatchOutcome {
    trigger_from(world, lookup, event.target(), event, logger)
}

/// Bubble starting at `start` rather than the event's target.
pub(crate) fn trigger_from(
    world: &mut World,
    lookup: Lookup<'_>,
    start: NodeId,
    event: &SimulatedEvent,
    logger: &mut DispatchLogger,
) -> DispatchOutcome {
    let mut current = start;
    loop {
        let Some(found) = lookup(world, current) else {
            logger.log(TraceOutcome::NoHandlers, || describe(world, current));
            return DispatchOutcome::Complete;
        };
        match step(world, found, event, logger) {
            Step::Done(outcome) => return outcome,
            Step::Resume(parent) => current = parent,
        }
    }
}

/// Run the nearest handler once, without bubbling further.
pub(crate) fn trigger_once(
    world: &mut World,
    lookup: Lookup<'_>,
    event: &SimulatedEvent,
    logger: &mut DispatchLogger,
) -> DispatchOutcome {
    let target = event.target();
    let Some(found) = lookup(world, target) else {
        logger.log(TraceOutcome::NoHandlers, || describe(world, target));
        return DispatchOutcome::Complete;
    };
    let element = found.element;
    found.handler.invoke(world, found.component, event);
    if event.is_stopped() {
        logger.log(TraceOutcome::Stopped, || describe(world, element));
        DispatchOutcome::Stopped
    } else {
        logger.log(TraceOutcome::Response, || describe(world, element));
        DispatchOutcome::Complete
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::debug::EventLogMode;
    use crate::event::simulated::EventPayload;
    use crate::spec::{ComponentSpec, DomSpec};
    use pretty_assertions::assert_eq;

    /// Every component handles the event with a no-op.
    fn anywhere(world: &World, node: NodeId) -> Option<Found> {
        let component = world.get_by_element(node)?;
        Some(Found {
            component,
            element: node,
            handler: EventHandler::new(),
        })
    }

    fn span_in_div() -> (World, NodeId) {
        let mut world = World::new();
        let div = world
            .build(ComponentSpec::new(DomSpec::tag("div")).with_component(ComponentSpec::new(DomSpec::tag("span"))))
            .unwrap();
        let span = world.component(div).unwrap().components()[0];
        let target = world.element(span).unwrap();
        (world, target)
    }

    #[test]
    fn bubbling_resumes_at_each_parent() {
        let (mut world, target) = span_in_div();
        let event = SimulatedEvent::new(target, EventPayload::None);
        let mut logger = DispatchLogger::new(EventLogMode::Logging, "ping", "span".into());
        let outcome = trigger_until_stopped(&mut world, &anywhere, &event, &mut logger);
        assert_eq!(outcome, DispatchOutcome::Complete);
        assert_eq!(
            logger.finish().unwrap().outcomes(),
            vec![TraceOutcome::Response, TraceOutcome::NoParent]
        );
    }

    #[test]
    fn once_stays_on_the_nearest_handler() {
        let (mut world, target) = span_in_div();
        let event = SimulatedEvent::new(target, EventPayload::None);
        let mut logger = DispatchLogger::new(EventLogMode::Logging, "ping", "span".into());
        let outcome = trigger_once(&mut world, &anywhere, &event, &mut logger);
        assert_eq!(outcome, DispatchOutcome::Complete);
        assert_eq!(logger.finish().unwrap().outcomes(), vec![TraceOutcome::Response]);
    }
}
