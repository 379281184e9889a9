//! Native event wiring for a Gui root.
//!
//! [`Gui::dispatch_native`] is the single listener for every native event the
//! root handles. On top of plain dispatch it synthesises `alloy.tap` and
//! `alloy.longpress` from touches, blocks backspace navigation outside
//! editable elements, and queues `alloy.system.postpaste` /
//! `alloy.system.postblur` after paste and focusout.

use std::rc::Rc;
use std::time::Duration;

use super::config::TapConfig;
use super::gui::{dispatch, Gui};
use crate::dom::NodeId;
use crate::event::input::Key;
use crate::event::names::{
    FOCUSOUT, KEYDOWN, LONGPRESS, NATIVE_EVENTS, PASTE, POST_BLUR, POST_PASTE, TAP, TOUCHEND,
    TOUCHMOVE, TOUCHSTART,
};
use crate::event::{DispatchOutcome, EventPayload, NativeEvent};
use crate::world::World;

// ---------------------------------------------------------------------------
// Tap monitor
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
struct TouchStart {
    x: f64,
    y: f64,
    target: NodeId,
}

#[derive(Debug)]
struct PendingLongpress {
    due: Duration,
    event: Rc<NativeEvent>,
}

/// What a touch end means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TouchEnd {
    /// Not the end of a tracked touch.
    Ignore,
    /// A longpress already fired; swallow the end.
    Swallow,
    Tap,
}

/// Tracks one touch from start to end.
#[derive(Debug, Default)]
pub(crate) struct TapMonitor {
    start: Option<TouchStart>,
    longpress: Option<PendingLongpress>,
    longpress_fired: bool,
}

impl TapMonitor {
    fn touch_start(&mut self, event: &Rc<NativeEvent>, config: &TapConfig) {
        if event.touches != 1 {
            return;
        }
        self.longpress = Some(PendingLongpress {
            due: event.time_stamp + config.longpress_delay,
            event: Rc::clone(event),
        });
        self.longpress_fired = false;
        self.start = Some(TouchStart {
            x: event.x,
            y: event.y,
            target: event.target,
        });
    }

    fn touch_move(&mut self, event: &NativeEvent, config: &TapConfig) {
        self.longpress = None;
        if event.touches != 1 {
            return;
        }
        let far = self.start.is_some_and(|s| {
            (event.x - s.x).abs() > config.significant_move
                || (event.y - s.y).abs() > config.significant_move
        });
        if far {
            self.start = None;
        }
    }

    fn touch_end(&mut self, event: &NativeEvent) -> TouchEnd {
        self.longpress = None;
        match self.start {
            Some(s) if s.target == event.target => {
                if self.longpress_fired {
                    TouchEnd::Swallow
                } else {
                    TouchEnd::Tap
                }
            }
            _ => TouchEnd::Ignore,
        }
    }

    /// The pending longpress event, if its delay has run out by `now`.
    fn due(&mut self, now: Duration) -> Option<Rc<NativeEvent>> {
        if self.longpress.as_ref().is_some_and(|p| p.due <= now) {
            self.longpress.take().map(|p| p.event)
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Native dispatch
// ---------------------------------------------------------------------------

fn kill(event: &NativeEvent) {
    event.prevent_default();
    event.stop_propagation();
}

/// Backspace outside anything editable would navigate away.
fn is_dangerous(world: &World, event: &NativeEvent) -> bool {
    let backspace = event.key.as_ref().is_some_and(|k| k.code == Key::Backspace);
    let dom = world.dom();
    backspace
        && dom
            .get(event.target)
            .is_some_and(|d| !matches!(d.tag.as_str(), "input" | "textarea"))
        && dom
            .closest(event.target, |d| d.attribute("contenteditable") == Some("true"))
            .is_none()
}

impl Gui {
    /// Fire a longpress whose delay has elapsed by `now`. Returns whether
    /// one fired.
    pub fn run_timers(self, world: &mut World, now: Duration) -> bool {
        let Some(event) = world.systems.get_mut(self.id()).and_then(|s| s.tap.due(now)) else {
            return false;
        };
        let target = event.target;
        dispatch(world, self.id(), LONGPRESS, target, EventPayload::Native(event));
        if let Some(state) = world.systems.get_mut(self.id()) {
            state.tap.longpress_fired = true;
        }
        true
    }

    /// Route one native event through the Gui.
    ///
    /// A stopped dispatch kills the native event. Events the root does not
    /// listen for, and events arriving after [`destroy`](Gui::destroy), are
    /// ignored.
    pub fn dispatch_native(self, world: &mut World, event: Rc<NativeEvent>) -> DispatchOutcome {
        if !NATIVE_EVENTS.contains(&event.kind.as_str()) {
            tracing::trace!(kind = %event.kind, "ignoring unhandled native event");
            return DispatchOutcome::Complete;
        }
        self.run_timers(world, event.time_stamp);
        let Some(state) = world.systems.get_mut(self.id()) else {
            return DispatchOutcome::Complete;
        };
        let stop_backspace = state.config.stop_backspace;
        let tap = state.config.tap.clone();

        let kind = event.kind.as_str();
        match kind {
            TOUCHSTART => state.tap.touch_start(&event, &tap),
            TOUCHMOVE => state.tap.touch_move(&event, &tap),
            TOUCHEND => match state.tap.touch_end(&event) {
                TouchEnd::Ignore => {}
                TouchEnd::Swallow => event.prevent_default(),
                TouchEnd::Tap => {
                    let payload = EventPayload::Native(Rc::clone(&event));
                    if dispatch(world, self.id(), TAP, event.target, payload).is_stopped() {
                        kill(&event);
                    }
                }
            },
            _ => {}
        }

        let payload = EventPayload::Native(Rc::clone(&event));
        let outcome = dispatch(world, self.id(), kind, event.target, payload);
        if outcome.is_stopped() {
            kill(&event);
        } else if kind == KEYDOWN && stop_backspace && is_dangerous(world, &event) {
            event.prevent_default();
        }

        let follow_up = match kind {
            PASTE => Some(POST_PASTE),
            FOCUSOUT => Some(POST_BLUR),
            _ => None,
        };
        if let Some(name) = follow_up {
            let event = Rc::clone(&event);
            world.defer(move |w| {
                let target = event.target;
                self.trigger_event(w, name, target, EventPayload::Native(event));
            });
        }
        outcome
    }
}
