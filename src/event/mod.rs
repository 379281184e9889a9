//! Event system: names, handlers, combination, native input, dispatch.

pub mod combine;
pub mod debug;
pub mod handler;
pub mod input;
pub mod names;
pub mod simulated;
pub mod trigger;

pub use combine::combine_events;
pub use debug::{DebugConfig, DispatchTrace, EventLogMode, TraceOutcome, TraceStep};
pub use handler::{
    abort, can, cut, derive, redirect, run, run_on_attached, run_on_detached, run_on_execute,
    run_on_init, run_on_receive, run_on_source, stop, Action, EventEntry, EventHandler, EventMap, Predicate,
};
pub use input::{Key, KeyEvent, Modifiers, NativeEvent};
pub use simulated::{EventPayload, ReceiveMessage, SimulatedEvent};
pub use trigger::{DispatchOutcome, Found};
