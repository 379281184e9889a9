//! The event object handed to handlers during dispatch.

use std::cell::Cell;
use std::rc::Rc;

use serde_json::Value;

use super::input::NativeEvent;
use crate::dom::NodeId;

/// A broadcast message.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiveMessage {
    /// Delivered to every receiver regardless of channels.
    pub universal: bool,
    pub channels: Vec<String>,
    pub data: Value,
}

impl ReceiveMessage {
    pub fn universal(data: Value) -> Self {
        Self {
            universal: true,
            channels: Vec::new(),
            data,
        }
    }

    pub fn on_channels<I, S>(channels: I, data: Value) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            universal: false,
            channels: channels.into_iter().map(Into::into).collect(),
            data,
        }
    }
}

/// What an event carries.
#[derive(Debug, Clone)]
pub enum EventPayload {
    None,
    Native(Rc<NativeEvent>),
    Data(Value),
    Receive(ReceiveMessage),
    Focus { originator: NodeId },
}

/// One dispatch of one event.
///
/// Control flags are interior-mutable so handlers can call [`stop`] or
/// [`cut`] through a shared reference. The source is shared by every level of
/// a bubbling dispatch; a handler may redirect it with [`set_source`].
///
/// [`stop`]: SimulatedEvent::stop
/// [`cut`]: SimulatedEvent::cut
/// [`set_source`]: SimulatedEvent::set_source
#[derive(Debug)]
pub struct SimulatedEvent {
    payload: EventPayload,
    target: NodeId,
    source: Cell<NodeId>,
    stopped: Cell<bool>,
    cut: Cell<bool>,
    prevented: Cell<bool>,
}

impl SimulatedEvent {
    pub fn new(target: NodeId, payload: EventPayload) -> Self {
        Self {
            payload,
            target,
            source: Cell::new(target),
            stopped: Cell::new(false),
            cut: Cell::new(false),
            prevented: Cell::new(false),
        }
    }

    pub fn payload(&self) -> &EventPayload {
        &self.payload
    }

    /// The element the dispatch started at.
    pub fn target(&self) -> NodeId {
        self.target
    }

    /// The element currently considered the originator.
    pub fn source(&self) -> NodeId {
        self.source.get()
    }

    pub fn set_source(&self, source: NodeId) {
        self.source.set(source);
    }

    /// Halt the dispatch; no ancestor handler runs.
    pub fn stop(&self) {
        self.stopped.set(true);
    }

    /// Handled here: no ancestor handler runs, but the dispatch completes
    /// normally rather than as stopped.
    pub fn cut(&self) {
        self.cut.set(true);
    }

    /// Stop and prevent the native default action.
    pub fn kill(&self) {
        self.stop();
        self.prevent_default();
        if let EventPayload::Native(native) = &self.payload {
            native.stop_propagation();
        }
    }

    pub fn prevent_default(&self) {
        self.prevented.set(true);
        if let EventPayload::Native(native) = &self.payload {
            native.prevent_default();
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.get()
    }

    pub fn is_cut(&self) -> bool {
        self.cut.get()
    }

    pub fn default_prevented(&self) -> bool {
        self.prevented.get()
    }

    pub fn native(&self) -> Option<&NativeEvent> {
        match &self.payload {
            EventPayload::Native(native) => Some(native),
            _ => None,
        }
    }

    pub fn data(&self) -> Option<&Value> {
        match &self.payload {
            EventPayload::Data(data) => Some(data),
            EventPayload::Receive(message) => Some(&message.data),
            _ => None,
        }
    }

    pub fn message(&self) -> Option<&ReceiveMessage> {
        match &self.payload {
            EventPayload::Receive(message) => Some(message),
            _ => None,
        }
    }
}
