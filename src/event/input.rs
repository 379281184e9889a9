//! Native events: the raw input the Gui root receives.
//!
//! [`NativeEvent`] is the framework's stand-in for a browser event: a type
//! name, a target node, pointer coordinates, an optional key, and a
//! `default_prevented` flag that dispatch may set. Terminal input arrives from
//! crossterm and is converted with [`NativeEvent::from_crossterm`] so the rest
//! of the framework never depends on crossterm directly.

use std::cell::Cell;
use std::ops::{BitAnd, BitOr};
use std::time::Duration;

use super::names;
use crate::dom::NodeId;

// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

/// Keyboard key, decoupled from crossterm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Tab,
    BackTab,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
    /// Anything else crossterm reports.
    Other,
}

// ---------------------------------------------------------------------------
// Modifiers
// ---------------------------------------------------------------------------

/// Modifier key bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(pub u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const SHIFT: Modifiers = Modifiers(1);
    pub const CTRL: Modifiers = Modifiers(2);
    pub const ALT: Modifiers = Modifiers(4);

    /// Check whether `self` contains all the bits in `other`.
    pub fn contains(self, other: Modifiers) -> bool {
        (self.0 & other.0) == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Modifiers {
    type Output = Modifiers;
    fn bitor(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 | rhs.0)
    }
}

impl BitAnd for Modifiers {
    type Output = Modifiers;
    fn bitand(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 & rhs.0)
    }
}

// ---------------------------------------------------------------------------
// KeyEvent
// ---------------------------------------------------------------------------

/// A keyboard key with modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(code: Key, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }
}

fn convert_modifiers(m: crossterm::event::KeyModifiers) -> Modifiers {
    let mut out = Modifiers::NONE;
    if m.contains(crossterm::event::KeyModifiers::SHIFT) {
        out = out | Modifiers::SHIFT;
    }
    if m.contains(crossterm::event::KeyModifiers::CONTROL) {
        out = out | Modifiers::CTRL;
    }
    if m.contains(crossterm::event::KeyModifiers::ALT) {
        out = out | Modifiers::ALT;
    }
    out
}

impl From<crossterm::event::KeyEvent> for KeyEvent {
    fn from(ct: crossterm::event::KeyEvent) -> Self {
        use crossterm::event::KeyCode;
        let code = match ct.code {
            KeyCode::Char(c) => Key::Char(c),
            KeyCode::Enter => Key::Enter,
            KeyCode::Esc => Key::Escape,
            KeyCode::Tab => Key::Tab,
            KeyCode::BackTab => Key::BackTab,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Delete => Key::Delete,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Home => Key::Home,
            KeyCode::End => Key::End,
            KeyCode::PageUp => Key::PageUp,
            KeyCode::PageDown => Key::PageDown,
            KeyCode::F(n) => Key::F(n),
            _ => Key::Other,
        };
        KeyEvent {
            code,
            modifiers: convert_modifiers(ct.modifiers),
        }
    }
}

// ---------------------------------------------------------------------------
// NativeEvent
// ---------------------------------------------------------------------------

/// A raw event delivered to the Gui root.
#[derive(Debug, Clone)]
pub struct NativeEvent {
    /// Event type, e.g. `"keydown"` or `"touchstart"`.
    pub kind: String,
    pub target: NodeId,
    pub x: f64,
    pub y: f64,
    /// Number of active touch points (touch events only).
    pub touches: usize,
    pub key: Option<KeyEvent>,
    /// Pasted or typed text, when the event carries any.
    pub data: Option<String>,
    /// Time since an arbitrary origin, shared by all events of one Gui.
    pub time_stamp: Duration,
    default_prevented: Cell<bool>,
    propagation_stopped: Cell<bool>,
}

impl NativeEvent {
    pub fn new(kind: impl Into<String>, target: NodeId) -> Self {
        Self {
            kind: kind.into(),
            target,
            x: 0.0,
            y: 0.0,
            touches: 0,
            key: None,
            data: None,
            time_stamp: Duration::ZERO,
            default_prevented: Cell::new(false),
            propagation_stopped: Cell::new(false),
        }
    }

    /// Pointer position (builder).
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn with_touches(mut self, touches: usize) -> Self {
        self.touches = touches;
        self
    }

    pub fn with_key(mut self, key: KeyEvent) -> Self {
        self.key = Some(key);
        self
    }

    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }

    pub fn at_time(mut self, time_stamp: Duration) -> Self {
        self.time_stamp = time_stamp;
        self
    }

    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }

    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }

    /// Convert terminal input into native events aimed at `target`.
    ///
    /// A mouse release also produces a `click`. Resize events produce nothing.
    pub fn from_crossterm(
        event: crossterm::event::Event,
        target: NodeId,
        time_stamp: Duration,
    ) -> Vec<NativeEvent> {
        use crossterm::event::{Event, KeyEventKind, MouseEventKind};
        let make = |kind: &str| NativeEvent::new(kind, target).at_time(time_stamp);
        match event {
            Event::Key(ke) => {
                let kind = match ke.kind {
                    KeyEventKind::Release => names::KEYUP,
                    _ => names::KEYDOWN,
                };
                vec![make(kind).with_key(KeyEvent::from(ke))]
            }
            Event::Mouse(me) => {
                let (x, y) = (f64::from(me.column), f64::from(me.row));
                let kinds: &[&str] = match me.kind {
                    MouseEventKind::Down(_) => &[names::MOUSEDOWN],
                    MouseEventKind::Up(_) => &[names::MOUSEUP, names::CLICK],
                    MouseEventKind::Drag(_) | MouseEventKind::Moved => &[names::MOUSEMOVE],
                    _ => &[],
                };
                kinds.iter().map(|k| make(*k).at(x, y)).collect()
            }
            Event::FocusGained => vec![make(names::FOCUSIN)],
            Event::FocusLost => vec![make(names::FOCUSOUT)],
            Event::Paste(text) => vec![make(names::PASTE).with_data(text)],
            Event::Resize(..) => Vec::new(),
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
