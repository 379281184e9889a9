//! Well-known event names and the default per-event execution order.

use std::collections::HashMap;

// ── System events ───────────────────────────────────────────────────

pub const EXECUTE: &str = "alloy.execute";
pub const SYSTEM_INIT: &str = "alloy.system.init";
pub const ATTACHED_TO_DOM: &str = "alloy.system.attached";
pub const DETACHED_FROM_DOM: &str = "alloy.system.detached";
pub const RECEIVE: &str = "alloy.receive";
pub const FOCUS: &str = "alloy.focus";
pub const TAP: &str = "alloy.tap";
pub const LONGPRESS: &str = "alloy.longpress";
pub const POST_PASTE: &str = "alloy.system.postpaste";
pub const POST_BLUR: &str = "alloy.system.postblur";

// ── Native events ───────────────────────────────────────────────────

pub const CONTEXTMENU: &str = "contextmenu";
pub const TOUCHSTART: &str = "touchstart";
pub const TOUCHMOVE: &str = "touchmove";
pub const TOUCHEND: &str = "touchend";
pub const TOUCHCANCEL: &str = "touchcancel";
pub const MOUSEDOWN: &str = "mousedown";
pub const MOUSEMOVE: &str = "mousemove";
pub const MOUSEOUT: &str = "mouseout";
pub const MOUSEUP: &str = "mouseup";
pub const MOUSEOVER: &str = "mouseover";
pub const FOCUSIN: &str = "focusin";
pub const FOCUSOUT: &str = "focusout";
pub const KEYDOWN: &str = "keydown";
pub const KEYUP: &str = "keyup";
pub const INPUT: &str = "input";
pub const CHANGE: &str = "change";
pub const CLICK: &str = "click";
pub const PASTE: &str = "paste";
pub const SELECTSTART: &str = "selectstart";
pub const TRANSITIONCANCEL: &str = "transitioncancel";
pub const TRANSITIONEND: &str = "transitionend";
pub const TRANSITIONSTART: &str = "transitionstart";
pub const DRAGSTART: &str = "dragstart";
pub const DRAG: &str = "drag";
pub const DRAGENTER: &str = "dragenter";
pub const DRAGOVER: &str = "dragover";
pub const DRAGLEAVE: &str = "dragleave";
pub const DROP: &str = "drop";
pub const DRAGEND: &str = "dragend";

/// Every native event type the Gui root listens for.
pub const NATIVE_EVENTS: &[&str] = &[
    CONTEXTMENU,
    TOUCHSTART,
    TOUCHMOVE,
    TOUCHEND,
    TOUCHCANCEL,
    MOUSEDOWN,
    MOUSEMOVE,
    MOUSEOUT,
    MOUSEUP,
    MOUSEOVER,
    FOCUSIN,
    FOCUSOUT,
    KEYDOWN,
    KEYUP,
    INPUT,
    CHANGE,
    CLICK,
    PASTE,
    SELECTSTART,
    TRANSITIONCANCEL,
    TRANSITIONEND,
    TRANSITIONSTART,
    DRAGSTART,
    DRAG,
    DRAGENTER,
    DRAGOVER,
    DRAGLEAVE,
    DROP,
    DRAGEND,
];

/// Source name for handlers given directly in a spec's `events`.
pub const BASE_BEHAVIOUR: &str = "alloy.base.behaviour";

/// Execution order used when a spec gives none for the event.
pub fn default_event_order() -> HashMap<String, Vec<String>> {
    let table: &[(&str, &[&str])] = &[
        (
            EXECUTE,
            &["disabling", BASE_BEHAVIOUR, "toggling", "typeaheadevents"],
        ),
        (FOCUS, &[BASE_BEHAVIOUR, "focusing", "keying"]),
        (
            SYSTEM_INIT,
            &[BASE_BEHAVIOUR, "disabling", "toggling", "representing"],
        ),
        (
            INPUT,
            &[BASE_BEHAVIOUR, "representing", "streaming", "invalidating"],
        ),
        (
            DETACHED_FROM_DOM,
            &[BASE_BEHAVIOUR, "representing", "item-events", "tooltipping"],
        ),
        (MOUSEDOWN, &["focusing", BASE_BEHAVIOUR, "item-type-events"]),
        (TOUCHSTART, &["focusing", BASE_BEHAVIOUR, "item-type-events"]),
        (MOUSEOVER, &["item-type-events", "tooltipping"]),
        (RECEIVE, &["receiving", "reflecting", "tooltipping"]),
    ];
    table
        .iter()
        .map(|(event, order)| {
            (
                (*event).to_owned(),
                order.iter().map(|s| (*s).to_owned()).collect(),
            )
        })
        .collect()
}

/// The default table with `overrides` replacing whole entries.
pub fn resolve_event_order(
    overrides: &HashMap<String, Vec<String>>,
) -> HashMap<String, Vec<String>> {
    let mut order = default_event_order();
    order.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
    order
}
