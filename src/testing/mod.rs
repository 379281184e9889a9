//! Headless testing harness: Pilot, snapshot helpers.
//!
//! Use the [`Pilot`] to drive a Gui without a terminal. Use [`html_tree`] and
//! [`traces_to_string`] to capture component output and dispatch paths as
//! plain text for snapshot-style assertions.

pub mod pilot;
pub mod snapshot;

pub use pilot::Pilot;
pub use snapshot::{html, html_tree, traces_to_string};
