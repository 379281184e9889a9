//! Built-in behaviours.

mod add_events;
mod disabling;
mod receiving;
mod toggling;

pub use add_events::AddEvents;
pub use disabling::{DisableHook, Disabling, DisablingConfig};
pub use receiving::{ChannelHandler, Receiving, ReceivingConfig};
pub use toggling::{ToggleAria, ToggleState, Toggling, TogglingConfig};
