//! Systems: Gui roots, their registries and the native-event wiring.
//!
//! A system is created by [`Gui::takeover`] and owns one [`Registry`] of the
//! components attached beneath its root. Components know their system only
//! as an `Option<SystemId>`; `None` means detached.

pub mod attachment;
pub mod config;
pub mod gui;
pub mod native;
pub mod registry;

use slotmap::new_key_type;

pub use config::{GuiConfig, TapConfig};
pub use gui::Gui;
pub(crate) use gui::GuiState;
pub use registry::Registry;

new_key_type! {
    /// Handle to a system in the world.
    pub struct SystemId;
}
