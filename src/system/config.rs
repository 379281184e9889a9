//! Gui configuration.

use std::time::Duration;

use crate::event::DebugConfig;

/// Thresholds for the tap/longpress monitor.
#[derive(Debug, Clone, PartialEq)]
pub struct TapConfig {
    /// Movement in either axis, in pixels, beyond which a touch is no
    /// longer a tap.
    pub significant_move: f64,
    /// How long a touch must be held to become a longpress.
    pub longpress_delay: Duration,
}

impl Default for TapConfig {
    fn default() -> Self {
        Self {
            significant_move: 5.0,
            longpress_delay: Duration::from_millis(400),
        }
    }
}

/// Configuration for a Gui root.
#[derive(Debug, Clone)]
pub struct GuiConfig {
    /// Which events get dispatch traces.
    pub debug: DebugConfig,
    /// Prevent backspace outside editable elements.
    pub stop_backspace: bool,
    pub tap: TapConfig,
}

impl Default for GuiConfig {
    fn default() -> Self {
        Self {
            debug: DebugConfig::default(),
            stop_backspace: true,
            tap: TapConfig::default(),
        }
    }
}

impl GuiConfig {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the dispatch logging config (builder).
    pub fn with_debug(mut self, debug: DebugConfig) -> Self {
        self.debug = debug;
        self
    }

    /// Set backspace prevention (builder).
    pub fn with_stop_backspace(mut self, stop: bool) -> Self {
        self.stop_backspace = stop;
        self
    }

    /// Set the tap thresholds (builder).
    pub fn with_tap(mut self, tap: TapConfig) -> Self {
        self.tap = tap;
        self
    }
}
