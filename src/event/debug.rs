//! Per-event diagnostic logging for dispatch.

use std::collections::HashMap;
use std::fmt;

/// How much to record about dispatches of one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventLogMode {
    #[default]
    Normal,
    /// Record and emit a trace of each dispatch.
    Logging,
    /// Like `Logging`, emitted at warn level as a break marker.
    Stop,
}

/// Which events are traced. Exact names win over prefixes; among prefixes
/// the longest match wins.
#[derive(Debug, Clone, Default)]
pub struct DebugConfig {
    exact: HashMap<String, EventLogMode>,
    prefixes: Vec<(String, EventLogMode)>,
}

impl DebugConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_event(mut self, event: impl Into<String>, mode: EventLogMode) -> Self {
        self.exact.insert(event.into(), mode);
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>, mode: EventLogMode) -> Self {
        self.prefixes.push((prefix.into(), mode));
        self
    }

    pub fn mode_for(&self, event: &str) -> EventLogMode {
        if let Some(mode) = self.exact.get(event) {
            return *mode;
        }
        self.prefixes
            .iter()
            .filter(|(p, _)| event.starts_with(p.as_str()))
            .max_by_key(|(p, _)| p.len())
            .map(|(_, mode)| *mode)
            .unwrap_or_default()
    }
}

/// What happened at one level of a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceOutcome {
    /// No handler was found anywhere up the tree.
    NoHandlers,
    Cut,
    Stopped,
    /// The handler ran and the search reached the top.
    NoParent,
    /// The handler ran and the dispatch continues upward.
    Response,
}

impl fmt::Display for TraceOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NoHandlers => "no-handlers",
            Self::Cut => "cut",
            Self::Stopped => "stopped",
            Self::NoParent => "no-parent",
            Self::Response => "response",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceStep {
    pub outcome: TraceOutcome,
    /// Short description of the element at this level.
    pub element: String,
}

/// The recorded path of one dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchTrace {
    pub event: String,
    pub target: String,
    pub mode: EventLogMode,
    pub steps: Vec<TraceStep>,
}

impl DispatchTrace {
    pub fn outcomes(&self) -> Vec<TraceOutcome> {
        self.steps.iter().map(|s| s.outcome).collect()
    }

    /// Emit through `tracing` at the level the mode asks for.
    pub fn emit(&self) {
        let path = self
            .steps
            .iter()
            .map(|s| format!("{} ({})", s.element, s.outcome))
            .collect::<Vec<_>>()
            .join(" -> ");
        match self.mode {
            EventLogMode::Normal => {}
            EventLogMode::Logging => {
                tracing::debug!(event = %self.event, target = %self.target, %path, "event dispatch");
            }
            EventLogMode::Stop => {
                tracing::warn!(event = %self.event, target = %self.target, %path, "event dispatch (stop)");
            }
        }
    }
}

/// Accumulates steps for one dispatch when logging is enabled.
#[derive(Debug)]
pub(crate) struct DispatchLogger {
    trace: Option<DispatchTrace>,
}

impl DispatchLogger {
    pub(crate) fn new(mode: EventLogMode, event: &str, target: String) -> Self {
        let trace = (mode != EventLogMode::Normal).then(|| DispatchTrace {
            event: event.to_owned(),
            target,
            mode,
            steps: Vec::new(),
        });
        Self { trace }
    }

    pub(crate) fn log(&mut self, outcome: TraceOutcome, element: impl FnOnce() -> String) {
        if let Some(trace) = &mut self.trace {
            trace.steps.push(TraceStep {
                outcome,
                element: element(),
            });
        }
    }

    pub(crate) fn finish(self) -> Option<DispatchTrace> {
        let trace = self.trace?;
        trace.emit();
        Some(trace)
    }
}
