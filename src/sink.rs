//! Progress reporting for pipeline stages
//!
//! Stages never reach for a global logger. The orchestrator is handed a
//! [`Reporter`] and passes it down; [`TracingReporter`] forwards to `tracing`
//! for the CLI, [`MemoryReporter`] keeps events for inspection in tests.

use std::fmt;
use std::sync::Mutex;

/// Pipeline step an event belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    ClassName,
    Implementation,
    Packages,
    LlmTests,
    GroundTruthTests,
    ActionMap,
    Solution,
    Build,
    Retention,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::ClassName => "class name",
            Stage::Implementation => "LLM generated implementation",
            Stage::Packages => "packages",
            Stage::LlmTests => "LLM generated tests",
            Stage::GroundTruthTests => "Ground truth tests",
            Stage::ActionMap => "action map",
            Stage::Solution => "solution",
            Stage::Build => "build",
            Stage::Retention => "retention",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Debug,
    Info,
    Warn,
    Error,
}

/// Receives stage events.
pub trait Reporter {
    fn emit(&self, severity: Severity, stage: Stage, message: &str);

    fn debug(&self, stage: Stage, message: &str) {
        self.emit(Severity::Debug, stage, message);
    }

    fn info(&self, stage: Stage, message: &str) {
        self.emit(Severity::Info, stage, message);
    }

    fn warn(&self, stage: Stage, message: &str) {
        self.emit(Severity::Warn, stage, message);
    }

    fn error(&self, stage: Stage, message: &str) {
        self.emit(Severity::Error, stage, message);
    }
}

/// Forwards events to the `tracing` subscriber installed by the binary.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn emit(&self, severity: Severity, stage: Stage, message: &str) {
        match severity {
            Severity::Debug => tracing::debug!(stage = %stage, "{message}"),
            Severity::Info => tracing::info!(stage = %stage, "{message}"),
            Severity::Warn => tracing::warn!(stage = %stage, "{message}"),
            Severity::Error => tracing::error!(stage = %stage, "{message}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEvent {
    pub severity: Severity,
    pub stage: Stage,
    pub message: String,
}

/// Collects events in memory.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    events: Mutex<Vec<ReportEvent>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ReportEvent> {
        self.lock().clone()
    }

    pub fn for_stage(&self, stage: Stage) -> Vec<ReportEvent> {
        self.lock()
            .iter()
            .filter(|e| e.stage == stage)
            .cloned()
            .collect()
    }

    /// Whether any event message contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.lock().iter().any(|e| e.message.contains(needle))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<ReportEvent>> {
        // A poisoned lock only means a test panicked mid-push
        self.events.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Reporter for MemoryReporter {
    fn emit(&self, severity: Severity, stage: Stage, message: &str) {
        self.lock().push(ReportEvent {
            severity,
            stage,
            message: message.to_string(),
        });
    }
}
