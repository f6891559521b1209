use chrono::{DateTime, Local};
use serde::Serialize;

use crate::platform::Platform;

use super::task::Priority;

/// Outcome of a single task run.
///
/// `error` is reported and accumulated but does not halt the run.
/// `stop` halts the run immediately, whether or not `error` is set.
#[derive(Debug, Default)]
pub struct TaskOutcome {
    pub error: Option<anyhow::Error>,
    pub stop: bool,
    pub changes: Vec<String>,
    pub warnings: Vec<String>,
}

impl TaskOutcome {
    pub fn ok() -> Self {
        Self::default()
    }

    /// Recoverable failure: recorded, execution continues.
    pub fn failed(error: impl Into<anyhow::Error>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }

    /// Fatal failure: recorded, no further task runs.
    pub fn fatal(error: impl Into<anyhow::Error>) -> Self {
        Self {
            error: Some(error.into()),
            stop: true,
            ..Self::default()
        }
    }

    /// Halt without an error of its own.
    pub fn halt() -> Self {
        Self {
            stop: true,
            ..Self::default()
        }
    }

    pub fn with_change(mut self, change: impl Into<String>) -> Self {
        self.changes.push(change.into());
        self
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn record_change(&mut self, change: impl Into<String>) {
        self.changes.push(change.into());
    }

    pub fn record_error(&mut self, error: impl Into<anyhow::Error>) {
        self.error = Some(error.into());
    }

    pub fn changed(&self) -> bool {
        !self.changes.is_empty()
    }
}

/// What the processor observed for one executed task.
#[derive(Debug, Clone, Serialize)]
pub struct TaskRecord {
    /// 1-indexed position in the execution order.
    pub position: usize,
    pub version: String,
    pub priority: Priority,
    pub info: String,
    pub error: Option<String>,
    pub stopped: bool,
    pub changes: Vec<String>,
    pub warnings: Vec<String>,
}

/// Summary of a successful `process` call.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateReport {
    pub run_id: String,
    pub platform: Platform,
    pub site_version: String,
    pub dry_run: bool,
    pub started_at: DateTime<Local>,

    /// Tasks selected for this run, in execution order.
    pub planned: Vec<String>,

    /// Tasks that actually ran (empty on a dry run).
    pub executed: Vec<TaskRecord>,

    pub duration_ms: u64,
}

impl UpdateReport {
    /// True when no task matched the platform and site version.
    pub fn is_noop(&self) -> bool {
        self.planned.is_empty()
    }

    pub fn changes(&self) -> impl Iterator<Item = &str> {
        self.executed
            .iter()
            .flat_map(|r| r.changes.iter().map(String::as_str))
    }

    pub fn warnings(&self) -> impl Iterator<Item = &str> {
        self.executed
            .iter()
            .flat_map(|r| r.warnings.iter().map(String::as_str))
    }
}
