use serde::Serialize;

use crate::platform::Platform;
use crate::update::types::Priority;

/// Renders processor events (controls the output format).
pub trait ReportRendererPlugin: Send + Sync {
    fn name(&self) -> &str;
    fn format(&self) -> &str;
    fn render(&self, event: &UpdateEvent);
}

/// A task as it appears in the execution order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedTask {
    /// 1-indexed.
    pub position: usize,
    pub version: String,
    pub priority: Priority,
    pub info: String,
}

/// Unified processor event.
#[derive(Debug, Clone)]
pub enum UpdateEvent {
    RunStart {
        run_id: String,
        platform: Platform,
        site_version: String,
        total_tasks: usize,
    },
    NothingToDo {
        run_id: String,
    },
    Plan {
        run_id: String,
        tasks: Vec<PlannedTask>,
    },
    TaskStart {
        run_id: String,
        task: PlannedTask,
        total: usize,
    },
    TaskChange {
        run_id: String,
        position: usize,
        change: String,
    },
    TaskWarning {
        run_id: String,
        position: usize,
        warning: String,
    },
    TaskError {
        run_id: String,
        position: usize,
        error: String,
    },
    Stopped {
        run_id: String,
        position: usize,
    },
    RunEnd {
        run_id: String,
        executed: usize,
        errors: usize,
        stopped: bool,
        dry_run: bool,
        duration_ms: u64,
    },
}

impl UpdateEvent {
    pub fn run_id(&self) -> &str {
        match self {
            UpdateEvent::RunStart { run_id, .. }
            | UpdateEvent::NothingToDo { run_id }
            | UpdateEvent::Plan { run_id, .. }
            | UpdateEvent::TaskStart { run_id, .. }
            | UpdateEvent::TaskChange { run_id, .. }
            | UpdateEvent::TaskWarning { run_id, .. }
            | UpdateEvent::TaskError { run_id, .. }
            | UpdateEvent::Stopped { run_id, .. }
            | UpdateEvent::RunEnd { run_id, .. } => run_id,
        }
    }
}
