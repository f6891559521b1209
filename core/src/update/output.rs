//! Console report used when no renderer plugin is injected.

use super::traits::{PlannedTask, UpdateEvent};
use super::types::UpdateOpts;

pub const NOTHING_TO_DO: &str = "Nothing to do";
pub const UPDATE_COMPLETED: &str = "Update completed";
pub const UNABLE_TO_PROCEED: &str = "     unable to proceed";
pub const DRY_RUN_COMPLETED: &str = "Dry run completed, no task was executed";

pub fn task_line(task: &PlannedTask, total: usize) -> String {
    format!(
        "Task: {}/{} - version: {} - priority: {} - {}",
        task.position, total, task.version, task.priority, task.info
    )
}

pub fn error_line(error: &str) -> String {
    format!("  -> ERROR: {error}")
}

pub fn change_line(change: &str) -> String {
    format!("     * {change}")
}

pub fn warning_line(warning: &str) -> String {
    format!("     ! {warning}")
}

/// Human readable lines for an event. Changes and warnings are only shown
/// in verbose mode.
pub fn text_lines(event: &UpdateEvent, verbose: bool) -> Vec<String> {
    match event {
        UpdateEvent::RunStart { .. } => Vec::new(),
        UpdateEvent::NothingToDo { .. } => vec![NOTHING_TO_DO.to_string()],
        UpdateEvent::Plan { tasks, .. } => {
            let total = tasks.len();
            tasks.iter().map(|t| task_line(t, total)).collect()
        }
        UpdateEvent::TaskStart { task, total, .. } => vec![task_line(task, *total)],
        UpdateEvent::TaskChange { change, .. } if verbose => vec![change_line(change)],
        UpdateEvent::TaskWarning { warning, .. } if verbose => vec![warning_line(warning)],
        UpdateEvent::TaskChange { .. } | UpdateEvent::TaskWarning { .. } => Vec::new(),
        UpdateEvent::TaskError { error, .. } => vec![error_line(error)],
        UpdateEvent::Stopped { .. } => vec![UNABLE_TO_PROCEED.to_string()],
        UpdateEvent::RunEnd {
            executed,
            errors,
            stopped,
            dry_run,
            ..
        } => {
            if *dry_run {
                vec![DRY_RUN_COMPLETED.to_string()]
            } else if *executed > 0 && !*stopped && *errors == 0 {
                vec![UPDATE_COMPLETED.to_string()]
            } else {
                Vec::new()
            }
        }
    }
}

pub fn emit_event(opts: &UpdateOpts, event: &UpdateEvent) {
    for line in text_lines(event, opts.verbose) {
        println!("{line}");
    }
}
