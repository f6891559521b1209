use chrono::Local;
use serde_json::{json, Value};
use siteup_core::api::{ReportRendererPlugin, UpdateEvent};

pub struct JsonlRendererPlugin {
    pretty_print: bool,
}

impl JsonlRendererPlugin {
    pub fn new(pretty_print: bool) -> Self {
        Self { pretty_print }
    }

    fn event_to_json(&self, event: &UpdateEvent) -> Value {
        let ts = Local::now().to_rfc3339();
        match event {
            UpdateEvent::RunStart {
                run_id,
                platform,
                site_version,
                total_tasks,
            } => json!({
                "v": 1,
                "event_type": "run.start",
                "ts": ts,
                "run_id": run_id,
                "metadata": {
                    "platform": platform,
                    "site_version": site_version,
                    "total_tasks": total_tasks,
                }
            }),
            UpdateEvent::NothingToDo { run_id } => json!({
                "v": 1,
                "event_type": "update.nothing_to_do",
                "ts": ts,
                "run_id": run_id,
                "metadata": {}
            }),
            UpdateEvent::Plan { run_id, tasks } => json!({
                "v": 1,
                "event_type": "update.plan",
                "ts": ts,
                "run_id": run_id,
                "metadata": {
                    "tasks": tasks,
                    "total_tasks": tasks.len(),
                }
            }),
            UpdateEvent::TaskStart {
                run_id,
                task,
                total,
            } => json!({
                "v": 1,
                "event_type": "task.start",
                "ts": ts,
                "run_id": run_id,
                "position": task.position,
                "metadata": {
                    "version": task.version,
                    "priority": task.priority,
                    "info": task.info,
                    "total": total,
                }
            }),
            UpdateEvent::TaskChange {
                run_id,
                position,
                change,
            } => json!({
                "v": 1,
                "event_type": "task.change",
                "ts": ts,
                "run_id": run_id,
                "position": position,
                "metadata": {
                    "change": change,
                }
            }),
            UpdateEvent::TaskWarning {
                run_id,
                position,
                warning,
            } => json!({
                "v": 1,
                "event_type": "task.warning",
                "ts": ts,
                "run_id": run_id,
                "position": position,
                "metadata": {
                    "warning": warning,
                }
            }),
            UpdateEvent::TaskError {
                run_id,
                position,
                error,
            } => json!({
                "v": 1,
                "event_type": "task.error",
                "ts": ts,
                "run_id": run_id,
                "position": position,
                "metadata": {
                    "error": error,
                }
            }),
            UpdateEvent::Stopped { run_id, position } => json!({
                "v": 1,
                "event_type": "update.stopped",
                "ts": ts,
                "run_id": run_id,
                "position": position,
                "metadata": {}
            }),
            UpdateEvent::RunEnd {
                run_id,
                executed,
                errors,
                stopped,
                dry_run,
                duration_ms,
            } => json!({
                "v": 1,
                "event_type": "run.end",
                "ts": ts,
                "run_id": run_id,
                "metadata": {
                    "executed": executed,
                    "errors": errors,
                    "stopped": stopped,
                    "dry_run": dry_run,
                    "success": !stopped && *errors == 0,
                    "duration_ms": duration_ms,
                }
            }),
        }
    }
}

impl ReportRendererPlugin for JsonlRendererPlugin {
    fn name(&self) -> &str {
        "jsonl-renderer"
    }

    fn format(&self) -> &str {
        "jsonl"
    }

    fn render(&self, event: &UpdateEvent) {
        let value = self.event_to_json(event);
        if self.pretty_print {
            println!("{}", serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".into()));
        } else {
            println!("{}", serde_json::to_string(&value).unwrap_or_else(|_| "{}".into()));
        }
    }
}
