use std::sync::Arc;
use std::time::Instant;

use chrono::Local;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::error::UpdateError;
use crate::platform::Platform;

use super::ordering::order_tasks;
use super::output::emit_event;
use super::registry::TaskRegistry;
use super::traits::{PlannedTask, ReportRendererPlugin, UpdateEvent};
use super::types::{ExecutionContext, TaskRecord, UpdateOpts, UpdateReport, UpdateTask};

/// Sequential, fail-fast update processor for one platform.
///
/// Owns the task registry: registration must be complete before the
/// processor is built, and runs never alter it.
pub struct UpdateProcessor<C> {
    platform: Platform,
    registry: TaskRegistry<C>,
    renderer: Option<Arc<dyn ReportRendererPlugin>>,
    opts: UpdateOpts,
}

pub struct UpdateProcessorBuilder<C> {
    platform: Platform,
    registry: TaskRegistry<C>,
    renderer: Option<Arc<dyn ReportRendererPlugin>>,
    opts: UpdateOpts,
}

impl<C> UpdateProcessorBuilder<C> {
    pub fn new(platform: Platform, registry: TaskRegistry<C>) -> Self {
        Self {
            platform,
            registry,
            renderer: None,
            opts: UpdateOpts::default(),
        }
    }

    pub fn renderer(mut self, renderer: Arc<dyn ReportRendererPlugin>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn opts(mut self, opts: UpdateOpts) -> Self {
        self.opts = opts;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.opts.verbose = verbose;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.opts.dry_run = dry_run;
        self
    }

    pub fn build(self) -> UpdateProcessor<C> {
        UpdateProcessor {
            platform: self.platform,
            registry: self.registry,
            renderer: self.renderer,
            opts: self.opts,
        }
    }
}

impl<C> UpdateProcessor<C> {
    pub fn new(platform: Platform, registry: TaskRegistry<C>) -> Self {
        UpdateProcessorBuilder::new(platform, registry).build()
    }

    pub fn builder(platform: Platform, registry: TaskRegistry<C>) -> UpdateProcessorBuilder<C> {
        UpdateProcessorBuilder::new(platform, registry)
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn registry(&self) -> &TaskRegistry<C> {
        &self.registry
    }

    pub fn opts(&self) -> &UpdateOpts {
        &self.opts
    }

    /// Candidates for `site_version` in execution order. No side effects.
    pub fn plan(&self, site_version: &str) -> Vec<&dyn UpdateTask<C>> {
        let mut tasks = self.registry.candidates(self.platform, site_version);
        order_tasks(&mut tasks);
        tasks
    }

    /// Run every pending task for a site at `site_version`, in order.
    ///
    /// A recoverable task error is reported and the run continues; the call
    /// then fails with [`UpdateError::CompletedWithErrors`]. A task asking to
    /// stop ends the run at once with [`UpdateError::Stopped`]. Every failed
    /// task is counted on the context so later tasks can see it. The context
    /// is consumed: every run gets a fresh one.
    pub fn process(
        &self,
        site_version: &str,
        mut ctx: ExecutionContext<C>,
    ) -> Result<UpdateReport, UpdateError> {
        let start = Instant::now();
        let run_id = Uuid::new_v4().to_string();
        let tasks = self.plan(site_version);
        let total = tasks.len();
        let planned: Vec<PlannedTask> = tasks
            .iter()
            .enumerate()
            .map(|(idx, task)| planned_task(idx + 1, *task))
            .collect();

        info!(
            run_id = %run_id,
            platform = %self.platform,
            site_version,
            tasks = total,
            "update run started"
        );
        self.emit(&UpdateEvent::RunStart {
            run_id: run_id.clone(),
            platform: self.platform,
            site_version: site_version.to_string(),
            total_tasks: total,
        });

        let mut report = UpdateReport {
            run_id: run_id.clone(),
            platform: self.platform,
            site_version: site_version.to_string(),
            dry_run: self.opts.dry_run,
            started_at: Local::now(),
            planned: planned.iter().map(|t| t.info.clone()).collect(),
            executed: Vec::new(),
            duration_ms: 0,
        };

        if tasks.is_empty() {
            info!(run_id = %run_id, "no update task applies");
            self.emit(&UpdateEvent::NothingToDo {
                run_id: run_id.clone(),
            });
            report.duration_ms = start.elapsed().as_millis() as u64;
            self.emit(&UpdateEvent::RunEnd {
                run_id,
                executed: 0,
                errors: 0,
                stopped: false,
                dry_run: self.opts.dry_run,
                duration_ms: report.duration_ms,
            });
            return Ok(report);
        }

        if self.opts.dry_run {
            self.emit(&UpdateEvent::Plan {
                run_id: run_id.clone(),
                tasks: planned,
            });
            report.duration_ms = start.elapsed().as_millis() as u64;
            self.emit(&UpdateEvent::RunEnd {
                run_id,
                executed: 0,
                errors: 0,
                stopped: false,
                dry_run: true,
                duration_ms: report.duration_ms,
            });
            return Ok(report);
        }

        let mut errors: Vec<String> = Vec::new();
        let mut stopped = false;

        for (task, planned) in tasks.into_iter().zip(planned) {
            let position = planned.position;
            self.emit(&UpdateEvent::TaskStart {
                run_id: run_id.clone(),
                task: planned.clone(),
                total,
            });
            debug!(run_id = %run_id, position, total, task = task.info(), "running update task");

            let outcome = task.run(&mut ctx);

            for change in &outcome.changes {
                self.emit(&UpdateEvent::TaskChange {
                    run_id: run_id.clone(),
                    position,
                    change: change.clone(),
                });
            }
            for warning in &outcome.warnings {
                self.emit(&UpdateEvent::TaskWarning {
                    run_id: run_id.clone(),
                    position,
                    warning: warning.clone(),
                });
            }

            let task_error = outcome.error.as_ref().map(|e| format!("{e:#}"));
            if let Some(message) = &task_error {
                ctx.record_failure();
                warn!(run_id = %run_id, position, task = task.info(), error = %message, "update task failed");
                errors.push(message.clone());
                self.emit(&UpdateEvent::TaskError {
                    run_id: run_id.clone(),
                    position,
                    error: message.clone(),
                });
            }

            report.executed.push(TaskRecord {
                position,
                version: planned.version,
                priority: planned.priority,
                info: planned.info,
                error: task_error,
                stopped: outcome.stop,
                changes: outcome.changes,
                warnings: outcome.warnings,
            });

            if outcome.stop {
                error!(run_id = %run_id, position, total, "update stopped by task");
                self.emit(&UpdateEvent::Stopped {
                    run_id: run_id.clone(),
                    position,
                });
                stopped = true;
                break;
            }
        }

        report.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            run_id = %run_id,
            executed = report.executed.len(),
            errors = errors.len(),
            stopped,
            duration_ms = report.duration_ms,
            "update run finished"
        );
        self.emit(&UpdateEvent::RunEnd {
            run_id,
            executed: report.executed.len(),
            errors: errors.len(),
            stopped,
            dry_run: false,
            duration_ms: report.duration_ms,
        });

        if stopped {
            Err(UpdateError::Stopped { errors })
        } else if !errors.is_empty() {
            Err(UpdateError::CompletedWithErrors { errors })
        } else {
            Ok(report)
        }
    }

    fn emit(&self, event: &UpdateEvent) {
        match &self.renderer {
            Some(renderer) => renderer.render(event),
            None => emit_event(&self.opts, event),
        }
    }
}

fn planned_task<C>(position: usize, task: &dyn UpdateTask<C>) -> PlannedTask {
    PlannedTask {
        position,
        version: task.version().to_string(),
        priority: task.priority(),
        info: task.info().to_string(),
    }
}
