use anyhow::Context;
use tracing::info;

use crate::platform::Platform;
use crate::util::version::{self, SiteVersion, TaskVersion};

use super::types::{ComponentRestarter, ExecutionContext, Priority, TaskOutcome, UpdateTask};

/// Terminal consumer of restart intents.
///
/// Wildcard version and lowest priority put it after every other candidate,
/// so however many tasks asked for a restart, each component is restarted at
/// most once per run.
pub struct RestartSweepTask {
    release: SiteVersion,
    platforms: Vec<Platform>,
}

impl RestartSweepTask {
    pub fn new(release: SiteVersion, platforms: impl Into<Vec<Platform>>) -> Self {
        Self {
            release,
            platforms: platforms.into(),
        }
    }

    pub fn release(&self) -> &SiteVersion {
        &self.release
    }
}

impl<C: ComponentRestarter> UpdateTask<C> for RestartSweepTask {
    fn version(&self) -> TaskVersion {
        TaskVersion::Wildcard
    }

    fn info(&self) -> &str {
        "Restart components affected by the update"
    }

    /// Pending whenever the site predates the release being installed.
    fn applies_to(&self, site_version: &str) -> bool {
        version::less_recent_than(site_version, &self.release.to_string())
    }

    fn priority(&self) -> Priority {
        Priority::Low
    }

    fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    fn run(&self, ctx: &mut ExecutionContext<C>) -> TaskOutcome {
        let mut outcome = TaskOutcome::ok();
        let mut failures = Vec::new();

        if ctx.take_router_restart() {
            info!("restarting router");
            match ctx.client_mut().restart_router().context("unable to restart router") {
                Ok(()) => outcome.record_change("router restarted"),
                Err(e) => failures.push(e),
            }
        }

        if ctx.take_controller_restart() {
            info!("restarting controller");
            match ctx
                .client_mut()
                .restart_controller()
                .context("unable to restart controller")
            {
                Ok(()) => outcome.record_change("controller restarted"),
                Err(e) => failures.push(e),
            }
        }

        if !failures.is_empty() {
            let messages: Vec<String> = failures.iter().map(|e| format!("{e:#}")).collect();
            outcome.record_error(anyhow::anyhow!(messages.join("; ")));
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        router: usize,
        controller: usize,
        fail_router: bool,
    }

    impl ComponentRestarter for Counter {
        fn restart_router(&mut self) -> anyhow::Result<()> {
            if self.fail_router {
                anyhow::bail!("router deployment not found");
            }
            self.router += 1;
            Ok(())
        }

        fn restart_controller(&mut self) -> anyhow::Result<()> {
            self.controller += 1;
            Ok(())
        }
    }

    fn sweep() -> RestartSweepTask {
        RestartSweepTask::new(SiteVersion::new(1, 5, 0), Platform::ALL)
    }

    #[test]
    fn restarts_each_component_once() {
        let task = sweep();
        let mut ctx = ExecutionContext::new(Counter::default());
        ctx.request_router_restart();
        ctx.request_router_restart();
        ctx.request_controller_restart();

        let outcome = task.run(&mut ctx);
        assert!(outcome.error.is_none());
        assert_eq!(outcome.changes, vec!["router restarted", "controller restarted"]);
        assert_eq!(ctx.client().router, 1);
        assert_eq!(ctx.client().controller, 1);

        // flags were consumed
        let again = task.run(&mut ctx);
        assert!(!again.changed());
        assert_eq!(ctx.client().router, 1);
    }

    #[test]
    fn no_restart_without_intent() {
        let mut ctx = ExecutionContext::new(Counter::default());
        let outcome = sweep().run(&mut ctx);
        assert!(!outcome.changed());
        assert_eq!(ctx.client().router + ctx.client().controller, 0);
    }

    #[test]
    fn restart_failure_is_recoverable() {
        let mut ctx = ExecutionContext::new(Counter {
            fail_router: true,
            ..Counter::default()
        });
        ctx.request_router_restart();
        ctx.request_controller_restart();

        let outcome = sweep().run(&mut ctx);
        assert!(!outcome.stop);
        let err = outcome.error.expect("router failure reported");
        assert!(format!("{err:#}").contains("router deployment not found"));
        assert_eq!(ctx.client().controller, 1);
    }

    #[test]
    fn applies_below_release_only() {
        let task = sweep();
        assert!(UpdateTask::<Counter>::applies_to(&task, "1.4.2"));
        assert!(!UpdateTask::<Counter>::applies_to(&task, "1.5.0"));
        assert!(!UpdateTask::<Counter>::applies_to(&task, "garbage"));
    }
}
