//! Tasks shared by every platform.

use anyhow::Context;
use siteup_core::api::{
    less_recent_than, ExecutionContext, Platform, Priority, SiteVersion, TaskOutcome, TaskVersion,
    UpdateTask,
};

use crate::client::SiteClient;

/// Records the release version on the site once every migration ran.
///
/// Runs after all version-gated tasks and before the restart sweep. The
/// version is left in place when any earlier task of the run failed, stopped
/// or not, so the next run selects the failed migrations again.
pub struct VersionStampTask {
    release: SiteVersion,
    platforms: Vec<Platform>,
}

impl VersionStampTask {
    pub fn new(release: SiteVersion, platforms: impl Into<Vec<Platform>>) -> Self {
        Self {
            release,
            platforms: platforms.into(),
        }
    }
}

impl<C: SiteClient> UpdateTask<C> for VersionStampTask {
    fn version(&self) -> TaskVersion {
        TaskVersion::Wildcard
    }

    fn info(&self) -> &str {
        "Update the site version"
    }

    fn applies_to(&self, site_version: &str) -> bool {
        less_recent_than(site_version, &self.release.to_string())
    }

    fn priority(&self) -> Priority {
        Priority::Common
    }

    fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    fn run(&self, ctx: &mut ExecutionContext<C>) -> TaskOutcome {
        let release = self.release.to_string();
        let failed = ctx.failed_tasks();
        if failed > 0 {
            return TaskOutcome::failed(anyhow::anyhow!(
                "site version not set to {release}: {failed} earlier task(s) failed"
            ));
        }
        match ctx
            .client_mut()
            .set_site_version(&release)
            .context("unable to record site version")
        {
            Ok(()) => TaskOutcome::ok().with_change(format!("site version set to {release}")),
            Err(e) => TaskOutcome::failed(e),
        }
    }
}
