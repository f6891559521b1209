use std::fmt;

use serde::{Deserialize, Serialize};

use crate::platform::Platform;
use crate::util::version::TaskVersion;

use super::context::ExecutionContext;
use super::result::TaskOutcome;

/// Tie-break between tasks gated on the same version. `High` runs first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Common,
    Low,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Priority::High => "High",
            Priority::Common => "Common",
            Priority::Low => "Low",
        };
        f.write_str(s)
    }
}

/// One discrete, version-gated upgrade step.
///
/// `C` is the platform client carried by the [`ExecutionContext`] of a run.
/// Implementations are stateless: everything a run needs to share between
/// tasks goes through the context.
pub trait UpdateTask<C>: Send + Sync {
    /// Version that introduced the change, or the wildcard for catch-all steps.
    fn version(&self) -> TaskVersion;

    /// One line description, display only.
    fn info(&self) -> &str;

    /// True iff the change has not been applied yet to a site at `site_version`.
    fn applies_to(&self, site_version: &str) -> bool;

    fn priority(&self) -> Priority;

    /// Platforms this task is relevant to. Never empty.
    fn platforms(&self) -> &[Platform];

    fn run(&self, ctx: &mut ExecutionContext<C>) -> TaskOutcome;

    fn supports(&self, platform: Platform) -> bool {
        self.platforms().contains(&platform)
    }
}
