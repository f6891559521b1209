use serde::{Deserialize, Serialize};

/// Runtime switches for a processor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateOpts {
    /// Report changes and warnings of each task, not only errors.
    #[serde(default)]
    pub verbose: bool,

    /// Resolve and render the execution plan without running any task.
    #[serde(default)]
    pub dry_run: bool,
}
