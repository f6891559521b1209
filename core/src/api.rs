//! Stable re-exports for consumers (`cli`, `plugins`, and external crates).
//!
//! Prefer importing from `siteup_core::api` instead of reaching into internal modules.

pub use crate::config::{
    apply_env_overrides, load_default, load_from_path, AppConfig, ClientConfig, LoggingConfig,
    OutputConfig,
};
pub use crate::error::{CliError, UpdateError};
pub use crate::platform::Platform;
pub use crate::update::traits::{PlannedTask, ReportRendererPlugin, UpdateEvent};
pub use crate::update::{
    ComponentRestarter, ExecutionContext, Priority, RestartSweepTask, TaskOutcome, TaskRecord,
    TaskRegistry, UpdateOpts, UpdateProcessor, UpdateReport, UpdateTask,
};
pub use crate::update::{emit_event, text_lines};
pub use crate::util::version::{
    equivalent, less_recent_than, more_recent_than, SiteVersion, TaskVersion, VersionError,
};
