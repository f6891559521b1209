//! Versioned update orchestration.
//!
//! Decides, for an installed site at some version, which upgrade steps must
//! run, in what order, and stops safely on failure.
//!
//! # Architecture
//!
//! ```text
//! TaskRegistry (filled once at startup)
//!   ↓
//! TaskRegistry::candidates(platform, site_version)  → platform + applies_to filter
//!   ↓
//! ordering::order_tasks()                            → stable version/wildcard/priority sort
//!   ↓
//! UpdateProcessor::process(site_version, ctx)       → sequential run, fail-fast on stop
//!   ↓
//! RestartSweepTask (wildcard, Low)                   → restarts requested components once
//! ```

mod engine;
pub mod ordering;
pub mod output;
mod registry;
mod sweep;
pub mod traits;
pub mod types;

pub use engine::{UpdateProcessor, UpdateProcessorBuilder};
pub use output::{emit_event, text_lines};
pub use registry::TaskRegistry;
pub use sweep::RestartSweepTask;
pub use types::{
    ComponentRestarter, ExecutionContext, Priority, TaskOutcome, TaskRecord, UpdateOpts,
    UpdateReport, UpdateTask,
};
