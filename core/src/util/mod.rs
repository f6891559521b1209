pub mod version;

pub use version::{equivalent, less_recent_than, more_recent_than, SiteVersion, TaskVersion};
