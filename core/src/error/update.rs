use thiserror::Error;

/// Aggregate failure of a `process` call.
#[derive(Error, Debug)]
pub enum UpdateError {
    /// A task returned `stop`; `errors` holds what was accumulated up to and
    /// including that task.
    #[error("Update stopped with {} errors: {}", .errors.len(), .errors.join("; "))]
    Stopped { errors: Vec<String> },

    /// Every task ran but some reported recoverable errors.
    #[error("Update completed with {} errors: {}", .errors.len(), .errors.join("; "))]
    CompletedWithErrors { errors: Vec<String> },
}

impl UpdateError {
    pub fn errors(&self) -> &[String] {
        match self {
            Self::Stopped { errors } | Self::CompletedWithErrors { errors } => errors,
        }
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self, Self::Stopped { .. })
    }
}
