#[allow(clippy::module_inception)]
pub mod error;
pub mod update;

pub use error::CliError;
pub use update::UpdateError;
