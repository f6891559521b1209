use thiserror::Error;

use super::update::UpdateError;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("config error: {0}")]
    Config(String),
    #[error("platform error: {0}")]
    Platform(String),
    #[error(transparent)]
    Update(#[from] UpdateError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}
