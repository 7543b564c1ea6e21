//! Errors surfaced by the binary.

use std::path::PathBuf;

use sonde_application::HttpClientError;
use sonde_infrastructure::{ConfigError, LoadError, SerializationError};
use thiserror::Error;

/// Anything that stops a command before or after the run itself.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid or unreadable configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Suite or seed file could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The HTTP client could not be created.
    #[error("failed to create HTTP client: {0}")]
    Client(#[from] HttpClientError),

    /// The report could not be rendered.
    #[error("failed to render report: {0}")]
    Render(#[from] SerializationError),

    /// The report could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Output {
        /// Destination file.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
}

/// Result type alias for commands.
pub type AppResult<T> = Result<T, AppError>;
