//! Error type for the headless runner.

use arena_core::error::GameError;
use thiserror::Error;

/// Error type for runner operations.
#[derive(Error, Debug)]
pub enum RunnerError {
    /// Tournament construction, config or ledger failure.
    #[error(transparent)]
    Game(#[from] GameError),
    /// Failed to read or write a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Failed to encode or decode JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias using [`RunnerError`].
pub type Result<T> = std::result::Result<T, RunnerError>;
