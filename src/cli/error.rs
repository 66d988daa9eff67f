//! Error types for CLI operations

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced to the terminal user
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command-line argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Failed to read a file
    #[error("Failed to read {0}: {1}")]
    FileReadError(PathBuf, String),

    /// Failed to write a file
    #[error("Failed to write {0}: {1}")]
    FileWriteError(PathBuf, String),

    /// Configuration problem
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The analysis itself failed
    #[error("Analysis error: {0}")]
    AnalysisError(String),
}
