//! Top-level error types for the fontpak binary and library surface.

use thiserror::Error;

/// Result type alias for top-level operations
pub type Result<T> = std::result::Result<T, FontpakError>;

/// Main error type wrapping every failure domain
#[derive(Error, Debug)]
pub enum FontpakError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Pipeline errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] crate::pipeline::error::Error),

    /// Generic errors from anyhow
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },
}
