//! Error types for pipeline operations.

use std::path::Path;
use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for all pipeline stages
#[derive(Error, Debug)]
pub enum Error {
    /// Generic errors with a preformatted message
    #[error("{0}")]
    GenericError(String),

    /// An external tool could not be spawned
    #[error("failed to run {command}: {error}")]
    CommandFailed {
        /// Command that failed to launch
        command: String,
        /// Underlying spawn error
        #[source]
        error: std::io::Error,
    },

    /// A caller-supplied language token failed validation
    #[error("invalid language token {token:?}: only letters, digits, '_' and '-' are allowed")]
    InvalidLanguage {
        /// The rejected token
        token: String,
    },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file parse errors
    #[error("config error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Extension trait for attaching filesystem context to IO results.
pub trait ErrorExt<T> {
    /// Wrap an IO error with the action and path it occurred on.
    fn fs_context(self, action: &str, path: &Path) -> Result<T>;
}

impl<T> ErrorExt<T> for std::io::Result<T> {
    fn fs_context(self, action: &str, path: &Path) -> Result<T> {
        self.map_err(|e| Error::GenericError(format!("{action} ({}): {e}", path.display())))
    }
}
