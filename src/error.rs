//! Error types for watchrun
//!
//! Library code returns `WatchError`; the binary wraps it in `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for watchrun operations
pub type WatchResult<T> = Result<T, WatchError>;

/// Main error type for watchrun operations
#[derive(Error, Debug)]
pub enum WatchError {
    /// The watched directory could not be listed
    #[error("readdir {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The change notification backend could not be started
    #[error("change backend: {0}")]
    Backend(String),

    /// A path could not be subscribed for change events
    #[error("cannot watch {path}: {message}")]
    Subscribe { path: PathBuf, message: String },

    /// The external command could not be launched
    #[error("{command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The Ctrl+C handler could not be installed
    #[error("cannot handle Ctrl+C: {0}")]
    Signal(#[from] ctrlc::Error),

    /// Invalid configuration file
    #[error("invalid config in {file}: {message}")]
    Config { file: PathBuf, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<notify::Error> for WatchError {
    fn from(err: notify::Error) -> Self {
        WatchError::Backend(err.to_string())
    }
}
