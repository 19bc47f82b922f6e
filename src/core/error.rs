//! Defines the custom error type for the `core` module.

use std::path::PathBuf;
use thiserror::Error;

/// The primary error type for the `core` module.
///
/// The selection and bundling engine itself never fails; these variants describe
/// failures of the content providers that feed it (directory listing, file reading,
/// and the transport that carries those requests).
#[derive(Debug, Error)]
pub enum CoreError {
    /// The caller did not supply a directory path.
    #[error("Please enter a directory path")]
    PathMissing,

    /// Represents an I/O error, typically from file system operations.
    #[error("I/O error for path {1}: {0}")]
    Io(#[source] std::io::Error, PathBuf),

    /// Represents a path that was expected to be a directory but was not.
    #[error("Path is not a valid directory: {0}")]
    NotADirectory(PathBuf),

    /// Represents an error that occurred when a Tokio task was joined.
    #[error("Task join error: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// The request to a remote provider could not be made or completed.
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// A remote provider answered, but reported a failure.
    #[error("{0}")]
    Provider(String),
}

impl CoreError {
    /// Returns the message shown in the error banner for this failure.
    ///
    /// Transport failures are reported generically; everything else carries its own text.
    pub fn user_message(&self) -> String {
        match self {
            CoreError::Transport(_) | CoreError::Join(_) => {
                "Failed to load directory. Please check the path and try again.".to_string()
            }
            CoreError::Io(..) | CoreError::NotADirectory(_) => "Unable to read directory".to_string(),
            other => other.to_string(),
        }
    }
}
