//! Error types for persistence operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during persistence operations.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// Failed to read from file system.
    #[error("failed to read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write to file system.
    #[error("failed to write {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to create directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A record module could not be parsed back.
    #[error("invalid record module at {line}:{column}: {message}")]
    Literal {
        line: usize,
        column: usize,
        message: String,
    },

    /// A record module exports a different binding than expected.
    #[error("{path} exports `{found}`, expected `{expected}`")]
    ExportMismatch {
        path: PathBuf,
        expected: String,
        found: String,
    },

    /// The export name cannot be declared as a module binding.
    #[error("`{name}` is not a valid export name")]
    InvalidExportName { name: String },

    /// A blocking filesystem task did not complete.
    #[error("filesystem task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
}

impl PersistenceError {
    /// Path involved in the failure, when there is one.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::ReadError { path, .. }
            | Self::WriteError { path, .. }
            | Self::DirectoryError { path, .. }
            | Self::ExportMismatch { path, .. } => Some(path),
            Self::Literal { .. } | Self::InvalidExportName { .. } | Self::TaskFailed(_) => None,
        }
    }
}

/// Result type alias for persistence operations.
pub type Result<T> = std::result::Result<T, PersistenceError>;
