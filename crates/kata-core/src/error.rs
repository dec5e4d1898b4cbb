//! Error types for the archive crate.

use thiserror::Error;

/// Errors that can occur while configuring or running an import.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// A fatal filesystem failure.
    #[error(transparent)]
    Persistence(#[from] kata_persistence::PersistenceError),

    /// A configuration value could not be used.
    #[error("invalid {key} value {value:?}: {reason}")]
    InvalidConfig {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Result type for archive operations.
pub type Result<T> = std::result::Result<T, ArchiveError>;
