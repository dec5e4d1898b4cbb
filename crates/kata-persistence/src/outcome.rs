//! Outcome of a write-once file write.

use std::path::{Path, PathBuf};

use crate::error::{PersistenceError, Result};

/// What happened to a write-once file.
///
/// Write-once writers never return `Err`; callers decide per call whether a
/// `Failed` outcome should stop them via [`WriteOutcome::into_result`].
#[derive(Debug)]
pub enum WriteOutcome {
    /// The file was created with the given content.
    Written { path: PathBuf },
    /// A file already existed at the path and was left untouched.
    SkippedExisting { path: PathBuf },
    /// The write failed for another reason.
    Failed {
        path: PathBuf,
        error: PersistenceError,
    },
}

impl WriteOutcome {
    /// Target path of the write.
    pub fn path(&self) -> &Path {
        match self {
            Self::Written { path } | Self::SkippedExisting { path } | Self::Failed { path, .. } => {
                path
            }
        }
    }

    pub fn is_written(&self) -> bool {
        matches!(self, Self::Written { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::SkippedExisting { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Converts into a `Result`, treating a skipped write as success.
    pub fn into_result(self) -> Result<PathBuf> {
        match self {
            Self::Written { path } | Self::SkippedExisting { path } => Ok(path),
            Self::Failed { error, .. } => Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skipped_is_success() {
        let outcome = WriteOutcome::SkippedExisting {
            path: PathBuf::from("/k/python/two_sum.py"),
        };

        assert!(outcome.is_skipped());
        assert!(!outcome.is_written());
        assert_eq!(outcome.into_result().unwrap(), PathBuf::from("/k/python/two_sum.py"));
    }

    #[test]
    fn test_failed_promotes_to_error() {
        let outcome = WriteOutcome::Failed {
            path: PathBuf::from("/k/python/two_sum.py"),
            error: PersistenceError::WriteError {
                path: PathBuf::from("/k/python/two_sum.py"),
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            },
        };

        assert!(outcome.is_failed());
        assert_eq!(outcome.path(), Path::new("/k/python/two_sum.py"));
        assert!(matches!(
            outcome.into_result(),
            Err(PersistenceError::WriteError { .. })
        ));
    }
}
