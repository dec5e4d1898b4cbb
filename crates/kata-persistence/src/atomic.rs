//! Atomic file operations for all-or-nothing writes.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{PersistenceError, Result};
use crate::FILE_MODE;

/// Writes data to a file atomically.
///
/// The data goes to a temporary file in the target's directory first, which
/// is then renamed over the target. Readers see either the old content or
/// the new content, never a partial write. The final file has `FILE_MODE`
/// permissions on unix.
///
/// # Errors
/// Returns an error if the parent directory cannot be created, or if the
/// write, permission change or rename fails.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|source| PersistenceError::DirectoryError {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let write_err = |source| PersistenceError::WriteError {
        path: path.to_path_buf(),
        source,
    };

    let mut temp_file = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
    temp_file.write_all(data).map_err(write_err)?;
    temp_file.flush().map_err(write_err)?;
    temp_file.as_file().sync_all().map_err(write_err)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        temp_file
            .as_file()
            .set_permissions(fs::Permissions::from_mode(FILE_MODE))
            .map_err(write_err)?;
    }

    temp_file
        .persist(path)
        .map_err(|e| PersistenceError::WriteError {
            path: path.to_path_buf(),
            source: e.error,
        })?;

    Ok(())
}

/// Runs [`atomic_write`] on the blocking pool and waits for it to finish.
pub async fn atomic_write_async(path: PathBuf, data: Vec<u8>) -> Result<()> {
    tokio::task::spawn_blocking(move || atomic_write(&path, &data)).await?
}

/// Reads a UTF-8 file, returning None if it doesn't exist.
pub async fn read_to_string_optional(path: &Path) -> Result<Option<String>> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(PersistenceError::ReadError {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_atomic_write_creates_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("records.ts");

        atomic_write(&path, b"export const a = 1\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "export const a = 1\n");
    }

    #[test]
    fn test_atomic_write_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/data/records.ts");

        atomic_write(&path, b"nested").unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_atomic_write_replaces_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("records.ts");

        atomic_write(&path, b"first version that is longer").unwrap();
        atomic_write(&path, b"second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn test_atomic_write_leaves_no_temp_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("records.ts");

        atomic_write(&path, b"x").unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_atomic_write_sets_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("records.ts");

        atomic_write(&path, b"x").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, FILE_MODE);
    }

    #[test]
    fn test_atomic_write_onto_directory_fails() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("taken");
        fs::create_dir(&target).unwrap();

        let err = atomic_write(&target, b"x").unwrap_err();
        assert!(matches!(err, PersistenceError::WriteError { .. }));
    }

    #[tokio::test]
    async fn test_read_to_string_optional_missing() {
        let dir = tempdir().unwrap();

        let result = read_to_string_optional(&dir.path().join("missing.ts"))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_atomic_write_async_then_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("records.ts");

        atomic_write_async(path.clone(), b"async".to_vec()).await.unwrap();

        let text = read_to_string_optional(&path).await.unwrap();
        assert_eq!(text.as_deref(), Some("async"));
    }
}
