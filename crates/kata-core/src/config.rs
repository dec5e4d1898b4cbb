//! Archive configuration.
//!
//! Paths are passed explicitly to the persistence layer; nothing here is
//! read behind the caller's back after [`ArchiveConfig`] is built.
//!
//! # Storage Structure
//!
//! ```text
//! ~/.kata-archive/
//! ├── data/
//! │   └── userCompletedDB.ts   # record database
//! └── katas/                   # exercise root
//!     └── <slug>/...
//! ```
//!
//! # Environment Variables
//!
//! - `KATA_STATE_DIR`: Override the base directory
//! - `KATA_DB_PATH`: Override the record database file
//! - `KATA_EXERCISE_ROOT`: Override the exercise root directory
//! - `KATA_EXPORT_NAME`: Override the exported constant name
//! - `KATA_IMPORT_CONCURRENCY`: Exercises imported in parallel by a batch
//!
//! [`ArchiveConfig::from_env`] first loads `.env.local` from the current
//! directory when present. Variables already set in the process win.

use std::path::{Path, PathBuf};

use kata_persistence::literal::is_valid_export_name;
use kata_persistence::{LiteralStyle, DEFAULT_EXPORT_NAME};
use tracing::debug;

use crate::error::{ArchiveError, Result};

/// Environment variable for a custom base directory.
pub const STATE_DIR_ENV: &str = "KATA_STATE_DIR";

/// Environment variable for a custom record database path.
pub const DB_PATH_ENV: &str = "KATA_DB_PATH";

/// Environment variable for a custom exercise root.
pub const EXERCISE_ROOT_ENV: &str = "KATA_EXERCISE_ROOT";

/// Environment variable for the exported constant name.
pub const EXPORT_NAME_ENV: &str = "KATA_EXPORT_NAME";

/// Environment variable for batch import concurrency.
pub const IMPORT_CONCURRENCY_ENV: &str = "KATA_IMPORT_CONCURRENCY";

/// Optional dotenv file read by [`ArchiveConfig::from_env`].
pub const ENV_FILE: &str = ".env.local";

/// Default base directory name under home.
const DEFAULT_STATE_DIR: &str = ".kata-archive";

const DATA_SUBDIR: &str = "data";
const KATAS_SUBDIR: &str = "katas";
const DB_FILE_NAME: &str = "userCompletedDB.ts";

const DEFAULT_IMPORT_CONCURRENCY: usize = 4;

/// Get the default base directory.
///
/// `~/.kata-archive` if a home directory is available, otherwise
/// `.kata-archive` in the current directory.
pub fn default_state_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(DEFAULT_STATE_DIR))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_DIR))
}

/// Loads variables from a dotenv file if it exists.
///
/// Returns true when the file was found and read.
pub fn load_env_file(path: &Path) -> bool {
    match dotenvy::from_path(path) {
        Ok(()) => {
            debug!(path = %path.display(), "loaded environment file");
            true
        }
        Err(_) => false,
    }
}

fn expand(value: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(value).into_owned())
}

/// Configuration for an archive.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveConfig {
    /// Record database file.
    pub record_db_path: PathBuf,
    /// Directory holding one subdirectory per kata.
    pub exercise_root: PathBuf,
    /// Name of the constant exported by the record database.
    pub export_name: String,
    /// Exercises imported in parallel by a batch.
    pub import_concurrency: usize,
    /// Formatting of the record database.
    pub style: LiteralStyle,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self::in_state_dir(&default_state_dir())
    }
}

impl ArchiveConfig {
    /// Creates a config rooted at `state_dir` with default file names.
    pub fn in_state_dir(state_dir: &Path) -> Self {
        Self {
            record_db_path: state_dir.join(DATA_SUBDIR).join(DB_FILE_NAME),
            exercise_root: state_dir.join(KATAS_SUBDIR),
            export_name: DEFAULT_EXPORT_NAME.to_string(),
            import_concurrency: DEFAULT_IMPORT_CONCURRENCY,
            style: LiteralStyle::default(),
        }
    }

    /// Resolves the config from process environment variables after loading
    /// `.env.local`, if there is one.
    ///
    /// # Errors
    /// Returns an error if `KATA_IMPORT_CONCURRENCY` is not a positive
    /// integer or `KATA_EXPORT_NAME` is not a JavaScript identifier.
    pub fn from_env() -> Result<Self> {
        Self::from_env_file(Path::new(ENV_FILE))
    }

    /// Like [`ArchiveConfig::from_env`], reading the dotenv file at `path`.
    pub fn from_env_file(path: &Path) -> Result<Self> {
        load_env_file(path);
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let state_dir = lookup(STATE_DIR_ENV)
            .map(|v| expand(&v))
            .unwrap_or_else(default_state_dir);
        let mut config = Self::in_state_dir(&state_dir);

        if let Some(path) = lookup(DB_PATH_ENV) {
            config.record_db_path = expand(&path);
        }
        if let Some(root) = lookup(EXERCISE_ROOT_ENV) {
            config.exercise_root = expand(&root);
        }
        if let Some(name) = lookup(EXPORT_NAME_ENV) {
            if !is_valid_export_name(&name) {
                return Err(ArchiveError::InvalidConfig {
                    key: EXPORT_NAME_ENV,
                    value: name,
                    reason: "expected a JavaScript identifier",
                });
            }
            config.export_name = name;
        }
        if let Some(raw) = lookup(IMPORT_CONCURRENCY_ENV) {
            config.import_concurrency = match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ArchiveError::InvalidConfig {
                        key: IMPORT_CONCURRENCY_ENV,
                        value: raw,
                        reason: "expected a positive integer",
                    })
                }
            };
        }

        Ok(config)
    }

    /// Sets the record database path.
    pub fn with_record_db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.record_db_path = path.into();
        self
    }

    /// Sets the exercise root.
    pub fn with_exercise_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.exercise_root = root.into();
        self
    }

    /// Sets the exported constant name.
    ///
    /// The name is checked when the record database is written.
    pub fn with_export_name(mut self, name: impl Into<String>) -> Self {
        self.export_name = name.into();
        self
    }

    /// Sets batch import concurrency; zero is treated as one.
    pub fn with_import_concurrency(mut self, n: usize) -> Self {
        self.import_concurrency = n.max(1);
        self
    }

    /// Sets the record database print width.
    pub fn with_print_width(mut self, width: usize) -> Self {
        self.style = self.style.with_print_width(width);
        self
    }
}
