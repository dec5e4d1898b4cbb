//! The completed-record database file.

use std::path::{Path, PathBuf};

use kata_models::CompletedRecordSet;
use tracing::{debug, error, info};

use crate::atomic::{atomic_write_async, read_to_string_optional};
use crate::error::{PersistenceError, Result};
use crate::literal::{is_valid_export_name, parse_module, render_module, LiteralStyle};

/// Default name of the exported constant.
pub const DEFAULT_EXPORT_NAME: &str = "userCompletedDB";

/// Writes and loads the record database module at a fixed path.
///
/// The file holds a single exported constant:
/// ```text
/// export const userCompletedDB = { ... }
/// ```
#[derive(Debug, Clone)]
pub struct RecordDatabase {
    path: PathBuf,
    export_name: String,
    style: LiteralStyle,
}

impl RecordDatabase {
    /// Creates a database handle for `path` exporting `export_name`.
    pub fn new(path: impl Into<PathBuf>, export_name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            export_name: export_name.into(),
            style: LiteralStyle::default(),
        }
    }

    /// Overrides the rendering style.
    pub fn with_style(mut self, style: LiteralStyle) -> Self {
        self.style = style;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn export_name(&self) -> &str {
        &self.export_name
    }

    /// Renders the module text for a record set without writing it.
    pub fn render(&self, records: &CompletedRecordSet) -> String {
        render_module(&self.export_name, records.as_value(), &self.style)
    }

    /// Replaces the whole database with `records`.
    ///
    /// Any existing content is overwritten. The write is atomic and has
    /// completed when this returns.
    ///
    /// # Errors
    /// An export name that is not a JavaScript identifier is rejected before
    /// anything is written. Write failures are logged and returned; nothing
    /// is retried.
    pub async fn replace(&self, records: &CompletedRecordSet) -> Result<PathBuf> {
        if !is_valid_export_name(&self.export_name) {
            error!(
                operation = "replace_record_database",
                export_name = %self.export_name,
                "refusing to write record database"
            );
            return Err(PersistenceError::InvalidExportName {
                name: self.export_name.clone(),
            });
        }
        let module = self.render(records);
        debug!(path = %self.path.display(), bytes = module.len(), "rendered record database");

        match atomic_write_async(self.path.clone(), module.into_bytes()).await {
            Ok(()) => {
                info!(path = %self.path.display(), "updated record database");
                Ok(self.path.clone())
            }
            Err(e) => {
                error!(
                    operation = "replace_record_database",
                    path = %self.path.display(),
                    error = %e,
                    "failed to write record database"
                );
                Err(e)
            }
        }
    }

    /// Loads the record set back from disk.
    pub async fn load(&self) -> Result<CompletedRecordSet> {
        match self.load_optional().await? {
            Some(records) => Ok(records),
            None => Err(PersistenceError::ReadError {
                path: self.path.clone(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            }),
        }
    }

    /// Loads the record set, returning None if the file doesn't exist.
    pub async fn load_optional(&self) -> Result<Option<CompletedRecordSet>> {
        let Some(source) = read_to_string_optional(&self.path).await? else {
            return Ok(None);
        };
        let (name, value) = parse_module(&source)?;
        if name != self.export_name {
            return Err(PersistenceError::ExportMismatch {
                path: self.path.clone(),
                expected: self.export_name.clone(),
                found: name,
            });
        }
        Ok(Some(CompletedRecordSet::new(value)))
    }
}
