//! Writers for per-exercise directories, descriptions and solutions.
//!
//! Two failure classes apply:
//! - directory creation and the description document return `Err` after
//!   logging, so the caller stops;
//! - solution and test files are write-once and never return `Err`. An
//!   existing file is skipped with a warning and any other failure is
//!   reported as [`WriteOutcome::Failed`] after a warning.

use std::future::Future;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use kata_models::{ExerciseDescriptor, Language, SolutionPayload};
use tokio::fs::{DirBuilder, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{error, info, warn};

use crate::error::{PersistenceError, Result};
use crate::outcome::WriteOutcome;
use crate::{DIR_MODE, FILE_MODE};

/// Which write-once file is being written, for log lines.
#[derive(Debug, Clone, Copy)]
enum FileKind {
    Code,
    Test,
}

impl FileKind {
    fn label(self) -> &'static str {
        match self {
            Self::Code => "CODE",
            Self::Test => "TEST",
        }
    }
}

/// Stateless writer for the files of one exercise at a time.
#[derive(Debug, Clone, Default)]
pub struct ExerciseWriter;

impl ExerciseWriter {
    pub fn new() -> Self {
        Self
    }

    /// Creates the exercise root directory and any missing parents.
    ///
    /// # Errors
    /// Returns an error for anything other than the directory already
    /// existing, e.g. permission denied or a file in the way.
    pub async fn ensure_kata_dir(&self, kata: &ExerciseDescriptor) -> Result<PathBuf> {
        create_dir(&kata.kata_path, "ensure_kata_dir").await?;
        info!(path = %kata.kata_path.display(), "{} is ready", kata.kata_path.display());
        Ok(kata.kata_path.clone())
    }

    /// Creates `<kata_path>/<cur_lang>` and any missing parents.
    ///
    /// # Errors
    /// Same as [`ExerciseWriter::ensure_kata_dir`].
    pub async fn ensure_lang_dir(&self, kata: &ExerciseDescriptor) -> Result<PathBuf> {
        let lang_path = kata.lang_path();
        create_dir(&lang_path, "ensure_lang_dir").await?;
        info!(path = %lang_path.display(), "{}/{} is ready", kata.slug, kata.cur_lang);
        Ok(lang_path)
    }

    /// Writes `<kata_path>/<slug>.md`, replacing any existing document.
    ///
    /// # Errors
    /// Write failures are logged and returned.
    pub async fn write_description(
        &self,
        kata: &ExerciseDescriptor,
        markdown: &str,
    ) -> Result<PathBuf> {
        let path = kata.markdown_path();
        let result = async {
            let mut file = file_options().create(true).truncate(true).open(&path).await?;
            file.write_all(markdown.as_bytes()).await?;
            file.flush().await
        }
        .await;

        match result {
            Ok(()) => {
                info!(
                    path = %path.display(),
                    "wrote markdown description file for {}", kata.slug
                );
                Ok(path)
            }
            Err(source) => {
                error!(
                    operation = "write_description",
                    path = %path.display(),
                    error = %source,
                    "failed to write {}.md", kata.slug
                );
                Err(PersistenceError::WriteError { path, source })
            }
        }
    }

    /// Writes the solution file under the descriptor's language directory.
    pub async fn write_solution(
        &self,
        kata: &ExerciseDescriptor,
        payload: &SolutionPayload,
    ) -> WriteOutcome {
        self.write_solution_in(&kata.lang_path(), payload).await
    }

    /// Writes `<dir>/<stem>.<ext>` unless it already exists.
    pub async fn write_solution_in(&self, dir: &Path, payload: &SolutionPayload) -> WriteOutcome {
        let path = dir.join(payload.solution_file_name());
        write_once(path, &payload.code, FileKind::Code).await
    }

    /// Writes the test file under the descriptor's language directory.
    pub async fn write_tests(
        &self,
        kata: &ExerciseDescriptor,
        payload: &SolutionPayload,
    ) -> WriteOutcome {
        self.write_tests_in(&kata.lang_path(), &kata.cur_lang, payload)
            .await
    }

    /// Writes the test file for `lang` in `dir` unless it already exists.
    ///
    /// The name is `<stem>_test.<ext>` for python and `<stem>.Test.<ext>`
    /// for every other language.
    pub async fn write_tests_in(
        &self,
        dir: &Path,
        lang: &Language,
        payload: &SolutionPayload,
    ) -> WriteOutcome {
        let path = dir.join(payload.test_file_name(lang));
        write_once(path, &payload.tests, FileKind::Test).await
    }
}

fn file_options() -> OpenOptions {
    let mut options = OpenOptions::new();
    options.write(true);
    #[cfg(unix)]
    options.mode(FILE_MODE);
    options
}

async fn create_dir(path: &Path, operation: &'static str) -> Result<()> {
    let mut builder = DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(DIR_MODE);

    builder.create(path).await.map_err(|source| {
        error!(
            operation,
            path = %path.display(),
            error = %source,
            "failed to create directory"
        );
        PersistenceError::DirectoryError {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Exclusive-create write: the OS refuses to open an existing file, which
/// is also what keeps concurrent writers to one path from clobbering it.
async fn write_once(path: PathBuf, contents: &str, kind: FileKind) -> WriteOutcome {
    write_once_with(path, kind, |mut file| async move {
        file.write_all(contents.as_bytes()).await?;
        file.flush().await
    })
    .await
}

/// Creates `path` exclusively and hands the open file to `fill`.
///
/// A file that was created but could not be filled is removed again, so a
/// later import can write it instead of skipping a truncated file.
async fn write_once_with<F, Fut>(path: PathBuf, kind: FileKind, fill: F) -> WriteOutcome
where
    F: FnOnce(File) -> Fut,
    Fut: Future<Output = io::Result<()>>,
{
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let file = match file_options().create_new(true).open(&path).await {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            warn!(
                path = %path.display(),
                "{} {} file already exists and was NOT overwritten", file_name, kind.label()
            );
            return WriteOutcome::SkippedExisting { path };
        }
        Err(source) => return failed(path, &file_name, kind, source),
    };

    match fill(file).await {
        Ok(()) => {
            info!(path = %path.display(), "wrote {} {} file", file_name, kind.label());
            WriteOutcome::Written { path }
        }
        Err(source) => {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => warn!(
                    path = %path.display(),
                    "removed partial {} {} file", file_name, kind.label()
                ),
                Err(e) => warn!(
                    path = %path.display(),
                    error = %e,
                    "could not remove partial {} {} file", file_name, kind.label()
                ),
            }
            failed(path, &file_name, kind, source)
        }
    }
}

fn failed(path: PathBuf, file_name: &str, kind: FileKind, source: io::Error) -> WriteOutcome {
    warn!(
        path = %path.display(),
        error = %source,
        "failed while writing {} {} file", file_name, kind.label()
    );
    WriteOutcome::Failed {
        error: PersistenceError::WriteError {
            path: path.clone(),
            source,
        },
        path,
    }
}
