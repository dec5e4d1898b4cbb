//! Import orchestration over the persistence layer.

use std::path::{Path, PathBuf};

use futures::stream::{self, StreamExt};
use kata_models::{CompletedRecordSet, ExerciseDescriptor, KataSlug, Language, SolutionPayload};
use kata_persistence::{ExerciseWriter, RecordDatabase, WriteOutcome};
use tracing::{debug, info, warn};

use crate::config::ArchiveConfig;
use crate::error::Result;

/// Everything needed to archive one language of one exercise.
#[derive(Debug, Clone)]
pub struct ExerciseImport {
    pub descriptor: ExerciseDescriptor,
    /// Pre-rendered markdown description.
    pub description: String,
    pub solution: SolutionPayload,
}

impl ExerciseImport {
    pub fn new(
        descriptor: ExerciseDescriptor,
        description: impl Into<String>,
        solution: SolutionPayload,
    ) -> Self {
        Self {
            descriptor,
            description: description.into(),
            solution,
        }
    }
}

/// Result of importing one exercise.
#[derive(Debug)]
pub struct ImportReport {
    pub slug: KataSlug,
    pub description_path: PathBuf,
    pub solution: WriteOutcome,
    pub tests: WriteOutcome,
}

impl ImportReport {
    fn outcomes(&self) -> [&WriteOutcome; 2] {
        [&self.solution, &self.tests]
    }

    /// True when neither write-once file failed.
    pub fn is_clean(&self) -> bool {
        self.outcomes().iter().all(|o| !o.is_failed())
    }
}

/// Counts over a batch import.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub exercises: usize,
    pub written: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Paths of write-once files that failed.
    pub failures: Vec<PathBuf>,
}

impl BatchSummary {
    fn record(&mut self, report: &ImportReport) {
        self.exercises += 1;
        for outcome in report.outcomes() {
            match outcome {
                WriteOutcome::Written { .. } => self.written += 1,
                WriteOutcome::SkippedExisting { .. } => self.skipped += 1,
                WriteOutcome::Failed { path, .. } => {
                    self.failed += 1;
                    self.failures.push(path.clone());
                }
            }
        }
    }
}

/// Archive of completed katas on the local filesystem.
#[derive(Debug, Clone)]
pub struct KataArchive {
    config: ArchiveConfig,
    records: RecordDatabase,
    writer: ExerciseWriter,
}

impl KataArchive {
    /// Create an archive with the given configuration.
    pub fn new(config: ArchiveConfig) -> Self {
        let records = RecordDatabase::new(&config.record_db_path, config.export_name.clone())
            .with_style(config.style.clone());
        Self {
            config,
            records,
            writer: ExerciseWriter::new(),
        }
    }

    pub fn config(&self) -> &ArchiveConfig {
        &self.config
    }

    pub fn exercise_root(&self) -> &Path {
        &self.config.exercise_root
    }

    pub fn records(&self) -> &RecordDatabase {
        &self.records
    }

    pub fn writer(&self) -> &ExerciseWriter {
        &self.writer
    }

    /// Builds a descriptor for `slug` under the configured exercise root.
    pub fn descriptor(
        &self,
        slug: impl Into<KataSlug>,
        lang: impl Into<Language>,
    ) -> ExerciseDescriptor {
        ExerciseDescriptor::under_root(&self.config.exercise_root, slug, lang)
    }

    /// Replaces the record database.
    pub async fn replace_records(&self, records: &CompletedRecordSet) -> Result<PathBuf> {
        Ok(self.records.replace(records).await?)
    }

    /// Loads the record database, if one has been written.
    pub async fn load_records(&self) -> Result<Option<CompletedRecordSet>> {
        Ok(self.records.load_optional().await?)
    }

    /// Writes the directories, description, solution and tests of one
    /// exercise, in that order.
    ///
    /// # Errors
    /// Directory and description failures abort the import. Solution and
    /// test failures are only reported in the returned [`ImportReport`].
    pub async fn import_exercise(&self, import: &ExerciseImport) -> Result<ImportReport> {
        let kata = &import.descriptor;
        debug!(slug = %kata.slug, lang = %kata.cur_lang, "importing exercise");

        self.writer.ensure_kata_dir(kata).await?;
        self.writer.ensure_lang_dir(kata).await?;
        let description_path = self.writer.write_description(kata, &import.description).await?;
        let solution = self.writer.write_solution(kata, &import.solution).await;
        let tests = self.writer.write_tests(kata, &import.solution).await;

        let report = ImportReport {
            slug: kata.slug.clone(),
            description_path,
            solution,
            tests,
        };
        if !report.is_clean() {
            warn!(slug = %kata.slug, lang = %kata.cur_lang, "exercise imported with failures");
        }
        Ok(report)
    }

    /// Imports many exercises, up to `import_concurrency` at a time.
    ///
    /// # Errors
    /// The first fatal error stops the batch; imports still in flight are
    /// dropped at their next await point.
    pub async fn import_batch<I>(&self, imports: I) -> Result<BatchSummary>
    where
        I: IntoIterator<Item = ExerciseImport>,
    {
        let mut reports = stream::iter(imports)
            .map(|import| async move { self.import_exercise(&import).await })
            .buffer_unordered(self.config.import_concurrency.max(1));

        let mut summary = BatchSummary::default();
        while let Some(report) = reports.next().await {
            summary.record(&report?);
        }

        info!(
            exercises = summary.exercises,
            written = summary.written,
            skipped = summary.skipped,
            failed = summary.failed,
            "batch import finished"
        );
        Ok(summary)
    }
}
