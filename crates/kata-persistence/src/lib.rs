//! Filesystem persistence for the kata archive.
//!
//! This crate writes the completed-record database and the per-exercise
//! file tree:
//!
//! ```text
//! <record db path>                              always replaced, atomically
//! <exercise root>/<slug>/                       created if missing
//! <exercise root>/<slug>/<slug>.md              always overwritten
//! <exercise root>/<slug>/<lang>/                created if missing
//! <exercise root>/<slug>/<lang>/<stem>.<ext>    written once
//! <exercise root>/<slug>/<lang>/<stem>_test.<ext> | <stem>.Test.<ext>
//! ```
//!
//! # Example
//!
//! ```no_run
//! use kata_models::{CompletedRecordSet, ExerciseDescriptor, SolutionPayload};
//! use kata_persistence::{ExerciseWriter, RecordDatabase};
//! use std::path::Path;
//!
//! # async fn run() -> kata_persistence::Result<()> {
//! let db = RecordDatabase::new("/home/user/katas/data/userCompletedDB.ts", "userCompletedDB");
//! db.replace(&CompletedRecordSet::default()).await?;
//!
//! let kata = ExerciseDescriptor::under_root(Path::new("/home/user/katas"), "two-sum", "python");
//! let writer = ExerciseWriter::new();
//! writer.ensure_lang_dir(&kata).await?;
//! let payload = SolutionPayload::new("def two_sum(): ...", "import two_sum", "two_sum", "py");
//! let outcome = writer.write_solution(&kata, &payload).await;
//! assert!(outcome.is_written() || outcome.is_skipped());
//! # Ok(())
//! # }
//! ```

pub mod atomic;
pub mod error;
pub mod exercise;
pub mod literal;
pub mod outcome;
pub mod record_db;

pub use error::{PersistenceError, Result};
pub use exercise::ExerciseWriter;
pub use literal::LiteralStyle;
pub use outcome::WriteOutcome;
pub use record_db::{RecordDatabase, DEFAULT_EXPORT_NAME};

/// Permission bits for created directories.
pub const DIR_MODE: u32 = 0o755;

/// Permission bits for created files.
pub const FILE_MODE: u32 = 0o644;
