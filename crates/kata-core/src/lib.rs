//! Configuration and import orchestration for the kata archive.
//!
//! # Example
//!
//! ```no_run
//! use kata_core::{ArchiveConfig, ExerciseImport, KataArchive};
//! use kata_models::SolutionPayload;
//!
//! # async fn run() -> kata_core::Result<()> {
//! kata_core::logging::init_tracing("info");
//! let archive = KataArchive::new(ArchiveConfig::from_env()?);
//!
//! let import = ExerciseImport::new(
//!     archive.descriptor("two-sum", "python"),
//!     "# Two Sum\n",
//!     SolutionPayload::new("def two_sum(): ...", "import two_sum", "two_sum", "py"),
//! );
//! let summary = archive.import_batch(vec![import]).await?;
//! println!("{} files written", summary.written);
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod config;
pub mod error;
pub mod logging;

pub use archive::{BatchSummary, ExerciseImport, ImportReport, KataArchive};
pub use config::ArchiveConfig;
pub use error::{ArchiveError, Result};
