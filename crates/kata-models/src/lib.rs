//! Data models for the kata archive.
//!
//! These are the values a caller hands to the persistence layer: the full
//! completed-record set, the descriptor of one exercise and the solution
//! text for its selected language.

pub mod exercise;
pub mod ids;
pub mod records;

pub use exercise::{ExerciseDescriptor, SolutionPayload};
pub use ids::{KataSlug, Language, TestFileConvention};
pub use records::CompletedRecordSet;
