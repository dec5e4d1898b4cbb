//! Integration tests for importing exercises through the archive.

use std::fs;

use kata_core::{ArchiveConfig, ArchiveError, ExerciseImport, KataArchive};
use kata_models::{CompletedRecordSet, SolutionPayload};
use kata_persistence::PersistenceError;
use serde_json::json;
use tempfile::tempdir;

fn import(archive: &KataArchive, slug: &str, lang: &str, code: &str) -> ExerciseImport {
    let ext = if lang == "python" { "py" } else { "js" };
    ExerciseImport::new(
        archive.descriptor(slug, lang),
        format!("# {slug}\n"),
        SolutionPayload::new(code, format!("test {slug}"), slug.replace('-', "_"), ext),
    )
}

#[tokio::test]
async fn test_batch_import_counts_written_files() {
    let dir = tempdir().unwrap();
    let archive = KataArchive::new(ArchiveConfig::in_state_dir(dir.path()).with_import_concurrency(2));

    let imports: Vec<_> = ["two-sum", "multiply", "even-or-odd", "fizz-buzz", "vowel-count"]
        .iter()
        .map(|slug| import(&archive, slug, "python", "pass"))
        .collect();

    let summary = archive.import_batch(imports).await.unwrap();

    assert_eq!(summary.exercises, 5);
    assert_eq!(summary.written, 10);
    assert_eq!(summary.skipped, 0);
    assert_eq!(summary.failed, 0);
    assert!(dir.path().join("katas/fizz-buzz/python/fizz_buzz_test.py").is_file());
}

#[tokio::test]
async fn test_reimport_keeps_solutions_and_refreshes_description() {
    let dir = tempdir().unwrap();
    let archive = KataArchive::new(ArchiveConfig::in_state_dir(dir.path()));

    archive
        .import_exercise(&import(&archive, "two-sum", "python", "original"))
        .await
        .unwrap();

    let mut again = import(&archive, "two-sum", "python", "newer");
    again.description = "# two-sum\nupdated\n".to_string();
    let summary = archive.import_batch(vec![again]).await.unwrap();

    assert_eq!(summary.skipped, 2);
    assert_eq!(summary.written, 0);
    let kata = dir.path().join("katas/two-sum");
    assert_eq!(fs::read_to_string(kata.join("python/two_sum.py")).unwrap(), "original");
    assert_eq!(fs::read_to_string(kata.join("two-sum.md")).unwrap(), "# two-sum\nupdated\n");
}

#[tokio::test]
async fn test_second_language_uses_dot_test_name() {
    let dir = tempdir().unwrap();
    let archive = KataArchive::new(ArchiveConfig::in_state_dir(dir.path()));

    let summary = archive
        .import_batch(vec![
            import(&archive, "two-sum", "python", "py code"),
            import(&archive, "two-sum", "javascript", "js code"),
        ])
        .await
        .unwrap();

    assert_eq!(summary.written, 4);
    let kata = dir.path().join("katas/two-sum");
    assert!(kata.join("python/two_sum_test.py").is_file());
    assert!(kata.join("javascript/two_sum.Test.js").is_file());
}

#[tokio::test]
async fn test_blocked_exercise_root_is_fatal() {
    let dir = tempdir().unwrap();
    let config = ArchiveConfig::in_state_dir(dir.path()).with_exercise_root(dir.path().join("blocked"));
    fs::write(dir.path().join("blocked"), "file in the way").unwrap();
    let archive = KataArchive::new(config);

    let err = archive
        .import_batch(vec![import(&archive, "two-sum", "python", "code")])
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ArchiveError::Persistence(PersistenceError::DirectoryError { .. })
    ));
}

#[tokio::test]
async fn test_records_roundtrip_through_archive() {
    let dir = tempdir().unwrap();
    let archive = KataArchive::new(ArchiveConfig::in_state_dir(dir.path()).with_export_name("completed"));
    assert!(archive.load_records().await.unwrap().is_none());

    let records = CompletedRecordSet::new(json!({
        "two-sum": {"id": "52c31f8e", "completedLanguages": ["python", "javascript"]}
    }));
    let path = archive.replace_records(&records).await.unwrap();

    assert!(fs::read_to_string(path).unwrap().starts_with("export const completed = "));
    assert_eq!(archive.load_records().await.unwrap(), Some(records));
}
