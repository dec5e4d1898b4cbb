//! Per-exercise descriptor and solution payload.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ids::{KataSlug, Language};

/// Identifies one exercise on disk and the language currently being written.
///
/// Directory layout rooted at `kata_path`:
/// ```text
/// <kata_path>/
/// ├── <slug>.md
/// └── <cur_lang>/
///     ├── <stem>.<ext>
///     └── <stem>_test.<ext> | <stem>.Test.<ext>
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseDescriptor {
    /// Stable kata identifier.
    pub slug: KataSlug,
    /// Root directory of this exercise.
    pub kata_path: PathBuf,
    /// Language whose files are being written.
    pub cur_lang: Language,
}

impl ExerciseDescriptor {
    /// Creates a descriptor with an explicit exercise directory.
    pub fn new(
        slug: impl Into<KataSlug>,
        kata_path: impl Into<PathBuf>,
        cur_lang: impl Into<Language>,
    ) -> Self {
        Self {
            slug: slug.into(),
            kata_path: kata_path.into(),
            cur_lang: cur_lang.into(),
        }
    }

    /// Creates a descriptor whose directory is `<root>/<slug>`.
    pub fn under_root(
        root: &Path,
        slug: impl Into<KataSlug>,
        cur_lang: impl Into<Language>,
    ) -> Self {
        let slug = slug.into();
        let kata_path = root.join(slug.as_str());
        Self {
            slug,
            kata_path,
            cur_lang: cur_lang.into(),
        }
    }

    /// Returns the same exercise with a different selected language.
    pub fn with_language(&self, lang: impl Into<Language>) -> Self {
        Self {
            cur_lang: lang.into(),
            ..self.clone()
        }
    }

    /// Directory holding the selected language's files.
    pub fn lang_path(&self) -> PathBuf {
        self.kata_path.join(self.cur_lang.as_str())
    }

    /// Path of the description document.
    pub fn markdown_path(&self) -> PathBuf {
        self.kata_path.join(format!("{}.md", self.slug))
    }
}

/// Solution and test source for one language of one exercise.
///
/// Contents are opaque text and are written as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolutionPayload {
    /// Solution source code.
    pub code: String,
    /// Test source code.
    pub tests: String,
    /// File name without extension, e.g. `two_sum`.
    pub file_stem: String,
    /// Extension without the leading dot, e.g. `py`.
    pub extension: String,
}

impl SolutionPayload {
    pub fn new(
        code: impl Into<String>,
        tests: impl Into<String>,
        file_stem: impl Into<String>,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            tests: tests.into(),
            file_stem: file_stem.into(),
            extension: extension.into(),
        }
    }

    /// `<stem>.<ext>`
    pub fn solution_file_name(&self) -> String {
        format!("{}.{}", self.file_stem, self.extension)
    }

    /// Test file name following the naming convention of `lang`.
    pub fn test_file_name(&self, lang: &Language) -> String {
        lang.test_convention()
            .file_name(&self.file_stem, &self.extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_under_root_derives_paths() {
        let desc = ExerciseDescriptor::under_root(Path::new("/root"), "two-sum", "python");

        assert_eq!(desc.kata_path, PathBuf::from("/root/two-sum"));
        assert_eq!(desc.lang_path(), PathBuf::from("/root/two-sum/python"));
        assert_eq!(desc.markdown_path(), PathBuf::from("/root/two-sum/two-sum.md"));
    }

    #[test]
    fn test_with_language_keeps_slug_and_path() {
        let desc = ExerciseDescriptor::new("two-sum", "/root/two-sum", "python");
        let js = desc.with_language("javascript");

        assert_eq!(js.slug, desc.slug);
        assert_eq!(js.kata_path, desc.kata_path);
        assert_eq!(js.lang_path(), PathBuf::from("/root/two-sum/javascript"));
    }

    #[test]
    fn test_payload_file_names() {
        let payload = SolutionPayload::new("code", "tests", "two_sum", "py");

        assert_eq!(payload.solution_file_name(), "two_sum.py");
        assert_eq!(payload.test_file_name(&Language::from("python")), "two_sum_test.py");
        assert_eq!(payload.test_file_name(&Language::from("ruby")), "two_sum.Test.py");
    }

    #[test]
    fn test_descriptor_deserializes_camel_case() {
        let desc: ExerciseDescriptor = serde_json::from_str(
            r#"{"slug":"two-sum","kataPath":"/root/two-sum","curLang":"python"}"#,
        )
        .unwrap();

        assert_eq!(desc, ExerciseDescriptor::new("two-sum", "/root/two-sum", "python"));
    }
}
