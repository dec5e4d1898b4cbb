//! String newtypes identifying an exercise and its language.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Language identifier whose tests follow the `<stem>_test.<ext>` layout.
pub const UNDERSCORE_TEST_LANGUAGE: &str = "python";

/// Generates a string newtype with the usual conversions.
macro_rules! define_name {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps an existing string.
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            /// Returns the inner string.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<std::path::Path> for $name {
            fn as_ref(&self) -> &std::path::Path {
                std::path::Path::new(&self.0)
            }
        }
    };
}

define_name!(
    /// Stable identifier of a kata, also used as its directory name.
    KataSlug
);
define_name!(
    /// Currently selected solution language, e.g. `python` or `rust`.
    Language
);

/// How a language names its test file next to the solution file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestFileConvention {
    /// `<stem>_test.<ext>`
    Underscore,
    /// `<stem>.Test.<ext>`
    DotTest,
}

impl TestFileConvention {
    /// Builds the test file name for a solution stem and extension.
    pub fn file_name(self, stem: &str, ext: &str) -> String {
        match self {
            Self::Underscore => format!("{}_test.{}", stem, ext),
            Self::DotTest => format!("{}.Test.{}", stem, ext),
        }
    }
}

impl Language {
    /// Returns the test naming convention test runners expect for this language.
    pub fn test_convention(&self) -> TestFileConvention {
        if self.0 == UNDERSCORE_TEST_LANGUAGE {
            TestFileConvention::Underscore
        } else {
            TestFileConvention::DotTest
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_python_uses_underscore_convention() {
        let lang = Language::from("python");
        assert_eq!(lang.test_convention(), TestFileConvention::Underscore);
        assert_eq!(
            lang.test_convention().file_name("two_sum", "py"),
            "two_sum_test.py"
        );
    }

    #[test]
    fn test_other_languages_use_dot_test_convention() {
        for name in ["javascript", "rust", "csharp", "Python"] {
            let lang = Language::from(name);
            assert_eq!(lang.test_convention(), TestFileConvention::DotTest, "{name}");
        }
        assert_eq!(
            TestFileConvention::DotTest.file_name("twoSum", "js"),
            "twoSum.Test.js"
        );
    }

    #[test]
    fn test_slug_display_and_serde() {
        let slug = KataSlug::from("two-sum");
        assert_eq!(slug.to_string(), "two-sum");
        let json = serde_json::to_string(&slug).unwrap();
        assert_eq!(json, "\"two-sum\"");
        let back: KataSlug = serde_json::from_str(&json).unwrap();
        assert_eq!(back, slug);
    }
}
