//! Languages whose files carry a package declaration.

use serde::{Deserialize, Serialize};

/// A language with `package` declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceLanguage {
    /// Java (default)
    #[default]
    Java,
    /// Kotlin
    #[serde(alias = "kt")]
    Kotlin,
}

impl SourceLanguage {
    /// All supported languages.
    pub const ALL: [SourceLanguage; 2] = [SourceLanguage::Java, SourceLanguage::Kotlin];

    /// File extensions (without the dot).
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            SourceLanguage::Java => &["java"],
            SourceLanguage::Kotlin => &["kt"],
        }
    }

    /// Directory names that conventionally start a source tree for this
    /// language, e.g. `java/com/google` holds package `com.google`.
    pub fn conventional_roots(&self) -> &'static [&'static str] {
        match self {
            SourceLanguage::Java => &["java", "javatests"],
            SourceLanguage::Kotlin => &["kotlin"],
        }
    }
}
