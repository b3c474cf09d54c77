//! Package prefixes implied by directory layout.

use crate::core::{SourceLanguage, WorkspacePath};

/// Derives the package prefix a directory has by convention.
///
/// Everything up to and including the first conventional source-root
/// component (`java`, `javatests`, `kotlin` by default) is dropped and the
/// remaining components are joined with `.`:
///
/// ```
/// use sourceroots::core::WorkspacePath;
/// use sourceroots::resolver::PrefixCalculator;
///
/// let calc = PrefixCalculator::default();
/// let dir = WorkspacePath::new("src/main/java/com/google/app").unwrap();
/// assert_eq!(calc.prefix_of(&dir), "com.google.app");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixCalculator {
    conventional_roots: Vec<String>,
}

impl Default for PrefixCalculator {
    fn default() -> Self {
        PrefixCalculator::new(
            SourceLanguage::ALL
                .iter()
                .flat_map(|lang| lang.conventional_roots().iter().map(|r| r.to_string())),
        )
    }
}

impl PrefixCalculator {
    /// Create a calculator with the given conventional root names.
    pub fn new(conventional_roots: impl IntoIterator<Item = String>) -> Self {
        PrefixCalculator {
            conventional_roots: conventional_roots.into_iter().collect(),
        }
    }

    /// Conventional root names.
    pub fn conventional_roots(&self) -> &[String] {
        &self.conventional_roots
    }

    /// Default prefix of a directory.
    pub fn prefix_of(&self, directory: &WorkspacePath) -> String {
        let components: Vec<&str> = directory.components().collect();
        let start = components
            .iter()
            .position(|c| self.conventional_roots.iter().any(|r| r == c))
            .map_or(0, |idx| idx + 1);
        components[start..].join(".")
    }

    /// Default package of a file: the prefix of its parent directory.
    pub fn prefix_of_file(&self, file: &WorkspacePath) -> String {
        match file.parent() {
            Some(dir) => self.prefix_of(&dir),
            None => String::new(),
        }
    }
}
