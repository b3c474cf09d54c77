//! Source directory inference.
//!
//! Each import root goes through the same stages:
//!
//! 1. [`route_artifacts`] assigns source files to their deepest import root
//! 2. [`resolve_source_roots`] asks the reader chain for every file's package
//!    and collapses the answers to one prefix per directory
//! 3. [`DirectoryTree`] reconciles those prefixes with the directory layout
//!    and keeps only the directories where the prefix cannot be inherited
//! 4. [`assemble_content_entry`] turns the result into a [`ContentEntry`]
//!
//! All stages are pure apart from file reads, which go through the
//! collaborators held by the reader chain.
//!
//! [`ContentEntry`]: crate::core::ContentEntry

pub mod assemble;
pub mod errors;
pub mod per_file;
pub mod prefix;
pub mod router;
pub mod tree;

use std::collections::BTreeMap;
use std::fmt;

use crate::core::WorkspacePath;

pub use assemble::{assemble_content_entry, sort_content_entries};
pub use errors::CalculateError;
pub use per_file::resolve_source_roots;
pub use prefix::PrefixCalculator;
pub use router::route_artifacts;
pub use tree::{build_source_roots, DirectoryTree};

/// A directory together with the package prefix its files live in.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceRoot {
    pub directory: WorkspacePath,
    pub package_prefix: String,
}

impl SourceRoot {
    pub fn new(directory: WorkspacePath, package_prefix: impl Into<String>) -> Self {
        SourceRoot {
            directory,
            package_prefix: package_prefix.into(),
        }
    }
}

impl fmt::Display for SourceRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> `{}`", self.directory, self.package_prefix)
    }
}

/// The candidate with the highest count.
///
/// Ties go to `preferred` when it is among the leaders, otherwise to the
/// lexicographically smallest leader. `None` only for empty counts.
pub(crate) fn most_common<'a>(
    counts: &'a BTreeMap<String, usize>,
    preferred: &str,
) -> Option<&'a str> {
    let best = counts.values().copied().max()?;
    let mut leaders = counts
        .iter()
        .filter(|(_, &count)| count == best)
        .map(|(candidate, _)| candidate.as_str());
    let first = leaders.next()?;
    if first == preferred {
        return Some(first);
    }
    Some(leaders.find(|c| *c == preferred).unwrap_or(first))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(entries: &[(&str, usize)]) -> BTreeMap<String, usize> {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_most_common_majority() {
        let c = counts(&[("com.google", 1), ("com.google.different", 3)]);
        assert_eq!(most_common(&c, "com.google"), Some("com.google.different"));
    }

    #[test]
    fn test_most_common_tie_prefers_default() {
        let c = counts(&[("com.google", 1), ("com.google.different", 1)]);
        assert_eq!(most_common(&c, "com.google"), Some("com.google"));
        assert_eq!(
            most_common(&c, "com.google.different"),
            Some("com.google.different")
        );
    }

    #[test]
    fn test_most_common_tie_without_default_is_lexicographic() {
        let c = counts(&[("b", 2), ("a", 2), ("c", 1)]);
        assert_eq!(most_common(&c, "c"), Some("a"));
        assert_eq!(most_common(&BTreeMap::new(), "x"), None);
    }
}
