//! Test utilities and mocks for unit tests.
//!
//! The main piece is [`MockFileSystem`], an in-memory [`FileAccess`] that
//! also records which files were opened.
//!
//! # Example
//!
//! ```rust,ignore
//! use sourceroots::test_support::{source_artifact, MockFileSystem};
//!
//! #[test]
//! fn test_example() {
//!     let mut fs = MockFileSystem::new();
//!     fs.add_file("/root/java/com/google/Bla.java", "package com.google;");
//!
//!     let artifact = source_artifact("java/com/google/Bla.java");
//!     // Use the mock with a reader chain...
//! }
//! ```

pub mod fixtures;

use std::collections::HashMap;
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tempfile::TempDir;

use crate::util::fs::FileAccess;

// Re-export fixtures for convenience
pub use fixtures::*;

/// Mock filesystem for testing without real I/O.
#[derive(Debug, Default)]
pub struct MockFileSystem {
    files: HashMap<PathBuf, Vec<u8>>,
    opened: Mutex<Vec<PathBuf>>,
}

impl MockFileSystem {
    /// Create a new empty mock filesystem.
    pub fn new() -> Self {
        MockFileSystem::default()
    }

    /// Add a file with the given content.
    pub fn add_file(&mut self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        self.files.insert(path.as_ref().to_path_buf(), content.into());
    }

    /// Remove a file.
    pub fn remove_file(&mut self, path: impl AsRef<Path>) -> bool {
        self.files.remove(path.as_ref()).is_some()
    }

    /// Check if a file exists.
    pub fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    /// Paths passed to [`FileAccess::open`] so far, sorted.
    pub fn opened(&self) -> Vec<PathBuf> {
        let mut opened = self
            .opened
            .lock()
            .map(|log| log.clone())
            .unwrap_or_default();
        opened.sort();
        opened
    }
}

impl FileAccess for MockFileSystem {
    fn open(&self, path: &Path) -> io::Result<Box<dyn Read + Send>> {
        if let Ok(mut log) = self.opened.lock() {
            log.push(path.to_path_buf());
        }
        match self.files.get(path) {
            Some(content) => Ok(Box::new(Cursor::new(content.clone()))),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("file not found: {}", path.display()),
            )),
        }
    }
}

/// Create a temporary workspace with the given files (relative path, content).
pub fn create_test_workspace(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().expect("failed to create temp dir");
    for (path, content) in files {
        let path = dir.path().join(path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("failed to create directory");
        }
        std::fs::write(&path, content).expect("failed to write file");
    }
    dir
}

/// Assertion helpers for testing.
pub mod assertions {
    use crate::util::diagnostic::Diagnostic;

    /// Assert that a result is Ok and return the value.
    pub fn assert_ok<T, E: std::fmt::Debug>(result: Result<T, E>) -> T {
        match result {
            Ok(v) => v,
            Err(e) => panic!("expected Ok, got Err: {:?}", e),
        }
    }

    /// Assert that a result is Err and return the error.
    pub fn assert_err<T: std::fmt::Debug, E>(result: Result<T, E>) -> E {
        match result {
            Ok(v) => panic!("expected Err, got Ok: {:?}", v),
            Err(e) => e,
        }
    }

    /// Assert that some diagnostic message contains a substring.
    pub fn assert_diagnostic_containing(diagnostics: &[Diagnostic], substring: &str) {
        assert!(
            diagnostics.iter().any(|d| d.message.contains(substring)),
            "no diagnostic contains '{}'; got {:?}",
            substring,
            diagnostics.iter().map(|d| &d.message).collect::<Vec<_>>()
        );
    }

    /// Assert that no diagnostics were reported.
    pub fn assert_no_diagnostics(diagnostics: &[Diagnostic]) {
        assert!(
            diagnostics.is_empty(),
            "expected no diagnostics, got {:?}",
            diagnostics.iter().map(|d| &d.message).collect::<Vec<_>>()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_filesystem_open() {
        let mut fs = MockFileSystem::new();
        fs.add_file("/root/java/A.java", "package a;");

        let mut content = String::new();
        fs.open(Path::new("/root/java/A.java"))
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "package a;");

        let err = fs.open(Path::new("/root/java/B.java")).err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);

        assert_eq!(
            fs.opened(),
            vec![
                PathBuf::from("/root/java/A.java"),
                PathBuf::from("/root/java/B.java")
            ]
        );
    }

    #[test]
    fn test_mock_filesystem_remove() {
        let mut fs = MockFileSystem::new();
        fs.add_file("/a.java", "");
        assert!(fs.exists(Path::new("/a.java")));
        assert!(fs.remove_file("/a.java"));
        assert!(!fs.exists(Path::new("/a.java")));
    }

    #[test]
    fn test_create_test_workspace() {
        let workspace = create_test_workspace(&[("java/com/A.java", "package com;")]);
        assert!(workspace.path().join("java/com/A.java").is_file());
    }

    #[test]
    fn test_assertions() {
        use assertions::*;

        let ok_result: Result<i32, &str> = Ok(42);
        assert_eq!(assert_ok(ok_result), 42);

        let err_result: Result<i32, &str> = Err("error");
        assert_eq!(assert_err(err_result), "error");
    }
}
