//! Reads the `package` declaration from the file itself.

use std::io::{BufRead, BufReader, Read};
use std::sync::LazyLock;

use regex::Regex;

use crate::core::SourceArtifact;
use crate::reader::{PackageReader, ReadError};
use crate::util::diagnostic::{suggestions, Diagnostic};
use crate::util::fs::{ArtifactResolver, FileAccess};

/// Matches `package com.foo.bar;` (Java) and `package com.foo.bar` (Kotlin).
static PACKAGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*package\s+([\p{L}_$][\p{L}\p{N}_$]*(?:\s*\.\s*[\p{L}_$][\p{L}\p{N}_$]*)*)\s*;?")
        .expect("package pattern is valid")
});

/// Scan `reader` line by line for the first package declaration.
///
/// Whitespace around the dots is removed from the result.
pub fn parse_package_declaration(reader: impl Read) -> std::io::Result<Option<String>> {
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        let line = String::from_utf8_lossy(&buf);
        if let Some(caps) = PACKAGE_PATTERN.captures(&line) {
            let package: String = caps[1].chars().filter(|c| !c.is_whitespace()).collect();
            return Ok(Some(package));
        }
    }
}

/// Reader that opens the source file and scans for its declaration.
///
/// Generated files are skipped: their declarations are not trusted.
pub struct SourceScanReader<'a> {
    files: &'a dyn FileAccess,
    resolver: &'a dyn ArtifactResolver,
}

impl<'a> SourceScanReader<'a> {
    /// Create a reader over the given collaborators.
    pub fn new(files: &'a dyn FileAccess, resolver: &'a dyn ArtifactResolver) -> Self {
        SourceScanReader { files, resolver }
    }
}

impl PackageReader for SourceScanReader<'_> {
    fn name(&self) -> &'static str {
        "source"
    }

    fn read_package(
        &self,
        artifact: &SourceArtifact,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<Option<String>, ReadError> {
        if !artifact.is_source() {
            return Ok(None);
        }

        let path = self.resolver.resolve(&artifact.artifact_location);
        let stream = self
            .files
            .open(&path)
            .map_err(|e| ReadError::from_io(path.clone(), e))?;
        let package =
            parse_package_declaration(stream).map_err(|e| ReadError::from_io(path.clone(), e))?;

        if package.is_none() {
            tracing::debug!("no package declaration in {}", path.display());
            diagnostics.push(
                Diagnostic::warning(format!(
                    "No package name string found in {}",
                    artifact.relative_path()
                ))
                .with_location(&path)
                .with_suggestion(suggestions::NO_PACKAGE),
            );
        }
        Ok(package)
    }
}
