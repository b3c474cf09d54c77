//! Package derived from the directory layout alone.

use crate::core::SourceArtifact;
use crate::reader::{PackageReader, ReadError};
use crate::resolver::PrefixCalculator;
use crate::util::diagnostic::Diagnostic;

/// Last-resort reader; always knows an answer.
pub struct PathDerivedReader<'a> {
    prefixes: &'a PrefixCalculator,
}

impl<'a> PathDerivedReader<'a> {
    /// Create a reader using the given calculator.
    pub fn new(prefixes: &'a PrefixCalculator) -> Self {
        PathDerivedReader { prefixes }
    }
}

impl PackageReader for PathDerivedReader<'_> {
    fn name(&self) -> &'static str {
        "path"
    }

    fn read_package(
        &self,
        artifact: &SourceArtifact,
        _diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<Option<String>, ReadError> {
        let path = artifact.artifact_location.workspace_path()?;
        Ok(Some(self.prefixes.prefix_of_file(&path)))
    }
}
