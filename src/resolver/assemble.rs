//! Content entry assembly.

use std::path::Path;

use crate::core::{ContentEntry, SourceDirectory, WorkspacePath};
use crate::resolver::SourceRoot;

/// Wrap the records of one import root into a [`ContentEntry`] with absolute
/// paths under `workspace_root`.
pub fn assemble_content_entry(
    workspace_root: &Path,
    import_root: &WorkspacePath,
    records: &[SourceRoot],
) -> ContentEntry {
    let sources = records
        .iter()
        .map(|record| {
            SourceDirectory::new(record.directory.to_path(workspace_root))
                .with_package_prefix(record.package_prefix.clone())
        })
        .collect();
    ContentEntry::new(import_root.to_path(workspace_root), sources)
}

/// Order entries by their content root.
pub fn sort_content_entries(entries: &mut [ContentEntry]) {
    entries.sort_by(|a, b| a.content_root.cmp(&b.content_root));
}
