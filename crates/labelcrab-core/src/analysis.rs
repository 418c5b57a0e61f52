use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

use crate::context::FileChange;

/// Aggregate counts over the structured file records of a PR
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAnalysis {
    pub total_files: usize,

    /// Count per change status ("added", "modified", ...)
    pub files_by_status: BTreeMap<String, usize>,

    /// Count per extension including the dot; files without one count under ""
    pub files_by_extension: BTreeMap<String, usize>,

    /// Count per parent directory; top-level files count under "."
    pub changes_by_path: BTreeMap<String, usize>,
}

/// Count files by status, extension and parent directory
pub fn analyze_files(files: &[FileChange]) -> FileAnalysis {
    let mut analysis = FileAnalysis {
        total_files: files.len(),
        ..Default::default()
    };

    for file in files {
        debug!(
            "File {} ({}): +{} -{}",
            file.filename, file.status, file.additions, file.deletions
        );

        *analysis
            .files_by_status
            .entry(file.status.clone())
            .or_default() += 1;
        *analysis
            .files_by_extension
            .entry(extension(&file.filename))
            .or_default() += 1;
        *analysis
            .changes_by_path
            .entry(parent_dir(&file.filename))
            .or_default() += 1;
    }

    analysis
}

/// Suffix from the last `.` of the final path segment, dot included.
///
/// Dotfiles keep their whole name (`.gitignore` -> `.gitignore`).
fn extension(filename: &str) -> String {
    let name = filename.rsplit('/').next().unwrap_or(filename);
    name.rfind('.')
        .map(|dot| name[dot..].to_string())
        .unwrap_or_default()
}

fn parent_dir(filename: &str) -> String {
    match Path::new(filename).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_string_lossy().into_owned(),
        _ => ".".to_string(),
    }
}
