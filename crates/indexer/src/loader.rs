use crate::error::Result;
use crate::scanner::{relative_path, FileScanner, ScanOptions};
use crate::stats::ScanStats;
use bpmn_protocol::{Diagnostic, SourceDocument};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// A file that was selected but could not be read as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadFailure {
    pub path: String,
    pub message: String,
}

impl LoadFailure {
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::new(self.path.clone(), self.message.clone())
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoadedDocuments {
    pub documents: Vec<SourceDocument>,
    pub failures: Vec<LoadFailure>,
    pub stats: ScanStats,
}

/// Reads scanned files into [`SourceDocument`]s.
pub struct DocumentLoader;

impl DocumentLoader {
    /// Read `paths` (absolute, below `root`) in order. Unreadable files are
    /// reported as failures and do not stop the load.
    pub fn load(root: &Path, paths: &[PathBuf]) -> LoadedDocuments {
        let mut loaded = LoadedDocuments::default();
        for path in paths {
            let rel = relative_path(root, path).unwrap_or_else(|| path.display().to_string());
            match std::fs::read_to_string(path) {
                Ok(content) => {
                    loaded.stats.add_file(content.len() as u64);
                    loaded.documents.push(SourceDocument::new(rel, content));
                }
                Err(err) => {
                    log::warn!("Failed to read {rel}: {err}");
                    loaded.stats.add_error();
                    loaded.failures.push(LoadFailure {
                        path: rel,
                        message: err.to_string(),
                    });
                }
            }
        }
        loaded
    }
}

/// Scan `root` with `options` and load every selected document.
pub fn load_project(root: impl AsRef<Path>, options: ScanOptions) -> Result<LoadedDocuments> {
    let started = Instant::now();
    let root = root.as_ref();
    let (paths, scan_stats) = FileScanner::new(root).with_options(options).scan_with_stats()?;

    let mut loaded = DocumentLoader::load(root, &paths);
    loaded.stats.skipped = scan_stats.skipped;
    loaded.stats.time_ms = started.elapsed().as_millis() as u64;

    log::debug!(
        "Loaded {} documents ({} bytes, {} skipped, {} errors) in {}ms",
        loaded.stats.files,
        loaded.stats.bytes,
        loaded.stats.skipped,
        loaded.stats.errors,
        loaded.stats.time_ms
    );
    Ok(loaded)
}
