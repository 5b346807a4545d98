use crate::error::{IndexerError, Result};
use crate::stats::ScanStats;
use bpmn_protocol::path_filters::{
    extension_allowed, has_excluded_segment, is_active, normalize_separators, path_allowed,
};
use bpmn_protocol::{DEFAULT_EXCLUDED_SEGMENTS, DEFAULT_EXTENSIONS};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

pub const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Which files under the root count as process documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Accepted extensions, without the dot; compared case-insensitively
    pub extensions: Vec<String>,
    /// Any path containing one of these segments is skipped
    pub excluded_segments: Vec<String>,
    pub include_paths: Vec<String>,
    pub exclude_paths: Vec<String>,
    /// Glob over the relative path, e.g. `billing/**/*.bpmn`
    pub file_pattern: Option<String>,
    pub max_file_size_bytes: u64,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            excluded_segments: DEFAULT_EXCLUDED_SEGMENTS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            include_paths: Vec::new(),
            exclude_paths: Vec::new(),
            file_pattern: None,
            max_file_size_bytes: MAX_FILE_SIZE_BYTES,
        }
    }
}

/// Scanner for finding process documents in a directory tree
pub struct FileScanner {
    root: PathBuf,
    options: ScanOptions,
}

impl FileScanner {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            options: ScanOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ScanOptions) -> Self {
        self.options = options;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Matching files, sorted by relative path.
    pub fn scan(&self) -> Result<Vec<PathBuf>> {
        self.scan_with_stats().map(|(files, _)| files)
    }

    /// Like [`FileScanner::scan`], also counting the files that were filtered out.
    pub fn scan_with_stats(&self) -> Result<(Vec<PathBuf>, ScanStats)> {
        if !self.root.is_dir() {
            return Err(IndexerError::InvalidPath(self.root.display().to_string()));
        }

        let mut stats = ScanStats::new();
        let mut files = Vec::new();
        if is_active(
            &self.options.include_paths,
            &self.options.exclude_paths,
            self.options.file_pattern.as_deref(),
        ) {
            log::debug!(
                "Path filters: include={:?} exclude={:?} pattern={:?}",
                self.options.include_paths,
                self.options.exclude_paths,
                self.options.file_pattern
            );
        }

        let root = self.root.clone();
        let excluded = self.options.excluded_segments.clone();
        let mut builder = WalkBuilder::new(&self.root);
        builder
            .hidden(true) // skip hidden files and directories
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true);
        builder.filter_entry(move |entry| !is_excluded_scope(entry.path(), &root, &excluded));

        for result in builder.build() {
            match result {
                Ok(entry) => {
                    let Some(file_type) = entry.file_type() else {
                        continue;
                    };
                    if !file_type.is_file() {
                        continue;
                    }

                    let path = entry.path();
                    let Some(rel) = relative_path(&self.root, path) else {
                        continue;
                    };

                    if !self.accepts(&rel) {
                        stats.add_skipped();
                        continue;
                    }

                    if let Ok(meta) = entry.metadata() {
                        if meta.len() > self.options.max_file_size_bytes {
                            log::debug!(
                                "Skipping large file {} ({} bytes > {})",
                                path.display(),
                                meta.len(),
                                self.options.max_file_size_bytes
                            );
                            stats.add_skipped();
                            continue;
                        }
                    }

                    files.push((rel, path.to_path_buf()));
                }
                Err(e) => log::warn!("Failed to read entry: {e}"),
            }
        }

        files.sort_by(|a, b| a.0.cmp(&b.0));
        log::info!("Found {} process documents under {}", files.len(), self.root.display());
        Ok((files.into_iter().map(|(_, path)| path).collect(), stats))
    }

    fn accepts(&self, rel: &str) -> bool {
        extension_allowed(rel, &self.options.extensions)
            && !has_excluded_segment(rel, &self.options.excluded_segments)
            && path_allowed(
                rel,
                &self.options.include_paths,
                &self.options.exclude_paths,
                self.options.file_pattern.as_deref(),
            )
    }
}

/// `/`-separated path of `path` below `root`.
pub fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let rel = normalize_separators(&relative.to_string_lossy());
    (!rel.is_empty()).then_some(rel)
}

fn is_excluded_scope(path: &Path, root: &Path, excluded: &[String]) -> bool {
    relative_path(root, path).is_some_and(|rel| has_excluded_segment(&rel, excluded))
}
