use serde::{Deserialize, Serialize};

/// Statistics about a scan + load pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    /// Number of documents loaded
    pub files: usize,

    /// Bytes of document text loaded
    pub bytes: u64,

    /// Files seen by the walker but filtered out
    pub skipped: usize,

    /// Files that could not be read
    pub errors: usize,

    /// Time taken in milliseconds
    pub time_ms: u64,
}

impl ScanStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, bytes: u64) {
        self.files += 1;
        self.bytes += bytes;
    }

    pub fn add_skipped(&mut self) {
        self.skipped += 1;
    }

    pub fn add_error(&mut self) {
        self.errors += 1;
    }
}
