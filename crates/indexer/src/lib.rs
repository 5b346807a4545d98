//! # BPMN Indexer
//!
//! Finds and loads the process documents a search runs over.
//!
//! ## Pipeline
//!
//! ```text
//! Directory
//!     │
//!     ├──> File Scanner (.gitignore aware)
//!     │      ├─ extensions: bpmn, xml
//!     │      ├─ skip any `old` segment
//!     │      └─ include/exclude prefixes, size cap
//!     │
//!     └──> Document Loader
//!            └─> SourceDocument[] + LoadFailure[]
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use bpmn_indexer::{load_project, ScanOptions};
//!
//! let loaded = load_project("/path/to/processes", ScanOptions::default())?;
//! println!("Loaded {} documents", loaded.stats.files);
//! # Ok::<(), bpmn_indexer::IndexerError>(())
//! ```

mod error;
mod loader;
mod scanner;
mod stats;

pub use error::{IndexerError, Result};
pub use loader::{load_project, DocumentLoader, LoadFailure, LoadedDocuments};
pub use scanner::{relative_path, FileScanner, ScanOptions, MAX_FILE_SIZE_BYTES};
pub use stats::ScanStats;
