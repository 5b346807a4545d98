//! # BPMN Search
//!
//! Structural search over BPMN process definitions.
//!
//! ## Pipeline
//!
//! ```text
//! SourceDocument[]
//!     │
//!     ├──> Parser (bpmn-xml-tree)
//!     │      └─> Ordered tree, failures become diagnostics
//!     │
//!     ├──> Tree Walker + Detectors
//!     │      ├─ Reference: callActivity/@calledElement == query
//!     │      └─ Text: script, scriptTask, callActivity, conditionExpression
//!     │
//!     ├──> Grouping/Dedup
//!     │      └─> One SearchResult per (folder, file, process)
//!     │
//!     └──> Filter + Pagination
//!            └─> Display view
//! ```
//!
//! ## Example
//!
//! ```
//! use bpmn_protocol::SourceDocument;
//! use bpmn_search::{search, SearchQuery};
//!
//! let xml = r#"<bpmn:definitions>
//!   <bpmn:process id="Orders" name="Orders">
//!     <bpmn:callActivity id="ca1" calledElement="Shipping"/>
//!   </bpmn:process>
//! </bpmn:definitions>"#;
//!
//! let outcome = search(&[SourceDocument::new("orders.bpmn", xml)], SearchQuery::reference("Shipping"))?;
//! assert_eq!(outcome.results[0].process_name, "Orders");
//! assert_eq!(outcome.results[0].matches[0].element_id, "ca1");
//! # Ok::<(), bpmn_search::SearchError>(())
//! ```

mod detectors;
mod document;
mod engine;
mod error;
mod filter;
mod grouping;
mod matches;
mod page;
mod process;
mod tag;
mod walker;

pub use detectors::{
    detectors_for, CallActivityTextDetector, ConditionExpressionDetector, Detector,
    ReferenceDetector, ScriptDetector, ScriptTaskDetector, SearchMode, TextQuery,
};
pub use document::{join_path, split_path, Document};
pub use engine::{search, SearchEngine, SearchOutcome, SearchQuery, SearchStats};
pub use error::{Result, SearchError};
pub use filter::filter_results;
pub use grouping::{group_results, GroupKey, Highlight, SearchResult};
pub use matches::{IdAllocator, Match, SCRIPT_CONTENT_LABEL, UNNAMED_CALL_ACTIVITY, UNNAMED_TASK};
pub use page::{paginate, Page, DEFAULT_PAGE_SIZE};
pub use process::{resolve_process_name, UNNAMED_PROCESS};
pub use tag::{child_by_local_name, local_name, ElementKind};
pub use walker::{walk, Visit};
