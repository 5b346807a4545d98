use crate::detectors::{detectors_for, Detector, SearchMode};
use crate::document::Document;
use crate::error::{Result, SearchError};
use crate::grouping::{group_results, SearchResult};
use crate::matches::IdAllocator;
use crate::walker::{walk, Visit};
use bpmn_protocol::{Diagnostic, SourceDocument};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// Mode plus the raw query string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub mode: SearchMode,
    pub query: String,
}

impl SearchQuery {
    pub fn new(mode: SearchMode, query: impl Into<String>) -> Self {
        Self {
            mode,
            query: query.into(),
        }
    }

    pub fn reference(process_id: impl Into<String>) -> Self {
        Self::new(SearchMode::Reference, process_id)
    }

    pub fn text(query: impl Into<String>) -> Self {
        Self::new(SearchMode::Text, query)
    }

    /// Reject blank queries before a run starts.
    pub fn validate(&self) -> Result<()> {
        if self.query.trim().is_empty() {
            return Err(SearchError::EmptyQuery);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    pub documents: usize,
    pub parsed: usize,
    pub failed: usize,
    /// Matches before grouping
    pub matches: usize,
    pub results: usize,
    pub time_ms: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub results: Vec<SearchResult>,
    pub diagnostics: Vec<Diagnostic>,
    pub stats: SearchStats,
    /// Set when the run stopped early on request
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub cancelled: bool,
}

/// Runs one mode over a document set.
///
/// Documents are handled in the order given. A document that fails to parse
/// is recorded as a [`Diagnostic`] and the run moves on.
pub struct SearchEngine {
    query: SearchQuery,
    detectors: Vec<Box<dyn Detector>>,
}

impl SearchEngine {
    pub fn new(query: SearchQuery) -> Self {
        let detectors = detectors_for(query.mode, &query.query);
        Self { query, detectors }
    }

    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    /// Ungrouped results of one document, one per detector hit.
    pub fn search_document(&self, document: &Document, ids: &mut IdAllocator) -> Vec<SearchResult> {
        let process_name = document.process_name();
        let mut flat = Vec::new();
        walk(&document.tree, &mut |visit: &Visit<'_>| {
            for detector in &self.detectors {
                for hit in detector.detect(visit, ids) {
                    flat.push(SearchResult::single(document, &process_name, hit));
                }
            }
        });
        flat
    }

    pub fn run(&self, sources: &[SourceDocument]) -> SearchOutcome {
        self.run_with_cancel(sources, &AtomicBool::new(false))
    }

    /// Like [`SearchEngine::run`], checking `cancel` before each document.
    pub fn run_with_cancel(&self, sources: &[SourceDocument], cancel: &AtomicBool) -> SearchOutcome {
        let started = Instant::now();
        let mut ids = IdAllocator::new();
        let mut flat = Vec::new();
        let mut outcome = SearchOutcome::default();
        outcome.stats.documents = sources.len();

        for source in sources {
            if cancel.load(Ordering::Relaxed) {
                log::info!("Search cancelled after {} documents", outcome.stats.parsed + outcome.stats.failed);
                outcome.cancelled = true;
                break;
            }
            match Document::parse(&source.relative_path, source.content.as_str()) {
                Ok(document) => {
                    outcome.stats.parsed += 1;
                    let hits = self.search_document(&document, &mut ids);
                    log::debug!("{}: {} matches", document.path(), hits.len());
                    flat.extend(hits);
                }
                Err(err) => {
                    log::warn!("Skipping document: {err}");
                    outcome.stats.failed += 1;
                    outcome
                        .diagnostics
                        .push(Diagnostic::new(source.relative_path.clone(), err.to_string()));
                }
            }
        }

        outcome.stats.matches = flat.len();
        outcome.results = group_results(flat);
        outcome.stats.results = outcome.results.len();
        outcome.stats.time_ms = started.elapsed().as_millis() as u64;

        log::info!(
            "{} search for {:?}: {} results from {} documents in {}ms",
            self.query.mode.as_str(),
            self.query.query,
            outcome.stats.results,
            outcome.stats.parsed,
            outcome.stats.time_ms
        );
        outcome
    }
}

/// Validate `query` and run it over `sources`.
pub fn search(sources: &[SourceDocument], query: SearchQuery) -> Result<SearchOutcome> {
    query.validate()?;
    Ok(SearchEngine::new(query).run(sources))
}
