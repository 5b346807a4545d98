use crate::command::domain::{
    parse_payload, CommandAction, CommandOutcome, ScanOutput, ScanPayload, SearchOutput,
    SearchPayload,
};
use crate::config::ProjectContext;
use anyhow::{Context as AnyhowContext, Result};
use bpmn_indexer::load_project;
use bpmn_search::{filter_results, paginate, SearchEngine, SearchMode, SearchQuery};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub struct Services {
    search: SearchService,
    scan: ScanService,
}

impl Services {
    pub fn new() -> Self {
        Self {
            search: SearchService,
            scan: ScanService,
        }
    }

    pub async fn route(&self, action: CommandAction, payload: Value) -> Result<CommandOutcome> {
        match action.search_mode() {
            Some(mode) => self.search.run(mode, payload).await,
            None => self.scan.run(payload).await,
        }
    }
}

struct SearchService;

impl SearchService {
    async fn run(&self, mode: SearchMode, payload: Value) -> Result<CommandOutcome> {
        let payload: SearchPayload = parse_payload(payload).context("Invalid search payload")?;
        let query = SearchQuery::new(mode, payload.query.clone());
        query.validate()?;

        let project = ProjectContext::resolve(payload.root.clone())?;
        let root = project.root.clone();
        let options = project.config.scan_options(payload.file_pattern.as_deref());

        let cancel = Arc::new(AtomicBool::new(false));
        let interrupt = {
            let cancel = Arc::clone(&cancel);
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    log::warn!("Interrupt received, stopping after the current document");
                    cancel.store(true, Ordering::Relaxed);
                }
            })
        };

        let task_cancel = Arc::clone(&cancel);
        let joined = tokio::task::spawn_blocking(move || -> Result<_> {
            let loaded = load_project(&root, options)?;
            let outcome = SearchEngine::new(query).run_with_cancel(&loaded.documents, &task_cancel);
            Ok((loaded.failures, outcome))
        })
        .await;
        interrupt.abort();
        let (failures, outcome) = joined.context("Search task failed")??;

        let filter = payload
            .filter
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_string);
        let filtered = filter_results(&outcome.results, filter.as_deref().unwrap_or(""));
        let page_size = payload.page_size.unwrap_or(project.config.page_size);
        let page = paginate(&filtered, payload.page.unwrap_or(1), page_size);

        let results = page
            .items
            .into_iter()
            .map(|result| {
                let mut result = result.clone();
                if !payload.include_content {
                    result.content.clear();
                }
                result
            })
            .collect();

        let mut out = CommandOutcome::from_value(SearchOutput {
            mode,
            query: payload.query,
            filter,
            total: page.total,
            page: page.page,
            page_size: page.page_size,
            total_pages: page.total_pages,
            results,
        })?;
        out.meta.root = Some(project.root.display().to_string());
        out.meta.config_path = project.config_path.map(|p| p.display().to_string());
        out.meta.documents = Some(outcome.stats.documents);
        out.meta.diagnostics = failures
            .iter()
            .map(|failure| failure.to_diagnostic())
            .chain(outcome.diagnostics)
            .collect();
        if outcome.cancelled {
            out.meta.cancelled = Some(true);
        }
        Ok(out)
    }
}

struct ScanService;

impl ScanService {
    async fn run(&self, payload: Value) -> Result<CommandOutcome> {
        let payload: ScanPayload = parse_payload(payload).context("Invalid scan payload")?;
        let project = ProjectContext::resolve(payload.root)?;
        let root = project.root.clone();
        let options = project.config.scan_options(payload.file_pattern.as_deref());

        let loaded = tokio::task::spawn_blocking(move || load_project(&root, options))
            .await
            .context("Scan task failed")??;

        let mut out = CommandOutcome::from_value(ScanOutput {
            root: project.root.display().to_string(),
            documents: loaded
                .documents
                .iter()
                .map(|doc| doc.relative_path.clone())
                .collect(),
            stats: loaded.stats.clone(),
        })?;
        out.meta.root = Some(project.root.display().to_string());
        out.meta.config_path = project.config_path.map(|p| p.display().to_string());
        out.meta.documents = Some(loaded.documents.len());
        out.meta.diagnostics = loaded.failures.iter().map(|f| f.to_diagnostic()).collect();
        Ok(out)
    }
}
