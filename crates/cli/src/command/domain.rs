use anyhow::Result;
use bpmn_indexer::{IndexerError, ScanStats};
use bpmn_protocol::{Diagnostic, ErrorCode, ErrorEnvelope, COMMAND_API_VERSION};
use bpmn_search::{SearchError, SearchMode, SearchResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

use crate::config::ConfigError;

#[derive(Debug, Deserialize, Clone)]
pub struct CommandRequest {
    pub action: CommandAction,
    #[serde(default = "empty_payload")]
    pub payload: Value,
}

fn empty_payload() -> Value {
    Value::Object(Default::default())
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CommandAction {
    ReferenceSearch,
    TextSearch,
    Scan,
}

impl CommandAction {
    pub const fn as_str(self) -> &'static str {
        match self {
            CommandAction::ReferenceSearch => "reference_search",
            CommandAction::TextSearch => "text_search",
            CommandAction::Scan => "scan",
        }
    }

    pub const fn search_mode(self) -> Option<SearchMode> {
        match self {
            CommandAction::ReferenceSearch => Some(SearchMode::Reference),
            CommandAction::TextSearch => Some(SearchMode::Text),
            CommandAction::Scan => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub status: CommandStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorEnvelope>,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub meta: ResponseMeta,
}

impl CommandResponse {
    pub fn is_error(&self) -> bool {
        matches!(self.status, CommandStatus::Error)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CommandStatus {
    Ok,
    Error,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ResponseMeta {
    pub api_version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_path: Option<String>,
    /// Documents handed to the engine
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documents: Option<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled: Option<bool>,
}

impl Default for ResponseMeta {
    fn default() -> Self {
        Self {
            api_version: COMMAND_API_VERSION,
            duration_ms: None,
            root: None,
            config_path: None,
            documents: None,
            diagnostics: Vec::new(),
            cancelled: None,
        }
    }
}

pub struct CommandOutcome {
    pub data: Value,
    pub meta: ResponseMeta,
}

impl CommandOutcome {
    pub fn from_value<T: Serialize>(value: T) -> Result<Self> {
        Ok(Self {
            data: serde_json::to_value(value)?,
            meta: ResponseMeta::default(),
        })
    }
}

pub fn parse_payload<T: DeserializeOwned>(payload: Value) -> Result<T> {
    serde_json::from_value(payload).map_err(Into::into)
}

/// Payload of `reference_search` and `text_search`.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct SearchPayload {
    /// Process id for reference search, free text for text search
    #[serde(alias = "process_id")]
    pub query: String,
    #[serde(default)]
    pub root: Option<PathBuf>,
    #[serde(default)]
    pub filter: Option<String>,
    #[serde(default)]
    pub page: Option<usize>,
    #[serde(default)]
    pub page_size: Option<usize>,
    /// Substring or glob over the relative path; overrides the config value
    #[serde(default)]
    pub file_pattern: Option<String>,
    /// Include raw document XML in each result
    #[serde(default)]
    pub include_content: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchOutput {
    pub mode: SearchMode,
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    /// Results after filtering, before pagination
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub results: Vec<SearchResult>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ScanPayload {
    #[serde(default)]
    pub root: Option<PathBuf>,
    #[serde(default)]
    pub file_pattern: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScanOutput {
    pub root: String,
    pub documents: Vec<String>,
    pub stats: ScanStats,
}

/// Error code and optional hint for a failed command.
pub fn classify_error(err: &anyhow::Error) -> (ErrorCode, Option<String>) {
    for cause in err.chain() {
        if let Some(SearchError::EmptyQuery) = cause.downcast_ref::<SearchError>() {
            return (
                ErrorCode::EmptyQuery,
                Some("Pass a non-empty process id or search text".to_string()),
            );
        }
        if cause.downcast_ref::<ConfigError>().is_some() {
            return (
                ErrorCode::InvalidConfig,
                Some("Fix or remove .bpmn-finder/config.json".to_string()),
            );
        }
        if let Some(IndexerError::InvalidPath(_)) = cause.downcast_ref::<IndexerError>() {
            return (
                ErrorCode::InvalidRoot,
                Some("Pass --root or set BPMN_FINDER_ROOT to an existing directory".to_string()),
            );
        }
        if cause.downcast_ref::<serde_json::Error>().is_some() {
            return (ErrorCode::InvalidRequest, None);
        }
    }
    (ErrorCode::Internal, None)
}
