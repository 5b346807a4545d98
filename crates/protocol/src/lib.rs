use anyhow::Result;
use serde::{Deserialize, Serialize};

pub mod path_filters;

pub const COMMAND_API_VERSION: u32 = 1;

/// File extensions treated as process definitions unless configured otherwise.
pub const DEFAULT_EXTENSIONS: &[&str] = &["bpmn", "xml"];

/// Path segments that mark archived material; matched case-insensitively.
pub const DEFAULT_EXCLUDED_SEGMENTS: &[&str] = &["old"];

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidRequest,
    EmptyQuery,
    InvalidRoot,
    InvalidConfig,
    Internal,
}

impl ErrorCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidRequest => "invalid_request",
            ErrorCode::EmptyQuery => "empty_query",
            ErrorCode::InvalidRoot => "invalid_root",
            ErrorCode::InvalidConfig => "invalid_config",
            ErrorCode::Internal => "internal",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ErrorEnvelope {
    pub code: ErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorEnvelope {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// One file handed to the search engine: `/`-separated path relative to the
/// scanned root, plus its full text.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    pub relative_path: String,
    pub content: String,
}

impl SourceDocument {
    pub fn new(relative_path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            relative_path: relative_path.into(),
            content: content.into(),
        }
    }
}

/// Non-fatal problem attached to a single document (unreadable, unparsable).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub path: String,
    pub message: String,
}

impl Diagnostic {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

pub fn serialize_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(Into::into)
}
