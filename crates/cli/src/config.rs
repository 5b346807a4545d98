use anyhow::{Context as AnyhowContext, Result};
use bpmn_indexer::{IndexerError, ScanOptions, MAX_FILE_SIZE_BYTES};
use bpmn_protocol::{DEFAULT_EXCLUDED_SEGMENTS, DEFAULT_EXTENSIONS};
use bpmn_search::DEFAULT_PAGE_SIZE;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_DIR_NAME: &str = ".bpmn-finder";
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const ROOT_ENV: &str = "BPMN_FINDER_ROOT";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Per-root settings from `.bpmn-finder/config.json`. Missing keys take defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FinderConfig {
    pub extensions: Vec<String>,
    pub excluded_segments: Vec<String>,
    pub include_paths: Vec<String>,
    pub exclude_paths: Vec<String>,
    /// Substring or glob over the relative path, e.g. `billing/*.bpmn`
    pub file_pattern: Option<String>,
    pub max_file_size_bytes: u64,
    pub page_size: usize,
}

impl Default for FinderConfig {
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
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl FinderConfig {
    /// Scan options from this config. A non-blank `file_pattern` replaces the
    /// configured one.
    pub fn scan_options(&self, file_pattern: Option<&str>) -> ScanOptions {
        let file_pattern = file_pattern
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .or_else(|| self.file_pattern.clone());
        ScanOptions {
            extensions: self.extensions.clone(),
            excluded_segments: self.excluded_segments.clone(),
            include_paths: self.include_paths.clone(),
            exclude_paths: self.exclude_paths.clone(),
            file_pattern,
            max_file_size_bytes: self.max_file_size_bytes,
        }
    }
}

pub fn config_path_for_root(root: &Path) -> PathBuf {
    root.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME)
}

/// Root and settings for one command.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    pub root: PathBuf,
    pub config: FinderConfig,
    pub config_path: Option<PathBuf>,
}

impl ProjectContext {
    pub fn resolve(provided: Option<PathBuf>) -> Result<Self> {
        let root = resolve_root(provided)?;
        let (config, config_path) = load_config(&root)?;
        Ok(Self {
            root,
            config,
            config_path,
        })
    }
}

/// `provided`, then `$BPMN_FINDER_ROOT`, then the current directory.
pub fn resolve_root(provided: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = provided {
        return canonicalize_root(path);
    }

    if let Some(path) = env_root_override() {
        return canonicalize_root(path)
            .with_context(|| format!("Root from {ROOT_ENV} is invalid"));
    }

    let cwd = env::current_dir().context("Failed to determine current directory")?;
    canonicalize_root(cwd)
}

fn env_root_override() -> Option<PathBuf> {
    env::var(ROOT_ENV)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

fn canonicalize_root(path: PathBuf) -> Result<PathBuf> {
    let canonical = path
        .canonicalize()
        .map_err(|_| IndexerError::InvalidPath(path.display().to_string()))?;
    if !canonical.is_dir() {
        return Err(IndexerError::InvalidPath(canonical.display().to_string()).into());
    }
    Ok(canonical)
}

/// Config for `root`, or defaults when no file exists.
pub fn load_config(root: &Path) -> Result<(FinderConfig, Option<PathBuf>)> {
    let path = config_path_for_root(root);
    if !path.exists() {
        return Ok((FinderConfig::default(), None));
    }

    let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let config = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })?;
    log::debug!("Loaded config {}", path.display());
    Ok((config, Some(path)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = tempdir().unwrap();
        let (config, path) = load_config(temp.path()).unwrap();
        assert_eq!(config, FinderConfig::default());
        assert_eq!(config.extensions, vec!["bpmn".to_string(), "xml".to_string()]);
        assert!(path.is_none());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join(CONFIG_DIR_NAME)).unwrap();
        fs::write(
            config_path_for_root(temp.path()),
            r#"{"page_size": 3, "exclude_paths": ["drafts"]}"#,
        )
        .unwrap();

        let (config, path) = load_config(temp.path()).unwrap();
        assert_eq!(config.page_size, 3);
        assert_eq!(config.exclude_paths, vec!["drafts".to_string()]);
        assert_eq!(config.excluded_segments, vec!["old".to_string()]);
        assert!(path.is_some());
    }

    #[test]
    fn request_pattern_overrides_configured_one() {
        let config = FinderConfig {
            file_pattern: Some("billing/*".to_string()),
            ..FinderConfig::default()
        };
        assert_eq!(config.scan_options(None).file_pattern.as_deref(), Some("billing/*"));
        assert_eq!(config.scan_options(Some("  ")).file_pattern.as_deref(), Some("billing/*"));
        assert_eq!(
            config.scan_options(Some("hr/*.bpmn")).file_pattern.as_deref(),
            Some("hr/*.bpmn")
        );
        assert_eq!(FinderConfig::default().scan_options(None).file_pattern, None);
    }

    #[test]
    fn invalid_file_is_a_config_error() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join(CONFIG_DIR_NAME)).unwrap();
        fs::write(config_path_for_root(temp.path()), r#"{"page_size": "ten"}"#).unwrap();

        let err = load_config(temp.path()).unwrap_err();
        assert!(err.downcast_ref::<ConfigError>().is_some(), "{err:#}");
        assert!(err.to_string().contains("config.json"), "{err:#}");
    }

    #[test]
    fn explicit_root_must_exist() {
        let temp = tempdir().unwrap();
        let err = resolve_root(Some(temp.path().join("missing"))).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<IndexerError>(),
            Some(IndexerError::InvalidPath(_))
        ));
    }
}
