use crate::error::{Result, SearchError};
use crate::process::resolve_process_name;
use bpmn_protocol::path_filters::normalize_separators;
use bpmn_xml_tree::{parse_document, TreeNode};

/// A parsed source file. Identity is `(folder_path, file_name)`.
#[derive(Debug, Clone)]
pub struct Document {
    pub folder_path: String,
    pub file_name: String,
    pub content: String,
    pub tree: TreeNode,
}

impl Document {
    /// Parse `content` and attach the identity derived from `relative_path`.
    pub fn parse(relative_path: &str, content: impl Into<String>) -> Result<Self> {
        let content = content.into();
        let tree = parse_document(&content).map_err(|source| SearchError::Parse {
            path: normalize_separators(relative_path),
            source,
        })?;
        Ok(Self::from_tree(relative_path, content, tree))
    }

    pub fn from_tree(relative_path: &str, content: impl Into<String>, tree: TreeNode) -> Self {
        let (folder_path, file_name) = split_path(relative_path);
        Self {
            folder_path,
            file_name,
            content: content.into(),
            tree,
        }
    }

    pub fn process_name(&self) -> String {
        resolve_process_name(&self.tree)
    }

    /// `folder/file`, or just `file` for top-level documents.
    pub fn path(&self) -> String {
        join_path(&self.folder_path, &self.file_name)
    }
}

/// Split a relative path on its last `/` into `(folder, file)`.
pub fn split_path(relative_path: &str) -> (String, String) {
    let normalized = normalize_separators(relative_path);
    let trimmed = normalized.trim_start_matches("./");
    match trimmed.rsplit_once('/') {
        Some((folder, file)) => (folder.to_string(), file.to_string()),
        None => (String::new(), trimmed.to_string()),
    }
}

pub fn join_path(folder_path: &str, file_name: &str) -> String {
    if folder_path.is_empty() {
        file_name.to_string()
    } else {
        format!("{folder_path}/{file_name}")
    }
}
