use crate::document::{join_path, Document};
use crate::matches::Match;
use crate::tag::ElementKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Matches of one `(document, process)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub folder_path: String,
    pub file_name: String,
    /// Raw XML of the document; left empty when callers do not need it
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub content: String,
    pub process_name: String,
    pub matches: Vec<Match>,
}

/// Element a diagram renderer should mark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlight {
    pub element_id: String,
    pub element_kind: ElementKind,
}

/// Grouping key: folder, file, process name.
pub type GroupKey = (String, String, String);

impl SearchResult {
    /// Result holding a single detector hit, before grouping.
    pub fn single(document: &Document, process_name: &str, hit: Match) -> Self {
        Self {
            folder_path: document.folder_path.clone(),
            file_name: document.file_name.clone(),
            content: document.content.clone(),
            process_name: process_name.to_string(),
            matches: vec![hit],
        }
    }

    pub fn key(&self) -> GroupKey {
        (
            self.folder_path.clone(),
            self.file_name.clone(),
            self.process_name.clone(),
        )
    }

    pub fn path(&self) -> String {
        join_path(&self.folder_path, &self.file_name)
    }

    /// Distinct element ids to mark, in match order.
    pub fn highlights(&self) -> Vec<Highlight> {
        let mut out: Vec<Highlight> = Vec::new();
        for hit in &self.matches {
            if out.iter().any(|seen| seen.element_id == hit.element_id) {
                continue;
            }
            out.push(Highlight {
                element_id: hit.element_id.clone(),
                element_kind: hit.element_kind,
            });
        }
        out
    }
}

/// Collapse results sharing a [`GroupKey`] into one, keeping first-seen order
/// of groups and of matches. Scalar fields come from the first member. Every
/// match is kept, including equal ones from repeated elements. Grouping an
/// already grouped list changes nothing.
pub fn group_results(results: Vec<SearchResult>) -> Vec<SearchResult> {
    let mut slots: HashMap<GroupKey, usize> = HashMap::new();
    let mut grouped: Vec<SearchResult> = Vec::new();

    for result in results {
        let key = result.key();
        let slot = match slots.get(&key) {
            Some(&slot) => slot,
            None => {
                slots.insert(key, grouped.len());
                grouped.push(SearchResult {
                    matches: Vec::new(),
                    ..result.clone()
                });
                grouped.len() - 1
            }
        };
        grouped[slot].matches.extend(result.matches);
    }

    grouped.retain(|result| !result.matches.is_empty());
    grouped
}
