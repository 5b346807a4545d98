use bpmn_xml_tree::{is_element_key, TreeNode, TreeValue};
use serde::{Deserialize, Serialize};

/// Local name of a tag: everything after the last `:`.
///
/// `bpmn:callActivity`, `bpmn2:callActivity` and `callActivity` all yield
/// `callActivity`.
pub fn local_name(raw: &str) -> &str {
    match raw.rfind(':') {
        Some(idx) => &raw[idx + 1..],
        None => raw,
    }
}

/// First child element of `node` whose local name is `local`.
pub fn child_by_local_name<'a>(node: &'a TreeNode, local: &str) -> Option<&'a TreeValue> {
    node.entries()
        .find(|(key, _)| is_element_key(key) && local_name(key) == local)
        .map(|(_, value)| value)
}

/// Element kinds the detectors know about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    #[serde(rename = "callActivity")]
    CallActivity,
    #[serde(rename = "scriptTask")]
    ScriptTask,
    #[serde(rename = "script")]
    Script,
    #[serde(rename = "conditionExpression")]
    ConditionExpression,
}

impl ElementKind {
    pub const ALL: [ElementKind; 4] = [
        ElementKind::CallActivity,
        ElementKind::ScriptTask,
        ElementKind::Script,
        ElementKind::ConditionExpression,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            ElementKind::CallActivity => "callActivity",
            ElementKind::ScriptTask => "scriptTask",
            ElementKind::Script => "script",
            ElementKind::ConditionExpression => "conditionExpression",
        }
    }

    /// Kind for an already-normalized local name. Matching is exact: BPMN tag
    /// names are case-sensitive.
    pub fn from_local_name(local: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == local)
    }

    /// Kind for a raw, possibly prefixed, tag.
    pub fn from_tag(raw: &str) -> Option<Self> {
        Self::from_local_name(local_name(raw))
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
