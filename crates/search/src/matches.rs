use crate::tag::ElementKind;
use bpmn_xml_tree::TreeNode;
use serde::{Deserialize, Serialize};

pub const UNNAMED_TASK: &str = "Unnamed Task";
pub const UNNAMED_CALL_ACTIVITY: &str = "Unnamed Call Activity";
pub const SCRIPT_CONTENT_LABEL: &str = "Script content match";

/// One detector hit inside a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Match {
    pub element_id: String,
    pub element_kind: ElementKind,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_text: Option<String>,
}

impl Match {
    pub fn new(element_id: impl Into<String>, element_kind: ElementKind, label: impl Into<String>) -> Self {
        Self {
            element_id: element_id.into(),
            element_kind,
            label: label.into(),
            matched_text: None,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.matched_text = Some(text.into());
        self
    }
}

/// Placeholder ids for elements without an `id` attribute.
///
/// The counter is owned by one search run, so the same input always yields the
/// same placeholders.
#[derive(Debug, Default)]
pub struct IdAllocator {
    issued: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn placeholder(&mut self, kind: ElementKind) -> String {
        self.issued += 1;
        format!("{}_generated_{}", kind.as_str(), self.issued)
    }

    /// The element's own non-empty `id`, else the first non-empty fallback, else a placeholder.
    pub fn resolve(&mut self, kind: ElementKind, candidates: &[Option<&TreeNode>]) -> String {
        candidates
            .iter()
            .flatten()
            .filter_map(|node| node.attribute("id"))
            .find(|id| !id.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| self.placeholder(kind))
    }
}

/// Non-empty `name` attribute of an element.
pub fn element_name(node: Option<&TreeNode>) -> Option<&str> {
    node.and_then(|node| node.attribute("name"))
        .filter(|name| !name.trim().is_empty())
}

pub fn reference_label(called_element: &str) -> String {
    format!("CallActivity - calledElement: {called_element}")
}

pub fn script_task_label(name: Option<&str>) -> String {
    format!("Script Task - {}", name.unwrap_or(UNNAMED_TASK))
}

pub fn call_activity_label(name: Option<&str>) -> String {
    format!("Call Activity - {}", name.unwrap_or(UNNAMED_CALL_ACTIVITY))
}

pub fn call_activity_child_label(name: Option<&str>, child_tag: &str, value: &str) -> String {
    format!(
        "Call Activity ({}) - {child_tag}: {value}",
        name.unwrap_or(UNNAMED_CALL_ACTIVITY)
    )
}

pub fn condition_label(parent_name: Option<&str>) -> String {
    match parent_name {
        Some(parent) => format!("Condition Expression ({parent})"),
        None => "Condition Expression".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn placeholders_are_kind_prefixed_and_sequential() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.placeholder(ElementKind::Script), "script_generated_1");
        assert_eq!(
            ids.placeholder(ElementKind::CallActivity),
            "callActivity_generated_2"
        );
    }

    #[test]
    fn resolve_prefers_own_id_then_fallbacks() {
        let own = TreeNode::new().with_attribute("id", "own");
        let blank = TreeNode::new().with_attribute("id", "");
        let flow = TreeNode::new().with_attribute("id", "flow1");
        let mut ids = IdAllocator::new();

        assert_eq!(
            ids.resolve(ElementKind::ConditionExpression, &[Some(&own), Some(&flow)]),
            "own"
        );
        assert_eq!(
            ids.resolve(ElementKind::ConditionExpression, &[Some(&blank), Some(&flow)]),
            "flow1"
        );
        assert_eq!(
            ids.resolve(ElementKind::ConditionExpression, &[None, Some(&blank)]),
            "conditionExpression_generated_1"
        );
    }

    #[test]
    fn labels_follow_fixed_formats() {
        assert_eq!(reference_label("SubProcA"), "CallActivity - calledElement: SubProcA");
        assert_eq!(script_task_label(None), "Script Task - Unnamed Task");
        assert_eq!(call_activity_label(Some("Bill")), "Call Activity - Bill");
        assert_eq!(
            call_activity_child_label(None, "calledElement", "Sub"),
            "Call Activity (Unnamed Call Activity) - calledElement: Sub"
        );
        assert_eq!(condition_label(Some("A -> B")), "Condition Expression (A -> B)");
        assert_eq!(condition_label(None), "Condition Expression");
    }
}
