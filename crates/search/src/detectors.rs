use crate::matches::{
    call_activity_child_label, call_activity_label, condition_label, element_name,
    reference_label, script_task_label, IdAllocator, Match, SCRIPT_CONTENT_LABEL,
};
use crate::tag::{child_by_local_name, local_name, ElementKind};
use crate::walker::Visit;
use bpmn_xml_tree::{attribute_name, TreeValue, TEXT_KEY};
use serde::{Deserialize, Serialize};

/// The two ways of searching a document set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// Call activities whose `calledElement` equals the query exactly
    Reference,
    /// Case-insensitive substring over scripts, call activities and conditions
    Text,
}

impl SearchMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            SearchMode::Reference => "reference",
            SearchMode::Text => "text",
        }
    }
}

/// A matching rule for one element kind, run at every visited element.
pub trait Detector: Send + Sync {
    fn kind(&self) -> ElementKind;

    fn detect(&self, visit: &Visit<'_>, ids: &mut IdAllocator) -> Vec<Match>;

    /// True when the visit is an element of this detector's kind.
    fn applies_to(&self, visit: &Visit<'_>) -> bool {
        ElementKind::from_local_name(visit.tag) == Some(self.kind())
    }
}

/// Detector set for a mode.
pub fn detectors_for(mode: SearchMode, query: &str) -> Vec<Box<dyn Detector>> {
    match mode {
        SearchMode::Reference => vec![Box::new(ReferenceDetector::new(query))],
        SearchMode::Text => {
            let query = TextQuery::new(query);
            vec![
                Box::new(ScriptDetector::new(query.clone())),
                Box::new(ScriptTaskDetector::new(query.clone())),
                Box::new(CallActivityTextDetector::new(query.clone())),
                Box::new(ConditionExpressionDetector::new(query)),
            ]
        }
    }
}

/// Case-insensitive substring needle.
#[derive(Debug, Clone)]
pub struct TextQuery {
    needle: String,
}

impl TextQuery {
    pub fn new(raw: &str) -> Self {
        Self {
            needle: raw.to_lowercase(),
        }
    }

    pub fn matches(&self, haystack: &str) -> bool {
        haystack.to_lowercase().contains(&self.needle)
    }
}

/// Mode A: call activities bound to one process id.
pub struct ReferenceDetector {
    target: String,
}

impl ReferenceDetector {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
        }
    }
}

impl Detector for ReferenceDetector {
    fn kind(&self) -> ElementKind {
        ElementKind::CallActivity
    }

    fn detect(&self, visit: &Visit<'_>, ids: &mut IdAllocator) -> Vec<Match> {
        if !self.applies_to(visit) {
            return Vec::new();
        }
        visit
            .value
            .occurrences()
            .iter()
            .filter_map(TreeValue::as_node)
            .filter(|activity| activity.attribute("calledElement") == Some(self.target.as_str()))
            .map(|activity| {
                Match::new(
                    ids.resolve(self.kind(), &[Some(activity)]),
                    self.kind(),
                    reference_label(&self.target),
                )
                .with_text(self.target.clone())
            })
            .collect()
    }
}

/// Mode B: `script` elements outside script tasks.
pub struct ScriptDetector {
    query: TextQuery,
}

impl ScriptDetector {
    pub fn new(query: TextQuery) -> Self {
        Self { query }
    }
}

impl Detector for ScriptDetector {
    fn kind(&self) -> ElementKind {
        ElementKind::Script
    }

    fn detect(&self, visit: &Visit<'_>, ids: &mut IdAllocator) -> Vec<Match> {
        if !self.applies_to(visit) {
            return Vec::new();
        }
        // The body of a script task is reported by ScriptTaskDetector.
        if visit.parent_tag.and_then(ElementKind::from_local_name) == Some(ElementKind::ScriptTask) {
            return Vec::new();
        }

        let mut hits = Vec::new();
        for occurrence in visit.value.occurrences() {
            let Some(text) = occurrence.text_content() else {
                continue;
            };
            if self.query.matches(text) {
                let id = ids.resolve(self.kind(), &[occurrence.as_node()]);
                hits.push(Match::new(id, self.kind(), SCRIPT_CONTENT_LABEL).with_text(text));
            }
        }
        hits
    }
}

/// Mode B: script tasks whose nested script contains the query.
pub struct ScriptTaskDetector {
    query: TextQuery,
}

impl ScriptTaskDetector {
    pub fn new(query: TextQuery) -> Self {
        Self { query }
    }
}

impl Detector for ScriptTaskDetector {
    fn kind(&self) -> ElementKind {
        ElementKind::ScriptTask
    }

    fn detect(&self, visit: &Visit<'_>, ids: &mut IdAllocator) -> Vec<Match> {
        if !self.applies_to(visit) {
            return Vec::new();
        }

        let mut hits = Vec::new();
        for task in visit.value.occurrences().iter().filter_map(TreeValue::as_node) {
            let Some(script) = child_by_local_name(task, "script") else {
                continue;
            };
            let matched = script
                .occurrences()
                .iter()
                .filter_map(TreeValue::text_content)
                .find(|text| self.query.matches(text));
            if let Some(text) = matched {
                hits.push(
                    Match::new(
                        ids.resolve(self.kind(), &[Some(task)]),
                        self.kind(),
                        script_task_label(element_name(Some(task))),
                    )
                    .with_text(text),
                );
            }
        }
        hits
    }
}

/// Mode B: call activities, reported per matching attribute or text value.
///
/// When the serialized subtree contains the query but no single value does
/// (the query spans a tag name or a value boundary), one summary match is
/// reported instead.
pub struct CallActivityTextDetector {
    query: TextQuery,
}

impl CallActivityTextDetector {
    pub fn new(query: TextQuery) -> Self {
        Self { query }
    }
}

impl Detector for CallActivityTextDetector {
    fn kind(&self) -> ElementKind {
        ElementKind::CallActivity
    }

    fn detect(&self, visit: &Visit<'_>, ids: &mut IdAllocator) -> Vec<Match> {
        if !self.applies_to(visit) {
            return Vec::new();
        }

        let mut hits = Vec::new();
        for activity in visit.value.occurrences() {
            let mut scalars = Vec::new();
            collect_matching_scalars(activity, visit.tag, &self.query, &mut scalars);
            if scalars.is_empty() && !self.query.matches(&activity.to_canonical_string()) {
                continue;
            }

            let node = activity.as_node();
            let name = element_name(node);
            let id = ids.resolve(self.kind(), &[node]);
            if scalars.is_empty() {
                hits.push(Match::new(id, self.kind(), call_activity_label(name)));
                continue;
            }
            for (child_tag, value) in scalars {
                hits.push(
                    Match::new(
                        id.clone(),
                        self.kind(),
                        call_activity_child_label(name, child_tag, value),
                    )
                    .with_text(value),
                );
            }
        }
        hits
    }
}

/// Every scalar under `value` containing the query, paired with the local name
/// of the attribute or element that holds it. `#text` is reported under its
/// element's name.
fn collect_matching_scalars<'a>(
    value: &'a TreeValue,
    tag: &'a str,
    query: &TextQuery,
    out: &mut Vec<(&'a str, &'a str)>,
) {
    match value {
        TreeValue::Scalar(text) => {
            if query.matches(text) {
                out.push((tag, text));
            }
        }
        TreeValue::Node(node) => {
            for (key, child) in node.entries() {
                let child_tag = if key == TEXT_KEY {
                    tag
                } else {
                    local_name(attribute_name(key).unwrap_or(key))
                };
                collect_matching_scalars(child, child_tag, query, out);
            }
        }
        TreeValue::NodeArray(items) => {
            for item in items {
                collect_matching_scalars(item, tag, query, out);
            }
        }
    }
}

/// Mode B: condition expressions on sequence flows and conditional events.
pub struct ConditionExpressionDetector {
    query: TextQuery,
}

impl ConditionExpressionDetector {
    pub fn new(query: TextQuery) -> Self {
        Self { query }
    }
}

impl Detector for ConditionExpressionDetector {
    fn kind(&self) -> ElementKind {
        ElementKind::ConditionExpression
    }

    fn detect(&self, visit: &Visit<'_>, ids: &mut IdAllocator) -> Vec<Match> {
        if !self.applies_to(visit) {
            return Vec::new();
        }

        let mut hits = Vec::new();
        for expression in visit.value.occurrences() {
            let content = match expression {
                TreeValue::Scalar(text) => text.clone(),
                TreeValue::Node(node) => node
                    .text()
                    .map(str::to_string)
                    .unwrap_or_else(|| expression.to_canonical_string()),
                TreeValue::NodeArray(_) => continue,
            };
            if !self.query.matches(&content) {
                continue;
            }

            let own = expression.as_node();
            let parent_name = element_name(own)
                .or_else(|| element_name(Some(visit.parent)))
                .map(str::to_string)
                .or_else(|| flow_endpoints(visit));
            let id = ids.resolve(self.kind(), &[own, Some(visit.parent)]);
            hits.push(
                Match::new(id, self.kind(), condition_label(parent_name.as_deref()))
                    .with_text(content),
            );
        }
        hits
    }
}

/// `"<sourceRef> -> <targetRef>"` of the enclosing flow, when both are set.
fn flow_endpoints(visit: &Visit<'_>) -> Option<String> {
    let source = visit.parent.attribute("sourceRef")?;
    let target = visit.parent.attribute("targetRef")?;
    Some(format!("{source} -> {target}"))
}
