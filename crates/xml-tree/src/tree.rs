use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// Key prefix marking an attribute (`@_id`, `@_xmlns:bpmn`).
pub const ATTRIBUTE_PREFIX: &str = "@_";

/// Reserved key holding the text of an element that also has attributes or children.
pub const TEXT_KEY: &str = "#text";

/// Value stored under a tree key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeValue {
    /// Attribute value or text-only element
    Scalar(String),

    /// Element with attributes and/or children
    Node(TreeNode),

    /// Repeated same-named siblings, in document order
    NodeArray(Vec<TreeValue>),
}

/// Ordered mapping from (namespace-qualified) key to value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeNode {
    entries: Vec<(String, TreeValue)>,
}

impl TreeNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy for assembling fixtures.
    pub fn with(mut self, key: impl Into<String>, value: TreeValue) -> Self {
        self.insert(key, value);
        self
    }

    /// Builder-style attribute insert; `name` is given without the `@_` prefix.
    pub fn with_attribute(self, name: &str, value: impl Into<String>) -> Self {
        self.with(attribute_key(name), TreeValue::Scalar(value.into()))
    }

    /// Insert `value` under `key`. A repeated key turns the existing entry into a
    /// `NodeArray` in place, so the key keeps the position of its first occurrence.
    pub fn insert(&mut self, key: impl Into<String>, value: TreeValue) {
        let key = key.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, TreeValue::NodeArray(items))) => items.push(value),
            Some((_, slot)) => {
                let first = std::mem::replace(slot, TreeValue::NodeArray(Vec::new()));
                *slot = TreeValue::NodeArray(vec![first, value]);
            }
            None => self.entries.push((key, value)),
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &TreeValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn get(&self, key: &str) -> Option<&TreeValue> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    /// Attribute value by unprefixed name (`attribute("id")` reads `@_id`).
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| attribute_name(key) == Some(name))
            .and_then(|(_, value)| value.as_scalar())
    }

    /// Text content stored under `#text`.
    pub fn text(&self) -> Option<&str> {
        self.get(TEXT_KEY).and_then(TreeValue::as_scalar)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, TreeValue)> for TreeNode {
    fn from_iter<I: IntoIterator<Item = (String, TreeValue)>>(iter: I) -> Self {
        let mut node = TreeNode::new();
        for (key, value) in iter {
            node.insert(key, value);
        }
        node
    }
}

impl TreeValue {
    pub fn scalar(text: impl Into<String>) -> Self {
        TreeValue::Scalar(text.into())
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            TreeValue::Scalar(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&TreeNode> {
        match self {
            TreeValue::Node(node) => Some(node),
            _ => None,
        }
    }

    /// Every occurrence behind this value: the value itself for a scalar or node,
    /// each element for an array. Lets callers treat single and repeated
    /// elements the same way.
    pub fn occurrences(&self) -> &[TreeValue] {
        match self {
            TreeValue::NodeArray(items) => items,
            single => std::slice::from_ref(single),
        }
    }

    /// Text of a scalar, or the `#text` of a node.
    pub fn text_content(&self) -> Option<&str> {
        match self {
            TreeValue::Scalar(text) => Some(text),
            TreeValue::Node(node) => node.text(),
            TreeValue::NodeArray(_) => None,
        }
    }

    /// Order-stable JSON rendering of this value and everything below it.
    pub fn to_canonical_string(&self) -> String {
        // String keys and string leaves only; serde_json cannot fail here.
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl Serialize for TreeValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TreeValue::Scalar(text) => serializer.serialize_str(text),
            TreeValue::Node(node) => node.serialize(serializer),
            TreeValue::NodeArray(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

impl Serialize for TreeNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

pub fn attribute_key(name: &str) -> String {
    format!("{ATTRIBUTE_PREFIX}{name}")
}

/// Unprefixed attribute name for an attribute key, `None` for element keys.
pub fn attribute_name(key: &str) -> Option<&str> {
    key.strip_prefix(ATTRIBUTE_PREFIX)
}

pub fn is_attribute_key(key: &str) -> bool {
    key.starts_with(ATTRIBUTE_PREFIX)
}

/// True for keys that name child elements (not attributes, not `#text`).
pub fn is_element_key(key: &str) -> bool {
    !is_attribute_key(key) && key != TEXT_KEY
}
