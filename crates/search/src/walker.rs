use crate::tag::local_name;
use bpmn_xml_tree::{is_element_key, TreeNode, TreeValue};

/// One element key seen by the walker.
#[derive(Debug, Clone, Copy)]
pub struct Visit<'a> {
    /// Local name of the key (`callActivity` for `bpmn:callActivity`)
    pub tag: &'a str,
    /// Key exactly as it appears in the tree
    pub raw_key: &'a str,
    /// Value under the key; a `NodeArray` for repeated siblings
    pub value: &'a TreeValue,
    /// Element holding the key
    pub parent: &'a TreeNode,
    /// Local name of `parent`, `None` at the document root
    pub parent_tag: Option<&'a str>,
}

/// Depth-first, document-order walk over every element key below `root`.
///
/// Each key is dispatched to `visitor` before the walk descends into its value.
/// Attribute keys and `#text` are not elements and are never dispatched;
/// scalars have nothing to descend into.
pub fn walk<'a, F>(root: &'a TreeNode, visitor: &mut F)
where
    F: FnMut(&Visit<'a>),
{
    walk_node(root, None, visitor);
}

fn walk_node<'a, F>(node: &'a TreeNode, node_tag: Option<&'a str>, visitor: &mut F)
where
    F: FnMut(&Visit<'a>),
{
    for (raw_key, value) in node.entries() {
        if !is_element_key(raw_key) {
            continue;
        }
        let tag = local_name(raw_key);
        visitor(&Visit {
            tag,
            raw_key,
            value,
            parent: node,
            parent_tag: node_tag,
        });

        for occurrence in value.occurrences() {
            if let TreeValue::Node(child) = occurrence {
                walk_node(child, Some(tag), visitor);
            }
        }
    }
}
