use crate::tag::child_by_local_name;
use bpmn_xml_tree::{TreeNode, TreeValue};

pub const UNNAMED_PROCESS: &str = "Unnamed Process";

/// Declared name of the document's process.
///
/// Looks for the root `definitions` element and its first `process` child,
/// whatever their prefixes. Any missing piece, including an empty name, yields
/// [`UNNAMED_PROCESS`].
pub fn resolve_process_name(tree: &TreeNode) -> String {
    first_node(tree, "definitions")
        .and_then(|definitions| first_node(definitions, "process"))
        .and_then(|process| process.attribute("name"))
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(UNNAMED_PROCESS)
        .to_string()
}

fn first_node<'a>(node: &'a TreeNode, local: &str) -> Option<&'a TreeNode> {
    child_by_local_name(node, local)
        .and_then(|value| value.occurrences().first())
        .and_then(TreeValue::as_node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bpmn_xml_tree::parse_document;
    use pretty_assertions::assert_eq;

    fn name_of(xml: &str) -> String {
        resolve_process_name(&parse_document(xml).unwrap())
    }

    #[test]
    fn reads_name_under_any_prefix() {
        assert_eq!(
            name_of(r#"<bpmn2:definitions><bpmn2:process name="Billing"/></bpmn2:definitions>"#),
            "Billing"
        );
        assert_eq!(
            name_of(r#"<definitions><process name="Billing"/></definitions>"#),
            "Billing"
        );
    }

    #[test]
    fn uses_first_of_several_processes() {
        assert_eq!(
            name_of(
                r#"<definitions>
                     <process id="a" name="First"/>
                     <process id="b" name="Second"/>
                   </definitions>"#
            ),
            "First"
        );
    }

    #[test]
    fn falls_back_when_structure_is_missing() {
        assert_eq!(name_of(r#"<definitions><process id="p"/></definitions>"#), UNNAMED_PROCESS);
        assert_eq!(name_of(r#"<definitions><process name=" "/></definitions>"#), UNNAMED_PROCESS);
        assert_eq!(name_of("<definitions/>"), UNNAMED_PROCESS);
        assert_eq!(name_of(r#"<process name="Orphan"/>"#), UNNAMED_PROCESS);
    }
}
