use crate::error::{Result, TreeError};
use crate::tree::{attribute_key, TreeNode, TreeValue, TEXT_KEY};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Deepest element nesting a document may have.
pub const MAX_DEPTH: usize = 1024;

/// Element being built while its closing tag has not been seen yet.
struct Frame {
    name: String,
    node: TreeNode,
    text: String,
}

impl Frame {
    fn open(start: &BytesStart<'_>) -> Result<Self> {
        let name = std::str::from_utf8(start.name().as_ref())?.to_string();
        let mut node = TreeNode::new();
        for attr in start.attributes() {
            let attr = attr.map_err(quick_xml::Error::from)?;
            let key = std::str::from_utf8(attr.key.as_ref())?;
            let value = attr.unescape_value()?;
            node.insert(attribute_key(key), TreeValue::Scalar(value.into_owned()));
        }
        Ok(Self {
            name,
            node,
            text: String::new(),
        })
    }

    fn push_text(&mut self, fragment: &str) {
        let fragment = fragment.trim();
        if fragment.is_empty() {
            return;
        }
        if !self.text.is_empty() {
            self.text.push(' ');
        }
        self.text.push_str(fragment);
    }

    fn finish(self) -> (String, TreeValue) {
        let Frame {
            name,
            mut node,
            text,
        } = self;
        if node.is_empty() {
            return (name, TreeValue::Scalar(text));
        }
        if !text.is_empty() {
            node.insert(TEXT_KEY, TreeValue::Scalar(text));
        }
        (name, TreeValue::Node(node))
    }
}

/// Parse XML text into a tree whose single top-level key is the root element.
///
/// Element names and attribute names keep their namespace prefixes verbatim.
/// Text fragments of one element are trimmed and joined with a single space.
/// Nesting beyond [`MAX_DEPTH`] elements is a [`TreeError::TooDeep`].
pub fn parse_document(text: &str) -> Result<TreeNode> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Frame> = Vec::new();
    let mut root = TreeNode::new();

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                let frame = Frame::open(&start)?;
                if stack.len() >= MAX_DEPTH {
                    return Err(TreeError::TooDeep {
                        name: frame.name,
                        max: MAX_DEPTH,
                    });
                }
                stack.push(frame);
            }
            Event::Empty(start) => {
                let frame = Frame::open(&start)?;
                attach(&mut stack, &mut root, frame)?;
            }
            Event::End(end) => {
                let Some(frame) = stack.pop() else {
                    let name = String::from_utf8_lossy(end.name().as_ref()).into_owned();
                    return Err(TreeError::UnexpectedEnd(name));
                };
                attach(&mut stack, &mut root, frame)?;
            }
            Event::Text(content) => {
                let content = content.unescape()?;
                if let Some(frame) = stack.last_mut() {
                    frame.push_text(&content);
                }
            }
            Event::CData(content) => {
                let content = std::str::from_utf8(&content)?;
                if let Some(frame) = stack.last_mut() {
                    frame.push_text(content);
                }
            }
            Event::Eof => break,
            // Declaration, comments, processing instructions, doctype
            _ => {}
        }
    }

    if let Some(open) = stack.pop() {
        return Err(TreeError::Unclosed(open.name));
    }
    if root.is_empty() {
        return Err(TreeError::NoRoot);
    }
    Ok(root)
}

fn attach(stack: &mut [Frame], root: &mut TreeNode, frame: Frame) -> Result<()> {
    let (name, value) = frame.finish();
    match stack.last_mut() {
        Some(parent) => parent.node.insert(name, value),
        None => {
            if !root.is_empty() {
                return Err(TreeError::MultipleRoots(name));
            }
            log::trace!("parsed root element <{name}>");
            root.insert(name, value);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const ONBOARDING: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<bpmn:definitions xmlns:bpmn="http://www.omg.org/spec/BPMN/20100524/MODEL" id="Defs_1">
  <!-- generated -->
  <bpmn:process id="Process_1" name="Onboarding" isExecutable="true">
    <bpmn:callActivity id="ca1" name="Create account" calledElement="SubProcA" />
    <bpmn:scriptTask id="st1" name="Notify" scriptFormat="groovy">
      <bpmn:script><![CDATA[ if (a < b) { println "hi" } ]]></bpmn:script>
    </bpmn:scriptTask>
    <bpmn:scriptTask id="st2">
      <bpmn:script>x &amp;&amp; y</bpmn:script>
    </bpmn:scriptTask>
    <bpmn:sequenceFlow id="f1" sourceRef="A" targetRef="B">
      <bpmn:conditionExpression xsi:type="tFormalExpression">${approved}</bpmn:conditionExpression>
    </bpmn:sequenceFlow>
  </bpmn:process>
</bpmn:definitions>"#;

    fn process(tree: &TreeNode) -> &TreeNode {
        tree.get("bpmn:definitions")
            .and_then(TreeValue::as_node)
            .and_then(|defs| defs.get("bpmn:process"))
            .and_then(TreeValue::as_node)
            .expect("process node")
    }

    #[test]
    fn keeps_prefixed_keys_and_attributes() {
        let tree = parse_document(ONBOARDING).unwrap();
        let defs = tree.get("bpmn:definitions").and_then(TreeValue::as_node).unwrap();
        assert_eq!(
            defs.attribute("xmlns:bpmn"),
            Some("http://www.omg.org/spec/BPMN/20100524/MODEL")
        );
        assert_eq!(process(&tree).attribute("name"), Some("Onboarding"));

        let call = process(&tree)
            .get("bpmn:callActivity")
            .and_then(TreeValue::as_node)
            .unwrap();
        assert_eq!(call.attribute("calledElement"), Some("SubProcA"));
    }

    #[test]
    fn repeated_elements_become_arrays_and_cdata_is_text() {
        let tree = parse_document(ONBOARDING).unwrap();
        let tasks = process(&tree).get("bpmn:scriptTask").unwrap();
        assert_eq!(tasks.occurrences().len(), 2);

        let first = tasks.occurrences()[0].as_node().unwrap();
        assert_eq!(
            first.get("bpmn:script"),
            Some(&TreeValue::scalar(r#"if (a < b) { println "hi" }"#))
        );
        let second = tasks.occurrences()[1].as_node().unwrap();
        assert_eq!(second.get("bpmn:script"), Some(&TreeValue::scalar("x && y")));
    }

    #[test]
    fn text_with_attributes_goes_under_text_key() {
        let tree = parse_document(ONBOARDING).unwrap();
        let flow = process(&tree)
            .get("bpmn:sequenceFlow")
            .and_then(TreeValue::as_node)
            .unwrap();
        let condition = flow
            .get("bpmn:conditionExpression")
            .and_then(TreeValue::as_node)
            .unwrap();
        assert_eq!(condition.text(), Some("${approved}"));
        assert_eq!(condition.attribute("xsi:type"), Some("tFormalExpression"));
    }

    #[test]
    fn empty_element_without_attributes_is_empty_scalar() {
        let tree = parse_document("<root><flag/><other></other></root>").unwrap();
        let root = tree.get("root").and_then(TreeValue::as_node).unwrap();
        assert_eq!(root.get("flag"), Some(&TreeValue::scalar("")));
        assert_eq!(root.get("other"), Some(&TreeValue::scalar("")));
    }

    fn nested(depth: usize) -> String {
        let mut xml = String::from("<definitions><process>");
        xml.push_str(&r#"<a x="1">"#.repeat(depth));
        xml.push_str("<script>needle</script>");
        xml.push_str(&"</a>".repeat(depth));
        xml.push_str("</process></definitions>");
        xml
    }

    #[test]
    fn nesting_up_to_the_limit_is_accepted() {
        // definitions, process and script add three levels
        assert!(parse_document(&nested(MAX_DEPTH - 3)).is_ok());
        assert!(matches!(
            parse_document(&nested(MAX_DEPTH - 2)),
            Err(TreeError::TooDeep { .. })
        ));
    }

    #[test]
    fn very_deep_nesting_is_rejected() {
        let err = parse_document(&nested(10_000)).unwrap_err();
        assert!(
            matches!(&err, TreeError::TooDeep { name, max } if name == "a" && *max == MAX_DEPTH),
            "{err}"
        );
    }

    #[test]
    fn rejects_malformed_documents() {
        assert!(matches!(
            parse_document("<a><b></a>"),
            Err(TreeError::Xml(_))
        ));
        // Depending on the reader, a truncated document surfaces at EOF or as a reader error.
        assert!(matches!(
            parse_document("<a><b>"),
            Err(TreeError::Unclosed(_)) | Err(TreeError::Xml(_))
        ));
        assert!(matches!(parse_document(""), Err(TreeError::NoRoot)));
        assert!(matches!(
            parse_document("<!-- nothing here -->"),
            Err(TreeError::NoRoot)
        ));
        assert!(matches!(
            parse_document("<a/><b/>"),
            Err(TreeError::MultipleRoots(_))
        ));
    }
}
