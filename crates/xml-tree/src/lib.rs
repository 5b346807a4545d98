//! # BPMN XML Tree
//!
//! Turns XML process definitions into a generic, ordered tree that search code
//! can walk without knowing anything about namespaces or schemas.
//!
//! ## Shape
//!
//! ```text
//! <bpmn:process id="P" name="Onboarding">       "bpmn:process": Node {
//!   <bpmn:scriptTask id="a"/>                      "@_id": "P",
//!   <bpmn:scriptTask id="b"/>                      "@_name": "Onboarding",
//!   <bpmn:documentation>text</...>                 "bpmn:scriptTask": [ {..}, {..} ],
//! </bpmn:process>                                  "bpmn:documentation": "text" }
//! ```
//!
//! - attributes are keys prefixed with `@_`
//! - text of an element that also has attributes or children sits under `#text`
//! - repeated siblings become a `NodeArray`, single ones stay a `Node`
//!
//! ## Example
//!
//! ```rust
//! use bpmn_xml_tree::{parse_document, TreeValue};
//!
//! let tree = parse_document(r#"<definitions><process name="Onboarding"/></definitions>"#).unwrap();
//! let process = tree
//!     .get("definitions")
//!     .and_then(TreeValue::as_node)
//!     .and_then(|defs| defs.get("process"))
//!     .and_then(TreeValue::as_node)
//!     .unwrap();
//! assert_eq!(process.attribute("name"), Some("Onboarding"));
//! ```

mod error;
mod parser;
mod tree;

pub use error::{Result, TreeError};
pub use parser::{parse_document, MAX_DEPTH};
pub use tree::{
    attribute_key, attribute_name, is_attribute_key, is_element_key, TreeNode, TreeValue,
    ATTRIBUTE_PREFIX, TEXT_KEY,
};
