use thiserror::Error;

/// Result type for tree parsing
pub type Result<T> = std::result::Result<T, TreeError>;

/// Errors raised while turning XML text into a tree
#[derive(Error, Debug)]
pub enum TreeError {
    /// Malformed XML reported by the reader
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Tag, attribute or CDATA bytes are not UTF-8
    #[error("Invalid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// Input ended while elements were still open
    #[error("Unclosed element: {0}")]
    Unclosed(String),

    /// Closing tag without a matching opening tag
    #[error("Unexpected closing tag: {0}")]
    UnexpectedEnd(String),

    /// More than one top-level element
    #[error("Multiple root elements: {0}")]
    MultipleRoots(String),

    /// No element at all (empty or comment-only input)
    #[error("Document has no root element")]
    NoRoot,

    /// Elements nested deeper than [`crate::MAX_DEPTH`]
    #[error("Element nesting exceeds {max} levels at <{name}>")]
    TooDeep { name: String, max: usize },
}
