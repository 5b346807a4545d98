use bpmn_xml_tree::TreeError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SearchError>;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Empty query")]
    EmptyQuery,

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: TreeError,
    },
}
