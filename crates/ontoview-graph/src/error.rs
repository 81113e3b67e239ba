//! Store error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("duplicate node id: {0}")]
    DuplicateNode(String),

    #[error("duplicate edge id: {0}")]
    DuplicateEdge(String),

    #[error("edge {edge} references unknown node: {node}")]
    UnknownEndpoint { edge: String, node: String },

    #[error("node {child} references unknown parent: {parent}")]
    UnknownParent { child: String, parent: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
