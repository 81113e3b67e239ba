//! Session error types.

use crate::view::ViewId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("a view registry is already alive in this process")]
    RegistryAlreadyLive,

    #[error("no such view: {0}")]
    NoSuchView(ViewId),

    #[error("view {0} is not initialized yet")]
    NotInitialized(ViewId),

    #[error("the main view cannot be closed")]
    MainViewNotClosable,

    #[error("no main view exists")]
    NoMainView,

    #[error("graph error: {0}")]
    Graph(#[from] ontoview_graph::GraphError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
