//! Persisted document shapes.
//!
//! Three document kinds are exchanged as files: a full session (all views
//! plus option state), a single view and a bare layout (node positions
//! only). Field names follow the original viewer's files so saved sessions
//! keep loading.

use ontoview_graph::{GraphJson, Point};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The application version written into documents.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Session-scoped option flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionOptions {
    pub separate_subs: bool,
    pub cumulative_search: bool,
    pub grid: bool,
    pub combine_match_mode: bool,
    pub day_mode: bool,
    pub colored_edges: bool,
}

/// Engine-independent state: version, filter visibility and options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionState {
    pub version: String,
    pub filters: BTreeMap<String, bool>,
    pub options: SessionOptions,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            version: VERSION.to_string(),
            filters: BTreeMap::new(),
            options: SessionOptions::default(),
        }
    }
}

impl SessionState {
    /// Whether the document was written by the running application
    /// version. A mismatch requires user confirmation before applying.
    pub fn version_matches(&self) -> bool {
        self.version == VERSION
    }
}

/// One view inside a session document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewSlot {
    pub title: String,
    pub graph: GraphJson,
}

/// The whole application state as one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionDocument {
    pub state: SessionState,
    #[serde(rename = "mainGraph")]
    pub main_graph: ViewSlot,
    #[serde(default)]
    pub tabs: Vec<ViewSlot>,
}

/// A single view as a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewDocument {
    pub version: String,
    pub title: String,
    pub graph: GraphJson,
}

impl ViewDocument {
    pub fn version_matches(&self) -> bool {
        self.version == VERSION
    }
}

/// Node positions by identifier, independent of graph content.
pub type LayoutDocument = BTreeMap<String, Point>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_defaults() {
        let state: SessionState = serde_json::from_str("{}").unwrap();
        assert_eq!(state.version, VERSION);
        assert!(state.version_matches());
    }

    #[test]
    fn test_version_mismatch_detection() {
        let state: SessionState =
            serde_json::from_str(r#"{"version": "0.0.1-old"}"#).unwrap();
        assert!(!state.version_matches());
    }

    #[test]
    fn test_options_wire_names() {
        let options: SessionOptions = serde_json::from_str(
            r#"{"combineMatchMode": true, "cumulativeSearch": true}"#,
        )
        .unwrap();
        assert!(options.combine_match_mode);
        assert!(options.cumulative_search);
        assert!(!options.day_mode);
    }

    #[test]
    fn test_session_document_shape() {
        let json = r#"{
            "state": {"version": "1.0.0", "filters": {"meta": false}, "options": {}},
            "mainGraph": {"title": "main", "graph": {"elements": {"nodes": [], "edges": []}}},
            "tabs": []
        }"#;
        let doc: SessionDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.main_graph.title, "main");
        assert_eq!(doc.state.filters.get("meta"), Some(&false));
    }
}
