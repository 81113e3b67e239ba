//! Node payload types.

use crate::tags::TagSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A 2D position in layout space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An ontology class in the graph.
///
/// The identifier is the class IRI. Labels are grouped by language tag;
/// `source` names the subontology the class comes from (e.g. `bb`, `ob`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    /// Stable identifier, usually an IRI. Synthetic match parents use
    /// identifiers of the form `parent<N>`.
    pub id: String,

    /// Label strings per language tag.
    #[serde(default)]
    pub labels: BTreeMap<String, Vec<String>>,

    /// Subontology provenance.
    #[serde(default)]
    pub source: Option<String>,

    /// Layout position.
    #[serde(default)]
    pub position: Point,

    /// Classification tags.
    #[serde(skip)]
    pub tags: TagSet,

    /// Host selection flag.
    #[serde(skip)]
    pub selected: bool,
}

impl NodeData {
    /// Creates a node with the given identifier and no labels.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            labels: BTreeMap::new(),
            source: None,
            position: Point::default(),
            tags: TagSet::new(),
            selected: false,
        }
    }

    /// Sets a single label for a language.
    pub fn with_label(mut self, language: &str, label: &str) -> Self {
        self.labels
            .entry(language.to_string())
            .or_default()
            .push(label.to_string());
        self
    }

    /// Sets the subontology provenance.
    pub fn with_source(mut self, source: &str) -> Self {
        self.source = Some(source.to_string());
        self
    }

    /// Any label, preferring English, falling back to the identifier.
    pub fn display_label(&self) -> &str {
        self.labels
            .get("en")
            .or_else(|| self.labels.values().next())
            .and_then(|ls| ls.first())
            .map(|s| s.as_str())
            .unwrap_or(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_label_prefers_english() {
        let node = NodeData::new("http://example.org/a")
            .with_label("de", "Klasse")
            .with_label("en", "Class");
        assert_eq!(node.display_label(), "Class");
    }

    #[test]
    fn test_display_label_falls_back_to_id() {
        let node = NodeData::new("http://example.org/a");
        assert_eq!(node.display_label(), "http://example.org/a");
    }
}
