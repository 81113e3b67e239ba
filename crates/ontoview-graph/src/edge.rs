//! Edge payload types.

use crate::tags::TagSet;
use serde::{Deserialize, Serialize};

/// Predicate label of close-match edges, the relation used for inner-set
/// expansion and compound grouping.
pub const CLOSE_MATCH: &str = "closeMatch";

/// An ontology relation between two classes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeData {
    /// Stable identifier.
    pub id: String,

    /// Predicate label, e.g. `closeMatch` or `subClassOf`.
    pub pl: String,

    /// Classification tags.
    #[serde(skip)]
    pub tags: TagSet,

    /// Host selection flag.
    #[serde(skip)]
    pub selected: bool,
}

impl EdgeData {
    /// Creates an edge with the given identifier and predicate label.
    pub fn new(id: impl Into<String>, pl: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            pl: pl.into(),
            tags: TagSet::new(),
            selected: false,
        }
    }

    /// Whether this is a close-match edge.
    pub fn is_close_match(&self) -> bool {
        self.pl == CLOSE_MATCH
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_close_match() {
        assert!(EdgeData::new("e0", CLOSE_MATCH).is_close_match());
        assert!(!EdgeData::new("e1", "subClassOf").is_close_match());
    }
}
