//! Label search index.
//!
//! An inverted n-gram index over class labels and identifiers, so that a
//! search box can resolve substrings to candidate nodes in O(k) of the
//! match count instead of scanning the whole graph. Results feed
//! `present_uris`.

use crate::graph::OntoGraph;
use petgraph::stable_graph::NodeIndex;
use std::collections::{HashMap, HashSet};

/// Minimum n-gram length for indexing.
const MIN_NGRAM_LEN: usize = 2;

/// Maximum n-gram length for indexing.
const MAX_NGRAM_LEN: usize = 4;

/// An inverted index for label substring search.
///
/// When a label is added it is broken into overlapping n-grams and each one
/// is indexed. A query looks up its own n-grams and intersects the result
/// sets, then verifies the full substring to weed out false positives.
#[derive(Debug, Default, Clone)]
pub struct LabelIndex {
    /// Maps lowercased labels to node indices for exact lookup.
    exact_index: HashMap<String, Vec<NodeIndex>>,
    /// Maps lowercased n-grams to node indices for substring search.
    ngram_index: HashMap<String, HashSet<NodeIndex>>,
}

impl LabelIndex {
    /// Creates a new empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an index over every label and identifier in the graph.
    pub fn build(graph: &OntoGraph) -> Self {
        let mut index = Self::new();
        for node in graph.node_indices() {
            let data = graph.node(node).expect("node index");
            index.insert(&data.id, node);
            for labels in data.labels.values() {
                for label in labels {
                    index.insert(label, node);
                }
            }
        }
        index
    }

    /// Inserts a label into the index.
    pub fn insert(&mut self, label: &str, node: NodeIndex) {
        let lower = label.to_lowercase();
        self.exact_index.entry(lower.clone()).or_default().push(node);
        for ngram in ngrams(&lower) {
            self.ngram_index.entry(ngram).or_default().insert(node);
        }
    }

    /// Removes a label from the index.
    pub fn remove(&mut self, label: &str, node: NodeIndex) {
        let lower = label.to_lowercase();
        if let Some(nodes) = self.exact_index.get_mut(&lower) {
            nodes.retain(|&n| n != node);
            if nodes.is_empty() {
                self.exact_index.remove(&lower);
            }
        }
        for ngram in ngrams(&lower) {
            if let Some(nodes) = self.ngram_index.get_mut(&ngram) {
                nodes.remove(&node);
                if nodes.is_empty() {
                    self.ngram_index.remove(&ngram);
                }
            }
        }
    }

    /// Finds nodes with a label containing the query substring, sorted for
    /// deterministic output.
    pub fn search(&self, query: &str) -> Vec<NodeIndex> {
        let query_lower = query.to_lowercase();

        // very short queries fall back to prefix matching
        if query_lower.chars().count() < MIN_NGRAM_LEN {
            let mut results: Vec<NodeIndex> = self
                .exact_index
                .iter()
                .filter(|(label, _)| label.starts_with(&query_lower))
                .flat_map(|(_, nodes)| nodes.iter().copied())
                .collect();
            results.sort();
            results.dedup();
            return results;
        }

        let query_ngrams = ngrams(&query_lower);
        if query_ngrams.is_empty() {
            return Vec::new();
        }

        let mut candidates: Option<HashSet<NodeIndex>> = None;
        for ngram in &query_ngrams {
            match self.ngram_index.get(ngram) {
                Some(nodes) => match &mut candidates {
                    None => candidates = Some(nodes.clone()),
                    Some(c) => c.retain(|n| nodes.contains(n)),
                },
                // any missing n-gram means the query cannot match
                None => return Vec::new(),
            }
        }

        let mut results: Vec<NodeIndex> = candidates
            .unwrap_or_default()
            .into_iter()
            .filter(|n| {
                self.exact_index
                    .iter()
                    .any(|(label, nodes)| nodes.contains(n) && label.contains(&query_lower))
            })
            .collect();
        results.sort();
        results
    }

    /// The number of unique labels indexed.
    pub fn len(&self) -> usize {
        self.exact_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exact_index.is_empty()
    }
}

fn ngrams(s: &str) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    let mut out = Vec::new();
    for n in MIN_NGRAM_LEN..=MAX_NGRAM_LEN {
        if chars.len() >= n {
            for i in 0..=(chars.len() - n) {
                out.push(chars[i..i + n].iter().collect());
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeData;

    fn sample() -> (OntoGraph, Vec<NodeIndex>) {
        let mut g = OntoGraph::new();
        let a = g
            .add_node(NodeData::new("http://example.org/ChiefInformationOfficer")
                .with_label("en", "chief information officer"))
            .unwrap();
        let b = g
            .add_node(NodeData::new("http://example.org/InformationSystem")
                .with_label("en", "information system")
                .with_label("de", "Informationssystem"))
            .unwrap();
        let c = g
            .add_node(NodeData::new("http://example.org/Hospital").with_label("en", "hospital"))
            .unwrap();
        (g, vec![a, b, c])
    }

    #[test]
    fn test_search_substring() {
        let (g, nodes) = sample();
        let index = LabelIndex::build(&g);
        let results = index.search("information");
        assert!(results.contains(&nodes[0]));
        assert!(results.contains(&nodes[1]));
        assert!(!results.contains(&nodes[2]));
    }

    #[test]
    fn test_search_case_insensitive_and_multilingual() {
        let (g, nodes) = sample();
        let index = LabelIndex::build(&g);
        assert_eq!(index.search("informationssystem"), vec![nodes[1]]);
        assert_eq!(index.search("INFORMATIONSSYSTEM"), vec![nodes[1]]);
    }

    #[test]
    fn test_search_matches_identifier() {
        let (g, nodes) = sample();
        let index = LabelIndex::build(&g);
        let results = index.search("example.org/hospital");
        assert_eq!(results, vec![nodes[2]]);
    }

    #[test]
    fn test_search_no_match() {
        let (g, _) = sample();
        let index = LabelIndex::build(&g);
        assert!(index.search("radiology").is_empty());
    }

    #[test]
    fn test_remove() {
        let (g, nodes) = sample();
        let mut index = LabelIndex::build(&g);
        assert!(index.search("information system").contains(&nodes[1]));
        index.remove("information system", nodes[1]);
        assert!(!index.search("information system").contains(&nodes[1]));
    }
}
