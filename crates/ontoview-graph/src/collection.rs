//! Element collections with set algebra.
//!
//! Wayfinding operations compose node and edge sets: a star is the union of
//! an inner set, its neighbors and the connecting edges; hiding is applied
//! to a difference. `ElementSet` is the common currency for all of them.
//! Indices are kept in ordered sets so iteration is deterministic.

use petgraph::stable_graph::{EdgeIndex, NodeIndex};
use std::collections::BTreeSet;

/// An ordered set of node and edge indices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementSet {
    nodes: BTreeSet<NodeIndex>,
    edges: BTreeSet<EdgeIndex>,
}

impl ElementSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set holding a single node.
    pub fn from_node(node: NodeIndex) -> Self {
        let mut set = Self::new();
        set.insert_node(node);
        set
    }

    /// Creates a set from node indices.
    pub fn from_nodes<I: IntoIterator<Item = NodeIndex>>(nodes: I) -> Self {
        Self {
            nodes: nodes.into_iter().collect(),
            edges: BTreeSet::new(),
        }
    }

    /// Creates a set from edge indices.
    pub fn from_edges<I: IntoIterator<Item = EdgeIndex>>(edges: I) -> Self {
        Self {
            nodes: BTreeSet::new(),
            edges: edges.into_iter().collect(),
        }
    }

    pub fn insert_node(&mut self, node: NodeIndex) {
        self.nodes.insert(node);
    }

    pub fn insert_edge(&mut self, edge: EdgeIndex) {
        self.edges.insert(edge);
    }

    pub fn contains_node(&self, node: NodeIndex) -> bool {
        self.nodes.contains(&node)
    }

    pub fn contains_edge(&self, edge: EdgeIndex) -> bool {
        self.edges.contains(&edge)
    }

    /// Merges another set into this one.
    pub fn merge(&mut self, other: &ElementSet) {
        self.nodes.extend(other.nodes.iter().copied());
        self.edges.extend(other.edges.iter().copied());
    }

    /// Returns the union of two sets.
    pub fn union(&self, other: &ElementSet) -> ElementSet {
        let mut out = self.clone();
        out.merge(other);
        out
    }

    /// Returns the elements of this set that are not in `other`.
    pub fn difference(&self, other: &ElementSet) -> ElementSet {
        ElementSet {
            nodes: self.nodes.difference(&other.nodes).copied().collect(),
            edges: self.edges.difference(&other.edges).copied().collect(),
        }
    }

    /// Iterates over the node indices in ascending order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.nodes.iter().copied()
    }

    /// Iterates over the edge indices in ascending order.
    pub fn edges(&self) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.edges.iter().copied()
    }

    /// The node part of this set.
    pub fn node_set(&self) -> ElementSet {
        ElementSet {
            nodes: self.nodes.clone(),
            edges: BTreeSet::new(),
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn len(&self) -> usize {
        self.nodes.len() + self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

impl FromIterator<NodeIndex> for ElementSet {
    fn from_iter<I: IntoIterator<Item = NodeIndex>>(iter: I) -> Self {
        Self::from_nodes(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(i: usize) -> NodeIndex {
        NodeIndex::new(i)
    }

    fn e(i: usize) -> EdgeIndex {
        EdgeIndex::new(i)
    }

    #[test]
    fn test_union_difference() {
        let mut a = ElementSet::from_nodes([n(0), n(1)]);
        a.insert_edge(e(0));
        let b = ElementSet::from_nodes([n(1), n(2)]);

        let u = a.union(&b);
        assert_eq!(u.node_count(), 3);
        assert_eq!(u.edge_count(), 1);

        let d = u.difference(&b);
        assert_eq!(d.nodes().collect::<Vec<_>>(), vec![n(0)]);
        assert_eq!(d.edge_count(), 1);
    }

    #[test]
    fn test_merge_deduplicates() {
        let mut a = ElementSet::from_node(n(0));
        a.merge(&ElementSet::from_node(n(0)));
        assert_eq!(a.len(), 1);
    }

    #[test]
    fn test_deterministic_order() {
        let set = ElementSet::from_nodes([n(2), n(0), n(1)]);
        let order: Vec<_> = set.nodes().collect();
        assert_eq!(order, vec![n(0), n(1), n(2)]);
    }
}
