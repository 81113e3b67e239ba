//! Shortest-path search over a restricted subgraph.
//!
//! Wayfinding operates on the unfiltered part of the graph only, with edges
//! traversed in both directions and counted as one hop each. The search is
//! a plain BFS with parent tracking; neighbors are visited in index order so
//! the reported path is deterministic.

use crate::collection::ElementSet;
use crate::edge::EdgeData;
use crate::graph::OntoGraph;
use crate::node::NodeData;
use petgraph::stable_graph::{EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{HashMap, VecDeque};

/// A shortest path: the visited nodes in order and the edges between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    pub nodes: Vec<NodeIndex>,
    pub edges: Vec<EdgeIndex>,
}

impl Path {
    /// The number of hops.
    pub fn hops(&self) -> usize {
        self.edges.len()
    }

    /// The path as an element set.
    pub fn to_element_set(&self) -> ElementSet {
        let mut set = ElementSet::from_nodes(self.nodes.iter().copied());
        for &e in &self.edges {
            set.insert_edge(e);
        }
        set
    }
}

impl OntoGraph {
    /// Finds a shortest path by hop count from `from` to `to`, using only
    /// nodes and edges that satisfy the predicates. Edges are traversed in
    /// both directions. Returns `None` when no such path exists.
    pub fn shortest_path<N, E>(
        &self,
        from: NodeIndex,
        to: NodeIndex,
        mut node_pred: N,
        mut edge_pred: E,
    ) -> Option<Path>
    where
        N: FnMut(&NodeData) -> bool,
        E: FnMut(&EdgeData) -> bool,
    {
        if self.node(from).map(&mut node_pred) != Some(true)
            || self.node(to).map(&mut node_pred) != Some(true)
        {
            return None;
        }

        let mut came_from: HashMap<NodeIndex, (NodeIndex, EdgeIndex)> = HashMap::new();
        let mut queue = VecDeque::new();
        queue.push_back(from);
        came_from.insert(from, (from, EdgeIndex::end()));

        while let Some(current) = queue.pop_front() {
            if current == to {
                return Some(self.reconstruct(from, to, &came_from));
            }
            // collect and sort for deterministic expansion order
            let mut steps: Vec<(NodeIndex, EdgeIndex)> = Vec::new();
            for e in self.edges_around(current) {
                let (s, t) = self.edge_endpoints(e).expect("edge endpoints");
                let next = if s == current { t } else { s };
                if came_from.contains_key(&next) {
                    continue;
                }
                let edge_ok = self.edge(e).map(&mut edge_pred) == Some(true);
                let node_ok = self.node(next).map(&mut node_pred) == Some(true);
                if edge_ok && node_ok {
                    steps.push((next, e));
                }
            }
            steps.sort();
            for (next, via) in steps {
                if !came_from.contains_key(&next) {
                    came_from.insert(next, (current, via));
                    queue.push_back(next);
                }
            }
        }
        None
    }

    fn reconstruct(
        &self,
        from: NodeIndex,
        to: NodeIndex,
        came_from: &HashMap<NodeIndex, (NodeIndex, EdgeIndex)>,
    ) -> Path {
        let mut nodes = vec![to];
        let mut edges = Vec::new();
        let mut current = to;
        while current != from {
            let (previous, via) = came_from[&current];
            edges.push(via);
            nodes.push(previous);
            current = previous;
        }
        nodes.reverse();
        edges.reverse();
        Path { nodes, edges }
    }

    fn edges_around(&self, node: NodeIndex) -> Vec<EdgeIndex> {
        let mut edges: Vec<EdgeIndex> = self
            .edges_directed_refs(node, Direction::Outgoing)
            .chain(self.edges_directed_refs(node, Direction::Incoming))
            .collect();
        edges.sort();
        edges.dedup();
        edges
    }

    fn edges_directed_refs(
        &self,
        node: NodeIndex,
        direction: Direction,
    ) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.inner().edges_directed(node, direction).map(|e| e.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeData;
    use crate::tags::Tag;

    fn unfiltered_node(n: &NodeData) -> bool {
        n.tags.contains(Tag::Unfiltered)
    }

    fn unfiltered_edge(e: &EdgeData) -> bool {
        e.tags.contains(Tag::Unfiltered)
    }

    /// a ─ b ─ c plus a direct filtered shortcut a ─ c.
    fn make_graph() -> (OntoGraph, Vec<NodeIndex>) {
        let mut g = OntoGraph::new();
        let a = g.add_node(NodeData::new("a")).unwrap();
        let b = g.add_node(NodeData::new("b")).unwrap();
        let c = g.add_node(NodeData::new("c")).unwrap();
        g.add_edge(a, b, EdgeData::new("e0", "subClassOf")).unwrap();
        g.add_edge(b, c, EdgeData::new("e1", "subClassOf")).unwrap();
        g.add_edge(a, c, EdgeData::new("shortcut", "subClassOf"))
            .unwrap();
        g.add_tag_all(Tag::Unfiltered);
        let shortcut = g.edge_index("shortcut").unwrap();
        g.remove_tag(&ElementSet::from_edges([shortcut]), Tag::Unfiltered);
        (g, vec![a, b, c])
    }

    #[test]
    fn test_path_avoids_filtered_edges() {
        let (g, nodes) = make_graph();
        let path = g
            .shortest_path(nodes[0], nodes[2], unfiltered_node, unfiltered_edge)
            .unwrap();
        assert_eq!(path.nodes, vec![nodes[0], nodes[1], nodes[2]]);
        assert_eq!(path.hops(), 2);
    }

    #[test]
    fn test_path_uses_shortcut_when_unrestricted() {
        let (g, nodes) = make_graph();
        let path = g
            .shortest_path(nodes[0], nodes[2], |_| true, |_| true)
            .unwrap();
        assert_eq!(path.hops(), 1);
    }

    #[test]
    fn test_path_is_undirected() {
        let (g, nodes) = make_graph();
        // all edges point away from a; the search must still find c → a
        let path = g
            .shortest_path(nodes[2], nodes[0], unfiltered_node, unfiltered_edge)
            .unwrap();
        assert_eq!(path.nodes.first(), Some(&nodes[2]));
        assert_eq!(path.nodes.last(), Some(&nodes[0]));
    }

    #[test]
    fn test_no_path() {
        let (mut g, nodes) = make_graph();
        let d = g.add_node(NodeData::new("d")).unwrap();
        g.add_tag(&ElementSet::from_node(d), Tag::Unfiltered);
        assert!(g
            .shortest_path(nodes[0], d, unfiltered_node, unfiltered_edge)
            .is_none());
    }

    #[test]
    fn test_excluded_endpoint_fails() {
        let (mut g, nodes) = make_graph();
        g.remove_tag(&ElementSet::from_node(nodes[2]), Tag::Unfiltered);
        assert!(g
            .shortest_path(nodes[0], nodes[2], unfiltered_node, unfiltered_edge)
            .is_none());
    }
}
