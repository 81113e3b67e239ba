//! Path and star operations.
//!
//! A star is the induced subgraph of a node (or its close-match cluster)
//! and its direct neighbors; a worm is a path plus a star around the
//! target; a double star additionally stars the source. All of them hide
//! the rest of the graph unless star mode is already active, in which case
//! they accumulate.

use crate::engine::VisibilityEngine;
use ontoview_graph::{
    ConcentricOptions, EdgeData, ElementSet, NodeData, NodeIndex, Tag,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{error, warn};

/// Which edges of the star center to follow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Edges ending at the center.
    In,
    /// Edges starting at the center.
    Out,
    /// All edges touching the center.
    #[default]
    Both,
}

fn unfiltered_node(n: &NodeData) -> bool {
    n.tags.contains(Tag::Unfiltered)
}

fn unfiltered_edge(e: &EdgeData) -> bool {
    e.tags.contains(Tag::Unfiltered)
}

/// Sort key for the star relayout: the sum of the character codes of a
/// predicate label. Semantically arbitrary but deterministic; kept for
/// output compatibility with existing layouts.
fn label_weight(pl: &str) -> u64 {
    pl.chars().map(|c| c as u64).sum()
}

impl VisibilityEngine {
    /// Shows all nodes and edges on a shortest path between `source` and
    /// `target` and hides all others except when in star mode. With
    /// `include_star_path`, edges directly connected to path nodes and
    /// their endpoints are shown as well.
    /// Returns whether a path could be found.
    pub fn show_path(
        &mut self,
        source: Option<NodeIndex>,
        target: NodeIndex,
        include_star_path: bool,
    ) -> bool {
        let Some(source) = source else {
            error!("No path source.");
            return false;
        };
        if source == target {
            let id = self
                .graph()
                .node(source)
                .map(|n| n.id.clone())
                .unwrap_or_default();
            warn!("Path source {id} equals target.");
            return false;
        }
        let found = self
            .graph()
            .shortest_path(source, target, unfiltered_node, unfiltered_edge);
        let Some(path) = found else {
            if !self.star_mode() {
                // keep the graph as it was before the path operation
                self.reset_style();
            }
            warn!("No path found!");
            return false;
        };

        self.graph_mut().begin_batch();
        let mut shown = path.to_element_set();
        if include_star_path {
            let edges = self.graph().connected_edges(&shown, unfiltered_edge);
            shown.merge(&edges);
            shown.merge(&self.graph().endpoints_of(&edges, |_, n| unfiltered_node(n)));
        }
        self.star_style(&shown);
        if self.star_mode() {
            // the path might otherwise not be seen if it lies fully inside
            // an existing star
            self.graph_mut().select(&shown);
        } else {
            self.set_star_mode(true);
            let rest = self
                .graph()
                .elements_with(Tag::Unfiltered)
                .difference(&shown);
            self.set_visible(&rest, false);
        }
        self.graph_mut().end_batch();
        true
    }

    /// `show_path` with the source taken from [`VisibilityEngine::get_source`].
    pub fn show_path_to(&mut self, target: NodeIndex, include_star_path: bool) -> bool {
        let source = self.get_source();
        self.show_path(source, target, include_star_path)
    }

    /// Highlights the given nodes and all their direct neighbors and hides
    /// all others except when in star mode. Close matches of the center
    /// count as part of the center.
    ///
    /// With `relayout`, the center and its close matches are arranged in
    /// the middle and the connected nodes in a ring around them.
    pub fn show_star(&mut self, center: &ElementSet, relayout: bool, direction: Direction) {
        self.graph_mut().begin_batch();

        // follow the close match chain until it ends
        let mut inner = center.node_set();
        loop {
            let size = inner.node_count();
            let close_match_edges = self
                .graph()
                .connected_edges(&inner, |e| unfiltered_edge(e) && e.is_close_match());
            inner.merge(
                &self
                    .graph()
                    .endpoints_of(&close_match_edges, |_, n| unfiltered_node(n)),
            );
            if inner.node_count() == size {
                break;
            }
        }

        let edges = match direction {
            Direction::In => self.graph().edges_from_to(
                |_, n| unfiltered_node(n),
                |i, _| inner.contains_node(i),
            ),
            Direction::Out => self.graph().edges_from_to(
                |i, _| inner.contains_node(i),
                |_, n| unfiltered_node(n),
            ),
            Direction::Both => self.graph().connected_edges(&inner, unfiltered_edge),
        };
        let nodes = self
            .graph()
            .endpoints_of(&edges, |_, n| unfiltered_node(n));
        let mut star = inner.union(&nodes).union(&edges);
        star.merge(&self.graph().parents_of(&star));
        star.merge(&self.graph().children_in(&star));
        let outer = nodes.difference(&inner);

        if relayout || !self.star_mode() {
            self.set_star_mode(true);
            let rest = self.graph().all_elements().difference(&star);
            self.set_visible(&rest, false);
        }
        self.star_style(&star);

        if relayout {
            let mut sorted: Vec<NodeIndex> = nodes.nodes().collect();
            let weights: HashMap<NodeIndex, u64> = sorted
                .iter()
                .map(|&n| {
                    let weight = self
                        .graph()
                        .edges_from_to(|i, _| i == n, |i, _| inner.contains_node(i))
                        .edges()
                        .filter_map(|e| self.graph().edge(e))
                        .map(|e| label_weight(&e.pl))
                        .min()
                        .unwrap_or(u64::MAX);
                    (n, weight)
                })
                .collect();
            sorted.sort_by_key(|n| weights[n]);
            let options = ConcentricOptions::default();
            self.graph_mut().concentric_layout(&sorted, &options, |n| {
                if inner.contains_node(n) {
                    2
                } else if outer.contains_node(n) {
                    1
                } else {
                    panic!("unexpected node in star");
                }
            });
        }
        self.graph_mut().end_batch();

        // connect new nodes with all existing unfiltered visible ones
        let visible = self.graph().visible_unfiltered_nodes();
        let connecting = self.graph().edges_with(&outer, &visible);
        self.set_visible(&connecting, true);

        let visible = self.graph().visible_nodes();
        if visible.node_count() < 100 {
            self.graph_mut().fit(&visible, 100.0);
        }
    }

    /// Shows a "spider worm": a shortest path from the source to `target`
    /// combined with a star around `target`.
    /// Returns whether a path could be found.
    pub fn show_worm(&mut self, target: NodeIndex) -> bool {
        if self.show_path_to(target, false) {
            self.show_star(&ElementSet::from_node(target), false, Direction::Both);
            return true;
        }
        false
    }

    /// Shows a path from the source to `target` with stars around both
    /// endpoints.
    /// Returns whether a path could be found.
    pub fn show_double_star(&mut self, target: NodeIndex) -> bool {
        let source = self.get_source();
        if self.show_path(source, target, false) {
            self.show_star(&ElementSet::from_node(target), false, Direction::Both);
            if let Some(source) = source {
                self.show_star(&ElementSet::from_node(source), false, Direction::Both);
            }
            return true;
        }
        false
    }

    /// Shows how two subontologies are interconnected: all edges between
    /// nodes of provenance `sub_a` and nodes of provenance `sub_b`,
    /// arranged concentrically with the `sub_a` side in the middle.
    /// Returns the number of connecting edges.
    pub fn show_subontology_connectivity(&mut self, sub_a: &str, sub_b: &str) -> usize {
        let group_a = self
            .graph()
            .filter_nodes(|_, n| n.source.as_deref() == Some(sub_a));
        let group_b = self
            .graph()
            .filter_nodes(|_, n| n.source.as_deref() == Some(sub_b));
        let connections = self.graph().edges_with(&group_a, &group_b);
        let nodes = self.graph().endpoints_of(&connections, |_, _| true);

        self.graph_mut().begin_batch();
        let all = self.graph().all_elements();
        self.set_visible(&all, false);
        self.set_visible(&nodes, true);
        let between = self.graph().edges_with(&nodes, &nodes);
        self.set_visible(&between, true);

        let order: Vec<NodeIndex> = nodes.nodes().collect();
        let options = ConcentricOptions {
            min_spacing: 60.0,
            ..Default::default()
        };
        self.graph_mut().concentric_layout(&order, &options, |n| {
            if group_a.contains_node(n) {
                2
            } else {
                1
            }
        });
        self.graph_mut().end_batch();
        connections.edge_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{chain, star_graph};

    #[test]
    fn test_show_path_source_equals_target() {
        let mut engine = chain(&["a", "b", "c"]);
        let a = engine.graph().node_index("a").unwrap();
        let before = engine.graph().render_epoch();
        assert!(!engine.show_path(Some(a), a, false));
        assert_eq!(engine.graph().render_epoch(), before);
    }

    #[test]
    fn test_show_path_without_source() {
        let mut engine = chain(&["a", "b", "c"]);
        let c = engine.graph().node_index("c").unwrap();
        let before = engine.graph().render_epoch();
        assert!(!engine.show_path(None, c, false));
        assert_eq!(engine.graph().render_epoch(), before);
    }

    #[test]
    fn test_show_path_hides_the_rest() {
        // chain a─b─c─d; the path a→c leaves d off-path
        let mut engine = chain(&["a", "b", "c", "d"]);
        let a = engine.graph().node_index("a").unwrap();
        let c = engine.graph().node_index("c").unwrap();
        let d = engine.graph().node_index("d").unwrap();

        assert!(engine.show_path(Some(a), c, false));
        assert!(engine.star_mode());

        let g = engine.graph();
        let b = g.node_index("b").unwrap();
        for on_path in [a, b, c] {
            let data = g.node(on_path).unwrap();
            assert!(!data.tags.contains(Tag::Hidden));
            assert!(data.selected);
        }
        assert!(g.node(d).unwrap().tags.contains(Tag::Hidden));
        // every path edge connects two visible nodes
        for edge in ["e0", "e1"] {
            let e = g.edge_index(edge).unwrap();
            assert!(!g.edge(e).unwrap().tags.contains(Tag::Hidden));
            let (s, t) = g.edge_endpoints(e).unwrap();
            assert!(!g.node(s).unwrap().tags.contains(Tag::Hidden));
            assert!(!g.node(t).unwrap().tags.contains(Tag::Hidden));
        }
    }

    #[test]
    fn test_show_path_no_path_resets_when_not_in_star_mode() {
        let mut engine = chain(&["a", "b"]);
        let isolated = engine
            .graph_mut()
            .add_node(NodeData::new("isolated"))
            .unwrap();
        engine
            .graph_mut()
            .add_tag(&ElementSet::from_node(isolated), Tag::Unfiltered);
        let a = engine.graph().node_index("a").unwrap();
        let b = engine.graph().node_index("b").unwrap();
        engine.set_visible(&ElementSet::from_node(b), false);

        assert!(!engine.show_path(Some(a), isolated, false));
        // reset unhid everything
        assert!(!engine.graph().node(b).unwrap().tags.contains(Tag::Hidden));
        assert!(!engine.star_mode());
    }

    #[test]
    fn test_show_path_accumulates_in_star_mode() {
        let mut engine = chain(&["a", "b", "c", "d"]);
        let a = engine.graph().node_index("a").unwrap();
        let b = engine.graph().node_index("b").unwrap();
        let d = engine.graph().node_index("d").unwrap();

        assert!(engine.show_path(Some(a), b, false));
        assert!(engine.star_mode());
        let hidden_before = engine.graph().node(d).unwrap().tags.contains(Tag::Hidden);

        // second path in star mode unhides its own elements without a reset
        assert!(engine.show_path(Some(a), d, false));
        assert!(!engine.graph().node(d).unwrap().tags.contains(Tag::Hidden));
        assert!(hidden_before);
    }

    #[test]
    fn test_show_star_expands_close_matches() {
        let (mut engine, ids) = star_graph();
        let center = engine.graph().node_index(&ids.center).unwrap();
        engine.show_star(&ElementSet::from_node(center), false, Direction::Both);

        let g = engine.graph();
        // the close match sibling counts as part of the center
        let sibling = g.node_index(&ids.sibling).unwrap();
        assert!(!g.node(sibling).unwrap().tags.contains(Tag::Hidden));
        // neighbors of the sibling are part of the star
        let sibling_neighbor = g.node_index(&ids.sibling_neighbor).unwrap();
        assert!(!g.node(sibling_neighbor).unwrap().tags.contains(Tag::Hidden));
        // unrelated nodes are hidden
        let unrelated = g.node_index(&ids.unrelated).unwrap();
        assert!(g.node(unrelated).unwrap().tags.contains(Tag::Hidden));
        assert!(engine.star_mode());
    }

    #[test]
    fn test_show_star_direction_out() {
        let (mut engine, ids) = star_graph();
        let center = engine.graph().node_index(&ids.center).unwrap();
        engine.show_star(&ElementSet::from_node(center), false, Direction::Out);

        let g = engine.graph();
        // the center's incoming neighbor is not part of an OUT star
        let incoming = g.node_index(&ids.incoming).unwrap();
        assert!(g.node(incoming).unwrap().tags.contains(Tag::Hidden));
        let outgoing = g.node_index(&ids.outgoing).unwrap();
        assert!(!g.node(outgoing).unwrap().tags.contains(Tag::Hidden));
    }

    #[test]
    fn test_show_star_relayout_rings() {
        let (mut engine, ids) = star_graph();
        let center = engine.graph().node_index(&ids.center).unwrap();
        engine.show_star(&ElementSet::from_node(center), true, Direction::Both);

        let g = engine.graph();
        let sibling = g.node_index(&ids.sibling).unwrap();
        let outgoing = g.node_index(&ids.outgoing).unwrap();
        let center_pos = g.node(center).unwrap().position;
        let sibling_pos = g.node(sibling).unwrap().position;
        let outer_pos = g.node(outgoing).unwrap().position;
        let r = |p: ontoview_graph::Point| (p.x * p.x + p.y * p.y).sqrt();
        // inner ring is strictly closer to the center of the layout
        assert!(r(center_pos) < r(outer_pos));
        assert!(r(sibling_pos) < r(outer_pos));
    }

    #[test]
    fn test_show_worm_requires_path() {
        let mut engine = chain(&["a", "b", "c"]);
        let isolated = engine
            .graph_mut()
            .add_node(NodeData::new("isolated"))
            .unwrap();
        engine
            .graph_mut()
            .add_tag(&ElementSet::from_node(isolated), Tag::Unfiltered);
        assert!(engine.set_source("a"));
        assert!(!engine.show_worm(isolated));

        let c = engine.graph().node_index("c").unwrap();
        assert!(engine.show_worm(c));
        assert!(engine.star_mode());
    }

    #[test]
    fn test_show_double_star_stars_both_endpoints() {
        let mut engine = chain(&["a", "b", "c", "d", "e"]);
        assert!(engine.set_source("b"));
        let d = engine.graph().node_index("d").unwrap();
        assert!(engine.show_double_star(d));

        let g = engine.graph();
        // a neighbors the source, e neighbors the target; both are starred
        for id in ["a", "e"] {
            let n = g.node_index(id).unwrap();
            assert!(!g.node(n).unwrap().tags.contains(Tag::Hidden));
        }
    }

    #[test]
    fn test_scenario_path_a_to_c() {
        // the canonical A─B─C scenario
        let mut engine = chain(&["A", "B", "C"]);
        let a = engine.graph().node_index("A").unwrap();
        let c = engine.graph().node_index("C").unwrap();

        assert!(engine.show_path(Some(a), c, false));
        assert!(engine.star_mode());
        let g = engine.graph();
        for id in ["A", "B", "C"] {
            let n = g.node_index(id).unwrap();
            assert!(!g.node(n).unwrap().tags.contains(Tag::Hidden));
            assert!(g.node(n).unwrap().selected);
        }
        for id in ["e0", "e1"] {
            let e = g.edge_index(id).unwrap();
            assert!(!g.edge(e).unwrap().tags.contains(Tag::Hidden));
            assert!(g.edge(e).unwrap().selected);
        }
    }

    #[test]
    fn test_subontology_connectivity() {
        let (mut engine, ids) = star_graph();
        // center has source "bb", outgoing has source "ob"
        let shown = engine.show_subontology_connectivity("bb", "ob");
        assert!(shown > 0);
        let g = engine.graph();
        let unrelated = g.node_index(&ids.unrelated).unwrap();
        assert!(g.node(unrelated).unwrap().tags.contains(Tag::Hidden));
    }
}
