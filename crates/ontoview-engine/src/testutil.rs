//! Shared graph fixtures for engine tests.

use crate::engine::VisibilityEngine;
use ontoview_graph::{EdgeData, NodeData, OntoGraph, Tag, TagSet, CLOSE_MATCH};

/// A linear chain of nodes with edges `e0`, `e1`, ... between consecutive
/// ids, everything tagged unfiltered.
pub fn chain(ids: &[&str]) -> VisibilityEngine {
    let mut graph = OntoGraph::new();
    let indices: Vec<_> = ids
        .iter()
        .map(|id| graph.add_node(NodeData::new(*id)).unwrap())
        .collect();
    for (i, pair) in indices.windows(2).enumerate() {
        graph
            .add_edge(pair[0], pair[1], EdgeData::new(format!("e{i}"), "subClassOf"))
            .unwrap();
    }
    graph.add_tag_all(Tag::Unfiltered);
    VisibilityEngine::new(graph)
}

/// Two close-matched nodes `a` (ob) and `b` (bb) plus an unmatched `lone`
/// node, everything unfiltered.
pub fn close_match_chain() -> VisibilityEngine {
    let mut graph = OntoGraph::new();
    let a = graph
        .add_node(NodeData::new("a").with_label("en", "label a").with_source("ob"))
        .unwrap();
    let b = graph
        .add_node(NodeData::new("b").with_label("en", "label b").with_source("bb"))
        .unwrap();
    graph.add_node(NodeData::new("lone")).unwrap();
    graph
        .add_edge(a, b, EdgeData::new("cm0", CLOSE_MATCH))
        .unwrap();
    graph.add_tag_all(Tag::Unfiltered);
    VisibilityEngine::new(graph)
}

/// Two close-matched nodes, used by `show_close_match` tests.
pub fn close_match_pair() -> VisibilityEngine {
    let mut graph = OntoGraph::new();
    let a = graph.add_node(NodeData::new("a")).unwrap();
    let b = graph.add_node(NodeData::new("b")).unwrap();
    graph
        .add_edge(a, b, EdgeData::new("cm0", CLOSE_MATCH))
        .unwrap();
    graph.add_tag_all(Tag::Unfiltered);
    VisibilityEngine::new(graph)
}

/// Identifiers of the star fixture nodes.
pub struct StarIds {
    pub center: String,
    pub sibling: String,
    pub sibling_neighbor: String,
    pub incoming: String,
    pub outgoing: String,
    pub unrelated: String,
}

/// A star fixture:
///
/// ```text
/// unrelated → incoming → center ↔ sibling → sibling_neighbor
///                        center → outgoing
/// ```
///
/// center↔sibling is a close match; center has source `bb`, outgoing has
/// source `ob`. Everything is unfiltered.
pub fn star_graph() -> (VisibilityEngine, StarIds) {
    let mut graph = OntoGraph::new();
    let center = graph
        .add_node(NodeData::new("center").with_source("bb"))
        .unwrap();
    let sibling = graph.add_node(NodeData::new("sibling")).unwrap();
    let sibling_neighbor = graph.add_node(NodeData::new("sibling_neighbor")).unwrap();
    let incoming = graph.add_node(NodeData::new("incoming")).unwrap();
    let outgoing = graph
        .add_node(NodeData::new("outgoing").with_source("ob"))
        .unwrap();
    let unrelated = graph.add_node(NodeData::new("unrelated")).unwrap();

    graph
        .add_edge(center, sibling, EdgeData::new("cm0", CLOSE_MATCH))
        .unwrap();
    graph
        .add_edge(sibling, sibling_neighbor, EdgeData::new("e0", "subClassOf"))
        .unwrap();
    graph
        .add_edge(incoming, center, EdgeData::new("e1", "uses"))
        .unwrap();
    graph
        .add_edge(center, outgoing, EdgeData::new("e2", "uses"))
        .unwrap();
    graph
        .add_edge(unrelated, incoming, EdgeData::new("e3", "uses"))
        .unwrap();
    graph.add_tag_all(Tag::Unfiltered);

    let ids = StarIds {
        center: "center".into(),
        sibling: "sibling".into(),
        sibling_neighbor: "sibling_neighbor".into(),
        incoming: "incoming".into(),
        outgoing: "outgoing".into(),
        unrelated: "unrelated".into(),
    };
    (VisibilityEngine::new(graph), ids)
}

/// A deterministic snapshot of all element tags and selection flags.
pub fn tags_of(graph: &OntoGraph) -> Vec<(String, TagSet, bool)> {
    let mut out = Vec::new();
    for n in graph.node_indices() {
        let data = graph.node(n).unwrap();
        out.push((data.id.clone(), data.tags, data.selected));
    }
    for e in graph.edge_indices() {
        let data = graph.edge(e).unwrap();
        out.push((data.id.clone(), data.tags, data.selected));
    }
    out
}
