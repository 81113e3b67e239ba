//! The serialized graph format.
//!
//! Documents follow the host graph JSON shape the original viewer exchanges:
//! `elements.nodes[]` / `elements.edges[]` with a `data` payload, a
//! `classes` string and a `selected` flag per element, plus zoom and pan.
//! Style is never part of a document; it is reapplied from static
//! configuration after load.

use crate::collection::ElementSet;
use crate::edge::EdgeData;
use crate::error::GraphError;
use crate::graph::OntoGraph;
use crate::node::{NodeData, Point};
use crate::tags::TagSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One serialized graph, style stripped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphJson {
    pub elements: ElementsJson,
    #[serde(default = "default_zoom")]
    pub zoom: f64,
    #[serde(default)]
    pub pan: Point,
}

fn default_zoom() -> f64 {
    1.0
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementsJson {
    #[serde(default)]
    pub nodes: Vec<NodeJson>,
    #[serde(default)]
    pub edges: Vec<EdgeJson>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeJson {
    pub data: NodeDataJson,
    #[serde(default)]
    pub position: Point,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub classes: String,
    #[serde(default)]
    pub selected: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeDataJson {
    pub id: String,
    /// Label strings per language tag.
    #[serde(default, rename = "l", skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeJson {
    pub data: EdgeDataJson,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub classes: String,
    #[serde(default)]
    pub selected: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeDataJson {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub pl: String,
}

impl GraphJson {
    /// Serializes a graph, including tags, selection, compound membership
    /// and positions.
    pub fn from_graph(graph: &OntoGraph) -> GraphJson {
        let mut nodes = Vec::with_capacity(graph.node_count());
        for index in graph.node_indices() {
            let node = graph.node(index).expect("node index");
            let parent = graph
                .parent_of(index)
                .and_then(|p| graph.node(p))
                .map(|p| p.id.clone());
            nodes.push(NodeJson {
                data: NodeDataJson {
                    id: node.id.clone(),
                    labels: node.labels.clone(),
                    source: node.source.clone(),
                    parent,
                },
                position: node.position,
                classes: node.tags.to_classes(),
                selected: node.selected,
            });
        }
        let mut edges = Vec::with_capacity(graph.edge_count());
        for index in graph.edge_indices() {
            let edge = graph.edge(index).expect("edge index");
            let (s, t) = graph.edge_endpoints(index).expect("edge endpoints");
            edges.push(EdgeJson {
                data: EdgeDataJson {
                    id: edge.id.clone(),
                    source: graph.node(s).expect("edge source").id.clone(),
                    target: graph.node(t).expect("edge target").id.clone(),
                    pl: edge.pl.clone(),
                },
                classes: edge.tags.to_classes(),
                selected: edge.selected,
            });
        }
        GraphJson {
            elements: ElementsJson { nodes, edges },
            zoom: graph.viewport().zoom,
            pan: graph.viewport().pan,
        }
    }

    /// Builds a graph from a document. Compound membership is resolved
    /// after all nodes exist so parents may appear anywhere in the list.
    pub fn to_graph(&self) -> Result<OntoGraph, GraphError> {
        let mut graph = OntoGraph::new();
        for node in &self.elements.nodes {
            let mut data = NodeData::new(node.data.id.clone());
            data.labels = node.data.labels.clone();
            data.source = node.data.source.clone();
            data.position = node.position;
            data.tags = TagSet::from_classes(&node.classes);
            data.selected = node.selected;
            graph.add_node(data)?;
        }
        for node in &self.elements.nodes {
            let Some(parent_id) = &node.data.parent else {
                continue;
            };
            let child = graph.node_index(&node.data.id).expect("inserted node");
            let parent =
                graph
                    .node_index(parent_id)
                    .ok_or_else(|| GraphError::UnknownParent {
                        child: node.data.id.clone(),
                        parent: parent_id.clone(),
                    })?;
            graph.set_parent(child, Some(parent));
        }
        for edge in &self.elements.edges {
            let source =
                graph
                    .node_index(&edge.data.source)
                    .ok_or_else(|| GraphError::UnknownEndpoint {
                        edge: edge.data.id.clone(),
                        node: edge.data.source.clone(),
                    })?;
            let target =
                graph
                    .node_index(&edge.data.target)
                    .ok_or_else(|| GraphError::UnknownEndpoint {
                        edge: edge.data.id.clone(),
                        node: edge.data.target.clone(),
                    })?;
            let mut data = EdgeData::new(edge.data.id.clone(), edge.data.pl.clone());
            data.tags = TagSet::from_classes(&edge.classes);
            data.selected = edge.selected;
            graph.add_edge(source, target, data)?;
        }
        graph.viewport_mut().set_zoom(self.zoom);
        graph.viewport_mut().pan = self.pan;
        Ok(graph)
    }
}

impl OntoGraph {
    /// All elements selected in the document sense; convenience for tests
    /// and assimilation by id.
    pub fn elements_by_ids<'a, I: IntoIterator<Item = &'a str>>(&self, ids: I) -> ElementSet {
        let mut set = ElementSet::new();
        for id in ids {
            if let Some(n) = self.node_index(id) {
                set.insert_node(n);
            } else if let Some(e) = self.edge_index(id) {
                set.insert_edge(e);
            }
        }
        set
    }
}
