//! Ontoview Graph - Element store and wayfinding primitives
//!
//! This crate holds the graph of ontology classes and relations that the
//! visibility engine operates on. It provides the capabilities the engine
//! composes its operations from, without any rendering:
//!
//! # Architecture
//!
//! The store uses petgraph internally (a stable graph, so indices survive
//! the insertion and removal of synthetic match parents) with additional
//! structure for:
//! - Id-based lookups for nodes and edges
//! - Classification tags (`unfiltered`, `hidden`, `highlighted`, ...)
//! - Set algebra over mixed node/edge collections
//! - Restricted shortest-path search and connected components
//! - Compound (parent/child) grouping
//! - Batched mutation scoping via a render epoch
//! - The style-free JSON wire format and a label search index
//!
//! # Example
//!
//! ```
//! use ontoview_graph::{EdgeData, NodeData, OntoGraph, Tag};
//!
//! let mut graph = OntoGraph::new();
//! let a = graph.add_node(NodeData::new("http://example.org/a")).unwrap();
//! let b = graph.add_node(NodeData::new("http://example.org/b")).unwrap();
//! graph.add_edge(a, b, EdgeData::new("e0", "subClassOf")).unwrap();
//! graph.add_tag_all(Tag::Unfiltered);
//!
//! let path = graph.shortest_path(
//!     a,
//!     b,
//!     |n| n.tags.contains(Tag::Unfiltered),
//!     |e| e.tags.contains(Tag::Unfiltered),
//! );
//! assert_eq!(path.unwrap().hops(), 1);
//! ```

mod collection;
mod edge;
mod error;
mod graph;
mod json;
mod layout;
mod node;
mod path;
mod search;
mod tags;

pub use collection::ElementSet;
pub use edge::{EdgeData, CLOSE_MATCH};
pub use error::GraphError;
pub use graph::OntoGraph;
pub use json::{EdgeDataJson, EdgeJson, ElementsJson, GraphJson, NodeDataJson, NodeJson};
pub use layout::{ConcentricOptions, Viewport, MAX_ZOOM, MIN_ZOOM};
pub use node::{NodeData, Point};
pub use path::Path;
pub use search::LabelIndex;
pub use tags::{Tag, TagSet};

pub use petgraph::stable_graph::{EdgeIndex, NodeIndex};
