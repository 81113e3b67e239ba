//! Ontoview Engine - Wayfinding and highlighting
//!
//! The visibility engine maintains the hidden/visible/highlighted
//! classification of every element in one graph and exposes the wayfinding
//! operations of the viewer: shortest paths, stars, worms, double stars,
//! close-match combining and URI presentation, plus the selection
//! multiplexer that replays single-node operations over a batch.
//!
//! User-level failures (no path source, unknown URI, empty input) are
//! logged and reported as booleans, never as errors; see the operation
//! docs.
//!
//! # Example
//!
//! ```
//! use ontoview_engine::VisibilityEngine;
//! use ontoview_graph::{EdgeData, NodeData, OntoGraph, Tag};
//!
//! let mut graph = OntoGraph::new();
//! let a = graph.add_node(NodeData::new("a")).unwrap();
//! let b = graph.add_node(NodeData::new("b")).unwrap();
//! let c = graph.add_node(NodeData::new("c")).unwrap();
//! graph.add_edge(a, b, EdgeData::new("e0", "subClassOf")).unwrap();
//! graph.add_edge(b, c, EdgeData::new("e1", "subClassOf")).unwrap();
//! graph.add_tag_all(Tag::Unfiltered);
//!
//! let mut engine = VisibilityEngine::new(graph);
//! assert!(engine.show_path(Some(a), c, false));
//! assert!(engine.star_mode());
//! ```

mod engine;
mod matching;
mod multiplex;
mod wayfinding;

#[cfg(test)]
pub(crate) mod testutil;

pub use engine::VisibilityEngine;
pub use multiplex::MultiplexCall;
pub use wayfinding::Direction;
