//! The selection multiplexer.
//!
//! Multiplexing replays a single-node operation over a batch of nodes: an
//! explicit collection if one is given, else the current multi-selection,
//! else the single passed-in node. This lets any single-target operation
//! (a star, a path) act on a whole selection without the caller changing.

use crate::engine::VisibilityEngine;
use crate::wayfinding::Direction;
use ontoview_graph::{ElementSet, NodeIndex};
use tracing::debug;

/// One invocation target handed to a multiplexed operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MultiplexCall {
    /// The operation runs for a single node; `None` when multiplexing was
    /// invoked without any input at all.
    Single(Option<NodeIndex>),
    /// The operation runs once for the whole batch.
    Batch(Vec<NodeIndex>),
}

impl MultiplexCall {
    /// The target as a node set; empty for `Single(None)`.
    pub fn to_element_set(&self) -> ElementSet {
        match self {
            MultiplexCall::Single(None) => ElementSet::new(),
            MultiplexCall::Single(Some(node)) => ElementSet::from_node(*node),
            MultiplexCall::Batch(nodes) => ElementSet::from_nodes(nodes.iter().copied()),
        }
    }
}

impl VisibilityEngine {
    /// Replays `f` over a batch of nodes.
    ///
    /// The batch is the explicit `nodes` argument if given, else the
    /// current selection if more than one node is selected. Without a
    /// batch, `f` runs exactly once with `ele` directly. A defined batch
    /// always includes `ele` as well. With `direct`, `f` runs once with
    /// the whole batch instead of once per element.
    pub fn multiplex<F>(
        &mut self,
        nodes: Option<&[NodeIndex]>,
        direct: bool,
        ele: Option<NodeIndex>,
        mut f: F,
    ) where
        F: FnMut(&mut Self, MultiplexCall),
    {
        let mut collection: Option<Vec<NodeIndex>> = nodes.map(|n| n.to_vec());
        if collection.is_none() {
            let selected: Vec<NodeIndex> = self.graph().selected_nodes().nodes().collect();
            if selected.len() > 1 {
                collection = Some(selected);
            }
        }
        match collection {
            Some(mut collection) => {
                if let Some(ele) = ele {
                    if !collection.contains(&ele) {
                        collection.push(ele);
                    }
                }
                debug!(
                    "multiplexing of {} elements (direct={direct})",
                    collection.len()
                );
                if direct {
                    f(self, MultiplexCall::Batch(collection));
                } else {
                    for node in collection {
                        f(self, MultiplexCall::Single(Some(node)));
                    }
                }
            }
            None => f(self, MultiplexCall::Single(ele)),
        }
    }

    /// A star around every node of the batch at once.
    pub fn show_star_multiplexed(
        &mut self,
        relayout: bool,
        direction: Direction,
        ele: Option<NodeIndex>,
    ) {
        self.multiplex(None, true, ele, |engine, call| {
            engine.show_star(&call.to_element_set(), relayout, direction);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::chain;
    use ontoview_graph::Tag;

    fn nodes_of(engine: &VisibilityEngine, ids: &[&str]) -> Vec<NodeIndex> {
        ids.iter()
            .map(|id| engine.graph().node_index(id).unwrap())
            .collect()
    }

    #[test]
    fn test_explicit_nodes_call_per_element() {
        let mut engine = chain(&["a", "b", "c", "x"]);
        let abc = nodes_of(&engine, &["a", "b", "c"]);
        let extra = engine.graph().node_index("x").unwrap();

        let mut calls = Vec::new();
        engine.multiplex(Some(abc.as_slice()), false, Some(extra), |_, call| {
            calls.push(call);
        });

        assert_eq!(calls.len(), 4);
        for call in &calls {
            assert!(matches!(call, MultiplexCall::Single(Some(_))));
        }
        let targets: Vec<NodeIndex> = calls
            .iter()
            .map(|c| match c {
                MultiplexCall::Single(Some(n)) => *n,
                _ => unreachable!(),
            })
            .collect();
        let mut expected = abc.clone();
        expected.push(extra);
        assert_eq!(targets, expected);
    }

    #[test]
    fn test_explicit_nodes_direct_single_call() {
        let mut engine = chain(&["a", "b", "c", "x"]);
        let abc = nodes_of(&engine, &["a", "b", "c"]);
        let extra = engine.graph().node_index("x").unwrap();

        let mut calls = Vec::new();
        engine.multiplex(Some(abc.as_slice()), true, Some(extra), |_, call| {
            calls.push(call);
        });

        assert_eq!(calls.len(), 1);
        let MultiplexCall::Batch(batch) = &calls[0] else {
            panic!("expected a batch call");
        };
        let mut expected = abc.clone();
        expected.push(extra);
        assert_eq!(batch, &expected);
    }

    #[test]
    fn test_no_collection_passes_input_through() {
        let mut engine = chain(&["a", "b"]);
        let extra = engine.graph().node_index("a").unwrap();

        let mut calls = Vec::new();
        engine.multiplex(None, false, Some(extra), |_, call| {
            calls.push(call);
        });

        assert_eq!(calls, vec![MultiplexCall::Single(Some(extra))]);
    }

    #[test]
    fn test_single_selection_does_not_multiplex() {
        let mut engine = chain(&["a", "b", "c"]);
        let a = engine.graph().node_index("a").unwrap();
        let c = engine.graph().node_index("c").unwrap();
        engine.select_node(a);

        let mut calls = Vec::new();
        engine.multiplex(None, false, Some(c), |_, call| {
            calls.push(call);
        });

        assert_eq!(calls, vec![MultiplexCall::Single(Some(c))]);
    }

    #[test]
    fn test_multi_selection_is_used() {
        let mut engine = chain(&["a", "b", "c"]);
        let a = engine.graph().node_index("a").unwrap();
        let b = engine.graph().node_index("b").unwrap();
        engine.select_node(a);
        engine.select_node(b);

        let mut calls = Vec::new();
        engine.multiplex(None, false, None, |_, call| {
            calls.push(call);
        });

        assert_eq!(calls.len(), 2);
    }

    #[test]
    fn test_batch_deduplicates_extra() {
        let mut engine = chain(&["a", "b"]);
        let a = engine.graph().node_index("a").unwrap();
        let b = engine.graph().node_index("b").unwrap();

        let mut calls = Vec::new();
        engine.multiplex(Some([a, b].as_slice()), true, Some(a), |_, call| {
            calls.push(call);
        });

        let MultiplexCall::Batch(batch) = &calls[0] else {
            panic!("expected a batch call");
        };
        assert_eq!(batch, &vec![a, b]);
    }

    #[test]
    fn test_multiplexed_star_covers_all_centers() {
        let mut engine = chain(&["a", "b", "c", "d", "e"]);
        let a = engine.graph().node_index("a").unwrap();
        let d = engine.graph().node_index("d").unwrap();

        engine.multiplex(Some([a, d].as_slice()), false, None, |engine, call| {
            engine.show_star(&call.to_element_set(), false, Direction::Both);
        });

        let g = engine.graph();
        // both stars are visible at once: b neighbors a, c and e neighbor d
        for id in ["a", "b", "c", "d", "e"] {
            let n = g.node_index(id).unwrap();
            assert!(!g.node(n).unwrap().tags.contains(Tag::Hidden), "{id}");
        }
    }
}
