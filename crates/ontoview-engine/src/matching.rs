//! Close-match clustering.
//!
//! Close matches denote near-equivalent classes from different
//! subontologies. Combining groups each connected component of the
//! close-match relation under a synthetic compound parent whose label is
//! the union of the member labels; members are ordered by a fixed
//! provenance priority so the display order is deterministic.

use crate::engine::VisibilityEngine;
use ontoview_graph::{ElementSet, NodeData, NodeIndex, Tag};
use tracing::info;

/// Subontology display priority for combined matches. Unknown provenances
/// sort last.
const SOURCE_PRIORITIES: [&str; 5] = ["bb", "ob", "he", "it4it", "ciox"];

fn source_priority(source: Option<&str>) -> usize {
    source
        .and_then(|s| SOURCE_PRIORITIES.iter().position(|p| *p == s))
        .unwrap_or(99)
}

impl VisibilityEngine {
    /// Sets whether close matches are grouped in compound nodes.
    ///
    /// Enabling partitions the close-match subgraph of the unfiltered
    /// visible elements into connected components and creates a synthetic
    /// parent for every component with more than one node. Disabling
    /// removes the parents again and restores the previous structure.
    pub fn combine_match(&mut self, enabled: bool) {
        if !enabled {
            self.graph_mut().begin_batch();
            self.clear_match_grouping();
            self.graph_mut().end_batch();
            return;
        }

        self.graph_mut().begin_batch();
        // re-enabling recomputes from scratch
        self.clear_match_grouping();
        let match_edges = {
            let graph = self.graph();
            let mut set = ElementSet::new();
            for e in graph.edge_indices() {
                let edge = graph.edge(e).expect("edge index");
                if edge.is_close_match()
                    && edge.tags.contains(Tag::Unfiltered)
                    && !edge.tags.contains(Tag::Hidden)
                {
                    set.insert_edge(e);
                }
            }
            set
        };
        let match_graph = self
            .graph()
            .visible_unfiltered_nodes()
            .union(&match_edges);

        if !self.match_advisory_shown && self.graph().visible_nodes().node_count() > 1000 {
            info!("Combining matches. Consider moving matches nearby or on top of each other instead.");
            self.match_advisory_shown = true;
        }

        let components = self.graph().components(&match_graph);
        self.match_components_mut().clear();
        self.match_components_mut().extend(components.iter().cloned());

        for (i, component) in components.iter().enumerate() {
            if component.node_count() == 1 {
                continue;
            }
            let id = format!("parent{i}");

            // union the member labels per language, preserving first-seen order
            let mut parent_data = NodeData::new(id);
            for member in component.nodes() {
                let member_labels = self.graph().node(member).expect("member").labels.clone();
                for (language, labels) in member_labels {
                    let entry = parent_data.labels.entry(language).or_default();
                    for label in labels {
                        if !entry.contains(&label) {
                            entry.push(label);
                        }
                    }
                }
            }
            for labels in parent_data.labels.values_mut() {
                *labels = vec![labels.join(", ")];
            }

            let mut members: Vec<NodeIndex> = component.nodes().collect();
            members.sort_by_key(|&m| {
                source_priority(self.graph().node(m).expect("member").source.as_deref())
            });

            let parent = self
                .graph_mut()
                .add_node(parent_data)
                .expect("synthetic parent id is unique");
            for member in members {
                self.graph_mut().set_parent(member, Some(parent));
            }
        }
        self.graph_mut().end_batch();
    }

    /// Un-parents all grouped nodes, deletes the synthetic parents and
    /// clears the component bookkeeping.
    fn clear_match_grouping(&mut self) {
        let children: Vec<NodeIndex> = self.graph().child_nodes().nodes().collect();
        for child in children {
            self.graph_mut().set_parent(child, None);
        }
        let parents: Vec<NodeIndex> = self
            .graph()
            .filter_nodes(|_, n| n.id.starts_with("parent"))
            .nodes()
            .collect();
        for parent in parents {
            self.graph_mut().remove_node(parent);
        }
        self.match_components_mut().clear();
    }

    /// Moves the members of every combined match component together, in a
    /// circle of the given radius around the first member.
    pub fn move_all_matches(&mut self, distance: f64) {
        let components: Vec<Vec<NodeIndex>> = self
            .match_components()
            .iter()
            .filter(|c| c.node_count() > 1)
            .map(|c| c.nodes().collect())
            .collect();
        for members in components {
            self.graph_mut().move_nodes_circle(&members, distance);
        }
    }
}
