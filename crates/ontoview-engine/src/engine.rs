//! The visibility engine.
//!
//! One engine exclusively owns one graph and maintains its classification:
//! what is hidden, what is highlighted, whether the current hiding stems
//! from a star/path operation (star mode) and which close-match clusters
//! are combined. Operations never throw for user-level failures; they log
//! and return `false`.

use ontoview_graph::{ElementSet, NodeIndex, OntoGraph, Tag};
use tracing::{debug, error, info, warn};

/// Maintains the hidden/visible/highlighted classification of one graph.
#[derive(Debug, Default)]
pub struct VisibilityEngine {
    graph: OntoGraph,

    /// Last node selected by the user, held by id so external removal
    /// cannot dangle.
    selected_node: Option<String>,

    /// Explicit source for path operations; overrides the selection.
    path_source: Option<String>,

    /// True iff elements are hidden because of a star/path operation.
    star_mode: bool,

    /// Close-match clusters, recomputed when match combining is enabled.
    match_components: Vec<ElementSet>,

    /// Whether search results accumulate instead of resetting the style.
    cumulative_search: bool,

    /// The large-graph advisory for match combining fires once per session.
    pub(crate) match_advisory_shown: bool,
}

impl VisibilityEngine {
    /// Creates an engine owning the given graph.
    pub fn new(graph: OntoGraph) -> Self {
        Self {
            graph,
            ..Self::default()
        }
    }

    pub fn graph(&self) -> &OntoGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut OntoGraph {
        &mut self.graph
    }

    pub fn star_mode(&self) -> bool {
        self.star_mode
    }

    /// Overrides the star mode flag; used when restoring a saved view,
    /// where hiding has to be inferred from the document.
    pub fn set_star_mode(&mut self, on: bool) {
        self.star_mode = on;
    }

    pub fn match_components(&self) -> &[ElementSet] {
        &self.match_components
    }

    pub(crate) fn match_components_mut(&mut self) -> &mut Vec<ElementSet> {
        &mut self.match_components
    }

    pub fn cumulative_search(&self) -> bool {
        self.cumulative_search
    }

    pub fn set_cumulative_search(&mut self, on: bool) {
        self.cumulative_search = on;
    }

    /// Records the last user-selected node and selects it in the graph.
    pub fn select_node(&mut self, node: NodeIndex) {
        if let Some(data) = self.graph.node(node) {
            self.selected_node = Some(data.id.clone());
        }
        self.graph.select(&ElementSet::from_node(node));
    }

    /// The last user-selected node, if it still exists.
    pub fn selected_node(&self) -> Option<NodeIndex> {
        self.selected_node
            .as_deref()
            .and_then(|id| self.graph.node_index(id))
    }

    // ── visibility primitives ──────────────────────────────────────────

    /// Shows or hides the given elements. Hiding also hides and
    /// unhighlights all edges touching the hidden nodes, because edges lag
    /// visually until the next refresh. Not meant for filters, which use
    /// their own tags.
    pub fn set_visible(&mut self, elements: &ElementSet, visible: bool) {
        if visible {
            self.graph.remove_tag(elements, Tag::Hidden);
        } else {
            self.graph.add_tag(elements, Tag::Hidden);
            self.graph.remove_tag(elements, Tag::Highlighted);
            let edges = self.graph.connected_edges(elements, |_| true);
            self.graph.add_tag(&edges, Tag::Hidden);
            self.graph.remove_tag(&edges, Tag::Highlighted);
        }
    }

    /// Unhides and selects the elements; terminal marking for the output
    /// of a star or path computation.
    pub fn star_style(&mut self, elements: &ElementSet) {
        self.graph.remove_tag(elements, Tag::Hidden);
        self.graph.select(elements);
    }

    /// Removes all highlighting (except the selection) and shows all
    /// hidden elements. Leaves the path source alone.
    pub fn reset_style(&mut self) {
        self.star_mode = false;
        self.match_components.clear();
        self.graph.begin_batch();
        self.graph.remove_tag_all(Tag::Highlighted);
        self.graph.remove_tag_all(Tag::Starmode);
        self.graph.remove_tag_all(Tag::Hidden);
        self.graph.end_batch();
    }

    // ── path source ────────────────────────────────────────────────────

    /// The start node for path operations: the explicit source if it still
    /// resolves, else the last selected node, else none.
    pub fn get_source(&self) -> Option<NodeIndex> {
        if let Some(source) = self
            .path_source
            .as_deref()
            .and_then(|id| self.graph.node_index(id))
        {
            return Some(source);
        }
        if let Some(selected) = self.selected_node() {
            debug!("Path source not set, using selected node");
            return Some(selected);
        }
        None
    }

    /// Sets the node as source for all path operations. Setting the
    /// current source again toggles it off; that is the only way to remove
    /// it.
    pub fn set_source(&mut self, id: &str) -> bool {
        debug!("Setting path source to {id}");
        let Some(node) = self.graph.node_index(id) else {
            error!("Invalid path source: {id} is not in the graph.");
            return false;
        };
        if let Some(old) = self
            .path_source
            .as_deref()
            .and_then(|old| self.graph.node_index(old))
        {
            self.graph.remove_tag(&ElementSet::from_node(old), Tag::Source);
            if old == node {
                info!("Toggling path source off.");
                self.path_source = None;
                return true;
            }
        }
        self.path_source = Some(id.to_string());
        self.graph.add_tag(&ElementSet::from_node(node), Tag::Source);
        true
    }

    // ── presenting ─────────────────────────────────────────────────────

    /// Centers and highlights the node with the given identifier.
    pub fn present_uri(&mut self, uri: &str) -> bool {
        let Some(node) = self.graph.node_index(uri) else {
            warn!("Node not in graph. {uri} may be available on the SPARQL endpoint but not in the graph.");
            return false;
        };
        let data = self.graph.node(node).expect("resolved node");
        if data.tags.contains(Tag::Filtered) {
            warn!("Node is filtered out. {uri} is not visible. Please adjust filters.");
            return false;
        }
        if data.tags.contains(Tag::Hidden) {
            debug!("Node is hidden. Unhiding {uri}.");
            let single = ElementSet::from_node(node);
            self.set_visible(&single, true);
            let edges = self.graph.edges_with(&single, &self.graph.visible_nodes());
            self.set_visible(&edges, true);
        }
        if !(self.star_mode || self.cumulative_search) {
            self.reset_style();
        }
        self.graph.unselect_all();
        self.select_node(node);
        self.graph.viewport_mut().set_zoom(0.6);
        self.graph.center(node);
        true
    }

    /// Centers and highlights the nodes with the given identifiers,
    /// optionally hiding everything else.
    pub fn present_uris(&mut self, uris: &[String], hide_others: bool) -> bool {
        if uris.is_empty() {
            warn!("All search results are only available on the SPARQL endpoint but not in the graph.");
            return false;
        }
        if !self.cumulative_search {
            self.reset_style();
        }
        let matches = self
            .graph
            .elements_by_ids(uris.iter().map(|u| u.as_str()))
            .node_set();
        let induced = self.graph.edges_from_to(
            |n, _| matches.contains_node(n),
            |n, _| matches.contains_node(n),
        );
        if hide_others {
            let all = self.graph.all_elements();
            self.set_visible(&all, false);
            self.set_visible(&matches.union(&induced), true);
            self.star_mode = true;
        }
        self.graph.unselect_all();
        self.graph.select(&matches.union(&induced));
        let selection = self.graph.selected_elements();
        self.graph.fit(&selection, 50.0);
        true
    }

    /// Shows the close matches of the given nodes: one unfiltered
    /// close-match hop, plus those edges. Star mode is untouched.
    pub fn show_close_match(&mut self, nodes: &ElementSet) {
        let edges = self
            .graph
            .connected_edges(nodes, |e| e.tags.contains(Tag::Unfiltered) && e.is_close_match());
        let matches = self
            .graph
            .endpoints_of(&edges, |_, n| n.tags.contains(Tag::Unfiltered));
        debug!(
            "Showing close matches of {} nodes, {} results.",
            nodes.node_count(),
            matches.node_count()
        );
        let eles = matches.union(&edges);
        self.set_visible(&eles, true);
        self.star_style(&eles);
    }
}
