//! The element store.
//!
//! `OntoGraph` wraps petgraph and adds the capabilities the visibility
//! engine needs: id lookups, tag bookkeeping, selection, set-algebra
//! traversal, compound (parent/child) grouping and batched mutation
//! scoping. A stable graph is used because match combining inserts and
//! removes synthetic parent nodes while element sets hold indices.

use crate::collection::ElementSet;
use crate::edge::EdgeData;
use crate::error::GraphError;
use crate::layout::Viewport;
use crate::node::NodeData;
use crate::tags::Tag;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use petgraph::visit::{EdgeRef, IntoEdgeReferences};
use petgraph::Direction;
use std::collections::HashMap;

/// The ontology graph of one view.
#[derive(Debug, Default, Clone)]
pub struct OntoGraph {
    /// The underlying petgraph graph.
    graph: StableDiGraph<NodeData, EdgeData>,

    /// Maps node ids to graph indices.
    id_index: HashMap<String, NodeIndex>,

    /// Maps edge ids to graph indices.
    edge_id_index: HashMap<String, EdgeIndex>,

    /// Compound membership: child to parent.
    parent: HashMap<NodeIndex, NodeIndex>,

    /// Compound membership: parent to children, in display order.
    children: HashMap<NodeIndex, Vec<NodeIndex>>,

    /// Zoom and pan state.
    viewport: Viewport,

    batch_depth: u32,
    batch_dirty: bool,
    render_epoch: u64,
}

impl OntoGraph {
    /// Creates a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn inner(&self) -> &StableDiGraph<NodeData, EdgeData> {
        &self.graph
    }

    // ── construction ───────────────────────────────────────────────────

    /// Adds a node. Fails on a duplicate id.
    pub fn add_node(&mut self, node: NodeData) -> Result<NodeIndex, GraphError> {
        if self.id_index.contains_key(&node.id) {
            return Err(GraphError::DuplicateNode(node.id));
        }
        let id = node.id.clone();
        let index = self.graph.add_node(node);
        self.id_index.insert(id, index);
        self.mark_dirty();
        Ok(index)
    }

    /// Adds an edge between two nodes. Fails on a duplicate id.
    pub fn add_edge(
        &mut self,
        from: NodeIndex,
        to: NodeIndex,
        edge: EdgeData,
    ) -> Result<EdgeIndex, GraphError> {
        if self.edge_id_index.contains_key(&edge.id) {
            return Err(GraphError::DuplicateEdge(edge.id));
        }
        let id = edge.id.clone();
        let index = self.graph.add_edge(from, to, edge);
        self.edge_id_index.insert(id, index);
        self.mark_dirty();
        Ok(index)
    }

    /// Removes a node together with its incident edges and compound links.
    pub fn remove_node(&mut self, index: NodeIndex) -> Option<NodeData> {
        let incident: Vec<String> = self
            .graph
            .edges_directed(index, Direction::Outgoing)
            .chain(self.graph.edges_directed(index, Direction::Incoming))
            .map(|e| e.weight().id.clone())
            .collect();
        for id in incident {
            self.edge_id_index.remove(&id);
        }
        self.set_parent(index, None);
        if let Some(members) = self.children.remove(&index) {
            for child in members {
                self.parent.remove(&child);
            }
        }
        let node = self.graph.remove_node(index)?;
        self.id_index.remove(&node.id);
        self.mark_dirty();
        Some(node)
    }

    // ── lookups ────────────────────────────────────────────────────────

    /// Gets the index of a node by id.
    pub fn node_index(&self, id: &str) -> Option<NodeIndex> {
        self.id_index.get(id).copied()
    }

    /// Gets the index of an edge by id.
    pub fn edge_index(&self, id: &str) -> Option<EdgeIndex> {
        self.edge_id_index.get(id).copied()
    }

    pub fn node(&self, index: NodeIndex) -> Option<&NodeData> {
        self.graph.node_weight(index)
    }

    pub fn node_mut(&mut self, index: NodeIndex) -> Option<&mut NodeData> {
        self.mark_dirty();
        self.graph.node_weight_mut(index)
    }

    pub fn edge(&self, index: EdgeIndex) -> Option<&EdgeData> {
        self.graph.edge_weight(index)
    }

    pub fn edge_mut(&mut self, index: EdgeIndex) -> Option<&mut EdgeData> {
        self.mark_dirty();
        self.graph.edge_weight_mut(index)
    }

    /// The source and target of an edge.
    pub fn edge_endpoints(&self, index: EdgeIndex) -> Option<(NodeIndex, NodeIndex)> {
        self.graph.edge_endpoints(index)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Iterates over all node indices.
    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    /// Iterates over all edge indices.
    pub fn edge_indices(&self) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.graph.edge_indices()
    }

    /// Every node and edge of the graph.
    pub fn all_elements(&self) -> ElementSet {
        let mut set = ElementSet::from_nodes(self.graph.node_indices());
        for e in self.graph.edge_indices() {
            set.insert_edge(e);
        }
        set
    }

    /// Nodes and edges carrying the given tag.
    pub fn elements_with(&self, tag: Tag) -> ElementSet {
        let mut set = ElementSet::new();
        for n in self.graph.node_indices() {
            if self.graph[n].tags.contains(tag) {
                set.insert_node(n);
            }
        }
        for e in self.graph.edge_indices() {
            if self.graph[e].tags.contains(tag) {
                set.insert_edge(e);
            }
        }
        set
    }

    /// Nodes satisfying a predicate.
    pub fn filter_nodes<F>(&self, mut pred: F) -> ElementSet
    where
        F: FnMut(NodeIndex, &NodeData) -> bool,
    {
        self.graph
            .node_indices()
            .filter(|&n| pred(n, &self.graph[n]))
            .collect()
    }

    /// Nodes that are neither hidden nor filtered out.
    pub fn visible_nodes(&self) -> ElementSet {
        self.filter_nodes(|_, n| !n.tags.contains(Tag::Hidden) && !n.tags.contains(Tag::Filtered))
    }

    /// Unfiltered nodes that are not hidden.
    pub fn visible_unfiltered_nodes(&self) -> ElementSet {
        self.filter_nodes(|_, n| n.tags.contains(Tag::Unfiltered) && !n.tags.contains(Tag::Hidden))
    }

    // ── tags ───────────────────────────────────────────────────────────

    /// Adds a tag to every element of the set.
    pub fn add_tag(&mut self, elements: &ElementSet, tag: Tag) {
        for n in elements.nodes() {
            if let Some(node) = self.graph.node_weight_mut(n) {
                node.tags.insert(tag);
            }
        }
        for e in elements.edges() {
            if let Some(edge) = self.graph.edge_weight_mut(e) {
                edge.tags.insert(tag);
            }
        }
        self.mark_dirty();
    }

    /// Removes a tag from every element of the set.
    pub fn remove_tag(&mut self, elements: &ElementSet, tag: Tag) {
        for n in elements.nodes() {
            if let Some(node) = self.graph.node_weight_mut(n) {
                node.tags.remove(tag);
            }
        }
        for e in elements.edges() {
            if let Some(edge) = self.graph.edge_weight_mut(e) {
                edge.tags.remove(tag);
            }
        }
        self.mark_dirty();
    }

    /// Adds a tag to every element of the graph.
    pub fn add_tag_all(&mut self, tag: Tag) {
        let all = self.all_elements();
        self.add_tag(&all, tag);
    }

    /// Removes a tag from every element of the graph.
    pub fn remove_tag_all(&mut self, tag: Tag) {
        let all = self.all_elements();
        self.remove_tag(&all, tag);
    }

    // ── selection ──────────────────────────────────────────────────────

    /// Marks the elements as selected, keeping the existing selection.
    pub fn select(&mut self, elements: &ElementSet) {
        for n in elements.nodes() {
            if let Some(node) = self.graph.node_weight_mut(n) {
                node.selected = true;
            }
        }
        for e in elements.edges() {
            if let Some(edge) = self.graph.edge_weight_mut(e) {
                edge.selected = true;
            }
        }
        self.mark_dirty();
    }

    /// Clears the selection of every element.
    pub fn unselect_all(&mut self) {
        for n in self.graph.node_weights_mut() {
            n.selected = false;
        }
        for e in self.graph.edge_weights_mut() {
            e.selected = false;
        }
        self.mark_dirty();
    }

    /// The currently selected nodes.
    pub fn selected_nodes(&self) -> ElementSet {
        self.filter_nodes(|_, n| n.selected)
    }

    /// The currently selected nodes and edges.
    pub fn selected_elements(&self) -> ElementSet {
        let mut set = self.selected_nodes();
        for e in self.graph.edge_indices() {
            if self.graph[e].selected {
                set.insert_edge(e);
            }
        }
        set
    }

    // ── traversal ──────────────────────────────────────────────────────

    /// Edges incident to any node of the set, in either direction,
    /// satisfying the edge predicate.
    pub fn connected_edges<F>(&self, nodes: &ElementSet, mut pred: F) -> ElementSet
    where
        F: FnMut(&EdgeData) -> bool,
    {
        let mut set = ElementSet::new();
        for n in nodes.nodes() {
            for e in self
                .graph
                .edges_directed(n, Direction::Outgoing)
                .chain(self.graph.edges_directed(n, Direction::Incoming))
            {
                if pred(e.weight()) {
                    set.insert_edge(e.id());
                }
            }
        }
        set
    }

    /// Edges whose source and target nodes satisfy the given predicates.
    pub fn edges_from_to<S, T>(&self, mut src: S, mut tgt: T) -> ElementSet
    where
        S: FnMut(NodeIndex, &NodeData) -> bool,
        T: FnMut(NodeIndex, &NodeData) -> bool,
    {
        let mut set = ElementSet::new();
        for e in self.graph.edge_references() {
            if src(e.source(), &self.graph[e.source()]) && tgt(e.target(), &self.graph[e.target()])
            {
                set.insert_edge(e.id());
            }
        }
        set
    }

    /// Edges with one endpoint in `a` and the other in `b`, in either
    /// direction.
    pub fn edges_with(&self, a: &ElementSet, b: &ElementSet) -> ElementSet {
        let mut set = ElementSet::new();
        for e in self.graph.edge_references() {
            let (s, t) = (e.source(), e.target());
            if (a.contains_node(s) && b.contains_node(t))
                || (b.contains_node(s) && a.contains_node(t))
            {
                set.insert_edge(e.id());
            }
        }
        set
    }

    /// Endpoint nodes of the given edges that satisfy the predicate.
    pub fn endpoints_of<F>(&self, edges: &ElementSet, mut pred: F) -> ElementSet
    where
        F: FnMut(NodeIndex, &NodeData) -> bool,
    {
        let mut set = ElementSet::new();
        for e in edges.edges() {
            if let Some((s, t)) = self.graph.edge_endpoints(e) {
                if pred(s, &self.graph[s]) {
                    set.insert_node(s);
                }
                if pred(t, &self.graph[t]) {
                    set.insert_node(t);
                }
            }
        }
        set
    }

    /// Connected components of the subgraph induced by the set: only set
    /// edges with both endpoints among the set nodes connect. Components
    /// are returned ordered by their smallest node index.
    pub fn components(&self, elements: &ElementSet) -> Vec<ElementSet> {
        let mut adjacency: HashMap<NodeIndex, Vec<(NodeIndex, EdgeIndex)>> = HashMap::new();
        for e in elements.edges() {
            if let Some((s, t)) = self.graph.edge_endpoints(e) {
                if elements.contains_node(s) && elements.contains_node(t) {
                    adjacency.entry(s).or_default().push((t, e));
                    adjacency.entry(t).or_default().push((s, e));
                }
            }
        }
        let mut components = Vec::new();
        let mut seen = ElementSet::new();
        for start in elements.nodes() {
            if seen.contains_node(start) {
                continue;
            }
            let mut component = ElementSet::from_node(start);
            let mut queue = vec![start];
            seen.insert_node(start);
            while let Some(current) = queue.pop() {
                if let Some(neighbors) = adjacency.get(&current) {
                    for &(next, via) in neighbors {
                        component.insert_edge(via);
                        if !seen.contains_node(next) {
                            seen.insert_node(next);
                            component.insert_node(next);
                            queue.push(next);
                        }
                    }
                }
            }
            components.push(component);
        }
        components
    }

    // ── compound grouping ──────────────────────────────────────────────

    /// Moves a node under a compound parent, or out of one with `None`.
    pub fn set_parent(&mut self, child: NodeIndex, parent: Option<NodeIndex>) {
        if let Some(old) = self.parent.remove(&child) {
            if let Some(members) = self.children.get_mut(&old) {
                members.retain(|&m| m != child);
            }
        }
        if let Some(new) = parent {
            self.parent.insert(child, new);
            self.children.entry(new).or_default().push(child);
        }
        self.mark_dirty();
    }

    /// The compound parent of a node, if any.
    pub fn parent_of(&self, child: NodeIndex) -> Option<NodeIndex> {
        self.parent.get(&child).copied()
    }

    /// The children of a compound parent, in display order.
    pub fn children_of(&self, parent: NodeIndex) -> &[NodeIndex] {
        self.children
            .get(&parent)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// The compound parents of all nodes in the set.
    pub fn parents_of(&self, elements: &ElementSet) -> ElementSet {
        elements
            .nodes()
            .filter_map(|n| self.parent.get(&n).copied())
            .collect()
    }

    /// The compound children of all nodes in the set.
    pub fn children_in(&self, elements: &ElementSet) -> ElementSet {
        let mut set = ElementSet::new();
        for n in elements.nodes() {
            for &child in self.children_of(n) {
                set.insert_node(child);
            }
        }
        set
    }

    /// All nodes that currently have a compound parent.
    pub fn child_nodes(&self) -> ElementSet {
        self.parent.keys().copied().collect()
    }

    // ── batching ───────────────────────────────────────────────────────

    /// Opens a batch scope. Nested scopes are allowed; the render epoch
    /// only advances when the outermost scope ends.
    pub fn begin_batch(&mut self) {
        self.batch_depth += 1;
    }

    /// Closes a batch scope.
    pub fn end_batch(&mut self) {
        debug_assert!(self.batch_depth > 0, "end_batch without begin_batch");
        self.batch_depth = self.batch_depth.saturating_sub(1);
        if self.batch_depth == 0 && self.batch_dirty {
            self.batch_dirty = false;
            self.render_epoch += 1;
        }
    }

    /// A counter that advances once per completed logical mutation; a
    /// renderer repaints when it changes.
    pub fn render_epoch(&self) -> u64 {
        self.render_epoch
    }

    fn mark_dirty(&mut self) {
        if self.batch_depth == 0 {
            self.render_epoch += 1;
        } else {
            self.batch_dirty = true;
        }
    }

    // ── viewport ───────────────────────────────────────────────────────

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    /// Fits the viewport to the bounding box of the given nodes.
    pub fn fit(&mut self, nodes: &ElementSet, padding: f64) {
        let positions: Vec<_> = nodes
            .nodes()
            .filter_map(|n| self.graph.node_weight(n))
            .map(|n| n.position)
            .collect();
        self.viewport.fit(&positions, padding);
        self.mark_dirty();
    }

    /// Centers the viewport on a node.
    pub fn center(&mut self, node: NodeIndex) {
        if let Some(data) = self.graph.node_weight(node) {
            let position = data.position;
            self.viewport.center_on(position);
            self.mark_dirty();
        }
    }
}
