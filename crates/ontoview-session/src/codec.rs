//! Session, view and layout (de)serialization.
//!
//! Style is never round-tripped: documents carry elements, tags, selection
//! and positions only, and the style is reapplied from static
//! configuration after load. Loading a graph tags everything unfiltered,
//! drops highlighting and the path-source marker, and infers star mode
//! from the visible fraction.

use crate::document::{
    LayoutDocument, SessionDocument, SessionState, ViewDocument, ViewSlot, VERSION,
};
use crate::error::SessionError;
use crate::registry::ViewRegistry;
use crate::view::ViewId;
use ontoview_engine::VisibilityEngine;
use ontoview_graph::{GraphJson, OntoGraph, Tag};
use tracing::{debug, warn};

/// The share of visible elements below which a loaded graph is assumed to
/// be mid-star-operation.
const STAR_MODE_VISIBLE_FRACTION: f64 = 0.8;

/// A graph document turned back into engine state.
#[derive(Debug)]
pub struct LoadedGraph {
    pub engine: VisibilityEngine,
    /// Whether the document contained compound children, i.e. was saved
    /// with match combining enabled.
    pub combined: bool,
}

/// Builds a view engine from a graph document.
pub fn engine_from_document(document: &GraphJson) -> Result<LoadedGraph, SessionError> {
    let mut graph = document.to_graph()?;
    graph.add_tag_all(Tag::Unfiltered);

    let total = (graph.node_count() + graph.edge_count()).max(1);
    let hidden = graph.elements_with(Tag::Hidden).len();
    let visible_fraction = (total - hidden) as f64 / total as f64;
    let star_mode = visible_fraction < STAR_MODE_VISIBLE_FRACTION;
    debug!("Loaded graph: visible fraction {visible_fraction}, star mode {star_mode}");

    let combined = !graph.child_nodes().is_empty();

    graph.remove_tag_all(Tag::Highlighted);
    graph.remove_tag_all(Tag::Source);
    let visible = graph.visible_nodes();
    graph.fit(&visible, 0.0);

    let mut engine = VisibilityEngine::new(graph);
    engine.set_star_mode(star_mode);
    Ok(LoadedGraph { engine, combined })
}

/// Serializes the whole registry as one session document.
pub fn save_session(registry: &ViewRegistry) -> Result<SessionDocument, SessionError> {
    let main = registry.main_view().ok_or(SessionError::NoMainView)?;
    let mut state = registry.state().clone();
    state.version = VERSION.to_string();

    let slot = |id: ViewId| -> Result<ViewSlot, SessionError> {
        let view = registry.view(id)?;
        Ok(ViewSlot {
            title: view.title().to_string(),
            graph: GraphJson::from_graph(view.engine()?.graph()),
        })
    };

    let mut tabs = Vec::new();
    for view in registry.views() {
        if view.id() != main {
            tabs.push(slot(view.id())?);
        }
    }
    Ok(SessionDocument {
        state,
        main_graph: slot(main)?,
        tabs,
    })
}

/// Replaces the registry content with a session document. The caller is
/// responsible for confirming a version mismatch beforehand; applying a
/// mismatched document is allowed but unguaranteed.
pub fn restore_session(
    registry: &mut ViewRegistry,
    document: &SessionDocument,
) -> Result<(), SessionError> {
    if !document.state.version_matches() {
        warn!(
            "Session was saved in version {}, running version is {VERSION}; it may not work properly.",
            document.state.version
        );
    }
    registry.reset();
    let mut any_combined = false;

    let main = registry.new_view(Some(document.main_graph.title.clone()));
    let loaded = engine_from_document(&document.main_graph.graph)?;
    any_combined |= loaded.combined;
    registry.view_mut(main)?.init(loaded.engine);

    for tab in &document.tabs {
        let id = registry.new_view(Some(tab.title.clone()));
        let loaded = engine_from_document(&tab.graph)?;
        any_combined |= loaded.combined;
        registry.view_mut(id)?.init(loaded.engine);
    }
    registry.activate(main)?;

    // update changed values, keep existing values the file does not carry
    let mut state = document.state.clone();
    state.options.combine_match_mode |= any_combined;
    *registry.state_mut() = state;
    let cumulative = registry.state().options.cumulative_search;
    for view in registry.views_mut() {
        if let Ok(engine) = view.engine_mut() {
            engine.set_cumulative_search(cumulative);
        }
    }
    Ok(())
}

/// Serializes one view as a document.
pub fn save_view(registry: &ViewRegistry, id: ViewId) -> Result<ViewDocument, SessionError> {
    let view = registry.view(id)?;
    Ok(ViewDocument {
        version: VERSION.to_string(),
        title: view.title().to_string(),
        graph: GraphJson::from_graph(view.engine()?.graph()),
    })
}

/// Loads a view document into a new view of the registry.
pub fn load_view(
    registry: &mut ViewRegistry,
    document: &ViewDocument,
) -> Result<ViewId, SessionError> {
    if !document.version_matches() {
        warn!(
            "View was saved in version {}, running version is {VERSION}; it may not work properly.",
            document.version
        );
    }
    let id = registry.new_view(Some(document.title.clone()));
    let loaded = engine_from_document(&document.graph)?;
    registry.view_mut(id)?.init(loaded.engine);
    Ok(id)
}

/// Extracts all node positions of a graph.
pub fn positions(graph: &OntoGraph) -> LayoutDocument {
    graph
        .node_indices()
        .filter_map(|n| graph.node(n))
        .map(|n| (n.id.clone(), n.position))
        .collect()
}

/// Applies a layout document to a structurally compatible graph. Returns
/// the number of applied positions; identifiers without a node are
/// counted and logged.
pub fn apply_layout(graph: &mut OntoGraph, layout: &LayoutDocument) -> usize {
    let mut applied = 0;
    let mut missing = 0;
    for (id, position) in layout {
        match graph.node_index(id) {
            Some(n) => {
                if let Some(data) = graph.node_mut(n) {
                    data.position = *position;
                    applied += 1;
                }
            }
            None => missing += 1,
        }
    }
    if missing > 0 {
        warn!("{missing} layout positions have no matching node; is the right graph loaded?");
    }
    applied
}
