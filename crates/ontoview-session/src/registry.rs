//! The view registry.
//!
//! The registry is the owned replacement for what the original kept in
//! module-level singletons: the list of views, the active view and the
//! session option state. Exactly one registry may be alive per process;
//! constructing a second one fails loudly.

use crate::document::SessionState;
use crate::error::SessionError;
use crate::view::{View, ViewId};
use ontoview_engine::{Direction, VisibilityEngine};
use ontoview_graph::{ElementSet, NodeIndex, Tag};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

static REGISTRY_LIVE: AtomicBool = AtomicBool::new(false);

/// Owns all views of the application. The first created view is the main
/// view; it cannot be closed and is the only view new views may be
/// spawned from.
#[derive(Debug)]
pub struct ViewRegistry {
    views: Vec<View>,
    active: Option<ViewId>,
    next_id: u64,
    state: SessionState,
}

impl ViewRegistry {
    /// Claims the process-wide registry slot. Fails if another registry is
    /// alive.
    pub fn new() -> Result<Self, SessionError> {
        if REGISTRY_LIVE
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(SessionError::RegistryAlreadyLive);
        }
        Ok(Self {
            views: Vec::new(),
            active: None,
            next_id: 0,
            state: SessionState::default(),
        })
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }

    /// Creates a new uninitialized view and activates it. The first view
    /// becomes the main view.
    pub fn new_view(&mut self, title: Option<String>) -> ViewId {
        let id = ViewId(self.next_id);
        self.next_id += 1;
        let title = title.unwrap_or_else(|| format!("Tab {}", self.views.len() + 1));
        debug!("Creating {id} \"{title}\"");
        self.views.push(View::new(id, title));
        self.active = Some(id);
        id
    }

    /// The main view, once one exists.
    pub fn main_view(&self) -> Option<ViewId> {
        self.views.first().map(|v| v.id())
    }

    pub fn is_main(&self, id: ViewId) -> bool {
        self.main_view() == Some(id)
    }

    pub fn view(&self, id: ViewId) -> Result<&View, SessionError> {
        self.views
            .iter()
            .find(|v| v.id() == id)
            .ok_or(SessionError::NoSuchView(id))
    }

    pub fn view_mut(&mut self, id: ViewId) -> Result<&mut View, SessionError> {
        self.views
            .iter_mut()
            .find(|v| v.id() == id)
            .ok_or(SessionError::NoSuchView(id))
    }

    pub fn views(&self) -> impl Iterator<Item = &View> {
        self.views.iter()
    }

    pub fn views_mut(&mut self) -> impl Iterator<Item = &mut View> {
        self.views.iter_mut()
    }

    /// The active view; there is exactly one while any view exists.
    pub fn active(&self) -> Option<ViewId> {
        self.active
    }

    pub fn activate(&mut self, id: ViewId) -> Result<(), SessionError> {
        self.view(id)?;
        self.active = Some(id);
        Ok(())
    }

    pub fn rename(&mut self, id: ViewId, title: impl Into<String>) -> Result<(), SessionError> {
        self.view_mut(id)?.set_title(title);
        Ok(())
    }

    /// Closes a view. The main view refuses; the active view falls back to
    /// the main view.
    pub fn close_view(&mut self, id: ViewId) -> Result<(), SessionError> {
        self.view(id)?;
        if self.is_main(id) {
            return Err(SessionError::MainViewNotClosable);
        }
        self.views.retain(|v| v.id() != id);
        if self.active == Some(id) {
            self.active = self.main_view();
        }
        Ok(())
    }

    /// Drops all views, e.g. before restoring a session. The registry
    /// itself stays alive.
    pub fn reset(&mut self) {
        self.views.clear();
        self.active = None;
    }

    /// Spawns a new view populated with a fresh copy of the main view's
    /// graph. Only the main view spawns; called on any other view, that
    /// view itself is returned.
    pub fn spawn_from(&mut self, origin: ViewId) -> Result<ViewId, SessionError> {
        self.view(origin)?;
        if !self.is_main(origin) {
            return Ok(origin);
        }
        let mut graph = self.view(origin)?.engine()?.graph().clone();
        graph.remove_tag_all(Tag::Hidden);
        graph.remove_tag_all(Tag::Highlighted);
        graph.remove_tag_all(Tag::Starmode);
        graph.unselect_all();
        let id = self.new_view(None);
        self.view_mut(id)?.init(VisibilityEngine::new(graph));
        Ok(id)
    }

    /// The identifiers of the nodes selected in a view; input for
    /// assimilation into another view.
    pub fn selected_ids(&self, id: ViewId) -> Result<Vec<String>, SessionError> {
        let engine = self.view(id)?.engine()?;
        Ok(engine
            .graph()
            .selected_nodes()
            .nodes()
            .filter_map(|n| engine.graph().node(n))
            .map(|n| n.id.clone())
            .collect())
    }

    /// Resolves identifiers into the equivalent elements of a view's
    /// graph. Identifiers without an equivalent are silently skipped.
    pub fn assimilate(&self, id: ViewId, ids: &[String]) -> Result<ElementSet, SessionError> {
        let engine = self.view(id)?.engine()?;
        Ok(engine
            .graph()
            .elements_by_ids(ids.iter().map(|s| s.as_str())))
    }

    /// Stars the selection of `origin` in a freshly spawned view (or in
    /// `origin` itself when it is not the main view).
    pub fn star_in_new_view(
        &mut self,
        origin: ViewId,
        relayout: bool,
        direction: Direction,
    ) -> Result<ViewId, SessionError> {
        let ids = self.selected_ids(origin)?;
        let target = self.spawn_from(origin)?;
        let assimilated: Vec<NodeIndex> =
            self.assimilate(target, &ids)?.nodes().collect();
        let engine = self.view_mut(target)?.engine_mut()?;
        engine.multiplex(Some(assimilated.as_slice()), true, None, |engine, call| {
            engine.show_star(&call.to_element_set(), relayout, direction);
        });
        Ok(target)
    }
}

impl Drop for ViewRegistry {
    fn drop(&mut self) {
        REGISTRY_LIVE.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use ontoview_graph::{EdgeData, NodeData, OntoGraph};
    use std::sync::{Mutex, MutexGuard};

    /// Registry tests share the process-wide slot, so they take a lock.
    static REGISTRY_TEST_LOCK: Mutex<()> = Mutex::new(());

    pub(crate) fn registry_lock() -> MutexGuard<'static, ()> {
        REGISTRY_TEST_LOCK
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub(crate) fn sample_engine() -> VisibilityEngine {
        let mut graph = OntoGraph::new();
        let a = graph.add_node(NodeData::new("a")).unwrap();
        let b = graph.add_node(NodeData::new("b")).unwrap();
        let c = graph.add_node(NodeData::new("c")).unwrap();
        graph.add_edge(a, b, EdgeData::new("e0", "subClassOf")).unwrap();
        graph.add_edge(b, c, EdgeData::new("e1", "subClassOf")).unwrap();
        graph.add_tag_all(Tag::Unfiltered);
        VisibilityEngine::new(graph)
    }

    #[test]
    fn test_single_instance_invariant() {
        let _guard = registry_lock();
        let first = ViewRegistry::new().unwrap();
        assert!(matches!(
            ViewRegistry::new(),
            Err(SessionError::RegistryAlreadyLive)
        ));
        drop(first);
        // after teardown a new registry may be constructed again
        assert!(ViewRegistry::new().is_ok());
    }

    #[test]
    fn test_first_view_is_main_and_not_closable() {
        let _guard = registry_lock();
        let mut registry = ViewRegistry::new().unwrap();
        let main = registry.new_view(Some("main".into()));
        let tab = registry.new_view(None);

        assert!(registry.is_main(main));
        assert!(matches!(
            registry.close_view(main),
            Err(SessionError::MainViewNotClosable)
        ));
        registry.close_view(tab).unwrap();
        assert_eq!(registry.active(), Some(main));
    }

    #[test]
    fn test_operations_require_initialization() {
        let _guard = registry_lock();
        let mut registry = ViewRegistry::new().unwrap();
        let main = registry.new_view(None);
        assert!(matches!(
            registry.view(main).unwrap().engine(),
            Err(SessionError::NotInitialized(_))
        ));

        registry.view_mut(main).unwrap().init(sample_engine());
        assert!(registry.view(main).unwrap().engine().is_ok());
    }

    #[test]
    fn test_spawn_only_from_main() {
        let _guard = registry_lock();
        let mut registry = ViewRegistry::new().unwrap();
        let main = registry.new_view(None);
        registry.view_mut(main).unwrap().init(sample_engine());

        let spawned = registry.spawn_from(main).unwrap();
        assert_ne!(spawned, main);
        assert_eq!(
            registry.view(spawned).unwrap().engine().unwrap().graph().node_count(),
            3
        );

        // spawning from a non-main view yields that view itself
        assert_eq!(registry.spawn_from(spawned).unwrap(), spawned);
    }

    #[test]
    fn test_assimilation_resolves_by_id() {
        let _guard = registry_lock();
        let mut registry = ViewRegistry::new().unwrap();
        let main = registry.new_view(None);
        registry.view_mut(main).unwrap().init(sample_engine());

        let spawned = registry.spawn_from(main).unwrap();
        let ids = vec!["a".to_string(), "missing".to_string()];
        let resolved = registry.assimilate(spawned, &ids).unwrap();
        assert_eq!(resolved.node_count(), 1);
    }

    #[test]
    fn test_star_in_new_view() {
        let _guard = registry_lock();
        let mut registry = ViewRegistry::new().unwrap();
        let main = registry.new_view(None);
        registry.view_mut(main).unwrap().init(sample_engine());
        {
            let engine = registry.view_mut(main).unwrap().engine_mut().unwrap();
            let b = engine.graph().node_index("b").unwrap();
            engine.select_node(b);
        }

        let target = registry.star_in_new_view(main, false, Direction::Both).unwrap();
        assert_ne!(target, main);
        let engine = registry.view(target).unwrap().engine().unwrap();
        assert!(engine.star_mode());
        // the selection of the origin view is untouched
        let main_engine = registry.view(main).unwrap().engine().unwrap();
        assert_eq!(main_engine.graph().selected_nodes().node_count(), 1);
    }
}
