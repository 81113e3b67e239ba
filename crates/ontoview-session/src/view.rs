//! A single view.

use crate::error::SessionError;
use ontoview_engine::VisibilityEngine;
use serde::{Deserialize, Serialize};

/// Stable view handle, valid for the lifetime of the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ViewId(pub(crate) u64);

impl std::fmt::Display for ViewId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "view#{}", self.0)
    }
}

/// One tab of the application: a titled visibility engine with its own
/// graph. A view only accepts operations after its content has been
/// initialized, either from a document or from the endpoint.
#[derive(Debug)]
pub struct View {
    id: ViewId,
    title: String,
    engine: VisibilityEngine,
    initialized: bool,
}

impl View {
    pub(crate) fn new(id: ViewId, title: String) -> Self {
        Self {
            id,
            title,
            engine: VisibilityEngine::default(),
            initialized: false,
        }
    }

    pub fn id(&self) -> ViewId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Installs the view content. Completes initialization.
    pub fn init(&mut self, engine: VisibilityEngine) {
        self.engine = engine;
        self.initialized = true;
    }

    /// The engine, if the view finished initializing.
    pub fn engine(&self) -> Result<&VisibilityEngine, SessionError> {
        if !self.initialized {
            return Err(SessionError::NotInitialized(self.id));
        }
        Ok(&self.engine)
    }

    /// The engine for mutation, if the view finished initializing.
    pub fn engine_mut(&mut self) -> Result<&mut VisibilityEngine, SessionError> {
        if !self.initialized {
            return Err(SessionError::NotInitialized(self.id));
        }
        Ok(&mut self.engine)
    }
}
