//! Ontoview Session - Views and persistence
//!
//! Manages the tabs ("views") of the application, each wrapping one
//! visibility engine over its own graph, and the documents the state is
//! persisted as: a session (all views plus option state), a single view,
//! or a bare layout.
//!
//! The [`ViewRegistry`] replaces the original's module-level singletons
//! with an explicitly owned context: exactly one registry is alive per
//! process, the first view is the main view, and new views are spawned
//! from it with their content assimilated by identifier.

mod codec;
mod document;
mod error;
mod registry;
mod view;

pub use codec::{
    apply_layout, engine_from_document, load_view, positions, restore_session, save_session,
    save_view, LoadedGraph,
};
pub use document::{
    LayoutDocument, SessionDocument, SessionOptions, SessionState, ViewDocument, ViewSlot, VERSION,
};
pub use error::SessionError;
pub use registry::ViewRegistry;
pub use view::{View, ViewId};
