//! Ontoview Sparql - Endpoint access
//!
//! A thin asynchronous client for the SPARQL endpoint the ontology lives
//! on, plus the bulk loading that turns endpoint rows into an
//! [`ontoview_graph::OntoGraph`]. Select failures degrade to empty results
//! so a broken endpoint never aborts an exploration session.

mod client;
mod error;
mod load;

pub use client::{Binding, Endpoint, Row};
pub use error::SparqlError;
pub use load::{load_graph, local_name, LoadOptions};
