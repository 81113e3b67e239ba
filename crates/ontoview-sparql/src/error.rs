//! SPARQL client error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SparqlError {
    #[error("invalid endpoint URL: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response shape: {0}")]
    Format(String),
}
