//! The SPARQL endpoint client.
//!
//! `select` degrades to an empty result on any transport or decode
//! failure; an exploration session must keep working when the endpoint is
//! down. `ask` and `describe` surface their errors to the caller of that
//! specific call only.

use crate::error::SparqlError;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{debug, error};
use url::Url;

/// One variable binding of a select result row.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Binding {
    /// Binding kind: `uri`, `literal` or `bnode`.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    pub value: String,
    /// Language tag of a literal binding.
    #[serde(rename = "xml:lang", default)]
    pub lang: Option<String>,
}

/// One select result row: variable name to binding.
pub type Row = BTreeMap<String, Binding>;

#[derive(Debug, Deserialize)]
struct SelectResponse {
    results: SelectResults,
}

#[derive(Debug, Deserialize)]
struct SelectResults {
    bindings: Vec<Row>,
}

#[derive(Debug, Deserialize)]
struct AskResponse {
    boolean: bool,
}

/// A SPARQL endpoint.
#[derive(Debug, Clone)]
pub struct Endpoint {
    base: Url,
    client: reqwest::Client,
}

impl Endpoint {
    /// Creates a client for the given endpoint URL.
    pub fn new(endpoint: &str) -> Result<Self, SparqlError> {
        Ok(Self {
            base: Url::parse(endpoint)?,
            client: reqwest::Client::new(),
        })
    }

    /// The endpoint URL.
    pub fn url(&self) -> &Url {
        &self.base
    }

    /// Runs a SELECT query and returns its binding rows. Failures are
    /// logged and yield an empty result.
    pub async fn select(&self, query: &str, graph: Option<&str>) -> Vec<Row> {
        match self.try_select(query, graph).await {
            Ok(rows) => {
                debug!("SPARQL select returned {} rows", rows.len());
                rows
            }
            Err(err) => {
                error!("{err}");
                error!("Error executing SPARQL query:\n{query}");
                Vec::new()
            }
        }
    }

    async fn try_select(&self, query: &str, graph: Option<&str>) -> Result<Vec<Row>, SparqlError> {
        let mut request = self
            .client
            .get(self.base.clone())
            .query(&[("query", query), ("format", "json")]);
        if let Some(graph) = graph {
            request = request.query(&[("default-graph-uri", graph)]);
        }
        let response: SelectResponse = request.send().await?.error_for_status()?.json().await?;
        Ok(response.results.bindings)
    }

    /// Runs an ASK query.
    pub async fn ask(&self, query: &str, graph: Option<&str>) -> Result<bool, SparqlError> {
        let mut request = self
            .client
            .get(self.base.clone())
            .query(&[("query", query), ("format", "json")]);
        if let Some(graph) = graph {
            request = request.query(&[("default-graph-uri", graph)]);
        }
        let response: AskResponse = request.send().await?.error_for_status()?.json().await?;
        Ok(response.boolean)
    }

    /// Runs a DESCRIBE query for a single resource and returns the result
    /// as text.
    pub async fn describe(&self, uri: &str, graph: Option<&str>) -> Result<String, SparqlError> {
        let query = format!("describe <{uri}>");
        let mut request = self
            .client
            .get(self.base.clone())
            .query(&[("query", query.as_str()), ("format", "text")]);
        if let Some(graph) = graph {
            request = request.query(&[("default-graph-uri", graph)]);
        }
        Ok(request.send().await?.error_for_status()?.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_response_parsing() {
        let json = r#"{
          "head": {"vars": ["c", "l"]},
          "results": {"bindings": [
            {"c": {"type": "uri", "value": "http://example.org/a"},
             "l": {"type": "literal", "value": "Klasse A", "xml:lang": "de"}},
            {"c": {"type": "uri", "value": "http://example.org/b"}}
          ]}
        }"#;
        let response: SelectResponse = serde_json::from_str(json).unwrap();
        let rows = response.results.bindings;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["c"].value, "http://example.org/a");
        assert_eq!(rows[0]["l"].lang.as_deref(), Some("de"));
        assert_eq!(rows[1].get("l"), None);
    }

    #[test]
    fn test_ask_response_parsing() {
        let response: AskResponse =
            serde_json::from_str(r#"{"head": {}, "boolean": true}"#).unwrap();
        assert!(response.boolean);
    }

    #[test]
    fn test_invalid_endpoint_rejected() {
        assert!(matches!(
            Endpoint::new("not a url"),
            Err(SparqlError::InvalidEndpoint(_))
        ));
    }
}
