//! Bulk graph loading from a SPARQL endpoint.
//!
//! Two queries build the whole graph: one for the classes with their
//! labels and provenance, one for the relations between them. Everything
//! loaded is tagged unfiltered. Rows the graph cannot use (duplicate
//! classes, relations of unknown classes) are skipped with a warning
//! instead of failing the load.

use crate::client::{Endpoint, Row};
use ontoview_graph::{EdgeData, NodeData, OntoGraph, Tag};
use tracing::{info, warn};

/// What to load from the endpoint.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// SPARQL graphs to draw from (FROM clauses). Empty means the
    /// endpoint's default graph.
    pub graphs: Vec<String>,
}

/// The last segment of an IRI, after `#` or `/`.
pub fn local_name(iri: &str) -> &str {
    iri.rsplit(['#', '/']).next().unwrap_or(iri)
}

fn from_clauses(options: &LoadOptions) -> String {
    options
        .graphs
        .iter()
        .map(|g| format!("from <{g}>\n"))
        .collect()
}

fn class_query(options: &LoadOptions) -> String {
    format!(
        "select distinct ?c ?l ?source\n{}{{\n  ?c a owl:Class.\n  OPTIONAL {{?source ov:defines ?c.}}\n  OPTIONAL {{?c rdfs:label ?l.}}\n}}",
        from_clauses(options)
    )
}

fn relation_query(options: &LoadOptions) -> String {
    format!(
        "select ?c ?p ?d\n{}{{\n  owl:Class ^a ?c,?d.\n  ?c ?p ?d.\n}}",
        from_clauses(options)
    )
}

/// Loads classes and relations into a fresh graph. A failing endpoint
/// yields an empty or partial graph, never an error.
pub async fn load_graph(endpoint: &Endpoint, options: &LoadOptions) -> OntoGraph {
    let mut graph = OntoGraph::new();

    let classes = endpoint.select(&class_query(options), None).await;
    for row in &classes {
        add_class(&mut graph, row);
    }
    info!("Loaded {} classes", graph.node_count());

    let relations = endpoint.select(&relation_query(options), None).await;
    for (i, row) in relations.iter().enumerate() {
        add_relation(&mut graph, i, row);
    }
    info!("Loaded {} relations", graph.edge_count());

    graph.add_tag_all(Tag::Unfiltered);
    graph
}

fn add_class(graph: &mut OntoGraph, row: &Row) {
    let Some(class) = row.get("c") else {
        warn!("Class row without ?c binding, skipping.");
        return;
    };
    if graph.node_index(&class.value).is_some() {
        // labels in several languages produce one row each
        if let Some(label) = row.get("l") {
            let index = graph.node_index(&class.value).expect("existing class");
            let language = label.lang.clone().unwrap_or_else(|| "en".to_string());
            if let Some(data) = graph.node_mut(index) {
                let entry = data.labels.entry(language).or_default();
                if !entry.contains(&label.value) {
                    entry.push(label.value.clone());
                }
            }
        }
        return;
    }
    let mut data = NodeData::new(class.value.clone());
    if let Some(label) = row.get("l") {
        let language = label.lang.clone().unwrap_or_else(|| "en".to_string());
        data.labels.insert(language, vec![label.value.clone()]);
    }
    if let Some(source) = row.get("source") {
        data.source = Some(local_name(&source.value).to_string());
    }
    if let Err(err) = graph.add_node(data) {
        warn!("Skipping class: {err}");
    }
}

fn add_relation(graph: &mut OntoGraph, index: usize, row: &Row) {
    let (Some(subject), Some(predicate), Some(object)) =
        (row.get("c"), row.get("p"), row.get("d"))
    else {
        warn!("Relation row with missing bindings, skipping.");
        return;
    };
    let Some(from) = graph.node_index(&subject.value) else {
        warn!("Relation source {} is not a loaded class, skipping.", subject.value);
        return;
    };
    let Some(to) = graph.node_index(&object.value) else {
        warn!("Relation target {} is not a loaded class, skipping.", object.value);
        return;
    };
    let edge = EdgeData::new(format!("e{index}"), local_name(&predicate.value));
    if let Err(err) = graph.add_edge(from, to, edge) {
        warn!("Skipping relation: {err}");
    }
}
