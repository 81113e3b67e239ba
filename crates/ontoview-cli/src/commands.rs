//! CLI command implementations.

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use ontoview_engine::{Direction, VisibilityEngine};
use ontoview_graph::{LabelIndex, NodeIndex, Tag};
use ontoview_session::{
    apply_layout, load_view, positions, restore_session, save_session, save_view, LayoutDocument,
    SessionDocument, ViewDocument, ViewRegistry, VERSION,
};
use ontoview_sparql::{load_graph, Endpoint, LoadOptions};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

enum DocumentKind {
    Session,
    View,
}

/// A loaded document together with the registry operating on it.
struct Workspace {
    registry: ViewRegistry,
    kind: DocumentKind,
}

fn confirm(question: &str, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    print!("{question} [y/N] ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes"))
}

fn confirm_version(version: &str, yes: bool) -> Result<()> {
    if version == VERSION {
        return Ok(());
    }
    let question = format!(
        "This file was saved in version {version}, but ontoview has version {VERSION}, \
         so it may not work properly. Continue anyway?"
    );
    if !confirm(&question, yes)? {
        return Err("aborted".into());
    }
    Ok(())
}

/// Loads a session or view document and restores it into a fresh registry.
fn load_workspace(file: &Path, yes: bool) -> Result<Workspace> {
    let text = fs::read_to_string(file)?;
    let value: serde_json::Value = serde_json::from_str(&text)?;
    let mut registry = ViewRegistry::new()?;
    let kind = if value.get("mainGraph").is_some() {
        let document: SessionDocument = serde_json::from_value(value)?;
        confirm_version(&document.state.version, yes)?;
        restore_session(&mut registry, &document)?;
        DocumentKind::Session
    } else {
        let document: ViewDocument = serde_json::from_value(value)?;
        confirm_version(&document.version, yes)?;
        load_view(&mut registry, &document)?;
        DocumentKind::View
    };
    Ok(Workspace { registry, kind })
}

/// Writes the workspace back as the kind of document it was loaded from.
fn save_workspace(
    workspace: &Workspace,
    input: &Path,
    output: Option<&Path>,
    yes: bool,
) -> Result<()> {
    let target = output.unwrap_or(input);
    if target != input && target.exists() {
        let question = format!("{} exists. Overwrite?", target.display());
        if !confirm(&question, yes)? {
            return Err("aborted".into());
        }
    }
    let json = match workspace.kind {
        DocumentKind::Session => {
            serde_json::to_string_pretty(&save_session(&workspace.registry)?)?
        }
        DocumentKind::View => {
            let active = workspace.registry.active().ok_or("no active view")?;
            serde_json::to_string_pretty(&save_view(&workspace.registry, active)?)?
        }
    };
    fs::write(target, json)?;
    println!("{} Saved {}", "✓".green(), target.display());
    Ok(())
}

fn active_engine(workspace: &mut Workspace) -> Result<&mut VisibilityEngine> {
    let active = workspace.registry.active().ok_or("no active view")?;
    Ok(workspace.registry.view_mut(active)?.engine_mut()?)
}

fn resolve_uri(engine: &VisibilityEngine, uri: &str) -> Result<NodeIndex> {
    engine
        .graph()
        .node_index(uri)
        .ok_or_else(|| format!("class not in graph: {uri}").into())
}

fn spinner(message: &str) -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message(message.to_string());
    Ok(spinner)
}

/// Fetch the ontology from a SPARQL endpoint into a view document.
pub async fn fetch(
    endpoint: &str,
    graphs: &[String],
    title: &str,
    output: &Path,
    yes: bool,
) -> Result<()> {
    let endpoint = Endpoint::new(endpoint)?;
    let options = LoadOptions {
        graphs: graphs.to_vec(),
    };

    let progress = spinner("Fetching classes and relations...")?;
    let graph = load_graph(&endpoint, &options).await;
    progress.finish_and_clear();

    println!(
        "{} Fetched {} classes and {} relations",
        "✓".green(),
        graph.node_count().to_string().cyan(),
        graph.edge_count().to_string().cyan()
    );

    if output.exists() {
        let question = format!("{} exists. Overwrite?", output.display());
        if !confirm(&question, yes)? {
            return Err("aborted".into());
        }
    }
    let mut registry = ViewRegistry::new()?;
    let id = registry.new_view(Some(title.to_string()));
    registry.view_mut(id)?.init(VisibilityEngine::new(graph));
    let workspace = Workspace {
        registry,
        kind: DocumentKind::View,
    };
    save_workspace(&workspace, output, None, yes)
}

/// Show statistics of a session or view document.
pub fn info(file: &Path) -> Result<()> {
    let workspace = load_workspace(file, true)?;
    for view in workspace.registry.views() {
        let engine = view.engine()?;
        let graph = engine.graph();
        let hidden = graph.elements_with(Tag::Hidden).len();
        let marker = if workspace.registry.active() == Some(view.id()) {
            "*"
        } else {
            " "
        };
        println!(
            "{marker} {}: {} nodes, {} edges, {} hidden{}",
            view.title().cyan(),
            graph.node_count(),
            graph.edge_count(),
            hidden,
            if engine.star_mode() { ", star mode" } else { "" }
        );
    }
    Ok(())
}

/// Show a shortest path between two classes.
pub fn path(
    file: &Path,
    from: &str,
    to: &str,
    star_path: bool,
    output: Option<&Path>,
    yes: bool,
) -> Result<()> {
    let mut workspace = load_workspace(file, yes)?;
    {
        let engine = active_engine(&mut workspace)?;
        resolve_uri(engine, from)?;
        let target = resolve_uri(engine, to)?;
        if !engine.set_source(from) {
            return Err(format!("cannot use {from} as path source").into());
        }
        if !engine.show_path_to(target, star_path) {
            return Err(format!("no path found between {from} and {to}").into());
        }
        println!("{} Path shown", "✓".green());
    }
    save_workspace(&workspace, file, output, yes)
}

/// Show the star around one or more classes.
pub fn star(
    file: &Path,
    uris: &[String],
    relayout: bool,
    direction: Direction,
    new_view: bool,
    output: Option<&Path>,
    yes: bool,
) -> Result<()> {
    let mut workspace = load_workspace(file, yes)?;
    if new_view {
        let origin = workspace.registry.active().ok_or("no active view")?;
        {
            let engine = active_engine(&mut workspace)?;
            for uri in uris {
                let node = resolve_uri(engine, uri)?;
                engine.select_node(node);
            }
        }
        let target = workspace
            .registry
            .star_in_new_view(origin, relayout, direction)?;
        let title = workspace.registry.view(target)?.title().to_string();
        println!("{} Star shown in new view {}", "✓".green(), title.cyan());
    } else {
        let engine = active_engine(&mut workspace)?;
        let mut nodes = Vec::new();
        for uri in uris {
            nodes.push(resolve_uri(engine, uri)?);
        }
        engine.multiplex(Some(nodes.as_slice()), true, None, |engine, call| {
            engine.show_star(&call.to_element_set(), relayout, direction);
        });
        println!("{} Star shown around {} classes", "✓".green(), uris.len());
    }
    save_workspace(&workspace, file, output, yes)
}

/// Show a worm or a double star between two classes.
pub fn worm(
    file: &Path,
    from: &str,
    to: &str,
    double: bool,
    output: Option<&Path>,
    yes: bool,
) -> Result<()> {
    let mut workspace = load_workspace(file, yes)?;
    {
        let engine = active_engine(&mut workspace)?;
        resolve_uri(engine, from)?;
        let target = resolve_uri(engine, to)?;
        if !engine.set_source(from) {
            return Err(format!("cannot use {from} as path source").into());
        }
        let found = if double {
            engine.show_double_star(target)
        } else {
            engine.show_worm(target)
        };
        if !found {
            return Err(format!("no path found between {from} and {to}").into());
        }
        println!("{} {} shown", "✓".green(), if double { "Double star" } else { "Worm" });
    }
    save_workspace(&workspace, file, output, yes)
}

/// Center and highlight classes by URI.
pub fn present(
    file: &Path,
    uris: &[String],
    hide_others: bool,
    output: Option<&Path>,
    yes: bool,
) -> Result<()> {
    let mut workspace = load_workspace(file, yes)?;
    {
        let engine = active_engine(&mut workspace)?;
        let ok = if uris.len() == 1 && !hide_others {
            engine.present_uri(&uris[0])
        } else {
            engine.present_uris(uris, hide_others)
        };
        if !ok {
            return Err("presenting failed; are the URIs part of the graph?".into());
        }
        println!("{} Presented {} classes", "✓".green(), uris.len());
    }
    save_workspace(&workspace, file, output, yes)
}

/// Group or ungroup close matches.
pub fn combine(file: &Path, off: bool, output: Option<&Path>, yes: bool) -> Result<()> {
    let mut workspace = load_workspace(file, yes)?;
    {
        let engine = active_engine(&mut workspace)?;
        // clustering can take a while on big graphs; show a spinner
        let progress = spinner(if off {
            "Ungrouping matches..."
        } else {
            "Combining matches..."
        })?;
        engine.combine_match(!off);
        progress.finish_and_clear();
        if off {
            println!("{} Matches ungrouped", "✓".green());
        } else {
            let grouped = engine
                .match_components()
                .iter()
                .filter(|c| c.node_count() > 1)
                .count();
            println!("{} Combined {} match clusters", "✓".green(), grouped);
        }
    }
    save_workspace(&workspace, file, output, yes)
}

/// Search classes by label.
pub fn search(file: &Path, query: &str, limit: usize) -> Result<()> {
    let mut workspace = load_workspace(file, true)?;
    let engine = active_engine(&mut workspace)?;
    let index = LabelIndex::build(engine.graph());
    let results = index.search(query);
    if results.is_empty() {
        println!("No classes match {}", query.cyan());
        return Ok(());
    }
    for node in results.iter().take(limit) {
        if let Some(data) = engine.graph().node(*node) {
            println!("{}  {}", data.display_label().cyan(), data.id.dimmed());
        }
    }
    if results.len() > limit {
        println!("... and {} more", results.len() - limit);
    }
    Ok(())
}

/// Extract or apply a layout document.
pub fn layout(
    file: &Path,
    extract: Option<&Path>,
    apply: Option<&Path>,
    output: Option<&Path>,
    yes: bool,
) -> Result<()> {
    let mut workspace = load_workspace(file, yes)?;
    match (extract, apply) {
        (Some(target), None) => {
            let engine = active_engine(&mut workspace)?;
            let layout = positions(engine.graph());
            fs::write(target, serde_json::to_string_pretty(&layout)?)?;
            println!(
                "{} Wrote {} positions to {}",
                "✓".green(),
                layout.len(),
                target.display()
            );
            Ok(())
        }
        (None, Some(source)) => {
            let layout: LayoutDocument = serde_json::from_str(&fs::read_to_string(source)?)?;
            let applied = {
                let engine = active_engine(&mut workspace)?;
                apply_layout(engine.graph_mut(), &layout)
            };
            println!("{} Applied {} positions", "✓".green(), applied);
            save_workspace(&workspace, file, output, yes)
        }
        _ => Err("pass exactly one of --extract or --apply".into()),
    }
}
