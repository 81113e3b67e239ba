//! Ontoview CLI - Explore an ontology graph from the command line
//!
//! Loads session or view documents (or fetches a fresh graph from a SPARQL
//! endpoint), applies wayfinding operations to them and writes the
//! resulting state back as a document.

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "ontoview")]
#[command(author = "Ontoview Contributors")]
#[command(version)]
#[command(about = "Wayfinding and highlighting for ontology graphs", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Answer all confirmation prompts with yes
    #[arg(short, long, global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Star edge direction on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum DirectionArg {
    In,
    Out,
    Both,
}

impl From<DirectionArg> for ontoview_engine::Direction {
    fn from(value: DirectionArg) -> Self {
        match value {
            DirectionArg::In => Self::In,
            DirectionArg::Out => Self::Out,
            DirectionArg::Both => Self::Both,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the ontology from a SPARQL endpoint into a view document
    Fetch {
        /// SPARQL endpoint URL
        #[arg(short, long)]
        endpoint: String,

        /// SPARQL graphs to draw from (FROM clauses)
        #[arg(short, long)]
        graph: Vec<String>,

        /// Title of the created view
        #[arg(short, long, default_value = "Ontology")]
        title: String,

        /// Output file
        #[arg(short, long, default_value = "ontoview.json")]
        output: PathBuf,
    },

    /// Show statistics of a session or view document
    Info {
        /// Session or view document
        file: PathBuf,
    },

    /// Show a shortest path between two classes
    Path {
        /// Session or view document
        file: PathBuf,

        /// Path source URI
        #[arg(long)]
        from: String,

        /// Path target URI
        #[arg(long)]
        to: String,

        /// Also show the star around every path node
        #[arg(long)]
        star_path: bool,

        /// Output file (defaults to the input file)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the star around one or more classes
    Star {
        /// Session or view document
        file: PathBuf,

        /// Center URIs
        #[arg(required = true)]
        uris: Vec<String>,

        /// Arrange the star concentrically
        #[arg(long)]
        relayout: bool,

        /// Which edges of the center to follow
        #[arg(long, value_enum, default_value = "both")]
        direction: DirectionArg,

        /// Star into a freshly spawned view instead of the active one
        #[arg(long)]
        new_view: bool,

        /// Output file (defaults to the input file)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show a path with a star around the target (worm), or around both
    /// endpoints (double star)
    Worm {
        /// Session or view document
        file: PathBuf,

        /// Path source URI
        #[arg(long)]
        from: String,

        /// Path target URI
        #[arg(long)]
        to: String,

        /// Star the source as well
        #[arg(long)]
        double: bool,

        /// Output file (defaults to the input file)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Center and highlight classes by URI
    Present {
        /// Session or view document
        file: PathBuf,

        /// URIs to present
        #[arg(required = true)]
        uris: Vec<String>,

        /// Hide everything but the presented classes
        #[arg(long)]
        hide_others: bool,

        /// Output file (defaults to the input file)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Group close matches in compound nodes, or ungroup them
    Combine {
        /// Session or view document
        file: PathBuf,

        /// Ungroup instead of grouping
        #[arg(long)]
        off: bool,

        /// Output file (defaults to the input file)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Search classes by label
    Search {
        /// Session or view document
        file: PathBuf,

        /// Search query
        query: String,

        /// Maximum results to print
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Extract or apply a layout document
    Layout {
        /// Session or view document
        file: PathBuf,

        /// Write the node positions to this file
        #[arg(long, conflicts_with = "apply")]
        extract: Option<PathBuf>,

        /// Apply the node positions from this file
        #[arg(long)]
        apply: Option<PathBuf>,

        /// Output file (defaults to the input file)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();

    let yes = cli.yes;
    let result = match cli.command {
        Commands::Fetch {
            endpoint,
            graph,
            title,
            output,
        } => commands::fetch(&endpoint, &graph, &title, &output, yes).await,
        Commands::Info { file } => commands::info(&file),
        Commands::Path {
            file,
            from,
            to,
            star_path,
            output,
        } => commands::path(&file, &from, &to, star_path, output.as_deref(), yes),
        Commands::Star {
            file,
            uris,
            relayout,
            direction,
            new_view,
            output,
        } => commands::star(
            &file,
            &uris,
            relayout,
            direction.into(),
            new_view,
            output.as_deref(),
            yes,
        ),
        Commands::Worm {
            file,
            from,
            to,
            double,
            output,
        } => commands::worm(&file, &from, &to, double, output.as_deref(), yes),
        Commands::Present {
            file,
            uris,
            hide_others,
            output,
        } => commands::present(&file, &uris, hide_others, output.as_deref(), yes),
        Commands::Combine { file, off, output } => {
            commands::combine(&file, off, output.as_deref(), yes)
        }
        Commands::Search { file, query, limit } => commands::search(&file, &query, limit),
        Commands::Layout {
            file,
            extract,
            apply,
            output,
        } => commands::layout(&file, extract.as_deref(), apply.as_deref(), output.as_deref(), yes),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}
