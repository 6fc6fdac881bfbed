//! Blueprint execution-flow tracer CLI.
//!
//! Provides the `bpflow` binary. Graphs are loaded from a JSON file or a
//! directory of JSON files; `trace` prints a full document for one graph,
//! `entries` lists its entry nodes and `locations` lists every loaded graph.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::Level;

use bpflow_core::NodeId;
use bpflow_store::{load_path, GraphProvider, InMemoryProvider};
use bpflow_trace::{DocumentBuilder, OutputMode, TraceConfig, TraceError};

/// Blueprint execution-flow tracer.
#[derive(Parser)]
#[command(name = "bpflow", about = "Symbolic execution traces for Blueprint graphs")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Markdown,
    Html,
    Plain,
}

impl From<Format> for OutputMode {
    fn from(format: Format) -> Self {
        match format {
            Format::Markdown => OutputMode::Markdown,
            Format::Html => OutputMode::Html,
            Format::Plain => OutputMode::Plain,
        }
    }
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Trace a graph and print the document with all referenced definitions.
    Trace {
        /// Graph JSON file or directory of JSON files.
        #[arg(short, long)]
        graphs: PathBuf,

        /// Location key of the root graph, e.g. `/Game/MyAsset:EventGraph`.
        #[arg(short, long)]
        location: String,

        /// Start node id (default: every entry node).
        #[arg(short, long)]
        start: Option<String>,

        /// Output format.
        #[arg(short, long, value_enum, default_value = "markdown")]
        format: Format,

        /// JSON file with trace settings; flags below override it.
        #[arg(long)]
        config: Option<PathBuf>,

        /// List every argument, including trivial defaults.
        #[arg(long)]
        show_all: bool,

        /// Summarize calls into user sub-graphs instead of expanding them.
        #[arg(long)]
        symbolic: bool,

        /// Trace collapsed graphs in place.
        #[arg(long)]
        inline_collapsed: bool,
    },

    /// List the entry nodes of a graph.
    Entries {
        /// Graph JSON file or directory of JSON files.
        #[arg(short, long)]
        graphs: PathBuf,

        /// Location key of the graph.
        #[arg(short, long)]
        location: String,
    },

    /// List the location keys of every loaded graph.
    Locations {
        /// Graph JSON file or directory of JSON files.
        #[arg(short, long)]
        graphs: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match cli.command {
        Commands::Trace {
            graphs,
            location,
            start,
            format,
            config,
            show_all,
            symbolic,
            inline_collapsed,
        } => {
            let overrides = Overrides {
                show_all,
                symbolic,
                inline_collapsed,
            };
            run_trace(
                &graphs,
                &location,
                start.map(NodeId::new),
                format.into(),
                config.as_deref(),
                overrides,
            )
        }
        Commands::Entries { graphs, location } => run_entries(&graphs, &location),
        Commands::Locations { graphs } => run_locations(&graphs),
    };
    process::exit(exit_code);
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();
}

/// Command-line switches layered over the config file.
struct Overrides {
    show_all: bool,
    symbolic: bool,
    inline_collapsed: bool,
}

fn load_config(path: Option<&Path>, overrides: Overrides) -> Result<TraceConfig, String> {
    let mut config = match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .map_err(|e| format!("failed to read config '{}': {}", path.display(), e))?;
            serde_json::from_str(&text)
                .map_err(|e| format!("invalid config '{}': {}", path.display(), e))?
        }
        None => TraceConfig::default(),
    };
    config.show_all_arguments |= overrides.show_all;
    config.symbolic |= overrides.symbolic;
    config.inline_collapsed_graphs |= overrides.inline_collapsed;
    Ok(config)
}

fn load_graphs(path: &Path) -> Result<InMemoryProvider, i32> {
    load_path(path).map_err(|e| {
        eprintln!("Error: failed to load graphs from '{}': {}", path.display(), e);
        3
    })
}

/// Execute the trace subcommand.
///
/// Returns exit code: 0 = success, 1 = trace error (unknown graph or start
/// node), 3 = I/O or parse error.
fn run_trace(
    graphs: &Path,
    location: &str,
    start: Option<NodeId>,
    mode: OutputMode,
    config_path: Option<&Path>,
    overrides: Overrides,
) -> i32 {
    let config = match load_config(config_path, overrides) {
        Ok(config) => config,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return 3;
        }
    };
    let provider = match load_graphs(graphs) {
        Ok(provider) => provider,
        Err(code) => return code,
    };

    match DocumentBuilder::new(&provider, config).build(location, start.as_ref()) {
        Ok(document) => {
            let renderer = mode.renderer();
            print!("{}", document.render(renderer.as_ref()));
            0
        }
        Err(e @ TraceError::GraphNotFound { .. }) => {
            eprintln!("Error: {}", e);
            eprintln!("Known locations:");
            for loc in provider.locations() {
                eprintln!("  {}", loc);
            }
            1
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

/// Execute the entries subcommand.
fn run_entries(graphs: &Path, location: &str) -> i32 {
    let provider = match load_graphs(graphs) {
        Ok(provider) => provider,
        Err(code) => return code,
    };
    let graph = match provider.require(location) {
        Ok(graph) => graph,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    for id in graph.entry_nodes() {
        if let Some(view) = graph.view(&id) {
            println!("{}\t{}\t{}", id, view.kind().as_str(), view.name());
        }
    }
    0
}

/// Execute the locations subcommand.
fn run_locations(graphs: &Path) -> i32 {
    let provider = match load_graphs(graphs) {
        Ok(provider) => provider,
        Err(code) => return code,
    };
    for location in provider.locations() {
        println!("{}", location);
    }
    0
}
