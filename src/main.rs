use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use graphlab::{
    io, AlgorithmKind, Graph, GraphError, LibraryGraph, Result, RunParams, RunRequest, Runner,
};

/// GraphLab - an educational graph-theory workbench
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an algorithm against a graph
    Run(RunCommand),
    /// List the available algorithms
    List,
    /// Show an algorithm's description and complexity
    Info {
        /// Algorithm name (e.g. "dijkstra")
        algorithm: String,
    },
    /// Built-in library of classic graphs
    Library(LibraryCommand),
    /// Export a saved graph as GraphML
    Export {
        /// Input graph (JSON)
        input: PathBuf,
        /// Output file (GraphML)
        output: PathBuf,
    },
}

#[derive(Args)]
struct RunCommand {
    /// Algorithm name (e.g. "bfs", "bellman-ford")
    #[arg(short, long)]
    algorithm: String,

    /// Graph file to load (JSON)
    #[arg(short, long, conflicts_with = "library")]
    input: Option<PathBuf>,

    /// Built-in library graph to run against
    #[arg(short, long)]
    library: Option<String>,

    /// Start node id (defaults to the lowest id)
    #[arg(short, long)]
    start: Option<u64>,

    /// End node id, for shortest-path queries
    #[arg(short, long)]
    end: Option<u64>,

    /// Print the full execution trace step by step
    #[arg(short, long)]
    trace: bool,

    /// Print the whole run report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct LibraryCommand {
    #[command(subcommand)]
    action: LibraryAction,
}

#[derive(Subcommand)]
enum LibraryAction {
    /// List the library graphs
    List,
    /// Generate a library graph and save it as JSON
    Generate {
        /// Library graph name (e.g. "petersen")
        name: String,
        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    if let Err(err) = dispatch(cli.command) {
        eprintln!("error: {err}");
        process::exit(1);
    }
}

fn dispatch(command: Commands) -> Result<()> {
    match command {
        Commands::Run(cmd) => run_algorithm(cmd),
        Commands::List => list_algorithms(),
        Commands::Info { algorithm } => show_info(&algorithm),
        Commands::Library(cmd) => match cmd.action {
            LibraryAction::List => list_library(),
            LibraryAction::Generate { name, output } => generate_library(&name, &output),
        },
        Commands::Export { input, output } => {
            let graph = io::load_graph(&input)?;
            io::export_graphml(&graph, &output)?;
            println!("exported {} to {}", input.display(), output.display());
            Ok(())
        }
    }
}

fn run_algorithm(cmd: RunCommand) -> Result<()> {
    let graph = load_input(&cmd)?;
    let algorithm: AlgorithmKind = cmd.algorithm.parse()?;

    let params = RunParams {
        start: cmd.start,
        end: cmd.end,
    };
    let runner = Runner::new();
    let report = runner.execute(&graph, &RunRequest::new(algorithm, params))?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("algorithm: {}", report.algorithm);
    println!("result: {}", report.outcome);
    println!(
        "{} steps recorded in {:.2} ms",
        report.trace.len(),
        report.elapsed.as_secs_f64() * 1000.0
    );

    if cmd.trace {
        println!();
        for step in &report.trace {
            let nodes: Vec<String> = step.nodes.iter().map(|&n| graph.label(n)).collect();
            let mut line = format!(
                "  [{:>4}] {:<10} {}",
                step.index,
                step.tag.as_str(),
                nodes.join(", ")
            );
            if !step.edges.is_empty() {
                let edges: Vec<String> = step.edges.iter().map(|e| format!("e{e}")).collect();
                line.push_str(&format!(" via {}", edges.join(", ")));
            }
            if let Some(value) = step.value {
                line.push_str(&format!(" = {value}"));
            }
            println!("{line}");
        }
    }
    Ok(())
}

fn load_input(cmd: &RunCommand) -> Result<Graph> {
    match (&cmd.input, &cmd.library) {
        (Some(path), _) => io::load_graph(path),
        (None, Some(name)) => Ok(name.parse::<LibraryGraph>()?.build()),
        (None, None) => Err(GraphError::invalid_parameter(
            "input",
            "provide either --input <file> or --library <name>",
        )),
    }
}

fn list_algorithms() -> Result<()> {
    let runner = Runner::new();
    println!("available algorithms:");
    for kind in runner.catalog().kinds() {
        let info = runner.info(kind)?;
        println!("  {:<22} {}", kind.to_string(), info.complexity);
    }
    Ok(())
}

fn show_info(algorithm: &str) -> Result<()> {
    let kind: AlgorithmKind = algorithm.parse()?;
    let info = Runner::new().info(kind)?;
    println!("{}", info.description);
    println!();
    println!("{}", info.complexity);
    Ok(())
}

fn list_library() -> Result<()> {
    println!("library graphs:");
    for entry in LibraryGraph::ALL {
        let graph = entry.build();
        println!(
            "  {:<14} {} nodes, {} edges",
            entry.to_string(),
            graph.node_count(),
            graph.edge_count()
        );
    }
    Ok(())
}

fn generate_library(name: &str, output: &PathBuf) -> Result<()> {
    let graph = name.parse::<LibraryGraph>()?.build();
    io::save_graph(&graph, output)?;
    println!("wrote {} to {}", name, output.display());
    Ok(())
}
