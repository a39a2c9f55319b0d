//! Patchwork CLI - half-edge mesh editing from the command line.
//!
//! Usage: patchwork [OPTIONS] <COMMAND> <INPUT>
//!
//! Run `patchwork --help` for available commands.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use patchwork::algo::{Progress, SubdivideOptions};
use patchwork::mesh::{EdgeId, PatchId};
use patchwork::session::{EditSession, SessionOptions};
use patchwork::DEFAULT_COLOR_SEED;

#[derive(Parser)]
#[command(name = "patchwork")]
#[command(author, version, about = "Half-edge mesh editing CLI", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    /// Seed for patch colors
    #[arg(long, default_value_t = DEFAULT_COLOR_SEED)]
    seed: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display mesh information
    Info {
        /// Input OBJ file
        input: PathBuf,
    },

    /// Apply Catmull-Clark subdivision
    Subdivide {
        /// Input OBJ file
        input: PathBuf,

        /// Number of subdivision iterations
        #[arg(short, long, default_value = "1")]
        iterations: usize,
    },

    /// Fan-triangulate one patch, or every patch
    Triangulate {
        /// Input OBJ file
        input: PathBuf,

        /// Patch to triangulate (default: all patches)
        #[arg(short, long)]
        patch: Option<usize>,
    },

    /// Split a half-edge at its midpoint
    Split {
        /// Input OBJ file
        input: PathBuf,

        /// Half-edge to split
        #[arg(short, long)]
        edge: usize,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(log_level: &str) {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Warning: logging unavailable: {}", e);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let options = SessionOptions::default().with_color_seed(cli.seed);

    match cli.command {
        Commands::Info { input } => {
            cmd_info(&input, options)?;
        }

        Commands::Subdivide { input, iterations } => {
            cmd_subdivide(&input, options, iterations)?;
        }

        Commands::Triangulate { input, patch } => {
            cmd_triangulate(&input, options, patch)?;
        }

        Commands::Split { input, edge } => {
            cmd_split(&input, options, edge)?;
        }
    }

    Ok(())
}

fn open(
    input: &PathBuf,
    options: SessionOptions,
) -> Result<EditSession, Box<dyn std::error::Error>> {
    let mut session = EditSession::new(options);
    session.load(input)?;
    Ok(session)
}

/// Create a progress reporter that draws a bar on stderr.
fn create_progress() -> Progress {
    Progress::new(move |current, total, message| {
        if total == 0 {
            return;
        }

        let bar_width = 30;
        let filled = (current.min(total) * bar_width) / total;
        let bar: String = "=".repeat(filled);
        let space: String = " ".repeat(bar_width - filled);

        eprint!("\r[{}{}] {}/{} {}", bar, space, current, total, message);
        let _ = std::io::stderr().flush();

        if current >= total {
            eprintln!();
        }
    })
}

fn print_counts(session: &EditSession) {
    let mesh = session.mesh();
    println!("Nodes: {}", mesh.num_nodes());
    println!("Half-edges: {}", mesh.num_edges());
    println!("Patches: {}", mesh.num_patches());
}

fn cmd_info(input: &PathBuf, options: SessionOptions) -> Result<(), Box<dyn std::error::Error>> {
    let session = open(input, options)?;
    let mesh = session.mesh();

    println!("File: {}", input.display());
    print_counts(&session);

    let boundary = mesh.num_boundary_edges();
    if boundary == 0 {
        println!("Topology: Closed (no boundary)");
    } else {
        println!("Topology: Open ({} boundary half-edges)", boundary);
    }

    let mut histogram: BTreeMap<usize, usize> = BTreeMap::new();
    for p in mesh.patch_ids() {
        *histogram.entry(mesh.patch_degree(p)?).or_default() += 1;
    }
    println!("Patch sizes:");
    for (sides, count) in &histogram {
        println!("  {}-gon: {}", sides, count);
    }

    if let Some((min, max)) = mesh.bounding_box() {
        println!(
            "Bounding box: ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
            min.x, min.y, min.z, max.x, max.y, max.z
        );
    }

    let buffers = session.buffers();
    println!(
        "Render buffers: {} vertices, {} triangles",
        buffers.num_vertices(),
        buffers.num_triangles()
    );

    match mesh.validate() {
        Ok(()) => println!("Connectivity: OK"),
        Err(problem) => println!("Connectivity: {}", problem),
    }

    Ok(())
}

fn cmd_subdivide(
    input: &PathBuf,
    options: SessionOptions,
    iterations: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = options.with_subdivide(SubdivideOptions::new(iterations));
    let mut session = open(input, options)?;
    println!(
        "Loaded: {} nodes, {} patches",
        session.mesh().num_nodes(),
        session.mesh().num_patches()
    );

    let progress = create_progress();
    let start = Instant::now();
    session.subdivide_with_progress(&progress)?;

    println!("Subdivided {} time(s) in {:.2?}", iterations, start.elapsed());
    print_counts(&session);
    println!("Render buffers: {} triangles", session.buffers().num_triangles());
    Ok(())
}

fn cmd_triangulate(
    input: &PathBuf,
    options: SessionOptions,
    patch: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open(input, options)?;

    let targets: Vec<PatchId> = match patch {
        Some(p) => vec![PatchId::try_from(p)?],
        None => session.mesh().patch_ids().collect(),
    };

    let mut created = 0;
    for p in targets {
        session.select_patch(p)?;
        created += session.triangulate_selected_patch()?.len() - 1;
    }

    println!("Created {} triangle patch(es)", created);
    print_counts(&session);
    Ok(())
}

fn cmd_split(
    input: &PathBuf,
    options: SessionOptions,
    edge: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open(input, options)?;

    session.select_edge(EdgeId::try_from(edge)?)?;
    let node = session.split_selected_edge()?;

    let p = session.mesh().position(node);
    println!("New node {} at ({:.6}, {:.6}, {:.6})", node.index(), p.x, p.y, p.z);
    print_counts(&session);
    Ok(())
}
