use clap::{Parser, ValueEnum};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

use mimalloc::MiMalloc;
use treeedit::{
    InputFormat, ReportOptions, SearchOptions, Tree, enumerate_with, parse_tree, read_tree_pair,
    write_report,
};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[command(name = "treeedit")]
#[command(about = "Enumerate every structure-preserving mapping between two ordered trees", long_about = None)]
#[command(version)]
struct Cli {
    /// File holding the source and target trees (.gz accepted)
    #[arg(value_name = "INPUT", required_unless_present = "t1", conflicts_with_all = ["t1", "t2"])]
    input: Option<PathBuf>,

    /// Layout of INPUT
    #[arg(short = 'f', long, value_enum, default_value_t = Format::Auto)]
    format: Format,

    /// Source tree in bracket notation, e.g. "a(b, c)"
    #[arg(long, value_name = "TREE", requires = "t2")]
    t1: Option<String>,

    /// Target tree in bracket notation
    #[arg(long, value_name = "TREE", requires = "t1")]
    t2: Option<String>,

    // ===== Search limits =====
    /// Stop after trying this many candidates
    #[arg(long, value_name = "INT")]
    max_steps: Option<u64>,

    /// Stop after this many mappings
    #[arg(long, value_name = "INT")]
    max_solutions: Option<usize>,

    // ===== Output =====
    /// Print only the minimum-cost mapping
    #[arg(long)]
    min_only: bool,

    /// Print the edit script of the minimum-cost mapping
    #[arg(long)]
    script: bool,

    /// Verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Auto,
    Parents,
    Edges,
}

impl From<Format> for InputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Auto => InputFormat::Auto,
            Format::Parents => InputFormat::ParentRecords,
            Format::Edges => InputFormat::EdgeList,
        }
    }
}

fn load_trees(cli: &Cli) -> Result<(Tree, Tree), String> {
    match (&cli.input, &cli.t1, &cli.t2) {
        (Some(path), _, _) => read_tree_pair(path, cli.format.into()).map_err(|e| e.to_string()),
        (None, Some(t1), Some(t2)) => {
            let t1 = parse_tree(t1).map_err(|e| format!("source tree: {}", e))?;
            let t2 = parse_tree(t2).map_err(|e| format!("target tree: {}", e))?;
            Ok((t1, t2))
        }
        _ => Err("either INPUT or both --t1 and --t2 are required".to_string()),
    }
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp(None)
        .format_target(false)
        .init();

    let (t1, mut t2) = match load_trees(&cli) {
        Ok(trees) => trees,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };
    log::info!("source tree: {} nodes, target tree: {} nodes", t1.len(), t2.len());

    let search = SearchOptions {
        max_steps: cli.max_steps,
        max_solutions: cli.max_solutions,
    };
    let start = Instant::now();
    let result = enumerate_with(&t1, &mut t2, search);
    log::debug!(
        "search finished in {:.3}s ({:?})",
        start.elapsed().as_secs_f64(),
        result.status
    );

    let options = ReportOptions {
        min_only: cli.min_only,
        script: cli.script,
    };
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    if let Err(e) = write_report(&mut out, &t1, &t2, &result, &options).and_then(|()| out.flush())
    {
        log::error!("Failed to write report: {}", e);
        std::process::exit(1);
    }
}
