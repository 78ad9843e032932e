//! hashvp CLI: build a TLSH similarity index from the abuse.ch export and
//! query it once, interactively, or over HTTP.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use hashvp::config;
use hashvp::ingest::read_samples_path;
use hashvp::output::{find_matches, render, OutputFormat};
use hashvp::server::{serve, ServeConfig};
use hashvp::store::{load_tree, save_tree};
use hashvp::SampleTree;

#[derive(Parser)]
#[command(name = "hashvp")]
#[command(about = "Find malware samples with similar TLSH fuzzy hashes")]
#[command(version)]
struct Cli {
    /// Log filter (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = config::DEFAULT_LOG_LEVEL)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build an index from the abuse.ch CSV export
    Generate {
        /// Path to the abuse.ch CSV export
        #[arg(short, long, default_value = config::DEFAULT_CSV_PATH)]
        csv: PathBuf,

        /// Index file to write
        #[arg(short, long, default_value = config::DEFAULT_TREE_PATH)]
        tree: PathBuf,

        /// Overwrite an existing index
        #[arg(short, long)]
        force: bool,

        /// Random seed for a reproducible tree shape
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Compare one hash against the index and exit
    Query {
        /// Index file to read
        #[arg(short, long, default_value = config::DEFAULT_TREE_PATH)]
        tree: PathBuf,

        /// TLSH digest to look up
        #[arg(short = 's', long)]
        tlsh: String,

        /// Number of neighbors to print
        #[arg(short, long, default_value_t = config::DEFAULT_COUNT)]
        count: u16,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },

    /// Read hashes from stdin, one per line, until EOF
    Interactive {
        /// Index file to read
        #[arg(short, long, default_value = config::DEFAULT_TREE_PATH)]
        tree: PathBuf,

        /// Number of neighbors to print per hash
        #[arg(short, long, default_value_t = config::DEFAULT_COUNT)]
        count: u16,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },

    /// Serve queries over HTTP
    Serve {
        /// Index file to read
        #[arg(short, long, default_value = config::DEFAULT_TREE_PATH)]
        tree: PathBuf,

        /// Address to listen on
        #[arg(short, long, default_value = config::DEFAULT_LISTEN_ADDR)]
        listen: String,

        /// Path the query endpoint is mounted on
        #[arg(short, long, default_value = config::DEFAULT_BASE_PATH)]
        base_path: String,

        /// TLS certificate file (PEM)
        #[arg(long)]
        tls_cert: Option<PathBuf>,

        /// TLS private key file (PEM)
        #[arg(long)]
        tls_key: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .unwrap_or_else(|_| EnvFilter::new(config::DEFAULT_LOG_LEVEL));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let result = match cli.command {
        Commands::Generate { csv, tree, force, seed } => cmd_generate(&csv, &tree, force, seed),
        Commands::Query { tree, tlsh, count, format } => cmd_query(&tree, &tlsh, count, format),
        Commands::Interactive { tree, count, format } => cmd_interactive(&tree, count, format),
        Commands::Serve { tree, listen, base_path, tls_cert, tls_key } => {
            cmd_serve(&tree, ServeConfig { listen, base_path, tls_cert, tls_key })
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn load(path: &Path) -> anyhow::Result<SampleTree> {
    load_tree(path).with_context(|| format!("failed to load index {}", path.display()))
}

fn cmd_generate(csv: &Path, tree_path: &Path, force: bool, seed: Option<u64>)
                -> anyhow::Result<()> {
    if tree_path.exists() && !force {
        tracing::info!(path = %tree_path.display(), "index already exists and --force not given, nothing to do");
        return Ok(());
    }

    let start = Instant::now();
    let report = read_samples_path(csv)
        .with_context(|| format!("failed to read {}", csv.display()))?;
    let tree = match seed {
        Some(seed) => SampleTree::with_seed(report.samples, seed),
        None => SampleTree::new(report.samples),
    };
    tracing::info!(items = tree.len(), depth = tree.depth(),
                   elapsed_ms = start.elapsed().as_millis() as u64, "built index");

    save_tree(&tree, tree_path)
        .with_context(|| format!("failed to write {}", tree_path.display()))?;
    Ok(())
}

fn cmd_query(tree_path: &Path, hash: &str, count: u16, format: OutputFormat)
             -> anyhow::Result<()> {
    let tree = load(tree_path)?;
    let matches = find_matches(&tree, hash, usize::from(count))
        .with_context(|| format!("invalid hash {:?}", hash))?;
    print!("{}", render(&matches, format)?);
    Ok(())
}

fn cmd_interactive(tree_path: &Path, count: u16, format: OutputFormat) -> anyhow::Result<()> {
    let tree = load(tree_path)?;
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut stdout = io::stdout();

    loop {
        eprint!("Enter TLSH: ");
        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };
        if line.trim().is_empty() {
            continue;
        }
        match find_matches(&tree, &line, usize::from(count)) {
            Ok(matches) => {
                stdout.write_all(render(&matches, format)?.as_bytes())?;
                stdout.flush()?;
            }
            Err(e) => tracing::warn!(input = %line.trim(), "{}", e),
        }
    }
    eprintln!();
    Ok(())
}

fn cmd_serve(tree_path: &Path, config: ServeConfig) -> anyhow::Result<()> {
    config.validate()?;
    let tree = Arc::new(load(tree_path)?);
    if tree.is_empty() {
        tracing::warn!(path = %tree_path.display(), "index contains no samples, every query will come back empty");
    }

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(serve(tree, &config))?;
    Ok(())
}
