#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use std::env;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "phylonet: recognize classes of rooted phylogenetic networks",
    long_about = None
)]
struct Cli {
    /// Enable debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Classify edge-list files",
        long_about = "Classify one or more edge-list files, or every file in a directory. \
                      Each network yields one report line: the file name followed by the \
                      requested property values.",
        after_help = "EXAMPLES:\n    # Classify one network\n    phylonet classify net.txt\n\n    # Classify a folder, numerics only\n    phylonet classify --dir data/ --props r,lvl,nd\n\n    # Emit JSON and skip the results file\n    phylonet classify net.txt --format json --no-append"
    )]
    Classify(cmd::classify::ClassifyArgs),

    #[command(
        about = "Generate and classify random binary networks",
        long_about = "Generate random binary networks whose reticulation number is drawn \
                      from an exponential distribution, then classify them.",
        after_help = "EXAMPLES:\n    # 51 vertices, mean reticulation number 5.1\n    phylonet random 51\n\n    # Reproducible run with an explicit mean\n    phylonet random 101 --mean 8 --seed 7\n\n    # Print the generated edge list instead\n    phylonet random 21 --seed 1 --edges"
    )]
    Random(cmd::random::RandomArgs),

    #[command(about = "Generate shell completions")]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("PHYLONET_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "phylonet=debug,info"
        } else {
            "phylonet=warn,warn"
        })
    });

    let format = env::var("PHYLONET_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    // stdout carries the report lines.
    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    debug!(command = ?cli.command, "starting");

    let project_root = env::current_dir()?;

    match cli.command {
        Commands::Classify(args) => cmd::classify::run_classify(&args, &project_root),
        Commands::Random(args) => cmd::random::run_random(&args, &project_root),
        Commands::Completions(args) => {
            cmd::completions::run_completions(args.shell, &mut Cli::command())
        }
    }
}
