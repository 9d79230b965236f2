//! unitdrill CLI — terminal vocabulary flashcard drill.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::DataArgs;

#[derive(Parser)]
#[command(name = "unitdrill", version, about = "Vocabulary flashcard drill, one unit at a time")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the units in the vocabulary file
    Units {
        #[command(flatten)]
        source: DataArgs,
    },

    /// Drill a unit interactively on stdin/stdout
    Drill {
        /// Unit to start immediately (otherwise choose interactively)
        #[arg(long, allow_negative_numbers = true)]
        unit: Option<i64>,

        #[command(flatten)]
        source: DataArgs,
    },

    /// Print the normalized vocabulary as JSON
    Normalize {
        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        source: DataArgs,
    },

    /// Check the vocabulary file for authoring issues
    Validate {
        #[command(flatten)]
        source: DataArgs,
    },

    /// Create starter config and sample vocabulary
    Init,
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("unitdrill=info,unitdrill_core=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Units { source } => commands::units::execute(source),
        Commands::Drill { unit, source } => commands::drill::execute(unit, source),
        Commands::Normalize { output, source } => commands::normalize::execute(output, source),
        Commands::Validate { source } => commands::validate::execute(source),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
