//! termbook CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

mod commands;
mod shell;

#[derive(Parser)]
#[command(name = "termbook", version, about = "In-memory student records manager")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Snapshot export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// Pretty-printed JSON snapshot
    Json,
    /// One fully populated row per student, term, and subject
    Csv,
    /// CSV with repeated identity and term values blanked
    Grouped,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive menu (default)
    Shell {
        /// Snapshot to load before the first prompt
        #[arg(long)]
        load: Option<PathBuf>,
    },

    /// Convert a snapshot to JSON or CSV
    Export {
        /// Snapshot JSON to read (default: configured snapshot_path)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        /// Output file
        #[arg(long)]
        output: PathBuf,
    },

    /// Print a student's report
    Report {
        /// Snapshot JSON to read (default: configured snapshot_path)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Student ID
        #[arg(long)]
        student: String,

        /// Print the final report with averages and term toppers
        #[arg(long = "final")]
        final_report: bool,
    },

    /// Rank a batch by overall average
    Rank {
        /// Snapshot JSON to read (default: configured snapshot_path)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Batch label
        #[arg(long)]
        batch: String,
    },

    /// Show the topper for a term
    Topper {
        /// Snapshot JSON to read (default: configured snapshot_path)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Term name
        #[arg(long)]
        term: String,
    },

    /// Create a starter termbook.toml
    Init,
}

fn main() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    let result = match cli.command {
        None => commands::shell::execute(None, config),
        Some(Commands::Shell { load }) => commands::shell::execute(load, config),
        Some(Commands::Export {
            input,
            format,
            output,
        }) => commands::export::execute(input, format, output, config),
        Some(Commands::Report {
            input,
            student,
            final_report,
        }) => commands::report::execute(input, student, final_report, config),
        Some(Commands::Rank { input, batch }) => commands::rank::execute(input, batch, config),
        Some(Commands::Topper { input, term }) => commands::topper::execute(input, term, config),
        Some(Commands::Init) => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
