// taxalign CLI - headless catalog taxonomy alignment

mod exit_codes;
mod recon;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use taxalign_recon::config::DEFAULT_SIMILARITY_THRESHOLD;
use tracing_subscriber::EnvFilter;

use exit_codes::EXIT_SUCCESS;
use recon::OutputOptions;

#[derive(Parser)]
#[command(name = "taxalign")]
#[command(about = "Align category, attribute and value taxonomies between two catalogs")]
#[command(version)]
struct Cli {
    /// Log matching progress to stderr (RUST_LOG overrides)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Match two catalogs described by a .match.toml run file
    #[command(after_help = "\
Examples:
  taxalign run amazon-flipkart.match.toml
  taxalign run amazon-flipkart.match.toml --json
  taxalign run amazon-flipkart.match.toml --output result.json --report report.txt

Catalog and output paths in the run file are relative to the run file.")]
    Run {
        /// Path to .match.toml run file
        config: PathBuf,

        /// Print the result as JSON on stdout instead of the report
        #[arg(long)]
        json: bool,

        /// Write the JSON result to this path (overrides [output] json)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Write the text report to this path (overrides [output] report)
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Match two catalog files directly
    #[command(after_help = "\
Examples:
  taxalign match amazon.json flipkart.json
  taxalign match amazon.json flipkart.json --threshold 0.8 --json
  taxalign match a.json b.json --output result.json --report report.txt")]
    Match {
        /// Source catalog JSON
        source: PathBuf,

        /// Target catalog JSON
        target: PathBuf,

        /// Minimum similarity for a pair to be accepted, in [0, 1]
        #[arg(long, short = 't', default_value_t = DEFAULT_SIMILARITY_THRESHOLD)]
        threshold: f64,

        /// Print the result as JSON on stdout instead of the report
        #[arg(long)]
        json: bool,

        /// Write the JSON result to this path
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Write the text report to this path
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Compare match counts across several thresholds
    #[command(after_help = "\
Examples:
  taxalign sweep amazon.json flipkart.json
  taxalign sweep amazon.json flipkart.json --thresholds 0.4,0.6,0.8 --json")]
    Sweep {
        /// Source catalog JSON
        source: PathBuf,

        /// Target catalog JSON
        target: PathBuf,

        /// Comma-separated thresholds, each in [0, 1]
        #[arg(long, value_delimiter = ',', default_value = "0.5,0.7,0.9")]
        thresholds: Vec<f64>,

        /// Print one JSON row per threshold
        #[arg(long)]
        json: bool,
    },

    /// Check a run file and both catalogs without matching
    #[command(after_help = "\
Examples:
  taxalign validate amazon-flipkart.match.toml")]
    Validate {
        /// Path to .match.toml run file
        config: PathBuf,
    },
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    // Stdout carries results only.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Run { config, json, output, report } => {
            recon::cmd_run(config, OutputOptions { json, output, report })
        }
        Commands::Match { source, target, threshold, json, output, report } => {
            recon::cmd_match(source, target, threshold, OutputOptions { json, output, report })
        }
        Commands::Sweep { source, target, thresholds, json } => {
            recon::cmd_sweep(source, target, thresholds, json)
        }
        Commands::Validate { config } => recon::cmd_validate(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}
