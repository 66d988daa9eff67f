//! mongolens binary entry point

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use mongolens::cli::commands::analyze::{AnalyzeArgs, handle_analyze};
use mongolens::cli::commands::infer::{InferArgs, handle_infer};
use mongolens::inference::{DEFAULT_MAX_DEPTH, DEFAULT_SAMPLE_SIZE};

#[derive(Parser, Debug)]
#[command(
    name = "mongolens",
    version,
    about = "Schema discovery and enrichment for MongoDB collections",
    long_about = None
)]
struct Cli {
    /// Log level when RUST_LOG is not set
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze every collection of an exported database
    Analyze {
        /// Path to the export directory
        #[arg(short, long)]
        source: PathBuf,

        /// TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory to persist the analysis artifact into
        #[arg(long)]
        store: Option<PathBuf>,

        /// Disable enrichment regardless of configuration
        #[arg(long)]
        no_enrich: bool,

        /// Print the per-field detail for every collection
        #[arg(long)]
        detail: bool,
    },

    /// Infer the structural schema of one collection
    Infer {
        /// Path to the export directory
        #[arg(short, long)]
        source: PathBuf,

        /// Collection to analyze
        #[arg(short, long)]
        collection: String,

        /// Sample size for inference
        #[arg(long, default_value_t = DEFAULT_SAMPLE_SIZE)]
        sample_size: usize,

        /// Maximum depth for nested documents
        #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
        max_depth: usize,

        /// Output format (json, yaml)
        #[arg(short, long, default_value = "json")]
        format: String,

        /// Output file path (stdout if not provided)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| anyhow::anyhow!("Invalid log level: {}", e))?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;

    let result = match cli.command {
        Commands::Analyze {
            source,
            config,
            store,
            no_enrich,
            detail,
        } => {
            handle_analyze(&AnalyzeArgs {
                source,
                config,
                store,
                no_enrich,
                detail,
            })
            .await
        }
        Commands::Infer {
            source,
            collection,
            sample_size,
            max_depth,
            format,
            output,
        } => {
            handle_infer(&InferArgs {
                source,
                collection,
                sample_size,
                max_depth,
                format,
                output,
            })
            .await
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
