//! kbench - correctness-checked k-means benchmark harness
//!
//! ## Commands
//!
//! - `run`: build every candidate, obtain the reference checksum, benchmark and report
//! - `dataset`: generate a random integer dataset
//! - `init-config`: print or write the default configuration

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use kbench::dataset::{generate_dataset, DatasetSpec};
use kbench::{render_table, BenchConfig, Campaign, CampaignOptions, SystemRunner};
use std::path::{Path, PathBuf};
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "kbench")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Correctness-checked benchmark harness for k-means implementations", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build, validate and benchmark every candidate
    Run {
        /// Configuration file (TOML); built-in defaults when omitted
        #[arg(short, long, env = "KBENCH_CONFIG")]
        config: Option<PathBuf>,

        /// Override the number of runs per candidate
        #[arg(short, long)]
        runs: Option<u32>,

        /// Override the per-run timeout in seconds (0 disables)
        #[arg(long)]
        timeout: Option<u64>,

        /// Override the detected worker count
        #[arg(long)]
        workers: Option<usize>,

        /// Use existing artifacts instead of building
        #[arg(long)]
        skip_build: bool,

        /// Disable coloured output
        #[arg(long)]
        no_color: bool,

        /// Also write the report as JSON to this path
        #[arg(long)]
        json_out: Option<PathBuf>,
    },

    /// Generate a random dataset of integer points
    Dataset {
        /// Number of points
        #[arg(short, long)]
        points: u64,

        /// Dimensions per point
        #[arg(short, long)]
        dimensions: u32,

        /// Largest coordinate value (inclusive)
        #[arg(short, long, default_value = "10000")]
        max_value: u32,

        /// Output file
        #[arg(short, long, default_value = "dataset.txt")]
        output: PathBuf,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Print the default configuration as TOML
    InitConfig {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    kbench::init_tracing(cli.json, level);

    match cli.command {
        Commands::Run {
            config,
            runs,
            timeout,
            workers,
            skip_build,
            no_color,
            json_out,
        } => {
            let mut bench_config = load_config(config.as_deref())?;
            if let Some(runs) = runs {
                bench_config.repetitions = runs;
            }
            if let Some(timeout) = timeout {
                bench_config.timeout_secs = timeout;
            }
            if workers.is_some() {
                bench_config.workers = workers;
            }
            cmd_run(&bench_config, skip_build, !no_color, json_out.as_deref()).await
        }
        Commands::Dataset {
            points,
            dimensions,
            max_value,
            output,
            seed,
        } => cmd_dataset(points, dimensions, max_value, &output, seed),
        Commands::InitConfig { output } => cmd_init_config(output.as_deref()),
    }
}

/// Load configuration from a TOML file, or fall back to the built-in defaults.
fn load_config(path: Option<&Path>) -> Result<BenchConfig> {
    match path {
        Some(path) => BenchConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration from {:?}", path)),
        None => Ok(BenchConfig::default()),
    }
}

/// Run a full benchmark campaign and print the comparison table
async fn cmd_run(
    config: &BenchConfig,
    skip_build: bool,
    color: bool,
    json_out: Option<&Path>,
) -> Result<()> {
    let options = CampaignOptions { skip_build };
    let result = Campaign::run(&SystemRunner, config, options)
        .await
        .context("Benchmark campaign aborted")?;

    println!();
    print!("{}", render_table(&result.report, color));
    println!(
        "Campaign {} finished in {}ms ({} failed runs)",
        result.report.campaign_id,
        result.duration_ms,
        result.failed_attempts()
    );

    if let Some(path) = json_out {
        let json = result
            .report
            .to_json_pretty()
            .context("Failed to serialize report")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write report to {:?}", path))?;
        info!(path = %path.display(), "Report written");
    }

    Ok(())
}

/// Generate a dataset file
fn cmd_dataset(
    points: u64,
    dimensions: u32,
    max_value: u32,
    output: &Path,
    seed: Option<u64>,
) -> Result<()> {
    let spec = DatasetSpec {
        points,
        dimensions,
        max_value,
    };
    generate_dataset(&spec, output, seed)
        .with_context(|| format!("Failed to generate dataset at {:?}", output))?;
    println!("Dataset written to {}", output.display());
    Ok(())
}

/// Print or write the default configuration
fn cmd_init_config(output: Option<&Path>) -> Result<()> {
    let text = BenchConfig::default()
        .to_toml_string()
        .context("Failed to render default configuration")?;
    match output {
        Some(path) => {
            std::fs::write(path, text)
                .with_context(|| format!("Failed to write configuration to {:?}", path))?;
            println!("Configuration written to {}", path.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}
