//! bestshot CLI - batch photo scoring and ranking tool

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

/// Score a batch of photos, rank them, and export the results.
#[derive(Parser)]
#[command(name = "bestshot")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a batch of images and print the ranking
    Analyze {
        /// Image files or directories to scan (jpg, jpeg, png)
        paths: Vec<PathBuf>,

        /// Compute composite scores for the batch
        #[arg(long)]
        composite: bool,

        /// Sort key (sharpness, noise, brightness, contrast, saturation,
        /// composition, composite)
        #[arg(short, long)]
        sort: Option<String>,

        /// JSON file mapping metric names to composite weights
        #[arg(long)]
        weights: Option<PathBuf>,

        /// Write the metric table to a CSV file
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Write the full report to a JSON file
        #[arg(long)]
        json: Option<PathBuf>,

        /// Write report.json and report.csv into this directory
        #[arg(long)]
        report_dir: Option<PathBuf>,
    },

    /// Show per-metric statistics for a saved batch report
    Stats {
        /// Report JSON file written by `analyze`
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            paths,
            composite,
            sort,
            weights,
            csv,
            json,
            report_dir,
        } => commands::analyze::run(
            paths, composite, sort, weights, csv, json, report_dir, cli.verbose,
        ),
        Commands::Stats { input } => commands::stats::run(input, cli.verbose),
    }
}
