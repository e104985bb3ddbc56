//! Stats command: per-metric summaries of a saved batch report.

use std::path::PathBuf;

use anyhow::{Context, Result};
use bestshot::{BatchReport, MetricSet, Summary};

pub fn run(input: PathBuf, verbose: bool) -> Result<()> {
    if verbose {
        eprintln!("Loading report from: {}", input.display());
    }

    let report = BatchReport::load_json(&input)
        .with_context(|| format!("loading report {}", input.display()))?;

    println!("Images: {}", report.results.len());
    println!("Generated: {}", report.timestamp.to_rfc3339());
    println!();

    println!("Per-metric statistics:");
    println!("{:-<60}", "");
    for (idx, name) in MetricSet::NAMES.into_iter().enumerate() {
        let values: Vec<f64> = report
            .results
            .iter()
            .map(|r| r.metrics.values()[idx])
            .collect();
        print_summary(name, &values);
    }

    if report.has_composite() {
        let values: Vec<f64> = report.results.iter().filter_map(|r| r.composite).collect();
        print_summary("composite", &values);
    }

    Ok(())
}

fn print_summary(name: &str, values: &[f64]) {
    if let Some(summary) = Summary::compute(values) {
        println!("{name}:");
        println!("  Mean: {:.2}, Median: {:.2}", summary.mean, summary.median);
        println!(
            "  Min: {:.2}, Max: {:.2}, StdDev: {:.2}",
            summary.min, summary.max, summary.std_dev
        );
    }
}
