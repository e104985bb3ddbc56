//! Analyze command: score, rank, and export a batch of photos.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use bestshot::{
    BatchConfig, BatchInput, BatchSession, PipelineEvent, ScoredImage, SortKey, Weights, rank,
};

#[allow(clippy::too_many_arguments)]
pub fn run(
    paths: Vec<PathBuf>,
    composite: bool,
    sort: Option<String>,
    weights: Option<PathBuf>,
    csv: Option<PathBuf>,
    json: Option<PathBuf>,
    report_dir: Option<PathBuf>,
    verbose: bool,
) -> Result<()> {
    let files = collect_inputs(&paths)?;
    if files.is_empty() {
        bail!("no images found (expected .jpg, .jpeg, or .png files)");
    }
    if verbose {
        eprintln!("Found {} images", files.len());
    }

    let sort_key = match sort {
        Some(name) => name.parse::<SortKey>().map_err(|e| anyhow::anyhow!(e))?,
        None if composite => SortKey::Composite,
        None => SortKey::Sharpness,
    };

    let weights = match weights {
        Some(path) => {
            let data = std::fs::read_to_string(&path)
                .with_context(|| format!("reading weights from {}", path.display()))?;
            let map: HashMap<String, f64> = serde_json::from_str(&data)
                .with_context(|| format!("parsing weights from {}", path.display()))?;
            Weights::from_map(&map)?
        }
        None => Weights::default(),
    };

    let mut builder = BatchConfig::builder()
        .weights(weights)
        .compute_composite(composite);
    if let Some(dir) = report_dir {
        builder = builder.report_dir(dir);
    }
    let session = BatchSession::new(builder.build());

    let report = session.process(files.into_iter().map(BatchInput::from).collect());

    for event in &report.events {
        match event {
            PipelineEvent::BatchTruncated { submitted, kept } => {
                eprintln!("Warning: {submitted} images submitted, only the first {kept} processed");
            }
            PipelineEvent::WeightsReverted => {
                eprintln!("Warning: positive weights sum to zero; default weights used");
            }
            PipelineEvent::ImageFailed { name, error } => {
                eprintln!("Warning: skipped {name}: {error}");
            }
            PipelineEvent::ImageProcessed { name, elapsed_ms } => {
                if verbose {
                    eprintln!("Processed {name} in {elapsed_ms}ms");
                }
            }
        }
    }

    if report.results.is_empty() {
        bail!("no images were processed successfully");
    }

    let ranked = rank(report.results.clone(), sort_key)?;

    println!("Top {} by {}:", ranked.top().len(), sort_key);
    for (idx, image) in ranked.top().iter().enumerate() {
        let value = image.sort_value(sort_key).unwrap_or_default();
        println!("  {}. {} ({:.2})", idx + 1, image.name, value);
    }
    println!();
    print_table(&ranked.images, report.has_composite());

    if let Some(path) = csv {
        report.write_csv(&path)?;
        if verbose {
            eprintln!("Wrote {}", path.display());
        }
    }
    if let Some(path) = json {
        report.write_json(&path)?;
        if verbose {
            eprintln!("Wrote {}", path.display());
        }
    }
    for path in session.write_reports(&report, "report")? {
        if verbose {
            eprintln!("Wrote {}", path.display());
        }
    }

    Ok(())
}

/// Expand files and directories into a flat image file list.
fn collect_inputs(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let mut entries: Vec<PathBuf> = std::fs::read_dir(path)
                .with_context(|| format!("reading directory {}", path.display()))?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| is_image(p))
                .collect();
            entries.sort();
            files.extend(entries);
        } else {
            files.push(path.clone());
        }
    }
    Ok(files)
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| matches!(ext.to_ascii_lowercase().as_str(), "jpg" | "jpeg" | "png"))
}

fn print_table(images: &[ScoredImage], has_composite: bool) {
    print!(
        "{:<28} {:>9} {:>7} {:>10} {:>8} {:>10} {:>11}",
        "name", "sharpness", "noise", "brightness", "contrast", "saturation", "composition"
    );
    if has_composite {
        print!(" {:>9}", "composite");
    }
    println!();
    println!("{:-<96}", "");

    for image in images {
        let m = &image.metrics;
        print!(
            "{:<28} {:>9.2} {:>7.2} {:>10.2} {:>8.2} {:>10.2} {:>11.2}",
            image.name, m.sharpness, m.noise, m.brightness, m.contrast, m.saturation, m.composition
        );
        if let Some(composite) = image.composite {
            print!(" {:>9.2}", composite);
        }
        println!();
    }
}
