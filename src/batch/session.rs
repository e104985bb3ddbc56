//! Batch session: the caller-owned context for one scoring request.
//!
//! A [`BatchSession`] owns the weights and the "composite requested" flag
//! for one request. Each image's full pipeline (load, six metrics,
//! optional composite) is one schedulable unit of work; units share no
//! mutable state, so a batch is dispatched across available cores and
//! collected back in submission order.

use std::path::PathBuf;
use std::time::Instant;

use rayon::prelude::*;

use crate::batch::MAX_BATCH;
use crate::batch::report::{BatchReport, PipelineEvent};
use crate::error::{Error, Result};
use crate::metrics::compute_metrics;
use crate::rank::ScoredImage;
use crate::raster::{Raster, decode_raster, load_raster};
use crate::score::{Weights, composite_score};
use crate::store::{RasterStore, StoreHandle};

/// One image submitted for scoring.
#[derive(Debug, Clone)]
pub enum BatchInput {
    /// Read and decode from the filesystem.
    Path(PathBuf),
    /// Decode from bytes already in memory.
    Bytes {
        /// Image name used in reports.
        name: String,
        /// Raw JPEG or PNG bytes.
        data: Vec<u8>,
    },
}

impl BatchInput {
    /// In-memory input with an explicit name.
    #[must_use]
    pub fn bytes(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self::Bytes {
            name: name.into(),
            data,
        }
    }

    /// Name used for this input in reports and events.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Path(path) => path.display().to_string(),
            Self::Bytes { name, .. } => name.clone(),
        }
    }
}

impl From<PathBuf> for BatchInput {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

/// Configuration for a batch session.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Weights for the composite score.
    pub weights: Weights,

    /// Whether to compute composite scores for this batch.
    pub compute_composite: bool,

    /// Directory for report output (JSON and CSV), if any.
    pub report_dir: Option<PathBuf>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            weights: Weights::default(),
            compute_composite: false,
            report_dir: None,
        }
    }
}

impl BatchConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> BatchConfigBuilder {
        BatchConfigBuilder::default()
    }
}

/// Builder for [`BatchConfig`].
#[derive(Debug, Default)]
pub struct BatchConfigBuilder {
    weights: Option<Weights>,
    compute_composite: bool,
    report_dir: Option<PathBuf>,
}

impl BatchConfigBuilder {
    /// Set the composite score weights.
    #[must_use]
    pub fn weights(mut self, weights: Weights) -> Self {
        self.weights = Some(weights);
        self
    }

    /// Request composite scores for the batch.
    #[must_use]
    pub fn compute_composite(mut self, compute: bool) -> Self {
        self.compute_composite = compute;
        self
    }

    /// Set the report output directory.
    #[must_use]
    pub fn report_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.report_dir = Some(path.into());
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> BatchConfig {
        BatchConfig {
            weights: self.weights.unwrap_or_default(),
            compute_composite: self.compute_composite,
            report_dir: self.report_dir,
        }
    }
}

/// Session for scoring one batch of images.
///
/// # Example
///
/// ```rust,ignore
/// use bestshot::{BatchConfig, BatchInput, BatchSession, SortKey, rank};
///
/// let config = BatchConfig::builder().compute_composite(true).build();
/// let session = BatchSession::new(config);
///
/// let report = session.process(vec![
///     BatchInput::Path("holiday/shot1.jpg".into()),
///     BatchInput::Path("holiday/shot2.jpg".into()),
/// ]);
/// let ranked = rank(report.results.clone(), SortKey::Composite)?;
/// ```
pub struct BatchSession {
    config: BatchConfig,
    store: Option<Box<dyn RasterStore>>,
}

impl BatchSession {
    /// Create a new session.
    #[must_use]
    pub fn new(config: BatchConfig) -> Self {
        Self {
            config,
            store: None,
        }
    }

    /// Stage every input's bytes in the given store while processing, so
    /// callers can retrieve originals after the batch completes.
    #[must_use]
    pub fn with_store(mut self, store: Box<dyn RasterStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Session configuration.
    #[must_use]
    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Score a batch of images.
    ///
    /// Inputs beyond [`MAX_BATCH`] are dropped before any decode or metric
    /// computation. Per-image failures drop that image and are recorded as
    /// events; they never abort the batch.
    #[must_use]
    pub fn process(&self, inputs: Vec<BatchInput>) -> BatchReport {
        let submitted = inputs.len();
        let mut events = Vec::new();

        let mut inputs = inputs;
        if inputs.len() > MAX_BATCH {
            inputs.truncate(MAX_BATCH);
            log::warn!("batch of {submitted} images truncated to {MAX_BATCH}");
            events.push(PipelineEvent::BatchTruncated {
                submitted,
                kept: MAX_BATCH,
            });
        }

        let weights = if self.config.compute_composite {
            let (normalized, reverted) = self.config.weights.normalized();
            if reverted {
                log::warn!("positive weights sum to zero; reverting to default weights");
                events.push(PipelineEvent::WeightsReverted);
            }
            Some(normalized)
        } else {
            None
        };

        let outcomes: Vec<(String, Result<ScoredImage>)> = inputs
            .par_iter()
            .map(|input| (input.name(), self.process_one(input, weights.as_ref())))
            .collect();

        let mut results = Vec::with_capacity(outcomes.len());
        for (name, outcome) in outcomes {
            match outcome {
                Ok(image) => {
                    log::debug!("scored {name} in {}ms", image.elapsed_ms);
                    events.push(PipelineEvent::ImageProcessed {
                        name,
                        elapsed_ms: image.elapsed_ms,
                    });
                    results.push(image);
                }
                Err(err) => {
                    log::warn!("dropping {name}: {err}");
                    events.push(PipelineEvent::ImageFailed {
                        name,
                        error: err.to_string(),
                    });
                }
            }
        }

        BatchReport::new(results, events, weights)
    }

    /// Write JSON and CSV reports into the configured report directory.
    ///
    /// Returns the written paths; does nothing when no report directory is
    /// configured.
    pub fn write_reports(&self, report: &BatchReport, stem: &str) -> Result<Vec<PathBuf>> {
        let Some(dir) = &self.config.report_dir else {
            return Ok(Vec::new());
        };
        std::fs::create_dir_all(dir)?;

        let json_path = dir.join(format!("{stem}.json"));
        report.write_json(&json_path)?;
        let csv_path = dir.join(format!("{stem}.csv"));
        report.write_csv(&csv_path)?;

        Ok(vec![json_path, csv_path])
    }

    /// Run one image's full pipeline: load, metrics, optional composite.
    fn process_one(&self, input: &BatchInput, weights: Option<&Weights>) -> Result<ScoredImage> {
        let started = Instant::now();
        let name = input.name();

        let (raster, stored) = self.load_input(input, &name)?;
        let metrics = compute_metrics(&raster)?;
        let composite = weights.map(|w| composite_score(&metrics, w));

        Ok(ScoredImage {
            name,
            width: raster.width() as u32,
            height: raster.height() as u32,
            metrics,
            composite,
            elapsed_ms: started.elapsed().as_millis() as u64,
            stored,
        })
    }

    /// Decode an input, staging its bytes when a store is configured.
    fn load_input(
        &self,
        input: &BatchInput,
        name: &str,
    ) -> Result<(Raster, Option<StoreHandle>)> {
        let Some(store) = self.store.as_deref() else {
            let raster = match input {
                BatchInput::Path(path) => load_raster(path)?,
                BatchInput::Bytes { data, .. } => decode_raster(name, data)?,
            };
            return Ok((raster, None));
        };

        let bytes = match input {
            BatchInput::Path(path) => std::fs::read(path).map_err(|e| Error::Decode {
                name: name.to_string(),
                reason: e.to_string(),
            })?,
            BatchInput::Bytes { data, .. } => data.clone(),
        };
        let handle = store.store(name, &bytes)?;
        let raster = decode_raster(name, &bytes)?;
        Ok((raster, Some(handle)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::TempStore;
    use image::RgbImage;

    fn png_input(name: &str, color: [u8; 3]) -> BatchInput {
        let img = RgbImage::from_pixel(32, 32, image::Rgb(color));
        let mut bytes = Vec::new();
        img.write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageFormat::Png,
        )
        .unwrap();
        BatchInput::bytes(name, bytes)
    }

    #[test]
    fn test_batch_truncates_to_cap() {
        let inputs: Vec<BatchInput> = (0..15)
            .map(|i| png_input(&format!("img{i:02}.png"), [100, 100, 100]))
            .collect();

        let session = BatchSession::new(BatchConfig::default());
        let report = session.process(inputs);

        assert_eq!(report.results.len(), 10);
        assert_eq!(report.results[9].name, "img09.png");
        assert!(matches!(
            report.events[0],
            PipelineEvent::BatchTruncated {
                submitted: 15,
                kept: 10
            }
        ));
    }

    #[test]
    fn test_failed_image_skipped_not_fatal() {
        let inputs = vec![
            png_input("good1.png", [10, 20, 30]),
            BatchInput::bytes("broken.png", b"not an image".to_vec()),
            png_input("good2.png", [40, 50, 60]),
        ];

        let session = BatchSession::new(BatchConfig::default());
        let report = session.process(inputs);

        let names: Vec<&str> = report.results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["good1.png", "good2.png"]);
        assert!(report.events.iter().any(|e| matches!(
            e,
            PipelineEvent::ImageFailed { name, .. } if name == "broken.png"
        )));
    }

    #[test]
    fn test_composite_present_when_requested() {
        let config = BatchConfig::builder().compute_composite(true).build();
        let session = BatchSession::new(config);
        let report = session.process(vec![png_input("a.png", [200, 180, 160])]);

        assert!(report.has_composite());
        assert!(report.results[0].composite.is_some());
        let composite = report.results[0].composite.unwrap();
        assert!((0.0..=100.0).contains(&composite));
    }

    #[test]
    fn test_no_composite_by_default() {
        let session = BatchSession::new(BatchConfig::default());
        let report = session.process(vec![png_input("a.png", [1, 2, 3])]);

        assert!(!report.has_composite());
        assert!(report.results[0].composite.is_none());
    }

    #[test]
    fn test_reverted_weights_emit_event() {
        let zeroed = Weights {
            sharpness: 0.0,
            noise: -0.2,
            brightness: 0.0,
            contrast: 0.0,
            saturation: 0.0,
            composition: 0.0,
        };
        let config = BatchConfig::builder()
            .weights(zeroed)
            .compute_composite(true)
            .build();
        let session = BatchSession::new(config);
        let report = session.process(vec![png_input("a.png", [9, 9, 9])]);

        assert!(report
            .events
            .iter()
            .any(|e| matches!(e, PipelineEvent::WeightsReverted)));
        assert_eq!(report.weights, Some(Weights::default()));
    }

    #[test]
    fn test_store_stages_inputs() {
        let session =
            BatchSession::new(BatchConfig::default()).with_store(Box::new(TempStore::new().unwrap()));
        let report = session.process(vec![png_input("a.png", [50, 60, 70])]);

        let handle = report.results[0].stored.clone().unwrap();
        assert!(handle.path().exists());
    }

    #[test]
    fn test_results_keep_submission_order() {
        let inputs = vec![
            png_input("z.png", [1, 1, 1]),
            png_input("a.png", [2, 2, 2]),
            png_input("m.png", [3, 3, 3]),
        ];
        let session = BatchSession::new(BatchConfig::default());
        let report = session.process(inputs);

        let names: Vec<&str> = report.results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["z.png", "a.png", "m.png"]);
    }
}
