//! Batch report types and export.
//!
//! A [`BatchReport`] is the complete outcome of one batch: the surviving
//! scored images in submission order, the structured events the pipeline
//! emitted, and the weights actually used. Reports serialize to JSON and to
//! a fixed-column CSV table.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::metrics::MetricSet;
use crate::rank::ScoredImage;
use crate::score::Weights;

/// Structured event emitted by a pipeline stage.
///
/// Batch-level code inspects events to distinguish per-image failures from
/// batch-level conditions; callers surface them however they like.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PipelineEvent {
    /// The submitted batch exceeded the cap; the tail was dropped
    /// unprocessed.
    BatchTruncated {
        /// Number of images submitted.
        submitted: usize,
        /// Number of images kept for processing.
        kept: usize,
    },
    /// Positive weights summed to zero; default weights were restored.
    WeightsReverted,
    /// One image was processed successfully.
    ImageProcessed {
        /// Image name.
        name: String,
        /// Wall-clock processing time.
        elapsed_ms: u64,
    },
    /// One image was dropped; the rest of the batch continued.
    ImageFailed {
        /// Image name.
        name: String,
        /// Failure description.
        error: String,
    },
}

/// Outcome of one processed batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    /// Scored images in submission order.
    pub results: Vec<ScoredImage>,

    /// Events emitted while processing.
    pub events: Vec<PipelineEvent>,

    /// Normalized weights used for composite scoring, when requested.
    pub weights: Option<Weights>,

    /// When this report was generated.
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl BatchReport {
    /// Assemble a report; stamps the current time.
    #[must_use]
    pub fn new(
        results: Vec<ScoredImage>,
        events: Vec<PipelineEvent>,
        weights: Option<Weights>,
    ) -> Self {
        Self {
            results,
            events,
            weights,
            timestamp: chrono::Utc::now(),
        }
    }

    /// Whether composite scores were computed for this batch.
    #[must_use]
    pub fn has_composite(&self) -> bool {
        self.weights.is_some()
    }

    /// Render the batch as CSV.
    ///
    /// Column order is fixed: name, sharpness, noise, brightness, contrast,
    /// saturation, composition, composite — the composite column present
    /// only when it was computed.
    pub fn to_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());

        let mut header: Vec<&str> = vec!["name"];
        header.extend(MetricSet::NAMES);
        if self.has_composite() {
            header.push("composite");
        }
        writer.write_record(&header)?;

        for img in &self.results {
            let mut record: Vec<String> = vec![img.name.clone()];
            record.extend(img.metrics.values().iter().map(|v| v.to_string()));
            if self.has_composite() {
                record.push(img.composite.map(|c| c.to_string()).unwrap_or_default());
            }
            writer.write_record(&record)?;
        }

        let bytes = writer.into_inner().map_err(|e| e.into_error())?;
        Ok(String::from_utf8(bytes).expect("CSV output is valid UTF-8"))
    }

    /// Write the CSV table to a file, creating parent directories.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_csv()?)?;
        Ok(())
    }

    /// Write the report as pretty-printed JSON, creating parent directories.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Read a report back from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_image(name: &str, composite: Option<f64>) -> ScoredImage {
        ScoredImage {
            name: name.to_string(),
            width: 10,
            height: 10,
            metrics: MetricSet {
                sharpness: 1.5,
                noise: 2.0,
                brightness: 3.0,
                contrast: 4.0,
                saturation: 5.0,
                composition: 6.0,
            },
            composite,
            elapsed_ms: 7,
            stored: None,
        }
    }

    #[test]
    fn test_csv_columns_without_composite() {
        let report = BatchReport::new(vec![sample_image("a.png", None)], Vec::new(), None);
        let csv = report.to_csv().unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "name,sharpness,noise,brightness,contrast,saturation,composition"
        );
        assert_eq!(lines.next().unwrap(), "a.png,1.5,2,3,4,5,6");
    }

    #[test]
    fn test_csv_columns_with_composite() {
        let report = BatchReport::new(
            vec![sample_image("a.png", Some(42.5))],
            Vec::new(),
            Some(Weights::default()),
        );
        let csv = report.to_csv().unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "name,sharpness,noise,brightness,contrast,saturation,composition,composite"
        );
        assert_eq!(lines.next().unwrap(), "a.png,1.5,2,3,4,5,6,42.5");
    }

    #[test]
    fn test_json_round_trip() {
        let report = BatchReport::new(
            vec![sample_image("a.png", Some(12.0)), sample_image("b.png", Some(8.0))],
            vec![PipelineEvent::ImageFailed {
                name: "c.png".to_string(),
                error: "decode failed".to_string(),
            }],
            Some(Weights::default()),
        );

        let json = serde_json::to_string(&report).unwrap();
        let parsed: BatchReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.results.len(), 2);
        assert_eq!(parsed.results[0].name, "a.png");
        assert_eq!(parsed.results[0].composite, Some(12.0));
        assert_eq!(parsed.events.len(), 1);
        assert!(parsed.has_composite());
    }

    #[test]
    fn test_event_serialization_tag() {
        let event = PipelineEvent::BatchTruncated {
            submitted: 15,
            kept: 10,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"event\":\"batch_truncated\""));
        assert!(json.contains("\"submitted\":15"));
    }
}
