//! Error types for bestshot operations.

use thiserror::Error;

/// Result type alias for bestshot operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while scoring and ranking a batch of photos.
///
/// Failures are per-image wherever possible: a [`Error::Decode`] or
/// [`Error::MetricComputation`] drops that image from the batch, while
/// [`Error::InvalidWeights`] and [`Error::MissingComposite`] fail the whole
/// request since they affect every image identically.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Input bytes could not be decoded into a raster.
    #[error("Decode failed: {name}: {reason}")]
    Decode {
        /// Image name or path that failed to decode.
        name: String,
        /// Reason for the failure.
        reason: String,
    },

    /// A metric function could not produce a value for an image.
    #[error("Metric computation failed: {metric}: {reason}")]
    MetricComputation {
        /// Name of the metric that failed.
        metric: String,
        /// Reason for the failure.
        reason: String,
    },

    /// Malformed weight mapping for the composite score.
    #[error("Invalid weights: {0}")]
    InvalidWeights(String),

    /// Ranking by composite score was requested before composite scores
    /// were computed for the batch.
    #[error("composite score requested for ranking but not computed for this batch")]
    MissingComposite,

    /// Raster store failure.
    #[error("Store error: {0}")]
    Store(String),

    /// I/O error wrapper.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
