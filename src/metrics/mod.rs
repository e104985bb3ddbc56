//! Image quality metrics.
//!
//! Six independent pure functions, each mapping a downscaled raster to one
//! scalar in a fixed target range. All are deterministic and share no state,
//! so they may run in any order or in parallel.
//!
//! | Metric | Heuristic | Range |
//! |--------|-----------|-------|
//! | sharpness | variance of Laplacian response / 1000 | 0+ (not clamped) |
//! | noise | std dev of luminance in [0,1] x 100 | 0-100 |
//! | brightness | mean HSV value x 100 | 0-100 |
//! | contrast | std dev of 8-bit luminance, rescaled | 0-100 |
//! | saturation | mean CIE Lab chroma / 180 x 100 | 0-100 |
//! | composition | edge mass on rule-of-thirds bands | 0-100 |
//!
//! Each metric is a specific fixed heuristic, not a pluggable algorithm
//! family. Every function fails with [`Error::MetricComputation`] on an
//! empty raster; a failed metric fails the whole image, never a partial
//! [`MetricSet`].

mod composition;
mod noise;
mod saturation;
mod sharpness;
mod tone;

pub use composition::composition;
pub use noise::noise;
pub use saturation::saturation;
pub use sharpness::sharpness;
pub use tone::{brightness, contrast};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::raster::Raster;

/// All six metric values for one image.
///
/// Created once per image and immutable after computation. Presence of all
/// six values is enforced by the type, so batch code never sees a partially
/// computed set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSet {
    /// Edge clarity (higher is better; may exceed 100 for extreme inputs).
    pub sharpness: f64,
    /// Luminance grain proxy (lower is better).
    pub noise: f64,
    /// Overall light level.
    pub brightness: f64,
    /// Spread between dark and light.
    pub contrast: f64,
    /// Color vividness.
    pub saturation: f64,
    /// Edge alignment with rule-of-thirds guide lines.
    pub composition: f64,
}

impl MetricSet {
    /// Metric names in canonical (export column) order.
    pub const NAMES: [&'static str; 6] = [
        "sharpness",
        "noise",
        "brightness",
        "contrast",
        "saturation",
        "composition",
    ];

    /// Metric values in canonical (export column) order.
    #[must_use]
    pub fn values(&self) -> [f64; 6] {
        [
            self.sharpness,
            self.noise,
            self.brightness,
            self.contrast,
            self.saturation,
            self.composition,
        ]
    }
}

/// Compute all six metrics for one raster.
///
/// # Errors
///
/// Returns [`Error::MetricComputation`] if any metric fails; no partial
/// result is produced.
pub fn compute_metrics(raster: &Raster) -> Result<MetricSet> {
    Ok(MetricSet {
        sharpness: sharpness(raster)?,
        noise: noise(raster)?,
        brightness: brightness(raster)?,
        contrast: contrast(raster)?,
        saturation: saturation(raster)?,
        composition: composition(raster)?,
    })
}

/// Reject rasters with no samples before a metric runs.
pub(crate) fn ensure_samples(raster: &Raster, metric: &str) -> Result<()> {
    if raster.is_empty() {
        return Err(Error::MetricComputation {
            metric: metric.to_string(),
            reason: "raster has no samples".to_string(),
        });
    }
    Ok(())
}
