//! Saturation via mean chroma in CIE Lab.
//!
//! Chroma in a perceptually uniform space tracks "color vividness" better
//! than HSV saturation, which inflates for dark pixels.

use palette::{IntoColor, Lab, Srgb};

use crate::error::Result;
use crate::raster::Raster;
use crate::stats;

/// Maps mean chroma into a [0,100] nominal range. Empirically chosen;
/// preserved exactly for output compatibility.
const CHROMA_DIVISOR: f64 = 180.0;

/// Saturation of a raster: mean per-pixel Lab chroma sqrt(a^2 + b^2),
/// scaled by a fixed divisor to [0,100] and capped at 100.
///
/// # Errors
///
/// Returns [`crate::Error::MetricComputation`] for an empty raster.
pub fn saturation(raster: &Raster) -> Result<f64> {
    super::ensure_samples(raster, "saturation")?;

    let chroma: Vec<f64> = raster
        .pixels()
        .map(|p| {
            let rgb = Srgb::new(
                f32::from(p.r) / 255.0,
                f32::from(p.g) / 255.0,
                f32::from(p.b) / 255.0,
            );
            let lab: Lab = rgb.into_color();
            f64::from(lab.a).hypot(f64::from(lab.b))
        })
        .collect();

    Ok((stats::mean(&chroma) / CHROMA_DIVISOR * 100.0).min(100.0))
}
