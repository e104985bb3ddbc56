//! Brightness and contrast from the tonal distribution.

use palette::{Hsv, IntoColor, Srgb};

use crate::error::Result;
use crate::raster::Raster;
use crate::stats;

/// Brightness of a raster: mean of the HSV value channel, scaled to [0,100].
///
/// # Errors
///
/// Returns [`crate::Error::MetricComputation`] for an empty raster.
pub fn brightness(raster: &Raster) -> Result<f64> {
    super::ensure_samples(raster, "brightness")?;

    let values: Vec<f64> = raster
        .pixels()
        .map(|p| {
            let rgb = Srgb::new(
                f32::from(p.r) / 255.0,
                f32::from(p.g) / 255.0,
                f32::from(p.b) / 255.0,
            );
            let hsv: Hsv = rgb.into_color();
            f64::from(hsv.value)
        })
        .collect();

    Ok(stats::mean(&values) * 100.0)
}

/// Contrast of a raster: standard deviation of 8-bit luminance, rescaled
/// from [0,255] to [0,100].
///
/// # Errors
///
/// Returns [`crate::Error::MetricComputation`] for an empty raster.
pub fn contrast(raster: &Raster) -> Result<f64> {
    super::ensure_samples(raster, "contrast")?;

    let samples: Vec<f64> = raster.luma8().iter().map(|&l| f64::from(l)).collect();

    Ok(stats::std_dev(&samples) * 100.0 / 255.0)
}
