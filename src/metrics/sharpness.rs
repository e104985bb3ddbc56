//! Sharpness via variance of the Laplacian.
//!
//! Variance of a high-pass filter response is a standard, cheap focus
//! measure: more high-frequency edge energy means a sharper image. The
//! measure is resolution-invariant enough to survive the 0.25x downscale.

use image::{ImageBuffer, Luma};
use imageproc::filter::filter3x3;

use crate::error::Result;
use crate::raster::Raster;
use crate::stats;

/// Discrete second-derivative (Laplacian) kernel.
const LAPLACIAN: [i16; 9] = [0, 1, 0, 1, -4, 1, 0, 1, 0];

/// Maps raw Laplacian variance of typical photographs into a readable range.
/// Empirically chosen; preserved exactly for output compatibility.
const VARIANCE_DIVISOR: f64 = 1000.0;

/// Sharpness of a raster: variance of its Laplacian response divided by a
/// fixed normalization constant.
///
/// Not hard-clamped to [0,100]; extreme inputs may exceed that range.
///
/// # Errors
///
/// Returns [`crate::Error::MetricComputation`] for an empty raster.
pub fn sharpness(raster: &Raster) -> Result<f64> {
    super::ensure_samples(raster, "sharpness")?;

    let gray = raster.luma_image();
    let response: ImageBuffer<Luma<i16>, Vec<i16>> = filter3x3(&gray, &LAPLACIAN);
    let samples: Vec<f64> = response.as_raw().iter().map(|&v| f64::from(v)).collect();

    Ok(stats::variance(&samples) / VARIANCE_DIVISOR)
}
