//! Noise estimate from luminance spread.
//!
//! A crude proxy: real sensor noise measurement needs a flat-field
//! reference, so this heuristic conflates noise with texture and contrast.
//! That is an accepted approximation for relative ranking within a batch,
//! not an absolute measurement.

use crate::error::Result;
use crate::raster::Raster;
use crate::stats;

/// Noise of a raster: standard deviation of luminance in [0,1], times 100.
///
/// # Errors
///
/// Returns [`crate::Error::MetricComputation`] for an empty raster.
pub fn noise(raster: &Raster) -> Result<f64> {
    super::ensure_samples(raster, "noise")?;

    let samples: Vec<f64> = raster
        .luma8()
        .iter()
        .map(|&l| f64::from(l) / 255.0)
        .collect();

    Ok(stats::std_dev(&samples) * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rgb::RGB8;

    #[test]
    fn test_uniform_raster_has_zero_noise() {
        let raster = Raster::from_pixels(vec![RGB8::new(90, 90, 90); 64], 8, 8);
        assert_eq!(noise(&raster).unwrap(), 0.0);
    }

    #[test]
    fn test_black_white_split_noise() {
        let mut pixels = vec![RGB8::new(0, 0, 0); 32];
        pixels.extend(vec![RGB8::new(255, 255, 255); 32]);
        let raster = Raster::from_pixels(pixels, 8, 8);
        // Half black, half white: std dev of [0,1] samples is 0.5.
        assert!((noise(&raster).unwrap() - 50.0).abs() < 1e-9);
    }
}
