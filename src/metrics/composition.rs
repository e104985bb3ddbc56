//! Composition via edge mass on rule-of-thirds guide lines.
//!
//! Approximates "subject aligned with the thirds grid" without any object
//! detection: detect edges, then measure how much of the edge mass falls
//! into thin bands centered on the four internal lines of a 3x3 partition.

use imageproc::edges::canny;

use crate::error::Result;
use crate::raster::Raster;

/// Two-threshold edge detector settings on the luminance plane.
const CANNY_LOW: f32 = 100.0;
const CANNY_HIGH: f32 = 200.0;

/// Each band is a quarter of a third wide, centered on its guide line.
const BAND_FRACTION: f64 = 4.0;

/// Composition of a raster: summed edge-pixel counts within the four
/// rule-of-thirds bands, over total edge count times four, as a percentage
/// clamped to [0,100].
///
/// A raster with no detected edges scores exactly 0.
///
/// # Errors
///
/// Returns [`crate::Error::MetricComputation`] for an empty raster.
pub fn composition(raster: &Raster) -> Result<f64> {
    super::ensure_samples(raster, "composition")?;

    let edges = canny(&raster.luma_image(), CANNY_LOW, CANNY_HIGH);
    let (width, height) = edges.dimensions();

    let third_w = f64::from(width) / 3.0;
    let third_h = f64::from(height) / 3.0;
    let half_band_w = third_w / BAND_FRACTION / 2.0;
    let half_band_h = third_h / BAND_FRACTION / 2.0;

    let vertical_lines = [third_w, 2.0 * third_w];
    let horizontal_lines = [third_h, 2.0 * third_h];

    let mut total: u64 = 0;
    let mut in_bands: u64 = 0;
    for (x, y, pixel) in edges.enumerate_pixels() {
        if pixel[0] == 0 {
            continue;
        }
        total += 1;

        let cx = f64::from(x) + 0.5;
        let cy = f64::from(y) + 0.5;
        for line in vertical_lines {
            if (cx - line).abs() <= half_band_w {
                in_bands += 1;
            }
        }
        for line in horizontal_lines {
            if (cy - line).abs() <= half_band_h {
                in_bands += 1;
            }
        }
    }

    if total == 0 {
        return Ok(0.0);
    }

    let score = in_bands as f64 / (total as f64 * 4.0) * 100.0;
    Ok(score.clamp(0.0, 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rgb::RGB8;

    fn stripe_raster(width: usize, height: usize, split_x: usize) -> Raster {
        let pixels = (0..width * height)
            .map(|i| {
                if i % width < split_x {
                    RGB8::new(255, 255, 255)
                } else {
                    RGB8::new(0, 0, 0)
                }
            })
            .collect();
        Raster::from_pixels(pixels, width, height)
    }

    #[test]
    fn test_all_black_raster_scores_zero() {
        let raster = Raster::from_pixels(vec![RGB8::new(0, 0, 0); 60 * 60], 60, 60);
        assert_eq!(composition(&raster).unwrap(), 0.0);
    }

    #[test]
    fn test_edge_on_third_line_scores_positive() {
        // The white/black boundary sits on the left vertical third line.
        let raster = stripe_raster(60, 60, 20);
        let score = composition(&raster).unwrap();
        assert!(score > 0.0);
        assert!(score <= 100.0);
    }

    #[test]
    fn test_aligned_edge_beats_centered_edge() {
        let aligned = composition(&stripe_raster(60, 60, 20)).unwrap();
        let centered = composition(&stripe_raster(60, 60, 30)).unwrap();
        assert!(aligned > centered);
    }
}
