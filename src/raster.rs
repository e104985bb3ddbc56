//! Raster loading and downscaling.
//!
//! The scoring core never sees full-resolution data: every image is decoded
//! and reduced to 0.25x linear dimensions per axis before any metric runs.
//! Metrics are statistical approximations robust to resolution loss, so the
//! downscale is a deliberate cost/quality trade-off.

use std::path::Path;

use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, RgbImage};
use imgref::ImgVec;
use rgb::RGB8;

use crate::error::{Error, Result};

/// Linear downscale divisor applied to each axis before metric computation.
pub const DOWNSCALE: u32 = 4;

/// Immutable decoded pixel grid for one image.
///
/// Produced once per image by [`decode_raster`] or [`load_raster`] at the
/// reduced resolution; read-only thereafter.
#[derive(Clone)]
pub struct Raster {
    pixels: ImgVec<RGB8>,
}

impl Raster {
    /// Build a raster from a pixel buffer in row-major order.
    ///
    /// # Panics
    ///
    /// Panics if `pixels.len() != width * height`.
    #[must_use]
    pub fn from_pixels(pixels: Vec<RGB8>, width: usize, height: usize) -> Self {
        assert_eq!(pixels.len(), width * height);
        Self {
            pixels: ImgVec::new(pixels, width, height),
        }
    }

    /// Image width in pixels.
    #[must_use]
    pub fn width(&self) -> usize {
        self.pixels.width()
    }

    /// Image height in pixels.
    #[must_use]
    pub fn height(&self) -> usize {
        self.pixels.height()
    }

    /// Whether the raster has no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Iterate over pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = RGB8> + '_ {
        self.pixels.pixels()
    }

    /// BT.601 luminance plane, one `u8` sample per pixel in row-major order.
    #[must_use]
    pub fn luma8(&self) -> Vec<u8> {
        self.pixels()
            .map(|p| {
                let y = 0.299 * f64::from(p.r) + 0.587 * f64::from(p.g) + 0.114 * f64::from(p.b);
                y.round().clamp(0.0, 255.0) as u8
            })
            .collect()
    }

    /// Luminance plane as a single-channel image for edge filters.
    #[must_use]
    pub fn luma_image(&self) -> GrayImage {
        let luma = self.luma8();
        GrayImage::from_raw(self.width() as u32, self.height() as u32, luma)
            .expect("luminance buffer matches raster dimensions")
    }
}

impl std::fmt::Debug for Raster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Raster")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

/// Decode image bytes (JPEG or PNG) and downscale for metric computation.
///
/// # Errors
///
/// Returns [`Error::Decode`] if the bytes are not a valid raster.
pub fn decode_raster(name: &str, bytes: &[u8]) -> Result<Raster> {
    let img = image::load_from_memory(bytes).map_err(|e| Error::Decode {
        name: name.to_string(),
        reason: e.to_string(),
    })?;
    Ok(downscale(&img))
}

/// Read and decode an image file, downscaled for metric computation.
///
/// # Errors
///
/// Returns [`Error::Decode`] if the file cannot be read or decoded.
pub fn load_raster(path: &Path) -> Result<Raster> {
    let name = path.display().to_string();
    let bytes = std::fs::read(path).map_err(|e| Error::Decode {
        name: name.clone(),
        reason: e.to_string(),
    })?;
    decode_raster(&name, &bytes)
}

/// Reduce a decoded image to 0.25x linear dimensions with area-averaging
/// (triangle) resampling.
fn downscale(img: &DynamicImage) -> Raster {
    let rgb: RgbImage = img.to_rgb8();
    let (w, h) = rgb.dimensions();
    let dw = (w / DOWNSCALE).max(1);
    let dh = (h / DOWNSCALE).max(1);
    let small = imageops::resize(&rgb, dw, dh, FilterType::Triangle);

    let pixels: Vec<RGB8> = small
        .pixels()
        .map(|p| RGB8::new(p[0], p[1], p[2]))
        .collect();
    Raster::from_pixels(pixels, dw as usize, dh as usize)
}
