//! Composite scoring: combining six metrics into one ranking value.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::metrics::MetricSet;

/// Calibration constant for the weighted sum. Weights sum to roughly 1
/// while each metric spans [0,100] but only a subset is at full scale at
/// once; the divide-by-2 lands the composite on the same [0,100] scale as
/// its inputs. Empirically tuned; preserved exactly for output
/// compatibility.
const COMPOSITE_DIVISOR: f64 = 2.0;

/// Per-metric weights for the composite score.
///
/// The noise weight is conventionally non-positive (noise is a cost) and
/// the other five non-negative. Consumers apply noise inverted
/// (`100 - noise`, floored at 0) before weighting, never raw noise with a
/// negative weight applied twice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    /// Weight for sharpness.
    pub sharpness: f64,
    /// Weight for (inverted) noise; conventionally non-positive.
    pub noise: f64,
    /// Weight for brightness.
    pub brightness: f64,
    /// Weight for contrast.
    pub contrast: f64,
    /// Weight for saturation.
    pub saturation: f64,
    /// Weight for composition.
    pub composition: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            sharpness: 0.25,
            noise: -0.2,
            brightness: 0.2,
            contrast: 0.2,
            saturation: 0.15,
            composition: 0.2,
        }
    }
}

impl Weights {
    /// Build weights from a name-to-value mapping.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidWeights`] if any of the six metric names is
    /// missing from the map.
    pub fn from_map(map: &HashMap<String, f64>) -> Result<Self> {
        let get = |key: &str| {
            map.get(key)
                .copied()
                .ok_or_else(|| Error::InvalidWeights(format!("missing weight for '{key}'")))
        };
        Ok(Self {
            sharpness: get("sharpness")?,
            noise: get("noise")?,
            brightness: get("brightness")?,
            contrast: get("contrast")?,
            saturation: get("saturation")?,
            composition: get("composition")?,
        })
    }

    /// Re-normalize the five non-noise weights to sum to 1.
    ///
    /// If their sum is not positive, every weight reverts to the defaults
    /// and the returned flag is `true` so the caller can surface a warning.
    /// The noise weight is excluded from re-normalization.
    #[must_use]
    pub fn normalized(&self) -> (Self, bool) {
        let total = self.sharpness + self.brightness + self.contrast + self.saturation
            + self.composition;
        if total > 0.0 {
            (
                Self {
                    sharpness: self.sharpness / total,
                    noise: self.noise,
                    brightness: self.brightness / total,
                    contrast: self.contrast / total,
                    saturation: self.saturation / total,
                    composition: self.composition / total,
                },
                false,
            )
        } else {
            (Self::default(), true)
        }
    }
}

/// Combine all six metrics into one composite score in [0,100].
///
/// Noise enters inverted (`max(0, 100 - noise)`) with the magnitude of its
/// weight, so low noise raises the score.
#[must_use]
pub fn composite_score(metrics: &MetricSet, weights: &Weights) -> f64 {
    let inverted_noise = (100.0 - metrics.noise).max(0.0);

    let weighted_sum = metrics.sharpness * weights.sharpness
        + inverted_noise * weights.noise.abs()
        + metrics.brightness * weights.brightness
        + metrics.contrast * weights.contrast
        + metrics.saturation * weights.saturation
        + metrics.composition * weights.composition;

    (weighted_sum / COMPOSITE_DIVISOR).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics_with_noise(noise: f64) -> MetricSet {
        MetricSet {
            sharpness: 0.0,
            noise,
            brightness: 0.0,
            contrast: 0.0,
            saturation: 0.0,
            composition: 0.0,
        }
    }

    fn noise_only_weights() -> Weights {
        Weights {
            sharpness: 0.0,
            noise: -0.2,
            brightness: 0.0,
            contrast: 0.0,
            saturation: 0.0,
            composition: 0.0,
        }
    }

    #[test]
    fn test_zero_noise_scores_full_inversion() {
        // inverted noise 100, weight magnitude 0.2: 100 * 0.2 / 2 = 10.
        let score = composite_score(&metrics_with_noise(0.0), &noise_only_weights());
        assert!((score - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_noise_above_100_clamps_to_zero() {
        let score = composite_score(&metrics_with_noise(150.0), &noise_only_weights());
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_composite_within_bounds() {
        let metrics = MetricSet {
            sharpness: 100.0,
            noise: 0.0,
            brightness: 100.0,
            contrast: 100.0,
            saturation: 100.0,
            composition: 100.0,
        };
        let score = composite_score(&metrics, &Weights::default());
        assert!(score >= 0.0);
        assert!(score <= 100.0);
    }

    #[test]
    fn test_default_weights_on_mid_metrics() {
        let metrics = MetricSet {
            sharpness: 50.0,
            noise: 50.0,
            brightness: 50.0,
            contrast: 50.0,
            saturation: 50.0,
            composition: 50.0,
        };
        // Positive terms: 50 * (0.25 + 0.2 + 0.2 + 0.15 + 0.2) = 50.
        // Noise term: (100 - 50) * 0.2 = 10. Total 60 / 2 = 30.
        let score = composite_score(&metrics, &Weights::default());
        assert!((score - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_normalized_keeps_unit_sum() {
        let weights = Weights {
            sharpness: 0.5,
            noise: -0.2,
            brightness: 0.5,
            contrast: 0.0,
            saturation: 0.0,
            composition: 0.0,
        };
        let (normalized, reverted) = weights.normalized();
        assert!(!reverted);
        assert_eq!(normalized.sharpness, 0.5);
        assert_eq!(normalized.brightness, 0.5);
        assert_eq!(normalized.noise, -0.2);
    }

    #[test]
    fn test_normalized_rescales_to_unit_sum() {
        let weights = Weights {
            sharpness: 2.0,
            noise: -0.4,
            brightness: 2.0,
            contrast: 0.0,
            saturation: 0.0,
            composition: 0.0,
        };
        let (normalized, reverted) = weights.normalized();
        assert!(!reverted);
        assert!((normalized.sharpness - 0.5).abs() < 1e-9);
        assert!((normalized.brightness - 0.5).abs() < 1e-9);
        // Noise weight never rescales.
        assert_eq!(normalized.noise, -0.4);
    }

    #[test]
    fn test_normalized_reverts_on_zero_sum() {
        let weights = Weights {
            sharpness: 0.0,
            noise: -0.2,
            brightness: 0.0,
            contrast: 0.0,
            saturation: 0.0,
            composition: 0.0,
        };
        let (normalized, reverted) = weights.normalized();
        assert!(reverted);
        assert_eq!(normalized, Weights::default());
    }

    #[test]
    fn test_from_map_missing_key() {
        let mut map = HashMap::new();
        map.insert("sharpness".to_string(), 0.5);
        let err = Weights::from_map(&map).unwrap_err();
        assert!(matches!(err, Error::InvalidWeights(_)));
    }

    #[test]
    fn test_from_map_complete() {
        let map: HashMap<String, f64> = [
            ("sharpness", 0.25),
            ("noise", -0.2),
            ("brightness", 0.2),
            ("contrast", 0.2),
            ("saturation", 0.15),
            ("composition", 0.2),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
        let weights = Weights::from_map(&map).unwrap();
        assert_eq!(weights, Weights::default());
    }
}
