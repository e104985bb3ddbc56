//! Ranking and top-K selection over scored images.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::metrics::MetricSet;
use crate::store::StoreHandle;

/// Number of images surfaced as the "best shots" of a batch (fewer when the
/// batch is smaller).
pub const TOP_K: usize = 3;

/// One processed image: identity plus its computed metrics and optional
/// composite score. Created when an image is processed; discarded once the
/// batch's results are consumed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredImage {
    /// Image name or path.
    pub name: String,
    /// Width of the analyzed (downscaled) raster.
    pub width: u32,
    /// Height of the analyzed (downscaled) raster.
    pub height: u32,
    /// All six metric values.
    pub metrics: MetricSet,
    /// Composite score, present only when requested for the batch.
    pub composite: Option<f64>,
    /// Wall-clock processing time for this image.
    pub elapsed_ms: u64,
    /// Handle into the session's raster store, when staging was enabled.
    #[serde(skip)]
    pub stored: Option<StoreHandle>,
}

impl ScoredImage {
    /// Value of the chosen sort key, `None` when the composite was
    /// requested but not computed.
    #[must_use]
    pub fn sort_value(&self, key: SortKey) -> Option<f64> {
        match key {
            SortKey::Sharpness => Some(self.metrics.sharpness),
            SortKey::Noise => Some(self.metrics.noise),
            SortKey::Brightness => Some(self.metrics.brightness),
            SortKey::Contrast => Some(self.metrics.contrast),
            SortKey::Saturation => Some(self.metrics.saturation),
            SortKey::Composition => Some(self.metrics.composition),
            SortKey::Composite => self.composite,
        }
    }
}

/// Sort key for ranking a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Rank by sharpness, descending.
    Sharpness,
    /// Rank by noise, ascending (noise is a cost, not a benefit).
    Noise,
    /// Rank by brightness, descending.
    Brightness,
    /// Rank by contrast, descending.
    Contrast,
    /// Rank by saturation, descending.
    Saturation,
    /// Rank by composition, descending.
    Composition,
    /// Rank by composite score, descending.
    Composite,
}

impl SortKey {
    /// All sort keys, in display order.
    pub const ALL: [Self; 7] = [
        Self::Sharpness,
        Self::Noise,
        Self::Brightness,
        Self::Contrast,
        Self::Saturation,
        Self::Composition,
        Self::Composite,
    ];

    /// Canonical lowercase name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sharpness => "sharpness",
            Self::Noise => "noise",
            Self::Brightness => "brightness",
            Self::Contrast => "contrast",
            Self::Saturation => "saturation",
            Self::Composition => "composition",
            Self::Composite => "composite",
        }
    }

    /// Whether this key ranks ascending (lower is better).
    #[must_use]
    pub fn ascending(self) -> bool {
        matches!(self, Self::Noise)
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s.to_ascii_lowercase())
            .ok_or_else(|| format!("unknown sort key '{s}'"))
    }
}

/// An ordered batch of scored images.
///
/// Recomputed on every ranking request; not persisted.
#[derive(Debug, Clone, Serialize)]
pub struct RankedBatch {
    /// Key the batch was ordered by.
    pub key: SortKey,
    /// Images in rank order.
    pub images: Vec<ScoredImage>,
}

impl RankedBatch {
    /// The first `min(3, len)` images of the ranking.
    #[must_use]
    pub fn top(&self) -> &[ScoredImage] {
        &self.images[..self.images.len().min(TOP_K)]
    }
}

/// Order a batch of scored images by the chosen key.
///
/// Descending for every key except noise, which ranks ascending. Ties keep
/// original input order (stable sort). Ranking by composite when any image
/// lacks a composite score fails with [`Error::MissingComposite`] rather
/// than silently substituting a default.
///
/// # Errors
///
/// Returns [`Error::MissingComposite`] when the key is
/// [`SortKey::Composite`] and any image has no composite value.
pub fn rank(images: Vec<ScoredImage>, key: SortKey) -> Result<RankedBatch> {
    let mut keyed: Vec<(f64, ScoredImage)> = images
        .into_iter()
        .map(|img| {
            let value = img.sort_value(key).ok_or(Error::MissingComposite)?;
            Ok((value, img))
        })
        .collect::<Result<_>>()?;

    // Vec::sort_by is stable: equal scores keep submission order.
    if key.ascending() {
        keyed.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
    } else {
        keyed.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
    }

    Ok(RankedBatch {
        key,
        images: keyed.into_iter().map(|(_, img)| img).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(name: &str, metrics: MetricSet, composite: Option<f64>) -> ScoredImage {
        ScoredImage {
            name: name.to_string(),
            width: 100,
            height: 100,
            metrics,
            composite,
            elapsed_ms: 0,
            stored: None,
        }
    }

    fn with_noise(name: &str, noise: f64) -> ScoredImage {
        let metrics = MetricSet {
            sharpness: 0.0,
            noise,
            brightness: 0.0,
            contrast: 0.0,
            saturation: 0.0,
            composition: 0.0,
        };
        scored(name, metrics, None)
    }

    fn with_sharpness(name: &str, sharpness: f64) -> ScoredImage {
        let metrics = MetricSet {
            sharpness,
            noise: 0.0,
            brightness: 0.0,
            contrast: 0.0,
            saturation: 0.0,
            composition: 0.0,
        };
        scored(name, metrics, None)
    }

    #[test]
    fn test_noise_ranks_ascending() {
        let batch = vec![
            with_noise("a", 30.0),
            with_noise("b", 10.0),
            with_noise("c", 50.0),
        ];
        let ranked = rank(batch, SortKey::Noise).unwrap();
        let names: Vec<&str> = ranked.images.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["b", "a", "c"]);
    }

    #[test]
    fn test_sharpness_tie_keeps_input_order() {
        let batch = vec![
            with_sharpness("a", 40.0),
            with_sharpness("b", 40.0),
            with_sharpness("c", 20.0),
        ];
        let ranked = rank(batch, SortKey::Sharpness).unwrap();
        let names: Vec<&str> = ranked.images.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn test_composite_without_scores_fails() {
        let batch = vec![with_sharpness("a", 40.0)];
        let err = rank(batch, SortKey::Composite).unwrap_err();
        assert!(matches!(err, Error::MissingComposite));
    }

    #[test]
    fn test_composite_ranks_descending() {
        let batch = vec![
            scored("a", with_sharpness("x", 0.0).metrics, Some(20.0)),
            scored("b", with_sharpness("x", 0.0).metrics, Some(80.0)),
        ];
        let ranked = rank(batch, SortKey::Composite).unwrap();
        assert_eq!(ranked.images[0].name, "b");
    }

    #[test]
    fn test_top_is_at_most_three() {
        let batch: Vec<ScoredImage> = (0..5)
            .map(|i| with_sharpness(&format!("img{i}"), f64::from(i)))
            .collect();
        let ranked = rank(batch, SortKey::Sharpness).unwrap();
        assert_eq!(ranked.top().len(), 3);

        let small = vec![with_sharpness("only", 1.0)];
        let ranked = rank(small, SortKey::Sharpness).unwrap();
        assert_eq!(ranked.top().len(), 1);
    }

    #[test]
    fn test_sort_key_round_trip() {
        for key in SortKey::ALL {
            assert_eq!(key.as_str().parse::<SortKey>().unwrap(), key);
        }
        assert!("sharpest".parse::<SortKey>().is_err());
    }
}
