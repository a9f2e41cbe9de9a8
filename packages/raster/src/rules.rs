//! Classification rules.
//!
//! A rule either assigns a color to a pixel value or passes (`None`), in
//! which case the next rule in the classifier's chain is consulted.

use misland_indicator_models::{Color, RasterColor};
use serde::Deserialize;

use crate::RasterError;

/// Maps a pixel value to a color, or passes.
pub trait ClassificationRule: Send + Sync + std::fmt::Debug {
    /// Returns the color for `value`, or `None` to defer to the next rule.
    fn classify(&self, value: f64) -> Option<Color>;
}

/// An inclusive integer range with a fixed color.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Band {
    /// Lowest value in the band.
    pub min: i64,
    /// Highest value in the band.
    pub max: i64,
    /// Band color.
    pub color: Color,
}

impl Band {
    #[allow(clippy::cast_precision_loss)]
    fn contains(&self, value: f64) -> bool {
        self.min as f64 <= value && value <= self.max as f64
    }
}

/// Disjoint bands checked in ascending order; the first containing band
/// wins. Values between or outside bands pass.
#[derive(Debug, Clone)]
pub struct BandedRule {
    bands: Vec<Band>,
}

impl BandedRule {
    /// Sorts the bands ascending and checks they are well formed.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::InvalidRule`] if a band is inverted or two
    /// bands overlap.
    pub fn new(mut bands: Vec<Band>) -> Result<Self, RasterError> {
        bands.sort_by_key(|band| band.min);

        if let Some(band) = bands.iter().find(|band| band.min > band.max) {
            return Err(RasterError::InvalidRule {
                message: format!("band [{}, {}] is inverted", band.min, band.max),
            });
        }
        if let Some(pair) = bands.windows(2).find(|pair| pair[0].max >= pair[1].min) {
            return Err(RasterError::InvalidRule {
                message: format!(
                    "bands [{}, {}] and [{}, {}] overlap",
                    pair[0].min, pair[0].max, pair[1].min, pair[1].max
                ),
            });
        }

        Ok(Self { bands })
    }

    /// Bands in ascending order.
    #[must_use]
    pub fn bands(&self) -> &[Band] {
        &self.bands
    }
}

impl ClassificationRule for BandedRule {
    fn classify(&self, value: f64) -> Option<Color> {
        self.bands
            .iter()
            .find(|band| band.contains(value))
            .map(|band| band.color.clone())
    }
}

/// Colors values strictly above a cutoff; everything else passes.
#[derive(Debug, Clone)]
pub struct ThresholdRule {
    above: f64,
    color: Color,
}

impl ThresholdRule {
    /// Creates a threshold rule.
    #[must_use]
    pub const fn new(above: f64, color: Color) -> Self {
        Self { above, color }
    }
}

impl ClassificationRule for ThresholdRule {
    fn classify(&self, value: f64) -> Option<Color> {
        (value > self.above).then(|| self.color.clone())
    }
}

/// Fallback for values missing from a lookup table.
pub const LOOKUP_FALLBACK_COLOR: &str = "blue";

/// Exact-value lookup against the session's `raster_colors`. Never passes:
/// unknown values get [`LOOKUP_FALLBACK_COLOR`].
#[derive(Debug, Clone)]
pub struct LookupRule {
    table: Vec<RasterColor>,
    fallback: Color,
}

impl LookupRule {
    /// Creates a lookup rule with the default fallback.
    #[must_use]
    pub fn new(table: Vec<RasterColor>) -> Self {
        Self {
            table,
            fallback: Color::from(LOOKUP_FALLBACK_COLOR),
        }
    }

    /// Looks up an exact value. The first matching entry wins.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn lookup(&self, value: f64) -> Option<&Color> {
        self.table
            .iter()
            .find(|entry| entry.val == value)
            .map(|entry| &entry.color)
    }
}

impl ClassificationRule for LookupRule {
    fn classify(&self, value: f64) -> Option<Color> {
        Some(self.lookup(value).unwrap_or(&self.fallback).clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn band(min: i64, max: i64, color: &str) -> Band {
        Band {
            min,
            max,
            color: Color::from(color),
        }
    }

    #[test]
    fn bands_are_inclusive_and_sorted() {
        let rule = BandedRule::new(vec![band(10, 19, "b"), band(0, 9, "a")]).unwrap();
        assert_eq!(rule.bands()[0].min, 0);
        assert_eq!(rule.classify(0.0), Some(Color::from("a")));
        assert_eq!(rule.classify(9.0), Some(Color::from("a")));
        assert_eq!(rule.classify(10.0), Some(Color::from("b")));
        assert_eq!(rule.classify(19.0), Some(Color::from("b")));
        assert_eq!(rule.classify(9.5), None);
        assert_eq!(rule.classify(20.0), None);
    }

    #[test]
    fn rejects_overlapping_or_inverted_bands() {
        assert!(BandedRule::new(vec![band(0, 10, "a"), band(10, 20, "b")]).is_err());
        assert!(BandedRule::new(vec![band(5, 1, "a")]).is_err());
    }

    #[test]
    fn threshold_is_strict() {
        let rule = ThresholdRule::new(273.0, Color::from("red"));
        assert_eq!(rule.classify(274.0), Some(Color::from("red")));
        assert_eq!(rule.classify(273.0), None);
    }

    #[test]
    fn lookup_matches_exactly_or_falls_back() {
        let rule = LookupRule::new(vec![
            RasterColor {
                val: 1.0,
                color: Color::from("#111111"),
            },
            RasterColor {
                val: 2.0,
                color: Color::from("#222222"),
            },
        ]);
        assert_eq!(rule.classify(2.0), Some(Color::from("#222222")));
        assert_eq!(rule.classify(3.0), Some(Color::from(LOOKUP_FALLBACK_COLOR)));
        assert!(rule.lookup(3.0).is_none());
    }
}
