#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Pixel value to color classification for raster map layers.
//!
//! A [`Classifier`] is built once per rendered layer from the active
//! indicator, the session's discrete color table, and the raster's no-data
//! value. It evaluates an ordered chain of [`rules::ClassificationRule`]s:
//!
//! 1. indicator-specific rules from the embedded [`registry`] (banded
//!    ranges, single thresholds),
//! 2. the exact-value lookup table, unless the indicator's rule set is
//!    terminal.
//!
//! The first rule that returns a color wins. The classifier has no
//! interior state, so map layers may cache its answers per pixel value.

pub mod registry;
pub mod rules;

use misland_indicator_models::{Color, IndicatorKind, RasterColor};
use thiserror::Error;

use crate::rules::{ClassificationRule, LookupRule};

/// Errors that can occur while building a classifier.
#[derive(Debug, Error)]
pub enum RasterError {
    /// A rule definition is inconsistent.
    #[error("Invalid raster rule: {message}")]
    InvalidRule {
        /// Description of the problem.
        message: String,
    },
}

/// Ordered rule chain for one indicator and raster.
#[derive(Debug)]
pub struct Classifier {
    indicator: IndicatorKind,
    no_data: Option<f64>,
    rules: Vec<Box<dyn ClassificationRule>>,
}

impl Classifier {
    /// Builds the rule chain for `indicator`.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::InvalidRule`] if the indicator's registered
    /// rules are malformed.
    pub fn new(
        indicator: IndicatorKind,
        raster_colors: Vec<RasterColor>,
        no_data: Option<f64>,
    ) -> Result<Self, RasterError> {
        let mut rules = Vec::new();
        let mut terminal = false;

        if let Some(set) = registry::rule_set_for(&indicator) {
            for rule in &set.rules {
                rules.push(rule.build()?);
            }
            terminal = set.terminal;
        }
        if !terminal {
            rules.push(Box::new(LookupRule::new(raster_colors)) as Box<dyn ClassificationRule>);
        }

        log::debug!(
            "Built raster classifier for {indicator} with {} rules (no-data: {no_data:?})",
            rules.len()
        );

        Ok(Self {
            indicator,
            no_data,
            rules,
        })
    }

    /// Indicator this classifier was built for.
    #[must_use]
    pub const fn indicator(&self) -> &IndicatorKind {
        &self.indicator
    }

    /// Whether `pixel` is the raster's no-data value.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_no_data(&self, pixel: f64) -> bool {
        self.no_data
            .is_some_and(|no_data| no_data == pixel || (no_data.is_nan() && pixel.is_nan()))
    }

    /// Color for a pixel value, or `None` if the pixel is not drawn.
    #[must_use]
    pub fn color_for(&self, pixel: f64) -> Option<Color> {
        if self.is_no_data(pixel) {
            return None;
        }
        self.rules.iter().find_map(|rule| rule.classify(pixel))
    }

    /// Distinct pixel values of a tile with their colors, ascending.
    /// No-data pixels and pixels without a color are omitted.
    #[must_use]
    pub fn palette(&self, pixels: impl IntoIterator<Item = f64>) -> Vec<(f64, Color)> {
        let mut values: Vec<f64> = pixels.into_iter().collect();
        values.sort_by(f64::total_cmp);
        values.dedup_by(|a, b| a.to_bits() == b.to_bits());
        values
            .into_iter()
            .filter_map(|value| self.color_for(value).map(|color| (value, color)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_DATA: f64 = -32768.0;

    fn table() -> Vec<RasterColor> {
        vec![
            RasterColor {
                val: 1.0,
                color: Color::from("#e5e5e5"),
            },
            RasterColor {
                val: 2.0,
                color: Color::from("#1a9641"),
            },
        ]
    }

    fn color(value: &str) -> Option<Color> {
        Some(Color::from(value))
    }

    #[test]
    fn no_data_is_never_colored() {
        for indicator in [
            IndicatorKind::ForestFire,
            IndicatorKind::ForestFireRisk,
            IndicatorKind::LandCover,
            IndicatorKind::Other("rusle".to_string()),
        ] {
            let classifier = Classifier::new(indicator, table(), Some(NO_DATA)).unwrap();
            assert_eq!(classifier.color_for(NO_DATA), None);
        }

        let nan = Classifier::new(IndicatorKind::LandCover, table(), Some(f64::NAN)).unwrap();
        assert_eq!(nan.color_for(f64::NAN), None);
    }

    #[test]
    fn forest_fire_bands() {
        let classifier = Classifier::new(IndicatorKind::ForestFire, table(), Some(NO_DATA)).unwrap();
        assert_eq!(classifier.color_for(-500.0), color("#768833"));
        assert_eq!(classifier.color_for(-101.0), color("#768833"));
        assert_eq!(classifier.color_for(-100.0), color("#0ce244"));
        assert_eq!(classifier.color_for(99.0), color("#0ce244"));
        assert_eq!(classifier.color_for(100.0), color("#f5fe0c"));
        assert_eq!(classifier.color_for(270.0), color("#fa671a"));
        assert_eq!(classifier.color_for(659.0), color("#fa671a"));
        assert_eq!(classifier.color_for(660.0), color("#a500d2"));
        assert_eq!(classifier.color_for(1300.0), color("#a500d2"));
    }

    #[test]
    fn forest_fire_band_coverage_is_total() {
        let classifier = Classifier::new(IndicatorKind::ForestFire, Vec::new(), None).unwrap();
        let band_colors = ["#768833", "#0ce244", "#f5fe0c", "#fa671a", "#a500d2"];
        for value in -500..=1300 {
            let resolved = classifier.color_for(f64::from(value)).unwrap();
            assert!(
                band_colors.contains(&resolved.as_str()),
                "{value} resolved to {resolved}"
            );
        }
    }

    #[test]
    fn forest_fire_out_of_band_falls_through_to_lookup() {
        let classifier = Classifier::new(IndicatorKind::ForestFire, table(), None).unwrap();
        assert_eq!(classifier.color_for(-1000.0), color(rules::LOOKUP_FALLBACK_COLOR));
        assert_eq!(classifier.color_for(-100.5), color(rules::LOOKUP_FALLBACK_COLOR));

        let table = vec![RasterColor {
            val: 2000.0,
            color: Color::from("#000000"),
        }];
        let classifier = Classifier::new(IndicatorKind::ForestFire, table, None).unwrap();
        assert_eq!(classifier.color_for(2000.0), color("#000000"));
    }

    #[test]
    fn forest_fire_risk_threshold_is_terminal() {
        let classifier = Classifier::new(IndicatorKind::ForestFireRisk, table(), Some(NO_DATA)).unwrap();
        assert_eq!(classifier.color_for(300.0), color("red"));
        assert_eq!(classifier.color_for(273.0), None);
        assert_eq!(classifier.color_for(1.0), None);
    }

    #[test]
    fn generic_indicators_use_lookup() {
        let classifier = Classifier::new(IndicatorKind::LandCover, table(), Some(NO_DATA)).unwrap();
        assert_eq!(classifier.color_for(2.0), color("#1a9641"));
        assert_eq!(classifier.color_for(7.0), color(rules::LOOKUP_FALLBACK_COLOR));
    }

    #[test]
    fn classification_is_repeatable() {
        let classifier = Classifier::new(IndicatorKind::ForestFire, table(), None).unwrap();
        for value in [-300.0, 0.0, 150.0, 5000.0] {
            assert_eq!(classifier.color_for(value), classifier.color_for(value));
        }
    }

    #[test]
    fn palette_deduplicates_and_skips_no_data() {
        let classifier = Classifier::new(IndicatorKind::LandCover, table(), Some(NO_DATA)).unwrap();
        let palette = classifier.palette([2.0, 1.0, NO_DATA, 2.0, 1.0]);
        assert_eq!(
            palette,
            vec![(1.0, Color::from("#e5e5e5")), (2.0, Color::from("#1a9641"))]
        );
    }
}
