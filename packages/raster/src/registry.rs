//! Compile-time registry of indicator-specific raster rules.
//!
//! Each indicator with special raster handling is defined in a TOML file
//! under `rules/`. The registry embeds these at compile time and exposes
//! them via [`all_rule_sets`] and [`rule_set_for`]. Indicators without an
//! entry are colored by the session lookup table alone.

use misland_indicator_models::{Color, IndicatorKind};
use serde::Deserialize;

use crate::RasterError;
use crate::rules::{Band, BandedRule, ClassificationRule, ThresholdRule};

/// Raster rules for one indicator, loaded from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleSet {
    /// Indicator these rules apply to.
    pub indicator: IndicatorKind,
    /// When set, the session lookup table is not appended after these
    /// rules, so unmatched pixels get no color.
    #[serde(default)]
    pub terminal: bool,
    /// Rules in evaluation order.
    pub rules: Vec<RuleConfig>,
}

/// A single rule definition, tagged by `type` in TOML.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleConfig {
    /// Disjoint inclusive integer bands.
    Banded {
        /// Bands in any order.
        bands: Vec<Band>,
    },
    /// Single cutoff.
    Threshold {
        /// Values strictly above this are colored.
        above: f64,
        /// Color for values above the cutoff.
        color: Color,
    },
}

impl RuleConfig {
    /// Builds the rule object.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::InvalidRule`] if a banded rule is malformed.
    pub fn build(&self) -> Result<Box<dyn ClassificationRule>, RasterError> {
        Ok(match self {
            Self::Banded { bands } => Box::new(BandedRule::new(bands.clone())?),
            Self::Threshold { above, color } => Box::new(ThresholdRule::new(*above, color.clone())),
        })
    }
}

// ── Compile-time embedded TOML files ────────────────────────────────

const RULE_TOMLS: &[(&str, &str)] = &[
    ("forest_fire", include_str!("../rules/forest_fire.toml")),
    ("forest_fire_risk", include_str!("../rules/forest_fire_risk.toml")),
];

#[cfg(test)]
const EXPECTED_RULE_SET_COUNT: usize = 2;

/// Returns every embedded rule set.
///
/// # Panics
///
/// Panics if any TOML file is malformed (the files are embedded, so this
/// is caught by the test suite).
#[must_use]
pub fn all_rule_sets() -> Vec<RuleSet> {
    RULE_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            toml::de::from_str(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse raster rules '{name}': {e}"))
        })
        .collect()
}

/// Returns the rule set for an indicator, if it has one.
#[must_use]
pub fn rule_set_for(indicator: &IndicatorKind) -> Option<RuleSet> {
    all_rule_sets()
        .into_iter()
        .find(|set| &set.indicator == indicator)
}
