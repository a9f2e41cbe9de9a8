#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Chart normalization and summary statistics for analysis results.
//!
//! Turns decoded [`AnalysisPayload`]s into aligned chart series:
//!
//! - [`stats::normalize_stats`] for categorical results, colored by the
//!   result's own label mapping,
//! - [`change::normalize_change`] for change results, colored by the
//!   indicator's change-type legend,
//!
//! and computes the percentages and category lookups used in summary
//! sentences ([`summary`]).

pub mod change;
pub mod stats;
pub mod store;
pub mod summary;

use misland_analysis_models::{AnalysisPayload, ChangeChart, PayloadError, StatsChart};
use misland_indicator_models::Indicator;
use serde::Serialize;
use thiserror::Error;

/// Areas are reported in square meters and displayed in hectares.
pub const UNIT_SCALE: f64 = 10_000.0;

/// Color for a categorical label missing from the result's mapping.
pub const UNMAPPED_LABEL_COLOR: &str = "#ffff";

/// Color for a change class missing from the indicator legend.
pub const UNMATCHED_CHANGE_COLOR: &str = "#f4f1da";

/// Errors that can occur while building chart data.
#[derive(Debug, Error)]
pub enum ChartError {
    /// The payload is missing the statistics the normalizer needs.
    #[error("Malformed payload: {message}")]
    MalformedPayload {
        /// Description of what was missing.
        message: String,
    },
}

impl From<PayloadError> for ChartError {
    fn from(value: PayloadError) -> Self {
        match value {
            PayloadError::Malformed { message } => Self::MalformedPayload { message },
        }
    }
}

/// Chart data for either payload shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ChartData {
    /// Categorical result chart.
    Stats(StatsChart),
    /// Change result chart.
    Change(ChangeChart),
}

/// Normalizes a payload of either shape.
///
/// # Errors
///
/// Returns [`ChartError::MalformedPayload`] if the payload lacks the rows or
/// numeric fields its shape requires.
pub fn normalize(payload: &AnalysisPayload, indicator: &Indicator) -> Result<ChartData, ChartError> {
    match payload {
        AnalysisPayload::Categorical(result) => stats::normalize_stats(result).map(ChartData::Stats),
        AnalysisPayload::ChangeSet(result) => {
            change::normalize_change(result, indicator).map(ChartData::Change)
        }
    }
}

/// Rescales a raw area to display units and formats it with two decimals.
/// Ties round away from zero (`1250` → `"0.13"`).
#[must_use]
pub fn display_value(raw: f64) -> String {
    format!("{:.2}", round2(raw / UNIT_SCALE))
}

/// Rounds to two decimal places.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
