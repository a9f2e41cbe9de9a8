//! Chart-ready series handed to the charting surface.

use misland_indicator_models::{Color, Indicator};
use serde::Serialize;

use crate::Year;

/// Positionally aligned chart data: `labels[i]`, `values[i]` and
/// `background_color[i]` describe the same bar or slice.
///
/// Entries can only be appended as complete triples, so the three
/// sequences always have equal length.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChartSeries {
    labels: Vec<String>,
    values: Vec<String>,
    #[serde(rename = "backgroundColor")]
    background_color: Vec<Color>,
}

impl ChartSeries {
    /// Creates an empty series.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            labels: Vec::new(),
            values: Vec::new(),
            background_color: Vec::new(),
        }
    }

    /// Appends one aligned entry.
    pub fn push(&mut self, label: impl Into<String>, value: impl Into<String>, color: Color) {
        self.labels.push(label.into());
        self.values.push(value.into());
        self.background_color.push(color);
    }

    /// Display labels, in source order.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Display values (two decimals), aligned with [`Self::labels`].
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Colors, aligned with [`Self::labels`].
    #[must_use]
    pub fn background_color(&self) -> &[Color] {
        &self.background_color
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the series has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Iterates over `(label, value, color)` triples.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &Color)> {
        self.labels
            .iter()
            .zip(&self.values)
            .zip(&self.background_color)
            .map(|((label, value), color)| (label.as_str(), value.as_str(), color))
    }
}

/// Chart data for a single-period categorical result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatsChart {
    /// Aligned chart entries.
    #[serde(flatten)]
    pub series: ChartSeries,
    /// Reporting period start (`base`).
    pub start_year: Option<Year>,
    /// Reporting period end (`target`).
    pub end_year: Option<Year>,
}

/// Chart data for a change-detection result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeChart {
    /// Aligned chart entries.
    #[serde(flatten)]
    pub series: ChartSeries,
    /// Indicator whose legend colored the entries.
    pub indicator: Indicator,
}
