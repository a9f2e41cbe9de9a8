//! Summary statistics for human-readable result sentences.
//!
//! Both calculators resolve a comparison population first. Land cover is
//! the one indicator whose population is reshaped: its rows live in the
//! stored categorical result's first period and are measured by `value`.
//! Every other population is the explicit `results` slice, or the stored
//! change result's rows, measured by `area`.

use misland_analysis_models::{AnalysisPayload, StatEntry};
use misland_indicator_models::{ChangeKey, IndicatorKind};

use crate::round2;

/// Text shown when a share is positive but rounds below one percent.
pub const LESS_THAN_ONE_PERCENT: &str = "(less than 1%)";

/// Ambient state the calculators read: the stored result and the active
/// indicator selection.
#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryContext<'a> {
    /// Currently stored analysis result.
    pub stored: Option<&'a AnalysisPayload>,
    /// Currently selected indicator.
    pub indicator: Option<&'a IndicatorKind>,
}

impl<'a> SummaryContext<'a> {
    /// Creates a context.
    #[must_use]
    pub const fn new(stored: Option<&'a AnalysisPayload>, indicator: Option<&'a IndicatorKind>) -> Self {
        Self { stored, indicator }
    }

    fn population(&self, results: Option<&'a [StatEntry]>) -> Option<Population<'a>> {
        if self.indicator.is_some_and(IndicatorKind::is_land_cover) {
            if let Some(AnalysisPayload::Categorical(result)) = self.stored {
                if let Some(rows) = result.first_period() {
                    return Some(Population {
                        rows,
                        measure: Measure::Value,
                    });
                }
            }
            log::debug!("Land cover selected but no categorical result is stored");
        }

        let rows = results.or_else(|| match self.stored {
            Some(AnalysisPayload::ChangeSet(result)) => Some(result.stats.as_slice()),
            Some(AnalysisPayload::Categorical(_)) | None => None,
        })?;

        Some(Population {
            rows,
            measure: Measure::Area,
        })
    }
}

#[derive(Debug, Clone, Copy)]
enum Measure {
    Area,
    Value,
}

#[derive(Debug, Clone, Copy)]
struct Population<'a> {
    rows: &'a [StatEntry],
    measure: Measure,
}

impl Population<'_> {
    /// Sum of the measured field. A row without the field makes the total
    /// not a number.
    fn total(&self) -> f64 {
        self.rows
            .iter()
            .map(|row| match self.measure {
                Measure::Area => row.area,
                Measure::Value => row.value,
            })
            .map(|field| field.unwrap_or(f64::NAN))
            .sum()
    }
}

/// A share of the total, banded for display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PercentageLabel {
    /// The share could not be computed.
    NotAvailable,
    /// Positive but below one percent after rounding.
    LessThanOne,
    /// Percentage rounded to two decimals.
    Value(f64),
}

impl PercentageLabel {
    /// Renders the label emphasized for summary templates.
    #[must_use]
    pub fn to_html(&self) -> String {
        match self {
            Self::NotAvailable => self.to_string(),
            Self::LessThanOne | Self::Value(_) => format!("<strong>{self}</strong>"),
        }
    }
}

impl std::fmt::Display for PercentageLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAvailable => f.write_str("0%"),
            Self::LessThanOne => f.write_str(LESS_THAN_ONE_PERCENT),
            Self::Value(pct) => write!(f, "{pct:.2} %"),
        }
    }
}

/// Share of `value` in the population total.
///
/// The percentage is rounded to two decimals before banding, so a share
/// that rounds to `0.00` is reported as `0.00 %`, not as less than one
/// percent.
#[must_use]
pub fn percentage_of(
    value: f64,
    results: Option<&[StatEntry]>,
    ctx: &SummaryContext<'_>,
) -> PercentageLabel {
    let Some(population) = ctx.population(results) else {
        return PercentageLabel::NotAvailable;
    };

    let pct = round2(value / population.total() * 100.0);
    if !pct.is_finite() {
        PercentageLabel::NotAvailable
    } else if pct > 0.0 && pct < 1.0 {
        PercentageLabel::LessThanOne
    } else {
        PercentageLabel::Value(pct)
    }
}

/// Criteria for [`stat_value_for`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StatQuery<'a> {
    /// Display label to match.
    pub label: Option<&'a str>,
    /// Change class to match; searched before the label.
    pub change_type: Option<&'a ChangeKey>,
    /// Explicit population; defaults to the stored result.
    pub results: Option<&'a [StatEntry]>,
}

/// Looks up a row's magnitude by change class, then by label.
///
/// Returns the row's `area` when present and non-zero, otherwise its
/// `value`.
#[must_use]
pub fn stat_value_for(query: &StatQuery<'_>, ctx: &SummaryContext<'_>) -> Option<f64> {
    let population = ctx.population(query.results)?;

    if let Some(change_type) = query.change_type {
        if let Some(row) = population
            .rows
            .iter()
            .find(|row| row.change_type.as_ref() == Some(change_type))
        {
            return row.area_or_value();
        }
    }

    let label = query.label?;
    population
        .rows
        .iter()
        .find(|row| row.label == label)
        .and_then(StatEntry::area_or_value)
}
