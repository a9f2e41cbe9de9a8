//! Statistics normalizer for categorical (single-period) results.

use misland_analysis_models::{AnalysisResult, ChartSeries, StatsChart};
use misland_indicator_models::Color;

use crate::{ChartError, UNMAPPED_LABEL_COLOR, display_value};

/// Builds chart data from the first period of a categorical result.
///
/// Labels keep source order. Each label is colored by the first `mapping`
/// entry with the same label, or [`UNMAPPED_LABEL_COLOR`] when there is
/// none. Values are rescaled to hectares with two decimals.
///
/// # Errors
///
/// Returns [`ChartError::MalformedPayload`] if the result has no period
/// statistics or a row has no numeric `value`.
pub fn normalize_stats(result: &AnalysisResult) -> Result<StatsChart, ChartError> {
    let rows = result
        .first_period()
        .ok_or_else(|| ChartError::MalformedPayload {
            message: "categorical result has no period statistics".to_string(),
        })?;

    let mut series = ChartSeries::new();
    for row in rows {
        let value = row.value.ok_or_else(|| ChartError::MalformedPayload {
            message: format!("row '{}' has no numeric value", row.label),
        })?;
        let color = result.mapped_color(&row.label).cloned().unwrap_or_else(|| {
            log::debug!("No mapping color for label '{}'", row.label);
            Color::from(UNMAPPED_LABEL_COLOR)
        });
        series.push(row.label.clone(), display_value(value), color);
    }

    Ok(StatsChart {
        series,
        start_year: result.base.clone(),
        end_year: result.target.clone(),
    })
}

/// Like [`normalize_stats`], but renders a malformed result as an empty
/// chart so the caller can show an empty state.
#[must_use]
pub fn normalize_stats_or_empty(result: &AnalysisResult) -> StatsChart {
    normalize_stats(result).unwrap_or_else(|e| {
        log::warn!("Rendering empty chart: {e}");
        StatsChart {
            start_year: result.base.clone(),
            end_year: result.target.clone(),
            ..StatsChart::default()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use misland_analysis_models::{AnalysisPayload, Year};
    use serde_json::json;

    fn categorical(body: &serde_json::Value) -> AnalysisResult {
        match AnalysisPayload::from_value(body).unwrap() {
            AnalysisPayload::Categorical(result) => result,
            AnalysisPayload::ChangeSet(_) => panic!("expected categorical payload"),
        }
    }

    #[test]
    fn single_forest_class() {
        let result = categorical(&json!({
            "base": 2015,
            "target": 2020,
            "stats": {
                "mapping": [{"label": "Forest", "color": "#00ff00"}],
                "stats": [{"stats": [{"label": "Forest", "value": 50000}]}]
            }
        }));
        let chart = normalize_stats(&result).unwrap();
        assert_eq!(chart.series.labels(), ["Forest"]);
        assert_eq!(chart.series.values(), ["5.00"]);
        assert_eq!(chart.series.background_color(), [Color::from("#00ff00")]);
        assert_eq!(chart.start_year, Some(Year::Number(2015)));
        assert_eq!(chart.end_year, Some(Year::Number(2020)));
    }

    #[test]
    fn unmapped_labels_get_placeholder_and_order_is_kept() {
        let result = categorical(&json!({
            "stats": {
                "mapping": [
                    {"label": "Cropland", "color": "#ffff64"},
                    {"label": "Forest", "color": "#00a000"}
                ],
                "stats": [{"stats": [
                    {"label": "Forest", "value": 120000},
                    {"label": "Bare land", "value": 5000},
                    {"label": "Cropland", "value": 10000}
                ]}]
            }
        }));
        let chart = normalize_stats(&result).unwrap();
        assert_eq!(chart.series.labels(), ["Forest", "Bare land", "Cropland"]);
        assert_eq!(chart.series.values(), ["12.00", "0.50", "1.00"]);
        let colors: Vec<&str> = chart.series.background_color().iter().map(Color::as_str).collect();
        assert_eq!(colors, ["#00a000", UNMAPPED_LABEL_COLOR, "#ffff64"]);
    }

    #[test]
    fn series_lengths_always_match() {
        let result = categorical(&json!({
            "stats": {
                "mapping": [{"label": "A", "color": "red"}],
                "stats": [{"stats": [
                    {"label": "A", "value": 1},
                    {"label": "B", "value": "2"},
                    {"label": "C", "value": 3.5}
                ]}]
            }
        }));
        let chart = normalize_stats(&result).unwrap();
        assert_eq!(chart.series.labels().len(), 3);
        assert_eq!(chart.series.values().len(), 3);
        assert_eq!(chart.series.background_color().len(), 3);
    }

    #[test]
    fn missing_periods_are_malformed() {
        let result = categorical(&json!({"stats": {"mapping": [], "stats": []}}));
        assert!(matches!(
            normalize_stats(&result),
            Err(ChartError::MalformedPayload { .. })
        ));
        assert!(normalize_stats_or_empty(&result).series.is_empty());
    }

    #[test]
    fn missing_value_is_malformed() {
        let result = categorical(&json!({
            "stats": {"mapping": [], "stats": [{"stats": [{"label": "A"}]}]}
        }));
        assert!(normalize_stats(&result).is_err());
    }

    #[test]
    fn half_hectare_ties_round_up() {
        let result = categorical(&json!({
            "stats": {"mapping": [], "stats": [{"stats": [
                {"label": "Wetland", "value": 1250},
                {"label": "Bare land", "value": 6250}
            ]}]}
        }));
        let chart = normalize_stats(&result).unwrap();
        assert_eq!(chart.series.values(), ["0.13", "0.63"]);
    }

    #[test]
    fn period_without_rows_is_malformed() {
        let body = json!({"stats": {"mapping": [], "stats": [{"raster_name": "lulc"}]}});
        let err = AnalysisPayload::from_value(&body).map(|_| ()).unwrap_err();
        assert!(matches!(
            ChartError::from(err),
            ChartError::MalformedPayload { .. }
        ));
    }
}
