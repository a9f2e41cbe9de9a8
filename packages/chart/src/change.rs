//! Change normalizer for change-detection results.

use misland_analysis_models::{ChangeChart, ChangeResult, ChartSeries};
use misland_indicator_models::{Color, Indicator};

use crate::{ChartError, UNMATCHED_CHANGE_COLOR, display_value};

/// Builds chart data from a change result.
///
/// Each class is colored by the indicator legend entry with the same
/// `change_type` (never the label), or [`UNMATCHED_CHANGE_COLOR`] when the
/// legend has none.
///
/// # Errors
///
/// Returns [`ChartError::MalformedPayload`] if a class has no numeric
/// `area`.
pub fn normalize_change(
    result: &ChangeResult,
    indicator: &Indicator,
) -> Result<ChangeChart, ChartError> {
    let mut series = ChartSeries::new();

    for row in &result.stats {
        let area = row.area.ok_or_else(|| ChartError::MalformedPayload {
            message: format!("change class '{}' has no numeric area", row.label),
        })?;
        let color = row
            .change_type
            .as_ref()
            .and_then(|change_type| indicator.legend_color(change_type))
            .cloned()
            .unwrap_or_else(|| Color::from(UNMATCHED_CHANGE_COLOR));
        series.push(row.label.clone(), display_value(area), color);
    }

    Ok(ChangeChart {
        series,
        indicator: indicator.clone(),
    })
}

/// Like [`normalize_change`], but renders a malformed result as an empty
/// chart.
#[must_use]
pub fn normalize_change_or_empty(result: &ChangeResult, indicator: &Indicator) -> ChangeChart {
    normalize_change(result, indicator).unwrap_or_else(|e| {
        log::warn!("Rendering empty {} chart: {e}", indicator.name);
        ChangeChart {
            series: ChartSeries::new(),
            indicator: indicator.clone(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use misland_analysis_models::AnalysisPayload;
    use misland_indicator_models::{ChangeKey, IndicatorKind};
    use serde_json::json;

    fn change(body: &serde_json::Value) -> ChangeResult {
        match AnalysisPayload::from_value(body).unwrap() {
            AnalysisPayload::ChangeSet(result) => result,
            AnalysisPayload::Categorical(_) => panic!("expected change payload"),
        }
    }

    #[test]
    fn degraded_loss_class() {
        let result = change(&json!({
            "stats": [{"label": "Degraded", "change_type": "loss", "area": 20000}]
        }));
        let indicator = Indicator::new(IndicatorKind::ForestChange)
            .with_color(ChangeKey::Name("loss".to_string()), "#ff0000");
        let chart = normalize_change(&result, &indicator).unwrap();
        assert_eq!(chart.series.labels(), ["Degraded"]);
        assert_eq!(chart.series.values(), ["2.00"]);
        assert_eq!(chart.series.background_color(), [Color::from("#ff0000")]);
        assert_eq!(chart.indicator, indicator);
    }

    #[test]
    fn colors_follow_change_type_not_label() {
        let result = change(&json!({
            "stats": [
                {"label": "Improved", "change_type": 3, "area": 10000},
                {"label": "Stable", "change_type": 0, "area": 30000},
                {"label": "Degraded", "change_type": -1, "area": 5000}
            ]
        }));
        let indicator = Indicator::new(IndicatorKind::Sdg1531)
            .with_color(ChangeKey::Code(3), "#006400")
            .with_color(ChangeKey::Code(-1), "#9b2779")
            .with_color(ChangeKey::Name("Stable".to_string()), "#000000");
        let chart = normalize_change(&result, &indicator).unwrap();
        let colors: Vec<&str> = chart.series.background_color().iter().map(Color::as_str).collect();
        assert_eq!(colors, ["#006400", UNMATCHED_CHANGE_COLOR, "#9b2779"]);
        assert_eq!(chart.series.values(), ["1.00", "3.00", "0.50"]);
    }

    #[test]
    fn missing_area_is_malformed() {
        let result = change(&json!({"stats": [{"label": "Degraded", "change_type": 1}]}));
        let indicator = Indicator::new(IndicatorKind::ForestChange);
        assert!(normalize_change(&result, &indicator).is_err());
        assert!(normalize_change_or_empty(&result, &indicator).series.is_empty());
    }
}
