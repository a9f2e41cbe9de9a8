#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Analysis result payloads and chart-ready series.
//!
//! The backend answers analysis requests with one of two shapes:
//!
//! - **categorical** results (e.g. land cover) nest per-period statistics
//!   under `stats.stats` and carry a label → color `mapping`,
//! - **change** results carry a flat `stats` array of change classes with
//!   areas, colored by the indicator's change-type legend.
//!
//! [`AnalysisPayload::from_value`] decides the shape once, at ingestion, so
//! downstream consumers never sniff shapes again.

pub mod number;
pub mod series;

use misland_indicator_models::{ChangeKey, Color, IndicatorKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use series::{ChangeChart, ChartSeries, StatsChart};

/// Errors raised while decoding an analysis payload.
#[derive(Debug, Error)]
pub enum PayloadError {
    /// The payload does not have a recognizable statistics shape.
    #[error("Malformed payload: {message}")]
    Malformed {
        /// Description of what was missing or invalid.
        message: String,
    },
}

impl PayloadError {
    fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }
}

/// A reporting year. The backend sends integers for computed results and
/// strings for some precomputed ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Year {
    /// Numeric year.
    Number(i64),
    /// Year (or period label) as text.
    Text(String),
}

impl std::fmt::Display for Year {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(year) => write!(f, "{year}"),
            Self::Text(year) => f.write_str(year),
        }
    }
}

/// One statistics row.
///
/// Categorical rows carry `key`/`raw_val`/`value`; change rows carry
/// `change_type`/`count`/`area`. Every numeric field is optional because
/// consumers must not assume which one is populated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatEntry {
    /// Display label.
    pub label: String,
    /// Change class (change results only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_type: Option<ChangeKey>,
    /// Area in square meters (change results).
    #[serde(default, deserialize_with = "number::deserialize_opt")]
    pub area: Option<f64>,
    /// Area in square meters (categorical results).
    #[serde(default, deserialize_with = "number::deserialize_opt")]
    pub value: Option<f64>,
    /// Pixel count.
    #[serde(default, deserialize_with = "number::deserialize_opt")]
    pub count: Option<f64>,
    /// Raster class value (categorical results).
    #[serde(default, deserialize_with = "number::deserialize_opt")]
    pub key: Option<f64>,
    /// Untransformed pixel count (categorical results).
    #[serde(default, deserialize_with = "number::deserialize_opt")]
    pub raw_val: Option<f64>,
}

impl StatEntry {
    /// Area if present and non-zero, otherwise `value`.
    #[must_use]
    pub fn area_or_value(&self) -> Option<f64> {
        self.area.filter(|area| *area != 0.0).or(self.value)
    }
}

/// A label → color assignment from a categorical result's `mapping`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelColor {
    /// Class label.
    pub label: String,
    /// Class color.
    pub color: Color,
}

/// Statistics of a single raster band / period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodStats {
    /// Rows in backend order. Required: a period without rows is malformed.
    pub stats: Vec<StatEntry>,
    /// Source raster name.
    #[serde(default)]
    pub raster_name: Option<String>,
    /// Raster resolution in meters.
    #[serde(default, deserialize_with = "number::deserialize_opt")]
    pub resolution: Option<f64>,
    /// Raster year.
    #[serde(default)]
    pub year: Option<Year>,
}

/// The nested `stats` object of a categorical result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoricalStats {
    /// Label → color legend.
    #[serde(default)]
    pub mapping: Vec<LabelColor>,
    /// Per-period statistics.
    #[serde(default)]
    pub stats: Vec<PeriodStats>,
}

/// Backend result for a single-period categorical indicator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Reporting period start.
    #[serde(default)]
    pub base: Option<Year>,
    /// Reporting period end.
    #[serde(default)]
    pub target: Option<Year>,
    /// Nested statistics.
    pub stats: CategoricalStats,
}

impl AnalysisResult {
    /// Rows of the first period, or `None` if the result has no periods.
    #[must_use]
    pub fn first_period(&self) -> Option<&[StatEntry]> {
        self.stats.stats.first().map(|period| period.stats.as_slice())
    }

    /// Looks up the legend color for a label. The first matching entry wins.
    #[must_use]
    pub fn mapped_color(&self, label: &str) -> Option<&Color> {
        self.stats
            .mapping
            .iter()
            .find(|entry| entry.label == label)
            .map(|entry| &entry.color)
    }
}

/// Tile service location for a rendered result raster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tiles {
    /// WMS URL.
    #[serde(default)]
    pub url: Option<String>,
    /// Layer name.
    #[serde(default)]
    pub layer: Option<String>,
}

/// Backend result for a change-detection indicator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeResult {
    /// Reporting period start.
    #[serde(default)]
    pub base: Option<Year>,
    /// Reporting period end.
    #[serde(default)]
    pub target: Option<Year>,
    /// Change classes in backend order.
    pub stats: Vec<StatEntry>,
    /// Raster no-data value.
    #[serde(default, deserialize_with = "number::deserialize_opt")]
    pub nodataval: Option<f64>,
    /// Area covered by no-data pixels.
    #[serde(default, deserialize_with = "number::deserialize_opt")]
    pub nodata: Option<f64>,
    /// Download URL of the result raster.
    #[serde(default)]
    pub rasterfile: Option<String>,
    /// Tile service for the result raster.
    #[serde(default)]
    pub tiles: Option<Tiles>,
}

/// An analysis payload, tagged by shape.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisPayload {
    /// Nested `stats.stats` shape.
    Categorical(AnalysisResult),
    /// Flat `stats` array shape.
    ChangeSet(ChangeResult),
}

impl AnalysisPayload {
    /// Decodes a backend response body, detecting its shape.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError::Malformed`] if `stats` is missing, is
    /// neither a nested object nor an array, or fails to decode.
    pub fn from_value(body: &serde_json::Value) -> Result<Self, PayloadError> {
        let stats = body
            .get("stats")
            .ok_or_else(|| PayloadError::malformed("missing `stats`"))?;

        if stats.as_object().is_some_and(|obj| obj.contains_key("stats")) {
            let result = serde_json::from_value::<AnalysisResult>(body.clone())
                .map_err(|e| PayloadError::malformed(format!("categorical result: {e}")))?;
            return Ok(Self::Categorical(result));
        }

        if stats.is_array() {
            let result = serde_json::from_value::<ChangeResult>(body.clone())
                .map_err(|e| PayloadError::malformed(format!("change result: {e}")))?;
            return Ok(Self::ChangeSet(result));
        }

        Err(PayloadError::malformed(
            "`stats` is neither a nested statistics object nor an array",
        ))
    }

    /// Reporting period start.
    #[must_use]
    pub const fn base(&self) -> Option<&Year> {
        match self {
            Self::Categorical(result) => result.base.as_ref(),
            Self::ChangeSet(result) => result.base.as_ref(),
        }
    }

    /// Reporting period end.
    #[must_use]
    pub const fn target(&self) -> Option<&Year> {
        match self {
            Self::Categorical(result) => result.target.as_ref(),
            Self::ChangeSet(result) => result.target.as_ref(),
        }
    }
}

/// A successful analysis response as held in the result store.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRecord {
    /// Indicator the request was made for.
    pub indicator: Option<IndicatorKind>,
    /// Raw response body.
    pub body: serde_json::Value,
    /// Decoded statistics, when the body carries any.
    pub payload: Option<AnalysisPayload>,
}

impl AnalysisRecord {
    /// Wraps a response body, decoding its statistics once.
    ///
    /// Bodies without a statistics shape (e.g. vector search results) are
    /// kept with `payload == None`.
    #[must_use]
    pub fn new(indicator: Option<IndicatorKind>, body: serde_json::Value) -> Self {
        let payload = match AnalysisPayload::from_value(&body) {
            Ok(payload) => Some(payload),
            Err(e) => {
                log::debug!("Response carries no chartable statistics: {e}");
                None
            }
        };
        Self {
            indicator,
            body,
            payload,
        }
    }

    /// The response body with the `indicator` field merged in, as the
    /// result store exposes it to templates.
    #[must_use]
    pub fn to_value(&self) -> serde_json::Value {
        let mut value = self.body.clone();
        if let (Some(obj), Some(indicator)) = (value.as_object_mut(), &self.indicator) {
            obj.insert(
                "indicator".to_string(),
                serde_json::Value::String(indicator.to_string()),
            );
        }
        value
    }
}

/// A scheduled (queued) task whose result completed asynchronously.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueuedResult {
    /// The analysis result produced by the task, if it finished.
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    /// Remaining task metadata (id, status, timestamps, ...).
    #[serde(flatten)]
    pub task: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn detects_categorical_shape() {
        let body = json!({
            "base": 2015,
            "target": 2020,
            "stats": {
                "mapping": [{"label": "Forest", "color": "#00ff00"}],
                "stats": [{"stats": [{"key": 1, "label": "Forest", "raw_val": 5, "value": 50000}]}]
            }
        });
        let AnalysisPayload::Categorical(result) = AnalysisPayload::from_value(&body).unwrap()
        else {
            panic!("expected categorical payload");
        };
        assert_eq!(result.base, Some(Year::Number(2015)));
        assert_eq!(result.first_period().unwrap()[0].value, Some(50000.0));
        assert_eq!(result.mapped_color("Forest"), Some(&Color::from("#00ff00")));
        assert!(result.mapped_color("Water").is_none());
    }

    #[test]
    fn detects_change_shape() {
        let body = json!({
            "base": "2001",
            "target": "2018",
            "nodataval": -32768,
            "stats": [{"label": "Degraded", "change_type": 1, "count": 2, "area": "20000"}]
        });
        let AnalysisPayload::ChangeSet(result) = AnalysisPayload::from_value(&body).unwrap()
        else {
            panic!("expected change payload");
        };
        assert_eq!(result.stats[0].change_type, Some(ChangeKey::Code(1)));
        assert_eq!(result.stats[0].area, Some(20000.0));
        assert_eq!(result.nodataval, Some(-32768.0));
    }

    #[test]
    fn rejects_unrecognized_shapes() {
        assert!(AnalysisPayload::from_value(&json!({"message": "queued"})).is_err());
        assert!(AnalysisPayload::from_value(&json!({"stats": 4})).is_err());
        assert!(AnalysisPayload::from_value(&json!({"stats": {"mapping": []}})).is_err());
    }

    #[test]
    fn period_without_rows_is_malformed() {
        let body = json!({"stats": {"mapping": [], "stats": [{"raster_name": "lulc"}]}});
        assert!(matches!(
            AnalysisPayload::from_value(&body),
            Err(PayloadError::Malformed { .. })
        ));

        let body = json!({"stats": {"mapping": [], "stats": [{"stats": {"label": "Forest"}}]}});
        assert!(AnalysisPayload::from_value(&body).is_err());
    }

    #[test]
    fn area_or_value_skips_zero_area() {
        let entry = StatEntry {
            label: "Stable".to_string(),
            area: Some(0.0),
            value: Some(3.0),
            ..StatEntry::default()
        };
        assert_eq!(entry.area_or_value(), Some(3.0));
    }

    #[test]
    fn record_merges_indicator_into_body() {
        let record = AnalysisRecord::new(
            Some(IndicatorKind::ForestFire),
            json!({"stats": [], "rasterfile": "x.tif"}),
        );
        assert!(matches!(record.payload, Some(AnalysisPayload::ChangeSet(_))));
        assert_eq!(record.to_value()["indicator"], "forest_fire");
    }

    #[test]
    fn queued_result_keeps_task_metadata() {
        let queued: QueuedResult =
            serde_json::from_value(json!({"id": 7, "status": "Finished", "result": {"stats": []}}))
                .unwrap();
        assert_eq!(queued.task["id"], 7);
        assert!(queued.result.is_some());
    }
}
