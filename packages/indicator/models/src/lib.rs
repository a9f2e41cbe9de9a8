#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Land-degradation indicator identities and color legends.
//!
//! An indicator is a named metric (land cover, forest fire, forest fire
//! risk, ...) that carries its own color legend. Change-type legends key on
//! the backend's `change_type` code, never on the display label.
//!
//! Also defines the catalog of analysis endpoints exposed by the MISLAND
//! backend under `/api/`.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// A CSS color string as sent by the backend (`"#00ff00"`, `"red"`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(String);

impl Color {
    /// Wraps a CSS color string.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the color as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Color {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Key of a change category.
///
/// The backend emits integer codes for raster-derived change classes and
/// strings for some precomputed results. Keys compare strictly: `1` never
/// equals `"1"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChangeKey {
    /// Numeric change class code.
    Code(i64),
    /// Named change class.
    Name(String),
}

impl std::fmt::Display for ChangeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Code(code) => write!(f, "{code}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

impl FromStr for ChangeKey {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.parse::<i64>()
            .map_or_else(|_| Self::Name(s.to_string()), Self::Code))
    }
}

/// Identity of a land-degradation indicator.
///
/// Indicators that carry special handling anywhere in the pipeline get a
/// dedicated variant; every other backend name is preserved verbatim in
/// [`IndicatorKind::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IndicatorKind {
    /// Land cover composition (categorical statistics).
    LandCover,
    /// Burn severity (dNBR) bands.
    ForestFire,
    /// Fire risk index with a single cutoff.
    ForestFireRisk,
    /// Forest gain/loss.
    ForestChange,
    /// SDG 15.3.1 proportion of degraded land.
    Sdg1531,
    /// Vegetation loss/gain hotspots.
    VegetationLoss,
    /// Coastal vulnerability.
    CoastalErosion,
    /// MEDALUS desertification sensitivity.
    Desertification,
    /// Water and wind erosion risk.
    SoilErosion,
    /// Any other indicator name.
    Other(String),
}

impl IndicatorKind {
    /// Returns the backend name of this indicator.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::LandCover => "landcover",
            Self::ForestFire => "forest_fire",
            Self::ForestFireRisk => "forest_fire_risk",
            Self::ForestChange => "forest_change",
            Self::Sdg1531 => "sdg_15_3_1",
            Self::VegetationLoss => "veg_loss",
            Self::CoastalErosion => "coastal_erosion",
            Self::Desertification => "desertification",
            Self::SoilErosion => "soil_erosion",
            Self::Other(name) => name,
        }
    }

    /// Whether summary statistics for this indicator are computed from the
    /// nested categorical statistics instead of flat change areas.
    #[must_use]
    pub const fn is_land_cover(&self) -> bool {
        matches!(self, Self::LandCover)
    }
}

impl std::fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for IndicatorKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "landcover" => Self::LandCover,
            "forest_fire" => Self::ForestFire,
            "forest_fire_risk" => Self::ForestFireRisk,
            "forest_change" => Self::ForestChange,
            "sdg_15_3_1" => Self::Sdg1531,
            "veg_loss" => Self::VegetationLoss,
            "coastal_erosion" => Self::CoastalErosion,
            "desertification" => Self::Desertification,
            "soil_erosion" => Self::SoilErosion,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for IndicatorKind {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<IndicatorKind> for String {
    fn from(value: IndicatorKind) -> Self {
        match value {
            IndicatorKind::Other(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

/// One entry of a change-type color legend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeTypeColor {
    /// Change class this color applies to.
    pub change_type: ChangeKey,
    /// Legend color.
    pub color: Color,
}

/// An indicator together with its change-type legend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Indicator {
    /// Indicator identity. The client selection object calls this `value`.
    #[serde(alias = "value")]
    pub name: IndicatorKind,
    /// Change-type legend, in backend order.
    #[serde(default)]
    pub colors: Vec<ChangeTypeColor>,
}

impl Indicator {
    /// Creates an indicator with an empty legend.
    #[must_use]
    pub const fn new(name: IndicatorKind) -> Self {
        Self {
            name,
            colors: Vec::new(),
        }
    }

    /// Adds a legend entry.
    #[must_use]
    pub fn with_color(mut self, change_type: ChangeKey, color: impl Into<Color>) -> Self {
        self.colors.push(ChangeTypeColor {
            change_type,
            color: color.into(),
        });
        self
    }

    /// Looks up the legend color for a change class. The first matching
    /// entry wins.
    #[must_use]
    pub fn legend_color(&self, change_type: &ChangeKey) -> Option<&Color> {
        self.colors
            .iter()
            .find(|entry| &entry.change_type == change_type)
            .map(|entry| &entry.color)
    }
}

/// A discrete raster value to color assignment (`raster_colors`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RasterColor {
    /// Exact pixel value.
    pub val: f64,
    /// Color for that value.
    pub color: Color,
}

/// Analysis endpoints served under `/api/` by the MISLAND backend.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AnalysisEndpoint {
    /// Land use / land cover.
    Lulc,
    /// Soil organic carbon.
    Soc,
    /// Forest gain/loss.
    ForestChange,
    /// Burnt area severity.
    ForestFire,
    /// Productivity state.
    State,
    /// Productivity trajectory.
    Trajectory,
    /// Productivity performance.
    Performance,
    /// Combined land productivity.
    Productivity,
    /// SDG 15.3.1 land degradation.
    Degradation,
    /// Aridity index.
    Aridity,
    /// Climate quality index.
    ClimateQuality,
    /// Soil quality index.
    SoilQuality,
    /// Management quality index.
    ManagementQuality,
    /// Vegetation quality index.
    VegetationQuality,
    /// Environmentally sensitive area index.
    Esai,
    /// Forest carbon emission.
    CarbonEmission,
    /// Forest fire risk.
    ForestFireRisk,
    /// Index of land susceptibility to wind erosion.
    Ilswe,
    /// Revised universal soil loss equation.
    Rusle,
    /// Coastal vulnerability index.
    Cvi,
    /// Vector search.
    Search,
}

impl AnalysisEndpoint {
    /// Path relative to the API base URL (e.g. `"api/lulc/"`).
    #[must_use]
    pub fn path(self) -> String {
        format!("api/{self}/")
    }

    /// Indicator whose legend and raster rules apply to this endpoint's
    /// results.
    #[must_use]
    pub fn default_indicator(self) -> IndicatorKind {
        match self {
            Self::Lulc => IndicatorKind::LandCover,
            Self::ForestFire => IndicatorKind::ForestFire,
            Self::ForestFireRisk => IndicatorKind::ForestFireRisk,
            Self::ForestChange => IndicatorKind::ForestChange,
            Self::Degradation => IndicatorKind::Sdg1531,
            other => IndicatorKind::Other(other.to_string()),
        }
    }
}
