//! Active map selection merged into every analysis request.

use serde_json::{Map, Value};

/// Admin-boundary fields that are display-only and never sent.
const OMITTED_BOUNDARY_FIELDS: &[&str] = &["geojson", "name"];

/// The area an analysis runs over. Exactly one kind is active.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometrySelection {
    /// A predefined administrative boundary (`admin0`, `admin1`, ...,
    /// `vector`, `geojson`, `name`, ...).
    Admin(Map<String, Value>),
    /// A user-drawn geometry (GeoJSON geometry object).
    Custom(Value),
}

/// Selection state supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionContext {
    /// Active geometry, if any.
    pub geometry: Option<GeometrySelection>,
    /// Active indicator selections.
    pub indicator_selections: Value,
    /// Expanded sub-selection panels.
    pub expansion_items: Value,
}

impl SelectionContext {
    /// Context for an admin boundary.
    #[must_use]
    pub fn admin(boundary: Map<String, Value>) -> Self {
        Self {
            geometry: Some(GeometrySelection::Admin(boundary)),
            ..Self::default()
        }
    }

    /// Context for a user-drawn geometry.
    #[must_use]
    pub fn custom(geometry: Value) -> Self {
        Self {
            geometry: Some(GeometrySelection::Custom(geometry)),
            ..Self::default()
        }
    }

    /// Merges the selection into a request payload.
    ///
    /// Selection fields override same-named payload fields. The boundary's
    /// `geojson` and `name` are left out; `user_selections` records the full
    /// selection state for the backend's history.
    #[must_use]
    pub fn merge_payload(&self, payload: Value) -> Value {
        let mut merged = match payload {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                log::warn!("Analysis payload is not an object; sending selection only: {other}");
                Map::new()
            }
        };

        let (geometry_data, custom_geometry_data) = match &self.geometry {
            Some(GeometrySelection::Admin(boundary)) => {
                if let Some(admin0) = boundary.get("admin0") {
                    merged.insert("admin_0".to_string(), admin0.clone());
                }
                for (key, value) in boundary {
                    if !OMITTED_BOUNDARY_FIELDS.contains(&key.as_str()) {
                        merged.insert(key.clone(), value.clone());
                    }
                }
                (Value::Object(boundary.clone()), Value::Null)
            }
            Some(GeometrySelection::Custom(geometry)) => {
                merged.insert("custom_coords".to_string(), geometry.clone());
                let mut custom = Map::new();
                custom.insert("custom".to_string(), geometry.clone());
                (Value::Null, Value::Object(custom))
            }
            None => (Value::Null, Value::Null),
        };

        let mut user_selections = Map::new();
        user_selections.insert(
            "indicator_selections".to_string(),
            self.indicator_selections.clone(),
        );
        user_selections.insert("expansion_items".to_string(), self.expansion_items.clone());
        user_selections.insert("geometry_data".to_string(), geometry_data);
        user_selections.insert("custom_geometry_data".to_string(), custom_geometry_data);
        merged.insert("user_selections".to_string(), Value::Object(user_selections));

        Value::Object(merged)
    }
}
