// crates/schoolmap-core/src/geocode/record.rs
use super::GeocodeResult;
use crate::common::{LatLng, LatLngBounds, ViewTarget};
use crate::error::{MapError, Result};
use crate::traits::NameMatch;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// One cached geocoding result.
///
/// The viewport corners are the most precise description of a city's area,
/// `bounds` is coarser and `location` + `zoom` is the last resort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoRecord {
    pub name: String,
    pub location: LatLng,
    pub zoom: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<LatLngBounds>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub south_west_viewport: Option<LatLng>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub north_east_viewport: Option<LatLng>,
}

impl GeoRecord {
    /// Builds the record appended for `name` from a geocoder candidate.
    pub fn from_geocode(name: &str, result: &GeocodeResult, zoom: u32) -> Self {
        GeoRecord {
            name: name.trim().to_string(),
            location: result.location,
            zoom,
            bounds: result.bounds,
            south_west_viewport: Some(result.viewport.south_west()),
            north_east_viewport: Some(result.viewport.north_east()),
        }
    }

    /// The viewport rectangle, when both corners are present.
    pub fn viewport(&self) -> Option<LatLngBounds> {
        match (self.south_west_viewport, self.north_east_viewport) {
            (Some(sw), Some(ne)) => Some(LatLngBounds::from_corners(sw, ne)),
            _ => None,
        }
    }

    /// Viewport, else bounds, else location at the stored zoom.
    pub fn target_view(&self) -> ViewTarget {
        match self.viewport().or(self.bounds) {
            Some(rect) => ViewTarget::FitBounds(rect),
            None => ViewTarget::CenterZoom {
                center: self.location,
                zoom: self.zoom,
            },
        }
    }

    /// Whether this city counts as shown by a map looking at `map_bounds`
    /// around `map_center`.
    ///
    /// Zoomed far into a city, its point can fall outside the visible region
    /// while the map still shows the city; then the map center lies inside
    /// the city's own rectangle.
    pub fn is_in_map(&self, map_bounds: &LatLngBounds, map_center: LatLng) -> bool {
        if map_bounds.contains(self.location) {
            return true;
        }
        self.viewport()
            .or(self.bounds)
            .is_some_and(|rect| rect.contains(map_center))
    }
}

impl NameMatch for GeoRecord {
    fn name_str(&self) -> &str {
        &self.name
    }
}

/// Parses a cache document into records.
///
/// An empty document is an empty cache. A document that is not a JSON array
/// is an error. Individual malformed entries are skipped with a warning so
/// one bad record never hides the others.
pub fn parse_snapshot(text: &str) -> Result<Vec<GeoRecord>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    let value: Value = serde_json::from_str(text)?;
    let items = match value {
        Value::Array(items) => items,
        Value::Null => return Ok(Vec::new()),
        other => {
            return Err(MapError::InvalidSnapshot(format!(
                "expected an array of records, got {}",
                json_kind(&other)
            )))
        }
    };

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<GeoRecord>(item) {
            Ok(record) => records.push(record),
            Err(e) => warn!(index, error = %e, "skipping malformed cache record"),
        }
    }
    Ok(records)
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
