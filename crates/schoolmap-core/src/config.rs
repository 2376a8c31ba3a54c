// crates/schoolmap-core/src/config.rs
//! Page-level settings.
//!
//! The field names follow the object the plugin hands to the page script
//! (`json_file`, `ajax_url`, `nonce`, `kmz_file`, `is_user_admin`), so the
//! same JSON can be fed to the wasm bindings and to the CLI unchanged.

use crate::common::LatLng;
use crate::error::{MapError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Highest zoom level the map widget accepts.
pub const MAX_ZOOM: u32 = 22;

/// What happens to non-matching schools of a city that is visible only
/// because one of its schools matched the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiblingPolicy {
    /// Only the matching schools stay visible.
    #[default]
    Hide,
    /// Siblings stay visible; only the city is filtered.
    Show,
}

/// The map's home view, restored by `reset_view`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DefaultView {
    pub center: LatLng,
    pub zoom: u32,
}

impl Default for DefaultView {
    fn default() -> Self {
        // Zoom 8 suits the overlay alone; the whole region needs 4.
        DefaultView {
            center: LatLng::new(32.0, 36.474776492187516),
            zoom: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// URL (or path) of the geocode cache document.
    pub json_file: String,
    /// Endpoint receiving the updated cache document.
    pub ajax_url: String,
    pub nonce: String,
    /// Marker overlay (KMZ) URL.
    #[serde(alias = "xmz_file")]
    pub kmz_file: String,
    /// Only privileged users reconcile the cache against the geocoder.
    pub is_user_admin: bool,
    /// `None` resets to the full overlay layer instead of a fixed view.
    pub default_view: Option<DefaultView>,
    /// Zoom stored on records created by reconciliation.
    pub record_zoom: u32,
    pub selected_marker_icon: String,
    pub sibling_policy: SiblingPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            json_file: "cities_map.json".to_string(),
            ajax_url: String::new(),
            nonce: String::new(),
            kmz_file: String::new(),
            is_user_admin: false,
            default_view: Some(DefaultView::default()),
            record_zoom: 8,
            selected_marker_icon: "img/selected_marker.png".to_string(),
            sibling_policy: SiblingPolicy::Hide,
        }
    }
}

impl Settings {
    /// Parses and validates settings; missing keys take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            MapError::NotFound(format!("Settings not found at {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.json_file.trim().is_empty() {
            return Err(MapError::Config("json_file must not be empty".into()));
        }
        if let Some(view) = &self.default_view {
            if !view.center.is_finite() {
                return Err(MapError::Config("default_view.center must be finite".into()));
            }
            if view.zoom > MAX_ZOOM {
                return Err(MapError::Config(format!(
                    "default_view.zoom {} exceeds {MAX_ZOOM}",
                    view.zoom
                )));
            }
        }
        if self.record_zoom > MAX_ZOOM {
            return Err(MapError::Config(format!(
                "record_zoom {} exceeds {MAX_ZOOM}",
                self.record_zoom
            )));
        }
        Ok(())
    }

    /// Overlay URL with a version parameter; callers pass a value that
    /// changes once a day so the layer is refetched daily, not per visit.
    pub fn overlay_url(&self, version: u64) -> String {
        format!("{}?ver={version}", self.kmz_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_take_defaults() {
        let s = Settings::from_json_str(r#"{"nonce": "abc", "xmz_file": "/up/schools.kmz"}"#)
            .unwrap();
        assert_eq!(s.nonce, "abc");
        assert_eq!(s.kmz_file, "/up/schools.kmz");
        assert_eq!(s.record_zoom, 8);
        assert_eq!(s.default_view, Some(DefaultView::default()));
        assert_eq!(s.sibling_policy, SiblingPolicy::Hide);
        assert!(!s.is_user_admin);
    }

    #[test]
    fn null_default_view_means_full_layer() {
        let s = Settings::from_json_str(r#"{"default_view": null}"#).unwrap();
        assert_eq!(s.default_view, None);
    }

    #[test]
    fn validation_rejects_bad_zoom() {
        let err = Settings::from_json_str(r#"{"record_zoom": 40}"#).unwrap_err();
        assert!(matches!(err, MapError::Config(_)));
    }

    #[test]
    fn overlay_url_carries_version() {
        let s = Settings {
            kmz_file: "https://example.org/schools.kmz".into(),
            ..Settings::default()
        };
        assert_eq!(s.overlay_url(17), "https://example.org/schools.kmz?ver=17");
    }
}
