// crates/schoolmap-core/src/geocode/http.rs
#![cfg(feature = "http")]

use super::record::{parse_snapshot, GeoRecord};
use super::store::CacheStore;
use super::{GeocodeResponse, GeocodeResult, GeocodeStatus};
use crate::common::{LatLng, LatLngBounds};
use crate::config::Settings;
use crate::error::Result;
use crate::traits::Geocoder;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

/// AJAX action name the persistence endpoint is registered under.
pub const UPDATE_ACTION: &str = "schools_map_locations_update";

pub const GEOCODE_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// The cache document on the live site: read with a cache-busting GET,
/// replaced through the AJAX endpoint.
#[derive(Debug, Clone)]
pub struct HttpStore {
    client: Client,
    json_url: String,
    ajax_url: String,
    nonce: String,
}

impl HttpStore {
    pub fn new(json_url: impl Into<String>, ajax_url: impl Into<String>, nonce: impl Into<String>) -> Self {
        HttpStore {
            client: Client::new(),
            json_url: json_url.into(),
            ajax_url: ajax_url.into(),
            nonce: nonce.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(&settings.json_file, &settings.ajax_url, &settings.nonce)
    }
}

fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

impl CacheStore for HttpStore {
    fn fetch(&self) -> Result<Vec<GeoRecord>> {
        let version = now_millis().to_string();
        debug!(url = %self.json_url, "fetching cache document");
        let text = self
            .client
            .get(&self.json_url)
            .query(&[("ver", version.as_str())])
            .send()?
            .error_for_status()?
            .text()?;
        parse_snapshot(&text)
    }

    fn submit(&self, records: &[GeoRecord]) -> Result<()> {
        let new_data = serde_json::to_string(records)?;
        self.client
            .post(&self.ajax_url)
            .form(&[
                ("action", UPDATE_ACTION),
                ("_ajax_nonce", self.nonce.as_str()),
                ("newData", new_data.as_str()),
            ])
            .send()?
            .error_for_status()?;
        Ok(())
    }
}

/// Geocoding web service client (Google Geocoding JSON API).
#[derive(Debug, Clone)]
pub struct HttpGeocoder {
    client: Client,
    endpoint: String,
    api_key: String,
    language: Option<String>,
    region: Option<String>,
}

impl HttpGeocoder {
    pub fn new(api_key: impl Into<String>) -> Self {
        HttpGeocoder {
            client: Client::new(),
            endpoint: GEOCODE_ENDPOINT.to_string(),
            api_key: api_key.into(),
            language: None,
            region: None,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Result language and region bias, e.g. `("he", "IL")`.
    pub fn with_locale(mut self, language: impl Into<String>, region: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self.region = Some(region.into());
        self
    }

    fn request(&self, address: &str) -> Result<GeocodeResponse> {
        let mut query = vec![("address", address), ("key", self.api_key.as_str())];
        if let Some(language) = &self.language {
            query.push(("language", language.as_str()));
        }
        if let Some(region) = &self.region {
            query.push(("region", region.as_str()));
        }
        let body = self
            .client
            .get(&self.endpoint)
            .query(&query)
            .send()?
            .error_for_status()?
            .text()?;
        let wire: WireResponse = serde_json::from_str(&body)?;
        Ok(wire.into())
    }
}

impl Geocoder for HttpGeocoder {
    fn geocode(&self, address: &str) -> GeocodeResponse {
        match self.request(address) {
            Ok(response) => response,
            Err(e) => {
                warn!(address, error = %e, "geocoding request failed");
                GeocodeResponse::failed(GeocodeStatus::Error)
            }
        }
    }
}

// Service wire format: corners are spelled `northeast` / `southwest`.

#[derive(Deserialize)]
struct WireResponse {
    status: GeocodeStatus,
    #[serde(default)]
    results: Vec<WireResult>,
}

#[derive(Deserialize)]
struct WireResult {
    geometry: WireGeometry,
}

#[derive(Deserialize)]
struct WireGeometry {
    location: LatLng,
    #[serde(default)]
    bounds: Option<WireRect>,
    viewport: WireRect,
}

#[derive(Deserialize)]
struct WireRect {
    northeast: LatLng,
    southwest: LatLng,
}

impl From<WireRect> for LatLngBounds {
    fn from(r: WireRect) -> Self {
        LatLngBounds::from_corners(r.southwest, r.northeast)
    }
}

impl From<WireResponse> for GeocodeResponse {
    fn from(w: WireResponse) -> Self {
        GeocodeResponse {
            status: w.status,
            results: w
                .results
                .into_iter()
                .map(|r| GeocodeResult {
                    location: r.geometry.location,
                    bounds: r.geometry.bounds.map(Into::into),
                    viewport: r.geometry.viewport.into(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_response_maps_corners() {
        let body = r#"{
            "status": "OK",
            "results": [{
                "formatted_address": "Haifa, Israel",
                "geometry": {
                    "location": {"lat": 32.794, "lng": 34.989},
                    "viewport": {
                        "northeast": {"lat": 32.9, "lng": 35.1},
                        "southwest": {"lat": 32.7, "lng": 34.9}
                    }
                }
            }]
        }"#;
        let wire: WireResponse = serde_json::from_str(body).unwrap();
        let response = GeocodeResponse::from(wire);
        let best = response.best().unwrap();
        assert_eq!(best.viewport.south_west(), LatLng::new(32.7, 34.9));
        assert_eq!(best.viewport.north_east(), LatLng::new(32.9, 35.1));
        assert!(best.bounds.is_none());
    }

    #[test]
    fn wire_failure_status_has_no_results() {
        let wire: WireResponse =
            serde_json::from_str(r#"{"status": "REQUEST_DENIED", "error_message": "bad key"}"#)
                .unwrap();
        let response = GeocodeResponse::from(wire);
        assert_eq!(response.status, GeocodeStatus::RequestDenied);
        assert!(response.best().is_none());
    }
}
