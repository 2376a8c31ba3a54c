// crates/schoolmap-core/src/geocode/mod.rs

//! # Geocode Cache
//!
//! City name → [`GeoRecord`] resolution over a JSON document that is only
//! ever appended to. The physical layer ([`CacheStore`]) is swappable:
//! memory for tests and wasm, a local file for the CLI and the server side,
//! HTTP (feature `http`) for talking to the live site.

use crate::common::{LatLng, LatLngBounds};
use serde::{Deserialize, Serialize};
use std::fmt;

mod cache;
mod record;
mod store;

#[cfg(feature = "http")]
pub mod http;

pub use cache::{GeocodeCache, ReconcileReport};
pub use record::{parse_snapshot, GeoRecord};
pub use store::{CacheStore, FileStore, MemoryStore};

/// Status of a geocoding request, in the service's wire spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GeocodeStatus {
    Ok,
    ZeroResults,
    OverQueryLimit,
    OverDailyLimit,
    RequestDenied,
    InvalidRequest,
    UnknownError,
    /// Any status this crate does not know by name, or a transport failure.
    #[serde(other)]
    Error,
}

impl GeocodeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeocodeStatus::Ok => "OK",
            GeocodeStatus::ZeroResults => "ZERO_RESULTS",
            GeocodeStatus::OverQueryLimit => "OVER_QUERY_LIMIT",
            GeocodeStatus::OverDailyLimit => "OVER_DAILY_LIMIT",
            GeocodeStatus::RequestDenied => "REQUEST_DENIED",
            GeocodeStatus::InvalidRequest => "INVALID_REQUEST",
            GeocodeStatus::UnknownError => "UNKNOWN_ERROR",
            GeocodeStatus::Error => "ERROR",
        }
    }
}

impl fmt::Display for GeocodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One candidate returned by the geocoder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    pub location: LatLng,
    #[serde(default)]
    pub bounds: Option<LatLngBounds>,
    pub viewport: LatLngBounds,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResponse {
    pub status: GeocodeStatus,
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
}

impl GeocodeResponse {
    pub fn failed(status: GeocodeStatus) -> Self {
        GeocodeResponse {
            status,
            results: Vec::new(),
        }
    }

    /// The first result, when the status is OK and there is one.
    pub fn best(&self) -> Option<&GeocodeResult> {
        match self.status {
            GeocodeStatus::Ok => self.results.first(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_uses_wire_spelling() {
        let s: GeocodeStatus = serde_json::from_str(r#""ZERO_RESULTS""#).unwrap();
        assert_eq!(s, GeocodeStatus::ZeroResults);
        let s: GeocodeStatus = serde_json::from_str(r#""SOMETHING_NEW""#).unwrap();
        assert_eq!(s, GeocodeStatus::Error);
        assert_eq!(GeocodeStatus::OverQueryLimit.to_string(), "OVER_QUERY_LIMIT");
    }

    #[test]
    fn best_requires_ok_status() {
        let result = GeocodeResult {
            location: LatLng::new(32.8, 35.0),
            bounds: None,
            viewport: LatLngBounds::from_corners(LatLng::new(32.7, 34.9), LatLng::new(32.9, 35.1)),
        };
        let ok = GeocodeResponse {
            status: GeocodeStatus::Ok,
            results: vec![result],
        };
        assert!(ok.best().is_some());
        let denied = GeocodeResponse {
            status: GeocodeStatus::RequestDenied,
            results: vec![result],
        };
        assert!(denied.best().is_none());
        assert!(GeocodeResponse::failed(GeocodeStatus::Ok).best().is_none());
    }
}
