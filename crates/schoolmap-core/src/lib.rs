// crates/schoolmap-core/src/lib.rs

pub mod common; // Geometry + stats shared by every module
pub mod config;
pub mod dispatch; // Typed events -> FilterEngine / MapSync
pub mod error;
pub mod filter;
pub mod geocode; // Records, stores and the cache itself
pub mod model;
pub mod popup;
pub mod sync;
pub mod text;
pub mod traits;
// Shared Raw Input (Used by the directory loader)
#[doc(hidden)]
pub mod raw;

// Re-exports
pub use crate::common::{DirectoryStats, LatLng, LatLngBounds, ViewTarget};
pub use crate::config::{Settings, SiblingPolicy};
pub use crate::dispatch::{Dispatcher, Event, JumpLink, Outcome, ScrollMetrics};
pub use crate::error::{MapError, Result};
pub use crate::filter::{FilterEngine, FilterOutcome};
pub use crate::geocode::{CacheStore, FileStore, GeoRecord, GeocodeCache, MemoryStore};
pub use crate::model::{CityEntry, CityView, Directory, DirectoryView, DomHandle, SchoolEntry, SchoolView};
pub use crate::popup::{format_popup_content, MarkerFeature, PopupContent};
pub use crate::sync::{BoundsOutcome, BoundsRequest, CityToggle, MapSync, ViewState};
pub use crate::traits::{Geocoder, MapWidget, MarkerHandle, NameMatch};

#[cfg(feature = "http")]
pub use crate::geocode::http::{HttpGeocoder, HttpStore};

pub mod prelude;
