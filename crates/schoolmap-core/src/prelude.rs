//! schoolmap prelude: bring common types and traits into scope for demos.

#![allow(unused_imports)]

pub use crate::common::{DirectoryStats, LatLng, LatLngBounds, ViewTarget};
pub use crate::config::{Settings, SiblingPolicy};
pub use crate::dispatch::{Dispatcher, Event, JumpLink, Outcome, ScrollMetrics};
pub use crate::error::{MapError, Result};
pub use crate::filter::{FilterEngine, FilterOutcome};
pub use crate::geocode::{
    CacheStore, FileStore, GeoRecord, GeocodeCache, GeocodeResponse, GeocodeResult,
    GeocodeStatus, MemoryStore, ReconcileReport,
};
pub use crate::model::{CityEntry, CityView, Directory, DirectoryView, DomHandle, SchoolEntry, SchoolView};
pub use crate::popup::{format_popup_content, MarkerFeature, PopupContent};
pub use crate::sync::{BoundsOutcome, BoundsRequest, CityToggle, MapSync, ViewState};
pub use crate::traits::{Geocoder, MapWidget, MarkerHandle, NameMatch};
