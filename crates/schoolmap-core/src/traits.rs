// crates/schoolmap-core/src/traits.rs
use crate::common::{LatLng, LatLngBounds};
use crate::geocode::GeocodeResponse;
use serde::{Deserialize, Serialize};

/// Name-based matching helpers for types that expose a display name.
///
/// Identity across the directory and the geocode cache is the *trimmed*
/// name compared exactly. Filtering uses a literal, case-sensitive
/// substring test on the untrimmed name.
///
/// # Examples
/// ```rust
/// use schoolmap_core::traits::NameMatch;
///
/// struct Place(&'static str);
/// impl NameMatch for Place {
///     fn name_str(&self) -> &str { self.0 }
/// }
///
/// assert!(Place(" Haifa ").is_named("Haifa"));
/// assert!(Place("Tel Aviv").name_contains("Tel"));
/// assert!(!Place("Tel Aviv").name_contains("tel"));
/// ```
pub trait NameMatch {
    /// Returns the display name used for matching.
    fn name_str(&self) -> &str;

    /// Exact comparison of trimmed names.
    #[inline]
    fn is_named(&self, q: &str) -> bool {
        self.name_str().trim() == q.trim()
    }

    /// Literal, case-sensitive substring match. The empty query matches.
    #[inline]
    fn name_contains(&self, q: &str) -> bool {
        self.name_str().contains(q)
    }
}

/// Handle to a marker placed on the map by [`MapWidget::place_marker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarkerHandle(pub u32);

/// The interactive map, consumed as a capability.
///
/// Implementations wrap a real widget (see the wasm bindings) or record the
/// calls for tests. Map events (`bounds_changed`, clicks) flow the other way,
/// as [`crate::Event`]s fed to the [`crate::Dispatcher`].
pub trait MapWidget {
    /// Loads the KML/KMZ marker overlay from `url`.
    fn load_overlay(&mut self, url: &str);

    /// Fits the map to the whole overlay layer.
    fn show_full_layer(&mut self);

    fn fit_bounds(&mut self, rect: LatLngBounds);

    fn set_center_zoom(&mut self, center: LatLng, zoom: u32);

    /// Current visible region; `None` while the map is not laid out yet.
    fn bounds(&self) -> Option<LatLngBounds>;

    fn center(&self) -> LatLng;

    /// Shows the single reusable popup with `content` (HTML) at `position`.
    fn show_info_window(&mut self, content: &str, position: LatLng);

    fn close_info_window(&mut self);

    fn place_marker(&mut self, position: LatLng, icon_url: &str) -> MarkerHandle;

    fn remove_marker(&mut self, handle: MarkerHandle);
}

/// Address → location resolution, consumed as a capability.
pub trait Geocoder {
    fn geocode(&self, address: &str) -> GeocodeResponse;
}
