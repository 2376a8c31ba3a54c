// crates/schoolmap-core/src/sync.rs
use crate::common::{LatLng, LatLngBounds, ViewTarget};
use crate::config::Settings;
use crate::geocode::{CacheStore, GeoRecord, GeocodeCache};
use crate::model::Directory;
use crate::popup::{format_popup_content, MarkerFeature};
use crate::traits::{MapWidget, MarkerHandle, NameMatch};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// State shared by the filter and the map, owned by [`MapSync`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewState {
    /// The map shows its home view rather than a city or a user-chosen region.
    pub map_is_reset: bool,
    /// Trimmed name of the expanded city.
    pub open_city: Option<String>,
    /// Overlay marking the last clicked marker.
    pub active_marker: Option<MarkerHandle>,
    pub info_window_open: bool,
    pub current_query: String,
    /// The filter input has keyboard focus; bounds changes are ignored.
    pub filter_focused: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            map_is_reset: true,
            open_city: None,
            active_marker: None,
            info_window_open: false,
            current_query: String::new(),
            filter_focused: false,
        }
    }
}

/// What a city click did.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CityToggle {
    /// Expanded; `view` is what the map was moved to (none when the city has
    /// no cached geocode).
    Opened { name: String, view: Option<ViewTarget> },
    /// Collapsed; the map went back to its home view.
    Closed { name: String },
    /// No city at that index.
    Unknown { index: usize },
}

/// A bounds-changed pass that has captured the map region and waits for a
/// cache snapshot. Only the most recently issued request may be applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundsRequest {
    pub generation: u64,
    pub bounds: LatLngBounds,
    pub center: LatLng,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BoundsOutcome {
    /// The filter input had focus.
    IgnoredWhileTyping,
    /// The map is not laid out yet.
    NoBounds,
    /// A newer request was issued before this one was applied.
    Stale { generation: u64 },
    /// The cache document could not be read; visibility was left as it was.
    CacheUnavailable,
    Applied { shown: usize, hidden: usize },
}

/// Keeps the map widget, the open city and city visibility consistent.
pub struct MapSync<M: MapWidget, S: CacheStore> {
    map: M,
    cache: GeocodeCache<S>,
    settings: Settings,
    state: ViewState,
    generation: u64,
}

impl<M: MapWidget, S: CacheStore> MapSync<M, S> {
    pub fn new(map: M, store: S, settings: Settings) -> Self {
        MapSync {
            map,
            cache: GeocodeCache::new(store, settings.record_zoom),
            settings,
            state: ViewState::default(),
            generation: 0,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub(crate) fn state_mut(&mut self) -> &mut ViewState {
        &mut self.state
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut M {
        &mut self.map
    }

    pub fn cache(&self) -> &GeocodeCache<S> {
        &self.cache
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Loads the marker overlay (versioned by `overlay_version`) and moves
    /// to the home view.
    pub fn init(&mut self, overlay_version: u64) {
        if !self.settings.kmz_file.is_empty() {
            let url = self.settings.overlay_url(overlay_version);
            info!(url = %url, "loading marker overlay");
            self.map.load_overlay(&url);
        }
        self.reset_view();
    }

    /// Home view, or the whole overlay when no home view is configured.
    pub fn reset_view(&mut self) {
        match self.settings.default_view {
            Some(view) => self.map.set_center_zoom(view.center, view.zoom),
            None => self.map.show_full_layer(),
        }
        self.state.map_is_reset = true;
    }

    fn apply_view(&mut self, target: ViewTarget) {
        match target {
            ViewTarget::FitBounds(rect) => self.map.fit_bounds(rect),
            ViewTarget::CenterZoom { center, zoom } => self.map.set_center_zoom(center, zoom),
        }
    }

    /// Toggles the city at `index`, closing any other open city first.
    ///
    /// Opening moves the map to the city's cached view. When the map was
    /// not in its home view the filter may have hidden some of the city's
    /// schools, so all of them are shown. Closing resets the map.
    pub fn open_city(&mut self, directory: &mut Directory, index: usize) -> CityToggle {
        let Some(was_open) = directory.city(index).map(|c| c.is_open()) else {
            return CityToggle::Unknown { index };
        };

        for (i, other) in directory.cities_mut().iter_mut().enumerate() {
            if i != index && other.is_open() {
                other.set_open(false);
            }
        }

        let Some(city) = directory.city_mut(index) else {
            return CityToggle::Unknown { index };
        };
        city.set_open(!was_open);
        let name = city.name().trim().to_string();

        if was_open {
            debug!(city = %name, "city closed");
            self.state.open_city = None;
            self.reset_view();
            return CityToggle::Closed { name };
        }

        if !self.state.map_is_reset {
            city.show_all_schools();
        }
        self.state.open_city = Some(name.clone());

        let view = self.cache.lookup(&name).map(|record| record.target_view());
        if let Some(target) = view {
            self.apply_view(target);
        }
        debug!(city = %name, found = view.is_some(), "city opened");
        CityToggle::Opened { name, view }
    }

    /// Captures the current map region for a bounds-changed pass.
    ///
    /// Returns the early outcome instead when the pass does not run.
    pub fn begin_bounds_request(&mut self) -> Result<BoundsRequest, BoundsOutcome> {
        if self.state.filter_focused {
            return Err(BoundsOutcome::IgnoredWhileTyping);
        }
        self.state.map_is_reset = false;
        let Some(bounds) = self.map.bounds() else {
            return Err(BoundsOutcome::NoBounds);
        };
        self.generation += 1;
        Ok(BoundsRequest {
            generation: self.generation,
            bounds,
            center: self.map.center(),
        })
    }

    /// Shows exactly the cities that `records` place inside the request's
    /// region, each with all of its schools.
    pub fn apply_bounds(
        &mut self,
        directory: &mut Directory,
        request: &BoundsRequest,
        records: &[GeoRecord],
    ) -> BoundsOutcome {
        if request.generation != self.generation {
            debug!(
                generation = request.generation,
                latest = self.generation,
                "dropping stale bounds response"
            );
            return BoundsOutcome::Stale {
                generation: request.generation,
            };
        }

        let in_map: Vec<&GeoRecord> = records
            .iter()
            .filter(|r| r.is_in_map(&request.bounds, request.center))
            .collect();

        let (mut shown, mut hidden) = (0, 0);
        for city in directory.cities_mut() {
            let visible = in_map.iter().any(|r| r.is_named(city.name()));
            city.set_visible(visible);
            if visible {
                city.show_all_schools();
                shown += 1;
            } else {
                hidden += 1;
            }
        }
        BoundsOutcome::Applied { shown, hidden }
    }

    /// Synchronous bounds-changed handling: capture, fetch, apply.
    ///
    /// A cache that loads but is empty hides every city. A cache that fails
    /// to load skips the pass.
    pub fn on_bounds_changed(&mut self, directory: &mut Directory) -> BoundsOutcome {
        let request = match self.begin_bounds_request() {
            Ok(request) => request,
            Err(outcome) => return outcome,
        };
        match self.cache.store().fetch() {
            Ok(records) => self.apply_bounds(directory, &request, &records),
            Err(e) => {
                warn!(error = %e, "bounds pass skipped: cache snapshot unavailable");
                BoundsOutcome::CacheUnavailable
            }
        }
    }

    /// Shows the popup for a clicked marker and moves the selected-marker
    /// overlay to it. Returns `false` for features the layer flagged as
    /// failed.
    pub fn on_marker_clicked(&mut self, feature: &MarkerFeature, position: LatLng) -> bool {
        if !feature.is_ok() {
            debug!(status = %feature.status, "marker feature not OK");
            return false;
        }
        let content = format_popup_content(&feature.description).to_html(&feature.name);
        self.map.show_info_window(&content, position);
        self.state.info_window_open = true;

        if let Some(previous) = self.state.active_marker.take() {
            self.map.remove_marker(previous);
        }
        let marker = self
            .map
            .place_marker(position, &self.settings.selected_marker_icon);
        self.state.active_marker = Some(marker);
        true
    }

    /// Closes the popup and removes the selected-marker overlay.
    /// Returns whether anything was open.
    pub fn on_popup_closed(&mut self) -> bool {
        let mut changed = false;
        if self.state.info_window_open {
            self.map.close_info_window();
            self.state.info_window_open = false;
            changed = true;
        }
        if let Some(marker) = self.state.active_marker.take() {
            self.map.remove_marker(marker);
            changed = true;
        }
        changed
    }

    pub fn on_map_clicked(&mut self) -> bool {
        self.on_popup_closed()
    }
}
