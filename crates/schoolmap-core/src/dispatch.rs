// crates/schoolmap-core/src/dispatch.rs
//! One entry point for everything the page reports.
//!
//! Keystrokes, focus changes, city clicks, map events and scrolling arrive
//! as [`Event`]s and are handled one at a time, in arrival order, against
//! state owned here. Hosts that receive callbacks on several threads must
//! marshal them to the single owner of the [`Dispatcher`].

use crate::common::LatLng;
use crate::filter::{FilterEngine, FilterOutcome};
use crate::geocode::{CacheStore, GeoRecord, ReconcileReport};
use crate::model::Directory;
use crate::popup::MarkerFeature;
use crate::sync::{BoundsOutcome, BoundsRequest, CityToggle, MapSync, ViewState};
use crate::traits::{Geocoder, MapWidget};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Where the map element sits relative to the window, sampled on scroll.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollMetrics {
    pub map_top: f64,
    pub map_bottom: f64,
    pub viewport_height: f64,
    /// Whether either jump link is currently displayed at all.
    pub links_visible: bool,
}

impl ScrollMetrics {
    /// The map's top or bottom edge lies within the window.
    pub fn map_in_view(&self) -> bool {
        let h = self.viewport_height;
        (self.map_top >= 0.0 && self.map_top <= h) || (self.map_bottom >= 0.0 && self.map_bottom <= h)
    }
}

/// Which of the two jump links should be displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JumpLink {
    /// The map is off-screen: offer a jump to it.
    ToMap,
    /// The map is on screen: offer a jump back to the list.
    ToList,
}

pub fn jump_link(metrics: &ScrollMetrics) -> Option<JumpLink> {
    if !metrics.links_visible {
        return None;
    }
    Some(if metrics.map_in_view() {
        JumpLink::ToList
    } else {
        JumpLink::ToMap
    })
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    QueryChanged(String),
    FilterFocused,
    FilterBlurred,
    /// A city title was clicked; the index is the city's position in the
    /// directory.
    CityClicked(usize),
    BoundsChanged,
    MarkerClicked { feature: MarkerFeature, position: LatLng },
    MapClicked,
    PopupClosed,
    /// The user asked for the interactive map (it starts as a static image).
    MapEnabled,
    WindowScrolled(ScrollMetrics),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Filtered(FilterOutcome),
    City(CityToggle),
    Bounds(BoundsOutcome),
    /// Marker click: whether the popup was shown.
    Popup { shown: bool },
    /// Popup/map click: whether anything was closed.
    Cleared { changed: bool },
    MapReady,
    Scroll { link: Option<JumpLink> },
    Noop,
}

/// Owns the directory, the filter and the map sync, and routes events.
pub struct Dispatcher<M: MapWidget, S: CacheStore> {
    directory: Directory,
    filter: FilterEngine,
    sync: MapSync<M, S>,
    map_ready: bool,
    overlay_version: u64,
}

impl<M: MapWidget, S: CacheStore> Dispatcher<M, S> {
    /// `overlay_version` is appended to the overlay URL when the map is
    /// first enabled.
    pub fn new(directory: Directory, sync: MapSync<M, S>, overlay_version: u64) -> Self {
        Dispatcher {
            directory,
            filter: FilterEngine::new(sync.settings().sibling_policy),
            sync,
            map_ready: false,
            overlay_version,
        }
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    pub fn sync(&self) -> &MapSync<M, S> {
        &self.sync
    }

    pub fn sync_mut(&mut self) -> &mut MapSync<M, S> {
        &mut self.sync
    }

    pub fn state(&self) -> &ViewState {
        self.sync.state()
    }

    pub fn is_map_ready(&self) -> bool {
        self.map_ready
    }

    /// Geocodes the directory's cities missing from the cache. Meant to run
    /// once, before the map is enabled, so new cities take part in
    /// bounds filtering from the first pass.
    pub fn reconcile_cache<G: Geocoder + ?Sized>(&self, geocoder: &G) -> ReconcileReport {
        let names = self.directory.city_names();
        let privileged = self.sync.settings().is_user_admin;
        self.sync
            .cache()
            .reconcile(names.iter().map(String::as_str), geocoder, privileged)
    }

    /// Applies a bounds-changed response that arrived asynchronously.
    pub fn apply_bounds(
        &mut self,
        request: &BoundsRequest,
        records: &[GeoRecord],
    ) -> BoundsOutcome {
        self.sync.apply_bounds(&mut self.directory, request, records)
    }

    fn ensure_map(&mut self) {
        if !self.map_ready {
            self.sync.init(self.overlay_version);
            self.map_ready = true;
        }
    }

    fn refilter(&mut self) -> FilterOutcome {
        let query = self.sync.state().current_query.clone();
        self.filter.apply_filter(&mut self.directory, &query)
    }

    pub fn dispatch(&mut self, event: Event) -> Outcome {
        debug!(?event, "dispatch");
        match event {
            Event::QueryChanged(query) => {
                self.sync.state_mut().current_query = query;
                Outcome::Filtered(self.refilter())
            }
            Event::FilterFocused => {
                self.sync.state_mut().filter_focused = true;
                if self.map_ready {
                    self.sync.reset_view();
                }
                let outcome = self.refilter();
                self.sync.on_popup_closed();
                Outcome::Filtered(outcome)
            }
            Event::FilterBlurred => {
                self.sync.state_mut().filter_focused = false;
                Outcome::Noop
            }
            Event::CityClicked(index) => {
                self.ensure_map();
                Outcome::City(self.sync.open_city(&mut self.directory, index))
            }
            Event::BoundsChanged => {
                if !self.map_ready {
                    return Outcome::Noop;
                }
                Outcome::Bounds(self.sync.on_bounds_changed(&mut self.directory))
            }
            Event::MarkerClicked { feature, position } => Outcome::Popup {
                shown: self.sync.on_marker_clicked(&feature, position),
            },
            Event::MapClicked => Outcome::Cleared {
                changed: self.sync.on_map_clicked(),
            },
            Event::PopupClosed => Outcome::Cleared {
                changed: self.sync.on_popup_closed(),
            },
            Event::MapEnabled => {
                self.ensure_map();
                Outcome::MapReady
            }
            Event::WindowScrolled(metrics) => Outcome::Scroll {
                link: jump_link(&metrics),
            },
        }
    }
}
