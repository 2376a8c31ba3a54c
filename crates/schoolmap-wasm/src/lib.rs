//! schoolmap-wasm — WebAssembly bindings for schoolmap-core
//!
//! Runs the school directory filter and the map synchronization in the
//! page. The page keeps its own map library; the bindings drive it through
//! a small adapter object (see [`map`]).
//!
//! What it provides
//! ----------------
//! - `configure(settingsJson)`: the localized settings object, once per page
//! - `SchoolsMap`: one session object owning the directory, the view state
//!   and the map adapter; page events are methods on it
//! - Stateless helpers: `apply_filter`, `format_popup`, `lookup_city`,
//!   `missing_cities`, `append_geocoded`
//!
//! Quick start (browser)
//! ---------------------
//! ```javascript
//! import init, { configure, SchoolsMap } from 'schoolmap-wasm';
//!
//! await init();
//! configure(JSON.stringify(window.schools_map_obj));
//!
//! const session = new SchoolsMap(directoryJson, adapter, dailyVersion);
//! session.set_cache(await (await fetch(cacheUrl)).text());
//! input.addEventListener('input', () => render(session.query(input.value)));
//! map.addListener('bounds_changed', async () => {
//!   const ticket = session.begin_bounds();
//!   if (ticket.generation === undefined) return;
//!   const cache = await (await fetch(cacheUrl + '?ver=' + Date.now())).text();
//!   render(session.apply_bounds(ticket, cache));
//! });
//! ```
//!
//! Notes
//! -----
//! - Geocoding in the browser is asynchronous, so reconciliation is split:
//!   `missing_cities` lists what to geocode, `append_geocoded` folds one
//!   result into the cache document, which the page then posts.
//! - Every method returns a JSON-serializable outcome; errors are thrown as
//!   `{ code, message }` objects.
pub mod error;
pub mod map;

use once_cell::sync::OnceCell;
use wasm_bindgen::prelude::*;

use crate::map::JsMap;
use schoolmap_core::geocode::parse_snapshot;
use schoolmap_core::prelude::*;
use serde::Serialize;
use serde_wasm_bindgen::to_value;
use std::result::Result;

// Page settings, set once by `configure`
static SETTINGS: OnceCell<Settings> = OnceCell::new();

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    web_sys::console::log_1(&"Initializing schoolmap WASM module...".into());
}

fn settings() -> Settings {
    SETTINGS.get().cloned().unwrap_or_default()
}

fn js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    to_value(value).map_err(error::serialize)
}

fn directory_from(json: &str) -> Result<Directory, JsValue> {
    Directory::from_json_str(json).map_err(|e| error::invalid_json("directory", e))
}

fn records_from(json: &str) -> Result<Vec<GeoRecord>, JsValue> {
    parse_snapshot(json).map_err(|e| error::invalid_json("cache", e))
}

#[wasm_bindgen]
pub fn configure(settings_json: &str) -> Result<(), JsValue> {
    let settings =
        Settings::from_json_str(settings_json).map_err(|e| error::invalid_json("settings", e))?;
    SETTINGS.set(settings).map_err(|_| error::already_configured())
}

/* --------------------------------------------------------------------------
   Session
-------------------------------------------------------------------------- */

/// One page's directory, view state and map.
#[wasm_bindgen]
pub struct SchoolsMap {
    inner: Dispatcher<JsMap, MemoryStore>,
}

#[wasm_bindgen]
impl SchoolsMap {
    /// `overlay_version` should change once a day (e.g. `yyyymmdd`).
    #[wasm_bindgen(constructor)]
    pub fn new(directory_json: &str, adapter: JsValue, overlay_version: u32) -> Result<SchoolsMap, JsValue> {
        let directory = directory_from(directory_json)?;
        let sync = MapSync::new(JsMap::new(adapter), MemoryStore::default(), settings());
        Ok(SchoolsMap {
            inner: Dispatcher::new(directory, sync, u64::from(overlay_version)),
        })
    }

    /// Replaces the cache snapshot used by city clicks and `bounds_changed`.
    pub fn set_cache(&self, cache_json: &str) -> Result<(), JsValue> {
        let records = records_from(cache_json)?;
        self.inner.sync().cache().store().replace(records);
        Ok(())
    }

    fn dispatch(&mut self, event: Event) -> Result<JsValue, JsValue> {
        js(&self.inner.dispatch(event))
    }

    pub fn query(&mut self, text: String) -> Result<JsValue, JsValue> {
        self.dispatch(Event::QueryChanged(text))
    }

    pub fn focus(&mut self) -> Result<JsValue, JsValue> {
        self.dispatch(Event::FilterFocused)
    }

    pub fn blur(&mut self) -> Result<JsValue, JsValue> {
        self.dispatch(Event::FilterBlurred)
    }

    pub fn enable_map(&mut self) -> Result<JsValue, JsValue> {
        self.dispatch(Event::MapEnabled)
    }

    /// Toggles the city at `index` (document order).
    pub fn click_city(&mut self, index: usize) -> Result<JsValue, JsValue> {
        self.dispatch(Event::CityClicked(index))
    }

    /// Bounds pass against the current cache snapshot.
    pub fn bounds_changed(&mut self) -> Result<JsValue, JsValue> {
        self.dispatch(Event::BoundsChanged)
    }

    /// First half of an asynchronous bounds pass: returns a ticket
    /// (`{generation, bounds, center}`) or, when the pass does not run,
    /// its outcome.
    pub fn begin_bounds(&mut self) -> Result<JsValue, JsValue> {
        if !self.inner.is_map_ready() {
            return js(&Outcome::Noop);
        }
        match self.inner.sync_mut().begin_bounds_request() {
            Ok(request) => js(&request),
            Err(outcome) => js(&Outcome::Bounds(outcome)),
        }
    }

    /// Second half: applies a fresh cache document for `ticket`. Tickets
    /// superseded by a later `begin_bounds` are dropped.
    pub fn apply_bounds(&mut self, ticket: JsValue, cache_json: &str) -> Result<JsValue, JsValue> {
        let request: BoundsRequest = serde_wasm_bindgen::from_value(ticket)
            .map_err(|e| error::invalid_json("bounds ticket", e))?;
        let records = records_from(cache_json)?;
        self.inner.sync().cache().store().replace(records.clone());
        js(&Outcome::Bounds(self.inner.apply_bounds(&request, &records)))
    }

    /// `feature` is `{name, description, status?}` from the overlay layer.
    pub fn marker_clicked(&mut self, feature: JsValue, lat: f64, lng: f64) -> Result<JsValue, JsValue> {
        let feature: MarkerFeature = serde_wasm_bindgen::from_value(feature)
            .map_err(|e| error::invalid_json("marker feature", e))?;
        self.dispatch(Event::MarkerClicked {
            feature,
            position: LatLng::new(lat, lng),
        })
    }

    pub fn map_clicked(&mut self) -> Result<JsValue, JsValue> {
        self.dispatch(Event::MapClicked)
    }

    pub fn popup_closed(&mut self) -> Result<JsValue, JsValue> {
        self.dispatch(Event::PopupClosed)
    }

    pub fn scrolled(&mut self, map_top: f64, map_bottom: f64, viewport_height: f64, links_visible: bool) -> Result<JsValue, JsValue> {
        self.dispatch(Event::WindowScrolled(ScrollMetrics {
            map_top,
            map_bottom,
            viewport_height,
            links_visible,
        }))
    }

    /// Visibility, open state and highlighted HTML of every entry.
    pub fn view(&self) -> Result<JsValue, JsValue> {
        js(&self.inner.directory().view())
    }

    pub fn state(&self) -> Result<JsValue, JsValue> {
        js(self.inner.state())
    }

    pub fn stats(&self) -> Result<JsValue, JsValue> {
        js(&self.inner.directory().stats())
    }
}

/* --------------------------------------------------------------------------
   Stateless helpers
-------------------------------------------------------------------------- */

/// Filters a directory document and returns its view.
///
/// `show_siblings` picks the sibling policy for this call: `true` shows
/// every school of a matched city, `false` only the matching ones, and
/// `undefined` falls back to the configured policy.
#[wasm_bindgen]
pub fn apply_filter(directory_json: &str, query: &str, show_siblings: Option<bool>) -> Result<JsValue, JsValue> {
    let mut directory = directory_from(directory_json)?;
    let policy = match show_siblings {
        Some(true) => SiblingPolicy::Show,
        Some(false) => SiblingPolicy::Hide,
        None => settings().sibling_policy,
    };
    FilterEngine::new(policy).apply_filter(&mut directory, query);
    js(&directory.view())
}

/// Popup HTML for a marker description.
#[wasm_bindgen]
pub fn format_popup(description: &str, name: &str) -> String {
    format_popup_content(description).to_html(name)
}

#[derive(Serialize)]
struct LookupView {
    record: GeoRecord,
    view: ViewTarget,
}

/// `{record, view}` for a cached city, or `null`.
#[wasm_bindgen]
pub fn lookup_city(cache_json: &str, name: &str) -> Result<JsValue, JsValue> {
    let records = records_from(cache_json)?;
    match records.into_iter().find(|r| r.is_named(name)) {
        Some(record) => js(&LookupView {
            view: record.target_view(),
            record,
        }),
        None => Ok(JsValue::NULL),
    }
}

/// Trimmed directory city names with no cache record.
#[wasm_bindgen]
pub fn missing_cities(directory_json: &str, cache_json: &str) -> Result<Vec<String>, JsValue> {
    let directory = directory_from(directory_json)?;
    let cache = GeocodeCache::new(MemoryStore::new(records_from(cache_json)?), 0);
    let names = directory.city_names();
    Ok(cache.missing_names(names.iter().map(String::as_str)))
}

/// A geocoder that answers with one result prepared by the page.
struct Prepared(GeocodeResponse);

impl Geocoder for Prepared {
    fn geocode(&self, _address: &str) -> GeocodeResponse {
        self.0.clone()
    }
}

/// Appends `name`, geocoded by the page as `result_json`
/// (`{location, bounds?, viewport}`), and returns the new cache document.
/// The document comes back unchanged when `name` already has a record.
#[wasm_bindgen]
pub fn append_geocoded(cache_json: &str, name: &str, result_json: &str) -> Result<String, JsValue> {
    let result: GeocodeResult =
        serde_json::from_str(result_json).map_err(|e| error::invalid_json("geocode result", e))?;
    let store = MemoryStore::new(records_from(cache_json)?);
    let cache = GeocodeCache::new(store, settings().record_zoom);
    let geocoder = Prepared(GeocodeResponse {
        status: GeocodeStatus::Ok,
        results: vec![result],
    });
    cache.reconcile([name], &geocoder, true);
    serde_json::to_string(&cache.store().snapshot()).map_err(|e| error::err("serialize", e.to_string()))
}
