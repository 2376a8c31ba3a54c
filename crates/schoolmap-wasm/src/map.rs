//! [`MapWidget`] over a plain JS object.
//!
//! The host passes an adapter object wrapping its map library. Methods the
//! adapter lacks, and calls that throw, are logged to the console and
//! otherwise ignored.
//!
//! ```javascript
//! const adapter = {
//!   loadOverlay(url) {},
//!   showFullLayer() {},
//!   fitBounds({ south, west, north, east }) {},
//!   setCenterZoom({ lat, lng }, zoom) {},
//!   getBounds() { return null; },        // or { south, west, north, east }
//!   getCenter() { return { lat, lng }; },
//!   showInfoWindow(html, { lat, lng }) {},
//!   closeInfoWindow() {},
//!   placeMarker({ lat, lng }, iconUrl) { return marker; },
//!   removeMarker(marker) {},
//! };
//! ```
//!
//! Whatever `placeMarker` returns is kept as is and handed back to
//! `removeMarker`; the core only sees a local handle for it.

use js_sys::{Array, Function, Reflect};
use schoolmap_core::{LatLng, LatLngBounds, MapWidget, MarkerHandle};
use serde::Serialize;
use std::collections::HashMap;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

pub struct JsMap {
    adapter: JsValue,
    next_marker: u32,
    // local handle -> value returned by the adapter's placeMarker()
    markers: HashMap<u32, JsValue>,
}

fn warn(message: &str, detail: &JsValue) {
    web_sys::console::warn_2(&JsValue::from_str(message), detail);
}

fn arg<T: Serialize>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or(JsValue::NULL)
}

impl JsMap {
    pub fn new(adapter: JsValue) -> Self {
        JsMap {
            adapter,
            next_marker: 1,
            markers: HashMap::new(),
        }
    }

    fn call(&self, method: &str, args: &[JsValue]) -> Option<JsValue> {
        let function = Reflect::get(&self.adapter, &JsValue::from_str(method))
            .ok()
            .and_then(|f| f.dyn_into::<Function>().ok());
        let Some(function) = function else {
            warn(&format!("map adapter has no {method}()"), &self.adapter);
            return None;
        };
        let list: Array = args.iter().collect();
        match function.apply(&self.adapter, &list) {
            Ok(value) => Some(value),
            Err(e) => {
                warn(&format!("map adapter {method}() threw"), &e);
                None
            }
        }
    }
}

impl MapWidget for JsMap {
    fn load_overlay(&mut self, url: &str) {
        self.call("loadOverlay", &[JsValue::from_str(url)]);
    }

    fn show_full_layer(&mut self) {
        self.call("showFullLayer", &[]);
    }

    fn fit_bounds(&mut self, rect: LatLngBounds) {
        self.call("fitBounds", &[arg(&rect)]);
    }

    fn set_center_zoom(&mut self, center: LatLng, zoom: u32) {
        self.call("setCenterZoom", &[arg(&center), JsValue::from(zoom)]);
    }

    fn bounds(&self) -> Option<LatLngBounds> {
        let value = self.call("getBounds", &[])?;
        if value.is_null() || value.is_undefined() {
            return None;
        }
        match serde_wasm_bindgen::from_value(value) {
            Ok(bounds) => Some(bounds),
            Err(e) => {
                warn("getBounds() returned an unexpected value", &JsValue::from_str(&e.to_string()));
                None
            }
        }
    }

    fn center(&self) -> LatLng {
        self.call("getCenter", &[])
            .and_then(|v| serde_wasm_bindgen::from_value(v).ok())
            .or_else(|| self.bounds().map(|b| b.center()))
            .unwrap_or(LatLng::new(0.0, 0.0))
    }

    fn show_info_window(&mut self, content: &str, position: LatLng) {
        self.call("showInfoWindow", &[JsValue::from_str(content), arg(&position)]);
    }

    fn close_info_window(&mut self) {
        self.call("closeInfoWindow", &[]);
    }

    fn place_marker(&mut self, position: LatLng, icon_url: &str) -> MarkerHandle {
        let marker = self
            .call("placeMarker", &[arg(&position), JsValue::from_str(icon_url)])
            .unwrap_or(JsValue::UNDEFINED);
        if marker.is_null() || marker.is_undefined() {
            warn("placeMarker() returned no marker", &self.adapter);
        }
        let handle = self.next_marker;
        self.next_marker = self.next_marker.wrapping_add(1);
        self.markers.insert(handle, marker);
        MarkerHandle(handle)
    }

    fn remove_marker(&mut self, handle: MarkerHandle) {
        match self.markers.remove(&handle.0) {
            Some(marker) => {
                self.call("removeMarker", &[marker]);
            }
            None => warn("removeMarker() for an unknown handle", &JsValue::from(handle.0)),
        }
    }
}
