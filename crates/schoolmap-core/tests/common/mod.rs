#![allow(dead_code)]

use schoolmap_core::prelude::*;

/// One call received by [`FakeMap`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    LoadOverlay(String),
    ShowFullLayer,
    FitBounds(LatLngBounds),
    SetCenterZoom(LatLng, u32),
    ShowInfo(String, LatLng),
    CloseInfo,
    PlaceMarker(LatLng, String),
    RemoveMarker(MarkerHandle),
}

/// Records every call and reports whatever region the test sets.
#[derive(Debug, Default)]
pub struct FakeMap {
    pub calls: Vec<Call>,
    pub bounds: Option<LatLngBounds>,
    pub center: Option<LatLng>,
    next_marker: u32,
}

impl FakeMap {
    pub fn looking_at(bounds: LatLngBounds, center: LatLng) -> Self {
        FakeMap {
            bounds: Some(bounds),
            center: Some(center),
            ..Default::default()
        }
    }

    pub fn last(&self) -> Option<&Call> {
        self.calls.last()
    }
}

impl MapWidget for FakeMap {
    fn load_overlay(&mut self, url: &str) {
        self.calls.push(Call::LoadOverlay(url.to_string()));
    }

    fn show_full_layer(&mut self) {
        self.calls.push(Call::ShowFullLayer);
    }

    fn fit_bounds(&mut self, rect: LatLngBounds) {
        self.calls.push(Call::FitBounds(rect));
    }

    fn set_center_zoom(&mut self, center: LatLng, zoom: u32) {
        self.calls.push(Call::SetCenterZoom(center, zoom));
    }

    fn bounds(&self) -> Option<LatLngBounds> {
        self.bounds
    }

    fn center(&self) -> LatLng {
        self.center
            .or_else(|| self.bounds.map(|b| b.center()))
            .unwrap_or(LatLng::new(0.0, 0.0))
    }

    fn show_info_window(&mut self, content: &str, position: LatLng) {
        self.calls.push(Call::ShowInfo(content.to_string(), position));
    }

    fn close_info_window(&mut self) {
        self.calls.push(Call::CloseInfo);
    }

    fn place_marker(&mut self, position: LatLng, icon_url: &str) -> MarkerHandle {
        self.next_marker += 1;
        self.calls.push(Call::PlaceMarker(position, icon_url.to_string()));
        MarkerHandle(self.next_marker)
    }

    fn remove_marker(&mut self, handle: MarkerHandle) {
        self.calls.push(Call::RemoveMarker(handle));
    }
}

pub const DIRECTORY_JSON: &str = r#"[
    {"name": "Haifa", "schools": ["ORT Technical", "Leo Baeck"]},
    {"name": "Tel Aviv ", "schools": ["Herzliya Gymnasium", "Tichon Hadash"]},
    {"Beer Sheva": ["Makif Alef", "Tech High"]}
]"#;

pub fn directory() -> Directory {
    Directory::from_json_str(DIRECTORY_JSON).unwrap()
}

pub fn haifa_viewport() -> LatLngBounds {
    LatLngBounds::from_corners(LatLng::new(32.7, 34.9), LatLng::new(32.9, 35.1))
}

pub fn haifa() -> GeoRecord {
    GeoRecord {
        name: "Haifa".into(),
        location: LatLng::new(32.794, 34.989),
        zoom: 8,
        bounds: None,
        south_west_viewport: Some(LatLng::new(32.7, 34.9)),
        north_east_viewport: Some(LatLng::new(32.9, 35.1)),
    }
}

pub fn tel_aviv() -> GeoRecord {
    GeoRecord {
        name: "Tel Aviv".into(),
        location: LatLng::new(32.0853, 34.7818),
        zoom: 10,
        bounds: None,
        south_west_viewport: None,
        north_east_viewport: None,
    }
}

pub fn beer_sheva() -> GeoRecord {
    GeoRecord {
        name: "Beer Sheva".into(),
        location: LatLng::new(31.25, 34.79),
        zoom: 8,
        bounds: Some(LatLngBounds::from_corners(
            LatLng::new(31.2, 34.7),
            LatLng::new(31.3, 34.9),
        )),
        south_west_viewport: None,
        north_east_viewport: None,
    }
}

pub fn all_records() -> Vec<GeoRecord> {
    vec![haifa(), tel_aviv(), beer_sheva()]
}

pub fn settings() -> Settings {
    Settings {
        kmz_file: "schools.kmz".into(),
        ..Settings::default()
    }
}

pub fn sync_with(map: FakeMap, records: Vec<GeoRecord>) -> MapSync<FakeMap, MemoryStore> {
    MapSync::new(map, MemoryStore::new(records), settings())
}

pub fn visible_cities(directory: &Directory) -> Vec<String> {
    directory
        .cities()
        .iter()
        .filter(|c| c.is_visible())
        .map(|c| c.name().trim().to_string())
        .collect()
}
