//! Map synchronization example for schoolmap-rs
//!
//! This example demonstrates how to:
//! - Plug a map widget into `MapSync`
//! - Feed page events to the `Dispatcher`
//! - Run a bounds pass in two halves, as an async host would

use schoolmap_core::prelude::*;

/// Prints every call instead of drawing anything.
struct ConsoleMap {
    bounds: Option<LatLngBounds>,
    markers: u32,
}

impl MapWidget for ConsoleMap {
    fn load_overlay(&mut self, url: &str) {
        println!("    [map] load overlay {url}");
    }

    fn show_full_layer(&mut self) {
        println!("    [map] show full layer");
    }

    fn fit_bounds(&mut self, rect: LatLngBounds) {
        println!("    [map] fit bounds {rect:?}");
        self.bounds = Some(rect);
    }

    fn set_center_zoom(&mut self, center: LatLng, zoom: u32) {
        println!("    [map] center {center:?} zoom {zoom}");
    }

    fn bounds(&self) -> Option<LatLngBounds> {
        self.bounds
    }

    fn center(&self) -> LatLng {
        self.bounds
            .map(|b| b.center())
            .unwrap_or(LatLng::new(32.0, 35.0))
    }

    fn show_info_window(&mut self, content: &str, position: LatLng) {
        println!("    [map] popup at {position:?}: {content}");
    }

    fn close_info_window(&mut self) {
        println!("    [map] close popup");
    }

    fn place_marker(&mut self, position: LatLng, icon_url: &str) -> MarkerHandle {
        self.markers += 1;
        println!("    [map] marker #{} at {position:?} ({icon_url})", self.markers);
        MarkerHandle(self.markers)
    }

    fn remove_marker(&mut self, handle: MarkerHandle) {
        println!("    [map] remove marker #{}", handle.0);
    }
}

const DIRECTORY: &str = r#"[
    {"name": "Haifa", "schools": ["ORT Technical", "Leo Baeck"]},
    {"name": "Tel Aviv", "schools": ["Herzliya Gymnasium"]},
    {"name": "Akko", "schools": ["Akko Tech"]}
]"#;

const CACHE: &str = r#"[
    {"name": "Haifa", "location": {"lat": 32.794, "lng": 34.989}, "zoom": 8,
     "southWestViewport": {"lat": 32.7, "lng": 34.9},
     "northEastViewport": {"lat": 32.9, "lng": 35.1}},
    {"name": "Tel Aviv", "location": {"lat": 32.0853, "lng": 34.7818}, "zoom": 10}
]"#;

fn main() -> Result<()> {
    println!("=== schoolmap-rs Map Sync Example ===\n");

    let directory = Directory::from_json_str(DIRECTORY)?;
    let records = schoolmap_core::geocode::parse_snapshot(CACHE)?;
    let settings = Settings::from_json_str(r#"{"kmz_file": "schools.kmz"}"#)?;
    let map = ConsoleMap {
        bounds: None,
        markers: 0,
    };
    let sync = MapSync::new(map, MemoryStore::new(records.clone()), settings);
    let mut page = Dispatcher::new(directory, sync, 20261018);

    let events = vec![
        ("type 'Tech'", Event::QueryChanged("Tech".into())),
        ("click Haifa (map not enabled yet)", Event::CityClicked(0)),
        ("map reports its bounds", Event::BoundsChanged),
        (
            "click a marker",
            Event::MarkerClicked {
                feature: MarkerFeature {
                    name: "ORT Haifa".into(),
                    description: "Address: Herzl 5<br>Site: <a href=\"http://ort.org.il/\">ort.org.il/</a>"
                        .into(),
                    status: "OK".into(),
                },
                position: LatLng::new(32.81, 34.99),
            },
        ),
        ("click Haifa again", Event::CityClicked(0)),
        ("focus the search box", Event::FilterFocused),
        ("map moves while typing", Event::BoundsChanged),
        ("leave the search box", Event::FilterBlurred),
    ];

    for (label, event) in events {
        println!("--- {label} ---");
        let outcome = page.dispatch(event);
        println!("  => {}", serde_json::to_string(&outcome).unwrap_or_default());
    }
    println!();

    // An async host captures the region, fetches the cache, then applies.
    println!("--- Two overlapping bounds passes ---");
    let first = page.sync_mut().begin_bounds_request();
    let second = page.sync_mut().begin_bounds_request();
    if let (Ok(first), Ok(second)) = (first, second) {
        println!("  late first response: {:?}", page.apply_bounds(&first, &records));
        println!("  second response: {:?}", page.apply_bounds(&second, &records));
    }

    let stats = page.directory().stats();
    println!(
        "\nVisible: {} of {} cities, {} of {} schools",
        stats.visible_cities, stats.cities, stats.visible_schools, stats.schools
    );
    println!("\n=== Example completed successfully ===");
    Ok(())
}
