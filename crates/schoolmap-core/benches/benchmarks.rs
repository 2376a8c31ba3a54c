use criterion::{criterion_group, criterion_main, Criterion};
use schoolmap_core::prelude::*;
use std::hint::black_box;

/// A directory shaped like the live one: a few hundred cities, a handful of
/// schools each.
fn synthetic_directory() -> Directory {
    let cities: Vec<serde_json::Value> = (0..300)
        .map(|c| {
            let schools: Vec<String> = (0..8)
                .map(|s| format!("School {s} of City {c} (Technology track)"))
                .collect();
            serde_json::json!({ "name": format!("City {c}"), "schools": schools })
        })
        .collect();
    Directory::from_json_str(&serde_json::Value::Array(cities).to_string())
        .expect("synthetic directory")
}

fn synthetic_records() -> Vec<GeoRecord> {
    (0..300)
        .map(|c| {
            let lat = 29.5 + f64::from(c) * 0.01;
            GeoRecord {
                name: format!("City {c}"),
                location: LatLng::new(lat, 34.9),
                zoom: 8,
                bounds: None,
                south_west_viewport: Some(LatLng::new(lat - 0.05, 34.8)),
                north_east_viewport: Some(LatLng::new(lat + 0.05, 35.0)),
            }
        })
        .collect()
}

fn bench_filter(c: &mut Criterion) {
    let engine = FilterEngine::default();
    let mut dir = synthetic_directory();

    c.bench_function("apply_filter/school_match", |b| {
        b.iter(|| engine.apply_filter(&mut dir, black_box("City 17 (")))
    });
    c.bench_function("apply_filter/no_match", |b| {
        b.iter(|| engine.apply_filter(&mut dir, black_box("Gymnasium")))
    });
    c.bench_function("apply_filter/empty", |b| {
        b.iter(|| engine.apply_filter(&mut dir, black_box("")))
    });
}

fn bench_in_map(c: &mut Criterion) {
    let records = synthetic_records();
    let region = LatLngBounds::from_corners(LatLng::new(30.0, 34.5), LatLng::new(30.5, 35.5));
    let center = region.center();

    c.bench_function("is_in_map/all_records", |b| {
        b.iter(|| {
            records
                .iter()
                .filter(|r| r.is_in_map(black_box(&region), center))
                .count()
        })
    });
}

fn bench_popup(c: &mut Criterion) {
    let description = "כתובת: כתובת: הרצל 5, חיפה<br>אתר: <a href=\"http://ort.org.il/\" target=\"_blank\">http://ort.org.il/</a>";
    c.bench_function("format_popup_content", |b| {
        b.iter(|| format_popup_content(black_box(description)))
    });
}

criterion_group!(benches, bench_filter, bench_in_map, bench_popup);
criterion_main!(benches);
