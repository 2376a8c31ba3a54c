//! Error handling example for schoolmap-rs
//!
//! This example demonstrates how failures surface, and which ones are
//! absorbed so that filtering and the map keep working

use schoolmap_core::prelude::*;

fn main() -> Result<()> {
    println!("=== schoolmap-rs Error Handling Example ===\n");

    // Example 1: Loading a directory that does not exist
    println!("--- Example 1: Missing directory file ---");
    match Directory::load_from_path("does/not/exist.json") {
        Ok(_) => println!("✓ Directory loaded"),
        Err(MapError::NotFound(msg)) => println!("  Not found: {msg}"),
        Err(e) => eprintln!("✗ Unexpected error: {e}"),
    }
    println!();

    // Example 2: Invalid settings are rejected up front
    println!("--- Example 2: Settings validation ---");
    for json in [
        r#"{"record_zoom": 40}"#,
        r#"{"json_file": ""}"#,
        r#"{"kmz_file": "schools.kmz", "default_view": null}"#,
    ] {
        match Settings::from_json_str(json) {
            Ok(settings) => println!("  OK: overlay {}", settings.overlay_url(20261018)),
            Err(e) => println!("  Rejected {json}: {e}"),
        }
    }
    println!();

    // Example 3: Cache documents
    println!("--- Example 3: Cache snapshots ---");
    let documents = [
        "",
        "null",
        r#"{"name": "Haifa"}"#,
        r#"[{"name": "Haifa"}, {"name": "Akko", "location": {"lat": 32.93, "lng": 35.08}, "zoom": 8}]"#,
    ];
    for doc in documents {
        match schoolmap_core::geocode::parse_snapshot(doc) {
            Ok(records) => println!("  {:?} -> {} records", doc, records.len()),
            Err(e) => println!("  {:?} -> error: {e}", doc),
        }
    }
    println!();

    // Example 4: Lookups on an unreadable cache are simply "not found"
    println!("--- Example 4: Store failures degrade to not found ---");
    let dir = std::env::temp_dir().join("schoolmap-error-demo");
    std::fs::create_dir_all(&dir)?;
    let path = dir.join("cities_map.json");
    std::fs::write(&path, "{ not json")?;
    let cache = GeocodeCache::new(FileStore::new(&path), 8);
    println!("  lookup(Haifa) = {:?}", cache.lookup("Haifa"));

    // Example 5: The endpoint's persistence rule refuses non-array payloads
    println!("--- Example 5: Persisting payloads ---");
    let store = FileStore::new(&path);
    match store.persist_payload(r#"{\"name\": \"Haifa\"}"#) {
        Ok(n) => println!("  stored {n} records"),
        Err(e) => println!("  refused: {e}"),
    }
    let stored = store.persist_payload(r#"[{\"name\": \"<b>Haifa</b>\", \"location\": {\"lat\": 32.79, \"lng\": 34.98}, \"zoom\": 8}]"#)?;
    println!("  stored {stored} records");
    println!("  lookup(Haifa) = {:?}", cache.lookup("Haifa").map(|r| r.name));

    std::fs::remove_dir_all(&dir)?;
    Ok(())
}
