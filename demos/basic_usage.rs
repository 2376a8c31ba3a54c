//! Basic usage example for schoolmap-rs
//!
//! This example demonstrates how to:
//! - Load a school directory
//! - Filter it the way the page's search box does
//! - Look cities up in a geocode cache
//! - Format a marker popup

use schoolmap_core::prelude::*;

const DIRECTORY: &str = r#"[
    {"name": "Haifa", "schools": ["ORT Technical", "Leo Baeck"]},
    {"name": "Tel Aviv", "schools": ["Herzliya Gymnasium", "Tichon Hadash"]},
    {"Beer Sheva": ["Makif Alef", "Tech High"]}
]"#;

const CACHE: &str = r#"[
    {"name": "Haifa", "location": {"lat": 32.794, "lng": 34.989}, "zoom": 8,
     "southWestViewport": {"lat": 32.7, "lng": 34.9},
     "northEastViewport": {"lat": 32.9, "lng": 35.1}},
    {"name": "Tel Aviv", "location": {"lat": 32.0853, "lng": 34.7818}, "zoom": 10}
]"#;

fn print_visible(directory: &Directory) {
    for city in directory.cities().iter().filter(|c| c.is_visible()) {
        println!("  {}", city.name().trim());
        for school in city.schools().iter().filter(|s| s.is_visible()) {
            println!("    - {}", school.html());
        }
    }
}

fn main() -> Result<()> {
    println!("=== schoolmap-rs Basic Usage Example ===\n");

    // Load the directory
    println!("Loading school directory...");
    let mut directory = Directory::from_json_str(DIRECTORY)?;
    let stats = directory.stats();
    println!(
        "✓ Directory loaded: {} cities, {} schools\n",
        stats.cities, stats.schools
    );

    // Example 1: A query matching school names
    println!("--- Example 1: Filter by school name ---");
    let engine = FilterEngine::default();
    let outcome = engine.apply_filter(&mut directory, "Tech");
    println!(
        "Query {:?}: {} cities, {} matching schools",
        outcome.query, outcome.visible_cities, outcome.matched_schools
    );
    print_visible(&directory);
    println!();

    // Example 2: A query matching a city name shows all of its schools
    println!("--- Example 2: Filter by city name ---");
    engine.apply_filter(&mut directory, "Tel");
    print_visible(&directory);
    println!();

    // Example 3: Siblings of a matching school can be kept
    println!("--- Example 3: Keep sibling schools ---");
    FilterEngine::new(SiblingPolicy::Show).apply_filter(&mut directory, "Tech");
    print_visible(&directory);
    println!();

    // Example 4: The empty query shows everything again
    println!("--- Example 4: Clear the filter ---");
    engine.apply_filter(&mut directory, "");
    println!("Visible cities: {}\n", directory.stats().visible_cities);

    // Example 5: Geocode cache lookups
    println!("--- Example 5: Cache lookups ---");
    let cache = GeocodeCache::new(
        MemoryStore::new(schoolmap_core::geocode::parse_snapshot(CACHE)?),
        8,
    );
    for name in directory.city_names() {
        match cache.lookup(&name) {
            Some(record) => println!("  {name}: {:?}", record.target_view()),
            None => println!("  {name}: not cached"),
        }
    }
    let names = directory.city_names();
    println!(
        "  Missing: {:?}\n",
        cache.missing_names(names.iter().map(String::as_str))
    );

    // Example 6: Popup formatting
    println!("--- Example 6: Marker popup ---");
    let content = format_popup_content(
        "Address: Address: Herzl 5<br>Site: <a href=\"http://ort.org.il/\" target=\"_blank\">http://ort.org.il/</a>",
    );
    println!("  Address: {:?}", content.address);
    println!("  Link: {:?}", content.link);
    println!("  HTML: {}", content.to_html("ORT Haifa"));

    println!("\n=== Example completed successfully ===");
    Ok(())
}
