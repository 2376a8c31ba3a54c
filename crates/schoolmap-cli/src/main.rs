//! schoolmap — Command-line interface for schoolmap-core
//!
//! Works on the same two documents the page works on: the directory of
//! cities and schools, and the geocode cache (`cities_map.json`).
//!
//! Usage examples
//! --------------
//!
//! - Summary of the directory, and of the cache when one is given
//!   $ schoolmap -d schools.json -c cities_map.json stats
//!
//! - What the filter box would leave visible
//!   $ schoolmap -d schools.json filter Tech
//!   $ schoolmap -d schools.json filter Tech --show-siblings --json
//!
//! - Cached geocode of a city and the view a click on it would take
//!   $ schoolmap -c cities_map.json lookup Haifa
//!
//! - Cities a map looking at south/west/north/east would list
//!   $ schoolmap -d schools.json -c cities_map.json in-view 32.7 34.9 32.9 35.1
//!
//! - Popup HTML for a marker description
//!   $ schoolmap popup 'Address: Herzl 5<br>Site: <a href="x">x</a>' --name 'ORT'
//!
//! - Apply an endpoint payload to the cache file
//!   $ schoolmap -c cities_map.json persist payload.txt
//!
//! - Geocode the cities missing from the cache (feature `http`)
//!   $ schoolmap -d schools.json -c cities_map.json reconcile --api-key KEY
mod args;

use crate::args::{CliArgs, Commands};
use anyhow::Context;
use clap::Parser;
use schoolmap_core::prelude::*;
use std::io::Read;
use tracing::{debug, Level};

/// A map that never moves: it reports one region and logs every command.
struct FixedView {
    bounds: LatLngBounds,
    center: LatLng,
}

impl MapWidget for FixedView {
    fn load_overlay(&mut self, url: &str) {
        debug!(url, "load_overlay ignored");
    }

    fn show_full_layer(&mut self) {
        debug!("show_full_layer ignored");
    }

    fn fit_bounds(&mut self, rect: LatLngBounds) {
        debug!(?rect, "fit_bounds ignored");
    }

    fn set_center_zoom(&mut self, center: LatLng, zoom: u32) {
        debug!(?center, zoom, "set_center_zoom ignored");
    }

    fn bounds(&self) -> Option<LatLngBounds> {
        Some(self.bounds)
    }

    fn center(&self) -> LatLng {
        self.center
    }

    fn show_info_window(&mut self, _content: &str, _position: LatLng) {}

    fn close_info_window(&mut self) {}

    fn place_marker(&mut self, _position: LatLng, _icon_url: &str) -> MarkerHandle {
        MarkerHandle(0)
    }

    fn remove_marker(&mut self, _handle: MarkerHandle) {}
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_settings(path: Option<&str>) -> anyhow::Result<Settings> {
    match path {
        Some(path) => Settings::load_from_path(path)
            .with_context(|| format!("loading settings from {path}")),
        None => Ok(Settings::default()),
    }
}

fn load_directory(path: Option<&str>) -> anyhow::Result<Directory> {
    let path = path.context("this command needs --directory <FILE>")?;
    Directory::load_from_path(path).with_context(|| format!("loading directory from {path}"))
}

fn read_payload(source: &str) -> anyhow::Result<String> {
    if source == "-" {
        let mut payload = String::new();
        std::io::stdin()
            .read_to_string(&mut payload)
            .context("reading payload from stdin")?;
        Ok(payload)
    } else {
        std::fs::read_to_string(source).with_context(|| format!("reading payload from {source}"))
    }
}

fn print_directory(directory: &Directory) {
    for city in directory.cities().iter().filter(|c| c.is_visible()) {
        println!("{}", city.name().trim());
        for school in city.schools().iter().filter(|s| s.is_visible()) {
            let mark = if school.highlight().is_some() { '*' } else { '-' };
            println!("  {mark} {}", school.text());
        }
    }
}

fn describe_view(view: &ViewTarget) -> String {
    match view {
        ViewTarget::FitBounds(r) => format!(
            "fit bounds S {} W {} N {} E {}",
            r.south, r.west, r.north, r.east
        ),
        ViewTarget::CenterZoom { center, zoom } => {
            format!("center {}, {} at zoom {zoom}", center.lat, center.lng)
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    init_logging(args.verbose);

    let settings = load_settings(args.settings.as_deref())?;
    // Cache path: explicit flag wins over the settings' json_file
    let cache_path = args
        .cache
        .clone()
        .unwrap_or_else(|| settings.json_file.clone());

    match args.command {
        Commands::Stats => {
            let directory = load_directory(args.directory.as_deref())?;
            let stats = directory.stats();
            println!("Directory statistics:");
            println!("  Cities: {}", stats.cities);
            println!("  Schools: {}", stats.schools);

            if args.cache.is_some() {
                let cache = GeocodeCache::new(FileStore::new(&cache_path), settings.record_zoom);
                let names = directory.city_names();
                let missing = cache.missing_names(names.iter().map(String::as_str));
                println!("Cache {cache_path}:");
                println!("  Records: {}", cache.records().len());
                println!("  Cities without a record: {}", missing.len());
                for name in missing {
                    println!("  - {name}");
                }
            }
        }

        Commands::Filter {
            query,
            show_siblings,
            json,
        } => {
            let mut directory = load_directory(args.directory.as_deref())?;
            let policy = if show_siblings {
                SiblingPolicy::Show
            } else {
                settings.sibling_policy
            };
            let outcome = FilterEngine::new(policy).apply_filter(&mut directory, &query);

            if json {
                println!("{}", serde_json::to_string_pretty(&directory.view())?);
            } else if outcome.visible_cities == 0 {
                println!("No cities or schools match: {query}");
            } else {
                print_directory(&directory);
                println!(
                    "{} cities, {} matching schools",
                    outcome.visible_cities, outcome.matched_schools
                );
            }
        }

        Commands::Lookup { name } => {
            let cache = GeocodeCache::new(FileStore::new(&cache_path), settings.record_zoom);
            match cache.lookup(&name) {
                Some(record) => {
                    println!("{}", serde_json::to_string_pretty(&record)?);
                    println!("Click view: {}", describe_view(&record.target_view()));
                }
                None => {
                    eprintln!("No cached geocode for: {}", name.trim());
                }
            }
        }

        Commands::InView {
            south,
            west,
            north,
            east,
            center_lat,
            center_lng,
        } => {
            let mut directory = load_directory(args.directory.as_deref())?;
            let bounds = LatLngBounds {
                south,
                west,
                north,
                east,
            };
            let center = match (center_lat, center_lng) {
                (Some(lat), Some(lng)) => LatLng::new(lat, lng),
                _ => bounds.center(),
            };
            let map = FixedView { bounds, center };
            let mut sync = MapSync::new(map, FileStore::new(&cache_path), settings);

            match sync.on_bounds_changed(&mut directory) {
                BoundsOutcome::Applied { shown, hidden } => {
                    for city in directory.cities().iter().filter(|c| c.is_visible()) {
                        println!("{}", city.name().trim());
                    }
                    println!("{shown} shown, {hidden} hidden");
                }
                BoundsOutcome::CacheUnavailable => anyhow::bail!(
                    "cannot read the geocode cache at {cache_path} (run with -v for details)"
                ),
                other => anyhow::bail!("bounds pass did not run: {other:?}"),
            }
        }

        Commands::Popup { description, name } => {
            let content = format_popup_content(&description);
            if content.is_empty() {
                eprintln!("Description has no displayable fields");
            }
            println!("{}", content.to_html(&name));
        }

        Commands::Persist { payload } => {
            let payload = read_payload(&payload)?;
            let store = FileStore::new(&cache_path);
            let count = store
                .persist_payload(&payload)
                .with_context(|| format!("persisting into {cache_path}"))?;
            println!("Wrote {count} records to {cache_path}");
        }

        #[cfg(feature = "http")]
        Commands::Reconcile {
            api_key,
            language,
            region,
            dry_run,
        } => {
            let directory = load_directory(args.directory.as_deref())?;
            let cache = GeocodeCache::new(FileStore::new(&cache_path), settings.record_zoom);
            let names = directory.city_names();

            if dry_run {
                for name in cache.missing_names(names.iter().map(String::as_str)) {
                    println!("{name}");
                }
                return Ok(());
            }

            let geocoder = schoolmap_core::HttpGeocoder::new(api_key).with_locale(language, region);
            // Running the tool against the cache file is the privileged path.
            let report = cache.reconcile(names.iter().map(String::as_str), &geocoder, true);
            for name in &report.added {
                println!("+ {name}");
            }
            for (name, status) in &report.failed {
                println!("! {name} ({status})");
            }
            for name in &report.unpersisted {
                println!("? {name} (geocoded, not written)");
            }
            if !report.unpersisted.is_empty() {
                anyhow::bail!(
                    "{} cache updates could not be written to {cache_path}",
                    report.unpersisted.len()
                );
            }
        }
    }

    Ok(())
}
