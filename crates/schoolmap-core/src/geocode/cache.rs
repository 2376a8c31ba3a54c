// crates/schoolmap-core/src/geocode/cache.rs
use super::record::GeoRecord;
use super::store::CacheStore;
use super::GeocodeStatus;
use crate::traits::{Geocoder, NameMatch};
use serde::Serialize;
use tracing::{debug, info, warn};

/// What a [`GeocodeCache::reconcile`] run did.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReconcileReport {
    /// The caller is not privileged; nothing was fetched or written.
    pub skipped_unprivileged: bool,
    /// Names geocoded, appended and written, in request order.
    pub added: Vec<String>,
    /// Names the geocoder could not resolve.
    pub failed: Vec<(String, GeocodeStatus)>,
    /// Names geocoded but not written because the store refused the update.
    pub unpersisted: Vec<String>,
}

/// Resolves city names against the cache document held by a [`CacheStore`].
///
/// Every operation reads a fresh snapshot; nothing is memoized between
/// calls. Store failures degrade to "not found" with a warning.
#[derive(Debug)]
pub struct GeocodeCache<S: CacheStore> {
    store: S,
    record_zoom: u32,
}

impl<S: CacheStore> GeocodeCache<S> {
    pub fn new(store: S, record_zoom: u32) -> Self {
        GeocodeCache { store, record_zoom }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// A fresh snapshot of all records; empty when the store fails.
    pub fn records(&self) -> Vec<GeoRecord> {
        match self.store.fetch() {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "cache snapshot unavailable");
                Vec::new()
            }
        }
    }

    /// First record whose trimmed name equals the trimmed `name`.
    pub fn lookup(&self, name: &str) -> Option<GeoRecord> {
        let found = find_record(&self.records(), name).cloned();
        if found.is_none() {
            debug!(name = name.trim(), "no cached geocode");
        }
        found
    }

    /// Trimmed names (first occurrence order, no duplicates) with no record.
    pub fn missing_names<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        let records = self.records();
        missing_from(&records, names)
    }

    /// Geocodes every name that has no record yet and appends the results.
    ///
    /// Runs only for privileged callers. Each successful geocode appends one
    /// record and submits the whole collection, so a later failure never
    /// loses an earlier addition. Existing records are never touched.
    pub fn reconcile<'a, G>(
        &self,
        names: impl IntoIterator<Item = &'a str>,
        geocoder: &G,
        privileged: bool,
    ) -> ReconcileReport
    where
        G: Geocoder + ?Sized,
    {
        let mut report = ReconcileReport::default();
        if !privileged {
            debug!("reconcile skipped: caller is not privileged");
            report.skipped_unprivileged = true;
            return report;
        }

        let mut records = match self.store.fetch() {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "reconcile aborted: cache snapshot unavailable");
                return report;
            }
        };

        for name in missing_from(&records, names) {
            let response = geocoder.geocode(&name);
            let Some(result) = response.best() else {
                warn!(name = %name, status = %response.status, "could not geocode");
                report.failed.push((name, response.status));
                continue;
            };

            records.push(GeoRecord::from_geocode(&name, result, self.record_zoom));
            match self.store.submit(&records) {
                Ok(()) => {
                    info!(name = %name, "geocoded and appended");
                    report.added.push(name);
                }
                Err(e) => {
                    // Keep the working copy equal to what the store holds.
                    records.pop();
                    warn!(name = %name, error = %e, "cache update not persisted");
                    report.unpersisted.push(name);
                }
            }
        }
        report
    }
}

fn find_record<'r>(records: &'r [GeoRecord], name: &str) -> Option<&'r GeoRecord> {
    records.iter().find(|r| r.is_named(name))
}

fn missing_from<'a>(records: &[GeoRecord], names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut missing: Vec<String> = Vec::new();
    for name in names {
        let name = name.trim();
        if name.is_empty() || missing.iter().any(|m| m == name) {
            continue;
        }
        if find_record(records, name).is_none() {
            missing.push(name.to_string());
        }
    }
    missing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{LatLng, LatLngBounds};
    use crate::error::{MapError, Result};
    use crate::geocode::{GeocodeResponse, GeocodeResult, MemoryStore};
    use std::cell::RefCell;

    fn record(name: &str) -> GeoRecord {
        GeoRecord {
            name: name.into(),
            location: LatLng::new(32.0, 35.0),
            zoom: 8,
            bounds: None,
            south_west_viewport: None,
            north_east_viewport: None,
        }
    }

    /// Resolves every address except the ones listed in `unknown`.
    struct StubGeocoder {
        unknown: Vec<&'static str>,
        calls: RefCell<Vec<String>>,
    }

    impl StubGeocoder {
        fn new(unknown: Vec<&'static str>) -> Self {
            StubGeocoder {
                unknown,
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl Geocoder for StubGeocoder {
        fn geocode(&self, address: &str) -> GeocodeResponse {
            self.calls.borrow_mut().push(address.to_string());
            if self.unknown.iter().any(|u| *u == address) {
                return GeocodeResponse::failed(GeocodeStatus::ZeroResults);
            }
            GeocodeResponse {
                status: GeocodeStatus::Ok,
                results: vec![GeocodeResult {
                    location: LatLng::new(31.25, 34.79),
                    bounds: None,
                    viewport: LatLngBounds::from_corners(
                        LatLng::new(31.2, 34.7),
                        LatLng::new(31.3, 34.9),
                    ),
                }],
            }
        }
    }

    struct BrokenStore;

    impl CacheStore for BrokenStore {
        fn fetch(&self) -> Result<Vec<GeoRecord>> {
            Err(MapError::NotFound("offline".into()))
        }
        fn submit(&self, _: &[GeoRecord]) -> Result<()> {
            Err(MapError::NotFound("offline".into()))
        }
    }

    #[test]
    fn lookup_matches_trimmed_names_exactly() {
        let cache = GeocodeCache::new(MemoryStore::new(vec![record(" Haifa ")]), 8);
        assert!(cache.lookup("Haifa").is_some());
        assert!(cache.lookup("  Haifa").is_some());
        assert!(cache.lookup("haifa").is_none());
        assert!(cache.lookup("Hai").is_none());
    }

    #[test]
    fn lookup_sees_each_fresh_snapshot() {
        let cache = GeocodeCache::new(MemoryStore::default(), 8);
        assert!(cache.lookup("Haifa").is_none());
        cache.store().replace(vec![record("Haifa")]);
        assert!(cache.lookup("Haifa").is_some());
    }

    #[test]
    fn store_failure_is_not_found() {
        let cache = GeocodeCache::new(BrokenStore, 8);
        assert!(cache.lookup("Haifa").is_none());
        assert!(cache.records().is_empty());
    }

    #[test]
    fn reconcile_appends_only_missing_names() {
        let cache = GeocodeCache::new(MemoryStore::new(vec![record("Haifa")]), 8);
        let geocoder = StubGeocoder::new(vec![]);
        let report = cache.reconcile(["Haifa", "Beer Sheva ", "Beer Sheva"], &geocoder, true);

        assert_eq!(report.added, ["Beer Sheva"]);
        assert_eq!(*geocoder.calls.borrow(), ["Beer Sheva"]);
        assert_eq!(cache.store().submissions(), 1);

        let added = cache.lookup("Beer Sheva").unwrap();
        assert_eq!(added.zoom, 8);
        assert_eq!(added.south_west_viewport, Some(LatLng::new(31.2, 34.7)));
        assert_eq!(cache.records()[0], record("Haifa"));
    }

    #[test]
    fn reconcile_skips_failures_and_keeps_going() {
        let cache = GeocodeCache::new(MemoryStore::default(), 10);
        let geocoder = StubGeocoder::new(vec!["Atlantis"]);
        let report = cache.reconcile(["Atlantis", "Dimona"], &geocoder, true);

        assert_eq!(report.failed, [("Atlantis".to_string(), GeocodeStatus::ZeroResults)]);
        assert_eq!(report.added, ["Dimona"]);
        assert_eq!(cache.lookup("Dimona").unwrap().zoom, 10);
        assert!(cache.lookup("Atlantis").is_none());
    }

    /// Reads fine but refuses every write.
    struct ReadOnlyStore(MemoryStore);

    impl CacheStore for ReadOnlyStore {
        fn fetch(&self) -> Result<Vec<GeoRecord>> {
            self.0.fetch()
        }
        fn submit(&self, _: &[GeoRecord]) -> Result<()> {
            Err(MapError::NotFound("read-only".into()))
        }
    }

    #[test]
    fn refused_write_is_not_reported_as_added() {
        let cache = GeocodeCache::new(ReadOnlyStore(MemoryStore::default()), 8);
        let geocoder = StubGeocoder::new(vec![]);
        let report = cache.reconcile(["Dimona", "Arad"], &geocoder, true);

        assert!(report.added.is_empty());
        assert_eq!(report.unpersisted, ["Dimona", "Arad"]);
        assert!(cache.lookup("Dimona").is_none());
    }

    #[test]
    fn reconcile_requires_privilege() {
        let cache = GeocodeCache::new(MemoryStore::default(), 8);
        let geocoder = StubGeocoder::new(vec![]);
        let report = cache.reconcile(["Dimona"], &geocoder, false);

        assert!(report.skipped_unprivileged);
        assert!(geocoder.calls.borrow().is_empty());
        assert_eq!(cache.store().submissions(), 0);
    }

    #[test]
    fn missing_names_dedupes_and_trims() {
        let cache = GeocodeCache::new(MemoryStore::new(vec![record("Haifa")]), 8);
        let missing = cache.missing_names(["Haifa", " Akko", "Akko ", "", "Eilat"]);
        assert_eq!(missing, ["Akko", "Eilat"]);
    }
}
