// crates/schoolmap-core/src/geocode/store.rs
use super::record::{parse_snapshot, GeoRecord};
use crate::error::{MapError, Result};
use crate::text::{strip_slashes, strip_tags};
use std::cell::{Cell, RefCell};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Where the cache document lives.
///
/// `fetch` always reads a fresh snapshot; `submit` replaces the whole
/// document with `records`. There is no append primitive and no versioning,
/// so two writers racing can drop each other's additions.
pub trait CacheStore {
    fn fetch(&self) -> Result<Vec<GeoRecord>>;
    fn submit(&self, records: &[GeoRecord]) -> Result<()>;
}

/// In-process store, used by the wasm bindings (the host feeds it fresh
/// snapshots) and by tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RefCell<Vec<GeoRecord>>,
    submissions: Cell<usize>,
}

impl MemoryStore {
    pub fn new(records: Vec<GeoRecord>) -> Self {
        MemoryStore {
            records: RefCell::new(records),
            submissions: Cell::new(0),
        }
    }

    /// Replaces the current snapshot, as if the document had been refetched.
    pub fn replace(&self, records: Vec<GeoRecord>) {
        *self.records.borrow_mut() = records;
    }

    pub fn snapshot(&self) -> Vec<GeoRecord> {
        self.records.borrow().clone()
    }

    /// Number of successful `submit` calls so far.
    pub fn submissions(&self) -> usize {
        self.submissions.get()
    }
}

impl CacheStore for MemoryStore {
    fn fetch(&self) -> Result<Vec<GeoRecord>> {
        Ok(self.snapshot())
    }

    fn submit(&self, records: &[GeoRecord]) -> Result<()> {
        *self.records.borrow_mut() = records.to_vec();
        self.submissions.set(self.submissions.get() + 1);
        Ok(())
    }
}

/// The cache document on local disk.
///
/// Writing follows the persistence endpoint: tags are stripped and the file
/// is overwritten wholesale. Only a document that is still a JSON array
/// after stripping is written.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stores a document exactly as the endpoint receives it in its
    /// `newData` field: backslash-escaped, possibly carrying markup.
    ///
    /// The payload must still be a JSON array once unescaped and stripped;
    /// anything else is refused so a bad request cannot wipe the cache.
    pub fn persist_payload(&self, new_data: &str) -> Result<usize> {
        self.write_sanitized(&strip_slashes(new_data))
    }

    /// Strips tags from `document` and writes it, provided the result is
    /// still a JSON array. Returns the number of items written.
    fn write_sanitized(&self, document: &str) -> Result<usize> {
        let document = strip_tags(document);
        let serde_json::Value::Array(items) = serde_json::from_str::<serde_json::Value>(&document)? else {
            return Err(MapError::InvalidSnapshot(
                "payload is not a JSON array".to_string(),
            ));
        };
        self.write_document(&document)?;
        Ok(items.len())
    }

    fn write_document(&self, document: &str) -> Result<()> {
        std::fs::write(&self.path, document)?;
        info!(path = %self.path.display(), bytes = document.len(), "cache document written");
        Ok(())
    }
}

impl CacheStore for FileStore {
    fn fetch(&self) -> Result<Vec<GeoRecord>> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => parse_snapshot(&text),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no cache document yet");
                Ok(Vec::new())
            }
            Err(e) => Err(MapError::Io(e)),
        }
    }

    fn submit(&self, records: &[GeoRecord]) -> Result<()> {
        // Names are cleaned one by one; a stray `<` in a name must not eat
        // the JSON that follows it.
        let cleaned: Vec<GeoRecord> = records
            .iter()
            .map(|r| GeoRecord {
                name: strip_tags(&r.name),
                ..r.clone()
            })
            .collect();
        let json = serde_json::to_string(&cleaned)?;
        self.write_sanitized(&json).map(|_| ())
    }
}
