// crates/schoolmap-core/src/raw.rs
use serde::Deserialize;
use std::collections::BTreeMap;

/// One accordion item as extracted from the rendered page.
///
/// Two shapes are accepted:
///
/// ```json
/// [
///   { "name": "Haifa", "schools": ["Haifa Tech"], "open": true },
///   { "Tel Aviv": ["Tel Aviv Arts"] }
/// ]
/// ```
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CityRaw {
    Entry {
        name: String,
        #[serde(default)]
        schools: Vec<String>,
        /// Item rendered expanded by the accordion on load.
        #[serde(default)]
        open: bool,
    },
    Pair(BTreeMap<String, Vec<String>>),
}

pub type DirectoryRaw = Vec<CityRaw>;
