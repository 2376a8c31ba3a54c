// crates/schoolmap-core/src/model.rs
use crate::common::DirectoryStats;
use crate::error::{MapError, Result};
use crate::raw::{CityRaw, DirectoryRaw};
use crate::text::{escape_html, mark_range};
use crate::traits::NameMatch;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::ops::Range;
use std::path::Path;

/// Opaque handle back to the rendered element an entry was read from.
///
/// Handles are assigned in document order when the directory is built, so a
/// host can keep a `Vec` of elements indexed by handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DomHandle(pub u32);

/// A leaf item of the accordion.
#[derive(Debug, Clone)]
pub struct SchoolEntry {
    text: String,
    dom: DomHandle,
    visible: bool,
    highlight: Option<Range<usize>>,
}

impl SchoolEntry {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn dom(&self) -> DomHandle {
        self.dom
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Byte range of the highlighted query match, if any.
    pub fn highlight(&self) -> Option<Range<usize>> {
        self.highlight.clone()
    }

    /// Text content as HTML, with the highlighted match wrapped in a mark span.
    pub fn html(&self) -> String {
        match &self.highlight {
            Some(range) => mark_range(&self.text, range.clone()),
            None => escape_html(&self.text),
        }
    }

    pub(crate) fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub(crate) fn set_highlight(&mut self, range: Option<Range<usize>>) {
        self.highlight = range;
    }
}

/// A top-level accordion item: one city and its schools.
#[derive(Debug, Clone)]
pub struct CityEntry {
    name: String,
    schools: Vec<SchoolEntry>,
    dom: DomHandle,
    visible: bool,
    open: bool,
}

impl CityEntry {
    /// Display name exactly as rendered (may carry surrounding whitespace).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schools(&self) -> &[SchoolEntry] {
        &self.schools
    }

    pub fn dom(&self) -> DomHandle {
        self.dom
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub(crate) fn schools_mut(&mut self) -> &mut [SchoolEntry] {
        &mut self.schools
    }

    pub(crate) fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub(crate) fn set_open(&mut self, open: bool) {
        self.open = open;
    }

    /// Makes every school of this city visible, leaving highlights alone.
    pub(crate) fn show_all_schools(&mut self) {
        for school in &mut self.schools {
            school.visible = true;
        }
    }
}

impl NameMatch for CityEntry {
    fn name_str(&self) -> &str {
        &self.name
    }
}

/// The in-memory view of the rendered accordion.
///
/// Entries are enumerated once and never created or destroyed afterwards;
/// only their visibility, highlight and open annotations change.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    cities: Vec<CityEntry>,
}

impl Directory {
    /// Builds the directory from raw items, assigning handles in document order.
    pub fn from_raw(raw: DirectoryRaw) -> Self {
        let mut next = 0u32;
        let mut handle = || {
            let h = DomHandle(next);
            next += 1;
            h
        };

        let mut cities = Vec::with_capacity(raw.len());
        for item in raw {
            let groups: Vec<(String, Vec<String>, bool)> = match item {
                CityRaw::Entry {
                    name,
                    schools,
                    open,
                } => vec![(name, schools, open)],
                CityRaw::Pair(map) => map
                    .into_iter()
                    .map(|(name, schools)| (name, schools, false))
                    .collect(),
            };
            for (name, schools, open) in groups {
                let dom = handle();
                let schools = schools
                    .into_iter()
                    .map(|text| SchoolEntry {
                        text,
                        dom: handle(),
                        visible: true,
                        highlight: None,
                    })
                    .collect();
                cities.push(CityEntry {
                    name,
                    schools,
                    dom,
                    visible: true,
                    open,
                });
            }
        }
        Directory { cities }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: DirectoryRaw = serde_json::from_str(json)?;
        Ok(Self::from_raw(raw))
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            MapError::NotFound(format!("Directory not found at {}: {}", path.display(), e))
        })?;
        let mut json = String::new();
        BufReader::new(file).read_to_string(&mut json)?;
        Self::from_json_str(&json)
    }

    pub fn cities(&self) -> &[CityEntry] {
        &self.cities
    }

    pub(crate) fn cities_mut(&mut self) -> &mut [CityEntry] {
        &mut self.cities
    }

    pub fn city(&self, index: usize) -> Option<&CityEntry> {
        self.cities.get(index)
    }

    pub(crate) fn city_mut(&mut self, index: usize) -> Option<&mut CityEntry> {
        self.cities.get_mut(index)
    }

    /// Index of the first city whose trimmed name equals `name` (trimmed).
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.cities.iter().position(|c| c.is_named(name))
    }

    /// Trimmed names of all cities, in document order, without duplicates.
    pub fn city_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::with_capacity(self.cities.len());
        for city in &self.cities {
            let name = city.name.trim();
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
        names
    }

    pub fn open_city(&self) -> Option<&CityEntry> {
        self.cities.iter().find(|c| c.open)
    }

    pub fn stats(&self) -> DirectoryStats {
        let mut stats = DirectoryStats {
            cities: self.cities.len(),
            schools: 0,
            visible_cities: 0,
            visible_schools: 0,
        };
        for city in &self.cities {
            stats.schools += city.schools.len();
            if city.visible {
                stats.visible_cities += 1;
                stats.visible_schools += city.schools.iter().filter(|s| s.visible).count();
            }
        }
        stats
    }

    /// Serializable snapshot of the current visibility/highlight state.
    pub fn view(&self) -> DirectoryView {
        DirectoryView {
            cities: self
                .cities
                .iter()
                .map(|c| CityView {
                    name: c.name.clone(),
                    dom: c.dom,
                    visible: c.visible,
                    open: c.open,
                    schools: c
                        .schools
                        .iter()
                        .map(|s| SchoolView {
                            dom: s.dom,
                            visible: s.visible,
                            html: s.html(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

/// JSON view of a [`SchoolEntry`] for hosts that patch the real DOM.
#[derive(Debug, Clone, Serialize)]
pub struct SchoolView {
    pub dom: DomHandle,
    pub visible: bool,
    pub html: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CityView {
    pub name: String,
    pub dom: DomHandle,
    pub visible: bool,
    pub open: bool,
    pub schools: Vec<SchoolView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DirectoryView {
    pub cities: Vec<CityView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        { "name": "Haifa", "schools": ["Haifa Tech", "Carmel High"], "open": true },
        { "Tel Aviv": ["Tel Aviv Arts"] }
    ]"#;

    #[test]
    fn both_item_shapes_load_in_order() {
        let dir = Directory::from_json_str(SAMPLE).unwrap();
        let names: Vec<_> = dir.cities().iter().map(|c| c.name()).collect();
        assert_eq!(names, ["Haifa", "Tel Aviv"]);
        assert!(dir.cities()[0].is_open());
        assert!(!dir.cities()[1].is_open());
        assert_eq!(dir.cities()[1].schools()[0].text(), "Tel Aviv Arts");
    }

    #[test]
    fn handles_follow_document_order() {
        let dir = Directory::from_json_str(SAMPLE).unwrap();
        let haifa = &dir.cities()[0];
        assert_eq!(haifa.dom(), DomHandle(0));
        assert_eq!(haifa.schools()[0].dom(), DomHandle(1));
        assert_eq!(haifa.schools()[1].dom(), DomHandle(2));
        assert_eq!(dir.cities()[1].dom(), DomHandle(3));
        assert_eq!(dir.cities()[1].schools()[0].dom(), DomHandle(4));
    }

    #[test]
    fn stats_count_everything_visible_after_load() {
        let dir = Directory::from_json_str(SAMPLE).unwrap();
        let stats = dir.stats();
        assert_eq!(stats.cities, 2);
        assert_eq!(stats.schools, 3);
        assert_eq!(stats.visible_cities, 2);
        assert_eq!(stats.visible_schools, 3);
    }

    #[test]
    fn position_of_matches_trimmed_names() {
        let dir = Directory::from_json_str(r#"[{"name": " Haifa ", "schools": []}]"#).unwrap();
        assert_eq!(dir.position_of("Haifa"), Some(0));
        assert_eq!(dir.city_names(), ["Haifa"]);
        assert_eq!(dir.position_of("haifa"), None);
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = Directory::load_from_path("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, MapError::NotFound(_)));
    }
}
