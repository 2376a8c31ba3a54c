// crates/schoolmap-core/src/filter.rs
use crate::config::SiblingPolicy;
use crate::model::Directory;
use crate::text::find_literal;
use crate::traits::NameMatch;
use serde::Serialize;
use tracing::debug;

/// Result of one [`FilterEngine::apply_filter`] pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOutcome {
    pub query: String,
    pub visible_cities: usize,
    /// Schools highlighted as a direct text match.
    pub matched_schools: usize,
}

/// Decides city/school visibility for a query.
///
/// Matching is a literal, case-sensitive substring test. A city is visible
/// when its own name contains the query (then all of its schools are shown
/// and none is highlighted) or when at least one of its schools does (then
/// the matches are highlighted, and the [`SiblingPolicy`] decides the rest).
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterEngine {
    siblings: SiblingPolicy,
}

impl FilterEngine {
    pub fn new(siblings: SiblingPolicy) -> Self {
        FilterEngine { siblings }
    }

    pub fn sibling_policy(&self) -> SiblingPolicy {
        self.siblings
    }

    /// Applies `query` to every entry of `directory`.
    ///
    /// Highlights from any previous pass are cleared first, so applying the
    /// same query twice yields the same state as applying it once.
    pub fn apply_filter(&self, directory: &mut Directory, query: &str) -> FilterOutcome {
        let mut visible_cities = 0;
        let mut matched_schools = 0;

        for city in directory.cities_mut() {
            let name_matched = city.name_contains(query);

            let mut any_school_matched = false;
            for school in city.schools_mut() {
                let hit = if name_matched {
                    None
                } else {
                    find_literal(school.text(), query)
                };
                any_school_matched |= hit.is_some();
                school.set_visible(name_matched || hit.is_some());
                school.set_highlight(hit);
            }

            if any_school_matched {
                matched_schools += city.schools().iter().filter(|s| s.highlight().is_some()).count();
                if self.siblings == SiblingPolicy::Show {
                    city.show_all_schools();
                }
            }

            let visible = name_matched || any_school_matched;
            city.set_visible(visible);
            if visible {
                visible_cities += 1;
            }
        }

        debug!(query, visible_cities, matched_schools, "filter applied");
        FilterOutcome {
            query: query.to_string(),
            visible_cities,
            matched_schools,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Directory {
        Directory::from_json_str(
            r#"[
                { "Haifa": ["Haifa Tech", "Carmel High"] },
                { "Tel Aviv": ["Tel Aviv Arts", "Jaffa Tech"] },
                { "Eilat": ["Red Sea (a+b)"] }
            ]"#,
        )
        .unwrap()
    }

    fn visible_cities(dir: &Directory) -> Vec<&str> {
        dir.cities()
            .iter()
            .filter(|c| c.is_visible())
            .map(|c| c.name())
            .collect()
    }

    #[test]
    fn school_match_shows_city_and_highlights() {
        let mut dir = Directory::from_json_str(
            r#"[{"Haifa": ["Haifa Tech"]}, {"Tel Aviv": ["Tel Aviv Arts"]}]"#,
        )
        .unwrap();
        let out = FilterEngine::default().apply_filter(&mut dir, "Tech");

        assert_eq!(visible_cities(&dir), ["Haifa"]);
        assert_eq!(out.visible_cities, 1);
        assert_eq!(out.matched_schools, 1);
        let school = &dir.cities()[0].schools()[0];
        assert!(school.is_visible());
        assert_eq!(school.highlight(), Some(6..10));
        assert_eq!(
            school.html(),
            "Haifa <span class=\"searched-school-mark\">Tech</span>"
        );
    }

    #[test]
    fn city_name_match_shows_all_schools_unhighlighted() {
        let mut dir = sample();
        FilterEngine::default().apply_filter(&mut dir, "Tel");

        assert_eq!(visible_cities(&dir), ["Tel Aviv"]);
        let tel_aviv = &dir.cities()[1];
        assert!(tel_aviv.schools().iter().all(|s| s.is_visible()));
        assert!(tel_aviv.schools().iter().all(|s| s.highlight().is_none()));
    }

    #[test]
    fn non_matching_siblings_follow_policy() {
        let mut dir = sample();
        FilterEngine::new(SiblingPolicy::Hide).apply_filter(&mut dir, "Carmel");
        let haifa = &dir.cities()[0];
        assert!(!haifa.schools()[0].is_visible());
        assert!(haifa.schools()[1].is_visible());

        FilterEngine::new(SiblingPolicy::Show).apply_filter(&mut dir, "Carmel");
        let haifa = &dir.cities()[0];
        assert!(haifa.schools()[0].is_visible());
        assert!(haifa.schools()[0].highlight().is_none());
        assert!(haifa.schools()[1].highlight().is_some());
    }

    #[test]
    fn empty_query_resets_everything() {
        let mut dir = sample();
        let engine = FilterEngine::default();
        engine.apply_filter(&mut dir, "Tech");
        engine.apply_filter(&mut dir, "");

        let stats = dir.stats();
        assert_eq!(stats.visible_cities, stats.cities);
        assert_eq!(stats.visible_schools, stats.schools);
        assert!(dir
            .cities()
            .iter()
            .flat_map(|c| c.schools())
            .all(|s| s.highlight().is_none()));
    }

    #[test]
    fn reapplying_is_idempotent() {
        let mut once = sample();
        let mut twice = sample();
        let engine = FilterEngine::default();
        engine.apply_filter(&mut once, "Tech");
        engine.apply_filter(&mut twice, "Tech");
        engine.apply_filter(&mut twice, "Tech");

        let html = |d: &Directory| -> Vec<(bool, String)> {
            d.cities()
                .iter()
                .flat_map(|c| c.schools())
                .map(|s| (s.is_visible(), s.html()))
                .collect()
        };
        assert_eq!(html(&once), html(&twice));
        assert_eq!(once.stats(), twice.stats());
    }

    #[test]
    fn query_is_literal_not_a_pattern() {
        let mut dir = sample();
        FilterEngine::default().apply_filter(&mut dir, "(a+b)");
        assert_eq!(visible_cities(&dir), ["Eilat"]);

        FilterEngine::default().apply_filter(&mut dir, "H.ifa");
        assert!(visible_cities(&dir).is_empty());
    }

    #[test]
    fn matching_is_case_sensitive() {
        let mut dir = sample();
        FilterEngine::default().apply_filter(&mut dir, "tech");
        assert!(visible_cities(&dir).is_empty());
    }

    #[test]
    fn every_visible_school_is_justified() {
        let engine = FilterEngine::default();
        for q in ["Tech", "Tel", "a", "Jaffa", "zzz", "Aviv Arts", ""] {
            let mut dir = sample();
            engine.apply_filter(&mut dir, q);
            for city in dir.cities().iter().filter(|c| c.is_visible()) {
                for school in city.schools().iter().filter(|s| s.is_visible()) {
                    assert!(
                        school.text().contains(q) || city.name().contains(q),
                        "{:?} visible for {q:?}",
                        school.text()
                    );
                }
            }
        }
    }
}
