// crates/schoolmap-core/src/text.rs
//! Small string helpers shared by the filter, the popup formatter and the
//! file store. All matching here is literal; nothing is treated as a pattern.

use std::ops::Range;

/// CSS class wrapped around the part of a school name that matched the query.
pub const SEARCH_MARK_CLASS: &str = "searched-school-mark";

/// Left-to-right mark. Some marker descriptions carry it and some don't,
/// which breaks literal comparisons.
const LRM: char = '\u{200E}';

/// Escapes the characters that are significant in HTML text content.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Renders `text` as HTML with `range` wrapped in the search mark span.
///
/// `range` must be a byte range on char boundaries of `text`, as produced by
/// [`find_literal`].
pub fn mark_range(text: &str, range: Range<usize>) -> String {
    format!(
        "{}<span class=\"{}\">{}</span>{}",
        escape_html(&text[..range.start]),
        SEARCH_MARK_CLASS,
        escape_html(&text[range.clone()]),
        escape_html(&text[range.end..]),
    )
}

/// Byte range of the first literal occurrence of `needle` in `haystack`.
///
/// An empty needle never matches.
pub fn find_literal(haystack: &str, needle: &str) -> Option<Range<usize>> {
    if needle.is_empty() {
        return None;
    }
    haystack
        .find(needle)
        .map(|start| start..start + needle.len())
}

/// Removes every `<...>` tag, keeping the text between tags.
///
/// An unterminated `<` drops the rest of the input, like PHP's `strip_tags`.
pub fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for ch in s.chars() {
        match (ch, in_tag) {
            ('<', false) => in_tag = true,
            ('>', true) => in_tag = false,
            (_, false) => out.push(ch),
            (_, true) => {}
        }
    }
    out
}

/// Un-quotes a backslash-escaped string: `\x` becomes `x`, `\\` becomes `\`.
pub fn strip_slashes(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(ch);
        }
    }
    out
}

pub fn remove_invisible_marks(s: &str) -> String {
    s.chars().filter(|&c| c != LRM).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_literal_ignores_pattern_syntax() {
        assert_eq!(find_literal("a.b*c", ".b*"), Some(1..4));
        assert_eq!(find_literal("abc", "a.c"), None);
        assert_eq!(find_literal("abc", ""), None);
    }

    #[test]
    fn mark_range_wraps_and_escapes() {
        let html = mark_range("R&D Tech", 4..8);
        assert_eq!(
            html,
            "R&amp;D <span class=\"searched-school-mark\">Tech</span>"
        );
    }

    #[test]
    fn strip_tags_keeps_text() {
        assert_eq!(strip_tags("<b>Haifa</b> <i>x</i>"), "Haifa x");
        assert_eq!(strip_tags("a < b"), "a ");
    }

    #[test]
    fn strip_slashes_unquotes() {
        assert_eq!(strip_slashes(r#"{\"name\":\"Haifa\"}"#), r#"{"name":"Haifa"}"#);
        assert_eq!(strip_slashes(r"a\\b"), r"a\b");
    }

    #[test]
    fn invisible_marks_are_removed() {
        assert_eq!(remove_invisible_marks("\u{200E}Herzl 5\u{200E}"), "Herzl 5");
    }
}
