// crates/schoolmap-core/src/popup.rs
//! Marker popup formatting.
//!
//! Marker descriptions come from an exported map layer whose text format we
//! do not control. The rules below are a fixed contract pinned by the golden
//! cases in the tests; change them only together with those cases.

use crate::text::{escape_html, remove_invisible_marks};
use serde::{Deserialize, Serialize};

/// Line break used by the layer between description fields.
pub const FIELD_DELIMITER: &str = "<br>";
/// Separates a field's label from its value.
pub const LABEL_SEPARATOR: char = ':';

const LINK_CLASS: &str = "info_window_school_link";

/// Feature data attached to a clicked overlay marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerFeature {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "ok_status")]
    pub status: String,
}

fn ok_status() -> String {
    "OK".to_string()
}

impl MarkerFeature {
    pub fn is_ok(&self) -> bool {
        self.status == "OK"
    }
}

/// The two fields shown in the popup, as HTML fragments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PopupContent {
    pub address: Option<String>,
    pub link: Option<String>,
}

impl PopupContent {
    pub fn is_empty(&self) -> bool {
        self.address.is_none() && self.link.is_none()
    }

    /// Full popup body: wrapper, header with `title`, then one `<div>` per field.
    pub fn to_html(&self, title: &str) -> String {
        let mut body = String::new();
        for field in [&self.address, &self.link].into_iter().flatten() {
            body.push_str("<div>");
            body.push_str(field);
            body.push_str("</div>");
        }
        format!(
            "<div class='info_window_wrapper'><h3 class='info_window_header'>{}</h3>\
             <div class='info_window_content'>{}</div></div>",
            escape_html(title),
            body
        )
    }
}

/// Turns a raw marker description into popup fields.
///
/// 1. Left-to-right marks and `target="_blank"` attributes are dropped.
/// 2. The text is split on `<br>`; blank parts are ignored.
/// 3. Four parts mean the layer doubled the address/link pair; the second,
///    more complete pair wins. Otherwise the first part is the address and
///    the second (if any) the link.
/// 4. A field whose leading text has several `:` separators loses
///    everything through the second-to-last one (a repeated label).
/// 5. `/</a>` becomes `</a>`; anchors get the popup link class.
/// 6. The label (text up to the first separator) is bolded.
/// 7. A field with nothing after its label is omitted.
pub fn format_popup_content(description: &str) -> PopupContent {
    let cleaned = remove_invisible_marks(description)
        .replace(" target=\"_blank\"", "")
        .replace("target=\"_blank\"", "");
    let parts: Vec<&str> = cleaned
        .split(FIELD_DELIMITER)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    let (address, link) = match parts.as_slice() {
        [_, _, address, link] => (Some(*address), Some(*link)),
        [address, link, ..] => (Some(*address), Some(*link)),
        [address] => (Some(*address), None),
        [] => (None, None),
    };

    PopupContent {
        address: address.and_then(format_field),
        link: link.and_then(format_field),
    }
}

/// End of the plain-text prefix of a field (start of the first tag).
fn leading_text_end(field: &str) -> usize {
    field.find('<').unwrap_or(field.len())
}

fn drop_repeated_label(field: &str) -> &str {
    let lead = &field[..leading_text_end(field)];
    let separators: Vec<usize> = lead
        .match_indices(LABEL_SEPARATOR)
        .map(|(i, _)| i)
        .collect();
    if separators.len() > 1 {
        let cut = separators[separators.len() - 2] + LABEL_SEPARATOR.len_utf8();
        field[cut..].trim_start()
    } else {
        field
    }
}

fn format_field(raw: &str) -> Option<String> {
    let field = drop_repeated_label(raw.trim())
        .replace("/</a>", "</a>")
        .replace("<a ", &format!("<a class='{LINK_CLASS}' "));

    let lead_end = leading_text_end(&field);
    match field[..lead_end].find(LABEL_SEPARATOR) {
        Some(i) => {
            let split = i + LABEL_SEPARATOR.len_utf8();
            let label = field[..split].trim();
            let value = field[split..].trim();
            if value.is_empty() {
                None
            } else {
                Some(format!("<b>{label}</b> {value}"))
            }
        }
        None if field.is_empty() => None,
        None => Some(field),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_address_and_link() {
        let got = format_popup_content(
            "כתובת: הרצל 5<br>אתר: <a href=\"http://ort.org.il/\">http://ort.org.il/</a>",
        );
        assert_eq!(got.address.as_deref(), Some("<b>כתובת:</b> הרצל 5"));
        assert_eq!(
            got.link.as_deref(),
            Some(
                "<b>אתר:</b> <a class='info_window_school_link' href=\"http://ort.org.il/\">http://ort.org.il</a>"
            )
        );
    }

    #[test]
    fn doubled_pair_uses_second() {
        let got = format_popup_content(
            "Address: Herzl<br>Site: <a href=\"a\">a</a><br>Address: Herzl 5, Haifa<br>Site: <a href=\"b\">b/</a>",
        );
        assert_eq!(got.address.as_deref(), Some("<b>Address:</b> Herzl 5, Haifa"));
        assert_eq!(
            got.link.as_deref(),
            Some("<b>Site:</b> <a class='info_window_school_link' href=\"b\">b</a>")
        );
    }

    #[test]
    fn repeated_label_is_dropped() {
        let got = format_popup_content("School: Address: Address: Herzl 5");
        assert_eq!(got.address.as_deref(), Some("<b>Address:</b> Herzl 5"));
        assert_eq!(got.link, None);
    }

    #[test]
    fn url_colons_do_not_count_as_separators() {
        let got = format_popup_content("Address: Herzl 5<br>Site: <a href=\"https://x.org/\">https://x.org/</a>");
        assert!(got.link.unwrap().starts_with("<b>Site:</b> <a "));
    }

    #[test]
    fn bare_labels_are_omitted() {
        let got = format_popup_content("Address:<br> Site: ");
        assert!(got.is_empty());
    }

    #[test]
    fn marks_and_target_attributes_are_removed() {
        let got = format_popup_content(
            "\u{200E}Address: Herzl 5\u{200E}<br>Site: <a href=\"x\" target=\"_blank\">x</a>",
        );
        assert_eq!(got.address.as_deref(), Some("<b>Address:</b> Herzl 5"));
        assert_eq!(
            got.link.as_deref(),
            Some("<b>Site:</b> <a class='info_window_school_link' href=\"x\">x</a>")
        );
    }

    #[test]
    fn unlabeled_text_is_kept_as_is() {
        let got = format_popup_content("Herzl 5<br><br>");
        assert_eq!(got.address.as_deref(), Some("Herzl 5"));
        assert_eq!(got.link, None);
    }

    #[test]
    fn empty_description() {
        assert!(format_popup_content("").is_empty());
        assert!(format_popup_content("<br><br>").is_empty());
    }

    #[test]
    fn html_wraps_fields_under_header() {
        let content = PopupContent {
            address: Some("<b>Address:</b> Herzl 5".into()),
            link: None,
        };
        assert_eq!(
            content.to_html("ORT <Haifa>"),
            "<div class='info_window_wrapper'><h3 class='info_window_header'>ORT &lt;Haifa&gt;</h3>\
             <div class='info_window_content'><div><b>Address:</b> Herzl 5</div></div></div>"
        );
    }

    #[test]
    fn feature_status_defaults_to_ok() {
        let f: MarkerFeature = serde_json::from_str(r#"{"name": "ORT Haifa"}"#).unwrap();
        assert!(f.is_ok());
        let f: MarkerFeature =
            serde_json::from_str(r#"{"name": "x", "status": "ZERO_RESULTS"}"#).unwrap();
        assert!(!f.is_ok());
    }
}
