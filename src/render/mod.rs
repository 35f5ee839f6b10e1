//! # HTML Rendering
//!
//! Produces one self-contained HTML page from an assembled sheet. Nothing is
//! loaded at view time: the stylesheet, every layout table, the translations
//! and the selector logic are embedded.
//!
//! ## Page Structure
//! ```text
//! settings menu   language select, layout select, print button
//! h1              song title
//! .author         "Author: .. | Transcribed by: .." (optional)
//! .file-info      note count and duration
//! .legend
//! .timeline
//!   .chord-row         one per row of the sheet
//!     .chord-container START/END label + 3x5 keyboard, active keys marked
//!     .arrow           between chords of the same row
//! footer
//! ```
//!
//! Every key carries `data-key="KeyN"` so the embedded script can relabel it
//! when the layout changes. Elements with `data-translate` are replaced by the
//! matching string of the selected language.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::SheetError;
use crate::i18n::{Translations, DEFAULT_LANGUAGE, LANGUAGES};
use crate::key::rows;
use crate::keyboard::{
    default_char, LayoutName, LayoutSet, LayoutTable, LANGUAGE_LAYOUTS,
};
use crate::layout::{PlacedChord, SheetLayout};
use crate::view::custom_layout_missing_message;

const STYLESHEET: &str = include_str!("sheet.css");
const SCRIPT: &str = include_str!("sheet.js");

/// Everything that goes into one page.
#[derive(Debug, Clone)]
pub struct Document {
    pub title: String,
    pub subtitle: Option<String>,
    pub sheet: SheetLayout,
    pub layouts: LayoutSet,
    pub translations: Translations,
    /// Year printed in the page footer
    pub year: i32,
}

/// Data block read by the embedded script.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PageData<'a> {
    notes_count: usize,
    duration: String,
    layouts: BTreeMap<LayoutName, LayoutTable>,
    language_layouts: BTreeMap<&'static str, LayoutName>,
    translations: &'a Translations,
    default_language: &'static str,
    default_layout: LayoutName,
    fallback_layout: LayoutName,
    custom_layout_missing: String,
}

/// Render a document to HTML.
///
/// # Errors
/// Returns [`SheetError::PageData`] if the embedded page data cannot be
/// serialized.
pub fn to_html(doc: &Document) -> Result<String, SheetError> {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n");
    html.push_str(&format!("<html lang=\"{}\">\n", DEFAULT_LANGUAGE));
    html.push_str("<head>\n");
    html.push_str("<meta charset=\"UTF-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", escape_html(&doc.title)));
    html.push_str("<style>\n");
    html.push_str(STYLESHEET);
    html.push_str(&print_page_rules(&doc.title, doc.year));
    html.push_str("</style>\n");
    html.push_str("<script type=\"application/json\" id=\"sheet-data\">");
    html.push_str(&page_data_json(doc)?);
    html.push_str("</script>\n");
    html.push_str("<script>\n");
    html.push_str(SCRIPT);
    html.push_str("</script>\n");
    html.push_str("</head>\n");

    html.push_str("<body>\n");
    html.push_str(&settings_menu());

    html.push_str("<div class=\"container\">\n");
    html.push_str(&format!("<h1>{}</h1>\n", escape_html(&doc.title)));
    if let Some(subtitle) = &doc.subtitle {
        html.push_str(&format!("<div class=\"author\">{}</div>\n", escape_html(subtitle)));
    }

    let stats = &doc.sheet.stats;
    html.push_str(&format!(
        "<div class=\"file-info\" data-translate=\"notes\">Notes: {} | Duration: {}</div>\n",
        stats.note_count, stats.duration
    ));
    html.push_str(
        "<div class=\"legend\" data-translate=\"legend\">\
         Keyboard Legend: The keys highlighted in red must be pressed simultaneously</div>\n",
    );

    html.push_str("<div class=\"timeline-container\">\n");
    html.push_str("<div class=\"timeline\">\n");
    for row in &doc.sheet.rows {
        html.push_str("<div class=\"chord-row\">\n");
        for chord in row {
            html.push_str(&chord_to_html(chord));
        }
        html.push_str("</div>\n");
    }
    html.push_str("</div>\n");
    html.push_str("</div>\n");
    html.push_str("</div>\n");

    html.push_str("<footer data-translate=\"footer\"></footer>\n");
    html.push_str("</body>\n");
    html.push_str("</html>\n");

    Ok(html)
}

fn settings_menu() -> String {
    let mut html = String::new();

    html.push_str("<div class=\"settings-menu\">\n");

    html.push_str("<div class=\"setting-group\">\n");
    html.push_str("<div class=\"setting-label lang-label\" data-translate=\"language\">Language</div>\n");
    html.push_str("<select id=\"language-select\" class=\"setting-select\">\n");
    for (code, name) in LANGUAGES {
        let selected = if code == DEFAULT_LANGUAGE { " selected" } else { "" };
        html.push_str(&format!("<option value=\"{}\"{}>{}</option>\n", code, selected, name));
    }
    html.push_str("</select>\n");
    html.push_str("</div>\n");

    html.push_str("<div class=\"setting-group\">\n");
    html.push_str("<div class=\"setting-label layout-label\" data-translate=\"keyboard\">Keyboard</div>\n");
    html.push_str("<select id=\"layout-select\" class=\"setting-select\">\n");
    for layout in LayoutName::ALL {
        let selected = if layout == LayoutName::DEFAULT { " selected" } else { "" };
        html.push_str(&format!(
            "<option value=\"{}\"{}>{}</option>\n",
            layout.as_str(),
            selected,
            layout.display_name()
        ));
    }
    html.push_str("</select>\n");
    html.push_str("</div>\n");

    html.push_str(
        "<button class=\"print-btn\" onclick=\"window.print()\" data-translate=\"print\">Print</button>\n",
    );
    html.push_str("</div>\n");

    html
}

fn chord_to_html(chord: &PlacedChord) -> String {
    let mut html = String::new();

    html.push_str("<div class=\"chord-container\">\n");
    match chord.role {
        Some(role) => html.push_str(&format!(
            "<div class=\"chord-label\" data-translate=\"{}\">{}</div>\n",
            role.translation_key(),
            role.label()
        )),
        None => html.push_str("<div class=\"chord-label\"></div>\n"),
    }
    html.push_str("<div class=\"chord\">\n");
    html.push_str("<div class=\"keyboard\">\n");
    for row in rows() {
        html.push_str("<div class=\"row\">");
        for &slot in row {
            let class = if chord.interval.is_active(slot) { "key active" } else { "key" };
            html.push_str(&format!(
                "<div class=\"{}\" data-key=\"{}\"><span class=\"key-label\">{}</span></div>",
                class,
                slot,
                escape_html(default_char(slot))
            ));
        }
        html.push_str("</div>\n");
    }
    html.push_str("</div>\n");
    html.push_str("</div>\n");
    html.push_str("</div>\n");

    if chord.transition {
        html.push_str("<div class=\"arrow\">→</div>\n");
    }

    html
}

/// `@page` rules for printing: title header from page two on, footer on every page.
fn print_page_rules(title: &str, year: i32) -> String {
    format!(
        "@media print {{\n\
         @page {{\n\
         margin: 1.5cm 0.5cm 0.8cm 0.5cm;\n\
         size: auto;\n\
         @top-center {{ content: \"{}\"; font-size: 16pt; color: #000; font-weight: bold; }}\n\
         @bottom-center {{ content: \"© {} | Support my work on GitHub | Page \" counter(page); \
         font-size: 11pt; color: #000; font-weight: bold; }}\n\
         }}\n\
         @page :first {{\n\
         @top-center {{ content: \"\"; }}\n\
         }}\n\
         }}\n",
        escape_css_string(title),
        year
    )
}

fn page_data_json(doc: &Document) -> Result<String, SheetError> {
    let data = PageData {
        notes_count: doc.sheet.stats.note_count,
        duration: doc.sheet.stats.duration.to_string(),
        layouts: doc.layouts.tables(),
        language_layouts: LANGUAGE_LAYOUTS.into_iter().collect(),
        translations: &doc.translations,
        default_language: DEFAULT_LANGUAGE,
        default_layout: LayoutName::DEFAULT,
        fallback_layout: LayoutName::FALLBACK,
        custom_layout_missing: custom_layout_missing_message(),
    };

    let json = serde_json::to_string(&data).map_err(SheetError::PageData)?;
    // A literal "</" would end the script element early
    Ok(json.replace("</", "<\\/"))
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn escape_css_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\A ")
        .replace('<', "\\3C ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::LanguageStrings;
    use crate::key::KeySlot;
    use crate::layout::assemble;
    use crate::quantize::{quantize, Note};

    fn note(index: usize, time: i64) -> Note {
        Note {
            key: KeySlot::new(index).unwrap(),
            time,
        }
    }

    fn document(notes: &[Note]) -> Document {
        Document {
            title: "Test Song".to_string(),
            subtitle: Some("Author: Me".to_string()),
            sheet: assemble(&quantize(notes).unwrap(), notes.len()),
            layouts: LayoutSet::default(),
            translations: Translations::new(),
            year: 2026,
        }
    }

    fn reference_document() -> Document {
        document(&[note(3, 0), note(5, 50), note(0, 500)])
    }

    #[test]
    fn test_basic_structure() {
        let html = to_html(&reference_document()).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Test Song</title>"));
        assert!(html.contains("<h1>Test Song</h1>"));
        assert!(html.contains("<div class=\"author\">Author: Me</div>"));
        assert!(html.contains("Notes: 3 | Duration: 0 min 0 sec"));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_chords_and_roles() {
        let html = to_html(&reference_document()).unwrap();
        assert_eq!(html.matches("class=\"chord-row\"").count(), 1);
        assert_eq!(html.matches("class=\"chord-container\"").count(), 2);
        assert_eq!(html.matches("class=\"arrow\"").count(), 1);
        assert!(html.contains("data-translate=\"start\">START</div>"));
        assert!(html.contains("data-translate=\"end\">END</div>"));

        // Key3, Key5 and Key0 are active, each once
        assert_eq!(html.matches("class=\"key active\"").count(), 3);
        assert!(html.contains("<div class=\"key active\" data-key=\"Key3\"><span class=\"key-label\">o</span></div>"));
        assert!(html.contains("<div class=\"key\" data-key=\"Key4\"><span class=\"key-label\">p</span></div>"));
    }

    #[test]
    fn test_no_subtitle() {
        let mut doc = reference_document();
        doc.subtitle = None;
        let html = to_html(&doc).unwrap();
        assert!(!html.contains("class=\"author\""));
    }

    #[test]
    fn test_title_is_escaped() {
        let mut doc = reference_document();
        doc.title = "Rock & \"Roll\" <3".to_string();
        let html = to_html(&doc).unwrap();
        assert!(html.contains("<h1>Rock &amp; &quot;Roll&quot; &lt;3</h1>"));
        assert!(html.contains("content: \"Rock & \\\"Roll\\\" \\3C 3\""));
    }

    #[test]
    fn test_print_rules_carry_year() {
        let html = to_html(&reference_document()).unwrap();
        assert!(html.contains("© 2026 | Support my work on GitHub"));
        assert!(html.contains("@page :first"));
    }

    #[test]
    fn test_selectors() {
        let html = to_html(&reference_document()).unwrap();
        assert!(html.contains("<option value=\"en\" selected>English</option>"));
        assert!(html.contains("<option value=\"QWERTZ\" selected>QWERTZ</option>"));
        assert!(html.contains("<option value=\"CUSTOM\">Custom</option>"));
        assert!(html.contains("<option value=\"ja\">日本語</option>"));
    }

    #[test]
    fn test_embedded_data() {
        let mut doc = reference_document();
        let mut de = LanguageStrings::new();
        de.insert("footer".to_string(), "<a href=\"x\">GitHub</a></script>".to_string());
        doc.translations.insert("de".to_string(), de);

        let html = to_html(&doc).unwrap();
        let start = html.find("id=\"sheet-data\">").unwrap() + "id=\"sheet-data\">".len();
        let end = start + html[start..].find("</script>").unwrap();
        let json = &html[start..end];
        assert!(!json.contains("</"));

        let data: serde_json::Value = serde_json::from_str(json).unwrap();
        assert_eq!(data["notesCount"], 3);
        assert_eq!(data["duration"], "0 min 0 sec");
        assert_eq!(data["layouts"]["RUSSIAN"]["Key0"], "й");
        assert!(data["layouts"].get("CUSTOM").is_none());
        assert_eq!(data["languageLayouts"]["fr"], "AZERTY");
        assert_eq!(data["defaultLayout"], "QWERTZ");
        assert_eq!(data["fallbackLayout"], "QWERTY");
        assert_eq!(data["translations"]["de"]["footer"], "<a href=\"x\">GitHub</a></script>");
        assert!(data["customLayoutMissing"].as_str().unwrap().contains("custom.xml"));
    }

    #[test]
    fn test_page_data_is_a_complete_object() {
        let json = page_data_json(&reference_document()).unwrap();
        let data: serde_json::Value = serde_json::from_str(&json).unwrap();
        for field in ["layouts", "languageLayouts", "translations", "defaultLayout"] {
            assert!(data.get(field).is_some(), "missing {}", field);
        }
        assert!(data["layouts"]["QWERTZ"].is_object());
    }

    #[test]
    fn test_custom_layout_is_embedded() {
        let mut doc = reference_document();
        let mut table = LayoutTable::new();
        table.insert(KeySlot::new(0).unwrap(), "q".to_string());
        doc.layouts = LayoutSet::new(Some(table));

        let html = to_html(&doc).unwrap();
        assert!(html.contains("\"CUSTOM\":{\"Key0\":\"q\"}"));
    }
}
