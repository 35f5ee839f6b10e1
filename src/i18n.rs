//! # Translations
//!
//! Page strings live in one XML file per language, named by language code
//! (`lang/de.xml`, `lang/fr.xml`, ...). Every direct child of the root element
//! is one entry, its tag the key and its text the value:
//!
//! ```xml
//! <translations>
//!     <language>Sprache</language>
//!     <notes>Noten: {notes_count} | Dauer: {duration}</notes>
//! </translations>
//! ```
//!
//! Values may contain the placeholders `{notes_count}`, `{duration}` and
//! `{year}`, filled in when the page switches language. Missing directories
//! and unreadable files only reduce the set of available translations.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;

/// Strings of one language, by key.
pub type LanguageStrings = BTreeMap<String, String>;

/// All loaded languages, by language code.
pub type Translations = BTreeMap<String, LanguageStrings>;

/// Language selector options: code and native name.
pub const LANGUAGES: [(&str, &str); 7] = [
    ("de", "Deutsch"),
    ("en", "English"),
    ("fr", "Français"),
    ("es", "Español"),
    ("ru", "Русский"),
    ("ar", "العربية"),
    ("ja", "日本語"),
];

/// Language the page starts in.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Parse one translation file.
pub fn parse_translation_file(xml: &str) -> Result<LanguageStrings, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut strings = LanguageStrings::new();
    let mut depth = 0usize;
    let mut current: Option<(String, String)> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                depth += 1;
                if depth == 2 {
                    let tag = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    current = Some((tag, String::new()));
                }
            }
            Event::Text(text) => {
                if let (2, Some((_, value))) = (depth, current.as_mut()) {
                    value.push_str(&text.unescape()?);
                }
            }
            Event::CData(data) => {
                if let (2, Some((_, value))) = (depth, current.as_mut()) {
                    value.push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::End(_) => {
                if depth == 2 {
                    if let Some((tag, value)) = current.take() {
                        let value = value.trim();
                        if !value.is_empty() {
                            strings.insert(tag, value.to_string());
                        }
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(strings)
}

/// Load every `*.xml` file in `dir`.
pub fn load_translations(dir: &Path) -> Translations {
    let mut translations = Translations::new();

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::debug!("No translations loaded from {}: {}", dir.display(), e);
            return translations;
        }
    };

    for path in entries.filter_map(|entry| entry.ok()).map(|entry| entry.path()) {
        if path.extension().map_or(true, |ext| ext != "xml") {
            continue;
        }
        let Some(code) = path.file_stem().map(|stem| stem.to_string_lossy().into_owned()) else {
            continue;
        };

        let parsed = fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|xml| parse_translation_file(&xml).map_err(|e| e.to_string()));
        match parsed {
            Ok(strings) => {
                log::debug!("Loaded {} strings for language '{}'", strings.len(), code);
                translations.insert(code, strings);
            }
            Err(e) => log::warn!("Skipping translation file {}: {}", path.display(), e),
        }
    }

    translations
}

/// Fill the page placeholders of a translated string.
pub fn fill_placeholders(text: &str, notes_count: usize, duration: &str, year: i32) -> String {
    text.replace("{notes_count}", &notes_count.to_string())
        .replace("{duration}", duration)
        .replace("{year}", &year.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_translation_file() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<translations>
    <language>Sprache</language>
    <print>Drucken</print>
    <footer><![CDATA[© {year} | <a href="https://github.com">GitHub</a>]]></footer>
    <empty/>
    <blank>   </blank>
</translations>"#;
        let strings = parse_translation_file(xml).unwrap();
        assert_eq!(strings.len(), 3);
        assert_eq!(strings["language"], "Sprache");
        assert_eq!(strings["print"], "Drucken");
        assert!(strings["footer"].contains("<a href="));
    }

    #[test]
    fn test_parse_unescapes_entities() {
        let strings = parse_translation_file("<t><legend>a &amp; b</legend></t>").unwrap();
        assert_eq!(strings["legend"], "a & b");
    }

    #[test]
    fn test_fill_placeholders() {
        let text = "Noten: {notes_count} | Dauer: {duration} | © {year}";
        assert_eq!(
            fill_placeholders(text, 12, "1 min 5 sec", 2026),
            "Noten: 12 | Dauer: 1 min 5 sec | © 2026"
        );
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let dir = tempdir().expect("failed to create temp directory");
        assert!(load_translations(&dir.path().join("lang")).is_empty());
    }

    #[test]
    fn test_load_directory_skips_broken_files() {
        let dir = tempdir().expect("failed to create temp directory");
        fs::write(dir.path().join("de.xml"), "<t><print>Drucken</print></t>").unwrap();
        fs::write(dir.path().join("fr.xml"), "<t><print>Imprimer</t>").unwrap();
        fs::write(dir.path().join("notes.txt"), "<t><print>x</print></t>").unwrap();

        let translations = load_translations(dir.path());
        assert_eq!(translations.len(), 1);
        assert_eq!(translations["de"]["print"], "Drucken");
    }
}
