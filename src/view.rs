//! # Page View State
//!
//! The generated page has two selectors, language and keyboard layout. This
//! module holds the rules behind them; the script embedded by
//! [`crate::render`] implements the same transitions in the browser.
//!
//! - Choosing a language applies its strings and switches to the layout
//!   suggested for it.
//! - Choosing a layout relabels every key. Which keys are active never changes.
//! - Choosing `CUSTOM` without a custom layout keeps the page usable: the
//!   selection falls back to the default layout and a guidance message is
//!   shown.

use crate::i18n::{fill_placeholders, Translations, DEFAULT_LANGUAGE};
use crate::key::KeySlot;
use crate::keyboard::{suggested_layout, LayoutName, LayoutSet, CUSTOM_LAYOUT_WIKI_URL};
use crate::layout::SongStats;

/// Outcome of a layout selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutChange {
    Applied(LayoutName),
    /// The requested layout does not exist; `reverted_to` is now selected.
    Unavailable {
        requested: LayoutName,
        reverted_to: LayoutName,
        message: String,
    },
}

/// Message shown when `CUSTOM` is chosen but no `custom.xml` was found.
pub fn custom_layout_missing_message() -> String {
    format!(
        "Custom layout file missing!\n\n\
         Please create 'custom.xml' next to the application.\n\
         See the wiki for instructions: {}",
        CUSTOM_LAYOUT_WIKI_URL
    )
}

/// Current selector values of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    language: String,
    layout: LayoutName,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            layout: LayoutName::DEFAULT,
        }
    }
}

impl ViewState {
    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn layout(&self) -> LayoutName {
        self.layout
    }

    /// Switch language, then switch to the layout suggested for it.
    pub fn select_language(&mut self, language: &str, layouts: &LayoutSet) -> LayoutChange {
        self.language = language.to_string();
        self.select_layout(suggested_layout(language), layouts)
    }

    /// Switch keyboard layout.
    pub fn select_layout(&mut self, layout: LayoutName, layouts: &LayoutSet) -> LayoutChange {
        if layouts.is_available(layout) {
            self.layout = layout;
            return LayoutChange::Applied(layout);
        }

        log::debug!("Layout {} unavailable, reverting to {}", layout, LayoutName::DEFAULT);
        self.layout = LayoutName::DEFAULT;
        LayoutChange::Unavailable {
            requested: layout,
            reverted_to: LayoutName::DEFAULT,
            message: custom_layout_missing_message(),
        }
    }

    /// Character currently shown on `slot`.
    pub fn key_label<'a>(&self, slot: KeySlot, layouts: &'a LayoutSet) -> &'a str {
        layouts.char_for(self.layout, slot)
    }

    /// Translated string for `key` in the current language, with placeholders
    /// filled. `None` leaves the element's English text in place.
    pub fn translate(
        &self,
        key: &str,
        translations: &Translations,
        stats: &SongStats,
        year: i32,
    ) -> Option<String> {
        translations
            .get(&self.language)
            .and_then(|strings| strings.get(key))
            .map(|text| fill_placeholders(text, stats.note_count, &stats.duration.to_string(), year))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::LanguageStrings;
    use crate::keyboard::LayoutTable;
    use crate::layout::SongDuration;

    fn slot(index: usize) -> KeySlot {
        KeySlot::new(index).unwrap()
    }

    fn stats() -> SongStats {
        SongStats {
            note_count: 42,
            duration: SongDuration { minutes: 1, seconds: 7 },
        }
    }

    #[test]
    fn test_initial_state() {
        let view = ViewState::default();
        assert_eq!(view.language(), "en");
        assert_eq!(view.layout(), LayoutName::Qwertz);
        assert_eq!(view.key_label(slot(0), &LayoutSet::default()), "z");
    }

    #[test]
    fn test_language_suggests_layout() {
        let layouts = LayoutSet::default();
        let mut view = ViewState::default();

        assert_eq!(view.select_language("ru", &layouts), LayoutChange::Applied(LayoutName::Russian));
        assert_eq!(view.key_label(slot(0), &layouts), "й");

        view.select_language("ja", &layouts);
        assert_eq!(view.layout(), LayoutName::Jis);

        view.select_language("xx", &layouts);
        assert_eq!(view.language(), "xx");
        assert_eq!(view.layout(), LayoutName::Qwerty);
    }

    #[test]
    fn test_missing_custom_layout_reverts() {
        let layouts = LayoutSet::default();
        let mut view = ViewState::default();
        view.select_layout(LayoutName::Azerty, &layouts);

        match view.select_layout(LayoutName::Custom, &layouts) {
            LayoutChange::Unavailable { requested, reverted_to, message } => {
                assert_eq!(requested, LayoutName::Custom);
                assert_eq!(reverted_to, LayoutName::Qwertz);
                assert!(message.contains("custom.xml"));
                assert!(message.contains(CUSTOM_LAYOUT_WIKI_URL));
            }
            other => panic!("Expected Unavailable but got: {:?}", other),
        }
        assert_eq!(view.layout(), LayoutName::Qwertz);
        assert_eq!(view.key_label(slot(14), &layouts), "-");
    }

    #[test]
    fn test_custom_layout_applies() {
        let mut table = LayoutTable::new();
        table.insert(slot(0), "1".to_string());
        let layouts = LayoutSet::new(Some(table));
        let mut view = ViewState::default();

        assert_eq!(view.select_layout(LayoutName::Custom, &layouts), LayoutChange::Applied(LayoutName::Custom));
        assert_eq!(view.key_label(slot(0), &layouts), "1");
    }

    #[test]
    fn test_translate() {
        let mut de = LanguageStrings::new();
        de.insert("notes".to_string(), "Noten: {notes_count} | Dauer: {duration}".to_string());
        let mut translations = Translations::new();
        translations.insert("de".to_string(), de);

        let layouts = LayoutSet::default();
        let mut view = ViewState::default();
        assert_eq!(view.translate("notes", &translations, &stats(), 2026), None);

        view.select_language("de", &layouts);
        assert_eq!(
            view.translate("notes", &translations, &stats(), 2026).as_deref(),
            Some("Noten: 42 | Dauer: 1 min 7 sec")
        );
        assert_eq!(view.translate("print", &translations, &stats(), 2026), None);
    }
}
