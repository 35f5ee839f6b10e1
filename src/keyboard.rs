//! # Keyboard Layouts
//!
//! Maps key slots to the characters printed on them. Six layouts are built in;
//! a seventh, `CUSTOM`, comes from an optional `custom.xml`:
//!
//! ```xml
//! <layout>
//!   <key id="Key0">q</key>
//!   <key id="Key1">w</key>
//!   ...
//! </layout>
//! ```
//!
//! A missing file simply leaves `CUSTOM` unavailable. A broken one is logged
//! and treated the same way.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::str::FromStr;

use quick_xml::de::DeError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::key::{KeySlot, SLOT_COUNT};

/// Characters for one layout, keyed by slot.
pub type LayoutTable = BTreeMap<KeySlot, String>;

/// Where to learn how to write `custom.xml`.
pub const CUSTOM_LAYOUT_WIKI_URL: &str =
    "https://github.com/VanilleIce/SkySheet-to-HTML-Converter/wiki/Custom-Layouts";

/// Named keyboard layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LayoutName {
    Qwertz,
    Qwerty,
    Azerty,
    Arabic,
    Jis,
    Russian,
    Custom,
}

impl LayoutName {
    /// Layout printed in the generated markup and restored on errors.
    pub const DEFAULT: LayoutName = LayoutName::Qwertz;

    /// Suggested for languages without an entry in [`LANGUAGE_LAYOUTS`].
    pub const FALLBACK: LayoutName = LayoutName::Qwerty;

    /// Order of the layout selector.
    pub const ALL: [LayoutName; 7] = [
        LayoutName::Qwertz,
        LayoutName::Qwerty,
        LayoutName::Azerty,
        LayoutName::Arabic,
        LayoutName::Jis,
        LayoutName::Russian,
        LayoutName::Custom,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LayoutName::Qwertz => "QWERTZ",
            LayoutName::Qwerty => "QWERTY",
            LayoutName::Azerty => "AZERTY",
            LayoutName::Arabic => "ARABIC",
            LayoutName::Jis => "JIS",
            LayoutName::Russian => "RUSSIAN",
            LayoutName::Custom => "CUSTOM",
        }
    }

    /// Text of the layout selector option.
    pub fn display_name(self) -> &'static str {
        match self {
            LayoutName::Arabic => "العربية",
            LayoutName::Jis => "日本語",
            LayoutName::Russian => "Русский",
            LayoutName::Custom => "Custom",
            other => other.as_str(),
        }
    }

    /// Built-in characters, `None` for [`LayoutName::Custom`].
    pub fn builtin(self) -> Option<&'static [&'static str; SLOT_COUNT]> {
        match self {
            LayoutName::Qwertz => Some(&QWERTZ),
            LayoutName::Qwerty => Some(&QWERTY),
            LayoutName::Azerty => Some(&AZERTY),
            LayoutName::Arabic => Some(&ARABIC),
            LayoutName::Jis => Some(&JIS),
            LayoutName::Russian => Some(&RUSSIAN),
            LayoutName::Custom => None,
        }
    }
}

impl fmt::Display for LayoutName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayoutName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LayoutName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| format!("Unknown keyboard layout: {}", s))
    }
}

static QWERTZ: [&str; SLOT_COUNT] = [
    "z", "u", "i", "o", "p", //
    "h", "j", "k", "l", "ö", //
    "n", "m", ",", ".", "-",
];

static QWERTY: [&str; SLOT_COUNT] = [
    "y", "u", "i", "o", "p", //
    "h", "j", "k", "l", ";", //
    "n", "m", ",", ".", "/",
];

static AZERTY: [&str; SLOT_COUNT] = [
    "y", "u", "i", "o", "p", //
    "h", "j", "k", "l", "m", //
    "b", "n", ",", ";", ":",
];

static ARABIC: [&str; SLOT_COUNT] = [
    "ش", "س", "ي", "ب", "ل", //
    "ا", "ت", "ن", "م", "ك", //
    "ط", "ئ", "ء", "ض", "ظ",
];

static JIS: [&str; SLOT_COUNT] = [
    "た", "て", "い", "す", "か", //
    "ん", "な", "に", "ら", "せ", //
    "ゆ", "も", "る", "け", "く",
];

static RUSSIAN: [&str; SLOT_COUNT] = [
    "й", "ц", "у", "к", "е", //
    "н", "г", "ш", "щ", "з", //
    "ф", "ы", "в", "а", "п",
];

/// Layout suggested when the page language changes.
pub const LANGUAGE_LAYOUTS: [(&str, LayoutName); 7] = [
    ("de", LayoutName::Qwertz),
    ("en", LayoutName::Qwerty),
    ("fr", LayoutName::Azerty),
    ("es", LayoutName::Qwerty),
    ("ru", LayoutName::Russian),
    ("ar", LayoutName::Arabic),
    ("ja", LayoutName::Jis),
];

/// Layout to switch to for a language code.
pub fn suggested_layout(language: &str) -> LayoutName {
    LANGUAGE_LAYOUTS
        .iter()
        .find(|(code, _)| *code == language)
        .map(|&(_, layout)| layout)
        .unwrap_or(LayoutName::FALLBACK)
}

/// Character printed on `slot` in the default layout.
pub fn default_char(slot: KeySlot) -> &'static str {
    QWERTZ[slot.index()]
}

/// Built-in layouts plus the custom one, if it was supplied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutSet {
    custom: Option<LayoutTable>,
}

impl LayoutSet {
    pub fn new(custom: Option<LayoutTable>) -> Self {
        Self { custom }
    }

    pub fn has_custom(&self) -> bool {
        self.custom.is_some()
    }

    /// Whether `name` can be shown.
    pub fn is_available(&self, name: LayoutName) -> bool {
        name != LayoutName::Custom || self.has_custom()
    }

    /// Character for `slot` under `name`. Slots a custom table leaves out keep
    /// their default character.
    pub fn char_for(&self, name: LayoutName, slot: KeySlot) -> &str {
        match name.builtin() {
            Some(chars) => chars[slot.index()],
            None => self
                .custom
                .as_ref()
                .and_then(|table| table.get(&slot))
                .map(String::as_str)
                .unwrap_or_else(|| default_char(slot)),
        }
    }

    /// Full table for `name`, or `None` if that layout is unavailable.
    pub fn table(&self, name: LayoutName) -> Option<LayoutTable> {
        match name.builtin() {
            Some(chars) => Some(
                KeySlot::ALL
                    .iter()
                    .map(|&slot| (slot, chars[slot.index()].to_string()))
                    .collect(),
            ),
            None => self.custom.clone(),
        }
    }

    /// Every available table, by layout name.
    pub fn tables(&self) -> BTreeMap<LayoutName, LayoutTable> {
        LayoutName::ALL
            .into_iter()
            .filter_map(|name| self.table(name).map(|table| (name, table)))
            .collect()
    }
}

/// Why a custom layout file was rejected.
#[derive(Error, Debug)]
pub enum CustomLayoutError {
    #[error("{0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Xml(#[from] DeError),

    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug, Deserialize)]
struct CustomLayoutFile {
    #[serde(rename = "key", default)]
    keys: Vec<CustomKey>,
}

#[derive(Debug, Deserialize)]
struct CustomKey {
    #[serde(rename = "@id")]
    id: String,
    #[serde(rename = "$text", default)]
    text: String,
}

/// Parse the `<key id="KeyN">char</key>` children of the document root.
pub fn parse_custom_layout(xml: &str) -> Result<LayoutTable, CustomLayoutError> {
    let file: CustomLayoutFile = quick_xml::de::from_str(xml)?;

    let mut table = LayoutTable::new();
    for key in file.keys {
        let slot = key
            .id
            .parse::<KeySlot>()
            .map_err(|e| CustomLayoutError::Invalid(e.to_string()))?;
        if !key.text.is_empty() {
            table.insert(slot, key.text);
        }
    }
    Ok(table)
}

/// Load the custom layout at `path`.
///
/// Returns `None` when the file does not exist. A file that cannot be read or
/// parsed is reported with `log::error!` and also yields `None`.
pub fn load_custom_layout(path: &Path) -> Option<LayoutTable> {
    let xml = match fs::read_to_string(path) {
        Ok(xml) => xml,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::debug!("No custom layout at {}", path.display());
            return None;
        }
        Err(e) => {
            log::error!("Error loading custom layout: {}", CustomLayoutError::Io(e));
            return None;
        }
    };

    match parse_custom_layout(&xml) {
        Ok(table) => {
            log::debug!("Loaded custom layout with {} keys from {}", table.len(), path.display());
            Some(table)
        }
        Err(e) => {
            log::error!("Error loading custom layout {}: {}", path.display(), e);
            None
        }
    }
}
