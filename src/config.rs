//! # Resource Configuration
//!
//! The converter reads two optional resources besides the song file:
//!
//! - `lang/`: translation files (see [`crate::i18n`])
//! - `custom.xml`: a user keyboard layout (see [`crate::keyboard`])
//!
//! Both are looked up next to the executable. The translation directory also
//! falls back to `lang/` in the working directory. Either path can be given
//! explicitly on the command line.

use std::env;
use std::path::{Path, PathBuf};

use crate::i18n::{load_translations, Translations};
use crate::keyboard::{load_custom_layout, LayoutSet};

pub const LANG_DIR_NAME: &str = "lang";
pub const CUSTOM_LAYOUT_FILE_NAME: &str = "custom.xml";

/// Where to find translations and the custom layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceConfig {
    pub lang_dir: PathBuf,
    pub custom_layout: PathBuf,
}

impl ResourceConfig {
    /// Resources inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            lang_dir: dir.join(LANG_DIR_NAME),
            custom_layout: dir.join(CUSTOM_LAYOUT_FILE_NAME),
        }
    }

    /// Default locations, optionally overridden.
    pub fn discover(lang_dir: Option<PathBuf>, custom_layout: Option<PathBuf>) -> Self {
        let program_dir = program_dir();
        let defaults = Self::in_dir(&program_dir);

        let lang_dir = lang_dir.unwrap_or_else(|| {
            let beside_program = defaults.lang_dir.clone();
            let in_working_dir = PathBuf::from(LANG_DIR_NAME);
            if !beside_program.is_dir() && in_working_dir.is_dir() {
                in_working_dir
            } else {
                beside_program
            }
        });

        let config = Self {
            lang_dir,
            custom_layout: custom_layout.unwrap_or(defaults.custom_layout),
        };
        log::debug!("Resource config: {:?}", config);
        config
    }
}

/// Directory of the running executable, or the working directory.
fn program_dir() -> PathBuf {
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Loaded optional resources. Loading never fails.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resources {
    pub translations: Translations,
    pub layouts: LayoutSet,
}

impl Resources {
    pub fn load(config: &ResourceConfig) -> Self {
        let translations = load_translations(&config.lang_dir);
        let layouts = LayoutSet::new(load_custom_layout(&config.custom_layout));
        log::debug!(
            "Loaded {} translations, custom layout {}",
            translations.len(),
            if layouts.has_custom() { "available" } else { "unavailable" }
        );
        Self {
            translations,
            layouts,
        }
    }
}
