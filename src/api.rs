//! # Public API
//!
//! Entry points of the converter library.
//!
//! ## Conversion Functions
//!
//! - [`convert_file()`] - Convert a song file on disk, writing `<name>.html` beside it
//! - [`convert_bytes()`] - Convert raw file bytes (any supported encoding)
//! - [`convert_str()`] - Convert JSON text with no translations or custom layout
//! - [`convert_song()`] - Render an already parsed [`Song`]
//!
//! ## Pipeline
//! 1. Decode the file (UTF-16 with BOM, UTF-8 with BOM, UTF-8)
//! 2. Parse JSON and normalize note keys to slots
//! 3. Quantize notes into 100 ms chords
//! 4. Lay chords out in rows of two with START/END labels
//! 5. Render the HTML page
//!
//! ## Typical Usage
//!
//! ```rust
//! use skysheet::convert_str;
//!
//! let json = r#"[{"name": "Demo", "songNotes": [
//!     {"time": 0, "key": "1Key3"},
//!     {"time": 50, "key": "1Key5"},
//!     {"time": 500, "key": "1Key0"}
//! ]}]"#;
//!
//! let html = convert_str(json, "demo")?;
//! assert!(html.contains("<h1>Demo</h1>"));
//! # Ok::<(), skysheet::SheetError>(())
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Datelike;

use crate::config::Resources;
use crate::error::SheetError;
use crate::layout::assemble;
use crate::quantize::quantize;
use crate::render::{to_html, Document};
use crate::sheet::{decode_song, load_song, parse_song, Song};

/// Current calendar year, printed in the page footer.
pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// Render a parsed song.
///
/// `fallback_title` is used when the song has no name, typically the input
/// file name without extension.
///
/// # Errors
/// Returns [`SheetError::MissingRequiredField`] if the song has no notes.
pub fn convert_song(
    song: &Song,
    fallback_title: &str,
    resources: &Resources,
    year: i32,
) -> Result<String, SheetError> {
    let quantized = quantize(&song.notes)?;
    let sheet = assemble(&quantized, song.notes.len());
    log::debug!(
        "Laid out {} chords in {} rows",
        sheet.chord_count(),
        sheet.rows.len()
    );

    let document = Document {
        title: song.title(fallback_title),
        subtitle: song.subtitle(),
        sheet,
        layouts: resources.layouts.clone(),
        translations: resources.translations.clone(),
        year,
    };
    to_html(&document)
}

/// Convert raw song file bytes to HTML.
pub fn convert_bytes(
    bytes: &[u8],
    fallback_title: &str,
    resources: &Resources,
) -> Result<String, SheetError> {
    let song = decode_song(bytes)?;
    convert_song(&song, fallback_title, resources, current_year())
}

/// Convert song JSON text to HTML using only the built-in resources.
pub fn convert_str(json: &str, fallback_title: &str) -> Result<String, SheetError> {
    let song = parse_song(json)?;
    convert_song(&song, fallback_title, &Resources::default(), current_year())
}

/// Path of the page generated for `input`: same directory and name, `.html` extension.
///
/// # Example
/// ```rust
/// use std::path::Path;
/// use skysheet::output_path_for;
///
/// assert_eq!(output_path_for(Path::new("songs/demo.txt")), Path::new("songs/demo.html"));
/// ```
pub fn output_path_for(input: &Path) -> PathBuf {
    input.with_extension("html")
}

/// Convert the song file at `input` and write the page beside it.
///
/// An existing output file is overwritten. Nothing is written if any step
/// fails. Returns the output path.
pub fn convert_file(input: &Path, resources: &Resources) -> Result<PathBuf, SheetError> {
    if !input.is_file() {
        return Err(SheetError::InputNotFound(input.to_path_buf()));
    }

    let song = load_song(input)?;
    let fallback_title = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let html = convert_song(&song, &fallback_title, resources, current_year())?;

    let output = output_path_for(input);
    fs::write(&output, html).map_err(|source| SheetError::Io {
        path: output.clone(),
        source,
    })?;
    log::info!("Wrote {}", output.display());

    Ok(output)
}
