//! # SkySheet Loading
//!
//! A SkySheet is a JSON array whose first element describes the song:
//!
//! ```json
//! [{
//!   "name": "Song title",
//!   "author": "Composer",
//!   "transcribedBy": "Transcriber",
//!   "songNotes": [{"time": 0, "key": "1Key3"}, {"time": 480, "key": "1Key5"}]
//! }]
//! ```
//!
//! Only `songNotes` is required. Files in the wild come as UTF-16 (with BOM) or
//! UTF-8 (with or without BOM); decodings are tried in that order and the first
//! that yields text wins. A JSON error on text that decoded is final.

use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::Path;

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};
use serde::Deserialize;

use crate::error::SheetError;
use crate::key::parse_key;
use crate::quantize::Note;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Text encodings accepted for song files, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf16WithBom,
    Utf8WithBom,
    Utf8,
}

impl TextEncoding {
    pub const PRIORITY: [TextEncoding; 3] = [
        TextEncoding::Utf16WithBom,
        TextEncoding::Utf8WithBom,
        TextEncoding::Utf8,
    ];

    /// Decode `bytes` strictly, or `None` if they are not in this encoding.
    fn decode(self, bytes: &[u8]) -> Option<Cow<'_, str>> {
        match self {
            TextEncoding::Utf16WithBom => match Encoding::for_bom(bytes) {
                Some((encoding, bom_len)) if encoding == UTF_16LE || encoding == UTF_16BE => encoding
                    .decode_without_bom_handling_and_without_replacement(&bytes[bom_len..]),
                _ => None,
            },
            TextEncoding::Utf8WithBom => bytes
                .strip_prefix(UTF8_BOM)
                .and_then(|rest| UTF_8.decode_without_bom_handling_and_without_replacement(rest)),
            TextEncoding::Utf8 => UTF_8.decode_without_bom_handling_and_without_replacement(bytes),
        }
    }
}

/// A parsed song: metadata plus normalized notes.
#[derive(Debug, Clone, PartialEq)]
pub struct Song {
    pub name: Option<String>,
    pub author: Option<String>,
    pub transcribed_by: Option<String>,
    pub notes: Vec<Note>,
}

impl Song {
    /// Song name, or `fallback` when the file has none.
    pub fn title(&self, fallback: &str) -> String {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => fallback.to_string(),
        }
    }

    /// `"Author: X | Transcribed by: Y"`, skipping absent parts.
    ///
    /// The labels are English whatever language the page is later shown in.
    pub fn subtitle(&self) -> Option<String> {
        let parts: Vec<String> = [
            ("Author", self.author.as_deref()),
            ("Transcribed by", self.transcribed_by.as_deref()),
        ]
        .into_iter()
        .filter_map(|(label, value)| match value {
            Some(value) if !value.is_empty() => Some(format!("{}: {}", label, value)),
            _ => None,
        })
        .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" | "))
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSong {
    name: Option<String>,
    author: Option<String>,
    transcribed_by: Option<String>,
    song_notes: Option<Vec<RawNote>>,
}

#[derive(Debug, Deserialize)]
struct RawNote {
    key: String,
    time: serde_json::Number,
}

impl RawNote {
    fn to_note(&self) -> Result<Note, SheetError> {
        // Fractional timestamps are floored to whole milliseconds
        let time = self
            .time
            .as_i64()
            .or_else(|| self.time.as_f64().map(|t| t.floor() as i64))
            .unwrap_or_default();
        Ok(Note {
            key: parse_key(&self.key)?,
            time,
        })
    }
}

/// Decode raw file bytes into text, trying each [`TextEncoding`] in priority order.
pub fn decode_text(bytes: &[u8]) -> Result<(TextEncoding, Cow<'_, str>), SheetError> {
    TextEncoding::PRIORITY
        .into_iter()
        .find_map(|encoding| encoding.decode(bytes).map(|text| (encoding, text)))
        .ok_or_else(|| {
            SheetError::UnsupportedEncoding(
                "content is neither UTF-16 with a byte order mark nor UTF-8".to_string(),
            )
        })
}

/// Parse the JSON text of a song file.
pub fn parse_song(text: &str) -> Result<Song, SheetError> {
    let entries: Vec<serde_json::Value> = serde_json::from_str(text)?;
    let first = entries.into_iter().next().ok_or_else(|| {
        SheetError::MissingRequiredField("song entry (top-level array is empty)".to_string())
    })?;
    let raw: RawSong = serde_json::from_value(first)?;

    let raw_notes = raw
        .song_notes
        .ok_or_else(|| SheetError::MissingRequiredField("songNotes".to_string()))?;
    let notes = raw_notes
        .iter()
        .map(RawNote::to_note)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Song {
        name: raw.name,
        author: raw.author,
        transcribed_by: raw.transcribed_by,
        notes,
    })
}

/// Decode and parse song file bytes.
pub fn decode_song(bytes: &[u8]) -> Result<Song, SheetError> {
    let (encoding, text) = decode_text(bytes)?;
    log::debug!("Decoded song file as {:?}", encoding);
    parse_song(&text)
}

/// Read and parse a song file from disk.
pub fn load_song(path: &Path) -> Result<Song, SheetError> {
    let bytes = fs::read(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => SheetError::InputNotFound(path.to_path_buf()),
        _ => SheetError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;
    let song = decode_song(&bytes)?;
    log::debug!("Loaded {} notes from {}", song.notes.len(), path.display());
    Ok(song)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::KeySlot;

    const SONG: &str = r#"[{"name":"Test","author":"Me","songNotes":[{"time":0,"key":"1Key3"},{"time":50,"key":"1Key5"}]}]"#;

    fn utf16le_with_bom(text: &str) -> Vec<u8> {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in text.encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        bytes
    }

    fn utf16be_with_bom(text: &str) -> Vec<u8> {
        let mut bytes = vec![0xFE, 0xFF];
        for unit in text.encode_utf16() {
            bytes.extend_from_slice(&unit.to_be_bytes());
        }
        bytes
    }

    #[test]
    fn test_parse_basic_song() {
        let song = parse_song(SONG).unwrap();
        assert_eq!(song.name.as_deref(), Some("Test"));
        assert_eq!(song.author.as_deref(), Some("Me"));
        assert_eq!(song.transcribed_by, None);
        assert_eq!(song.notes.len(), 2);
        assert_eq!(song.notes[0].key, KeySlot::new(3).unwrap());
        assert_eq!(song.notes[1].time, 50);
    }

    #[test]
    fn test_utf16_matches_utf8() {
        let utf8 = decode_song(SONG.as_bytes()).unwrap();
        assert_eq!(decode_song(&utf16le_with_bom(SONG)).unwrap(), utf8);
        assert_eq!(decode_song(&utf16be_with_bom(SONG)).unwrap(), utf8);
    }

    #[test]
    fn test_decode_priority() {
        let (encoding, _) = decode_text(&utf16le_with_bom(SONG)).unwrap();
        assert_eq!(encoding, TextEncoding::Utf16WithBom);

        let mut with_bom = UTF8_BOM.to_vec();
        with_bom.extend_from_slice(SONG.as_bytes());
        let (encoding, text) = decode_text(&with_bom).unwrap();
        assert_eq!(encoding, TextEncoding::Utf8WithBom);
        assert!(text.starts_with('['));

        let (encoding, _) = decode_text(SONG.as_bytes()).unwrap();
        assert_eq!(encoding, TextEncoding::Utf8);
    }

    #[test]
    fn test_unsupported_encoding() {
        // Latin-1 'é' is not valid UTF-8
        let bytes = b"[{\"name\":\"Caf\xE9\",\"songNotes\":[]}]";
        assert!(matches!(decode_song(bytes), Err(SheetError::UnsupportedEncoding(_))));
    }

    #[test]
    fn test_invalid_json() {
        let result = decode_song(b"[{\"songNotes\": [");
        assert!(matches!(result, Err(SheetError::MalformedJson(_))));
    }

    #[test]
    fn test_missing_song_notes() {
        let result = parse_song(r#"[{"name":"No notes"}]"#);
        if let Err(SheetError::MissingRequiredField(field)) = result {
            assert_eq!(field, "songNotes");
        } else {
            panic!("Expected MissingRequiredField but got: {:?}", result);
        }
        assert!(matches!(parse_song("[]"), Err(SheetError::MissingRequiredField(_))));
    }

    #[test]
    fn test_malformed_note_key() {
        let result = parse_song(r#"[{"songNotes":[{"time":0,"key":"Note3"}]}]"#);
        assert!(matches!(result, Err(SheetError::MalformedKey { .. })));
    }

    #[test]
    fn test_fractional_time_is_floored() {
        let song = parse_song(r#"[{"songNotes":[{"time":199.9,"key":"1Key0"}]}]"#).unwrap();
        assert_eq!(song.notes[0].time, 199);
    }

    #[test]
    fn test_fractional_times_bucket_after_flooring() {
        // 0.5 and 100.4 floor to 0 and 100, one bucket apart
        let song = parse_song(
            r#"[{"songNotes":[{"time":0.5,"key":"1Key0"},{"time":100.4,"key":"1Key1"}]}]"#,
        )
        .unwrap();
        let quantized = crate::quantize::quantize(&song.notes).unwrap();
        assert_eq!(quantized.span.min_time, 0);
        assert_eq!(quantized.chords.len(), 2);
        assert_eq!(quantized.chords[1].start, 100);
    }

    #[test]
    fn test_title_and_subtitle() {
        let mut song = parse_song(SONG).unwrap();
        assert_eq!(song.title("file"), "Test");
        assert_eq!(song.subtitle().as_deref(), Some("Author: Me"));

        song.transcribed_by = Some("You".to_string());
        assert_eq!(song.subtitle().as_deref(), Some("Author: Me | Transcribed by: You"));

        song.name = Some(String::new());
        song.author = None;
        assert_eq!(song.title("file"), "file");
        assert_eq!(song.subtitle().as_deref(), Some("Transcribed by: You"));

        song.transcribed_by = None;
        assert_eq!(song.subtitle(), None);
    }
}
