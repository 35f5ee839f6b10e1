//! # Error Types
//!
//! This module defines all error types for the SkySheet converter.
//!
//! Every variant is terminal for a conversion run. Degraded conditions (missing
//! translations, a broken custom layout, absent metadata) are not errors: they
//! are logged and replaced by defaults.
//!
//! ## Error Types
//! - `InputNotFound` - The input path does not name an existing file
//! - `UnsupportedEncoding` - The file is neither UTF-16 (with BOM) nor UTF-8
//! - `MalformedJson` - The decoded text is not valid JSON of the expected shape
//! - `MalformedKey` - A note's key does not resolve to one of the 15 key slots
//! - `MissingRequiredField` - No song entry, no `songNotes`, or no notes at all
//! - `TimeOutOfRange` - Note times too far apart to bucket in 64-bit milliseconds
//! - `PageData` - The page's embedded JSON data could not be serialized
//! - `Io` - The input could not be read or the output could not be written
//!
//! ## Usage
//! ```rust
//! use skysheet::{convert_str, SheetError};
//!
//! match convert_str("[{\"songNotes\": []}]", "demo") {
//!     Ok(html) => println!("{} bytes", html.len()),
//!     Err(SheetError::MissingRequiredField(field)) => eprintln!("missing {}", field),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SheetError {
    /// The input path does not exist or is not a regular file.
    #[error("File not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// None of the supported decodings produced text.
    ///
    /// # Example
    /// ```
    /// # use skysheet::SheetError;
    /// let err = SheetError::UnsupportedEncoding("invalid UTF-8 sequence".to_string());
    /// assert_eq!(err.to_string(), "Unsupported file encoding: invalid UTF-8 sequence");
    /// ```
    #[error("Unsupported file encoding: {0}")]
    UnsupportedEncoding(String),

    /// The text decoded but is not JSON, or its values have the wrong types.
    #[error("Invalid JSON format: {0}")]
    MalformedJson(#[from] serde_json::Error),

    /// A note key without a recognizable `KeyN` token.
    ///
    /// # Example
    /// ```
    /// # use skysheet::SheetError;
    /// let err = SheetError::MalformedKey {
    ///     key: "Note3".to_string(),
    ///     message: "no 'Key' token".to_string(),
    /// };
    /// assert_eq!(err.to_string(), "Malformed key 'Note3': no 'Key' token");
    /// ```
    #[error("Malformed key '{key}': {message}")]
    MalformedKey { key: String, message: String },

    /// A required part of the song file is absent or empty.
    #[error("Missing required field: {0}")]
    MissingRequiredField(String),

    /// Note times whose bucket arithmetic overflows.
    ///
    /// # Example
    /// ```
    /// # use skysheet::SheetError;
    /// let err = SheetError::TimeOutOfRange { min_time: -9, max_time: 9 };
    /// assert_eq!(err.to_string(), "Note times out of range: -9 ms to 9 ms");
    /// ```
    #[error("Note times out of range: {min_time} ms to {max_time} ms")]
    TimeOutOfRange { min_time: i64, max_time: i64 },

    /// Serializing the data block embedded in the page failed.
    #[error("Failed to serialize page data: {0}")]
    PageData(#[source] serde_json::Error),

    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
