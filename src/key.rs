//! # Key Slots
//!
//! The instrument has 15 physical keys, arranged as three rows of five.
//! Song files identify them with strings such as `"1Key3"` or `"NoteKey14"`:
//! the part before `Key` varies between file producers, the number after it is
//! the slot.
//!
//! ```text
//! Key0  Key1  Key2  Key3  Key4
//! Key5  Key6  Key7  Key8  Key9
//! Key10 Key11 Key12 Key13 Key14
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::SheetError;

/// Number of key slots on the instrument.
pub const SLOT_COUNT: usize = 15;

/// Number of keys in one display row.
pub const ROW_WIDTH: usize = 5;

/// One of the 15 physical key slots, independent of the character printed on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KeySlot(u8);

impl KeySlot {
    /// All slots in ascending order.
    pub const ALL: [KeySlot; SLOT_COUNT] = {
        let mut slots = [KeySlot(0); SLOT_COUNT];
        let mut i = 0;
        while i < SLOT_COUNT {
            slots[i] = KeySlot(i as u8);
            i += 1;
        }
        slots
    };

    /// Slot for a zero-based index, if the index is in range.
    pub fn new(index: usize) -> Option<Self> {
        (index < SLOT_COUNT).then(|| KeySlot(index as u8))
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Canonical identifier, e.g. `"Key7"`.
    pub fn id(self) -> String {
        format!("Key{}", self.0)
    }
}

static SLOTS: [KeySlot; SLOT_COUNT] = KeySlot::ALL;

/// The three display rows, top to bottom.
pub fn rows() -> impl Iterator<Item = &'static [KeySlot]> {
    SLOTS.chunks(ROW_WIDTH)
}

impl fmt::Display for KeySlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key{}", self.0)
    }
}

/// Parses the exact canonical form `KeyN`.
impl FromStr for KeySlot {
    type Err = SheetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("Key").ok_or_else(|| SheetError::MalformedKey {
            key: s.to_string(),
            message: "expected 'Key' followed by a slot number".to_string(),
        })?;
        slot_from_digits(s, digits)
    }
}

impl Serialize for KeySlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.id())
    }
}

/// Extract the canonical slot from a raw note key.
///
/// The slot number is the text between the first `Key` and the next `Key`
/// (or the end of the string), so `"NoteKey3"` and `"1Key3"` both give `Key3`.
///
/// # Example
/// ```
/// use skysheet::parse_key;
///
/// assert_eq!(parse_key("1Key12")?.index(), 12);
/// assert!(parse_key("Note3").is_err());
/// # Ok::<(), skysheet::SheetError>(())
/// ```
pub fn parse_key(raw: &str) -> Result<KeySlot, SheetError> {
    let digits = raw.split("Key").nth(1).ok_or_else(|| SheetError::MalformedKey {
        key: raw.to_string(),
        message: "no 'Key' token".to_string(),
    })?;
    slot_from_digits(raw, digits)
}

fn slot_from_digits(raw: &str, digits: &str) -> Result<KeySlot, SheetError> {
    let malformed = |message: String| SheetError::MalformedKey {
        key: raw.to_string(),
        message,
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed(format!("'{}' is not a slot number", digits)));
    }
    digits
        .parse::<usize>()
        .ok()
        .and_then(KeySlot::new)
        .ok_or_else(|| malformed(format!("slot {} is out of range 0-{}", digits, SLOT_COUNT - 1)))
}
