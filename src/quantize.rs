//! # Chord Quantization
//!
//! Turns an unordered list of key presses into the ordered list of chords shown
//! on the sheet.
//!
//! ## Algorithm
//! 1. Find `min_time` and `max_time` over all notes.
//! 2. Generate 100 ms buckets `[start, start + 100)` from `min_time` while
//!    `start <= max_time`. The bucket count is `(max - min) / 100 + 1`, so the
//!    last bucket may be partially or entirely beyond the final note.
//! 3. Put every note's slot into bucket `(time - min_time) / 100`. Keys are a
//!    set: the same slot twice in one bucket counts once.
//! 4. Drop empty buckets. What remains are the chords, in time order.
//!
//! Only occupied buckets are ever stored: a bucket is identified by its index
//! and its bounds are derived from the span. Spans whose bucket arithmetic
//! overflows `i64` are rejected with [`SheetError::TimeOutOfRange`].
//!
//! Notes closer than one bucket are therefore played together, which is the
//! intended lossy compression: the sheet shows what to press, not when.
//!
//! ## Example
//! ```rust
//! use skysheet::{parse_key, quantize, Note};
//!
//! let notes = vec![
//!     Note { key: parse_key("1Key3")?, time: 0 },
//!     Note { key: parse_key("1Key5")?, time: 50 },
//!     Note { key: parse_key("1Key0")?, time: 500 },
//! ];
//! let quantized = quantize(&notes)?;
//! assert_eq!(quantized.chords.len(), 2);
//! assert_eq!(quantized.chords[1].start, 500);
//! # Ok::<(), skysheet::SheetError>(())
//! ```

use std::collections::{BTreeMap, BTreeSet};

use crate::error::SheetError;
use crate::key::KeySlot;

/// Width of one quantization bucket in milliseconds.
pub const BUCKET_WIDTH_MS: i64 = 100;

/// A single key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Note {
    pub key: KeySlot,
    /// Milliseconds from the start of the recording
    pub time: i64,
}

/// One time bucket `[start, end)` with the slots struck inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval {
    pub start: i64,
    pub end: i64,
    pub keys: BTreeSet<KeySlot>,
}

impl Interval {
    pub fn is_active(&self, slot: KeySlot) -> bool {
        self.keys.contains(&slot)
    }
}

/// First and last note time of a song.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSpan {
    pub min_time: i64,
    pub max_time: i64,
}

impl TimeSpan {
    /// Span of `notes`, or `None` when there are no notes.
    pub fn of(notes: &[Note]) -> Option<Self> {
        let first = notes.first()?;
        let span = notes.iter().fold(
            TimeSpan {
                min_time: first.time,
                max_time: first.time,
            },
            |span, note| TimeSpan {
                min_time: span.min_time.min(note.time),
                max_time: span.max_time.max(note.time),
            },
        );
        Some(span)
    }

    /// Saturates for spans wider than `i64::MAX`, which [`quantize`] rejects.
    pub fn length_ms(&self) -> i64 {
        self.max_time.saturating_sub(self.min_time)
    }

    /// Number of buckets generated for this span (start <= max_time policy).
    ///
    /// `None` when the span does not fit the integer range.
    pub fn bucket_count(&self) -> Option<usize> {
        let length = self.max_time.checked_sub(self.min_time)?;
        usize::try_from(length / BUCKET_WIDTH_MS).ok()?.checked_add(1)
    }

    /// Bucket holding `time`, if it lies inside the generated buckets.
    pub fn bucket_index(&self, time: i64) -> Option<usize> {
        let offset = time.checked_sub(self.min_time)?;
        let index = usize::try_from(offset.div_euclid(BUCKET_WIDTH_MS)).ok()?;
        (index < self.bucket_count()?).then_some(index)
    }

    /// `[start, end)` of bucket `index`.
    pub fn bucket_bounds(&self, index: usize) -> Option<(i64, i64)> {
        let start = i64::try_from(index)
            .ok()?
            .checked_mul(BUCKET_WIDTH_MS)?
            .checked_add(self.min_time)?;
        Some((start, start.checked_add(BUCKET_WIDTH_MS)?))
    }
}

/// Result of quantization: the song span and its non-empty intervals.
#[derive(Debug, Clone, PartialEq)]
pub struct Quantized {
    pub span: TimeSpan,
    pub chords: Vec<Interval>,
}

fn no_notes() -> SheetError {
    SheetError::MissingRequiredField("songNotes (no notes to quantize)".to_string())
}

fn out_of_range(span: &TimeSpan) -> SheetError {
    SheetError::TimeOutOfRange {
        min_time: span.min_time,
        max_time: span.max_time,
    }
}

/// Quantize notes into chords: the non-empty 100 ms buckets in time order.
///
/// # Errors
/// Returns [`SheetError::MissingRequiredField`] when `notes` is empty and
/// [`SheetError::TimeOutOfRange`] when the bucket arithmetic would overflow.
pub fn quantize(notes: &[Note]) -> Result<Quantized, SheetError> {
    let span = TimeSpan::of(notes).ok_or_else(no_notes)?;
    let bucket_count = span.bucket_count().ok_or_else(|| out_of_range(&span))?;

    let mut occupied: BTreeMap<usize, BTreeSet<KeySlot>> = BTreeMap::new();
    for note in notes {
        if let Some(index) = span.bucket_index(note.time) {
            occupied.entry(index).or_default().insert(note.key);
        }
    }

    let chords = occupied
        .into_iter()
        .map(|(index, keys)| {
            let (start, end) = span
                .bucket_bounds(index)
                .ok_or_else(|| out_of_range(&span))?;
            Ok(Interval { start, end, keys })
        })
        .collect::<Result<Vec<_>, SheetError>>()?;

    log::debug!(
        "Quantized {} notes into {} buckets, {} chords",
        notes.len(),
        bucket_count,
        chords.len()
    );

    Ok(Quantized { span, chords })
}
