//! # Sheet Layout
//!
//! Arranges quantized chords into display rows and computes the summary shown
//! above the timeline.
//!
//! ## Rules
//! - Rows hold [`CHORDS_PER_ROW`] chords; the last row may hold fewer.
//! - The first chord of the sheet is labeled START, the last one END. With a
//!   single chord, START wins.
//! - A transition arrow follows every chord except the last one of its row.
//! - Duration is the whole seconds between the first and last note, split into
//!   minutes and seconds (truncated, never rounded).

use std::fmt;

use serde::Serialize;

use crate::quantize::{Interval, Quantized, TimeSpan};

/// Chords shown side by side in one row.
pub const CHORDS_PER_ROW: usize = 2;

/// Positional label of a chord on the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChordRole {
    Start,
    End,
}

impl ChordRole {
    /// Label shown before translations are applied.
    pub fn label(self) -> &'static str {
        match self {
            ChordRole::Start => "START",
            ChordRole::End => "END",
        }
    }

    /// Translation key for the label.
    pub fn translation_key(self) -> &'static str {
        match self {
            ChordRole::Start => "start",
            ChordRole::End => "end",
        }
    }
}

/// A chord placed on the sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedChord {
    pub interval: Interval,
    pub role: Option<ChordRole>,
    /// Whether an arrow to the next chord of the same row follows
    pub transition: bool,
}

/// Whole-second song duration, split for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SongDuration {
    pub minutes: i64,
    pub seconds: i64,
}

impl SongDuration {
    pub fn from_span(span: &TimeSpan) -> Self {
        let total_seconds = span.length_ms() / 1000;
        Self {
            minutes: total_seconds / 60,
            seconds: total_seconds % 60,
        }
    }
}

impl fmt::Display for SongDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} min {} sec", self.minutes, self.seconds)
    }
}

/// Summary line data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SongStats {
    /// Notes in the source file, before bucketing
    pub note_count: usize,
    pub duration: SongDuration,
}

/// The assembled sheet: rows of chords plus summary.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetLayout {
    pub rows: Vec<Vec<PlacedChord>>,
    pub stats: SongStats,
}

impl SheetLayout {
    pub fn chord_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    pub fn chords(&self) -> impl Iterator<Item = &PlacedChord> {
        self.rows.iter().flatten()
    }
}

/// Lay out quantized chords into rows and compute the song summary.
///
/// # Example
/// ```rust
/// use skysheet::{assemble, parse_key, quantize, ChordRole, Note};
///
/// let notes = vec![
///     Note { key: parse_key("1Key3")?, time: 0 },
///     Note { key: parse_key("1Key0")?, time: 500 },
/// ];
/// let layout = assemble(&quantize(&notes)?, notes.len());
/// assert_eq!(layout.rows.len(), 1);
/// assert_eq!(layout.rows[0][0].role, Some(ChordRole::Start));
/// assert_eq!(layout.rows[0][1].role, Some(ChordRole::End));
/// # Ok::<(), skysheet::SheetError>(())
/// ```
pub fn assemble(quantized: &Quantized, note_count: usize) -> SheetLayout {
    let total = quantized.chords.len();

    let rows = quantized
        .chords
        .chunks(CHORDS_PER_ROW)
        .enumerate()
        .map(|(row_index, row)| {
            row.iter()
                .enumerate()
                .map(|(i, interval)| {
                    let position = row_index * CHORDS_PER_ROW + i;
                    PlacedChord {
                        interval: interval.clone(),
                        role: role_at(position, total),
                        transition: i + 1 < row.len(),
                    }
                })
                .collect()
        })
        .collect();

    SheetLayout {
        rows,
        stats: SongStats {
            note_count,
            duration: SongDuration::from_span(&quantized.span),
        },
    }
}

fn role_at(position: usize, total: usize) -> Option<ChordRole> {
    if position == 0 {
        Some(ChordRole::Start)
    } else if position + 1 == total {
        Some(ChordRole::End)
    } else {
        None
    }
}
