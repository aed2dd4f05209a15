//! # Note Intervals
//!
//! The input side of the engine: sounding events handed over by whatever
//! extracted them (a MIDI reader, a sequencer, a test).
//!
//! ## Key Types
//! - [`NoteId`] - Opaque, caller-chosen identity. Two notes with the same pitch
//!   and times are still distinct if their ids differ.
//! - [`NoteInterval`] - `pitch` in `[start, end)`, times in seconds.
//! - [`NoteTimeline`] - Validated notes in processing order.
//!
//! ## Processing Order
//! Notes are processed by start time. Notes starting together are processed
//! lowest pitch first (bass note first), then by id, so the order never
//! depends on how the caller happened to list them.
//!
//! ```rust
//! use fretwork::{NoteInterval, NoteTimeline};
//!
//! let timeline = NoteTimeline::new(vec![
//!     NoteInterval::new(1, 57, 0.0, 1.0)?,
//!     NoteInterval::new(2, 45, 0.0, 1.0)?,
//! ])?;
//! let pitches: Vec<u8> = timeline.iter().map(|n| n.pitch).collect();
//! assert_eq!(pitches, vec![45, 57]);
//! # Ok::<(), fretwork::FretError>(())
//! ```

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::FretError;
use crate::tuning::MAX_PITCH;

/// Stable identity of a note interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(pub u64);

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for NoteId {
    fn from(id: u64) -> Self {
        NoteId(id)
    }
}

/// One sounding pitch over a half-open time interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteInterval {
    pub id: NoteId,
    pub pitch: u8,
    pub start: f64,
    pub end: f64,
}

impl NoteInterval {
    /// Create a validated note.
    ///
    /// # Errors
    /// [`FretError::InvalidNote`] if the pitch is above 127, a time is not
    /// finite, or `end < start`.
    pub fn new(id: u64, pitch: u8, start: f64, end: f64) -> Result<Self, FretError> {
        let id = NoteId(id);
        let invalid = |message: String| FretError::InvalidNote { id, message };

        if pitch > MAX_PITCH {
            return Err(invalid(format!(
                "pitch {} is outside the MIDI range 0-{}",
                pitch, MAX_PITCH
            )));
        }
        if !start.is_finite() || !end.is_finite() {
            return Err(invalid(format!("times must be finite (start {}, end {})", start, end)));
        }
        if end < start {
            return Err(invalid(format!("ends at {} before it starts at {}", end, start)));
        }
        Ok(Self { id, pitch, start, end })
    }

    /// True if the note is sounding at `time`.
    pub fn contains(&self, time: f64) -> bool {
        self.start <= time && time < self.end
    }

    /// True if the two half-open intervals share any instant.
    pub fn overlaps(&self, other: &NoteInterval) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Processing order: start time, then pitch, then id.
pub fn timeline_order(a: &NoteInterval, b: &NoteInterval) -> Ordering {
    a.start
        .total_cmp(&b.start)
        .then(a.pitch.cmp(&b.pitch))
        .then(a.id.cmp(&b.id))
}

/// Raw note for YAML deserialization
#[derive(Deserialize, Debug)]
struct RawNote {
    id: u64,
    pitch: u16,
    start: f64,
    end: f64,
}

/// Validated notes, sorted into processing order.
#[derive(Debug, Clone, Default)]
pub struct NoteTimeline {
    notes: Vec<NoteInterval>,
}

impl NoteTimeline {
    /// Sort and validate a set of notes.
    ///
    /// # Errors
    /// [`FretError::DuplicateNote`] if two notes share an id.
    pub fn new(mut notes: Vec<NoteInterval>) -> Result<Self, FretError> {
        let mut seen = HashSet::with_capacity(notes.len());
        for note in &notes {
            if !seen.insert(note.id) {
                return Err(FretError::DuplicateNote(note.id));
            }
        }
        notes.sort_by(timeline_order);
        Ok(Self { notes })
    }

    /// Parse a YAML list of `{ id, pitch, start, end }` records.
    pub fn from_yaml(content: &str) -> Result<Self, FretError> {
        let raw: Vec<RawNote> =
            serde_yaml::from_str(content).map_err(|e| FretError::ConfigError(e.to_string()))?;

        let notes = raw
            .into_iter()
            .map(|r| {
                let pitch = u8::try_from(r.pitch).map_err(|_| FretError::InvalidNote {
                    id: NoteId(r.id),
                    message: format!("pitch {} is outside the MIDI range 0-{}", r.pitch, MAX_PITCH),
                })?;
                NoteInterval::new(r.id, pitch, r.start, r.end)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(notes)
    }

    pub fn notes(&self) -> &[NoteInterval] {
        &self.notes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NoteInterval> {
        self.notes.iter()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Time at which the last note stops sounding.
    pub fn end_time(&self) -> Option<f64> {
        self.notes.iter().map(|n| n.end).reduce(f64::max)
    }
}

impl<'a> IntoIterator for &'a NoteTimeline {
    type Item = &'a NoteInterval;
    type IntoIter = std::slice::Iter<'a, NoteInterval>;

    fn into_iter(self) -> Self::IntoIter {
        self.notes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_validation() {
        assert!(NoteInterval::new(1, 128, 0.0, 1.0).is_err());
        assert!(NoteInterval::new(1, 60, 1.0, 0.5).is_err());
        assert!(NoteInterval::new(1, 60, f64::NAN, 1.0).is_err());
        // Zero-length notes are allowed
        assert!(NoteInterval::new(1, 60, 1.0, 1.0).is_ok());
    }

    #[test]
    fn test_half_open_intervals() {
        let a = NoteInterval::new(1, 60, 0.0, 1.0).unwrap();
        let b = NoteInterval::new(2, 62, 1.0, 2.0).unwrap();
        assert!(a.contains(0.0));
        assert!(!a.contains(1.0));
        assert!(!a.overlaps(&b));
        let c = NoteInterval::new(3, 64, 0.5, 1.5).unwrap();
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&b));
    }

    #[test]
    fn test_timeline_sorting_and_duplicates() {
        let timeline = NoteTimeline::new(vec![
            NoteInterval::new(3, 50, 1.0, 2.0).unwrap(),
            NoteInterval::new(2, 64, 0.0, 1.0).unwrap(),
            NoteInterval::new(1, 64, 0.0, 1.0).unwrap(),
            NoteInterval::new(4, 40, 0.0, 1.0).unwrap(),
        ])
        .unwrap();
        let ids: Vec<u64> = timeline.iter().map(|n| n.id.0).collect();
        assert_eq!(ids, vec![4, 1, 2, 3]);
        assert_eq!(timeline.end_time(), Some(2.0));

        let dup = NoteTimeline::new(vec![
            NoteInterval::new(1, 50, 0.0, 1.0).unwrap(),
            NoteInterval::new(1, 52, 1.0, 2.0).unwrap(),
        ]);
        assert!(matches!(dup, Err(FretError::DuplicateNote(NoteId(1)))));
    }

    #[test]
    fn test_timeline_from_yaml() {
        let yaml = r#"
- { id: 1, pitch: 45, start: 0.0, end: 1.0 }
- { id: 2, pitch: 40, start: 0.0, end: 0.5 }
"#;
        let timeline = NoteTimeline::from_yaml(yaml).unwrap();
        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline.notes()[0].pitch, 40);

        let bad = "- { id: 1, pitch: 300, start: 0.0, end: 1.0 }";
        assert!(matches!(
            NoteTimeline::from_yaml(bad),
            Err(FretError::InvalidNote { .. })
        ));
    }
}
