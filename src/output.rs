//! Resolution output types
//!
//! This module defines what the engine hands to a renderer: a fretboard
//! position per note, plus the reason for every note that got none.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::note::NoteId;

/// A resolved `(string, fret)` pair.
///
/// For the note it was resolved for, `open_pitch[string] + fret == pitch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FretPosition {
    pub string: usize,
    pub fret: u8,
}

/// What happened to one note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "outcome")]
pub enum Outcome {
    /// Placed on the fretboard
    Fretted(FretPosition),
    /// No string can ever produce the pitch
    Unplayable,
    /// Every string that could produce the pitch was busy
    Conflict,
}

impl Outcome {
    pub fn position(&self) -> Option<FretPosition> {
        match self {
            Outcome::Fretted(pos) => Some(*pos),
            Outcome::Unplayable | Outcome::Conflict => None,
        }
    }
}

/// A currently sounding note and where it is being played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivePosition {
    pub note_id: NoteId,
    pub string_index: usize,
    pub fret: u8,
}

/// Outcome of every processed note, keyed by note id.
///
/// Grows monotonically: an outcome is never replaced once recorded.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    outcomes: BTreeMap<NoteId, Outcome>,
}

impl Resolution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `outcome` for `note`. The first outcome for a note wins.
    pub fn record(&mut self, note: NoteId, outcome: Outcome) {
        self.outcomes.entry(note).or_insert(outcome);
    }

    /// Position of `note`; `None` if it was dropped or never processed.
    pub fn position_for(&self, note: NoteId) -> Option<FretPosition> {
        self.outcomes.get(&note).and_then(Outcome::position)
    }

    pub fn outcome(&self, note: NoteId) -> Option<Outcome> {
        self.outcomes.get(&note).copied()
    }

    /// Only the notes that were placed.
    pub fn positions(&self) -> BTreeMap<NoteId, FretPosition> {
        self.outcomes
            .iter()
            .filter_map(|(id, outcome)| outcome.position().map(|pos| (*id, pos)))
            .collect()
    }

    /// Notes that were processed but not placed.
    pub fn dropped(&self) -> impl Iterator<Item = (NoteId, Outcome)> + '_ {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| outcome.position().is_none())
            .map(|(id, outcome)| (*id, *outcome))
    }

    pub fn iter(&self) -> impl Iterator<Item = (NoteId, Outcome)> + '_ {
        self.outcomes.iter().map(|(id, outcome)| (*id, *outcome))
    }

    /// Number of processed notes, placed or not.
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn fretted_count(&self) -> usize {
        self.outcomes
            .values()
            .filter(|o| matches!(o, Outcome::Fretted(_)))
            .count()
    }
}
