//! Greedy note-by-note fretting
//!
//! Single pass, no backtracking: a note's position is final the moment it is
//! chosen.

use tracing::debug;

use super::Fretter;
use crate::note::{NoteId, NoteInterval};
use crate::occupancy::StringOccupancy;
use crate::output::{FretPosition, Outcome};
use crate::tuning::Tuning;

/// Ordering key for a candidate string; the smallest wins.
///
/// 1. Distance from the fret the string was last stopped at (open string if unused)
/// 2. Staying on the string of the previous note
/// 3. Lowest string index
type Cost = (u8, bool, usize);

/// Places each note on the cheapest free string that can reach it.
#[derive(Debug, Clone)]
pub struct GreedyResolver {
    tuning: Tuning,
    occupancy: StringOccupancy,
    previous_string: Option<usize>,
}

impl GreedyResolver {
    pub fn new(tuning: Tuning) -> Self {
        let occupancy = StringOccupancy::new(tuning.string_count());
        Self {
            tuning,
            occupancy,
            previous_string: None,
        }
    }

    /// Resolve one note. Notes must arrive in timeline order.
    pub fn resolve_next(&mut self, note: &NoteInterval) -> Outcome {
        self.resolve_from(note, note.start)
    }

    /// Resolve `note` on a string that is free from `at`, which is no later
    /// than the note's onset.
    pub(crate) fn resolve_from(&mut self, note: &NoteInterval, at: f64) -> Outcome {
        self.occupancy.release_expired(at);

        match self.best_candidate(note, at) {
            Some(pos) => {
                self.place(note, pos);
                Outcome::Fretted(pos)
            }
            None if self.tuning.can_play(note.pitch) => {
                debug!(note = %note.id, pitch = note.pitch, start = note.start, "dropped note: every reachable string is busy");
                Outcome::Conflict
            }
            None => {
                debug!(note = %note.id, pitch = note.pitch, "dropped note: out of range");
                Outcome::Unplayable
            }
        }
    }

    /// Cheapest string for `note` that is free from `at`, if any.
    fn best_candidate(&self, note: &NoteInterval, at: f64) -> Option<FretPosition> {
        (0..self.tuning.string_count())
            .filter(|&string| self.occupancy.is_free(string, at))
            .filter_map(|string| {
                self.tuning
                    .fret_for(string, note.pitch)
                    .map(|fret| FretPosition { string, fret })
            })
            .min_by_key(|pos| self.cost(pos))
    }

    fn cost(&self, pos: &FretPosition) -> Cost {
        let rest = self.occupancy.last_fret(pos.string).unwrap_or(0);
        (
            pos.fret.abs_diff(rest),
            self.previous_string != Some(pos.string),
            pos.string,
        )
    }

    /// Occupy the string for `note` and remember it for continuity.
    pub(crate) fn place(&mut self, note: &NoteInterval, pos: FretPosition) {
        self.occupancy.occupy(pos.string, note, pos.fret);
        self.previous_string = Some(pos.string);
        debug!(note = %note.id, pitch = note.pitch, string = pos.string, fret = pos.fret, "fretted note");
    }

    pub(crate) fn occupancy_mut(&mut self) -> &mut StringOccupancy {
        &mut self.occupancy
    }
}

impl Fretter for GreedyResolver {
    fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    fn occupancy(&self) -> &StringOccupancy {
        &self.occupancy
    }

    fn next_group_len(&self, pending: &[NoteInterval]) -> usize {
        pending.len().min(1)
    }

    fn resolve_group(&mut self, group: &[NoteInterval]) -> Vec<(NoteId, Outcome)> {
        group
            .iter()
            .map(|note| (note.id, self.resolve_next(note)))
            .collect()
    }

    fn release_expired(&mut self, at: f64) -> Vec<NoteId> {
        self.occupancy.release_expired(at)
    }
}
