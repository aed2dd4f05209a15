//! Chord-shape fretting on top of the greedy resolver.

use std::sync::Arc;

use tracing::debug;

use super::greedy::GreedyResolver;
use super::Fretter;
use crate::chord::{ChordDictionary, ChordShape};
use crate::note::{NoteId, NoteInterval};
use crate::occupancy::StringOccupancy;
use crate::output::{FretPosition, Outcome};
use crate::tuning::Tuning;

/// How far apart two onsets may be and still count as struck together.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChordTolerance {
    /// Fixed window in seconds
    Seconds(f64),
    /// A fraction of a beat at a fixed tempo
    Beats { beats: f64, bpm: f64 },
}

impl ChordTolerance {
    pub fn seconds(&self) -> f64 {
        match *self {
            ChordTolerance::Seconds(s) => s.max(0.0),
            ChordTolerance::Beats { beats, bpm } if bpm > 0.0 => (beats * 60.0 / bpm).max(0.0),
            ChordTolerance::Beats { .. } => 0.0,
        }
    }
}

impl Default for ChordTolerance {
    fn default() -> Self {
        ChordTolerance::Seconds(0.03)
    }
}

/// Greedy resolver that plays dictionary shapes for recognized chords.
#[derive(Debug, Clone)]
pub struct ChordAwareResolver {
    greedy: GreedyResolver,
    dictionary: Arc<ChordDictionary>,
    tuning_variant: String,
    tolerance: f64,
}

impl ChordAwareResolver {
    /// `tuning_variant` selects which dictionary entries apply to `tuning`.
    pub fn new(
        tuning: Tuning,
        tuning_variant: impl Into<String>,
        dictionary: Arc<ChordDictionary>,
        tolerance: ChordTolerance,
    ) -> Self {
        Self {
            greedy: GreedyResolver::new(tuning),
            dictionary,
            tuning_variant: tuning_variant.into(),
            tolerance: tolerance.seconds(),
        }
    }

    pub fn tuning_variant(&self) -> &str {
        &self.tuning_variant
    }

    /// Bind every note of `group` to a string of `shape`.
    ///
    /// `None` if a note has no matching string or a string it needs is busy
    /// at the group's onset.
    fn fit_shape(&self, shape: &ChordShape, group: &[NoteInterval]) -> Option<Vec<FretPosition>> {
        let tuning = self.greedy.tuning();
        let occupancy = self.greedy.occupancy();
        let onset = group.first()?.start;
        let mut used = vec![false; tuning.string_count()];
        let mut positions = Vec::with_capacity(group.len());

        for note in group {
            let pos = shape
                .fretted_strings()
                .find(|&(string, fret)| {
                    !used[string] && tuning.pitch_at(string, fret) == Some(note.pitch)
                })
                .map(|(string, fret)| FretPosition { string, fret })?;
            if !occupancy.is_free(pos.string, onset) {
                debug!(chord = shape.name(), string = pos.string, "chord shape blocked by a sounding note");
                return None;
            }
            used[pos.string] = true;
            positions.push(pos);
        }
        Some(positions)
    }
}

impl Fretter for ChordAwareResolver {
    fn tuning(&self) -> &Tuning {
        self.greedy.tuning()
    }

    fn occupancy(&self) -> &StringOccupancy {
        self.greedy.occupancy()
    }

    /// Notes starting within the tolerance of the first one that overlap
    /// every note already in the group.
    fn next_group_len(&self, pending: &[NoteInterval]) -> usize {
        let Some(first) = pending.first() else {
            return 0;
        };

        let mut len = 1;
        for note in &pending[1..] {
            if note.start - first.start > self.tolerance {
                break;
            }
            if !pending[..len].iter().all(|member| member.overlaps(note)) {
                break;
            }
            len += 1;
        }
        len
    }

    /// The whole group is placed at its first onset, so every string it
    /// takes must be free from then on.
    fn resolve_group(&mut self, group: &[NoteInterval]) -> Vec<(NoteId, Outcome)> {
        let Some(onset) = group.first().map(|n| n.start) else {
            return Vec::new();
        };
        self.greedy.occupancy_mut().release_expired(onset);

        let fitted = if group.len() >= 2 && group.len() <= self.greedy.tuning().string_count() {
            let pitches: Vec<u8> = group.iter().map(|n| n.pitch).collect();
            self.dictionary
                .lookup(&self.tuning_variant, &pitches)
                .and_then(|shape| {
                    let positions = self.fit_shape(shape, group)?;
                    debug!(chord = shape.name(), notes = group.len(), "applying chord shape");
                    Some(positions)
                })
        } else {
            None
        };

        match fitted {
            Some(positions) => group
                .iter()
                .zip(positions)
                .map(|(note, pos)| {
                    self.greedy.place(note, pos);
                    (note.id, Outcome::Fretted(pos))
                })
                .collect(),
            None => group
                .iter()
                .map(|note| (note.id, self.greedy.resolve_from(note, onset)))
                .collect(),
        }
    }

    fn release_expired(&mut self, at: f64) -> Vec<NoteId> {
        self.greedy.release_expired(at)
    }
}
