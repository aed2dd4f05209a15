//! String occupancy tracking.
//!
//! Every string is either idle or held by exactly one sounding note. The
//! resolvers are the only writers; everything else reads.

use crate::note::{NoteId, NoteInterval};

/// State of a single string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StringState {
    Idle,
    Occupied {
        note: NoteId,
        fret: u8,
        start: f64,
        end: f64,
    },
}

/// Per-string occupancy plus the last fret each string was stopped at.
#[derive(Debug, Clone)]
pub struct StringOccupancy {
    states: Vec<StringState>,
    last_frets: Vec<Option<u8>>,
}

impl StringOccupancy {
    pub fn new(string_count: usize) -> Self {
        Self {
            states: vec![StringState::Idle; string_count],
            last_frets: vec![None; string_count],
        }
    }

    pub fn string_count(&self) -> usize {
        self.states.len()
    }

    pub fn state(&self, string: usize) -> StringState {
        self.states[string]
    }

    /// True if nothing held on the string is still sounding at or after `at`.
    ///
    /// A note placed ahead of its onset (a later member of a chord group)
    /// already counts as holding the string.
    pub fn is_free(&self, string: usize, at: f64) -> bool {
        match self.states[string] {
            StringState::Idle => true,
            StringState::Occupied { end, .. } => at >= end,
        }
    }

    /// Hold `string` for `note` at `fret`.
    ///
    /// Panics if the string is still sounding another note at `note.start`;
    /// callers check [`is_free`](Self::is_free) first.
    pub fn occupy(&mut self, string: usize, note: &NoteInterval, fret: u8) {
        assert!(
            self.is_free(string, note.start),
            "string {} is already occupied at {} (by {:?})",
            string,
            note.start,
            self.states[string]
        );
        self.states[string] = StringState::Occupied {
            note: note.id,
            fret,
            start: note.start,
            end: note.end,
        };
        self.last_frets[string] = Some(fret);
    }

    /// Mark `string` idle. Releasing an idle string is a no-op.
    pub fn release(&mut self, string: usize) {
        self.states[string] = StringState::Idle;
    }

    /// Release every string whose note ended at or before `at`.
    pub fn release_expired(&mut self, at: f64) -> Vec<NoteId> {
        let mut released = Vec::new();
        for state in &mut self.states {
            if let StringState::Occupied { note, end, .. } = *state {
                if end <= at {
                    released.push(note);
                    *state = StringState::Idle;
                }
            }
        }
        released
    }

    /// Fret the string was last stopped at; `None` if it has never been used.
    pub fn last_fret(&self, string: usize) -> Option<u8> {
        self.last_frets[string]
    }

    /// `(note, string, fret)` for every string sounding at `at`, by string index.
    pub fn active_at(&self, at: f64) -> Vec<(NoteId, usize, u8)> {
        self.states
            .iter()
            .enumerate()
            .filter_map(|(string, state)| match *state {
                StringState::Occupied {
                    note,
                    fret,
                    start,
                    end,
                } if start <= at && at < end => Some((note, string, fret)),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(id: u64, start: f64, end: f64) -> NoteInterval {
        NoteInterval::new(id, 50, start, end).unwrap()
    }

    #[test]
    fn test_occupy_and_release() {
        let mut occ = StringOccupancy::new(2);
        assert!(occ.is_free(0, 0.0));
        assert_eq!(occ.last_fret(0), None);

        occ.occupy(0, &note(1, 1.0, 2.0), 3);
        assert!(!occ.is_free(0, 1.0));
        assert!(!occ.is_free(0, 1.5));
        assert!(!occ.is_free(0, 0.5)); // held ahead of its onset
        assert!(occ.is_free(0, 2.0)); // end is exclusive
        assert_eq!(occ.last_fret(0), Some(3));

        occ.release(0);
        occ.release(0);
        assert_eq!(occ.state(0), StringState::Idle);
        // Continuity survives release
        assert_eq!(occ.last_fret(0), Some(3));
    }

    #[test]
    #[should_panic(expected = "already occupied")]
    fn test_double_occupy_panics() {
        let mut occ = StringOccupancy::new(1);
        occ.occupy(0, &note(1, 0.0, 2.0), 0);
        occ.occupy(0, &note(2, 1.0, 3.0), 1);
    }

    #[test]
    fn test_release_expired_and_active() {
        let mut occ = StringOccupancy::new(3);
        occ.occupy(0, &note(1, 0.0, 1.0), 0);
        occ.occupy(2, &note(2, 0.0, 3.0), 5);
        assert_eq!(occ.active_at(0.5), vec![(NoteId(1), 0, 0), (NoteId(2), 2, 5)]);

        let released = occ.release_expired(1.0);
        assert_eq!(released, vec![NoteId(1)]);
        assert_eq!(occ.active_at(1.0), vec![(NoteId(2), 2, 5)]);
        assert!(occ.release_expired(2.0).is_empty());
    }
}
