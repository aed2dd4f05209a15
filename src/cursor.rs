//! # Incremental Resolution
//!
//! [`FretCursor`] resolves a timeline as an external clock moves forward, for
//! callers that poll "what is being played right now" once per frame.
//!
//! The cursor drives the same [`Fretter`] calls as [`Fretter::resolve_all`], in
//! the same order, so every note ends up exactly where the batch pass would
//! put it. A note (or chord group) is resolved as soon as the clock reaches
//! its first onset; strings are released once the clock passes their note's
//! end.
//!
//! ```rust
//! use fretwork::{FretCursor, GreedyResolver, NoteInterval, NoteTimeline, Tuning};
//!
//! let timeline = NoteTimeline::new(vec![
//!     NoteInterval::new(1, 45, 0.0, 1.0)?,
//!     NoteInterval::new(2, 57, 0.5, 1.5)?,
//! ])?;
//! let mut cursor = FretCursor::new(GreedyResolver::new(Tuning::preset("standard")?), timeline);
//!
//! cursor.advance(0.25);
//! assert_eq!(cursor.active_positions().len(), 1);
//! cursor.advance(0.75);
//! assert_eq!(cursor.active_positions().len(), 2);
//! cursor.advance(1.0);
//! assert_eq!(cursor.active_positions().len(), 1);
//! # Ok::<(), fretwork::FretError>(())
//! ```

use tracing::debug;

use crate::note::{NoteId, NoteInterval, NoteTimeline};
use crate::output::{ActivePosition, FretPosition, Outcome, Resolution};
use crate::resolver::Fretter;

/// A fretter plus a read position in its timeline.
pub struct FretCursor<F: Fretter> {
    fretter: F,
    notes: Vec<NoteInterval>,
    next: usize,
    now: Option<f64>,
    resolution: Resolution,
}

impl<F: Fretter> FretCursor<F> {
    pub fn new(fretter: F, timeline: NoteTimeline) -> Self {
        Self {
            fretter,
            notes: timeline.notes().to_vec(),
            next: 0,
            now: None,
            resolution: Resolution::new(),
        }
    }

    /// Move the clock to `time`, resolving every note that has started and
    /// releasing every string whose note has ended.
    ///
    /// Returns the outcomes decided during this call. Moving backwards is
    /// ignored: assignments are never revisited.
    pub fn advance(&mut self, time: f64) -> Vec<(NoteId, Outcome)> {
        if let Some(now) = self.now {
            if time < now {
                debug!(now, requested = time, "ignoring backwards advance");
                return Vec::new();
            }
        }

        let mut decided = Vec::new();
        while self.next < self.notes.len() && self.notes[self.next].start <= time {
            let pending = &self.notes[self.next..];
            let len = self.fretter.next_group_len(pending).clamp(1, pending.len());
            for (id, outcome) in self.fretter.resolve_group(&self.notes[self.next..self.next + len]) {
                self.resolution.record(id, outcome);
                decided.push((id, outcome));
            }
            self.next += len;
        }
        self.fretter.release_expired(time);
        self.now = Some(time);
        decided
    }

    /// Position of `note` if it has been resolved and placed.
    pub fn position_for(&self, note: NoteId) -> Option<FretPosition> {
        self.resolution.position_for(note)
    }

    /// Notes sounding at the current time, by string.
    pub fn active_positions(&self) -> Vec<ActivePosition> {
        let Some(now) = self.now else {
            return Vec::new();
        };
        self.fretter
            .occupancy()
            .active_at(now)
            .into_iter()
            .map(|(note_id, string_index, fret)| ActivePosition {
                note_id,
                string_index,
                fret,
            })
            .collect()
    }

    /// Current clock, `None` before the first [`advance`](Self::advance).
    pub fn time(&self) -> Option<f64> {
        self.now
    }

    /// True once every note has been resolved.
    pub fn is_finished(&self) -> bool {
        self.next >= self.notes.len()
    }

    pub fn resolution(&self) -> &Resolution {
        &self.resolution
    }

    pub fn fretter(&self) -> &F {
        &self.fretter
    }

    pub fn into_resolution(self) -> Resolution {
        self.resolution
    }
}
