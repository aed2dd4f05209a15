//! # Resolver Module
//!
//! Decide which string and fret plays each note.
//!
//! ## Variants
//! - [`GreedyResolver`] - One note at a time: the free string whose fret is
//!   closest to where that string was last stopped.
//! - [`ChordAwareResolver`] - Wraps the greedy resolver. Notes struck together
//!   are looked up as a whole in a [`ChordDictionary`](crate::ChordDictionary);
//!   on an exact match the dictionary's hand shape is used, otherwise each note
//!   goes through the greedy resolver.
//!
//! Both implement [`Fretter`], the one interface the batch pass
//! ([`Fretter::resolve_all`]) and the incremental [`FretCursor`](crate::FretCursor)
//! drive. The only thing a variant decides is how many notes it wants to see
//! at once ([`Fretter::next_group_len`]) and how to place them
//! ([`Fretter::resolve_group`]); the walk over the timeline is shared, so both
//! modes give the same answer for the same input.
//!
//! ## Example
//! ```rust
//! use fretwork::{Fretter, GreedyResolver, NoteId, NoteInterval, NoteTimeline, Tuning};
//!
//! let mut resolver = GreedyResolver::new(Tuning::preset("standard")?);
//! let timeline = NoteTimeline::new(vec![NoteInterval::new(1, 52, 0.0, 1.0)?])?;
//! let resolution = resolver.resolve_all(&timeline);
//!
//! let pos = resolution.position_for(NoteId(1)).unwrap();
//! assert_eq!((pos.string, pos.fret), (2, 2));
//! # Ok::<(), fretwork::FretError>(())
//! ```
//!
//! ## Dropped Notes
//! Resolution never fails. A note nothing can play is [`Outcome::Unplayable`];
//! a note whose strings are all busy is [`Outcome::Conflict`] and is dropped
//! rather than taking a string from a note that is still sounding.

mod chord_aware;
mod greedy;

#[cfg(test)]
mod tests;

use tracing::info;

use crate::note::{NoteId, NoteInterval, NoteTimeline};
use crate::occupancy::StringOccupancy;
use crate::output::{Outcome, Resolution};
use crate::tuning::Tuning;

pub use chord_aware::{ChordAwareResolver, ChordTolerance};
pub use greedy::GreedyResolver;

/// A fretting strategy.
///
/// Implementations own their occupancy state and are driven in timeline
/// order; they are not meant to be shared between threads while resolving.
pub trait Fretter {
    fn tuning(&self) -> &Tuning;

    fn occupancy(&self) -> &StringOccupancy;

    /// How many leading notes of `pending` (in timeline order) form the next
    /// unit of work. Must be at least 1 when `pending` is non-empty.
    fn next_group_len(&self, pending: &[NoteInterval]) -> usize;

    /// Place `group`, returning one outcome per note in the same order.
    fn resolve_group(&mut self, group: &[NoteInterval]) -> Vec<(NoteId, Outcome)>;

    /// Free every string whose note has ended by `at`.
    fn release_expired(&mut self, at: f64) -> Vec<NoteId>;

    /// Resolve a whole timeline in one pass.
    fn resolve_all(&mut self, timeline: &NoteTimeline) -> Resolution {
        let mut resolution = Resolution::new();
        let notes = timeline.notes();
        let mut next = 0;

        while next < notes.len() {
            let len = self.next_group_len(&notes[next..]).clamp(1, notes.len() - next);
            for (id, outcome) in self.resolve_group(&notes[next..next + len]) {
                resolution.record(id, outcome);
            }
            next += len;
        }
        if let Some(end) = timeline.end_time() {
            self.release_expired(end);
        }

        info!(
            notes = notes.len(),
            fretted = resolution.fretted_count(),
            dropped = resolution.len() - resolution.fretted_count(),
            "resolved timeline"
        );
        resolution
    }
}

impl<F: Fretter + ?Sized> Fretter for Box<F> {
    fn tuning(&self) -> &Tuning {
        (**self).tuning()
    }

    fn occupancy(&self) -> &StringOccupancy {
        (**self).occupancy()
    }

    fn next_group_len(&self, pending: &[NoteInterval]) -> usize {
        (**self).next_group_len(pending)
    }

    fn resolve_group(&mut self, group: &[NoteInterval]) -> Vec<(NoteId, Outcome)> {
        (**self).resolve_group(group)
    }

    fn release_expired(&mut self, at: f64) -> Vec<NoteId> {
        (**self).release_expired(at)
    }
}
