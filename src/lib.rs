//! # Fretwork
//!
//! Decides which string and fret plays each note of a timeline on a fretted
//! instrument (guitar, bass, violin family, ukulele, banjo).
//!
//! ## Pipeline
//! ```text
//! Tuning ──┐
//!          ├─> Fretter (greedy, or chord-aware over a ChordDictionary) ─> Resolution
//! Notes ───┘                                                           └─> FretCursor (per frame)
//! ```
//!
//! ## Modules
//! - `tuning` - Strings, open pitches, fret range, presets, capo
//! - `note` - Note intervals and the ordered timeline
//! - `occupancy` - Which string is sounding which note
//! - `resolver` - Greedy and chord-aware fretting strategies
//! - `chord` - Tuning-scoped chord shape dictionary
//! - `output` - Positions and outcomes
//! - `cursor` - Incremental, clock-driven resolution
//! - `config` - YAML instrument configuration
//!
//! ## Example
//! ```rust
//! use fretwork::{resolve, NoteId, NoteInterval, Tuning};
//!
//! let notes = vec![
//!     NoteInterval::new(1, 45, 0.0, 1.0)?,
//!     NoteInterval::new(2, 57, 0.0, 1.0)?,
//! ];
//! let resolution = resolve(Tuning::preset("standard")?, notes)?;
//!
//! let bass = resolution.position_for(NoteId(1)).unwrap();
//! assert_eq!((bass.string, bass.fret), (1, 0));
//! let top = resolution.position_for(NoteId(2)).unwrap();
//! assert_eq!((top.string, top.fret), (3, 2));
//! # Ok::<(), fretwork::FretError>(())
//! ```

pub mod chord;
pub mod config;
pub mod cursor;
pub mod error;
pub mod note;
pub mod occupancy;
pub mod output;
pub mod resolver;
pub mod tuning;

pub use chord::{ChordDictionary, ChordShape};
pub use config::FretConfig;
pub use cursor::FretCursor;
pub use error::FretError;
pub use note::{NoteId, NoteInterval, NoteTimeline};
pub use occupancy::{StringOccupancy, StringState};
pub use output::{ActivePosition, FretPosition, Outcome, Resolution};
pub use resolver::{ChordAwareResolver, ChordTolerance, Fretter, GreedyResolver};
pub use tuning::Tuning;

/// Resolve notes on `tuning` with the greedy resolver.
///
/// # Errors
/// Returns [`FretError::DuplicateNote`] if two notes share an id.
pub fn resolve(tuning: Tuning, notes: Vec<NoteInterval>) -> Result<Resolution, FretError> {
    let timeline = NoteTimeline::new(notes)?;
    Ok(GreedyResolver::new(tuning).resolve_all(&timeline))
}

/// Resolve notes with the resolver described by `config`.
pub fn resolve_with_config(config: &FretConfig, notes: Vec<NoteInterval>) -> Result<Resolution, FretError> {
    let timeline = NoteTimeline::new(notes)?;
    Ok(config.build_resolver().resolve_all(&timeline))
}
