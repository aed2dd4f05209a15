//! # Error Types
//!
//! This module defines all error types for the fretting engine.
//!
//! Errors only occur while *building* things: tunings, note timelines, chord
//! dictionaries and configuration. Resolving a note never fails; a note that
//! cannot be placed shows up as an [`Outcome`](crate::Outcome) without a
//! position instead.
//!
//! ## Error Types
//! - `InvalidTuning` - Zero strings, or a fret range that overflows MIDI pitch space
//! - `InvalidNote` - Pitch outside 0-127, non-finite times, or `end < start`
//! - `DuplicateNote` - Two notes in one timeline share an id
//! - `UnknownTuning` - A preset name that the crate does not know
//! - `InvalidChordShape` - A chord dictionary entry that was rejected at load
//! - `ConfigError` - Invalid YAML configuration
//! - `Io` - Reading a configuration or note file failed
//!
//! ## Usage
//! ```rust
//! use fretwork::{FretError, Tuning};
//!
//! match Tuning::new(vec![], 22) {
//!     Ok(_) => unreachable!(),
//!     Err(FretError::InvalidTuning(message)) => eprintln!("bad tuning: {}", message),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::path::PathBuf;

use thiserror::Error;

use crate::note::NoteId;

#[derive(Error, Debug)]
pub enum FretError {
    /// The tuning cannot describe a playable instrument.
    ///
    /// # Example
    /// ```
    /// # use fretwork::FretError;
    /// let err = FretError::InvalidTuning("a tuning needs at least one string".to_string());
    /// assert_eq!(err.to_string(), "Invalid tuning: a tuning needs at least one string");
    /// ```
    #[error("Invalid tuning: {0}")]
    InvalidTuning(String),

    /// A note interval failed validation.
    ///
    /// # Example
    /// ```
    /// # use fretwork::{FretError, NoteId};
    /// let err = FretError::InvalidNote {
    ///     id: NoteId(7),
    ///     message: "pitch 130 is outside the MIDI range 0-127".to_string(),
    /// };
    /// assert_eq!(err.to_string(), "Invalid note 7: pitch 130 is outside the MIDI range 0-127");
    /// ```
    #[error("Invalid note {id}: {message}")]
    InvalidNote { id: NoteId, message: String },

    /// Two notes share the same identity.
    #[error("Duplicate note id {0}")]
    DuplicateNote(NoteId),

    /// A tuning preset name was not recognized.
    ///
    /// # Example
    /// ```
    /// # use fretwork::FretError;
    /// let err = FretError::UnknownTuning("lute".to_string());
    /// assert_eq!(err.to_string(), "Unknown tuning preset: lute");
    /// ```
    #[error("Unknown tuning preset: {0}")]
    UnknownTuning(String),

    /// A chord dictionary entry is malformed.
    ///
    /// `index` is the zero-based position of the entry in the loaded list.
    ///
    /// # Example
    /// ```
    /// # use fretwork::FretError;
    /// let err = FretError::InvalidChordShape {
    ///     index: 2,
    ///     message: "pattern has 5 strings, tuning has 6".to_string(),
    /// };
    /// assert_eq!(err.to_string(), "Invalid chord shape #2: pattern has 5 strings, tuning has 6");
    /// ```
    #[error("Invalid chord shape #{index}: {message}")]
    InvalidChordShape { index: usize, message: String },

    /// Invalid configuration document.
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
