//! # Tuning Configuration
//!
//! Static description of a fretted instrument: how many strings it has, the
//! open pitch of each string and how far up the neck a string can be stopped.
//!
//! ## Pitch Range
//! String `s` can sound every pitch in `[open_pitch(s), open_pitch(s) + max_fret]`.
//! Open pitches are kept in the order the instrument lists them and do **not**
//! have to ascend. A five-string banjo starts with its short, high fifth string:
//!
//! ```rust
//! use fretwork::Tuning;
//!
//! let banjo = Tuning::preset("banjo")?;
//! assert_eq!(banjo.open_pitches(), &[67, 50, 55, 59, 62]);
//! assert_eq!(banjo.fret_for(1, 52), Some(2)); // E3 on the D string
//! assert_eq!(banjo.fret_for(0, 52), None);    // below the fifth string
//! # Ok::<(), fretwork::FretError>(())
//! ```
//!
//! ## Presets
//! | Name | Open pitches (MIDI) | Frets |
//! |------|---------------------|-------|
//! | `standard`, `guitar` | 40 45 50 55 59 64 | 22 |
//! | `drop-d` | 38 45 50 55 59 64 | 22 |
//! | `seven-string` | 35 40 45 50 55 59 64 | 24 |
//! | `bass` | 28 33 38 43 | 20 |
//! | `bass-5` | 23 28 33 38 43 | 24 |
//! | `ukulele` | 67 60 64 69 | 12 |
//! | `violin` | 55 62 69 76 | 12 |
//! | `viola` | 48 55 62 69 | 12 |
//! | `cello` | 36 43 50 57 | 12 |
//! | `banjo` | 67 50 55 59 62 | 22 |

use crate::error::FretError;

/// Highest valid MIDI pitch.
pub const MAX_PITCH: u8 = 127;

/// An instrument's strings and fret range.
///
/// Immutable once built; validated by [`Tuning::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tuning {
    open_pitches: Vec<u8>,
    max_fret: u8,
}

impl Tuning {
    /// Build a tuning from open pitches (one per string) and a shared fret count.
    ///
    /// # Errors
    /// [`FretError::InvalidTuning`] if there are no strings, or if a string's
    /// highest fret would leave the MIDI range.
    pub fn new(open_pitches: Vec<u8>, max_fret: u8) -> Result<Self, FretError> {
        if open_pitches.is_empty() {
            return Err(FretError::InvalidTuning(
                "a tuning needs at least one string".to_string(),
            ));
        }
        for (string, &open) in open_pitches.iter().enumerate() {
            if open as u16 + max_fret as u16 > MAX_PITCH as u16 {
                return Err(FretError::InvalidTuning(format!(
                    "string {} (open pitch {}) with {} frets exceeds MIDI pitch {}",
                    string, open, max_fret, MAX_PITCH
                )));
            }
        }
        Ok(Self {
            open_pitches,
            max_fret,
        })
    }

    /// Look up a named preset (see the module docs for the list).
    pub fn preset(name: &str) -> Result<Self, FretError> {
        let (pitches, frets): (&[u8], u8) = match name.trim().to_ascii_lowercase().as_str() {
            "standard" | "guitar" => (&[40, 45, 50, 55, 59, 64], 22),
            "drop-d" => (&[38, 45, 50, 55, 59, 64], 22),
            "seven-string" => (&[35, 40, 45, 50, 55, 59, 64], 24),
            "bass" => (&[28, 33, 38, 43], 20),
            "bass-5" => (&[23, 28, 33, 38, 43], 24),
            "ukulele" => (&[67, 60, 64, 69], 12),
            "violin" => (&[55, 62, 69, 76], 12),
            "viola" => (&[48, 55, 62, 69], 12),
            "cello" => (&[36, 43, 50, 57], 12),
            "banjo" => (&[67, 50, 55, 59, 62], 22),
            _ => return Err(FretError::UnknownTuning(name.to_string())),
        };
        Self::new(pitches.to_vec(), frets)
    }

    /// Clamp a capo at `fret`: every string sounds `fret` semitones higher and
    /// loses that many frets of range. Positions resolved against the result
    /// count frets from the capo.
    pub fn with_capo(&self, fret: u8) -> Result<Self, FretError> {
        if fret > self.max_fret {
            return Err(FretError::InvalidTuning(format!(
                "capo at fret {} is beyond the last fret ({})",
                fret, self.max_fret
            )));
        }
        Self::new(
            self.open_pitches.iter().map(|&p| p + fret).collect(),
            self.max_fret - fret,
        )
    }

    pub fn string_count(&self) -> usize {
        self.open_pitches.len()
    }

    pub fn max_fret(&self) -> u8 {
        self.max_fret
    }

    /// Open pitch of `string`. Panics if the index is out of range.
    pub fn open_pitch(&self, string: usize) -> u8 {
        self.open_pitches[string]
    }

    pub fn open_pitches(&self) -> &[u8] {
        &self.open_pitches
    }

    /// Fret that produces `pitch` on `string`, ignoring whether the string is busy.
    pub fn fret_for(&self, string: usize, pitch: u8) -> Option<u8> {
        let open = *self.open_pitches.get(string)?;
        let fret = pitch.checked_sub(open)?;
        (fret <= self.max_fret).then_some(fret)
    }

    /// Pitch sounded by stopping `string` at `fret`, if the fret exists.
    pub fn pitch_at(&self, string: usize, fret: u8) -> Option<u8> {
        let open = *self.open_pitches.get(string)?;
        (fret <= self.max_fret).then(|| open + fret)
    }

    /// True if at least one string can produce `pitch`.
    pub fn can_play(&self, pitch: u8) -> bool {
        (0..self.string_count()).any(|s| self.fret_for(s, pitch).is_some())
    }
}
