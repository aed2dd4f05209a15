//! # Chord Dictionary
//!
//! Named hand shapes, looked up by the exact pitches they sound.
//!
//! ## Shapes
//! A [`ChordShape`] gives one fret (or "muted") per string and belongs to one
//! tuning variant: `x32010` is C major in standard tuning but a different
//! chord in drop-D, so entries are keyed by `(tuning_variant, pitches)`.
//!
//! ## Pattern Notation
//! - Compact: one character per string, low string first: `"x32010"`
//! - Dashed, for frets above 9: `"x-10-12-12-12-10"`
//! - List: `[null, 3, 2, 0, 1, 0]` or `["x", 3, 2, 0, 1, 0]`
//!
//! ## Loading
//! Entries come from YAML. A malformed entry is rejected with a reason and
//! left out of the dictionary; the rest still load.
//!
//! ```rust
//! use std::collections::HashMap;
//! use fretwork::ChordDictionary;
//!
//! let yaml = r#"
//! - name: C major
//!   tuning-variant: standard
//!   pattern: "x32010"
//! - name: broken
//!   tuning-variant: standard
//!   pattern: "x3201"
//! "#;
//! let (dict, rejected) = ChordDictionary::from_yaml(yaml, "standard", &HashMap::new())?;
//! assert_eq!(dict.len(), 1);
//! assert_eq!(rejected.len(), 1);
//! assert!(dict.lookup("standard", &[48, 52, 55, 60, 64]).is_some());
//! # Ok::<(), fretwork::FretError>(())
//! ```

use std::collections::HashMap;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::FretError;
use crate::tuning::{Tuning, MAX_PITCH};

/// A tuning-scoped hand shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChordShape {
    name: String,
    tuning_variant: String,
    pitches: Vec<u8>,
    pattern: Vec<Option<u8>>,
}

impl ChordShape {
    /// Build a shape against `tuning`.
    ///
    /// `declared` are the pitches the entry claims to sound; when given they
    /// must equal the pitches the pattern actually produces (order ignored).
    /// The error string describes why the shape is malformed.
    pub fn new(
        name: impl Into<String>,
        tuning_variant: impl Into<String>,
        pattern: Vec<Option<u8>>,
        declared: Option<Vec<u8>>,
        tuning: &Tuning,
    ) -> Result<Self, String> {
        if pattern.len() != tuning.string_count() {
            return Err(format!(
                "pattern has {} strings, tuning has {}",
                pattern.len(),
                tuning.string_count()
            ));
        }

        let mut pitches = Vec::with_capacity(pattern.len());
        for (string, fret) in pattern.iter().enumerate() {
            if let Some(fret) = *fret {
                let pitch = tuning.pitch_at(string, fret).ok_or_else(|| {
                    format!(
                        "fret {} on string {} is beyond the last fret ({})",
                        fret,
                        string,
                        tuning.max_fret()
                    )
                })?;
                pitches.push(pitch);
            }
        }
        if pitches.is_empty() {
            return Err("every string is muted".to_string());
        }
        pitches.sort_unstable();

        if let Some(mut declared) = declared {
            declared.sort_unstable();
            if declared != pitches {
                return Err(format!(
                    "declared pitches {:?} do not match the pattern's pitches {:?}",
                    declared, pitches
                ));
            }
        }

        Ok(Self {
            name: name.into(),
            tuning_variant: tuning_variant.into(),
            pitches,
            pattern,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tuning_variant(&self) -> &str {
        &self.tuning_variant
    }

    /// Sounding pitches, ascending (duplicates kept).
    pub fn pitches(&self) -> &[u8] {
        &self.pitches
    }

    pub fn pattern(&self) -> &[Option<u8>] {
        &self.pattern
    }

    /// `(string, fret)` for every string the shape plays.
    pub fn fretted_strings(&self) -> impl Iterator<Item = (usize, u8)> + '_ {
        self.pattern
            .iter()
            .enumerate()
            .filter_map(|(string, fret)| fret.map(|f| (string, f)))
    }
}

/// Parse compact (`"x32010"`) or dashed (`"x-10-12-12-12-10"`) pattern notation.
///
/// # Examples
/// ```
/// use fretwork::chord::parse_pattern;
///
/// assert_eq!(parse_pattern("x32010"), Ok(vec![None, Some(3), Some(2), Some(0), Some(1), Some(0)]));
/// assert_eq!(parse_pattern("x-10-12"), Ok(vec![None, Some(10), Some(12)]));
/// assert!(parse_pattern("x3z").is_err());
/// ```
pub fn parse_pattern(pattern: &str) -> Result<Vec<Option<u8>>, String> {
    let pattern = pattern.trim();
    if pattern.contains('-') {
        pattern.split('-').map(|token| parse_fret(token.trim())).collect()
    } else {
        pattern
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| parse_fret(c.encode_utf8(&mut [0; 4])))
            .collect()
    }
}

fn parse_fret(token: &str) -> Result<Option<u8>, String> {
    match token {
        "x" | "X" => Ok(None),
        _ => token
            .parse::<u8>()
            .map(Some)
            .map_err(|_| format!("invalid fret '{}' in pattern", token)),
    }
}

/// One fret in a list-style pattern.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum RawFret {
    Fret(i64),
    Symbol(String),
}

#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum RawPattern {
    Compact(String),
    List(Vec<Option<RawFret>>),
}

impl RawPattern {
    fn frets(&self) -> Result<Vec<Option<u8>>, String> {
        match self {
            RawPattern::Compact(s) => parse_pattern(s),
            RawPattern::List(frets) => frets
                .iter()
                .map(|fret| match fret {
                    None => Ok(None),
                    Some(RawFret::Fret(f)) => u8::try_from(*f)
                        .map(Some)
                        .map_err(|_| format!("invalid fret {} in pattern", f)),
                    Some(RawFret::Symbol(s)) => parse_fret(s.trim()),
                })
                .collect(),
        }
    }
}

/// Raw chord entry for YAML deserialization
#[derive(Deserialize, Debug)]
#[serde(rename_all = "kebab-case")]
pub struct RawChordShape {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    tuning_variant: Option<String>,
    #[serde(default)]
    pitches: Option<Vec<i64>>,
    pattern: RawPattern,
}

impl RawChordShape {
    fn declared_pitches(&self) -> Result<Option<Vec<u8>>, String> {
        self.pitches
            .as_ref()
            .map(|pitches| {
                pitches
                    .iter()
                    .map(|&p| {
                        u8::try_from(p)
                            .ok()
                            .filter(|&p| p <= MAX_PITCH)
                            .ok_or_else(|| format!("pitch {} is outside the MIDI range 0-{}", p, MAX_PITCH))
                    })
                    .collect()
            })
            .transpose()
    }
}

/// Exact-match chord lookup, scoped by tuning variant.
///
/// Built once and shared read-only (typically behind an `Arc`).
#[derive(Debug, Clone, Default)]
pub struct ChordDictionary {
    variants: HashMap<String, HashMap<Vec<u8>, ChordShape>>,
}

impl ChordDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Common open-position shapes for standard tuning, scoped to `"standard"`.
    pub fn open_chords() -> Self {
        let mut dict = Self::new();
        if let Ok(tuning) = Tuning::preset("standard") {
            dict.add_open_chords("standard", &tuning);
        }
        dict
    }

    /// Add the open-position guitar shapes under `tuning_variant`.
    ///
    /// Shapes that do not fit `tuning` (wrong string count, or clashing with
    /// an existing entry) are skipped and returned as rejections.
    pub fn add_open_chords(&mut self, tuning_variant: &str, tuning: &Tuning) -> Vec<FretError> {
        const SHAPES: &[(&str, &str)] = &[
            ("E", "022100"),
            ("Em", "022000"),
            ("E7", "020100"),
            ("A", "x02220"),
            ("Am", "x02210"),
            ("A7", "x02020"),
            ("D", "xx0232"),
            ("Dm", "xx0231"),
            ("D7", "xx0212"),
            ("G", "320003"),
            ("G7", "320001"),
            ("C", "x32010"),
            ("C7", "x32310"),
            ("F", "133211"),
        ];

        let mut rejected = Vec::new();
        for (index, (name, pattern)) in SHAPES.iter().enumerate() {
            let result = parse_pattern(pattern)
                .and_then(|frets| ChordShape::new(*name, tuning_variant, frets, None, tuning))
                .and_then(|shape| self.insert(shape));
            if let Err(message) = result {
                debug!(name = *name, variant = tuning_variant, reason = %message, "skipped open chord");
                rejected.push(FretError::InvalidChordShape { index, message });
            }
        }
        rejected
    }

    /// Add a shape. Fails if the variant already has a shape for the same pitches.
    pub fn insert(&mut self, shape: ChordShape) -> Result<(), String> {
        let entries = self
            .variants
            .entry(shape.tuning_variant.clone())
            .or_default();
        if let Some(existing) = entries.get(&shape.pitches) {
            return Err(format!(
                "pitches {:?} are already taken by '{}' in tuning variant '{}'",
                shape.pitches, existing.name, shape.tuning_variant
            ));
        }
        entries.insert(shape.pitches.clone(), shape);
        Ok(())
    }

    /// Validate and add raw entries.
    ///
    /// `default_variant` scopes entries that name no variant. A variant's
    /// tuning comes from `tunings`, falling back to the preset of the same
    /// name. Rejected entries are logged and returned, never inserted.
    pub fn load(
        &mut self,
        entries: Vec<RawChordShape>,
        default_variant: &str,
        tunings: &HashMap<String, Tuning>,
    ) -> Vec<FretError> {
        let mut rejected = Vec::new();

        for (index, raw) in entries.into_iter().enumerate() {
            let variant = raw
                .tuning_variant
                .clone()
                .unwrap_or_else(|| default_variant.to_string());
            let name = raw.name.clone().unwrap_or_else(|| format!("#{}", index));

            let result = tunings
                .get(&variant)
                .cloned()
                .or_else(|| Tuning::preset(&variant).ok())
                .ok_or_else(|| format!("unknown tuning variant '{}'", variant))
                .and_then(|tuning| {
                    let frets = raw.pattern.frets()?;
                    let declared = raw.declared_pitches()?;
                    ChordShape::new(name.clone(), variant.clone(), frets, declared, &tuning)
                })
                .and_then(|shape| self.insert(shape));

            if let Err(message) = result {
                warn!(index, name = %name, variant = %variant, reason = %message, "rejected chord shape");
                rejected.push(FretError::InvalidChordShape { index, message });
            }
        }

        rejected
    }

    /// Parse a YAML list of chord entries into a new dictionary.
    ///
    /// # Errors
    /// [`FretError::ConfigError`] if the document is not a list of entries.
    /// Individual malformed entries are returned alongside the dictionary.
    pub fn from_yaml(
        content: &str,
        default_variant: &str,
        tunings: &HashMap<String, Tuning>,
    ) -> Result<(Self, Vec<FretError>), FretError> {
        let raw: Vec<RawChordShape> =
            serde_yaml::from_str(content).map_err(|e| FretError::ConfigError(e.to_string()))?;
        let mut dict = Self::new();
        let rejected = dict.load(raw, default_variant, tunings);
        Ok((dict, rejected))
    }

    /// Shape whose sounding pitches equal `pitches` exactly (order ignored).
    pub fn lookup(&self, tuning_variant: &str, pitches: &[u8]) -> Option<&ChordShape> {
        let entries = self.variants.get(tuning_variant)?;
        let mut key = pitches.to_vec();
        key.sort_unstable();
        entries.get(&key)
    }

    pub fn len(&self) -> usize {
        self.variants.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
