//! # Configuration
//!
//! Builds a ready-to-run resolver from a YAML document describing the
//! instrument.
//!
//! ## Format
//! ```yaml
//! tuning: standard          # a preset name, or an explicit tuning:
//! # tuning:
//! #   strings: [40, 45, 50, 55, 59, 64]
//! #   max-fret: 22
//! tuning-variant: standard  # chord dictionary scope (defaults to the preset name)
//! capo: 0
//! chord-tolerance:
//!   seconds: 0.03           # or  beats: 0.125  with  bpm: 120
//! open-chords: false        # include the built-in open-position shapes
//! chords:
//!   - name: E major
//!     pattern: "022100"
//! ```
//!
//! Every key is optional. With no chords the resolver is a plain
//! [`GreedyResolver`]; with chords it is a [`ChordAwareResolver`].
//!
//! ## Example
//! ```rust
//! use fretwork::FretConfig;
//!
//! let config = FretConfig::from_yaml("tuning: drop-d\ncapo: 2\n")?;
//! assert_eq!(config.tuning().open_pitches()[0], 40);
//! assert_eq!(config.tuning_variant(), "drop-d");
//! # Ok::<(), fretwork::FretError>(())
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use crate::chord::{ChordDictionary, RawChordShape};
use crate::error::FretError;
use crate::resolver::{ChordAwareResolver, ChordTolerance, Fretter, GreedyResolver};
use crate::tuning::{Tuning, MAX_PITCH};

/// Tuning as written in YAML: a preset name or explicit strings.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum RawTuning {
    Preset(String),
    #[serde(rename_all = "kebab-case")]
    Custom { strings: Vec<i64>, max_fret: i64 },
}

#[derive(Deserialize, Debug, Default)]
struct RawTolerance {
    seconds: Option<f64>,
    beats: Option<f64>,
    bpm: Option<f64>,
}

/// Raw configuration for YAML deserialization
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case")]
struct RawConfig {
    tuning: Option<RawTuning>,
    tuning_variant: Option<String>,
    capo: Option<i64>,
    chord_tolerance: Option<RawTolerance>,
    #[serde(default)]
    open_chords: bool,
    #[serde(default)]
    chords: Vec<RawChordShape>,
}

/// A validated instrument configuration.
#[derive(Debug, Clone)]
pub struct FretConfig {
    tuning: Tuning,
    tuning_variant: String,
    tolerance: ChordTolerance,
    dictionary: Arc<ChordDictionary>,
    rejected: Arc<Vec<FretError>>,
}

impl FretConfig {
    /// Parse and validate a configuration document.
    ///
    /// # Errors
    /// [`FretError::ConfigError`] for YAML or value errors,
    /// [`FretError::InvalidTuning`] / [`FretError::UnknownTuning`] for a bad
    /// tuning. Malformed chord entries are not errors; see [`rejected`](Self::rejected).
    pub fn from_yaml(content: &str) -> Result<Self, FretError> {
        let raw: RawConfig = if content.trim().is_empty() {
            RawConfig::default()
        } else {
            serde_yaml::from_str(content).map_err(|e| FretError::ConfigError(e.to_string()))?
        };
        Self::from_raw(raw)
    }

    /// Read and parse a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FretError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| FretError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, FretError> {
        let (base, preset_name) = match raw.tuning {
            None => (Tuning::preset("standard")?, Some("standard".to_string())),
            Some(RawTuning::Preset(name)) => (Tuning::preset(&name)?, Some(name.trim().to_lowercase())),
            Some(RawTuning::Custom { strings, max_fret }) => (parse_custom_tuning(&strings, max_fret)?, None),
        };

        let capo = match raw.capo {
            None => 0,
            Some(c) => u8::try_from(c)
                .map_err(|_| FretError::ConfigError(format!("capo must be a fret number, got {}", c)))?,
        };
        let tuning = if capo > 0 { base.with_capo(capo)? } else { base };

        let tuning_variant = raw
            .tuning_variant
            .or(preset_name)
            .unwrap_or_else(|| "custom".to_string());

        let tolerance = match raw.chord_tolerance {
            None => ChordTolerance::default(),
            Some(t) => parse_tolerance(t)?,
        };

        let mut tunings = HashMap::new();
        tunings.insert(tuning_variant.clone(), tuning.clone());

        let mut dictionary = ChordDictionary::new();
        let mut rejected = Vec::new();
        if raw.open_chords {
            rejected.extend(dictionary.add_open_chords(&tuning_variant, &tuning));
        }
        rejected.extend(dictionary.load(raw.chords, &tuning_variant, &tunings));

        Ok(Self {
            tuning,
            tuning_variant,
            tolerance,
            dictionary: Arc::new(dictionary),
            rejected: Arc::new(rejected),
        })
    }

    /// Effective tuning (capo applied).
    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn tuning_variant(&self) -> &str {
        &self.tuning_variant
    }

    pub fn tolerance(&self) -> ChordTolerance {
        self.tolerance
    }

    pub fn dictionary(&self) -> &Arc<ChordDictionary> {
        &self.dictionary
    }

    /// Chord entries that failed validation while loading.
    pub fn rejected(&self) -> &[FretError] {
        &self.rejected
    }

    /// A fresh resolver for one instrument instance.
    ///
    /// Each call gets its own occupancy state; the dictionary is shared.
    pub fn build_resolver(&self) -> Box<dyn Fretter> {
        if self.dictionary.is_empty() {
            Box::new(GreedyResolver::new(self.tuning.clone()))
        } else {
            Box::new(ChordAwareResolver::new(
                self.tuning.clone(),
                self.tuning_variant.clone(),
                Arc::clone(&self.dictionary),
                self.tolerance,
            ))
        }
    }
}

fn parse_custom_tuning(strings: &[i64], max_fret: i64) -> Result<Tuning, FretError> {
    let max_fret = u8::try_from(max_fret)
        .map_err(|_| FretError::InvalidTuning(format!("max-fret must be 0-255, got {}", max_fret)))?;
    let open_pitches = strings
        .iter()
        .map(|&p| {
            u8::try_from(p)
                .ok()
                .filter(|&p| p <= MAX_PITCH)
                .ok_or_else(|| FretError::InvalidTuning(format!("open pitch {} is outside 0-{}", p, MAX_PITCH)))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Tuning::new(open_pitches, max_fret)
}

fn parse_tolerance(raw: RawTolerance) -> Result<ChordTolerance, FretError> {
    let tolerance = match raw {
        RawTolerance { seconds: Some(s), beats: None, .. } => ChordTolerance::Seconds(s),
        RawTolerance { seconds: None, beats: Some(beats), bpm: Some(bpm) } => {
            if bpm <= 0.0 {
                return Err(FretError::ConfigError(format!("bpm must be positive, got {}", bpm)));
            }
            ChordTolerance::Beats { beats, bpm }
        }
        RawTolerance { seconds: None, beats: Some(_), bpm: None } => {
            return Err(FretError::ConfigError(
                "chord-tolerance in beats needs a bpm".to_string(),
            ))
        }
        _ => {
            return Err(FretError::ConfigError(
                "chord-tolerance needs either seconds or beats".to_string(),
            ))
        }
    };

    let raw_seconds = match tolerance {
        ChordTolerance::Seconds(s) => s,
        ChordTolerance::Beats { beats, bpm } => beats * 60.0 / bpm,
    };
    if !raw_seconds.is_finite() || raw_seconds < 0.0 {
        return Err(FretError::ConfigError("chord-tolerance must be a non-negative time".to_string()));
    }
    Ok(tolerance)
}
