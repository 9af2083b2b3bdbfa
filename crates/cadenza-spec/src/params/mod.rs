//! Composition parameter record and its named lookup tables.
//!
//! [`CompositionParams`] is produced once per generation call by the prompt
//! interpreter and never mutated afterwards.

mod genre;
mod scale;
mod style;

pub use genre::*;
pub use scale::*;
pub use style::*;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::track::TrackType;

/// Default key when the prompt names none.
pub const DEFAULT_KEY: &str = "C";
/// Default tempo when neither prompt nor genre supplies one.
pub const DEFAULT_BPM: f64 = 120.0;
/// Default harmonic rhythm: one chord per 4/4 bar.
pub const DEFAULT_BEATS_PER_CHORD: u32 = 4;

/// A key and/or scale change applied to every occurrence of a named section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Modulation {
    /// Section name the change applies to (lowercase).
    pub section: String,
    /// New tonic, e.g. "G".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<Scale>,
    /// Semitone shift relative to the home key, used when `key` is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift: Option<i32>,
}

/// 808-style bass glide configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GlideSettings {
    /// Chance of a glide on each syncopated beat.
    pub probability: f64,
    /// Target bend depth in semitones.
    pub depth_semitones: u8,
    /// Number of bend steps in the ramp.
    pub resolution: u16,
    /// Length of the ramp in beats.
    pub duration_beats: f64,
    /// Synth pitch-bend range in semitones (full deflection).
    pub bend_range: u8,
}

impl Default for GlideSettings {
    fn default() -> Self {
        Self {
            probability: 0.3,
            depth_semitones: 2,
            resolution: 8,
            duration_beats: 0.25,
            bend_range: 12,
        }
    }
}

/// Program assignment for a track role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgramChoice {
    /// Always this program.
    Fixed(u8),
    /// Pick one entry at random during consolidation.
    Pool(Vec<u8>),
}

/// Program choices keyed by track role.
pub type InstrumentPrograms = BTreeMap<TrackType, ProgramChoice>;

/// One entry of an explicit track configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrackRequest {
    /// Track type name; unknown names are skipped with a warning.
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program: Option<u8>,
}

impl TrackRequest {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            program: None,
        }
    }
}

/// Style features extracted from a reference MIDI file by the codec
/// collaborator. Used as a fallback below explicit prompt values.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LearnedStyle {
    pub bpm: Option<f64>,
    pub key: Option<String>,
    pub scale: Option<Scale>,
    pub swing: Option<f64>,
    pub energy: Option<Energy>,
    /// Average notes per beat of the reference melody.
    pub notes_per_beat: Option<f64>,
    pub motif: Option<Vec<u8>>,
}

/// Structured parameters for one composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionParams {
    /// Tonic pitch-class name, e.g. "F#".
    pub key: String,
    /// Tonic pitch class (0-11).
    pub key_pc: u8,
    pub scale: Scale,
    pub bpm: f64,
    /// Swing ratio (0.5 = straight).
    pub swing: f64,
    pub energy: Energy,
    pub density: Density,
    pub genre: Genre,
    pub groove: GrooveProfile,
    pub chord_extension: ChordExtension,
    pub humanize: HumanizeProfile,
    pub intent: Intent,
    /// Track roles to generate, in request order.
    pub layers: Vec<TrackType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motif: Option<Vec<u8>>,
    #[serde(default)]
    pub modulations: Vec<Modulation>,
    /// Roman-numeral progression, indexed cyclically.
    pub progression: Vec<String>,
    /// Name of the progression style the progression came from, or "custom".
    pub progression_style: String,
    pub beats_per_chord: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glide: Option<GlideSettings>,
    pub instruments: InstrumentPrograms,
}

impl CompositionParams {
    /// Modulation matching a section name, if any.
    pub fn modulation_for(&self, section_name: &str) -> Option<&Modulation> {
        self.modulations
            .iter()
            .find(|m| m.section.eq_ignore_ascii_case(section_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_learned_style_partial_json() {
        let style: LearnedStyle =
            serde_json::from_str(r#"{"bpm": 96.0, "scale": "dorian"}"#).unwrap();
        assert_eq!(style.bpm, Some(96.0));
        assert_eq!(style.scale, Some(Scale::Dorian));
        assert!(style.key.is_none());
    }

    #[test]
    fn test_program_choice_json_shape() {
        let json = serde_json::to_string(&ProgramChoice::Fixed(33)).unwrap();
        assert_eq!(json, r#"{"fixed":33}"#);
        let pool: ProgramChoice = serde_json::from_str(r#"{"pool":[0,4]}"#).unwrap();
        assert_eq!(pool, ProgramChoice::Pool(vec![0, 4]));
    }

    #[test]
    fn test_track_request_defaults() {
        let req: TrackRequest = serde_json::from_str(r#"{"kind":"melody"}"#).unwrap();
        assert_eq!(req, TrackRequest::new("melody"));
    }
}
