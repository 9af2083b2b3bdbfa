//! Track, track type, and song section types.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::note::{Note, PitchBendEvent};

/// MIDI channel reserved for percussion (channel 10 in 1-based numbering).
pub const PERCUSSION_CHANNEL: u8 = 9;

/// Beats per bar. Only 4/4 is generated.
pub const BEATS_PER_BAR: u32 = 4;

/// Role of a track in the arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackType {
    Melody,
    Chords,
    Bass,
    Drums,
    Arp,
    Pad,
    Lead,
    Countermelody,
}

impl TrackType {
    /// All track types, in declaration order.
    pub const ALL: [TrackType; 8] = [
        TrackType::Melody,
        TrackType::Chords,
        TrackType::Bass,
        TrackType::Drums,
        TrackType::Arp,
        TrackType::Pad,
        TrackType::Lead,
        TrackType::Countermelody,
    ];

    /// Order in which consolidated tracks are listed.
    pub const PRIORITY: [TrackType; 8] = [
        TrackType::Melody,
        TrackType::Lead,
        TrackType::Countermelody,
        TrackType::Chords,
        TrackType::Pad,
        TrackType::Arp,
        TrackType::Bass,
        TrackType::Drums,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TrackType::Melody => "melody",
            TrackType::Chords => "chords",
            TrackType::Bass => "bass",
            TrackType::Drums => "drums",
            TrackType::Arp => "arp",
            TrackType::Pad => "pad",
            TrackType::Lead => "lead",
            TrackType::Countermelody => "countermelody",
        }
    }

    /// Human-readable name used for track titles.
    pub fn display_name(&self) -> &'static str {
        match self {
            TrackType::Melody => "Melody",
            TrackType::Chords => "Chords",
            TrackType::Bass => "Bass",
            TrackType::Drums => "Drums",
            TrackType::Arp => "Arp",
            TrackType::Pad => "Pad",
            TrackType::Lead => "Lead",
            TrackType::Countermelody => "Countermelody",
        }
    }

    pub fn is_percussion(&self) -> bool {
        matches!(self, TrackType::Drums)
    }

    /// Position in [`TrackType::PRIORITY`].
    pub fn priority(&self) -> usize {
        TrackType::PRIORITY
            .iter()
            .position(|t| t == self)
            .unwrap_or(TrackType::PRIORITY.len())
    }

    /// Default mixer volume (0.0-1.0).
    pub fn default_volume(&self) -> f32 {
        match self {
            TrackType::Melody | TrackType::Lead => 0.8,
            TrackType::Countermelody => 0.65,
            TrackType::Chords => 0.7,
            TrackType::Pad => 0.55,
            TrackType::Arp => 0.6,
            TrackType::Bass => 0.85,
            TrackType::Drums => 0.9,
        }
    }

    /// Default stereo position (-1.0 left to 1.0 right).
    pub fn default_pan(&self) -> f32 {
        match self {
            TrackType::Melody | TrackType::Bass | TrackType::Drums => 0.0,
            TrackType::Lead => 0.15,
            TrackType::Countermelody => -0.3,
            TrackType::Chords => -0.1,
            TrackType::Pad => -0.2,
            TrackType::Arp => 0.3,
        }
    }
}

impl std::fmt::Display for TrackType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrackType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "melody" => Ok(TrackType::Melody),
            "chords" | "chord" | "harmony" => Ok(TrackType::Chords),
            "bass" | "bassline" => Ok(TrackType::Bass),
            "drums" | "drum" | "percussion" | "beat" => Ok(TrackType::Drums),
            "arp" | "arpeggio" | "arpeggiator" => Ok(TrackType::Arp),
            "pad" | "pads" => Ok(TrackType::Pad),
            "lead" => Ok(TrackType::Lead),
            "countermelody" | "counter_melody" | "counter" => Ok(TrackType::Countermelody),
            other => Err(ParseError::UnknownTrackType(other.to_string())),
        }
    }
}

/// A named span of the song structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Section {
    pub name: String,
    /// Length in 4/4 bars (> 0).
    pub bars: u32,
}

impl Section {
    pub fn new(name: impl Into<String>, bars: u32) -> Self {
        Self {
            name: name.into(),
            bars: bars.max(1),
        }
    }

    /// Length in beats.
    pub fn beats(&self) -> u32 {
        self.bars * BEATS_PER_BAR
    }
}

/// Total beats of a structure (sum of bars x 4).
pub fn total_beats(structure: &[Section]) -> u32 {
    structure.iter().map(Section::beats).sum()
}

/// A consolidated output track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Stable identifier (e.g., "melody-0").
    pub id: String,
    /// Display name (e.g., "Melody 2").
    pub name: String,
    #[serde(rename = "type")]
    pub track_type: TrackType,
    /// MIDI channel (0-15).
    pub channel: u8,
    /// General MIDI program (0-127).
    pub program: u8,
    pub volume: f32,
    pub pan: f32,
    #[serde(default)]
    pub muted: bool,
    #[serde(default)]
    pub solo: bool,
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(default)]
    pub pitch_bends: Vec<PitchBendEvent>,
}

impl Track {
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty() && self.pitch_bends.is_empty()
    }

    /// End of the last sounding note, in beats.
    pub fn end_beat(&self) -> f64 {
        self.notes.iter().map(Note::end).fold(0.0, f64::max)
    }
}
