//! Scale table.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// A named scale, each mapping to a fixed set of semitone offsets from the tonic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Scale {
    #[default]
    Major,
    Minor,
    HarmonicMinor,
    MelodicMinor,
    Dorian,
    Phrygian,
    Lydian,
    Mixolydian,
    Locrian,
    MajorPentatonic,
    MinorPentatonic,
    Blues,
}

impl Scale {
    pub const ALL: [Scale; 12] = [
        Scale::Major,
        Scale::Minor,
        Scale::HarmonicMinor,
        Scale::MelodicMinor,
        Scale::Dorian,
        Scale::Phrygian,
        Scale::Lydian,
        Scale::Mixolydian,
        Scale::Locrian,
        Scale::MajorPentatonic,
        Scale::MinorPentatonic,
        Scale::Blues,
    ];

    /// Semitone offsets from the tonic, ascending, starting at 0.
    pub fn intervals(&self) -> &'static [u8] {
        match self {
            Scale::Major => &[0, 2, 4, 5, 7, 9, 11],
            Scale::Minor => &[0, 2, 3, 5, 7, 8, 10],
            Scale::HarmonicMinor => &[0, 2, 3, 5, 7, 8, 11],
            Scale::MelodicMinor => &[0, 2, 3, 5, 7, 9, 11],
            Scale::Dorian => &[0, 2, 3, 5, 7, 9, 10],
            Scale::Phrygian => &[0, 1, 3, 5, 7, 8, 10],
            Scale::Lydian => &[0, 2, 4, 6, 7, 9, 11],
            Scale::Mixolydian => &[0, 2, 4, 5, 7, 9, 10],
            Scale::Locrian => &[0, 1, 3, 5, 6, 8, 10],
            Scale::MajorPentatonic => &[0, 2, 4, 7, 9],
            Scale::MinorPentatonic => &[0, 3, 5, 7, 10],
            Scale::Blues => &[0, 3, 5, 6, 7, 10],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Scale::Major => "major",
            Scale::Minor => "minor",
            Scale::HarmonicMinor => "harmonic_minor",
            Scale::MelodicMinor => "melodic_minor",
            Scale::Dorian => "dorian",
            Scale::Phrygian => "phrygian",
            Scale::Lydian => "lydian",
            Scale::Mixolydian => "mixolydian",
            Scale::Locrian => "locrian",
            Scale::MajorPentatonic => "major_pentatonic",
            Scale::MinorPentatonic => "minor_pentatonic",
            Scale::Blues => "blues",
        }
    }

    /// True when the scale has a minor third above the tonic and no major third.
    pub fn is_minor_like(&self) -> bool {
        let iv = self.intervals();
        iv.contains(&3) && !iv.contains(&4)
    }

    /// Whether a pitch class (relative to the tonic) belongs to the scale.
    pub fn contains_offset(&self, offset: i32) -> bool {
        let pc = offset.rem_euclid(12) as u8;
        self.intervals().contains(&pc)
    }
}

impl std::fmt::Display for Scale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scale {
    type Err = ParseError;

    /// Accepts canonical names, common aliases, and multi-word names with
    /// spaces or hyphens in place of underscores ("harmonic minor").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s
            .trim()
            .to_ascii_lowercase()
            .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("_");
        match normalized.as_str() {
            "major" | "maj" | "ionian" => Ok(Scale::Major),
            "minor" | "min" | "m" | "aeolian" | "natural_minor" => Ok(Scale::Minor),
            "harmonic_minor" => Ok(Scale::HarmonicMinor),
            "melodic_minor" => Ok(Scale::MelodicMinor),
            "dorian" => Ok(Scale::Dorian),
            "phrygian" => Ok(Scale::Phrygian),
            "lydian" => Ok(Scale::Lydian),
            "mixolydian" => Ok(Scale::Mixolydian),
            "locrian" => Ok(Scale::Locrian),
            "major_pentatonic" | "pentatonic_major" | "pentatonic" => Ok(Scale::MajorPentatonic),
            "minor_pentatonic" | "pentatonic_minor" => Ok(Scale::MinorPentatonic),
            "blues" => Ok(Scale::Blues),
            _ => Err(ParseError::UnknownScale(s.trim().to_string())),
        }
    }
}
