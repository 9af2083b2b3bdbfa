//! Energy, density, intent, humanization, and chord-extension tables.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Overall energy tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Energy {
    Low,
    #[default]
    Medium,
    High,
}

impl Energy {
    pub fn name(&self) -> &'static str {
        match self {
            Energy::Low => "low",
            Energy::Medium => "medium",
            Energy::High => "high",
        }
    }
}

impl FromStr for Energy {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" | "chill" | "calm" => Ok(Energy::Low),
            "medium" | "mid" | "moderate" => Ok(Energy::Medium),
            "high" | "energetic" | "intense" => Ok(Energy::High),
            other => Err(ParseError::UnknownEnergy(other.to_string())),
        }
    }
}

/// Note density tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Density {
    Sparse,
    #[default]
    Medium,
    Dense,
}

impl Density {
    /// Multiplier applied to generated note counts.
    pub fn note_factor(&self) -> f64 {
        match self {
            Density::Sparse => 0.7,
            Density::Medium => 1.0,
            Density::Dense => 1.3,
        }
    }

    /// Tier closest to a notes-per-beat measurement.
    pub fn from_notes_per_beat(rate: f64) -> Self {
        if rate < 0.75 {
            Density::Sparse
        } else if rate > 1.75 {
            Density::Dense
        } else {
            Density::Medium
        }
    }
}

impl FromStr for Density {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sparse" | "minimal" | "low" => Ok(Density::Sparse),
            "medium" | "normal" => Ok(Density::Medium),
            "dense" | "busy" | "high" => Ok(Density::Dense),
            other => Err(ParseError::UnknownDensity(other.to_string())),
        }
    }
}

/// Which parts of the arrangement the prompt asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    #[default]
    Full,
    MelodyOnly,
    ChordsOnly,
    BassOnly,
    DrumsOnly,
    NoDrums,
}

/// Named humanization profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HumanizeProfile {
    /// Fully quantized.
    None,
    Tight,
    #[default]
    Natural,
    Loose,
    /// Heavy, late-leaning feel.
    Drunk,
}

/// Numeric jitter bounds of a [`HumanizeProfile`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HumanizeSettings {
    /// Maximum timing deviation in beats (applied as +/-).
    pub timing_jitter: f64,
    /// Maximum velocity deviation (applied as +/-).
    pub velocity_jitter: i32,
    /// Constant lateness added to every note, in beats.
    pub late_bias: f64,
}

impl HumanizeProfile {
    pub fn settings(&self) -> HumanizeSettings {
        let (timing_jitter, velocity_jitter, late_bias) = match self {
            HumanizeProfile::None => (0.0, 0, 0.0),
            HumanizeProfile::Tight => (0.01, 4, 0.0),
            HumanizeProfile::Natural => (0.025, 8, 0.0),
            HumanizeProfile::Loose => (0.05, 12, 0.005),
            HumanizeProfile::Drunk => (0.09, 16, 0.02),
        };
        HumanizeSettings {
            timing_jitter,
            velocity_jitter,
            late_bias,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            HumanizeProfile::None => "none",
            HumanizeProfile::Tight => "tight",
            HumanizeProfile::Natural => "natural",
            HumanizeProfile::Loose => "loose",
            HumanizeProfile::Drunk => "drunk",
        }
    }
}

impl FromStr for HumanizeProfile {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "quantized" | "robotic" => Ok(HumanizeProfile::None),
            "tight" => Ok(HumanizeProfile::Tight),
            "natural" | "human" => Ok(HumanizeProfile::Natural),
            "loose" | "relaxed" => Ok(HumanizeProfile::Loose),
            "drunk" | "sloppy" | "lazy" => Ok(HumanizeProfile::Drunk),
            other => Err(ParseError::UnknownHumanizeProfile(other.to_string())),
        }
    }
}

/// Extension applied on top of resolved triads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ChordExtension {
    #[default]
    None,
    Add9,
    Sus2,
    Sus4,
    Seventh,
    Ninth,
    Eleventh,
    Thirteenth,
}

impl ChordExtension {
    pub fn name(&self) -> &'static str {
        match self {
            ChordExtension::None => "none",
            ChordExtension::Add9 => "add9",
            ChordExtension::Sus2 => "sus2",
            ChordExtension::Sus4 => "sus4",
            ChordExtension::Seventh => "7th",
            ChordExtension::Ninth => "9th",
            ChordExtension::Eleventh => "11th",
            ChordExtension::Thirteenth => "13th",
        }
    }
}

impl FromStr for ChordExtension {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "triad" | "triads" => Ok(ChordExtension::None),
            "add9" => Ok(ChordExtension::Add9),
            "sus2" => Ok(ChordExtension::Sus2),
            "sus4" | "sus" => Ok(ChordExtension::Sus4),
            "7" | "7th" | "7ths" | "seventh" | "sevenths" => Ok(ChordExtension::Seventh),
            "9" | "9th" | "9ths" | "ninth" | "ninths" => Ok(ChordExtension::Ninth),
            "11" | "11th" | "11ths" | "eleventh" | "elevenths" => Ok(ChordExtension::Eleventh),
            "13" | "13th" | "13ths" | "thirteenth" | "thirteenths" => {
                Ok(ChordExtension::Thirteenth)
            }
            other => Err(ParseError::UnknownChordExtension(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_humanize_settings_grow_with_looseness() {
        let tight = HumanizeProfile::Tight.settings();
        let loose = HumanizeProfile::Loose.settings();
        assert!(tight.timing_jitter < loose.timing_jitter);
        assert!(tight.velocity_jitter < loose.velocity_jitter);
        assert_eq!(HumanizeProfile::None.settings().timing_jitter, 0.0);
    }

    #[test]
    fn test_chord_extension_from_str() {
        assert_eq!("ninths".parse::<ChordExtension>().unwrap(), ChordExtension::Ninth);
        assert_eq!("sus".parse::<ChordExtension>().unwrap(), ChordExtension::Sus4);
        assert!("flat5".parse::<ChordExtension>().is_err());
    }

    #[test]
    fn test_density_from_rate() {
        assert_eq!(Density::from_notes_per_beat(0.5), Density::Sparse);
        assert_eq!(Density::from_notes_per_beat(1.0), Density::Medium);
        assert_eq!(Density::from_notes_per_beat(2.5), Density::Dense);
    }

    #[test]
    fn test_energy_ordering() {
        assert!(Energy::Low < Energy::Medium);
        assert!(Energy::Medium < Energy::High);
        assert_eq!("intense".parse::<Energy>().unwrap(), Energy::High);
    }
}
