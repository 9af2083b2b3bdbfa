//! Genre presets and groove profiles.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::style::{ChordExtension, HumanizeProfile};
use crate::error::ParseError;
use crate::track::TrackType;

/// Rhythmic feel of a genre.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GrooveProfile {
    /// Swing ratio; 0.5 is straight, 0.66 is triplet swing.
    pub swing: f64,
    /// Alternate hi-hat velocities between accented and ghosted hits.
    pub ghost_notes: bool,
    /// Allow triplet drum fills at bar ends.
    pub triplets: bool,
    /// Hi-hat grid: 8 for eighths, 16 for sixteenths.
    pub hihat_resolution: u8,
    /// Kick grouping in eighth notes (e.g., `[3, 3, 2]`), replacing the
    /// default kick pattern when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meter_grouping: Option<Vec<u8>>,
}

impl Default for GrooveProfile {
    fn default() -> Self {
        Self {
            swing: 0.5,
            ghost_notes: false,
            triplets: false,
            hihat_resolution: 8,
            meter_grouping: None,
        }
    }
}

/// Detectable genres, listed in detection precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Genre {
    Lofi,
    Trap,
    Drill,
    Reggaeton,
    House,
    Techno,
    Edm,
    Jazz,
    Hiphop,
    Rnb,
    Funk,
    Rock,
    Cinematic,
    Ambient,
    #[default]
    Pop,
}

/// Named defaults a genre contributes to the composition parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct GenrePreset {
    pub default_bpm: f64,
    pub groove: GrooveProfile,
    pub humanize: HumanizeProfile,
    pub chord_extension: ChordExtension,
    /// Key into the named progression table.
    pub progression_style: &'static str,
    /// Derived layers added under full intent.
    pub extra_layers: &'static [TrackType],
    /// Whether the bass uses 808 pitch glides by default.
    pub glide: bool,
}

impl Genre {
    /// Detection precedence: earlier entries win when several keywords match.
    pub const PRECEDENCE: [Genre; 15] = [
        Genre::Lofi,
        Genre::Trap,
        Genre::Drill,
        Genre::Reggaeton,
        Genre::House,
        Genre::Techno,
        Genre::Edm,
        Genre::Jazz,
        Genre::Hiphop,
        Genre::Rnb,
        Genre::Funk,
        Genre::Rock,
        Genre::Cinematic,
        Genre::Ambient,
        Genre::Pop,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Genre::Lofi => "lofi",
            Genre::Trap => "trap",
            Genre::Drill => "drill",
            Genre::Reggaeton => "reggaeton",
            Genre::House => "house",
            Genre::Techno => "techno",
            Genre::Edm => "edm",
            Genre::Jazz => "jazz",
            Genre::Hiphop => "hiphop",
            Genre::Rnb => "rnb",
            Genre::Funk => "funk",
            Genre::Rock => "rock",
            Genre::Cinematic => "cinematic",
            Genre::Ambient => "ambient",
            Genre::Pop => "pop",
        }
    }

    /// Lowercase phrases that identify the genre in free text.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Genre::Lofi => &["lofi", "lo-fi", "lo fi", "chillhop"],
            Genre::Trap => &["trap"],
            Genre::Drill => &["drill"],
            Genre::Reggaeton => &["reggaeton", "dembow", "latin"],
            Genre::House => &["house", "deep house"],
            Genre::Techno => &["techno"],
            Genre::Edm => &["edm", "electronic", "dance", "trance", "dubstep"],
            Genre::Jazz => &["jazz", "jazzy", "bebop", "swing jazz"],
            Genre::Hiphop => &["hip hop", "hip-hop", "hiphop", "boom bap", "rap"],
            Genre::Rnb => &["r&b", "rnb", "soul", "neo soul"],
            Genre::Funk => &["funk", "funky", "disco"],
            Genre::Rock => &["rock", "punk", "grunge"],
            Genre::Cinematic => &["cinematic", "orchestral", "film score", "epic"],
            Genre::Ambient => &["ambient", "atmospheric", "drone"],
            Genre::Pop => &["pop"],
        }
    }

    pub fn preset(&self) -> GenrePreset {
        let straight = GrooveProfile::default();
        match self {
            Genre::Lofi => GenrePreset {
                default_bpm: 82.0,
                groove: GrooveProfile {
                    swing: 0.6,
                    ghost_notes: true,
                    ..straight
                },
                humanize: HumanizeProfile::Loose,
                chord_extension: ChordExtension::Ninth,
                progression_style: "jazz",
                extra_layers: &[TrackType::Pad],
                glide: false,
            },
            Genre::Trap => GenrePreset {
                default_bpm: 140.0,
                groove: GrooveProfile {
                    triplets: true,
                    hihat_resolution: 16,
                    ..straight
                },
                humanize: HumanizeProfile::Tight,
                chord_extension: ChordExtension::None,
                progression_style: "dark",
                extra_layers: &[],
                glide: true,
            },
            Genre::Drill => GenrePreset {
                default_bpm: 142.0,
                groove: GrooveProfile {
                    triplets: true,
                    hihat_resolution: 16,
                    meter_grouping: Some(vec![3, 3, 2]),
                    ..straight
                },
                humanize: HumanizeProfile::Tight,
                chord_extension: ChordExtension::None,
                progression_style: "dark",
                extra_layers: &[],
                glide: true,
            },
            Genre::Reggaeton => GenrePreset {
                default_bpm: 95.0,
                groove: GrooveProfile {
                    hihat_resolution: 16,
                    meter_grouping: Some(vec![3, 3, 2]),
                    ..straight
                },
                humanize: HumanizeProfile::Tight,
                chord_extension: ChordExtension::None,
                progression_style: "pop",
                extra_layers: &[TrackType::Arp],
                glide: false,
            },
            Genre::House => GenrePreset {
                default_bpm: 124.0,
                groove: GrooveProfile {
                    swing: 0.54,
                    hihat_resolution: 16,
                    ..straight
                },
                humanize: HumanizeProfile::Tight,
                chord_extension: ChordExtension::Seventh,
                progression_style: "pop",
                extra_layers: &[TrackType::Pad, TrackType::Arp],
                glide: false,
            },
            Genre::Techno => GenrePreset {
                default_bpm: 130.0,
                groove: GrooveProfile {
                    hihat_resolution: 16,
                    ..straight
                },
                humanize: HumanizeProfile::None,
                chord_extension: ChordExtension::None,
                progression_style: "dark",
                extra_layers: &[TrackType::Arp],
                glide: false,
            },
            Genre::Edm => GenrePreset {
                default_bpm: 128.0,
                groove: GrooveProfile {
                    hihat_resolution: 16,
                    ..straight
                },
                humanize: HumanizeProfile::Tight,
                chord_extension: ChordExtension::Add9,
                progression_style: "epic",
                extra_layers: &[TrackType::Arp, TrackType::Pad, TrackType::Lead],
                glide: false,
            },
            Genre::Jazz => GenrePreset {
                default_bpm: 110.0,
                groove: GrooveProfile {
                    swing: 0.66,
                    ghost_notes: true,
                    triplets: true,
                    ..straight
                },
                humanize: HumanizeProfile::Natural,
                chord_extension: ChordExtension::Seventh,
                progression_style: "jazz",
                extra_layers: &[TrackType::Countermelody],
                glide: false,
            },
            Genre::Hiphop => GenrePreset {
                default_bpm: 90.0,
                groove: GrooveProfile {
                    swing: 0.57,
                    ghost_notes: true,
                    hihat_resolution: 16,
                    ..straight
                },
                humanize: HumanizeProfile::Loose,
                chord_extension: ChordExtension::Seventh,
                progression_style: "sad",
                extra_layers: &[],
                glide: false,
            },
            Genre::Rnb => GenrePreset {
                default_bpm: 75.0,
                groove: GrooveProfile {
                    swing: 0.56,
                    ghost_notes: true,
                    hihat_resolution: 16,
                    ..straight
                },
                humanize: HumanizeProfile::Natural,
                chord_extension: ChordExtension::Ninth,
                progression_style: "jazz",
                extra_layers: &[TrackType::Pad],
                glide: false,
            },
            Genre::Funk => GenrePreset {
                default_bpm: 105.0,
                groove: GrooveProfile {
                    swing: 0.55,
                    ghost_notes: true,
                    hihat_resolution: 16,
                    ..straight
                },
                humanize: HumanizeProfile::Natural,
                chord_extension: ChordExtension::Seventh,
                progression_style: "blues",
                extra_layers: &[],
                glide: false,
            },
            Genre::Rock => GenrePreset {
                default_bpm: 120.0,
                groove: straight,
                humanize: HumanizeProfile::Natural,
                chord_extension: ChordExtension::None,
                progression_style: "classic",
                extra_layers: &[TrackType::Lead],
                glide: false,
            },
            Genre::Cinematic => GenrePreset {
                default_bpm: 90.0,
                groove: GrooveProfile {
                    triplets: true,
                    ..straight
                },
                humanize: HumanizeProfile::Natural,
                chord_extension: ChordExtension::Add9,
                progression_style: "epic",
                extra_layers: &[TrackType::Pad, TrackType::Countermelody],
                glide: false,
            },
            Genre::Ambient => GenrePreset {
                default_bpm: 70.0,
                groove: straight,
                humanize: HumanizeProfile::Loose,
                chord_extension: ChordExtension::Ninth,
                progression_style: "dreamy",
                extra_layers: &[TrackType::Pad, TrackType::Arp],
                glide: false,
            },
            Genre::Pop => GenrePreset {
                default_bpm: 120.0,
                groove: straight,
                humanize: HumanizeProfile::Natural,
                chord_extension: ChordExtension::None,
                progression_style: "pop",
                extra_layers: &[],
                glide: false,
            },
        }
    }

    /// General MIDI program pool for a role. Consolidation picks one entry.
    pub fn programs(&self, role: TrackType) -> &'static [u8] {
        use TrackType::*;
        match (self, role) {
            (_, Drums) => &[0],
            (Genre::Lofi, Melody) => &[4, 11, 0],
            (Genre::Lofi, Chords) => &[4, 0],
            (Genre::Lofi, Bass) => &[32, 33],
            (Genre::Trap | Genre::Drill, Melody) => &[9, 80, 0],
            (Genre::Trap | Genre::Drill, Chords) => &[89, 0],
            (Genre::Trap | Genre::Drill, Bass) => &[38],
            (Genre::Reggaeton, Melody) => &[80, 24],
            (Genre::Reggaeton, Bass) => &[38, 33],
            (Genre::House | Genre::Techno | Genre::Edm, Melody) => &[81, 80],
            (Genre::House | Genre::Techno | Genre::Edm, Chords) => &[4, 89, 81],
            (Genre::House | Genre::Techno | Genre::Edm, Bass) => &[38, 39],
            (Genre::Jazz, Melody) => &[65, 66, 56],
            (Genre::Jazz, Chords) => &[0, 4],
            (Genre::Jazz, Bass) => &[32],
            (Genre::Hiphop | Genre::Rnb, Melody) => &[4, 0, 11],
            (Genre::Hiphop | Genre::Rnb, Chords) => &[4, 0],
            (Genre::Hiphop | Genre::Rnb, Bass) => &[33, 38],
            (Genre::Funk, Melody) => &[27, 61],
            (Genre::Funk, Chords) => &[16, 4],
            (Genre::Funk, Bass) => &[36, 33],
            (Genre::Rock, Melody) => &[29, 30],
            (Genre::Rock, Chords) => &[30, 29],
            (Genre::Rock, Bass) => &[33, 34],
            (Genre::Cinematic, Melody) => &[40, 73, 60],
            (Genre::Cinematic, Chords) => &[48, 49],
            (Genre::Cinematic, Bass) => &[42, 43],
            (Genre::Ambient, Melody) => &[88, 73],
            (Genre::Ambient, Chords) => &[89, 91],
            (Genre::Ambient, Bass) => &[38, 32],
            (Genre::Pop, Melody) => &[0, 80],
            (Genre::Pop, Chords) => &[0, 4],
            (Genre::Pop, Bass) => &[33, 38],
            (_, Chords) => &[0],
            (_, Arp) => &[81, 82, 8],
            (_, Pad) => &[89, 88, 91],
            (_, Lead) => &[81, 80, 84],
            (_, Countermelody) => &[73, 71, 68],
        }
    }
}

impl std::fmt::Display for Genre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Genre {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Genre::PRECEDENCE
            .into_iter()
            .find(|g| g.name() == needle || g.keywords().contains(&needle.as_str()))
            .ok_or_else(|| ParseError::UnknownGenre(s.trim().to_string()))
    }
}
