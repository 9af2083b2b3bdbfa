//! Keyword tables consulted by the prompt interpreter.

use cadenza_spec::{Intent, TrackType};

/// Intent phrases in priority order; the first matching group wins.
pub const INTENT_PHRASES: &[(Intent, &[&str])] = &[
    (
        Intent::NoDrums,
        &["no drums", "without drums", "drumless", "no percussion"],
    ),
    (
        Intent::DrumsOnly,
        &["drums only", "only drums", "just drums", "drum loop", "beat only", "just a beat"],
    ),
    (
        Intent::BassOnly,
        &["bass only", "only bass", "just bass", "bassline only", "just a bassline"],
    ),
    (
        Intent::ChordsOnly,
        &[
            "chords only",
            "only chords",
            "just chords",
            "chord progression only",
            "just a chord progression",
        ],
    ),
    (
        Intent::MelodyOnly,
        &["melody only", "only melody", "just melody", "just a melody", "just the melody"],
    ),
];

/// Track roles generated for an intent, before layers are added.
pub fn base_layers(intent: Intent) -> &'static [TrackType] {
    match intent {
        Intent::Full => &[
            TrackType::Melody,
            TrackType::Chords,
            TrackType::Bass,
            TrackType::Drums,
        ],
        Intent::NoDrums => &[TrackType::Melody, TrackType::Chords, TrackType::Bass],
        Intent::MelodyOnly => &[TrackType::Melody],
        Intent::ChordsOnly => &[TrackType::Chords],
        Intent::BassOnly => &[TrackType::Bass],
        Intent::DrumsOnly => &[TrackType::Drums],
    }
}

/// Phrases that request a derived layer.
pub const LAYER_KEYWORDS: &[(&str, TrackType)] = &[
    ("arpeggio", TrackType::Arp),
    ("arpeggiated", TrackType::Arp),
    ("arp", TrackType::Arp),
    ("pads", TrackType::Pad),
    ("pad", TrackType::Pad),
    ("lead", TrackType::Lead),
    ("countermelody", TrackType::Countermelody),
    ("counter melody", TrackType::Countermelody),
    ("counter-melody", TrackType::Countermelody),
];

/// Section names recognized in structure tokens, and the canonical name
/// each maps to.
pub const SECTION_ALIASES: &[(&str, &str)] = &[
    ("intro", "intro"),
    ("verse", "verse"),
    ("pre-chorus", "prechorus"),
    ("pre chorus", "prechorus"),
    ("prechorus", "prechorus"),
    ("chorus", "chorus"),
    ("hook", "hook"),
    ("bridge", "bridge"),
    ("breakdown", "breakdown"),
    ("buildup", "build"),
    ("build", "build"),
    ("drop", "drop"),
    ("interlude", "interlude"),
    ("solo", "solo"),
    ("outro", "outro"),
];

/// Canonical section name for an alias.
pub fn canonical_section(name: &str) -> String {
    let lower = name.trim().to_ascii_lowercase();
    let collapsed = lower.split_whitespace().collect::<Vec<_>>().join(" ");
    SECTION_ALIASES
        .iter()
        .find(|(alias, _)| *alias == collapsed)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or(collapsed)
}

/// Default structure used when the prompt names no sections.
pub const DEFAULT_STRUCTURE: &[(&str, u32)] = &[
    ("intro", 4),
    ("verse", 8),
    ("hook", 8),
    ("verse", 8),
    ("hook", 8),
];

/// Named progressions: (style, major-key progression, minor-key progression).
pub const PROGRESSION_STYLES: &[(&str, &[&str], &[&str])] = &[
    ("pop", &["I", "V", "vi", "IV"], &["i", "VI", "III", "VII"]),
    ("sad", &["vi", "IV", "I", "V"], &["i", "iv", "VI", "V"]),
    (
        "jazz",
        &["ii7", "V7", "Imaj7", "vi7"],
        &["iiø7", "V7", "i7", "VImaj7"],
    ),
    ("epic", &["I", "bVI", "bVII", "I"], &["i", "VI", "III", "VII"]),
    ("blues", &["I7", "IV7", "I7", "V7"], &["i7", "iv7", "i7", "V7"]),
    ("dark", &["I", "bVI", "iv", "I"], &["i", "VI", "iv", "V"]),
    ("classic", &["I", "IV", "V", "I"], &["i", "iv", "V", "i"]),
    ("andalusian", &["vi", "V", "IV", "III"], &["i", "VII", "VI", "V"]),
    (
        "dreamy",
        &["Imaj7", "vi7", "IVmaj7", "V"],
        &["i7", "VImaj7", "III", "VII"],
    ),
];

/// Words that select a progression style (word, style).
pub const PROGRESSION_STYLE_WORDS: &[(&str, &str)] = &[
    ("andalusian", "andalusian"),
    ("flamenco", "andalusian"),
    ("sad", "sad"),
    ("melancholic", "sad"),
    ("emotional", "sad"),
    ("jazzy", "jazz"),
    ("epic", "epic"),
    ("heroic", "epic"),
    ("bluesy", "blues"),
    ("blues", "blues"),
    ("dark", "dark"),
    ("sinister", "dark"),
    ("classic", "classic"),
    ("dreamy", "dreamy"),
    ("ethereal", "dreamy"),
];

/// Progression for a named style in a major or minor context.
pub fn progression_for(style: &str, minor: bool) -> Option<&'static [&'static str]> {
    PROGRESSION_STYLES
        .iter()
        .find(|(name, _, _)| *name == style)
        .map(|(_, major_prog, minor_prog)| if minor { *minor_prog } else { *major_prog })
}

/// Instrument phrases: (phrase, General MIDI program, role used when no role
/// word follows the phrase). Longer phrases come first so "electric piano"
/// is not read as "piano".
pub const INSTRUMENT_KEYWORDS: &[(&str, u8, TrackType)] = &[
    ("electric piano", 4, TrackType::Chords),
    ("electric guitar", 27, TrackType::Melody),
    ("distorted guitar", 30, TrackType::Melody),
    ("acoustic guitar", 25, TrackType::Chords),
    ("upright bass", 32, TrackType::Bass),
    ("slap bass", 36, TrackType::Bass),
    ("synth bass", 38, TrackType::Bass),
    ("synth lead", 80, TrackType::Lead),
    ("synth pad", 88, TrackType::Pad),
    ("music box", 10, TrackType::Melody),
    ("rhodes", 4, TrackType::Chords),
    ("piano", 0, TrackType::Chords),
    ("organ", 16, TrackType::Chords),
    ("guitar", 24, TrackType::Chords),
    ("808", 38, TrackType::Bass),
    ("strings", 48, TrackType::Pad),
    ("violin", 40, TrackType::Melody),
    ("cello", 42, TrackType::Countermelody),
    ("choir", 52, TrackType::Pad),
    ("trumpet", 56, TrackType::Melody),
    ("saxophone", 65, TrackType::Melody),
    ("sax", 65, TrackType::Melody),
    ("flute", 73, TrackType::Melody),
    ("marimba", 12, TrackType::Melody),
    ("vibraphone", 11, TrackType::Melody),
    ("bells", 14, TrackType::Melody),
    ("harp", 46, TrackType::Arp),
    ("pluck", 45, TrackType::Arp),
];

/// Words that select the high energy tier.
pub const HIGH_ENERGY_WORDS: &[&str] = &[
    "energetic",
    "intense",
    "high energy",
    "aggressive",
    "hype",
    "upbeat",
    "banger",
    "driving",
];

/// Words that select the low energy tier.
pub const LOW_ENERGY_WORDS: &[&str] = &[
    "chill", "calm", "mellow", "low energy", "sleepy", "gentle", "soft", "peaceful",
];

pub const SPARSE_WORDS: &[&str] = &["sparse", "minimal", "minimalist", "simple"];
pub const DENSE_WORDS: &[&str] = &["dense", "busy", "complex", "intricate"];

/// Humanization words (word, profile name understood by `HumanizeProfile`).
pub const HUMANIZE_WORDS: &[(&str, &str)] = &[
    ("quantized", "none"),
    ("robotic", "none"),
    ("tight", "tight"),
    ("humanized", "natural"),
    ("human", "natural"),
    ("loose", "loose"),
    ("drunk", "drunk"),
    ("sloppy", "drunk"),
    ("lazy", "drunk"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harmony::parse_roman;

    #[test]
    fn test_every_style_has_valid_progressions() {
        for (style, major, minor) in PROGRESSION_STYLES {
            assert!(!major.is_empty() && !minor.is_empty(), "{style}");
            for token in major.iter().chain(minor.iter()) {
                assert!(parse_roman(token).is_some(), "{style}: {token}");
            }
        }
    }

    #[test]
    fn test_style_words_point_at_known_styles() {
        for (word, style) in PROGRESSION_STYLE_WORDS {
            assert!(progression_for(style, false).is_some(), "{word}");
        }
    }

    #[test]
    fn test_canonical_section() {
        assert_eq!(canonical_section("Pre Chorus"), "prechorus");
        assert_eq!(canonical_section("buildup"), "build");
        assert_eq!(canonical_section("HOOK"), "hook");
    }

    #[test]
    fn test_instrument_programs_in_range() {
        for (phrase, program, _) in INSTRUMENT_KEYWORDS {
            assert!(*program <= 127, "{phrase}");
        }
    }
}
