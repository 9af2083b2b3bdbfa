//! Compiled regular expressions used by the prompt interpreter.

use std::sync::OnceLock;

use regex::Regex;

/// Section names accepted in structure and modulation tokens.
const SECTION: &str = r"pre[- ]?chorus|intro|verse|chorus|hook|bridge|breakdown|buildup|build|drop|interlude|solo|outro";

/// Scale names that may follow a key root. Longer names come first so the
/// leftmost-first alternation prefers them.
const KEY_SCALE: &str = r"harmonic\s+minor|melodic\s+minor|major\s+pentatonic|minor\s+pentatonic|pentatonic|major|minor|dorian|phrygian|lydian|mixolydian|locrian|aeolian|ionian|blues|maj|min|m";

/// Scale names recognized without a key root.
const SCALE_WORD: &str = r"harmonic\s+minor|melodic\s+minor|major\s+pentatonic|minor\s+pentatonic|pentatonic|major|minor|dorian|phrygian|lydian|mixolydian|locrian|aeolian|ionian";

static STRUCTURE_REGEX: OnceLock<Regex> = OnceLock::new();
static KEY_REGEX: OnceLock<Regex> = OnceLock::new();
static SCALE_WORD_REGEX: OnceLock<Regex> = OnceLock::new();
static BPM_REGEX: OnceLock<Regex> = OnceLock::new();
static SWING_REGEX: OnceLock<Regex> = OnceLock::new();
static BRACKET_REGEX: OnceLock<Regex> = OnceLock::new();
static PROGRESSION_LABEL_REGEX: OnceLock<Regex> = OnceLock::new();
static BEATS_PER_CHORD_REGEX: OnceLock<Regex> = OnceLock::new();
static CHORDS_PER_BAR_REGEX: OnceLock<Regex> = OnceLock::new();
static EXTENSION_REGEX: OnceLock<Regex> = OnceLock::new();
static GLIDE_REGEX: OnceLock<Regex> = OnceLock::new();
static NO_GLIDE_REGEX: OnceLock<Regex> = OnceLock::new();
static MODULATE_REGEX: OnceLock<Regex> = OnceLock::new();
static KEY_CHANGE_REGEX: OnceLock<Regex> = OnceLock::new();
static SECTION_IN_KEY_REGEX: OnceLock<Regex> = OnceLock::new();
static MOTIF_REGEX: OnceLock<Regex> = OnceLock::new();

/// `intro (4)`, `hook (8 bars)`, `verse 8 bars`, `outro: 4 bars`.
///
/// Groups: 1 = section name, 2 or 3 = bar count.
pub fn structure_regex() -> &'static Regex {
    STRUCTURE_REGEX.get_or_init(|| {
        Regex::new(&format!(
            r"(?i)\b({SECTION})\b\s*(?:\(\s*(\d+)\s*(?:bars?)?\s*\)|[:=]?\s*(\d+)\s*bars?\b)"
        ))
        .expect("invalid regex pattern")
    })
}

/// A key root with optional accidental and scale, optionally introduced by
/// "key", "key of", or "in". Lowercase roots are matched too; the caller
/// only trusts them behind a prefix.
///
/// Groups: 1 = prefix, 2 = root letter, 3 = accidental, 4 = scale name.
pub fn key_regex() -> &'static Regex {
    KEY_REGEX.get_or_init(|| {
        Regex::new(&format!(
            r"(?:(?i:\b(key\s+of|key|in))\s+)?\b([A-Ga-g])([#b♯♭]?)(?:\s*(?i:({KEY_SCALE})))?"
        ))
        .expect("invalid regex pattern")
    })
}

/// A bare scale name such as "dorian" or "harmonic minor".
pub fn scale_word_regex() -> &'static Regex {
    SCALE_WORD_REGEX.get_or_init(|| {
        Regex::new(&format!(r"(?i)\b({SCALE_WORD})\b")).expect("invalid regex pattern")
    })
}

/// `140 bpm`, `bpm: 140`, `tempo 96`. Groups: 1 or 2 = value.
pub fn bpm_regex() -> &'static Regex {
    BPM_REGEX.get_or_init(|| {
        Regex::new(
            r"(?i)\b(\d{1,3}(?:\.\d+)?)\s*bpm\b|\b(?:bpm|tempo)\s*[:=]?\s*(\d{1,3}(?:\.\d+)?)\b",
        )
        .expect("invalid regex pattern")
    })
}

/// `swing 0.6`, `swing: 62%`, `60% swing`.
///
/// Groups: 1 or 3 = value, 2 or 4 = percent sign.
pub fn swing_regex() -> &'static Regex {
    SWING_REGEX.get_or_init(|| {
        Regex::new(
            r"(?i)\bswing\s*[:=]?\s*(\d+(?:\.\d+)?)\s*(%)?|\b(\d+(?:\.\d+)?)\s*(%)?\s*swing\b",
        )
        .expect("invalid regex pattern")
    })
}

/// Bracketed list, e.g. `[I, V, vi, IV]`. Group 1 = contents.
pub fn bracket_regex() -> &'static Regex {
    BRACKET_REGEX
        .get_or_init(|| Regex::new(r"\[([^\]]*)\]").expect("invalid regex pattern"))
}

/// `progression: I-V-vi-IV`. Group 1 = token list.
pub fn progression_label_regex() -> &'static Regex {
    PROGRESSION_LABEL_REGEX.get_or_init(|| {
        Regex::new(r"(?i)\bprogression\s*[:=]\s*([^,;\n\[]+)").expect("invalid regex pattern")
    })
}

/// `2 beats per chord`. Group 1 = beats.
pub fn beats_per_chord_regex() -> &'static Regex {
    BEATS_PER_CHORD_REGEX.get_or_init(|| {
        Regex::new(r"(?i)\b(\d+)\s*beats?\s*(?:per|each|a)\s*chord\b")
            .expect("invalid regex pattern")
    })
}

/// `2 chords per bar`. Group 1 = chords.
pub fn chords_per_bar_regex() -> &'static Regex {
    CHORDS_PER_BAR_REGEX.get_or_init(|| {
        Regex::new(r"(?i)\b(\d+)\s*chords?\s*(?:per|each|a)\s*bar\b")
            .expect("invalid regex pattern")
    })
}

/// Chord extension words: `add9`, `sus4`, `7ths`, `ninths`, `9 chords`.
pub fn extension_regex() -> &'static Regex {
    EXTENSION_REGEX.get_or_init(|| {
        Regex::new(
            r"(?i)\b(add9|sus2|sus4|(?:7|9|11|13)ths?|sevenths?|ninths?|elevenths?|thirteenths?|(?:7|9|11|13)\s+chords)\b",
        )
        .expect("invalid regex pattern")
    })
}

/// `808 glide 3 st 12 steps`, `slides`, `glide 5 semitones`.
///
/// Groups: 1 = depth in semitones, 2 = ramp steps.
pub fn glide_regex() -> &'static Regex {
    GLIDE_REGEX.get_or_init(|| {
        Regex::new(
            r"(?i)\b(?:808\s*)?(?:glides?|slides?|gliding|sliding)\b(?:\s*(?:of|by)?\s*(\d+)\s*(?:st|semis?|semitones?)\b)?(?:\s*(?:,|over|with|in|and)?\s*(\d+)\s*steps?\b)?",
        )
        .expect("invalid regex pattern")
    })
}

/// `no glide`, `no 808 slides`.
pub fn no_glide_regex() -> &'static Regex {
    NO_GLIDE_REGEX.get_or_init(|| {
        Regex::new(r"(?i)\bno\s+(?:808\s+)?(?:glides?|slides?)\b").expect("invalid regex pattern")
    })
}

/// `modulate to G minor at bridge`.
///
/// Groups: 1 = root, 2 = scale, 3 = section.
pub fn modulate_regex() -> &'static Regex {
    MODULATE_REGEX.get_or_init(|| {
        Regex::new(&format!(
            r"(?i)\bmodulat(?:e|es|ion|ing)\s+(?:to\s+)?([a-g][#b♯♭]?)(?:\s+({KEY_SCALE}))?\s+(?:at|in|for|on|during)\s+(?:the\s+)?({SECTION})\b"
        ))
        .expect("invalid regex pattern")
    })
}

/// `key change +2 at hook`. Groups: 1 = semitone shift, 2 = section.
pub fn key_change_regex() -> &'static Regex {
    KEY_CHANGE_REGEX.get_or_init(|| {
        Regex::new(&format!(
            r"(?i)\bkey\s+change\s+(?:of\s+)?([+-]?\d+)\s*(?:st|semitones?)?\s+(?:at|in|for|on|during)\s+(?:the\s+)?({SECTION})\b"
        ))
        .expect("invalid regex pattern")
    })
}

/// `bridge in E minor`. Groups: 1 = section, 2 = root, 3 = scale.
pub fn section_in_key_regex() -> &'static Regex {
    SECTION_IN_KEY_REGEX.get_or_init(|| {
        Regex::new(&format!(
            r"\b((?i:{SECTION}))\s+(?i:in)\s+([A-G][#b♯♭]?)(?:\s*(?i:({KEY_SCALE})))?"
        ))
        .expect("invalid regex pattern")
    })
}

/// `motif: C4 E4 G4`, `motif [60, 64, 67]`. Group 1 = note list.
pub fn motif_regex() -> &'static Regex {
    MOTIF_REGEX.get_or_init(|| {
        Regex::new(
            r"(?i)\bmotif\s*[:=]?\s*\[?\s*((?:[a-g][#b]?-?\d|\d{1,3})(?:\s*[,\s]\s*(?:[a-g][#b]?-?\d|\d{1,3}))*)",
        )
        .expect("invalid regex pattern")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_patterns_compile() {
        structure_regex();
        key_regex();
        scale_word_regex();
        bpm_regex();
        swing_regex();
        bracket_regex();
        progression_label_regex();
        beats_per_chord_regex();
        chords_per_bar_regex();
        extension_regex();
        glide_regex();
        no_glide_regex();
        modulate_regex();
        key_change_regex();
        section_in_key_regex();
        motif_regex();
    }

    #[test]
    fn test_structure_forms() {
        let caps: Vec<(String, String)> = structure_regex()
            .captures_iter("intro (4), Hook (8 bars), verse 16 bars, outro: 2 bars")
            .map(|c| {
                let bars = c.get(2).or_else(|| c.get(3)).unwrap().as_str().to_string();
                (c[1].to_lowercase(), bars)
            })
            .collect();
        assert_eq!(
            caps,
            vec![
                ("intro".to_string(), "4".to_string()),
                ("hook".to_string(), "8".to_string()),
                ("verse".to_string(), "16".to_string()),
                ("outro".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn test_key_regex_groups() {
        let caps = key_regex().captures("trap in F# minor").unwrap();
        assert_eq!(&caps[1], "in");
        assert_eq!(&caps[2], "F");
        assert_eq!(&caps[3], "#");
        assert_eq!(&caps[4], "minor");
    }

    #[test]
    fn test_glide_groups() {
        let caps = glide_regex().captures("808 glide 3 st 12 steps").unwrap();
        assert_eq!(&caps[1], "3");
        assert_eq!(&caps[2], "12");
        let caps = glide_regex().captures("with slides").unwrap();
        assert!(caps.get(1).is_none() && caps.get(2).is_none());
    }
}
