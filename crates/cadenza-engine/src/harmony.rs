//! Scale helpers, roman-numeral chord resolution, and chord extensions.
//!
//! Chord tones are found by walking the scale upward from the chord root
//! and counting scale members, so diatonic qualities (the minor third of
//! "ii" in major, the diminished fifth of "vii") fall out without a
//! per-degree quality table. Case and explicit suffixes then override.

use serde::Serialize;

use cadenza_spec::{ChordExtension, Scale};

/// Lowest pitch of the normalization register (C4).
pub const CHORD_REGISTER_LOW: u8 = 60;
/// Highest pitch of the normalization register (B4).
pub const CHORD_REGISTER_HIGH: u8 = 71;

/// Extensions never reach more than two octaves above the voicing's bass.
const EXTENSION_SPAN: i32 = 24;

/// Chord quality after case rules and suffixes are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChordQuality {
    Major,
    Minor,
    Diminished,
    Augmented,
    Sus2,
    Sus4,
    Dominant7,
    Major7,
    Minor7,
    MinorMajor7,
    HalfDiminished7,
    Diminished7,
}

impl ChordQuality {
    /// Semitones of the seventh that belongs with this quality.
    pub fn seventh_interval(&self) -> i32 {
        match self {
            ChordQuality::Major
            | ChordQuality::Augmented
            | ChordQuality::Major7
            | ChordQuality::MinorMajor7 => 11,
            ChordQuality::Diminished | ChordQuality::Diminished7 => 9,
            ChordQuality::Minor
            | ChordQuality::Sus2
            | ChordQuality::Sus4
            | ChordQuality::Dominant7
            | ChordQuality::Minor7
            | ChordQuality::HalfDiminished7 => 10,
        }
    }

    fn from_intervals(third: i32, fifth: i32, seventh: Option<i32>) -> Self {
        match (third, fifth, seventh) {
            (2, _, _) => ChordQuality::Sus2,
            (5, _, _) => ChordQuality::Sus4,
            (3, 6, Some(9)) => ChordQuality::Diminished7,
            (3, 6, Some(_)) => ChordQuality::HalfDiminished7,
            (3, 6, None) => ChordQuality::Diminished,
            (4, 8, _) => ChordQuality::Augmented,
            (4, _, Some(11)) => ChordQuality::Major7,
            (4, _, Some(_)) => ChordQuality::Dominant7,
            (4, _, None) => ChordQuality::Major,
            (_, _, Some(11)) => ChordQuality::MinorMajor7,
            (_, _, Some(_)) => ChordQuality::Minor7,
            _ => ChordQuality::Minor,
        }
    }
}

/// A parsed roman-numeral token such as `bVII`, `ii7`, or `V7sus4`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RomanNumeral {
    /// Chromatic alteration of the root (-1 for `b`, +1 for `#`).
    pub accidental: i32,
    /// Scale degree, 0-based (I = 0 .. VII = 6).
    pub degree: usize,
    /// Whether the numeral was written in uppercase.
    pub upper: bool,
    /// Everything after the numeral (quality and extension markers).
    pub suffix: String,
}

/// Parses a roman-numeral token. Mixed-case numerals are rejected.
pub fn parse_roman(token: &str) -> Option<RomanNumeral> {
    let token = token.trim();
    let (accidental, rest) = if let Some(stripped) = token.strip_prefix('b') {
        (-1, stripped)
    } else if let Some(stripped) = token.strip_prefix('♭') {
        (-1, stripped)
    } else if let Some(stripped) = token.strip_prefix('#') {
        (1, stripped)
    } else if let Some(stripped) = token.strip_prefix('♯') {
        (1, stripped)
    } else {
        (0, token)
    };

    let numeral_len = rest
        .chars()
        .take_while(|c| matches!(c, 'I' | 'V' | 'i' | 'v'))
        .count();
    if numeral_len == 0 {
        return None;
    }
    let (numeral, suffix) = rest.split_at(numeral_len);

    let upper = numeral.chars().all(|c| c.is_ascii_uppercase());
    let lower = numeral.chars().all(|c| c.is_ascii_lowercase());
    if !upper && !lower {
        return None;
    }

    let degree = match numeral.to_ascii_uppercase().as_str() {
        "I" => 0,
        "II" => 1,
        "III" => 2,
        "IV" => 3,
        "V" => 4,
        "VI" => 5,
        "VII" => 6,
        _ => return None,
    };

    Some(RomanNumeral {
        accidental,
        degree,
        upper,
        suffix: suffix.to_string(),
    })
}

/// A resolved chord: ascending, duplicate-free pitches in the normalization
/// register, plus the quality they spell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedChord {
    pub pitches: Vec<u8>,
    pub quality: ChordQuality,
    /// Pitch class of the chord root (0-11).
    pub root_pc: u8,
    /// Semitones from the root to the seventh that fits the chord in its key.
    pub seventh: i32,
}

/// Semitone offset (from the tonic) of a scale degree. Degrees past the
/// scale length continue into the next octave.
pub fn degree_offset(scale: Scale, degree: i32) -> i32 {
    let intervals = scale.intervals();
    let len = intervals.len() as i32;
    let octave = degree.div_euclid(len);
    intervals[degree.rem_euclid(len) as usize] as i32 + 12 * octave
}

/// MIDI pitch of a scale degree, counted from `tonic` (an absolute pitch).
pub fn degree_pitch(tonic: i32, scale: Scale, degree: i32) -> i32 {
    tonic + degree_offset(scale, degree)
}

/// Semitones from `root_offset` (relative to the tonic) to the `steps`-th
/// scale member above it, counting only scale members.
pub fn scale_steps_above(scale: Scale, root_offset: i32, steps: u32) -> Option<i32> {
    let mut counted = 0;
    for semitone in 1..=24 {
        if scale.contains_offset(root_offset + semitone) {
            counted += 1;
            if counted == steps {
                return Some(semitone);
            }
        }
    }
    None
}

/// Nearest pitch to `pitch` that belongs to the key. Ties resolve toward
/// `toward`.
pub fn snap_to_scale(pitch: i32, key_pc: u8, scale: Scale, toward: i32) -> i32 {
    if scale.contains_offset(pitch - key_pc as i32) {
        return pitch;
    }
    let first = if toward < pitch { -1 } else { 1 };
    for distance in 1..12 {
        for candidate in [pitch + first * distance, pitch - first * distance] {
            if scale.contains_offset(candidate - key_pc as i32) {
                return candidate;
            }
        }
    }
    pitch
}

/// Next pitch of the key strictly above (`direction > 0`) or below `pitch`.
pub fn step_in_scale(pitch: i32, key_pc: u8, scale: Scale, direction: i32) -> i32 {
    let dir = if direction < 0 { -1 } else { 1 };
    let mut candidate = pitch + dir;
    for _ in 0..12 {
        if scale.contains_offset(candidate - key_pc as i32) {
            return candidate;
        }
        candidate += dir;
    }
    pitch + dir
}

/// Progression slot used at a beat offset within a section.
pub fn chord_index_at(beat: f64, beats_per_chord: u32, progression_len: usize) -> usize {
    if progression_len == 0 {
        return 0;
    }
    let slot = (beat.max(0.0) / beats_per_chord.max(1) as f64).floor() as usize;
    slot % progression_len
}

/// Resolves a roman-numeral token in a key.
///
/// `root_offset` is the tonic's pitch class. Unparseable tokens resolve to
/// the tonic chord. Output pitches are folded into
/// `CHORD_REGISTER_LOW..=CHORD_REGISTER_HIGH`, sorted, and deduplicated.
///
/// Quality rules, in order:
/// 1. The diatonic third, fifth, and seventh come from walking the scale.
/// 2. An uppercase numeral takes a major third and perfect fifth; a
///    lowercase numeral takes a minor third and keeps a diatonic
///    diminished fifth, otherwise a perfect fifth.
/// 3. Explicit suffixes win over case: `dim`/`°`, `dim7`/`°7`, `ø`/`m7b5`,
///    `aug`/`+`, `sus2`, `sus4`/`sus`, `maj7`/`M7`, `7` (minor seventh above
///    the case-chosen triad, so `V7` is dominant and `ii7` minor seventh),
///    `9` (seventh plus ninth), `add9`.
pub fn resolve_chord(token: &str, scale: Scale, root_offset: u8) -> ResolvedChord {
    let numeral = parse_roman(token).unwrap_or(RomanNumeral {
        accidental: 0,
        degree: 0,
        upper: !scale.is_minor_like(),
        suffix: String::new(),
    });

    let root = degree_offset(scale, numeral.degree as i32) + numeral.accidental;
    let diatonic_fifth = scale_steps_above(scale, root, 4).unwrap_or(7);

    let mut third = if numeral.upper { 4 } else { 3 };
    let mut fifth = if !numeral.upper && diatonic_fifth == 6 {
        6
    } else {
        7
    };
    let mut seventh: Option<i32> = None;
    let mut extra: Vec<i32> = Vec::new();

    let mut rest = numeral.suffix.as_str();
    while !rest.is_empty() {
        if let Some(stripped) = strip_any(rest, &["dim7", "°7", "o7"]) {
            third = 3;
            fifth = 6;
            seventh = Some(9);
            rest = stripped;
        } else if let Some(stripped) = strip_any(rest, &["m7b5", "ø7", "ø"]) {
            third = 3;
            fifth = 6;
            seventh = Some(10);
            rest = stripped;
        } else if let Some(stripped) = strip_any(rest, &["dim", "°", "o"]) {
            third = 3;
            fifth = 6;
            rest = stripped;
        } else if let Some(stripped) = strip_any(rest, &["aug", "+"]) {
            third = 4;
            fifth = 8;
            rest = stripped;
        } else if let Some(stripped) = strip_any(rest, &["maj7", "M7", "Δ7", "Δ"]) {
            seventh = Some(11);
            rest = stripped;
        } else if let Some(stripped) = rest.strip_prefix("add9") {
            extra.push(14);
            rest = stripped;
        } else if let Some(stripped) = rest.strip_prefix("sus2") {
            third = 2;
            rest = stripped;
        } else if let Some(stripped) = strip_any(rest, &["sus4", "sus"]) {
            third = 5;
            rest = stripped;
        } else if let Some(stripped) = rest.strip_prefix('7') {
            seventh.get_or_insert(10);
            rest = stripped;
        } else if let Some(stripped) = rest.strip_prefix('9') {
            seventh.get_or_insert(10);
            extra.push(14);
            rest = stripped;
        } else {
            // Unknown marker: skip one character.
            let mut chars = rest.chars();
            chars.next();
            rest = chars.as_str();
        }
    }

    let quality = ChordQuality::from_intervals(third, fifth, seventh);
    let fitting_seventh = seventh
        .or_else(|| diatonic_seventh(scale, root, numeral.accidental))
        .unwrap_or_else(|| quality.seventh_interval());

    let mut intervals = vec![0, third, fifth];
    intervals.extend(seventh);
    intervals.extend(extra);

    let base = root_offset as i32 + root;
    let mut pitches: Vec<u8> = intervals
        .iter()
        .map(|iv| fold_into_register(base + iv))
        .collect();
    pitches.sort_unstable();
    pitches.dedup();

    ResolvedChord {
        pitches,
        quality,
        root_pc: base.rem_euclid(12) as u8,
        seventh: fitting_seventh,
    }
}

/// Seventh found by walking the scale from a diatonic root, if the walk
/// lands on a seventh at all (pentatonic scales overshoot).
fn diatonic_seventh(scale: Scale, root: i32, accidental: i32) -> Option<i32> {
    if accidental != 0 {
        return None;
    }
    scale_steps_above(scale, root, 6).filter(|iv| (9..=11).contains(iv))
}

/// Adds the intervals of an extension tag to a voicing of `chord`.
///
/// Intervals are measured from the lowest sounding root (or the root just
/// below the voicing when it is absent), so inversions extend correctly.
/// The seventh is the chord's own. An added pitch whose pitch class
/// already sounds moves up an octave; anything beyond two octaves above
/// the root is dropped. Sus tags replace the third.
pub fn apply_chord_extensions(
    voicing: &[u8],
    extension: ChordExtension,
    chord: &ResolvedChord,
) -> Vec<u8> {
    let Some(&low) = voicing.first() else {
        return Vec::new();
    };
    let root_pc = chord.root_pc as i32;
    let anchor = voicing
        .iter()
        .map(|p| *p as i32)
        .find(|p| p.rem_euclid(12) == root_pc)
        .unwrap_or_else(|| {
            let low = low as i32;
            low - (low - root_pc).rem_euclid(12)
        });
    let mut out: Vec<i32> = voicing.iter().map(|p| *p as i32).collect();

    let seventh = chord.seventh;
    let added: Vec<i32> = match extension {
        ChordExtension::None => Vec::new(),
        ChordExtension::Add9 => vec![14],
        ChordExtension::Sus2 | ChordExtension::Sus4 => {
            out.retain(|p| !matches!((p - anchor).rem_euclid(12), 3 | 4));
            if extension == ChordExtension::Sus2 {
                vec![2]
            } else {
                vec![5]
            }
        }
        ChordExtension::Seventh => vec![seventh],
        ChordExtension::Ninth => vec![seventh, 14],
        ChordExtension::Eleventh => vec![seventh, 14, 17],
        ChordExtension::Thirteenth => vec![seventh, 14, 21],
    };

    for interval in added {
        let mut pitch = anchor + interval;
        if out.iter().any(|p| (p - pitch).rem_euclid(12) == 0) {
            pitch += 12;
        }
        if pitch - anchor <= EXTENSION_SPAN && (0..=127).contains(&pitch) {
            out.push(pitch);
        }
    }

    out.sort_unstable();
    out.dedup();
    out.into_iter().map(|p| p as u8).collect()
}

fn fold_into_register(pitch: i32) -> u8 {
    let low = CHORD_REGISTER_LOW as i32;
    (low + (pitch - low).rem_euclid(12)) as u8
}

fn strip_any<'a>(s: &'a str, prefixes: &[&str]) -> Option<&'a str> {
    prefixes.iter().find_map(|p| s.strip_prefix(p))
}
