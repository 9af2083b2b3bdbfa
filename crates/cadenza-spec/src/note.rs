//! Note and pitch-bend events plus pitch-name helpers.
//!
//! All times are in beats (quarter notes) from the start of the song.

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Shortest duration a stored note may have, in beats.
pub const MIN_NOTE_DURATION: f64 = 0.01;

/// Center (rest) position of the 14-bit pitch wheel.
pub const PITCH_BEND_CENTER: u16 = 8192;

/// Largest 14-bit pitch-bend value.
pub const PITCH_BEND_MAX: u16 = 16383;

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// A single note event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Note {
    /// MIDI pitch (0-127).
    pub pitch: u8,
    /// Start time in beats (>= 0).
    pub start: f64,
    /// Duration in beats (> 0).
    pub duration: f64,
    /// MIDI velocity (1-127).
    pub velocity: u8,
}

impl Note {
    /// Builds a note, folding and clamping every field into its valid range.
    ///
    /// Pitches outside 0..=127 are octave-folded rather than clipped so the
    /// pitch class survives. Start is clamped to zero, duration to
    /// [`MIN_NOTE_DURATION`], velocity to 1..=127.
    pub fn new(pitch: i32, start: f64, duration: f64, velocity: i32) -> Self {
        let start = if start.is_finite() { start.max(0.0) } else { 0.0 };
        let duration = if duration.is_finite() {
            duration.max(MIN_NOTE_DURATION)
        } else {
            MIN_NOTE_DURATION
        };
        Self {
            pitch: fold_pitch(pitch),
            start,
            duration,
            velocity: clamp_velocity(velocity),
        }
    }

    /// End time in beats.
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// A pitch-wheel event. 8192 is center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PitchBendEvent {
    /// Time in beats.
    pub time: f64,
    /// 14-bit bend value (0-16383).
    pub value: u16,
}

impl PitchBendEvent {
    pub fn new(time: f64, value: i32) -> Self {
        Self {
            time: if time.is_finite() { time.max(0.0) } else { 0.0 },
            value: value.clamp(0, PITCH_BEND_MAX as i32) as u16,
        }
    }

    pub fn center(time: f64) -> Self {
        Self::new(time, PITCH_BEND_CENTER as i32)
    }
}

/// Octave-folds an arbitrary pitch into 0..=127.
pub fn fold_pitch(pitch: i32) -> u8 {
    let mut p = pitch;
    while p > 127 {
        p -= 12;
    }
    while p < 0 {
        p += 12;
    }
    p as u8
}

/// Clamps a velocity into 1..=127.
pub fn clamp_velocity(velocity: i32) -> u8 {
    velocity.clamp(1, 127) as u8
}

/// Parse a pitch class name (e.g., "C", "F#", "Bb") into a semitone value (0-11).
pub fn parse_pitch_class(name: &str) -> Result<u8, ParseError> {
    let trimmed = name.trim();
    let mut chars = trimmed.chars();
    let base: i32 = match chars.next().map(|c| c.to_ascii_uppercase()) {
        Some('C') => 0,
        Some('D') => 2,
        Some('E') => 4,
        Some('F') => 5,
        Some('G') => 7,
        Some('A') => 9,
        Some('B') => 11,
        _ => return Err(ParseError::InvalidPitchClass(trimmed.to_string())),
    };

    let accidental = match chars.as_str() {
        "" => 0,
        "#" | "♯" | "s" => 1,
        "b" | "♭" => -1,
        _ => return Err(ParseError::InvalidPitchClass(trimmed.to_string())),
    };

    Ok((base + accidental).rem_euclid(12) as u8)
}

/// Parse a note name with optional octave (e.g., "C4", "F#3", "Bb") into a
/// MIDI number. A missing octave means octave 4 (C4 = 60).
pub fn parse_note_name(name: &str) -> Option<u8> {
    let name = name.trim();
    let split = name
        .char_indices()
        .find(|(_, c)| c.is_ascii_digit() || *c == '-')
        .map(|(i, _)| i)
        .unwrap_or(name.len());
    let (pc_str, octave_str) = name.split_at(split);
    let pc = parse_pitch_class(pc_str).ok()? as i32;
    let octave: i32 = if octave_str.is_empty() {
        4
    } else {
        octave_str.parse().ok()?
    };

    // MIDI note = (octave + 1) * 12 + semitone
    let midi = (octave + 1) * 12 + pc;
    if (0..=127).contains(&midi) {
        Some(midi as u8)
    } else {
        None
    }
}

/// Name of a pitch class, sharps only (e.g., 6 -> "F#").
pub fn pitch_class_name(pc: u8) -> &'static str {
    NOTE_NAMES[(pc % 12) as usize]
}

/// Convert a MIDI note number to a note name (e.g., 60 -> "C4").
pub fn midi_to_note_name(midi: u8) -> String {
    let octave = (midi / 12) as i32 - 1;
    format!("{}{}", pitch_class_name(midi), octave)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_note_new_clamps() {
        let note = Note::new(130, -1.0, 0.0, 200);
        assert_eq!(note.pitch, 118);
        assert_eq!(note.start, 0.0);
        assert_eq!(note.duration, MIN_NOTE_DURATION);
        assert_eq!(note.velocity, 127);

        let note = Note::new(-5, 1.0, 0.5, 0);
        assert_eq!(note.pitch, 7);
        assert_eq!(note.velocity, 1);
    }

    #[test]
    fn test_pitch_bend_clamps() {
        assert_eq!(PitchBendEvent::new(0.0, 20000).value, PITCH_BEND_MAX);
        assert_eq!(PitchBendEvent::new(0.0, -3).value, 0);
        assert_eq!(PitchBendEvent::center(1.0).value, PITCH_BEND_CENTER);
    }

    #[test]
    fn test_parse_pitch_class() {
        assert_eq!(parse_pitch_class("C").unwrap(), 0);
        assert_eq!(parse_pitch_class("F#").unwrap(), 6);
        assert_eq!(parse_pitch_class("Bb").unwrap(), 10);
        assert_eq!(parse_pitch_class("cb").unwrap(), 11);
        assert!(parse_pitch_class("H").is_err());
        assert!(parse_pitch_class("C##").is_err());
    }

    #[test]
    fn test_parse_note_name() {
        assert_eq!(parse_note_name("C4"), Some(60));
        assert_eq!(parse_note_name("A4"), Some(69));
        assert_eq!(parse_note_name("F#3"), Some(54));
        assert_eq!(parse_note_name("E"), Some(64));
        assert_eq!(parse_note_name("C-1"), Some(0));
        assert_eq!(parse_note_name("G9"), Some(127));
        assert_eq!(parse_note_name("X4"), None);
    }

    #[test]
    fn test_midi_to_note_name() {
        assert_eq!(midi_to_note_name(60), "C4");
        assert_eq!(midi_to_note_name(61), "C#4");
        assert_eq!(midi_to_note_name(21), "A0");
    }
}
