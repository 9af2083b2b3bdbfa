//! Score validation.
//!
//! Checks flat note lists, tracks, and whole compositions for range
//! violations (errors) and suspicious-but-legal content (warnings). Used to
//! regression-test generator output and to vet score documents produced
//! elsewhere.

use crate::error::{
    ErrorCode, ValidationError, ValidationResult, ValidationWarning, WarningCode,
};
use crate::note::{Note, PITCH_BEND_MAX};
use crate::score::CompositionResult;
use crate::track::{Track, PERCUSSION_CHANNEL};

/// Validates a flat note list.
///
/// `path` prefixes the location of every reported problem.
pub fn validate_notes(notes: &[Note], path: &str) -> ValidationResult {
    let mut result = ValidationResult::success();

    for (i, note) in notes.iter().enumerate() {
        let at = format!("{}[{}]", path, i);
        if note.pitch > 127 {
            result.add_error(ValidationError::with_path(
                ErrorCode::PitchOutOfRange,
                format!("pitch {} is outside 0..=127", note.pitch),
                &at,
            ));
        }
        if note.velocity == 0 || note.velocity > 127 {
            result.add_error(ValidationError::with_path(
                ErrorCode::VelocityOutOfRange,
                format!("velocity {} is outside 1..=127", note.velocity),
                &at,
            ));
        }
        if !note.start.is_finite() || note.start < 0.0 {
            result.add_error(ValidationError::with_path(
                ErrorCode::InvalidStart,
                format!("start {} must be finite and >= 0", note.start),
                &at,
            ));
        }
        if !note.duration.is_finite() || note.duration <= 0.0 {
            result.add_error(ValidationError::with_path(
                ErrorCode::InvalidDuration,
                format!("duration {} must be finite and > 0", note.duration),
                &at,
            ));
        }
    }

    for (a, b) in overlapping_pairs(notes) {
        result.add_warning(ValidationWarning::with_path(
            WarningCode::OverlappingNotes,
            format!(
                "pitch {} at beat {:.3} overlaps the note at beat {:.3}",
                notes[b].pitch, notes[b].start, notes[a].start
            ),
            format!("{}[{}]", path, b),
        ));
    }

    result
}

/// Validates one track: its notes, pitch bends, channel, and program.
pub fn validate_track(track: &Track, path: &str) -> ValidationResult {
    let mut result = validate_notes(&track.notes, &format!("{}.notes", path));

    for (i, bend) in track.pitch_bends.iter().enumerate() {
        let at = format!("{}.pitch_bends[{}]", path, i);
        if bend.value > PITCH_BEND_MAX {
            result.add_error(ValidationError::with_path(
                ErrorCode::PitchBendOutOfRange,
                format!("bend value {} is outside 0..={}", bend.value, PITCH_BEND_MAX),
                &at,
            ));
        }
        if !bend.time.is_finite() || bend.time < 0.0 {
            result.add_error(ValidationError::with_path(
                ErrorCode::InvalidPitchBendTime,
                format!("bend time {} must be finite and >= 0", bend.time),
                &at,
            ));
        }
    }

    if track.channel > 15 {
        result.add_error(ValidationError::with_path(
            ErrorCode::ChannelOutOfRange,
            format!("channel {} is outside 0..=15", track.channel),
            format!("{}.channel", path),
        ));
    }
    if track.track_type.is_percussion() != (track.channel == PERCUSSION_CHANNEL) {
        result.add_error(ValidationError::with_path(
            ErrorCode::ReservedChannelMisuse,
            format!(
                "{} track on channel {}; channel {} is reserved for drums",
                track.track_type, track.channel, PERCUSSION_CHANNEL
            ),
            format!("{}.channel", path),
        ));
    }
    if track.program > 127 {
        result.add_error(ValidationError::with_path(
            ErrorCode::ProgramOutOfRange,
            format!("program {} is outside 0..=127", track.program),
            format!("{}.program", path),
        ));
    }
    if track.is_empty() {
        result.add_warning(ValidationWarning::with_path(
            WarningCode::EmptyTrack,
            format!("track '{}' has no notes or pitch bends", track.name),
            path,
        ));
    }

    result
}

/// Validates every track of a composition.
pub fn validate_composition(composition: &CompositionResult) -> ValidationResult {
    let mut result = ValidationResult::success();
    for (i, track) in composition.tracks.iter().enumerate() {
        result.merge(validate_track(track, &format!("tracks[{}]", i)));
    }
    result
}

/// Index pairs `(earlier, later)` of same-pitch notes that overlap in time.
fn overlapping_pairs(notes: &[Note]) -> Vec<(usize, usize)> {
    let mut order: Vec<usize> = (0..notes.len()).collect();
    order.sort_by(|&a, &b| {
        notes[a]
            .pitch
            .cmp(&notes[b].pitch)
            .then(notes[a].start.total_cmp(&notes[b].start))
    });

    let mut pairs = Vec::new();
    for w in order.windows(2) {
        let (a, b) = (w[0], w[1]);
        if notes[a].pitch == notes[b].pitch && notes[b].start < notes[a].end() - 1e-9 {
            pairs.push((a, b));
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::TrackType;
    use pretty_assertions::assert_eq;

    fn track(track_type: TrackType, channel: u8, notes: Vec<Note>) -> Track {
        Track {
            id: format!("{}-0", track_type),
            name: track_type.display_name().to_string(),
            track_type,
            channel,
            program: 0,
            volume: 0.8,
            pan: 0.0,
            muted: false,
            solo: false,
            notes,
            pitch_bends: Vec::new(),
        }
    }

    #[test]
    fn test_valid_notes_pass() {
        let notes = vec![Note::new(60, 0.0, 1.0, 90), Note::new(62, 1.0, 1.0, 90)];
        let result = validate_notes(&notes, "notes");
        assert!(result.is_ok());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_out_of_range_fields_are_errors() {
        let notes = vec![Note {
            pitch: 200,
            start: -1.0,
            duration: 0.0,
            velocity: 0,
        }];
        let result = validate_notes(&notes, "notes");
        let codes: Vec<ErrorCode> = result.errors.iter().map(|e| e.code).collect();
        assert!(codes.contains(&ErrorCode::PitchOutOfRange));
        assert!(codes.contains(&ErrorCode::VelocityOutOfRange));
        assert!(codes.contains(&ErrorCode::InvalidStart));
        assert!(codes.contains(&ErrorCode::InvalidDuration));
    }

    #[test]
    fn test_overlap_is_warning() {
        let notes = vec![Note::new(60, 0.0, 2.0, 90), Note::new(60, 1.0, 1.0, 90)];
        let result = validate_notes(&notes, "notes");
        assert!(result.is_ok());
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].code, WarningCode::OverlappingNotes);
    }

    #[test]
    fn test_reserved_channel_rules() {
        let drums_off_nine = track(TrackType::Drums, 3, vec![Note::new(36, 0.0, 0.25, 100)]);
        assert!(!validate_track(&drums_off_nine, "t").is_ok());

        let bass_on_nine = track(TrackType::Bass, 9, vec![Note::new(36, 0.0, 1.0, 100)]);
        assert!(!validate_track(&bass_on_nine, "t").is_ok());

        let drums = track(TrackType::Drums, 9, vec![Note::new(36, 0.0, 0.25, 100)]);
        assert!(validate_track(&drums, "t").is_ok());
    }

    #[test]
    fn test_empty_track_warns() {
        let empty = track(TrackType::Pad, 2, Vec::new());
        let result = validate_track(&empty, "tracks[0]");
        assert!(result.is_ok());
        assert_eq!(result.warnings[0].code, WarningCode::EmptyTrack);
    }
}
