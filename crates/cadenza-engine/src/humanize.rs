//! Swing timing and humanization jitter.

use cadenza_spec::{HumanizeSettings, Note};

use crate::rng::RandomSource;

/// Swing ratios are clamped into this range before use.
pub const MIN_SWING: f64 = 0.5;
pub const MAX_SWING: f64 = 0.8;

const GRID_EPSILON: f64 = 1e-6;

/// Delay, in beats, that swing adds to a note starting at `position`.
///
/// Off-beat eighths (x.5) move by `swing - 0.5`; off-beat sixteenths
/// (x.25, x.75) move by half that. Everything else is left alone.
pub fn swing_offset(position: f64, swing: f64) -> f64 {
    let swing = swing.clamp(MIN_SWING, MAX_SWING);
    let frac = position - position.floor();
    if (frac - 0.5).abs() < GRID_EPSILON {
        swing - 0.5
    } else if (frac - 0.25).abs() < GRID_EPSILON || (frac - 0.75).abs() < GRID_EPSILON {
        (swing - 0.5) * 0.5
    } else {
        0.0
    }
}

/// `position` with swing applied.
pub fn swung(position: f64, swing: f64) -> f64 {
    position + swing_offset(position, swing)
}

/// Applies timing and velocity jitter to a note.
///
/// Start moves by up to `timing_jitter` either way plus the profile's
/// late bias and never goes below zero; velocity moves by up to
/// `velocity_jitter` and is re-clamped into 1..=127.
pub fn humanize(note: Note, settings: &HumanizeSettings, rng: &mut dyn RandomSource) -> Note {
    let start = note.start + rng.jitter(settings.timing_jitter) + settings.late_bias;
    let velocity = note.velocity as i32
        + rng.range_i32(-settings.velocity_jitter, settings.velocity_jitter);
    Note::new(note.pitch as i32, start, note.duration, velocity)
}

/// Swing then humanize a note generated on the grid.
pub fn perform(
    note: Note,
    swing: f64,
    settings: &HumanizeSettings,
    rng: &mut dyn RandomSource,
) -> Note {
    let placed = Note {
        start: swung(note.start, swing),
        ..note
    };
    humanize(placed, settings, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedRng;
    use cadenza_spec::HumanizeProfile;

    #[test]
    fn test_swing_offsets() {
        assert_eq!(swing_offset(0.0, 0.6), 0.0);
        assert!((swing_offset(0.5, 0.6) - 0.1).abs() < 1e-9);
        assert!((swing_offset(2.75, 0.6) - 0.05).abs() < 1e-9);
        assert_eq!(swing_offset(0.5, 0.5), 0.0);
    }

    #[test]
    fn test_swing_is_clamped() {
        assert!((swing_offset(0.5, 0.95) - 0.3).abs() < 1e-9);
        assert_eq!(swing_offset(0.5, 0.2), 0.0);
    }

    #[test]
    fn test_more_swing_is_later() {
        assert!(swung(1.5, 0.6) > swung(1.5, 0.5));
    }

    #[test]
    fn test_humanize_none_is_identity() {
        let note = Note::new(60, 1.0, 0.5, 90);
        let mut rng = ScriptedRng::constant(0.9);
        let out = humanize(note, &HumanizeProfile::None.settings(), &mut rng);
        assert_eq!(out, note);
    }

    #[test]
    fn test_humanize_stays_within_bounds() {
        let settings = HumanizeProfile::Drunk.settings();
        let note = Note::new(60, 0.0, 0.5, 126);
        let mut rng = ScriptedRng::new(vec![0.0, 0.99, 0.5, 0.25]);
        for _ in 0..8 {
            let out = humanize(note, &settings, &mut rng);
            assert!(out.start >= 0.0);
            assert!(out.start <= settings.timing_jitter + settings.late_bias + 1e-9);
            assert!((1..=127).contains(&out.velocity));
        }
    }

    #[test]
    fn test_perform_swings_before_jitter() {
        let note = Note::new(64, 0.5, 0.25, 80);
        let mut rng = ScriptedRng::constant(0.5);
        let out = perform(note, 0.66, &HumanizeProfile::None.settings(), &mut rng);
        assert!((out.start - 0.66).abs() < 1e-9);
    }
}
