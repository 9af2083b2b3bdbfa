//! Root-following bassline with optional 808 pitch glides.

use cadenza_spec::{GlideSettings, Note, PitchBendEvent, PITCH_BEND_CENTER};

use super::{GeneratedPart, SectionContext};
use crate::harmony::ResolvedChord;
use crate::rng::RandomSource;

/// Bass notes are folded into C2..B2.
const BASS_LOW: i32 = 36;
/// Delay after a ramp before the wheel returns to center, in beats.
const RESET_DELAY: f64 = 0.02;
const BEND_SPAN: f64 = 8191.0;

/// One note per beat on the lowest tone of the chord in effect. When glide
/// is enabled, weak beats (2 and 4 of the bar) may slide toward the next
/// bass note.
pub fn generate_bass(ctx: &SectionContext<'_>, rng: &mut dyn RandomSource) -> GeneratedPart {
    let beats = ctx.section.beats();
    let mut part = GeneratedPart::default();

    for beat in 0..beats {
        let offset = beat as f64;
        let pitch = bass_pitch(&ctx.chord_at(offset));
        let velocity = if beat % 4 == 0 { 100 } else { 86 };
        let duration = if ctx.params.glide.is_some() { 1.0 } else { 0.9 };

        let note = ctx.perform(Note::new(pitch, offset, duration, velocity), rng);
        part.notes.push(note);

        let Some(glide) = ctx.params.glide.as_ref() else {
            continue;
        };
        if beat % 2 == 1 && rng.chance(glide.probability) {
            let next = if beat + 1 < beats {
                bass_pitch(&ctx.chord_at(offset + 1.0))
            } else {
                pitch
            };
            // Nothing to slide toward on a held note.
            if next == pitch {
                continue;
            }
            let beat_end = ctx.start_beat + offset + 1.0;
            part.pitch_bends.extend(glide_ramp(beat_end, pitch, next, glide));
        }
    }
    part
}

/// Lowest chord tone, folded into the bass octave.
pub fn bass_pitch(chord: &ResolvedChord) -> i32 {
    let lowest = chord.pitches.first().copied().unwrap_or(60) as i32;
    BASS_LOW + (lowest - BASS_LOW).rem_euclid(12)
}

/// Bend value for a glide of `depth` semitones on a synth whose wheel spans
/// `bend_range` semitones. `direction` picks up (> 0) or down.
pub fn bend_target(depth: u8, bend_range: u8, direction: i32) -> i32 {
    let ratio = (depth as f64 / bend_range.max(1) as f64).min(1.0);
    let sign = if direction > 0 { 1.0 } else { -1.0 };
    PITCH_BEND_CENTER as i32 + (sign * ratio * BEND_SPAN).round() as i32
}

/// Ramp from center to the glide target ending at `end`, followed by a
/// reset to center. Slides up when `to` is above `from`, down otherwise.
pub fn glide_ramp(end: f64, from: i32, to: i32, glide: &GlideSettings) -> Vec<PitchBendEvent> {
    let steps = glide.resolution.max(1) as i32;
    let duration = glide.duration_beats.max(0.0);
    let start = (end - duration).max(0.0);
    let direction = if to > from { 1 } else { -1 };
    let target = bend_target(glide.depth_semitones, glide.bend_range, direction);
    let center = PITCH_BEND_CENTER as i32;

    let mut events: Vec<PitchBendEvent> = (0..=steps)
        .map(|k| {
            let frac = k as f64 / steps as f64;
            let value = center + ((target - center) as f64 * frac).round() as i32;
            PitchBendEvent::new(start + duration * frac, value)
        })
        .collect();
    events.push(PitchBendEvent::center(end + RESET_DELAY));
    events
}
