//! Kick, snare, and hi-hat grooves on General MIDI percussion notes.

use cadenza_spec::{Energy, GrooveProfile, Note};

use super::{GeneratedPart, SectionContext};
use crate::rng::RandomSource;

pub const KICK: i32 = 36;
pub const SNARE: i32 = 38;
pub const CLOSED_HAT: i32 = 42;

const STRAIGHT_KICKS: [f64; 2] = [0.0, 2.0];
const EXTRA_KICK_POSITIONS: [f64; 3] = [1.5, 2.5, 3.5];
const SNARE_BEATS: [f64; 2] = [1.0, 3.0];
const TRIPLET_FILL_PROBABILITY: f64 = 0.25;
const TRIPLET_FILL_START: f64 = 3.0;

const HIT: f64 = 0.25;
const HAT_HIT: f64 = 0.1;

fn extra_kick_probability(energy: Energy) -> f64 {
    match energy {
        Energy::Low => 0.3,
        Energy::Medium => 0.5,
        Energy::High => 0.7,
    }
}

/// Kick positions within a bar, in beats.
///
/// A meter grouping (in eighths, e.g. `[3, 3, 2]`) places a kick at the
/// start of each group and replaces the straight pattern entirely.
pub fn kick_positions(
    groove: &GrooveProfile,
    energy: Energy,
    rng: &mut dyn RandomSource,
) -> Vec<f64> {
    if let Some(grouping) = groove.meter_grouping.as_ref().filter(|g| !g.is_empty()) {
        let mut positions = Vec::with_capacity(grouping.len());
        let mut eighths = 0u32;
        for group in grouping {
            let beat = eighths as f64 / 2.0;
            if beat >= 4.0 {
                break;
            }
            positions.push(beat);
            eighths += *group as u32;
        }
        return positions;
    }

    let mut positions = STRAIGHT_KICKS.to_vec();
    if rng.chance(extra_kick_probability(energy)) {
        positions.push(EXTRA_KICK_POSITIONS[rng.index(EXTRA_KICK_POSITIONS.len())]);
    }
    positions
}

/// Hi-hat velocities for one bar; ghosting alternates accent and ghost.
fn hat_velocity(index: usize, on_beat: bool, ghost_notes: bool) -> i32 {
    if ghost_notes {
        if index % 2 == 0 {
            80
        } else {
            45
        }
    } else if on_beat {
        84
    } else {
        72
    }
}

pub fn generate_drums(ctx: &SectionContext<'_>, rng: &mut dyn RandomSource) -> GeneratedPart {
    let groove = &ctx.params.groove;
    let hat_step = if groove.hihat_resolution >= 16 { 0.25 } else { 0.5 };
    let hats_per_bar = (4.0 / hat_step) as usize;
    let mut notes = Vec::new();

    for bar in 0..ctx.section.bars {
        let bar_start = (bar * 4) as f64;

        for (i, position) in kick_positions(groove, ctx.energy(), rng).into_iter().enumerate() {
            let velocity = if i == 0 { 110 } else { 96 };
            let note = Note::new(KICK, bar_start + position, HIT, velocity);
            notes.push(ctx.perform(note, rng));
        }

        let fill = groove.triplets && rng.chance(TRIPLET_FILL_PROBABILITY);
        for beat in SNARE_BEATS {
            if fill && beat >= TRIPLET_FILL_START {
                continue;
            }
            let note = Note::new(SNARE, bar_start + beat, HIT, 100);
            notes.push(ctx.perform(note, rng));
        }
        if fill {
            for k in 0..3 {
                let position = TRIPLET_FILL_START + k as f64 / 3.0;
                let note = Note::new(SNARE, bar_start + position, 1.0 / 3.0 * 0.8, 72 + k * 10);
                notes.push(ctx.perform(note, rng));
            }
        }

        for i in 0..hats_per_bar {
            let position = i as f64 * hat_step;
            let on_beat = position.fract() == 0.0;
            let velocity = hat_velocity(i, on_beat, groove.ghost_notes);
            let note = Note::new(CLOSED_HAT, bar_start + position, HAT_HIT, velocity);
            notes.push(ctx.perform(note, rng));
        }
    }

    notes.sort_by(|a, b| a.start.total_cmp(&b.start).then(a.pitch.cmp(&b.pitch)));
    GeneratedPart::from_notes(notes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedRng;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_straight_kicks_without_extra() {
        let mut rng = ScriptedRng::constant(0.99);
        let kicks = kick_positions(&GrooveProfile::default(), Energy::Medium, &mut rng);
        assert_eq!(kicks, vec![0.0, 2.0]);
    }

    #[test]
    fn test_extra_kick_drawn_from_offbeats() {
        let mut rng = ScriptedRng::new(vec![0.1, 0.5]);
        let kicks = kick_positions(&GrooveProfile::default(), Energy::High, &mut rng);
        assert_eq!(kicks, vec![0.0, 2.0, 2.5]);
    }

    #[test]
    fn test_meter_grouping_replaces_pattern() {
        let groove = GrooveProfile {
            meter_grouping: Some(vec![3, 3, 2]),
            ..GrooveProfile::default()
        };
        let mut rng = ScriptedRng::constant(0.0);
        assert_eq!(kick_positions(&groove, Energy::High, &mut rng), vec![0.0, 1.5, 3.0]);
    }

    #[test]
    fn test_ghost_velocities_alternate() {
        assert_eq!(hat_velocity(0, true, true), 80);
        assert_eq!(hat_velocity(1, false, true), 45);
        assert_eq!(hat_velocity(1, false, false), 72);
    }
}
