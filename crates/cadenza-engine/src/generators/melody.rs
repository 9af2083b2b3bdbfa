//! Contour-driven melodic lines: melody, lead, and countermelody.
//!
//! Sections are split into 4-bar phrases. A phrase either replays the
//! prompt's motif or is synthesized note by note: the contour picks a
//! target height, a step bias keeps most motion stepwise, and leaps are
//! capped at a fifth.

use cadenza_spec::{Energy, Note};

use super::{GeneratedPart, SectionContext};
use crate::harmony::{degree_pitch, snap_to_scale, step_in_scale};
use crate::rng::RandomSource;

const PHRASE_BEATS: f64 = 16.0;
const MOTIF_REUSE_PROBABILITY: f64 = 0.6;
const STEP_BIAS: f64 = 0.7;
/// Largest interval between consecutive notes, in semitones.
pub const MAX_LEAP: i32 = 7;
/// Lines stay in a two-octave window starting a fourth below the tonic.
const WINDOW_BELOW: i32 = 5;
const WINDOW_SPAN: i32 = 24;
const GRID: f64 = 0.25;
/// Velocity added to the lead over the melody it doubles.
pub const LEAD_BOOST: i32 = 12;

/// Named melodic shape, sampled by linear interpolation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contour {
    Arch,
    Ascending,
    Descending,
    Wave,
    Valley,
}

impl Contour {
    /// Shape used for a section, chosen from its name.
    pub fn for_section(name: &str) -> Self {
        let name = name.to_ascii_lowercase();
        if name.contains("intro") || name.contains("build") || name.starts_with("pre") {
            Contour::Ascending
        } else if name.contains("outro") || name.contains("end") {
            Contour::Descending
        } else if name.contains("verse") {
            Contour::Wave
        } else if name.contains("bridge") || name.contains("breakdown") {
            Contour::Valley
        } else {
            Contour::Arch
        }
    }

    fn points(&self) -> &'static [f64] {
        match self {
            Contour::Arch => &[0.2, 0.5, 0.8, 1.0, 0.8, 0.5, 0.3],
            Contour::Ascending => &[0.1, 0.3, 0.5, 0.7, 0.9],
            Contour::Descending => &[0.9, 0.7, 0.5, 0.3, 0.1],
            Contour::Wave => &[0.3, 0.7, 0.4, 0.8, 0.3],
            Contour::Valley => &[0.8, 0.4, 0.2, 0.4, 0.8],
        }
    }

    /// Height in [0, 1] at a normalized phrase position.
    pub fn value_at(&self, position: f64) -> f64 {
        let points = self.points();
        let x = position.clamp(0.0, 1.0) * (points.len() - 1) as f64;
        let i = x.floor() as usize;
        if i + 1 >= points.len() {
            return points[points.len() - 1];
        }
        let frac = x - i as f64;
        points[i] + (points[i + 1] - points[i]) * frac
    }
}

/// Register, density, and dynamics of one kind of line.
#[derive(Debug, Clone, Copy)]
struct LineStyle {
    density: f64,
    octave: i32,
    velocity_offset: i32,
    invert_contour: bool,
    use_motif: bool,
}

const MELODY: LineStyle = LineStyle {
    density: 1.0,
    octave: 0,
    velocity_offset: 0,
    invert_contour: false,
    use_motif: true,
};

const COUNTERMELODY: LineStyle = LineStyle {
    density: 0.5,
    octave: -1,
    velocity_offset: -10,
    invert_contour: true,
    use_motif: false,
};

pub fn generate_melody(ctx: &SectionContext<'_>, rng: &mut dyn RandomSource) -> GeneratedPart {
    GeneratedPart::from_notes(melodic_line(ctx, rng, &MELODY))
}

/// The melody an octave up with a velocity boost. Given the melody's
/// stream it doubles the melody note for note.
pub fn generate_lead(ctx: &SectionContext<'_>, rng: &mut dyn RandomSource) -> GeneratedPart {
    let notes = melodic_line(ctx, rng, &MELODY)
        .into_iter()
        .map(|n| {
            Note::new(
                n.pitch as i32 + 12,
                n.start,
                n.duration,
                n.velocity as i32 + LEAD_BOOST,
            )
        })
        .collect();
    GeneratedPart::from_notes(notes)
}

/// Sparser line an octave down following the inverse contour.
pub fn generate_countermelody(
    ctx: &SectionContext<'_>,
    rng: &mut dyn RandomSource,
) -> GeneratedPart {
    GeneratedPart::from_notes(melodic_line(ctx, rng, &COUNTERMELODY))
}

fn base_note_count(energy: Energy) -> f64 {
    match energy {
        Energy::Low => 6.0,
        Energy::Medium => 10.0,
        Energy::High => 14.0,
    }
}

fn duration_set(energy: Energy) -> &'static [f64] {
    match energy {
        Energy::Low => &[1.0, 2.0, 1.5],
        Energy::Medium => &[0.5, 1.0, 1.5],
        Energy::High => &[0.25, 0.5, 0.5, 1.0],
    }
}

fn motif_spacing(energy: Energy) -> f64 {
    match energy {
        Energy::Low => 2.0,
        Energy::Medium => 1.0,
        Energy::High => 0.5,
    }
}

fn fold_into_window(pitch: i32, low: i32) -> i32 {
    low + (pitch - low).rem_euclid(WINDOW_SPAN)
}

fn melodic_line(
    ctx: &SectionContext<'_>,
    rng: &mut dyn RandomSource,
    style: &LineStyle,
) -> Vec<Note> {
    let total = ctx.beats();
    let contour = Contour::for_section(&ctx.section.name);
    let mut notes = Vec::new();
    let mut prev: Option<i32> = None;

    let mut phrase_start = 0.0;
    while phrase_start < total {
        let phrase_len = PHRASE_BEATS.min(total - phrase_start);
        let motif = ctx
            .params
            .motif
            .as_deref()
            .filter(|m| style.use_motif && !m.is_empty());

        match motif {
            Some(motif) if rng.chance(MOTIF_REUSE_PROBABILITY) => {
                let phrase = motif_phrase(ctx, rng, style, motif, phrase_start, phrase_len);
                prev = phrase.last().map(|n| n.pitch as i32).or(prev);
                notes.extend(phrase);
            }
            _ => {
                prev = synthesize_phrase(
                    ctx,
                    rng,
                    style,
                    contour,
                    phrase_start,
                    phrase_len,
                    prev,
                    &mut notes,
                );
            }
        }
        phrase_start += PHRASE_BEATS;
    }
    notes
}

/// Replays the motif, transposed into the current key and register,
/// cycling it until the phrase is full.
fn motif_phrase(
    ctx: &SectionContext<'_>,
    rng: &mut dyn RandomSource,
    style: &LineStyle,
    motif: &[u8],
    phrase_start: f64,
    phrase_len: f64,
) -> Vec<Note> {
    let key_shift = ctx.key_pc as i32 - ctx.params.key_pc as i32;
    let low = ctx.tonic_pitch(style.octave) - WINDOW_BELOW;
    let spacing = motif_spacing(ctx.energy());
    let velocity = 80 + style.velocity_offset;

    let mut notes = Vec::new();
    let mut t = 0.0;
    for pitch in motif.iter().cycle() {
        if t >= phrase_len {
            break;
        }
        let pitch = fold_into_window(*pitch as i32 + key_shift, low);
        let hold = spacing.min(phrase_len - t) * 0.9;
        let note = Note::new(pitch, phrase_start + t, hold, velocity);
        notes.push(ctx.perform(note, rng));
        t += spacing;
    }
    notes
}

#[allow(clippy::too_many_arguments)]
fn synthesize_phrase(
    ctx: &SectionContext<'_>,
    rng: &mut dyn RandomSource,
    style: &LineStyle,
    contour: Contour,
    phrase_start: f64,
    phrase_len: f64,
    mut prev: Option<i32>,
    notes: &mut Vec<Note>,
) -> Option<i32> {
    let energy = ctx.energy();
    let count = (base_note_count(energy)
        * ctx.params.density.note_factor()
        * style.density
        * phrase_len
        / PHRASE_BEATS)
        .round()
        .max(1.0) as usize;
    let slot = ((phrase_len / count as f64) / GRID).round().max(1.0) * GRID;
    let durations = duration_set(energy);

    let tonic = ctx.tonic_pitch(style.octave);
    let low = tonic - WINDOW_BELOW;
    let degrees = ctx.scale.intervals().len() as f64;

    let mut t = 0.0;
    for _ in 0..count {
        if t >= phrase_len {
            break;
        }
        let position = t / phrase_len;
        let mut height = contour.value_at(position);
        if style.invert_contour {
            height = 1.0 - height;
        }
        let target = degree_pitch(tonic, ctx.scale, (height * degrees).round() as i32);

        let mut pitch = match prev {
            None => target,
            Some(p) if rng.chance(STEP_BIAS) => {
                let direction = if target > p {
                    1
                } else if target < p {
                    -1
                } else if rng.chance(0.5) {
                    1
                } else {
                    -1
                };
                step_in_scale(p, ctx.key_pc, ctx.scale, direction)
            }
            Some(p) => snap_to_scale(target + rng.range_i32(-2, 2), ctx.key_pc, ctx.scale, p),
        };

        pitch = fold_into_window(pitch, low);
        if let Some(p) = prev {
            if (pitch - p).abs() > MAX_LEAP {
                let direction = (pitch - p).signum();
                let mut clamped = p + MAX_LEAP * direction;
                while clamped != p && !ctx.scale.contains_offset(clamped - ctx.key_pc as i32) {
                    clamped -= direction;
                }
                pitch = clamped;
            }
        }

        let step = durations[rng.index(durations.len())];
        let hold = (step.min(phrase_len - t) * 0.9 * (1.0 + rng.jitter(0.05))).max(GRID / 2.0);
        let velocity = 64.0 + height * 30.0 + position * 12.0 + style.velocity_offset as f64;

        let note = Note::new(pitch, phrase_start + t, hold, velocity.round() as i32);
        notes.push(ctx.perform(note, rng));

        prev = Some(pitch);
        t += step.max(slot);
    }
    prev
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contour_interpolates() {
        assert!((Contour::Arch.value_at(0.0) - 0.2).abs() < 1e-9);
        assert!((Contour::Arch.value_at(0.5) - 1.0).abs() < 1e-9);
        assert!((Contour::Arch.value_at(1.0) - 0.3).abs() < 1e-9);
        // Halfway between the first two points of Ascending.
        assert!((Contour::Ascending.value_at(0.125) - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_contour_for_section() {
        assert_eq!(Contour::for_section("Intro"), Contour::Ascending);
        assert_eq!(Contour::for_section("verse"), Contour::Wave);
        assert_eq!(Contour::for_section("hook"), Contour::Arch);
        assert_eq!(Contour::for_section("bridge"), Contour::Valley);
        assert_eq!(Contour::for_section("outro"), Contour::Descending);
    }

    #[test]
    fn test_fold_into_window() {
        assert_eq!(fold_into_window(90, 55), 66);
        assert_eq!(fold_into_window(40, 55), 64);
        assert_eq!(fold_into_window(60, 55), 60);
    }
}
