//! Derived harmonic layers: arpeggio and pad.

use cadenza_spec::{ChordExtension, Energy, Note};

use super::{GeneratedPart, SectionContext};
use crate::harmony::{apply_chord_extensions, ResolvedChord};
use crate::rng::RandomSource;
use crate::voice_leading::voice_lead_chord;

/// Pads hold each chord this long (shorter at a section end).
pub const PAD_SPAN_BEATS: f64 = 8.0;
const PAD_VELOCITY: i32 = 70;
const PAD_FALLOFF: i32 = 5;

/// Arp step in beats.
fn arp_speed(energy: Energy) -> f64 {
    match energy {
        Energy::Low => 0.5,
        Energy::Medium | Energy::High => 0.25,
    }
}

fn arp_octaves(energy: Energy) -> i32 {
    match energy {
        Energy::Low => 1,
        Energy::Medium | Energy::High => 2,
    }
}

/// Up-then-down pattern over `octaves` octaves; the turnaround notes are
/// not repeated.
pub fn arp_pattern(chord: &[u8], octaves: i32) -> Vec<i32> {
    let mut up: Vec<i32> = (0..octaves.max(1))
        .flat_map(|o| chord.iter().map(move |p| *p as i32 + 12 * o))
        .collect();
    up.sort_unstable();
    up.dedup();
    if up.len() < 3 {
        return up;
    }
    let down: Vec<i32> = up[1..up.len() - 1].iter().rev().copied().collect();
    up.extend(down);
    up
}

/// Arpeggiates each slot's chord an octave above the chord register.
pub fn generate_arp(ctx: &SectionContext<'_>, rng: &mut dyn RandomSource) -> GeneratedPart {
    let speed = arp_speed(ctx.energy());
    let octaves = arp_octaves(ctx.energy());
    let mut notes = Vec::new();

    for slot in ctx.chord_slots() {
        let raised: Vec<u8> = slot.chord.pitches.iter().map(|p| p + 12).collect();
        let pattern = arp_pattern(&raised, octaves);
        if pattern.is_empty() {
            continue;
        }
        let mut t = 0.0;
        let mut i = 0;
        while t < slot.length {
            let velocity = if i % pattern.len() == 0 { 82 } else { 70 };
            let note = Note::new(
                pattern[i % pattern.len()],
                slot.offset + t,
                speed * 0.9,
                velocity,
            );
            notes.push(ctx.perform(note, rng));
            t += speed;
            i += 1;
        }
    }

    GeneratedPart::from_notes(notes)
}

/// Sustained, voice-led extended chords an octave below the chord
/// register, one per progression slot. Consecutive slots on the same
/// numeral merge into one held chord of up to [`PAD_SPAN_BEATS`]. Higher
/// voices play softer.
pub fn generate_pad(ctx: &SectionContext<'_>, rng: &mut dyn RandomSource) -> GeneratedPart {
    let extension = match ctx.params.chord_extension {
        ChordExtension::None => ChordExtension::Add9,
        other => other,
    };
    let mut notes = Vec::new();
    let mut prev: Vec<u8> = Vec::new();

    for (offset, hold, chord) in pad_spans(ctx) {
        let lowered: Vec<u8> = chord.pitches.iter().map(|p| p - 12).collect();
        let voicing = apply_chord_extensions(&lowered, extension, &chord);
        let voiced = voice_lead_chord(&voicing, &prev);

        for (i, pitch) in voiced.iter().enumerate() {
            let velocity = PAD_VELOCITY - i as i32 * PAD_FALLOFF;
            let note = Note::new(*pitch as i32, offset, hold * 0.98, velocity);
            notes.push(ctx.perform(note, rng));
        }
        prev = voiced;
    }

    GeneratedPart::from_notes(notes)
}

/// `(offset, length, chord)` of each held pad chord.
fn pad_spans(ctx: &SectionContext<'_>) -> Vec<(f64, f64, ResolvedChord)> {
    let mut spans: Vec<(f64, f64, ResolvedChord)> = Vec::new();
    let mut last_token: Option<&str> = None;
    for slot in ctx.chord_slots() {
        let token = ctx.progression_token(slot.offset);
        if let Some((_, length, _)) = spans.last_mut() {
            if last_token == Some(token) && *length + slot.length <= PAD_SPAN_BEATS {
                *length += slot.length;
                continue;
            }
        }
        spans.push((slot.offset, slot.length, slot.chord));
        last_token = Some(token);
    }
    spans
}
