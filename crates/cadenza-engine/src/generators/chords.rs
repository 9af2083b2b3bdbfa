//! Block chords, one per progression slot.

use cadenza_spec::Note;

use super::{GeneratedPart, SectionContext};
use crate::harmony::apply_chord_extensions;
use crate::rng::RandomSource;
use crate::voice_leading::voice_lead_chord;

const CHORD_VELOCITY: i32 = 78;
const LEGATO: f64 = 0.95;

/// Each slot's chord is extended with the prompt's extension tag, voice-led
/// from the previous slot, and held for the slot.
pub fn generate_chords(ctx: &SectionContext<'_>, rng: &mut dyn RandomSource) -> GeneratedPart {
    let mut notes = Vec::new();
    let mut prev: Vec<u8> = Vec::new();

    for slot in ctx.chord_slots() {
        let voicing =
            apply_chord_extensions(&slot.chord.pitches, ctx.params.chord_extension, &slot.chord);
        let voiced = voice_lead_chord(&voicing, &prev);
        for (i, pitch) in voiced.iter().enumerate() {
            // Top voice speaks slightly over the inner voices.
            let accent = if i + 1 == voiced.len() { 6 } else { 0 };
            let note = Note::new(
                *pitch as i32,
                slot.offset,
                slot.length * LEGATO,
                CHORD_VELOCITY + accent,
            );
            notes.push(ctx.perform(note, rng));
        }
        prev = voiced;
    }

    GeneratedPart::from_notes(notes)
}
