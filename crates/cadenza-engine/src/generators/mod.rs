//! Per-section track generators.
//!
//! Every generator is a plain function of a [`SectionContext`] and a random
//! stream. The assembler picks one through [`generator_for`], so adding a
//! track type is a compile error until it has a generator.

mod bass;
mod chords;
mod drums;
mod layers;
mod melody;


pub use bass::generate_bass;
pub use chords::generate_chords;
pub use drums::generate_drums;
pub use layers::{generate_arp, generate_pad};
pub use melody::{generate_countermelody, generate_lead, generate_melody, Contour};

use cadenza_spec::{
    CompositionParams, Energy, HumanizeSettings, Note, PitchBendEvent, Scale, Section, TrackType,
};

use crate::harmony::{chord_index_at, resolve_chord, ResolvedChord};
use crate::humanize;
use crate::rng::RandomSource;

/// Fallback progression when the parameter record carries none.
const FALLBACK_PROGRESSION: &str = "I";

/// Notes and pitch bends produced for one track in one section.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneratedPart {
    pub notes: Vec<Note>,
    pub pitch_bends: Vec<PitchBendEvent>,
}

impl GeneratedPart {
    pub fn from_notes(notes: Vec<Note>) -> Self {
        Self {
            notes,
            pitch_bends: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty() && self.pitch_bends.is_empty()
    }
}

/// Signature shared by all generators.
pub type GeneratorFn = fn(&SectionContext<'_>, &mut dyn RandomSource) -> GeneratedPart;

/// Generator for a track type.
pub fn generator_for(track_type: TrackType) -> GeneratorFn {
    match track_type {
        TrackType::Melody => generate_melody,
        TrackType::Chords => generate_chords,
        TrackType::Bass => generate_bass,
        TrackType::Drums => generate_drums,
        TrackType::Arp => generate_arp,
        TrackType::Pad => generate_pad,
        TrackType::Lead => generate_lead,
        TrackType::Countermelody => generate_countermelody,
    }
}

/// One chord of the progression as it falls inside a section.
#[derive(Debug, Clone, PartialEq)]
pub struct ChordSlot {
    /// Start, in beats from the section start.
    pub offset: f64,
    /// Length in beats (shorter than `beats_per_chord` at a section end).
    pub length: f64,
    pub chord: ResolvedChord,
}

/// Read-only view of everything a generator needs for one section.
#[derive(Debug, Clone)]
pub struct SectionContext<'a> {
    pub params: &'a CompositionParams,
    pub section: &'a Section,
    /// Position of the section in the structure.
    pub section_index: usize,
    /// Absolute beat at which the section begins.
    pub start_beat: f64,
    /// Tonic pitch class in effect (after modulation).
    pub key_pc: u8,
    /// Scale in effect (after modulation).
    pub scale: Scale,
}

impl<'a> SectionContext<'a> {
    /// Context in the home key.
    pub fn new(
        params: &'a CompositionParams,
        section: &'a Section,
        section_index: usize,
        start_beat: f64,
    ) -> Self {
        Self {
            params,
            section,
            section_index,
            start_beat,
            key_pc: params.key_pc,
            scale: params.scale,
        }
    }

    /// Overrides the key and scale for a modulated section.
    pub fn with_key(mut self, key_pc: u8, scale: Scale) -> Self {
        self.key_pc = key_pc % 12;
        self.scale = scale;
        self
    }

    /// Section length in beats.
    pub fn beats(&self) -> f64 {
        self.section.beats() as f64
    }

    pub fn energy(&self) -> Energy {
        self.params.energy
    }

    pub fn swing(&self) -> f64 {
        self.params.swing
    }

    pub fn humanize_settings(&self) -> HumanizeSettings {
        self.params.humanize.settings()
    }

    pub fn beats_per_chord(&self) -> u32 {
        self.params.beats_per_chord.max(1)
    }

    /// Lowest tonic at or above C4 in the current key.
    pub fn tonic_pitch(&self, octave_offset: i32) -> i32 {
        60 + self.key_pc as i32 + 12 * octave_offset
    }

    /// Roman-numeral token in effect at a beat offset within the section.
    pub fn progression_token(&self, beat: f64) -> &str {
        let progression = &self.params.progression;
        if progression.is_empty() {
            return FALLBACK_PROGRESSION;
        }
        let idx = chord_index_at(beat, self.beats_per_chord(), progression.len());
        progression[idx].as_str()
    }

    /// Chord in effect at a beat offset within the section.
    pub fn chord_at(&self, beat: f64) -> ResolvedChord {
        resolve_chord(self.progression_token(beat), self.scale, self.key_pc)
    }

    /// Progression slots covering the section, in order.
    pub fn chord_slots(&self) -> Vec<ChordSlot> {
        let step = self.beats_per_chord() as f64;
        let total = self.beats();
        let mut slots = Vec::new();
        let mut offset = 0.0;
        while offset < total {
            let length = step.min(total - offset);
            slots.push(ChordSlot {
                offset,
                length,
                chord: self.chord_at(offset),
            });
            offset += step;
        }
        slots
    }

    /// Places a note generated at a section-relative grid position on the
    /// song timeline, applying swing and humanization.
    pub fn perform(&self, note: Note, rng: &mut dyn RandomSource) -> Note {
        let absolute = Note {
            start: note.start + self.start_beat,
            ..note
        };
        humanize::perform(absolute, self.swing(), &self.humanize_settings(), rng)
    }
}
