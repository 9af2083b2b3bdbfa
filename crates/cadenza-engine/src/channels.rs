//! MIDI channel allocation and track consolidation.
//!
//! Generators fill one buffer per (channel, track type, instance) section by
//! section. [`consolidate`] turns the buffers into the final ordered track
//! list and resolves every track's program.

use std::collections::BTreeMap;

use tracing::debug;

use cadenza_spec::{
    InstrumentPrograms, ProgramChoice, Track, TrackType, PERCUSSION_CHANNEL,
};

use crate::generators::GeneratedPart;
use crate::rng::RandomSource;

/// Channels handed to non-percussion tracks, in round-robin order.
pub const MELODIC_CHANNELS: [u8; 15] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 10, 11, 12, 13, 14, 15];

/// Program used when a role has neither an override nor a preset.
const FALLBACK_PROGRAM: u8 = 0;

/// Round-robin channel allocator. Create one per composition.
#[derive(Debug, Clone, Default)]
pub struct ChannelAllocator {
    next: usize,
}

impl ChannelAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Channel for the next track of `track_type`. Percussion always gets
    /// the reserved channel; everything else cycles through
    /// [`MELODIC_CHANNELS`].
    pub fn assign(&mut self, track_type: TrackType) -> u8 {
        if track_type.is_percussion() {
            return PERCUSSION_CHANNEL;
        }
        let channel = MELODIC_CHANNELS[self.next % MELODIC_CHANNELS.len()];
        self.next += 1;
        channel
    }
}

/// Identity of one output track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BufferKey {
    pub channel: u8,
    pub track_type: TrackType,
    /// 0 for the first track of a type, 1 for the second, ...
    pub instance: usize,
}

impl BufferKey {
    pub fn new(channel: u8, track_type: TrackType, instance: usize) -> Self {
        Self {
            channel,
            track_type,
            instance,
        }
    }

    /// Stable id, e.g. "melody-0".
    pub fn id(&self) -> String {
        format!("{}-{}", self.track_type.as_str(), self.instance)
    }

    /// Salt of the track's RNG streams. A lead doubles the melody of the
    /// same instance, so it draws from the melody's stream.
    pub fn stream_salt(&self) -> String {
        let track_type = match self.track_type {
            TrackType::Lead => TrackType::Melody,
            other => other,
        };
        format!("{}-{}", track_type.as_str(), self.instance)
    }

    /// Display name, e.g. "Melody" or "Melody 2".
    pub fn name(&self) -> String {
        match self.instance {
            0 => self.track_type.display_name().to_string(),
            n => format!("{} {}", self.track_type.display_name(), n + 1),
        }
    }
}

/// Note and pitch-bend buffers accumulated across sections.
#[derive(Debug, Clone, Default)]
pub struct SectionBuffers {
    parts: BTreeMap<BufferKey, GeneratedPart>,
}

impl SectionBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one section's output. Call in section order.
    pub fn append(&mut self, key: BufferKey, part: GeneratedPart) {
        let entry = self.parts.entry(key).or_default();
        entry.notes.extend(part.notes);
        entry.pitch_bends.extend(part.pitch_bends);
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

/// Explicit program choices, checked before the prompt's presets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramOverrides {
    /// Per-track program from an explicit track request.
    pub by_track: BTreeMap<BufferKey, u8>,
    /// Per-role program from the caller's instrument overrides.
    pub by_role: BTreeMap<TrackType, u8>,
}

impl ProgramOverrides {
    fn lookup(&self, key: &BufferKey) -> Option<u8> {
        self.by_track
            .get(key)
            .or_else(|| self.by_role.get(&key.track_type))
            .copied()
    }
}

/// Final tracks plus the program each one was given, keyed by track id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Consolidated {
    pub tracks: Vec<Track>,
    pub programs: BTreeMap<String, u8>,
}

/// Resolves a program from a preset choice. Pools pick one entry at random.
pub fn resolve_program(choice: Option<&ProgramChoice>, rng: &mut dyn RandomSource) -> u8 {
    match choice {
        Some(ProgramChoice::Fixed(program)) => *program,
        Some(ProgramChoice::Pool(pool)) if !pool.is_empty() => pool[rng.index(pool.len())],
        _ => FALLBACK_PROGRAM,
    }
}

/// Merges buffers into tracks.
///
/// Empty buffers are dropped. Pitch bends are sorted by time. Tracks are
/// ordered by [`TrackType::PRIORITY`], then channel, then instance, and
/// programs are resolved in that order so pool picks are reproducible.
pub fn consolidate(
    buffers: SectionBuffers,
    presets: &InstrumentPrograms,
    overrides: &ProgramOverrides,
    rng: &mut dyn RandomSource,
) -> Consolidated {
    let mut groups: Vec<(BufferKey, GeneratedPart)> = buffers
        .parts
        .into_iter()
        .filter(|(key, part)| {
            if part.is_empty() {
                debug!(track = %key.id(), "dropping empty track");
            }
            !part.is_empty()
        })
        .collect();
    groups.sort_by_key(|(key, _)| (key.track_type.priority(), key.channel, key.instance));

    let mut result = Consolidated::default();
    for (key, mut part) in groups {
        part.pitch_bends.sort_by(|a, b| a.time.total_cmp(&b.time));
        let program = overrides
            .lookup(&key)
            .unwrap_or_else(|| resolve_program(presets.get(&key.track_type), rng))
            .min(127);

        let id = key.id();
        result.programs.insert(id.clone(), program);
        result.tracks.push(Track {
            id,
            name: key.name(),
            track_type: key.track_type,
            channel: key.channel,
            program,
            volume: key.track_type.default_volume(),
            pan: key.track_type.default_pan(),
            muted: false,
            solo: false,
            notes: part.notes,
            pitch_bends: part.pitch_bends,
        });
    }
    result
}
