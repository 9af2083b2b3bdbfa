//! Composition assembly: prompt in, consolidated score out.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use cadenza_spec::note::parse_pitch_class;
use cadenza_spec::{
    prompt_seed, total_beats, CompositionParams, CompositionResult, Diagnostic, DiagnosticCode,
    LearnedStyle, Section, TrackRequest, TrackType, SCORE_VERSION,
};

use crate::channels::{consolidate, BufferKey, ChannelAllocator, ProgramOverrides, SectionBuffers};
use crate::generators::{generator_for, SectionContext};
use crate::prompt::{interpret_with_style, Interpretation};
use crate::rng::ComposeRng;

/// Salt of the RNG stream used for program pool picks.
const PROGRAM_STREAM: &str = "programs";

/// Caller-supplied knobs for [`generate_composition`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerateOptions {
    /// Seed for every RNG stream. `None` derives one from the prompt.
    pub seed: Option<u64>,
    /// Program per role, taking precedence over prompt keywords and presets.
    pub instrument_overrides: BTreeMap<TrackType, u8>,
    /// Explicit track list replacing the prompt's layers. Repeating a kind
    /// adds another instance of it.
    pub tracks: Option<Vec<TrackRequest>>,
    /// Fallback values below explicit prompt tokens.
    pub learned_style: Option<LearnedStyle>,
}

impl GenerateOptions {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }
}

/// Generates a complete multi-track composition from a prompt.
///
/// Never fails: unreadable input degrades to defaults and every fallback
/// or skipped request is listed in the result's diagnostics. For a fixed
/// prompt and options the result is byte-for-byte reproducible.
///
/// # Example
///
/// ```
/// use cadenza_engine::{generate_composition, GenerateOptions};
/// use cadenza_spec::{TrackType, PERCUSSION_CHANNEL};
///
/// let result = generate_composition(
///     "trap, 140 bpm, F# minor, intro (4), hook (8)",
///     &GenerateOptions::with_seed(7),
/// );
/// assert_eq!(result.total_beats, 48);
/// for track in &result.tracks {
///     assert_eq!(track.track_type == TrackType::Drums, track.channel == PERCUSSION_CHANNEL);
/// }
/// ```
pub fn generate_composition(prompt: &str, options: &GenerateOptions) -> CompositionResult {
    let Interpretation {
        params,
        structure,
        mut diagnostics,
    } = interpret_with_style(prompt, options.learned_style.as_ref());
    let seed = options.seed.unwrap_or_else(|| prompt_seed(prompt));

    let mut allocator = ChannelAllocator::new();
    let mut overrides = ProgramOverrides {
        by_role: options.instrument_overrides.clone(),
        ..ProgramOverrides::default()
    };
    let plan = plan_tracks(
        &params,
        options.tracks.as_deref(),
        &mut allocator,
        &mut overrides,
        &mut diagnostics,
    );

    let mut buffers = SectionBuffers::new();
    let mut start_beat = 0.0;
    for (index, section) in structure.iter().enumerate() {
        let ctx = section_context(&params, section, index, start_beat);
        debug!(
            section = %section.name,
            index,
            start_beat,
            key_pc = ctx.key_pc,
            scale = %ctx.scale,
            "generating section"
        );
        for key in &plan {
            let mut rng = ComposeRng::for_stream(seed, index as u32, &key.stream_salt());
            let part = generator_for(key.track_type)(&ctx, &mut rng);
            buffers.append(*key, part);
        }
        start_beat += section.beats() as f64;
    }

    let mut program_rng = ComposeRng::for_stream(seed, 0, PROGRAM_STREAM);
    let consolidated = consolidate(buffers, &params.instruments, &overrides, &mut program_rng);

    let result = CompositionResult {
        score_version: SCORE_VERSION,
        seed,
        total_beats: total_beats(&structure),
        params,
        structure,
        tracks: consolidated.tracks,
        instrument_programs: consolidated.programs,
        diagnostics,
    };
    debug!(
        seed,
        tracks = result.tracks.len(),
        notes = result.note_count(),
        total_beats = result.total_beats,
        "composition generated"
    );
    result
}

/// Decides which track instances to generate and gives each a channel.
///
/// An explicit, non-empty track list wins over the prompt's layers.
/// Unknown kinds are skipped with a diagnostic.
fn plan_tracks(
    params: &CompositionParams,
    requests: Option<&[TrackRequest]>,
    allocator: &mut ChannelAllocator,
    overrides: &mut ProgramOverrides,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<BufferKey> {
    let mut plan: Vec<BufferKey> = Vec::new();
    let mut instances: BTreeMap<TrackType, usize> = BTreeMap::new();
    let mut add = |track_type: TrackType, plan: &mut Vec<BufferKey>| {
        let count = instances.entry(track_type).or_insert(0);
        let key = BufferKey::new(allocator.assign(track_type), track_type, *count);
        *count += 1;
        plan.push(key);
        key
    };

    match requests.filter(|r| !r.is_empty()) {
        Some(requests) => {
            for request in requests {
                match request.kind.parse::<TrackType>() {
                    Ok(track_type) => {
                        let key = add(track_type, &mut plan);
                        if let Some(program) = request.program {
                            overrides.by_track.insert(key, program);
                        }
                    }
                    Err(err) => {
                        warn!(kind = %request.kind, "skipping track request: {err}");
                        diagnostics.push(Diagnostic::new(
                            DiagnosticCode::UnknownTrackType,
                            format!("skipped track request: {err}"),
                        ));
                    }
                }
            }
        }
        None => {
            for track_type in &params.layers {
                add(*track_type, &mut plan);
            }
        }
    }
    plan
}

/// Section context with the section's modulation, if any, applied.
fn section_context<'a>(
    params: &'a CompositionParams,
    section: &'a Section,
    index: usize,
    start_beat: f64,
) -> SectionContext<'a> {
    let ctx = SectionContext::new(params, section, index, start_beat);
    let Some(modulation) = params.modulation_for(&section.name) else {
        return ctx;
    };
    let key_pc = match (&modulation.key, modulation.shift) {
        (Some(key), _) => parse_pitch_class(key).unwrap_or(params.key_pc),
        (None, Some(shift)) => (params.key_pc as i32 + shift).rem_euclid(12) as u8,
        (None, None) => params.key_pc,
    };
    let scale = modulation.scale.unwrap_or(params.scale);
    ctx.with_key(key_pc, scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::interpret;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_plan_follows_layers() {
        let params = interpret("house in A minor").params;
        let mut diagnostics = Vec::new();
        let plan = plan_tracks(
            &params,
            None,
            &mut ChannelAllocator::new(),
            &mut ProgramOverrides::default(),
            &mut diagnostics,
        );
        let types: Vec<TrackType> = plan.iter().map(|k| k.track_type).collect();
        assert_eq!(types, params.layers);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_plan_explicit_requests() {
        let params = interpret("pop").params;
        let requests = vec![
            TrackRequest::new("melody"),
            TrackRequest::new("kazoo"),
            TrackRequest {
                kind: "melody".to_string(),
                program: Some(73),
            },
            TrackRequest::new("drums"),
        ];
        let mut overrides = ProgramOverrides::default();
        let mut diagnostics = Vec::new();
        let plan = plan_tracks(
            &params,
            Some(&requests),
            &mut ChannelAllocator::new(),
            &mut overrides,
            &mut diagnostics,
        );
        assert_eq!(
            plan,
            vec![
                BufferKey::new(0, TrackType::Melody, 0),
                BufferKey::new(1, TrackType::Melody, 1),
                BufferKey::new(9, TrackType::Drums, 0),
            ]
        );
        assert_eq!(overrides.by_track[&plan[1]], 73);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, DiagnosticCode::UnknownTrackType);
    }

    #[test]
    fn test_empty_request_list_uses_layers() {
        let params = interpret("pop").params;
        let plan = plan_tracks(
            &params,
            Some(&[]),
            &mut ChannelAllocator::new(),
            &mut ProgramOverrides::default(),
            &mut Vec::new(),
        );
        assert_eq!(plan.len(), params.layers.len());
    }

    #[test]
    fn test_section_context_applies_modulation() {
        let params = interpret(
            "pop in C major, verse (4), bridge (4), hook (4), modulate to A minor at bridge, key change -3 at hook",
        )
        .params;
        let verse = Section::new("verse", 4);
        let bridge = Section::new("bridge", 4);
        let hook = Section::new("hook", 4);

        let ctx = section_context(&params, &verse, 0, 0.0);
        assert_eq!((ctx.key_pc, ctx.scale), (0, params.scale));

        let ctx = section_context(&params, &bridge, 1, 16.0);
        assert_eq!(ctx.key_pc, 9);
        assert_eq!(ctx.scale, cadenza_spec::Scale::Minor);

        let ctx = section_context(&params, &hook, 2, 32.0);
        assert_eq!(ctx.key_pc, 9);
        assert_eq!(ctx.scale, params.scale);
    }
}
