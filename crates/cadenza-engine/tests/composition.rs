//! End-to-end properties of `generate_composition`.

use std::collections::BTreeMap;

use cadenza_engine::harmony::{
    chord_index_at, resolve_chord, CHORD_REGISTER_HIGH, CHORD_REGISTER_LOW,
};
use cadenza_engine::humanize::swung;
use cadenza_engine::voice_leading::{movement, voice_lead_chord};
use cadenza_engine::{generate_composition, interpret, GenerateOptions};
use cadenza_spec::{
    canonical_score_hash, validate_composition, DiagnosticCode, LearnedStyle, Scale,
    TrackRequest, TrackType, PERCUSSION_CHANNEL,
};
use pretty_assertions::assert_eq;

const PROMPTS: &[&str] = &[
    "trap, 140 bpm, F# minor, intro (4), hook (8)",
    "lofi in D dorian, swing 60%, verse (8), hook (8), with arp",
    "jazz ballad in Bb, [ii7, V7, Imaj7, vi7], countermelody",
    "house, 124 bpm, A minor, buildup (4), drop (8), modulate to C minor at drop",
    "cinematic in E minor, intro (4), bridge (4), bridge in G major, outro (4)",
    "drill with 808 glide 5 st 16 steps, C# minor",
    "drums only, reggaeton",
];

#[test]
fn test_same_seed_byte_identical() {
    for prompt in PROMPTS {
        let a = generate_composition(prompt, &GenerateOptions::with_seed(1234));
        let b = generate_composition(prompt, &GenerateOptions::with_seed(1234));
        assert_eq!(a.to_json().unwrap(), b.to_json().unwrap(), "{prompt}");
        assert_eq!(
            canonical_score_hash(&a).unwrap(),
            canonical_score_hash(&b).unwrap()
        );
    }
}

#[test]
fn test_unseeded_is_deterministic_per_prompt() {
    let a = generate_composition(PROMPTS[0], &GenerateOptions::default());
    let b = generate_composition(PROMPTS[0], &GenerateOptions::default());
    assert_eq!(a.seed, b.seed);
    assert_eq!(a, b);
}

#[test]
fn test_seed_changes_output() {
    let a = generate_composition(PROMPTS[1], &GenerateOptions::with_seed(1));
    let b = generate_composition(PROMPTS[1], &GenerateOptions::with_seed(2));
    assert_ne!(a.tracks, b.tracks);
}

#[test]
fn test_adding_a_track_leaves_others_untouched() {
    let prompt = "pop in G major, verse (8)";
    let base = GenerateOptions {
        seed: Some(77),
        tracks: Some(vec![TrackRequest::new("melody"), TrackRequest::new("bass")]),
        ..GenerateOptions::default()
    };
    let extended = GenerateOptions {
        tracks: Some(vec![
            TrackRequest::new("melody"),
            TrackRequest::new("bass"),
            TrackRequest::new("arp"),
        ]),
        ..base.clone()
    };
    let a = generate_composition(prompt, &base);
    let b = generate_composition(prompt, &extended);
    let melody_a = a.tracks.iter().find(|t| t.id == "melody-0").unwrap();
    let melody_b = b.tracks.iter().find(|t| t.id == "melody-0").unwrap();
    assert_eq!(melody_a.notes, melody_b.notes);
}

#[test]
fn test_drums_own_the_percussion_channel() {
    for prompt in PROMPTS {
        for seed in 0..4 {
            let result = generate_composition(prompt, &GenerateOptions::with_seed(seed));
            for track in &result.tracks {
                assert_eq!(
                    track.track_type == TrackType::Drums,
                    track.channel == PERCUSSION_CHANNEL,
                    "{prompt}: {}",
                    track.id
                );
            }
        }
    }
}

#[test]
fn test_no_empty_tracks_and_valid_scores() {
    for prompt in PROMPTS {
        let result = generate_composition(prompt, &GenerateOptions::with_seed(5));
        assert!(!result.tracks.is_empty(), "{prompt}");
        assert!(result.tracks.iter().all(|t| !t.is_empty()), "{prompt}");
        let validation = validate_composition(&result);
        assert!(validation.is_ok(), "{prompt}: {:?}", validation.errors);
    }
}

#[test]
fn test_tracks_ordered_by_priority_then_channel() {
    let result = generate_composition(
        "edm, 128 bpm, countermelody, verse (4)",
        &GenerateOptions::with_seed(3),
    );
    let keys: Vec<(usize, u8)> = result
        .tracks
        .iter()
        .map(|t| (t.track_type.priority(), t.channel))
        .collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
}

#[test]
fn test_total_beats_and_notes_in_range() {
    let result = generate_composition(PROMPTS[0], &GenerateOptions::with_seed(8));
    assert_eq!(result.total_beats, 48);
    for track in &result.tracks {
        for note in &track.notes {
            // Humanization may push the final notes slightly late.
            assert!(note.start < result.total_beats as f64 + 0.5, "{}", track.id);
        }
    }
}

#[test]
fn test_progression_cycles_by_beat() {
    for len in 1..=5usize {
        for bpc in [1u32, 2, 4, 8] {
            for beat in 0..64 {
                let b = beat as f64 + 0.5;
                let expected = ((b / bpc as f64).floor() as usize) % len;
                assert_eq!(chord_index_at(b, bpc, len), expected);
            }
        }
    }
}

#[test]
fn test_resolved_chords_stay_in_register() {
    let tokens = [
        "I", "ii", "iii", "IV", "V", "vi", "vii", "V7", "ii7", "Imaj7", "viidim", "bVII",
        "III+", "ivm7b5", "IVsus4", "Iadd9",
    ];
    for scale in Scale::ALL {
        for root in 0..12u8 {
            for token in tokens {
                let chord = resolve_chord(token, scale, root);
                let mut unique = chord.pitches.clone();
                unique.dedup();
                assert_eq!(unique, chord.pitches, "{token} {scale}");
                assert!(chord.pitches.windows(2).all(|w| w[0] < w[1]));
                assert!(chord
                    .pitches
                    .iter()
                    .all(|p| (CHORD_REGISTER_LOW..=CHORD_REGISTER_HIGH).contains(p)));
            }
        }
    }
}

#[test]
fn test_tonic_triad_in_c_major() {
    let chord = resolve_chord("I", Scale::Major, 0);
    let mut pcs: Vec<u8> = chord.pitches.iter().map(|p| p % 12).collect();
    pcs.sort_unstable();
    assert_eq!(pcs, vec![0, 4, 7]);
}

#[test]
fn test_voice_leading_reduces_motion_to_iv() {
    let prev: [u8; 3] = [60, 64, 67];
    let raw: [u8; 3] = [65, 69, 72];
    let led = voice_lead_chord(&raw, &prev);
    assert!(movement(&led, &prev) <= movement(&raw, &prev));
}

#[test]
fn test_swing_delays_offbeat_eighths() {
    assert!(swung(0.5, 0.6) > swung(0.5, 0.5));
    assert!(swung(2.5, 0.6) > swung(2.5, 0.5));
    assert_eq!(swung(1.0, 0.6), 1.0);
}

#[test]
fn test_prompt_parse_example() {
    let interp = interpret("trap, 140 bpm, F# minor, intro (4), hook (8)");
    assert_eq!(interp.params.bpm, 140.0);
    assert_eq!(interp.params.key, "F#");
    assert!(interp.params.scale.name().contains("minor"));
    let structure: Vec<(&str, u32)> = interp
        .structure
        .iter()
        .map(|s| (s.name.as_str(), s.bars))
        .collect();
    assert_eq!(structure, vec![("intro", 4), ("hook", 8)]);
}

#[test]
fn test_degraded_inputs_never_fail() {
    for prompt in [
        "",
        "   ",
        "C major and D minor and in E phrygian",
        "drums only, melody only, no drums",
        "[]",
        "9999 bpm, swing 500%, verse (0), glide 99 st 999 steps",
        "modulate to Q at bridge, key change +40 at hook",
    ] {
        let result = generate_composition(prompt, &GenerateOptions::with_seed(0));
        assert!(!result.structure.is_empty(), "{prompt:?}");
        assert!(result.total_beats > 0, "{prompt:?}");
        let validation = validate_composition(&result);
        assert!(validation.is_ok(), "{prompt:?}: {:?}", validation.errors);
    }

    let empty = generate_composition("", &GenerateOptions::with_seed(0));
    assert!(empty.used_default());
    assert!(empty.has_diagnostic(DiagnosticCode::EmptyPrompt));

    let conflicting = generate_composition(
        "C major and D minor",
        &GenerateOptions::with_seed(0),
    );
    assert!(conflicting.has_diagnostic(DiagnosticCode::ConflictingKeys));
    assert_eq!(conflicting.params.key, "C");
}

#[test]
fn test_unknown_track_request_skipped() {
    let options = GenerateOptions {
        seed: Some(4),
        tracks: Some(vec![
            TrackRequest::new("melody"),
            TrackRequest::new("theremin"),
            TrackRequest::new("drums"),
        ]),
        ..GenerateOptions::default()
    };
    let result = generate_composition("pop, verse (4)", &options);
    assert!(result.has_diagnostic(DiagnosticCode::UnknownTrackType));
    let types: Vec<TrackType> = result.tracks.iter().map(|t| t.track_type).collect();
    assert_eq!(types, vec![TrackType::Melody, TrackType::Drums]);
}

#[test]
fn test_instrument_overrides_win() {
    let options = GenerateOptions {
        seed: Some(4),
        instrument_overrides: BTreeMap::from([(TrackType::Melody, 56)]),
        ..GenerateOptions::default()
    };
    let result = generate_composition("flute melody, pop, verse (4)", &options);
    assert_eq!(result.instrument_programs["melody-0"], 56);

    let plain = generate_composition("flute melody, pop, verse (4)", &GenerateOptions::with_seed(4));
    assert_eq!(plain.instrument_programs["melody-0"], 73);
}

#[test]
fn test_glide_emits_centered_pitch_bends() {
    let result = generate_composition(
        "trap, C minor, 808 glide, hook (16)",
        &GenerateOptions::with_seed(21),
    );
    let bass = result
        .tracks
        .iter()
        .find(|t| t.track_type == TrackType::Bass)
        .unwrap();
    assert!(!bass.pitch_bends.is_empty());
    assert!(bass.pitch_bends.windows(2).all(|w| w[0].time <= w[1].time));
    assert_eq!(bass.pitch_bends.last().unwrap().value, 8192);
    for track in result.tracks.iter().filter(|t| t.track_type != TrackType::Bass) {
        assert!(track.pitch_bends.is_empty());
    }
}

#[test]
fn test_modulated_section_moves_chords() {
    let result = generate_composition(
        "pop in C major, verse (4), bridge (4), key change +2 at bridge",
        &GenerateOptions {
            seed: Some(10),
            tracks: Some(vec![TrackRequest::new("bass")]),
            ..GenerateOptions::default()
        },
    );
    let bass = &result.tracks[0];
    // Both sections open on I, which voices lowest on its root here.
    let first_bridge = bass.notes.iter().find(|n| n.start >= 15.9).unwrap();
    assert_eq!(bass.notes[0].pitch % 12, 0);
    assert_eq!(first_bridge.pitch % 12, 2);
}

#[test]
fn test_learned_style_fills_gaps() {
    let options = GenerateOptions {
        seed: Some(2),
        learned_style: Some(LearnedStyle {
            bpm: Some(88.0),
            key: Some("G".to_string()),
            ..LearnedStyle::default()
        }),
        ..GenerateOptions::default()
    };
    let result = generate_composition("lofi, verse (4)", &options);
    assert_eq!(result.params.bpm, 88.0);
    assert_eq!(result.params.key, "G");
    assert!(!result.has_diagnostic(DiagnosticCode::DefaultKey));
}
