//! Tests for prompt interpretation.

use pretty_assertions::assert_eq;

use super::*;

fn has(interp: &Interpretation, code: DiagnosticCode) -> bool {
    interp.diagnostics.iter().any(|d| d.code == code)
}

fn structure_of(interp: &Interpretation) -> Vec<(String, u32)> {
    interp
        .structure
        .iter()
        .map(|s| (s.name.clone(), s.bars))
        .collect()
}

#[test]
fn test_trap_prompt() {
    let interp = interpret("trap, 140 bpm, F# minor, intro (4), hook (8)");
    let params = &interp.params;
    assert_eq!(params.bpm, 140.0);
    assert_eq!(params.key, "F#");
    assert_eq!(params.key_pc, 6);
    assert!(params.scale.name().contains("minor"));
    assert_eq!(params.genre, Genre::Trap);
    assert_eq!(
        structure_of(&interp),
        vec![("intro".to_string(), 4), ("hook".to_string(), 8)]
    );
    assert!(params.glide.is_some());
    assert!(!has(&interp, DiagnosticCode::DefaultKey));
    assert!(!has(&interp, DiagnosticCode::DefaultBpm));
}

#[test]
fn test_empty_prompt_uses_defaults() {
    let interp = interpret("   ");
    let params = &interp.params;
    assert_eq!(params.key, "C");
    assert_eq!(params.scale, Scale::Major);
    assert_eq!(params.bpm, 120.0);
    assert_eq!(params.genre, Genre::Pop);
    assert_eq!(params.intent, Intent::Full);
    assert_eq!(
        structure_of(&interp),
        vec![
            ("intro".to_string(), 4),
            ("verse".to_string(), 8),
            ("hook".to_string(), 8),
            ("verse".to_string(), 8),
            ("hook".to_string(), 8),
        ]
    );
    for code in [
        DiagnosticCode::EmptyPrompt,
        DiagnosticCode::DefaultKey,
        DiagnosticCode::DefaultBpm,
        DiagnosticCode::DefaultStructure,
        DiagnosticCode::DefaultGenre,
    ] {
        assert!(has(&interp, code), "{code}");
    }
}

#[test]
fn test_article_is_not_a_key() {
    let interp = interpret("A chill lofi beat");
    assert_eq!(interp.params.key, "C");
    assert!(has(&interp, DiagnosticCode::DefaultKey));
}

#[test]
fn test_lowercase_root_after_prefix() {
    let interp = interpret("key of e minor");
    assert_eq!(interp.params.key, "E");
    assert_eq!(interp.params.key_pc, 4);
    assert_eq!(interp.params.scale, Scale::Minor);
    assert!(!has(&interp, DiagnosticCode::DefaultKey));

    let interp = interpret("lofi in a minor");
    assert_eq!(interp.params.key, "A");
    assert_eq!(interp.params.scale, Scale::Minor);

    let interp = interpret("chill beat in bb major");
    assert_eq!(interp.params.key, "Bb");
    assert_eq!(interp.params.scale, Scale::Major);

    let interp = interpret("key of g");
    assert_eq!(interp.params.key, "G");
}

#[test]
fn test_lowercase_letter_without_key_context() {
    for prompt in ["lofi in a dark mood", "in a mellow mood", "b minor vibes", "a minor groove"] {
        let interp = interpret(prompt);
        assert_eq!(interp.params.key, "C", "{prompt}");
        assert!(has(&interp, DiagnosticCode::DefaultKey), "{prompt}");
    }
}

#[test]
fn test_conflicting_keys_first_wins() {
    let interp = interpret("pop in C major and in A minor");
    assert_eq!(interp.params.key, "C");
    assert_eq!(interp.params.scale, Scale::Major);
    assert!(has(&interp, DiagnosticCode::ConflictingKeys));
}

#[test]
fn test_repeated_same_key_is_not_a_conflict() {
    let interp = interpret("in D dorian, stay in D");
    assert_eq!(interp.params.key, "D");
    assert_eq!(interp.params.scale, Scale::Dorian);
    assert!(!has(&interp, DiagnosticCode::ConflictingKeys));
}

#[test]
fn test_short_minor_suffix() {
    let interp = interpret("moody Am groove");
    assert_eq!(interp.params.key, "A");
    assert_eq!(interp.params.scale, Scale::Minor);
}

#[test]
fn test_standalone_scale_word() {
    let interp = interpret("a dorian jam");
    assert_eq!(interp.params.scale, Scale::Dorian);
    assert_eq!(interp.params.key, "C");
}

#[test]
fn test_intents() {
    let drums = interpret("trap drums only");
    assert_eq!(drums.params.intent, Intent::DrumsOnly);
    assert_eq!(drums.params.layers, vec![TrackType::Drums]);

    let no_drums = interpret("lofi, no drums");
    assert_eq!(no_drums.params.intent, Intent::NoDrums);
    assert!(!no_drums.params.layers.contains(&TrackType::Drums));
    assert!(no_drums.params.layers.contains(&TrackType::Pad));
}

#[test]
fn test_conflicting_intents_use_priority() {
    let interp = interpret("melody only, drums only");
    assert_eq!(interp.params.intent, Intent::DrumsOnly);
    assert!(has(&interp, DiagnosticCode::ConflictingIntents));
}

#[test]
fn test_bracketed_progression() {
    let interp = interpret("pop [I, V, vi, IV, xyz]");
    assert_eq!(interp.params.progression, vec!["I", "V", "vi", "IV"]);
    assert_eq!(interp.params.progression_style, "custom");
    assert!(has(&interp, DiagnosticCode::InvalidProgressionToken));
}

#[test]
fn test_labelled_progression() {
    let interp = interpret("progression: ii7-V7-Imaj7, jazz");
    assert_eq!(interp.params.progression, vec!["ii7", "V7", "Imaj7"]);
}

#[test]
fn test_named_progression_follows_scale() {
    let interp = interpret("sad song in A minor");
    assert_eq!(interp.params.progression_style, "sad");
    assert_eq!(interp.params.progression, vec!["i", "iv", "VI", "V"]);

    let major = interpret("sad song in C major");
    assert_eq!(major.params.progression, vec!["vi", "IV", "I", "V"]);
}

#[test]
fn test_bpm_is_clamped() {
    let interp = interpret("300 bpm techno");
    assert_eq!(interp.params.bpm, MAX_BPM);
    assert!(has(&interp, DiagnosticCode::ValueClamped));
}

#[test]
fn test_genre_bpm_fallback() {
    let interp = interpret("lofi study beat");
    assert_eq!(interp.params.bpm, Genre::Lofi.preset().default_bpm);
    assert!(has(&interp, DiagnosticCode::DefaultBpm));
}

#[test]
fn test_swing_forms() {
    assert!((interpret("swing 62%").params.swing - 0.62).abs() < 1e-9);
    assert!((interpret("swing 0.7").params.swing - 0.7).abs() < 1e-9);
    assert!((interpret("55% swing").params.swing - 0.55).abs() < 1e-9);
    assert_eq!(interpret("pop").params.swing, 0.5);
    assert_eq!(interpret("swing 0.95").params.swing, MAX_SWING);
    let lofi = interpret("lofi");
    assert_eq!(lofi.params.swing, lofi.params.groove.swing);
}

#[test]
fn test_glide_groups() {
    let glide = interpret("drill with 808 glide 5 st 16 steps")
        .params
        .glide
        .unwrap();
    assert_eq!(glide.depth_semitones, 5);
    assert_eq!(glide.resolution, 16);

    assert!(interpret("trap, no glide").params.glide.is_none());
    assert!(interpret("pop").params.glide.is_none());
    assert!(interpret("pop with slides").params.glide.is_some());
}

#[test]
fn test_modulation_to_key() {
    let interp = interpret("pop in C major, verse (8), bridge (8), modulate to G minor at bridge");
    assert_eq!(interp.params.key, "C");
    assert_eq!(interp.params.scale, Scale::Major);
    assert_eq!(
        interp.params.modulations,
        vec![Modulation {
            section: "bridge".to_string(),
            key: Some("G".to_string()),
            scale: Some(Scale::Minor),
            shift: None,
        }]
    );
    assert!(!has(&interp, DiagnosticCode::ConflictingKeys));
}

#[test]
fn test_section_in_key_and_key_change() {
    let interp = interpret("lofi in D minor, verse (8), bridge (8), hook (8), bridge in E minor, key change +2 at hook");
    assert_eq!(interp.params.key, "D");
    let bridge = interp.params.modulation_for("bridge").unwrap();
    assert_eq!(bridge.key.as_deref(), Some("E"));
    let hook = interp.params.modulation_for("hook").unwrap();
    assert_eq!(hook.shift, Some(2));
    assert!(!has(&interp, DiagnosticCode::ConflictingKeys));
}

#[test]
fn test_motif_forms() {
    assert_eq!(
        interpret("motif: C4 E4 G4").params.motif,
        Some(vec![60, 64, 67])
    );
    let interp = interpret("pop, motif [60, 64, 67]");
    assert_eq!(interp.params.motif, Some(vec![60, 64, 67]));
    assert_eq!(interp.params.progression_style, "pop");
    assert!(!has(&interp, DiagnosticCode::InvalidProgressionToken));
}

#[test]
fn test_instrument_keywords() {
    let interp = interpret("flute melody over piano chords");
    let programs = &interp.params.instruments;
    assert_eq!(programs[&TrackType::Melody], ProgramChoice::Fixed(73));
    assert_eq!(programs[&TrackType::Chords], ProgramChoice::Fixed(0));

    let interp = interpret("electric piano and 808");
    let programs = &interp.params.instruments;
    assert_eq!(programs[&TrackType::Chords], ProgramChoice::Fixed(4));
    assert_eq!(programs[&TrackType::Bass], ProgramChoice::Fixed(38));
}

#[test]
fn test_genre_pools_without_keywords() {
    let interp = interpret("jazz");
    assert_eq!(
        interp.params.instruments[&TrackType::Melody],
        ProgramChoice::Pool(Genre::Jazz.programs(TrackType::Melody).to_vec())
    );
}

#[test]
fn test_layer_keywords() {
    let interp = interpret("house track with arp and countermelody");
    let layers = &interp.params.layers;
    assert_eq!(
        &layers[..4],
        &[
            TrackType::Melody,
            TrackType::Chords,
            TrackType::Bass,
            TrackType::Drums,
        ]
    );
    assert!(layers.contains(&TrackType::Arp));
    assert!(layers.contains(&TrackType::Pad));
    assert!(layers.contains(&TrackType::Countermelody));
    let arps = layers.iter().filter(|l| **l == TrackType::Arp).count();
    assert_eq!(arps, 1);
}

#[test]
fn test_harmonic_rhythm() {
    assert_eq!(interpret("2 chords per bar").params.beats_per_chord, 2);
    assert_eq!(interpret("8 beats per chord").params.beats_per_chord, 8);
    assert_eq!(interpret("pop").params.beats_per_chord, 4);
}

#[test]
fn test_extension_and_humanize_words() {
    let interp = interpret("pop with ninths, loose feel");
    assert_eq!(interp.params.chord_extension, ChordExtension::Ninth);
    assert_eq!(interp.params.humanize, HumanizeProfile::Loose);
    assert_eq!(
        interpret("rock").params.chord_extension,
        Genre::Rock.preset().chord_extension
    );
}

#[test]
fn test_energy_and_density() {
    let interp = interpret("energetic, busy pop");
    assert_eq!(interp.params.energy, Energy::High);
    assert_eq!(interp.params.density, Density::Dense);
    let interp = interpret("chill sparse pop");
    assert_eq!(interp.params.energy, Energy::Low);
    assert_eq!(interp.params.density, Density::Sparse);
}

#[test]
fn test_section_bars_clamped() {
    let interp = interpret("verse (200)");
    assert_eq!(structure_of(&interp), vec![("verse".to_string(), 64)]);
    assert!(has(&interp, DiagnosticCode::ValueClamped));
}

#[test]
fn test_learned_style_fallback() {
    let style = LearnedStyle {
        bpm: Some(96.0),
        key: Some("d".to_string()),
        scale: Some(Scale::Dorian),
        swing: Some(0.58),
        energy: Some(Energy::Low),
        notes_per_beat: Some(2.5),
        motif: Some(vec![62, 65, 69]),
    };
    let interp = interpret_with_style("lofi beat", Some(&style));
    let params = &interp.params;
    assert_eq!(params.bpm, 96.0);
    assert_eq!(params.key, "D");
    assert_eq!(params.scale, Scale::Dorian);
    assert_eq!(params.swing, 0.58);
    assert_eq!(params.energy, Energy::Low);
    assert_eq!(params.density, Density::Dense);
    assert_eq!(params.motif, Some(vec![62, 65, 69]));
    assert!(!has(&interp, DiagnosticCode::DefaultBpm));
    assert!(!has(&interp, DiagnosticCode::DefaultKey));

    let explicit = interpret_with_style("lofi beat, 70 bpm in E minor", Some(&style));
    assert_eq!(explicit.params.bpm, 70.0);
    assert_eq!(explicit.params.key, "E");
    assert_eq!(explicit.params.scale, Scale::Minor);
}

#[test]
fn test_contradictory_prompt_never_panics() {
    for prompt in [
        "",
        "C major D minor E phrygian",
        "[[[",
        "motif:",
        "0 bpm swing 1000% verse (0) [xyz]",
        "modulate to H at bridge",
        "drums only no drums melody only",
        "🎵🎶 ♯♭",
    ] {
        let interp = interpret(prompt);
        assert!(!interp.structure.is_empty(), "{prompt}");
        assert!(!interp.params.progression.is_empty(), "{prompt}");
        assert!((MIN_BPM..=MAX_BPM).contains(&interp.params.bpm), "{prompt}");
        assert!(interp.params.key_pc < 12, "{prompt}");
    }
}
