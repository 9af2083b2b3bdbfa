//! Free-text prompt interpretation.
//!
//! [`interpret`] turns a prompt into a [`CompositionParams`] record and a
//! song structure. It never fails: anything it cannot read falls back to a
//! documented default, and every fallback or skipped token is recorded as a
//! [`Diagnostic`].
//!
//! Value precedence for each field is: explicit prompt token, then the
//! learned style (if any), then the genre preset, then the global default.

mod patterns;
mod tables;

#[cfg(test)]
mod tests;

pub use tables::{progression_for, DEFAULT_STRUCTURE, PROGRESSION_STYLES};

use std::collections::BTreeMap;

use tracing::{debug, warn};

use cadenza_spec::note::{parse_note_name, parse_pitch_class};
use cadenza_spec::params::{DEFAULT_BEATS_PER_CHORD, DEFAULT_KEY};
use cadenza_spec::{
    ChordExtension, CompositionParams, Density, Diagnostic, DiagnosticCode, Energy, Genre,
    GenrePreset, GlideSettings, GrooveProfile, HumanizeProfile, InstrumentPrograms, Intent,
    LearnedStyle, Modulation, ProgramChoice, Scale, Section, TrackType,
};

use crate::harmony::parse_roman;
use crate::humanize::{MAX_SWING, MIN_SWING};
use patterns::*;

pub const MIN_BPM: f64 = 40.0;
pub const MAX_BPM: f64 = 240.0;
pub const MAX_SECTION_BARS: u32 = 64;
pub const MAX_BEATS_PER_CHORD: u32 = 16;
pub const MAX_GLIDE_DEPTH: u8 = 24;
pub const MAX_GLIDE_STEPS: u16 = 64;

/// Swing used for a bare "swing"/"swung" with no number.
const WORD_SWING: f64 = 0.6;
/// Swing used for "shuffle" or "heavy swing".
const SHUFFLE_SWING: f64 = 0.66;

/// Everything read from a prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct Interpretation {
    pub params: CompositionParams,
    pub structure: Vec<Section>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Collects diagnostics and mirrors them to the log.
#[derive(Debug, Default)]
struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    fn push(&mut self, code: DiagnosticCode, message: impl Into<String>) {
        let message = message.into();
        if code.is_default() {
            debug!(code = %code, "{message}");
        } else {
            warn!(code = %code, "{message}");
        }
        self.0.push(Diagnostic::new(code, message));
    }
}

/// Interprets a prompt with no learned style.
pub fn interpret(prompt: &str) -> Interpretation {
    interpret_with_style(prompt, None)
}

/// Interprets a prompt, falling back to `style` for values the prompt does
/// not state.
pub fn interpret_with_style(prompt: &str, style: Option<&LearnedStyle>) -> Interpretation {
    let fallback_style = LearnedStyle::default();
    let style = style.unwrap_or(&fallback_style);
    let text = prompt.trim();
    let lower = text.to_lowercase();
    let mut diags = Diagnostics::default();

    if text.is_empty() {
        diags.push(DiagnosticCode::EmptyPrompt, "prompt is empty; using defaults");
    }

    let intent = detect_intent(&lower, &mut diags);
    let genre = detect_genre(&lower, &mut diags);
    let preset = genre.preset();
    let structure = parse_structure(text, &mut diags);
    let (modulations, modulation_spans) = parse_modulations(text, &mut diags);
    let (key, key_pc, scale) = parse_key(text, &modulation_spans, style, &mut diags);
    let bpm = parse_bpm(text, style, &preset, &mut diags);
    let swing = parse_swing(text, &lower, style, &preset, &mut diags);
    let energy = parse_energy(&lower, style, bpm);
    let density = parse_density(&lower, style);
    let humanize = parse_humanize(&lower, &preset);
    let chord_extension = parse_extension(text, &preset);
    let (progression, progression_style) =
        parse_progression(text, &lower, scale, &preset, &mut diags);
    let beats_per_chord = parse_beats_per_chord(text, &mut diags);
    let layers = resolve_layers(intent, &lower, &preset);
    let glide = parse_glide(text, &preset, &mut diags);
    let motif = parse_motif(text).or_else(|| style.motif.clone().filter(|m| !m.is_empty()));
    let instruments = resolve_instruments(&lower, genre);

    let groove = GrooveProfile {
        swing,
        ..preset.groove.clone()
    };

    let params = CompositionParams {
        key,
        key_pc,
        scale,
        bpm,
        swing,
        energy,
        density,
        genre,
        groove,
        chord_extension,
        humanize,
        intent,
        layers,
        motif,
        modulations,
        progression,
        progression_style,
        beats_per_chord,
        glide,
        instruments,
    };

    debug!(
        genre = %params.genre,
        key = %params.key,
        scale = %params.scale,
        bpm = params.bpm,
        sections = structure.len(),
        "interpreted prompt"
    );

    Interpretation {
        params,
        structure,
        diagnostics: diags.0,
    }
}

/// Start offsets of whole-word occurrences of `phrase` in `haystack`.
fn word_positions<'a>(haystack: &'a str, phrase: &'a str) -> impl Iterator<Item = usize> + 'a {
    haystack.match_indices(phrase).filter_map(move |(start, _)| {
        let end = start + phrase.len();
        let before_ok = haystack[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let after_ok = haystack[end..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());
        (before_ok && after_ok).then_some(start)
    })
}

fn contains_word(haystack: &str, phrase: &str) -> bool {
    word_positions(haystack, phrase).next().is_some()
}

fn overlaps(spans: &[(usize, usize)], start: usize, end: usize) -> bool {
    spans.iter().any(|(s, e)| start < *e && *s < end)
}

fn detect_intent(lower: &str, diags: &mut Diagnostics) -> Intent {
    let matched: Vec<Intent> = tables::INTENT_PHRASES
        .iter()
        .filter(|(_, phrases)| phrases.iter().any(|p| contains_word(lower, p)))
        .map(|(intent, _)| *intent)
        .collect();

    match matched.as_slice() {
        [] => Intent::Full,
        [only] => *only,
        [first, ..] => {
            diags.push(
                DiagnosticCode::ConflictingIntents,
                format!("several intents requested ({matched:?}); using {first:?}"),
            );
            *first
        }
    }
}

fn detect_genre(lower: &str, diags: &mut Diagnostics) -> Genre {
    let found = Genre::PRECEDENCE
        .into_iter()
        .find(|genre| genre.keywords().iter().any(|k| contains_word(lower, k)));
    match found {
        Some(genre) => genre,
        None => {
            let genre = Genre::default();
            diags.push(
                DiagnosticCode::DefaultGenre,
                format!("no genre keyword found; using {genre}"),
            );
            genre
        }
    }
}

fn clamp_bars(name: &str, raw: &str, diags: &mut Diagnostics) -> u32 {
    let requested = raw.parse::<u32>().unwrap_or(u32::MAX);
    let bars = requested.clamp(1, MAX_SECTION_BARS);
    if bars != requested {
        diags.push(
            DiagnosticCode::ValueClamped,
            format!("section '{name}' bar count {raw} clamped to {bars}"),
        );
    }
    bars
}

fn parse_structure(text: &str, diags: &mut Diagnostics) -> Vec<Section> {
    let mut structure = Vec::new();
    for caps in structure_regex().captures_iter(text) {
        let name = tables::canonical_section(&caps[1]);
        let Some(raw) = caps.get(2).or_else(|| caps.get(3)) else {
            continue;
        };
        let bars = clamp_bars(&name, raw.as_str(), diags);
        structure.push(Section::new(name, bars));
    }

    if structure.is_empty() {
        diags.push(
            DiagnosticCode::DefaultStructure,
            "no section tokens found; using the default structure",
        );
        structure = DEFAULT_STRUCTURE
            .iter()
            .map(|(name, bars)| Section::new(*name, *bars))
            .collect();
    }
    structure
}

/// Canonical spelling of a key root: uppercase letter plus `#` or `b`.
fn key_name(root: &str) -> String {
    let mut chars = root.trim().chars();
    let Some(letter) = chars.next() else {
        return DEFAULT_KEY.to_string();
    };
    let accidental = match chars.next() {
        Some('#' | '♯') => "#",
        Some('b' | '♭') => "b",
        _ => "",
    };
    format!("{}{}", letter.to_ascii_uppercase(), accidental)
}

fn parse_scale_name(name: Option<regex::Match<'_>>) -> Option<Scale> {
    name.and_then(|m| m.as_str().parse::<Scale>().ok())
}

fn modulation_key(
    root: &str,
    scale: Option<regex::Match<'_>>,
    section: String,
    diags: &mut Diagnostics,
) -> Option<Modulation> {
    let name = key_name(root);
    match parse_pitch_class(&name) {
        Ok(_) => Some(Modulation {
            section,
            key: Some(name),
            scale: parse_scale_name(scale),
            shift: None,
        }),
        Err(err) => {
            diags.push(
                DiagnosticCode::InvalidModulation,
                format!("modulation for '{section}' ignored: {err}"),
            );
            None
        }
    }
}

fn parse_modulations(
    text: &str,
    diags: &mut Diagnostics,
) -> (Vec<Modulation>, Vec<(usize, usize)>) {
    let mut found: Vec<(usize, Modulation)> = Vec::new();
    let mut spans = Vec::new();

    for caps in modulate_regex().captures_iter(text) {
        let whole = &caps[0];
        let start = caps.get(0).map_or(0, |m| m.start());
        spans.push((start, start + whole.len()));
        let section = tables::canonical_section(&caps[3]);
        if let Some(m) = modulation_key(&caps[1], caps.get(2), section, diags) {
            found.push((start, m));
        }
    }

    for caps in key_change_regex().captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        if overlaps(&spans, whole.start(), whole.end()) {
            continue;
        }
        spans.push((whole.start(), whole.end()));
        let section = tables::canonical_section(&caps[2]);
        let requested = caps[1].parse::<i32>().unwrap_or(i32::MAX);
        let shift = requested.clamp(-11, 11);
        if shift != requested {
            diags.push(
                DiagnosticCode::ValueClamped,
                format!("key change {} for '{section}' clamped to {shift}", &caps[1]),
            );
        }
        found.push((
            whole.start(),
            Modulation {
                section,
                key: None,
                scale: None,
                shift: Some(shift),
            },
        ));
    }

    for caps in section_in_key_regex().captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        if overlaps(&spans, whole.start(), whole.end()) {
            continue;
        }
        if text[whole.end()..]
            .chars()
            .next()
            .is_some_and(char::is_alphanumeric)
        {
            continue;
        }
        spans.push((whole.start(), whole.end()));
        let section = tables::canonical_section(&caps[1]);
        if let Some(m) = modulation_key(&caps[2], caps.get(3), section, diags) {
            found.push((whole.start(), m));
        }
    }

    found.sort_by_key(|(start, _)| *start);
    let mut modulations: Vec<Modulation> = Vec::new();
    for (_, m) in found {
        if modulations.iter().any(|existing| existing.section == m.section) {
            diags.push(
                DiagnosticCode::InvalidModulation,
                format!("second modulation for '{}' ignored", m.section),
            );
            continue;
        }
        modulations.push(m);
    }
    (modulations, spans)
}

struct KeyCandidate {
    name: String,
    pc: u8,
    scale: Option<Scale>,
}

fn parse_key(
    text: &str,
    excluded: &[(usize, usize)],
    style: &LearnedStyle,
    diags: &mut Diagnostics,
) -> (String, u8, Scale) {
    let mut candidates: Vec<KeyCandidate> = Vec::new();
    for caps in key_regex().captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        if overlaps(excluded, whole.start(), whole.end()) {
            continue;
        }
        if text[whole.end()..]
            .chars()
            .next()
            .is_some_and(char::is_alphanumeric)
        {
            continue;
        }
        let has_prefix = caps.get(1).is_some();
        let accidental = caps.get(3).map_or("", |m| m.as_str());
        let scale_match = caps.get(4);
        if !has_prefix && accidental.is_empty() && scale_match.is_none() {
            continue;
        }
        // "key of e" and "in a minor" name keys; "in a dark mood" does not.
        if caps[2].chars().all(|c| c.is_ascii_lowercase()) {
            let after_key = caps
                .get(1)
                .is_some_and(|m| m.as_str().to_ascii_lowercase().starts_with("key"));
            if !after_key && !(has_prefix && scale_match.is_some()) {
                continue;
            }
        }
        let name = key_name(&format!("{}{}", &caps[2], accidental));
        let Ok(pc) = parse_pitch_class(&name) else {
            continue;
        };
        candidates.push(KeyCandidate {
            name,
            pc,
            scale: parse_scale_name(scale_match),
        });
    }

    if let Some(first) = candidates.first() {
        let conflicting: Vec<&str> = candidates
            .iter()
            .skip(1)
            .filter(|c| {
                c.pc != first.pc
                    || matches!((c.scale, first.scale), (Some(a), Some(b)) if a != b)
            })
            .map(|c| c.name.as_str())
            .collect();
        if !conflicting.is_empty() {
            diags.push(
                DiagnosticCode::ConflictingKeys,
                format!(
                    "several keys named ({}); using {}",
                    conflicting.join(", "),
                    first.name
                ),
            );
        }
    }

    let standalone_scale = scale_word_regex()
        .captures_iter(text)
        .filter_map(|caps| {
            let m = caps.get(1)?;
            if overlaps(excluded, m.start(), m.end()) {
                return None;
            }
            m.as_str().parse::<Scale>().ok()
        })
        .next();

    match candidates.into_iter().next() {
        Some(KeyCandidate { name, pc, scale }) => {
            let scale = scale
                .or(standalone_scale)
                .or(style.scale)
                .unwrap_or_default();
            (name, pc, scale)
        }
        None => {
            let scale = standalone_scale.or(style.scale).unwrap_or_default();
            let learned = style
                .key
                .as_deref()
                .map(key_name)
                .and_then(|name| parse_pitch_class(&name).ok().map(|pc| (name, pc)));
            match learned {
                Some((name, pc)) => (name, pc, scale),
                None => {
                    diags.push(
                        DiagnosticCode::DefaultKey,
                        format!("no key found; using {DEFAULT_KEY}"),
                    );
                    let pc = parse_pitch_class(DEFAULT_KEY).unwrap_or(0);
                    (DEFAULT_KEY.to_string(), pc, scale)
                }
            }
        }
    }
}

fn clamp_bpm(requested: f64, diags: &mut Diagnostics) -> f64 {
    let bpm = requested.clamp(MIN_BPM, MAX_BPM);
    if bpm != requested {
        diags.push(
            DiagnosticCode::ValueClamped,
            format!("tempo {requested} bpm clamped to {bpm}"),
        );
    }
    bpm
}

fn parse_bpm(
    text: &str,
    style: &LearnedStyle,
    preset: &GenrePreset,
    diags: &mut Diagnostics,
) -> f64 {
    let explicit = bpm_regex().captures(text).and_then(|caps| {
        caps.get(1)
            .or_else(|| caps.get(2))
            .and_then(|m| m.as_str().parse::<f64>().ok())
    });
    if let Some(bpm) = explicit {
        return clamp_bpm(bpm, diags);
    }
    if let Some(bpm) = style.bpm.filter(|b| b.is_finite()) {
        return clamp_bpm(bpm, diags);
    }
    diags.push(
        DiagnosticCode::DefaultBpm,
        format!("no tempo found; using {} bpm", preset.default_bpm),
    );
    preset.default_bpm
}

fn clamp_swing(requested: f64, diags: &mut Diagnostics) -> f64 {
    let swing = requested.clamp(MIN_SWING, MAX_SWING);
    if swing != requested {
        diags.push(
            DiagnosticCode::ValueClamped,
            format!("swing {requested} clamped to {swing}"),
        );
    }
    swing
}

fn parse_swing(
    text: &str,
    lower: &str,
    style: &LearnedStyle,
    preset: &GenrePreset,
    diags: &mut Diagnostics,
) -> f64 {
    if let Some(caps) = swing_regex().captures(text) {
        let value = caps
            .get(1)
            .or_else(|| caps.get(3))
            .and_then(|m| m.as_str().parse::<f64>().ok());
        let percent = caps.get(2).is_some() || caps.get(4).is_some();
        if let Some(value) = value {
            let ratio = if percent || value > 1.0 {
                value / 100.0
            } else {
                value
            };
            return clamp_swing(ratio, diags);
        }
    }
    if contains_word(lower, "shuffle") || contains_word(lower, "heavy swing") {
        return SHUFFLE_SWING.max(preset.groove.swing);
    }
    if ["swing", "swung", "swingy"]
        .iter()
        .any(|w| contains_word(lower, w))
    {
        return WORD_SWING.max(preset.groove.swing);
    }
    if let Some(swing) = style.swing.filter(|s| s.is_finite()) {
        return clamp_swing(swing, diags);
    }
    preset.groove.swing
}

fn parse_energy(lower: &str, style: &LearnedStyle, bpm: f64) -> Energy {
    if tables::HIGH_ENERGY_WORDS
        .iter()
        .any(|w| contains_word(lower, w))
    {
        return Energy::High;
    }
    if tables::LOW_ENERGY_WORDS
        .iter()
        .any(|w| contains_word(lower, w))
    {
        return Energy::Low;
    }
    if let Some(energy) = style.energy {
        return energy;
    }
    if bpm >= 135.0 {
        Energy::High
    } else if bpm <= 85.0 {
        Energy::Low
    } else {
        Energy::Medium
    }
}

fn parse_density(lower: &str, style: &LearnedStyle) -> Density {
    if tables::SPARSE_WORDS.iter().any(|w| contains_word(lower, w)) {
        return Density::Sparse;
    }
    if tables::DENSE_WORDS.iter().any(|w| contains_word(lower, w)) {
        return Density::Dense;
    }
    style
        .notes_per_beat
        .filter(|r| r.is_finite())
        .map(Density::from_notes_per_beat)
        .unwrap_or_default()
}

fn parse_humanize(lower: &str, preset: &GenrePreset) -> HumanizeProfile {
    tables::HUMANIZE_WORDS
        .iter()
        .find(|(word, _)| contains_word(lower, word))
        .and_then(|(_, profile)| profile.parse::<HumanizeProfile>().ok())
        .unwrap_or(preset.humanize)
}

fn parse_extension(text: &str, preset: &GenrePreset) -> ChordExtension {
    extension_regex()
        .captures(text)
        .and_then(|caps| {
            let raw = caps[1].to_ascii_lowercase();
            let tag = raw.trim_end_matches("chords").trim().to_string();
            tag.parse::<ChordExtension>().ok()
        })
        .unwrap_or(preset.chord_extension)
}

/// Splits a progression list on commas, dashes, bars, and whitespace and
/// keeps the roman-numeral tokens. Returns `None` when no token is a
/// roman numeral (e.g. a bracketed motif).
fn progression_tokens(list: &str, diags: &mut Diagnostics) -> Option<Vec<String>> {
    let tokens: Vec<&str> = list
        .split(|c: char| c == ',' || c == '-' || c == '|' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .collect();
    let (valid, invalid): (Vec<&str>, Vec<&str>) =
        tokens.into_iter().partition(|t| parse_roman(t).is_some());
    if valid.is_empty() {
        return None;
    }
    if !invalid.is_empty() {
        diags.push(
            DiagnosticCode::InvalidProgressionToken,
            format!("ignored progression tokens: {}", invalid.join(", ")),
        );
    }
    Some(valid.into_iter().map(str::to_string).collect())
}

fn parse_progression(
    text: &str,
    lower: &str,
    scale: Scale,
    preset: &GenrePreset,
    diags: &mut Diagnostics,
) -> (Vec<String>, String) {
    for caps in bracket_regex().captures_iter(text) {
        if let Some(tokens) = progression_tokens(&caps[1], diags) {
            return (tokens, "custom".to_string());
        }
    }
    if let Some(caps) = progression_label_regex().captures(text) {
        if let Some(tokens) = progression_tokens(&caps[1], diags) {
            return (tokens, "custom".to_string());
        }
    }

    let style = tables::PROGRESSION_STYLE_WORDS
        .iter()
        .find(|(word, _)| contains_word(lower, word))
        .map(|(_, style)| *style)
        .unwrap_or(preset.progression_style);

    let progression = progression_for(style, scale.is_minor_like())
        .unwrap_or(&["I"])
        .iter()
        .map(|t| t.to_string())
        .collect();
    (progression, style.to_string())
}

fn parse_beats_per_chord(text: &str, diags: &mut Diagnostics) -> u32 {
    if let Some(caps) = beats_per_chord_regex().captures(text) {
        let requested = caps[1].parse::<u32>().unwrap_or(u32::MAX);
        let beats = requested.clamp(1, MAX_BEATS_PER_CHORD);
        if beats != requested {
            diags.push(
                DiagnosticCode::ValueClamped,
                format!("beats per chord {} clamped to {beats}", &caps[1]),
            );
        }
        return beats;
    }
    if let Some(caps) = chords_per_bar_regex().captures(text) {
        let requested = caps[1].parse::<u32>().unwrap_or(u32::MAX);
        let chords = requested.clamp(1, 4);
        if chords != requested {
            diags.push(
                DiagnosticCode::ValueClamped,
                format!("chords per bar {} clamped to {chords}", &caps[1]),
            );
        }
        return (4 / chords).max(1);
    }
    DEFAULT_BEATS_PER_CHORD
}

fn resolve_layers(intent: Intent, lower: &str, preset: &GenrePreset) -> Vec<TrackType> {
    let mut layers: Vec<TrackType> = tables::base_layers(intent).to_vec();
    if matches!(intent, Intent::Full | Intent::NoDrums) {
        let requested = tables::LAYER_KEYWORDS
            .iter()
            .filter(|(word, _)| contains_word(lower, word))
            .map(|(_, layer)| *layer);
        for layer in preset.extra_layers.iter().copied().chain(requested) {
            if !layers.contains(&layer) {
                layers.push(layer);
            }
        }
    }
    layers
}

fn parse_glide(text: &str, preset: &GenrePreset, diags: &mut Diagnostics) -> Option<GlideSettings> {
    if no_glide_regex().is_match(text) {
        return None;
    }
    let Some(caps) = glide_regex().captures(text) else {
        return preset.glide.then(GlideSettings::default);
    };

    let mut glide = GlideSettings::default();
    if let Some(depth) = caps.get(1) {
        let requested = depth.as_str().parse::<u32>().unwrap_or(u32::MAX);
        let clamped = requested.clamp(1, MAX_GLIDE_DEPTH as u32);
        if clamped != requested {
            diags.push(
                DiagnosticCode::ValueClamped,
                format!("glide depth {} clamped to {clamped}", depth.as_str()),
            );
        }
        glide.depth_semitones = clamped as u8;
    }
    if let Some(steps) = caps.get(2) {
        let requested = steps.as_str().parse::<u32>().unwrap_or(u32::MAX);
        let clamped = requested.clamp(1, MAX_GLIDE_STEPS as u32);
        if clamped != requested {
            diags.push(
                DiagnosticCode::ValueClamped,
                format!("glide steps {} clamped to {clamped}", steps.as_str()),
            );
        }
        glide.resolution = clamped as u16;
    }
    Some(glide)
}

fn parse_motif(text: &str) -> Option<Vec<u8>> {
    let caps = motif_regex().captures(text)?;
    let pitches: Vec<u8> = caps[1]
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .filter_map(|token| {
            if token.chars().all(|c| c.is_ascii_digit()) {
                token.parse::<u8>().ok().filter(|p| *p <= 127)
            } else {
                parse_note_name(token)
            }
        })
        .collect();
    (!pitches.is_empty()).then_some(pitches)
}

/// Genre program pools for every role, patched by instrument phrases in the
/// prompt. A role word right after the phrase ("flute melody") picks the
/// role; otherwise the phrase's default role is used.
fn resolve_instruments(lower: &str, genre: Genre) -> InstrumentPrograms {
    let mut programs: InstrumentPrograms = TrackType::ALL
        .into_iter()
        .map(|role| (role, ProgramChoice::Pool(genre.programs(role).to_vec())))
        .collect::<BTreeMap<_, _>>();

    let mut claimed: Vec<(usize, usize)> = Vec::new();
    for (phrase, program, default_role) in tables::INSTRUMENT_KEYWORDS {
        for start in word_positions(lower, phrase).collect::<Vec<_>>() {
            let end = start + phrase.len();
            if overlaps(&claimed, start, end) {
                continue;
            }
            claimed.push((start, end));

            let role = lower[end..]
                .split_whitespace()
                .next()
                .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
                .and_then(|w| w.parse::<TrackType>().ok())
                .filter(|role| !role.is_percussion())
                .unwrap_or(*default_role);
            debug!(instrument = phrase, program, role = %role, "instrument override");
            programs.insert(role, ProgramChoice::Fixed(*program));
        }
    }
    programs
}
