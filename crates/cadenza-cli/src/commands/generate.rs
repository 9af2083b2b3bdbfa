//! Generate command implementation
//!
//! Generates a score from a prompt and writes it as JSON. The score goes to
//! stdout unless `--output` is given; the human summary always goes to
//! stderr so piped output stays clean.

use anyhow::{bail, Context, Result};
use cadenza_engine::{generate_composition, GenerateOptions};
use cadenza_spec::{canonical_score_hash, CompositionResult, TrackRequest, TrackType};
use colored::Colorize;
use std::collections::BTreeMap;
use std::path::Path;
use std::process::ExitCode;
use tracing::debug;

use crate::input::load_style;

/// Run the generate command
///
/// # Arguments
/// * `prompt` - Free-text prompt
/// * `seed` - Optional seed (default: derived from the prompt)
/// * `tracks` - Explicit track kinds; empty keeps the prompt's layers
/// * `instruments` - `role=program` overrides
/// * `style_path` - Optional learned-style JSON file
/// * `output_path` - Optional output file (default: stdout)
/// * `pretty` - Pretty-print the score JSON
/// * `json_output` - Print a machine-readable summary instead of the human one
///
/// # Returns
/// Exit code: 0 on success
#[allow(clippy::too_many_arguments)]
pub fn run(
    prompt: &str,
    seed: Option<u64>,
    tracks: &[String],
    instruments: &[String],
    style_path: Option<&str>,
    output_path: Option<&str>,
    pretty: bool,
    json_output: bool,
) -> Result<ExitCode> {
    let options = build_options(seed, tracks, instruments, style_path)?;
    debug!(
        seed = ?options.seed,
        tracks = ?options.tracks.as_ref().map(Vec::len),
        overrides = options.instrument_overrides.len(),
        style = options.learned_style.is_some(),
        "generating"
    );
    let result = generate_composition(prompt, &options);

    let score_json = if pretty {
        result.to_json_pretty()
    } else {
        result.to_json()
    }
    .context("Failed to serialize score")?;
    let hash = canonical_score_hash(&result).context("Failed to hash score")?;

    match output_path {
        Some(path) => {
            std::fs::write(path, &score_json)
                .with_context(|| format!("Failed to write score file: {}", path))?;
            debug!(path, bytes = score_json.len(), "wrote score");
        }
        None => println!("{}", score_json),
    }

    if json_output {
        // With no output file, stdout already carries the score.
        if output_path.is_some() {
            let summary = summary_json(&result, &hash, output_path);
            println!(
                "{}",
                serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?
            );
        }
    } else {
        print_summary(&result, &hash, output_path);
    }

    Ok(ExitCode::SUCCESS)
}

/// Builds engine options from command-line values.
pub fn build_options(
    seed: Option<u64>,
    tracks: &[String],
    instruments: &[String],
    style_path: Option<&str>,
) -> Result<GenerateOptions> {
    let instrument_overrides = instruments
        .iter()
        .map(|entry| parse_instrument(entry))
        .collect::<Result<BTreeMap<_, _>>>()?;

    let tracks = (!tracks.is_empty()).then(|| {
        tracks
            .iter()
            .map(|kind| TrackRequest::new(kind.trim()))
            .collect()
    });

    let learned_style = style_path
        .map(|path| {
            load_style(Path::new(path))
                .with_context(|| format!("Failed to load style file: {}", path))
        })
        .transpose()?;

    Ok(GenerateOptions {
        seed,
        instrument_overrides,
        tracks,
        learned_style,
    })
}

/// Parses `role=program`, e.g. `melody=73`.
pub fn parse_instrument(entry: &str) -> Result<(TrackType, u8)> {
    let Some((role, program)) = entry.split_once('=') else {
        bail!("invalid instrument '{}': expected ROLE=PROGRAM", entry);
    };
    let role: TrackType = role
        .parse()
        .with_context(|| format!("invalid instrument '{}'", entry))?;
    let program: u8 = program
        .trim()
        .parse()
        .with_context(|| format!("invalid program in '{}'", entry))?;
    if program > 127 {
        bail!("program {} in '{}' is outside 0..=127", program, entry);
    }
    Ok((role, program))
}

fn summary_json(
    result: &CompositionResult,
    hash: &str,
    output_path: Option<&str>,
) -> serde_json::Value {
    let tracks: Vec<serde_json::Value> = result
        .tracks
        .iter()
        .map(|t| {
            serde_json::json!({
                "id": t.id,
                "type": t.track_type,
                "channel": t.channel,
                "program": t.program,
                "notes": t.notes.len(),
                "pitch_bends": t.pitch_bends.len(),
            })
        })
        .collect();
    serde_json::json!({
        "ok": true,
        "engine_version": cadenza_engine::VERSION,
        "output": output_path,
        "hash": hash,
        "seed": result.seed,
        "total_beats": result.total_beats,
        "tracks": tracks,
        "diagnostics": result.diagnostics,
    })
}

fn print_summary(result: &CompositionResult, hash: &str, output_path: Option<&str>) {
    let params = &result.params;
    eprintln!(
        "{} {} tracks, {} notes, {} beats (seed {})",
        "Generated:".cyan().bold(),
        result.tracks.len(),
        result.note_count(),
        result.total_beats,
        result.seed
    );
    eprintln!(
        "  {} {} {}  {} {} bpm  {} {}",
        "Key:".dimmed(),
        params.key,
        params.scale,
        "Tempo:".dimmed(),
        params.bpm,
        "Genre:".dimmed(),
        params.genre
    );
    for track in &result.tracks {
        eprintln!(
            "  {:<16} ch {:>2}  prog {:>3}  {} notes",
            track.name,
            track.channel,
            track.program,
            track.notes.len()
        );
    }
    for diagnostic in &result.diagnostics {
        eprintln!("  {} {}", "!".yellow(), diagnostic);
    }
    eprintln!("{} {}", "Hash:".dimmed(), &hash[..16.min(hash.len())]);
    if let Some(path) = output_path {
        eprintln!("{} {}", "Wrote:".green().bold(), path);
    }
}
