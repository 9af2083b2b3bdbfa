//! Validate command implementation
//!
//! Runs the score validator over a score document and reports errors and
//! warnings.

use anyhow::{Context, Result};
use cadenza_spec::{validate_composition, ValidationResult};
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;

use crate::input::load_score;

/// Run the validate command
///
/// # Arguments
/// * `input_path` - Path to the score JSON file
/// * `json_output` - Whether to output machine-readable JSON diagnostics
///
/// # Returns
/// Exit code: 0 if valid, 1 if invalid
pub fn run(input_path: &str, json_output: bool) -> Result<ExitCode> {
    let score = load_score(Path::new(input_path))
        .with_context(|| format!("Failed to load score file: {}", input_path))?;
    let result = validate_composition(&score);

    if json_output {
        let text = serde_json::to_string_pretty(&result_json(&result))
            .context("Failed to serialize validation result")?;
        println!("{}", text);
    } else {
        print_human(input_path, score.tracks.len(), &result);
    }

    Ok(if result.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

fn print_human(input_path: &str, track_count: usize, result: &ValidationResult) {
    println!("{} {}", "Validating:".cyan().bold(), input_path);
    println!("{} {}", "Tracks:".dimmed(), track_count);

    for error in &result.errors {
        println!("  {} {}", "x".red(), error);
    }
    for warning in &result.warnings {
        println!("  {} {}", "!".yellow(), warning);
    }

    if result.is_ok() {
        println!(
            "{} ({} warnings)",
            "Score is valid".green().bold(),
            result.warnings.len()
        );
    } else {
        println!(
            "{} ({} errors, {} warnings)",
            "Score is invalid".red().bold(),
            result.errors.len(),
            result.warnings.len()
        );
    }
}

/// JSON view of a validation result.
pub fn result_json(result: &ValidationResult) -> serde_json::Value {
    let errors: Vec<serde_json::Value> = result
        .errors
        .iter()
        .map(|e| {
            serde_json::json!({
                "code": e.code.code(),
                "message": e.message,
                "path": e.path,
            })
        })
        .collect();
    let warnings: Vec<serde_json::Value> = result
        .warnings
        .iter()
        .map(|w| {
            serde_json::json!({
                "code": w.code.code(),
                "message": w.message,
                "path": w.path,
            })
        })
        .collect();
    serde_json::json!({
        "ok": result.is_ok(),
        "errors": errors,
        "warnings": warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadenza_spec::{ErrorCode, ValidationError};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_result_json() {
        let mut result = ValidationResult::success();
        result.add_error(ValidationError::with_path(
            ErrorCode::PitchOutOfRange,
            "pitch 200 is outside 0..=127",
            "tracks[0].notes[3]",
        ));
        let value = result_json(&result);
        assert_eq!(value["ok"], false);
        assert_eq!(value["errors"][0]["code"], ErrorCode::PitchOutOfRange.code());
        assert_eq!(value["errors"][0]["path"], "tracks[0].notes[3]");
        assert_eq!(value["warnings"].as_array().unwrap().len(), 0);
    }
}
