//! Parse command implementation
//!
//! Interprets a prompt and prints the parameter record, the song structure,
//! and every fallback diagnostic as JSON.

use anyhow::{Context, Result};
use cadenza_engine::interpret;
use std::process::ExitCode;

/// Run the parse command
pub fn run(prompt: &str, pretty: bool) -> Result<ExitCode> {
    let output = interpretation_json(prompt);
    let text = if pretty {
        serde_json::to_string_pretty(&output)
    } else {
        serde_json::to_string(&output)
    }
    .context("Failed to serialize parameters")?;
    println!("{}", text);
    Ok(ExitCode::SUCCESS)
}

/// JSON view of a prompt interpretation.
pub fn interpretation_json(prompt: &str) -> serde_json::Value {
    let interp = interpret(prompt);
    serde_json::json!({
        "params": interp.params,
        "structure": interp.structure,
        "diagnostics": interp.diagnostics,
    })
}
