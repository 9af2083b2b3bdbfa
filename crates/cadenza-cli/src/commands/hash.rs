//! Hash command implementation
//!
//! Prints the canonical BLAKE3 hash of a score document.

use anyhow::{Context, Result};
use cadenza_spec::canonical_score_hash;
use std::path::Path;
use std::process::ExitCode;

use crate::input::load_score;

/// Run the hash command
///
/// # Returns
/// Exit code: 0 on success
pub fn run(input_path: &str) -> Result<ExitCode> {
    let score = load_score(Path::new(input_path))
        .with_context(|| format!("Failed to load score file: {}", input_path))?;
    let hash = canonical_score_hash(&score).context("Failed to hash score")?;
    println!("{}", hash);
    Ok(ExitCode::SUCCESS)
}
