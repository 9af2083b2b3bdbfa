//! CLI argument definitions for the Cadenza command-line interface.
//!
//! All `#[derive(Parser)]` and `#[derive(Subcommand)]` types are defined here,
//! keeping `main.rs` focused on dispatch logic.

use clap::{Parser, Subcommand};

/// Cadenza - Prompt-to-Score Composition
#[derive(Parser)]
#[command(name = "cadenza")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a multi-track score from a prompt
    Generate {
        /// Free-text prompt (e.g. "trap, 140 bpm, F# minor, intro (4), hook (8)")
        #[arg(short, long)]
        prompt: String,

        /// Seed for all random streams (default: derived from the prompt)
        #[arg(long)]
        seed: Option<u64>,

        /// Comma-separated track list replacing the prompt's layers (e.g. melody,melody,drums)
        #[arg(long, value_delimiter = ',')]
        tracks: Vec<String>,

        /// Program override per role, as role=program (repeatable)
        #[arg(short, long = "instrument", value_name = "ROLE=PROGRAM")]
        instruments: Vec<String>,

        /// Learned-style JSON file used as a fallback below the prompt
        #[arg(long)]
        style: Option<String>,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<String>,

        /// Pretty-print the score JSON
        #[arg(long)]
        pretty: bool,

        /// Output a machine-readable JSON summary (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Interpret a prompt and print the parameter record
    Parse {
        /// Free-text prompt
        #[arg(short, long)]
        prompt: String,

        /// Pretty-print the output JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Validate a score JSON document
    Validate {
        /// Path to the score JSON file
        #[arg(short, long)]
        input: String,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Print the canonical BLAKE3 hash of a score JSON document
    Hash {
        /// Path to the score JSON file
        #[arg(short, long)]
        input: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_generate_args() {
        let cli = Cli::try_parse_from([
            "cadenza",
            "generate",
            "--prompt",
            "lofi",
            "--seed",
            "7",
            "--tracks",
            "melody,drums",
            "-i",
            "melody=73",
            "--instrument",
            "bass=33",
        ])
        .unwrap();
        match cli.command {
            Commands::Generate {
                prompt,
                seed,
                tracks,
                instruments,
                ..
            } => {
                assert_eq!(prompt, "lofi");
                assert_eq!(seed, Some(7));
                assert_eq!(tracks, vec!["melody", "drums"]);
                assert_eq!(instruments, vec!["melody=73", "bass=33"]);
            }
            _ => panic!("expected generate"),
        }
    }
}
