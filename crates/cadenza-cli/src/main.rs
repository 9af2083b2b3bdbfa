//! Cadenza CLI - Command-line interface for prompt-to-score composition
//!
//! This binary provides commands for generating, inspecting, validating,
//! and hashing Cadenza scores.

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use cadenza_cli::cli_args::{Cli, Commands};
use cadenza_cli::commands;

/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "warn";

fn setup_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    // A second init (e.g. in tests) is harmless; keep the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

fn main() -> ExitCode {
    setup_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            prompt,
            seed,
            tracks,
            instruments,
            style,
            output,
            pretty,
            json,
        } => commands::generate::run(
            &prompt,
            seed,
            &tracks,
            &instruments,
            style.as_deref(),
            output.as_deref(),
            pretty,
            json,
        ),
        Commands::Parse { prompt, pretty } => commands::parse::run(&prompt, pretty),
        Commands::Validate { input, json } => commands::validate::run(&input, json),
        Commands::Hash { input } => commands::hash::run(&input),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
