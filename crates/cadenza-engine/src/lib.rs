//! Cadenza Engine - Deterministic Prompt-to-Score Composition
//!
//! This crate turns a free-text prompt into a complete multi-track score:
//! melody, voice-led chords, bass with optional 808 glides, drums, and
//! derived arpeggio, pad, lead, and countermelody layers, each on its own
//! MIDI channel with a resolved General MIDI program.
//!
//! # Determinism
//!
//! Generation is a pure function of `(prompt, options)`. Randomness comes
//! from PCG32 streams whose seeds are derived with BLAKE3 per (section,
//! track instance), so two runs with the same seed serialize to identical
//! JSON, and adding a track never changes the notes of another.
//!
//! # Example
//!
//! ```
//! use cadenza_engine::{generate_composition, interpret, GenerateOptions};
//!
//! let interp = interpret("lofi in D dorian, 82 bpm, verse (8), hook (8)");
//! assert_eq!(interp.params.key, "D");
//!
//! let result = generate_composition(
//!     "lofi in D dorian, 82 bpm, verse (8), hook (8)",
//!     &GenerateOptions::with_seed(42),
//! );
//! assert_eq!(result.total_beats, 64);
//! assert!(!result.tracks.is_empty());
//! ```
//!
//! # Module Structure
//!
//! - [`prompt`]: Prompt interpretation into a parameter record
//! - [`harmony`]: Scale tables, roman-numeral chords, extensions
//! - [`voice_leading`]: Minimal-movement chord voicing
//! - [`humanize`]: Swing and timing/velocity jitter
//! - [`generators`]: Per-section track generators
//! - [`channels`]: Channel allocation and track consolidation
//! - [`assemble`]: The [`generate_composition`] entry point

pub mod assemble;
pub mod channels;
pub mod generators;
pub mod harmony;
pub mod humanize;
pub mod prompt;
pub mod rng;
pub mod voice_leading;

// Re-export main entry points
pub use assemble::{generate_composition, GenerateOptions};
pub use prompt::{interpret, interpret_with_style, Interpretation};
pub use rng::{ComposeRng, RandomSource};

/// Crate version, recorded by the CLI alongside generated scores.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
