//! Cadenza Score Types
//!
//! This crate provides the data model shared by the composition engine and
//! its collaborators: notes, pitch bends, sections, tracks, the composition
//! parameter record with its named lookup tables, the composition result
//! document, score validation, and hashing.
//!
//! # Example
//!
//! ```
//! use cadenza_spec::{Note, Track, TrackType, PERCUSSION_CHANNEL};
//! use cadenza_spec::validation::validate_track;
//!
//! let track = Track {
//!     id: "drums-0".to_string(),
//!     name: "Drums".to_string(),
//!     track_type: TrackType::Drums,
//!     channel: PERCUSSION_CHANNEL,
//!     program: 0,
//!     volume: 0.9,
//!     pan: 0.0,
//!     muted: false,
//!     solo: false,
//!     notes: vec![Note::new(36, 0.0, 0.25, 110)],
//!     pitch_bends: Vec::new(),
//! };
//!
//! assert!(validate_track(&track, "tracks[0]").is_ok());
//! ```
//!
//! # Modules
//!
//! - [`error`]: Parse, I/O, and validation error types
//! - [`note`]: Note and pitch-bend events, pitch-name helpers
//! - [`track`]: Track types, tracks, and sections
//! - [`params`]: Composition parameters, scales, genres, grooves
//! - [`score`]: The composition result document and diagnostics
//! - [`validation`]: Score validation
//! - [`hash`]: Score hashing and seed derivation

pub mod error;
pub mod hash;
pub mod note;
pub mod params;
pub mod score;
pub mod track;
pub mod validation;

// Re-export commonly used types at the crate root
pub use error::{
    ErrorCode, ParseError, SpecError, ValidationError, ValidationResult, ValidationWarning,
    WarningCode,
};
pub use hash::{canonical_score_hash, derive_stream_seed, prompt_seed};
pub use note::{Note, PitchBendEvent, PITCH_BEND_CENTER, PITCH_BEND_MAX};
pub use params::{
    ChordExtension, CompositionParams, Density, Energy, Genre, GenrePreset, GlideSettings,
    GrooveProfile, HumanizeProfile, HumanizeSettings, InstrumentPrograms, Intent, LearnedStyle,
    Modulation, ProgramChoice, Scale, TrackRequest,
};
pub use score::{CompositionResult, Diagnostic, DiagnosticCode, SCORE_VERSION};
pub use track::{total_beats, Section, Track, TrackType, BEATS_PER_BAR, PERCUSSION_CHANNEL};
pub use validation::{validate_composition, validate_notes, validate_track};
