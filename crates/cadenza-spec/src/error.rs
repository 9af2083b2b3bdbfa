//! Error types for parsing, score I/O, and score validation.

use thiserror::Error;

/// Error returned by the `FromStr` impls of the named lookup tables.
///
/// The engine never surfaces these to callers; it turns them into
/// skip-with-warning diagnostics on the composition result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown track type '{0}'")]
    UnknownTrackType(String),
    #[error("unknown scale '{0}'")]
    UnknownScale(String),
    #[error("unknown genre '{0}'")]
    UnknownGenre(String),
    #[error("unknown humanization profile '{0}'")]
    UnknownHumanizeProfile(String),
    #[error("unknown chord extension '{0}'")]
    UnknownChordExtension(String),
    #[error("unknown energy tier '{0}'")]
    UnknownEnergy(String),
    #[error("unknown density tier '{0}'")]
    UnknownDensity(String),
    #[error("invalid pitch class '{0}'")]
    InvalidPitchClass(String),
}

/// Top-level error type for score document operations.
#[derive(Debug, Error)]
pub enum SpecError {
    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error codes reported by the score validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// V001: Note pitch outside 0..=127
    PitchOutOfRange,
    /// V002: Note velocity outside 1..=127
    VelocityOutOfRange,
    /// V003: Note start is negative or not finite
    InvalidStart,
    /// V004: Note duration is not strictly positive or not finite
    InvalidDuration,
    /// V005: Pitch-bend value outside 0..=16383
    PitchBendOutOfRange,
    /// V006: Pitch-bend time is negative or not finite
    InvalidPitchBendTime,
    /// V007: Percussion channel used by a non-drum track, or drums off it
    ReservedChannelMisuse,
    /// V008: MIDI channel outside 0..=15
    ChannelOutOfRange,
    /// V009: Instrument program outside 0..=127
    ProgramOutOfRange,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "V001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::PitchOutOfRange => "V001",
            ErrorCode::VelocityOutOfRange => "V002",
            ErrorCode::InvalidStart => "V003",
            ErrorCode::InvalidDuration => "V004",
            ErrorCode::PitchBendOutOfRange => "V005",
            ErrorCode::InvalidPitchBendTime => "V006",
            ErrorCode::ReservedChannelMisuse => "V007",
            ErrorCode::ChannelOutOfRange => "V008",
            ErrorCode::ProgramOutOfRange => "V009",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Warning codes reported by the score validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningCode {
    /// VW01: Two notes of the same pitch overlap on one track
    OverlappingNotes,
    /// VW02: Track carries no notes and no pitch bends
    EmptyTrack,
}

impl WarningCode {
    /// Returns the warning code string (e.g., "VW01").
    pub fn code(&self) -> &'static str {
        match self {
            WarningCode::OverlappingNotes => "VW01",
            WarningCode::EmptyTrack => "VW02",
        }
    }
}

impl std::fmt::Display for WarningCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A validation error with code, message, and optional location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub code: ErrorCode,
    pub message: String,
    /// Location of the offending value (e.g., "tracks\[2\].notes\[14\]").
    pub path: Option<String>,
}

impl ValidationError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
        }
    }

    pub fn with_path(code: ErrorCode, message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: Some(path.into()),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref path) = self.path {
            write!(f, "{}: {} (at {})", self.code, self.message, path)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

impl std::error::Error for ValidationError {}

/// A validation warning with code, message, and optional location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    pub code: WarningCode,
    pub message: String,
    pub path: Option<String>,
}

impl ValidationWarning {
    pub fn with_path(
        code: WarningCode,
        message: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            path: Some(path.into()),
        }
    }
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref path) = self.path {
            write!(f, "{}: {} (at {})", self.code, self.message, path)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

/// Result of score validation.
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether validation passed (no errors).
    pub ok: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    /// Creates a successful validation result.
    pub fn success() -> Self {
        Self {
            ok: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
        self.ok = false;
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Folds another result into this one.
    pub fn merge(&mut self, other: ValidationResult) {
        self.ok &= other.ok;
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    pub fn is_ok(&self) -> bool {
        self.ok
    }

    /// Converts to a Result, returning Err if there are errors.
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, Vec<ValidationError>> {
        if self.ok {
            Ok(self.warnings)
        } else {
            Err(self.errors)
        }
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::success()
    }
}
