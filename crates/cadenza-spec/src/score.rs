//! The composition result document and its diagnostics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::params::CompositionParams;
use crate::track::{Section, Track};

/// Score document schema version.
pub const SCORE_VERSION: u32 = 1;

/// Why a fallback or skip happened during generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticCode {
    /// W001: Prompt was empty or whitespace
    EmptyPrompt,
    /// W002: No key found; default key used
    DefaultKey,
    /// W003: No tempo found; genre or global default used
    DefaultBpm,
    /// W004: No section tokens found; default structure used
    DefaultStructure,
    /// W005: No genre keyword found; default genre used
    DefaultGenre,
    /// W006: Several conflicting keys named; the first was used
    ConflictingKeys,
    /// W007: Explicit progression contained tokens that are not roman numerals
    InvalidProgressionToken,
    /// W008: Requested track type is unknown and was skipped
    UnknownTrackType,
    /// W009: A numeric token was out of range and clamped
    ValueClamped,
    /// W010: Modulation target could not be parsed
    InvalidModulation,
    /// W011: Several conflicting intents named; the most specific won
    ConflictingIntents,
}

impl DiagnosticCode {
    /// Returns the code string (e.g., "W001").
    pub fn code(&self) -> &'static str {
        match self {
            DiagnosticCode::EmptyPrompt => "W001",
            DiagnosticCode::DefaultKey => "W002",
            DiagnosticCode::DefaultBpm => "W003",
            DiagnosticCode::DefaultStructure => "W004",
            DiagnosticCode::DefaultGenre => "W005",
            DiagnosticCode::ConflictingKeys => "W006",
            DiagnosticCode::InvalidProgressionToken => "W007",
            DiagnosticCode::UnknownTrackType => "W008",
            DiagnosticCode::ValueClamped => "W009",
            DiagnosticCode::InvalidModulation => "W010",
            DiagnosticCode::ConflictingIntents => "W011",
        }
    }

    /// True for codes that record a silent fallback to a documented default.
    pub fn is_default(&self) -> bool {
        matches!(
            self,
            DiagnosticCode::EmptyPrompt
                | DiagnosticCode::DefaultKey
                | DiagnosticCode::DefaultBpm
                | DiagnosticCode::DefaultStructure
                | DiagnosticCode::DefaultGenre
        )
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A non-fatal event recorded during generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub message: String,
}

impl Diagnostic {
    pub fn new(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// Everything one generation call produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionResult {
    pub score_version: u32,
    /// Seed the RNG streams were derived from.
    pub seed: u64,
    pub params: CompositionParams,
    pub structure: Vec<Section>,
    pub tracks: Vec<Track>,
    pub total_beats: u32,
    /// Resolved program per track id.
    pub instrument_programs: BTreeMap<String, u8>,
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
}

impl CompositionResult {
    /// Whether any prompt field fell back to a default.
    pub fn used_default(&self) -> bool {
        self.diagnostics.iter().any(|d| d.code.is_default())
    }

    pub fn has_diagnostic(&self, code: DiagnosticCode) -> bool {
        self.diagnostics.iter().any(|d| d.code == code)
    }

    /// Total number of notes across all tracks.
    pub fn note_count(&self) -> usize {
        self.tracks.iter().map(|t| t.notes.len()).sum()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_diagnostic_display() {
        let d = Diagnostic::new(DiagnosticCode::DefaultKey, "no key in prompt; using C major");
        assert_eq!(d.to_string(), "W002: no key in prompt; using C major");
    }

    #[test]
    fn test_default_codes() {
        assert!(DiagnosticCode::DefaultStructure.is_default());
        assert!(!DiagnosticCode::UnknownTrackType.is_default());
        assert!(!DiagnosticCode::ConflictingKeys.is_default());
    }
}
