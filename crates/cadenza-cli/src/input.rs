//! Loading of score documents and learned-style files.

use std::path::Path;

use cadenza_spec::{CompositionResult, LearnedStyle, SpecError};

/// Reads a score JSON document.
pub fn load_score(path: &Path) -> Result<CompositionResult, SpecError> {
    let text = std::fs::read_to_string(path)?;
    Ok(CompositionResult::from_json(&text)?)
}

/// Reads a learned-style JSON file. Missing fields stay unset.
pub fn load_style(path: &Path) -> Result<LearnedStyle, SpecError> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_style_partial() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"bpm": 92.0, "key": "E"}}"#).unwrap();
        let style = load_style(file.path()).unwrap();
        assert_eq!(style.bpm, Some(92.0));
        assert_eq!(style.key.as_deref(), Some("E"));
        assert_eq!(style.scale, None);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_score(Path::new("/nonexistent/score.json")).unwrap_err();
        assert!(matches!(err, SpecError::Io(_)));
    }

    #[test]
    fn test_bad_json_is_json_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = load_score(file.path()).unwrap_err();
        assert!(matches!(err, SpecError::Json(_)));
    }
}
