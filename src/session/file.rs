//! Session file format.
//!
//! ```json
//! {
//!   "settings": { "cache_size": 3, "bpm_tolerance": 4, "auto_sync": true },
//!   "library": [
//!     { "type": "compressed", "title": "Opener", "artists": ["A"],
//!       "duration_seconds": 240, "bpm": 124,
//!       "extra_param1": 320, "extra_param2": true }
//!   ],
//!   "playlists": [ { "name": "Warmup", "tracks": [1, 1] } ]
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::SessionSettings;
use crate::error::{DjError, Result};
use crate::types::TrackDescriptor;

/// A named list of 1-based catalog indices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistSpec {
    pub name: String,
    #[serde(default)]
    pub tracks: Vec<i64>,
}

/// Parsed contents of a session file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionFile {
    pub settings: SessionSettings,
    pub library: Vec<TrackDescriptor>,
    pub playlists: Vec<PlaylistSpec>,
}

impl SessionFile {
    /// Reads and parses a session file.
    pub fn load(path: &Path) -> Result<Self> {
        let display = path.display().to_string();
        let text =
            fs::read_to_string(path).map_err(|e| DjError::session_load_failed(&display, e))?;
        serde_json::from_str(&text).map_err(|e| DjError::session_load_failed(&display, e))
    }

    /// Parses a session from a JSON string.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| DjError::session_load_failed("<inline>", e))
    }

    pub fn playlist(&self, name: &str) -> Option<&PlaylistSpec> {
        self.playlists.iter().find(|p| p.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::library::LibraryService;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SESSION: &str = r#"{
        "settings": { "cache_size": 2, "auto_sync": true },
        "library": [
            { "type": "compressed", "title": "One", "artists": ["A"],
              "duration_seconds": 200, "bpm": 124, "extra_param1": 320, "extra_param2": true },
            { "type": "uncompressed", "title": "Two", "artists": ["B", "C"],
              "duration_seconds": 300, "bpm": 128, "extra_param1": 44100, "extra_param2": 16 }
        ],
        "playlists": [ { "name": "Warmup", "tracks": [2, 1] } ]
    }"#;

    #[test]
    fn parses_full_session() {
        let session = SessionFile::from_json(SESSION).unwrap();

        assert_eq!(session.settings.cache_size, Some(2));
        assert_eq!(session.settings.bpm_tolerance, None);
        assert_eq!(session.library.len(), 2);
        assert_eq!(session.playlist("Warmup").unwrap().tracks, vec![2, 1]);
        assert!(session.playlist("Peak").is_none());
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let session = SessionFile::from_json("{}").unwrap();
        assert!(session.library.is_empty());
        assert!(session.playlists.is_empty());
    }

    #[test]
    fn unknown_track_type_keeps_valid_entries() {
        let session = SessionFile::from_json(
            r#"{
                "library": [
                    { "type": "compressed", "title": "Kept", "duration_seconds": 200,
                      "bpm": 124, "extra_param1": 320, "extra_param2": true },
                    { "type": "flac", "title": "Dropped", "duration_seconds": 200,
                      "bpm": 124, "extra_param1": 0, "extra_param2": 0 }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(session.library.len(), 2);

        let mut library = LibraryService::new();
        assert_eq!(library.build_library(&session.library), 1);
        assert_eq!(library.catalog()[0].title(), "Kept");
    }

    #[test]
    fn malformed_json_fails() {
        let err = SessionFile::from_json("{ not json").unwrap_err();
        assert_eq!(err.code, ErrorCode::SessionLoadFailed);
    }

    #[test]
    fn loads_from_disk() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SESSION.as_bytes()).unwrap();

        let session = SessionFile::load(file.path()).unwrap();
        assert_eq!(session.playlists.len(), 1);
    }

    #[test]
    fn missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = SessionFile::load(&dir.path().join("absent.json")).unwrap_err();

        assert_eq!(err.code, ErrorCode::SessionLoadFailed);
        assert!(err.message.contains("absent.json"));
    }
}
