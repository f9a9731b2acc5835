//! Track catalog and playlist materialization.
//!
//! The catalog is the source of truth built from descriptor records. The
//! current playlist only ever holds clones of catalog entries.

use serde::Serialize;
use tracing::{error, info, warn};

use super::playlist::Playlist;
use crate::error::{DjError, Result};
use crate::types::{Track, TrackDescriptor};

/// Outcome of [`LibraryService::load_playlist_from_indices`].
#[derive(Debug, Default)]
pub struct PlaylistLoadReport {
    pub name: String,
    /// Number of tracks placed in the playlist.
    pub loaded: usize,
    /// Indices or clones that were skipped, in request order.
    pub skipped: Vec<DjError>,
}

/// Serializable summary of a [`PlaylistLoadReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaylistLoadSummary {
    pub name: String,
    pub loaded: usize,
    pub skipped: Vec<String>,
}

impl PlaylistLoadReport {
    pub fn summary(&self) -> PlaylistLoadSummary {
        PlaylistLoadSummary {
            name: self.name.clone(),
            loaded: self.loaded,
            skipped: self.skipped.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Owns the catalog and the currently materialized playlist.
#[derive(Debug, Default)]
pub struct LibraryService {
    library: Vec<Track>,
    playlist: Playlist,
}

impl LibraryService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds catalog entries from descriptor records.
    ///
    /// Invalid descriptors are logged and skipped. Returns the number of
    /// tracks added.
    pub fn build_library(&mut self, descriptors: &[TrackDescriptor]) -> usize {
        let before = self.library.len();
        for desc in descriptors {
            match Track::try_from(desc) {
                Ok(track) => self.library.push(track),
                Err(e) => warn!(title = %desc.title, error = %e, "Skipping track descriptor"),
            }
        }
        let added = self.library.len() - before;
        info!(added, total = self.library.len(), "Track library built");
        added
    }

    pub fn catalog(&self) -> &[Track] {
        &self.library
    }

    /// Replaces the current playlist with clones of the catalog entries at
    /// the given 1-based indices.
    ///
    /// Out-of-range indices and failed clones are recorded in the report and
    /// do not stop the remaining indices from loading. Each clone is loaded
    /// and beat-analyzed before it is added.
    pub fn load_playlist_from_indices(
        &mut self,
        name: &str,
        track_indices: &[i64],
    ) -> PlaylistLoadReport {
        info!(playlist = name, "Loading playlist");
        self.playlist = Playlist::new(name);

        let mut report = PlaylistLoadReport {
            name: name.to_string(),
            ..Default::default()
        };

        for &index in track_indices {
            let mut track = match self.clone_catalog_entry(index) {
                Ok(track) => track,
                Err(e) => {
                    warn!(index, error = %e, "Skipping playlist entry");
                    report.skipped.push(e);
                    continue;
                }
            };

            track.load();
            track.analyze_beatgrid();
            match self.playlist.add_track(track) {
                Ok(()) => report.loaded += 1,
                Err(e) => report.skipped.push(e),
            }
        }

        info!(
            playlist = name,
            tracks = self.playlist.track_count(),
            "Playlist loaded"
        );
        report
    }

    fn clone_catalog_entry(&self, index: i64) -> Result<Track> {
        let source = usize::try_from(index)
            .ok()
            .filter(|&i| i >= 1)
            .and_then(|i| self.library.get(i - 1))
            .ok_or_else(|| DjError::invalid_index(index, self.library.len()))?;

        source.try_clone().map_err(|e| {
            error!(index, error = %e, "Failed to clone catalog track");
            e
        })
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn playlist_mut(&mut self) -> &mut Playlist {
        &mut self.playlist
    }

    /// First playlist track with the given title.
    pub fn find_track(&self, title: &str) -> Option<&Track> {
        self.playlist.find_track(title)
    }

    pub fn track_titles(&self) -> Vec<String> {
        self.playlist.track_titles()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::types::{ExtraParam, TrackKind};

    fn descriptor(title: &str, duration: i64) -> TrackDescriptor {
        TrackDescriptor {
            kind: TrackKind::Uncompressed,
            title: title.to_string(),
            artists: vec!["Artist".to_string()],
            duration_seconds: duration,
            bpm: 128,
            extra_param1: 44_100,
            extra_param2: ExtraParam::Number(16),
        }
    }

    fn three_track_library() -> LibraryService {
        let mut library = LibraryService::new();
        let added = library.build_library(&[
            descriptor("One", 100),
            descriptor("Two", 200),
            descriptor("Three", 300),
        ]);
        assert_eq!(added, 3);
        library
    }

    #[test]
    fn build_skips_invalid_descriptors() {
        let mut library = LibraryService::new();
        let mut bad = descriptor("Bad", 100);
        bad.extra_param2 = ExtraParam::Flag(true);

        let added = library.build_library(&[descriptor("Good", 100), bad]);

        assert_eq!(added, 1);
        assert_eq!(library.catalog().len(), 1);
    }

    #[test]
    fn invalid_index_is_skipped() {
        let mut library = three_track_library();
        let report = library.load_playlist_from_indices("Mix", &[2, 5, 1]);

        assert_eq!(report.loaded, 2);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].code, ErrorCode::InvalidIndex);

        let playlist = library.playlist();
        assert_eq!(playlist.name(), "Mix");
        assert_eq!(playlist.track_count(), 2);
        assert_eq!(playlist.track_titles(), vec!["One", "Two"]);
    }

    #[test]
    fn zero_and_negative_indices_are_invalid() {
        let mut library = three_track_library();
        let report = library.load_playlist_from_indices("Edge", &[0, -1, 3, 4]);

        assert_eq!(report.loaded, 1);
        assert_eq!(report.skipped.len(), 3);
        assert_eq!(library.track_titles(), vec!["Three"]);
    }

    #[test]
    fn playlist_holds_loaded_clones() {
        let mut library = three_track_library();
        library.load_playlist_from_indices("Mix", &[1]);

        let copy = library.find_track("One").unwrap();
        assert!(copy.is_loaded());
        assert!(copy.is_analyzed());
        assert!(!library.catalog()[0].is_loaded());

        library.playlist_mut().find_track_mut("One").unwrap().set_bpm(99);
        assert_eq!(library.catalog()[0].bpm(), 128);
    }

    #[test]
    fn reload_replaces_previous_playlist() {
        let mut library = three_track_library();
        library.load_playlist_from_indices("First", &[1, 2]);
        library.load_playlist_from_indices("Second", &[3]);

        assert_eq!(library.playlist().name(), "Second");
        assert_eq!(library.track_titles(), vec!["Three"]);
    }

    #[test]
    fn same_index_twice_yields_two_clones() {
        let mut library = three_track_library();
        let report = library.load_playlist_from_indices("Repeat", &[1, 1]);

        assert_eq!(report.loaded, 2);
        assert_eq!(library.playlist().get_total_duration(), 200);
    }

    #[test]
    fn summary_stringifies_skips() {
        let mut library = three_track_library();
        let summary = library.load_playlist_from_indices("Mix", &[9]).summary();

        assert_eq!(summary.loaded, 0);
        assert!(summary.skipped[0].contains("INVALID_INDEX"));
    }
}
