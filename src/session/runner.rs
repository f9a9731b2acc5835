//! Runs a DJ session: materialize playlists, stage tracks through the cache
//! and play them across the two decks.

use serde::Serialize;
use tracing::{info, warn};

use super::file::SessionFile;
use crate::cache::CacheStatus;
use crate::config::DjConfig;
use crate::controller::{CacheLoad, DjController};
use crate::error::DjError;
use crate::library::{LibraryService, PlaylistLoadReport, PlaylistLoadSummary};
use crate::mixing::{DeckManager, DeckStatus};
use crate::types::TrackDescriptor;

/// Running counters for a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub tracks_processed: usize,
    pub cache_hits: usize,
    pub cache_misses: usize,
    pub cache_evictions: usize,
    pub deck_loads: usize,
    pub transitions: usize,
    pub bpm_syncs: usize,
    /// Recoverable failures: skipped indices, failed clones, unknown playlists.
    pub errors: usize,
}

/// Final state of a session run.
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub playlists: Vec<PlaylistLoadSummary>,
    pub stats: SessionStats,
    pub cache: CacheStatus,
    pub decks: DeckStatus,
}

/// Library, cache controller and decks for one session.
#[derive(Debug)]
pub struct DjSession {
    config: DjConfig,
    library: LibraryService,
    controller: DjController,
    decks: DeckManager,
    stats: SessionStats,
}

impl DjSession {
    pub fn new(config: DjConfig) -> Self {
        Self {
            library: LibraryService::new(),
            controller: DjController::new(config.cache_size),
            decks: DeckManager::from_config(&config),
            stats: SessionStats::default(),
            config,
        }
    }

    pub fn config(&self) -> &DjConfig {
        &self.config
    }

    pub fn library(&self) -> &LibraryService {
        &self.library
    }

    pub fn controller(&self) -> &DjController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut DjController {
        &mut self.controller
    }

    pub fn decks(&self) -> &DeckManager {
        &self.decks
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn load_library(&mut self, descriptors: &[TrackDescriptor]) -> usize {
        self.library.build_library(descriptors)
    }

    /// Materializes a playlist and plays it front to back.
    ///
    /// Each track is staged through the cache and the cached instance is
    /// loaded to a deck. A failure on one track is counted and the next
    /// track is processed.
    pub fn play_playlist(&mut self, name: &str, track_indices: &[i64]) -> PlaylistLoadReport {
        let report = self.library.load_playlist_from_indices(name, track_indices);
        self.stats.errors += report.skipped.len();

        for track in self.library.playlist().tracks() {
            self.stats.tracks_processed += 1;

            match self.controller.load_track_to_cache(track) {
                Ok(CacheLoad::Hit) => self.stats.cache_hits += 1,
                Ok(CacheLoad::NotCached) => self.stats.cache_misses += 1,
                Ok(CacheLoad::Inserted { evicted }) => {
                    self.stats.cache_misses += 1;
                    if evicted.is_some() {
                        self.stats.cache_evictions += 1;
                    }
                }
                Err(e) => {
                    warn!(title = %track.title(), error = %e, "Skipping track");
                    self.stats.errors += 1;
                    continue;
                }
            }

            let source = self
                .controller
                .get_track_from_cache(track.title())
                .unwrap_or(track);

            match self.decks.load_track_to_deck(source) {
                Ok(load) => {
                    self.stats.deck_loads += 1;
                    if load.transition {
                        self.stats.transitions += 1;
                    }
                    if load.synced.is_some() {
                        self.stats.bpm_syncs += 1;
                    }
                }
                Err(e) => {
                    warn!(title = %track.title(), error = %e, "Deck load failed");
                    self.stats.errors += 1;
                }
            }
        }

        info!(
            playlist = name,
            processed = self.stats.tracks_processed,
            "Playlist finished"
        );
        report
    }

    /// Builds the library from `session` and plays the selected playlists.
    ///
    /// An empty `only` selects every playlist in file order; otherwise the
    /// named playlists run in the order given, and unknown names are counted
    /// as errors.
    pub fn run(&mut self, session: &SessionFile, only: &[String]) -> SessionReport {
        self.load_library(&session.library);

        let mut playlists = Vec::new();
        if only.is_empty() {
            for spec in &session.playlists {
                playlists.push(self.play_playlist(&spec.name, &spec.tracks).summary());
            }
        } else {
            for name in only {
                match session.playlist(name) {
                    Some(spec) => {
                        playlists.push(self.play_playlist(&spec.name, &spec.tracks).summary())
                    }
                    None => {
                        let e = DjError::not_found(name, "session playlists");
                        warn!(error = %e, "Unknown playlist");
                        self.stats.errors += 1;
                    }
                }
            }
        }

        self.report(playlists)
    }

    pub fn report(&self, playlists: Vec<PlaylistLoadSummary>) -> SessionReport {
        SessionReport {
            playlists,
            stats: self.stats.clone(),
            cache: self.controller.cache_status(),
            decks: self.decks.status(),
        }
    }
}
