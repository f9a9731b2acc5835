//! Ordered playlist of owned tracks.
//!
//! Tracks are inserted at the front, so iteration order is the reverse of
//! the order they were added in. Cloning a playlist deep-copies every track.

use std::collections::VecDeque;
use std::fmt;

use serde::Serialize;
use tracing::{info, warn};

use crate::error::{DjError, ErrorCode, Result};
use crate::types::Track;

/// A named, ordered sequence of owned tracks.
#[derive(Debug, Clone, Default)]
pub struct Playlist {
    name: String,
    tracks: VecDeque<Track>,
}

/// One line of a playlist listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaylistEntryView {
    pub title: String,
    pub artists: Vec<String>,
    pub duration_seconds: u32,
    pub bpm: u32,
}

/// Read-only summary of a playlist, front to back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaylistView {
    pub name: String,
    pub track_count: usize,
    pub total_duration_seconds: u64,
    pub tracks: Vec<PlaylistEntryView>,
}

impl fmt::Display for PlaylistView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Playlist: {} ({} tracks)", self.name, self.track_count)?;
        if self.tracks.is_empty() {
            return writeln!(f, "  (empty playlist)");
        }
        for (i, track) in self.tracks.iter().enumerate() {
            writeln!(
                f,
                "  {}. {} by {} ({}s, {} BPM)",
                i + 1,
                track.title,
                track.artists.join(", "),
                track.duration_seconds,
                track.bpm
            )?;
        }
        writeln!(f, "  Total duration: {} seconds", self.total_duration_seconds)
    }
}

impl Playlist {
    /// Creates an empty playlist.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tracks: VecDeque::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Deep copy that routes every track through [`Track::try_clone`].
    ///
    /// On `CLONE_FAILED` no partial copy is returned.
    pub fn try_clone(&self) -> Result<Playlist> {
        let mut tracks = VecDeque::new();
        tracks
            .try_reserve_exact(self.tracks.len())
            .map_err(|e| {
                DjError::with_source(
                    ErrorCode::CloneFailed,
                    format!("Failed to clone playlist '{}'", self.name),
                    e,
                )
            })?;
        for track in &self.tracks {
            tracks.push_back(track.try_clone()?);
        }
        Ok(Playlist {
            name: self.name.clone(),
            tracks,
        })
    }

    /// Replaces this playlist with a fallible deep copy of `source`. On
    /// failure `self` is left unchanged.
    pub fn try_clone_from(&mut self, source: &Playlist) -> Result<()> {
        *self = source.try_clone()?;
        Ok(())
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Number of tracks currently owned by the playlist.
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Takes ownership of `track` and places it first.
    ///
    /// A track with a blank title is rejected with `NO_OP_REJECTED` and the
    /// playlist is left unchanged.
    pub fn add_track(&mut self, track: Track) -> Result<()> {
        if track.title().trim().is_empty() {
            warn!(playlist = %self.name, "Cannot add untitled track to playlist");
            return Err(DjError::rejected(format!(
                "Cannot add untitled track to playlist '{}'",
                self.name
            )));
        }

        info!(title = %track.title(), playlist = %self.name, "Added track to playlist");
        self.tracks.push_front(track);
        Ok(())
    }

    /// Removes the first track (from the front) with the given title and
    /// hands it back to the caller.
    pub fn remove_track(&mut self, title: &str) -> Result<Track> {
        let Some(position) = self.tracks.iter().position(|t| t.title() == title) else {
            warn!(title, playlist = %self.name, "Track not found in playlist");
            return Err(DjError::not_found(title, &format!("playlist '{}'", self.name)));
        };

        let removed = self
            .tracks
            .remove(position)
            .ok_or_else(|| DjError::not_found(title, &format!("playlist '{}'", self.name)))?;
        info!(title, playlist = %self.name, "Removed track from playlist");
        Ok(removed)
    }

    /// First track (from the front) with the given title.
    pub fn find_track(&self, title: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.title() == title)
    }

    pub fn find_track_mut(&mut self, title: &str) -> Option<&mut Track> {
        self.tracks.iter_mut().find(|t| t.title() == title)
    }

    /// Sum of all track durations in seconds.
    pub fn get_total_duration(&self) -> u64 {
        self.tracks
            .iter()
            .map(|t| u64::from(t.duration_seconds()))
            .sum()
    }

    /// Tracks front to back.
    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    pub fn track_titles(&self) -> Vec<String> {
        self.tracks.iter().map(|t| t.title().to_string()).collect()
    }

    pub fn view(&self) -> PlaylistView {
        PlaylistView {
            name: self.name.clone(),
            track_count: self.track_count(),
            total_duration_seconds: self.get_total_duration(),
            tracks: self
                .tracks
                .iter()
                .map(|t| PlaylistEntryView {
                    title: t.title().to_string(),
                    artists: t.artists().to_vec(),
                    duration_seconds: t.duration_seconds(),
                    bpm: t.bpm(),
                })
                .collect(),
        }
    }
}
