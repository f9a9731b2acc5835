//! Track type representing a playable audio item.
//!
//! A Track has exactly one owner at a time (catalog, playlist, cache slot or
//! deck). Ownership moves across those boundaries by [`Track::try_clone`],
//! never by sharing the same instance.

use std::collections::TryReserveError;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::descriptor::TrackKind;
use crate::error::{DjError, Result};

/// Audio channels assumed by the uncompressed size estimate.
pub const CHANNEL_COUNT: u64 = 2;

/// Bitrate treated as full quality for compressed tracks.
pub const REFERENCE_BITRATE_KBPS: u32 = 320;

/// Format-specific fields of a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TrackFormat {
    /// Lossy, MP3-like audio.
    Compressed {
        /// Bitrate in kbps.
        bitrate_kbps: u32,
        /// Whether the file carries ID3 metadata.
        has_id3_tags: bool,
    },
    /// PCM, WAV-like audio.
    Uncompressed {
        /// Sample rate in Hz.
        sample_rate: u32,
        /// Bits per sample.
        bit_depth: u32,
    },
}

impl TrackFormat {
    /// Returns the variant tag.
    pub fn kind(&self) -> TrackKind {
        match self {
            TrackFormat::Compressed { .. } => TrackKind::Compressed,
            TrackFormat::Uncompressed { .. } => TrackKind::Uncompressed,
        }
    }

    /// Estimated on-disk size for a track of the given duration.
    pub fn estimated_bytes(&self, duration_seconds: u32) -> u64 {
        let duration = u64::from(duration_seconds);
        match *self {
            TrackFormat::Compressed { bitrate_kbps, .. } => {
                duration * u64::from(bitrate_kbps) * 1000 / 8
            }
            TrackFormat::Uncompressed {
                sample_rate,
                bit_depth,
            } => duration * u64::from(sample_rate) * u64::from(bit_depth / 8) * CHANNEL_COUNT,
        }
    }

    /// How much a beat grid computed from this format can be trusted.
    ///
    /// Uncompressed audio is exact; compressed audio scales with bitrate.
    pub fn precision_factor(&self) -> f64 {
        match *self {
            TrackFormat::Compressed { bitrate_kbps, .. } => {
                (f64::from(bitrate_kbps) / f64::from(REFERENCE_BITRATE_KBPS)).min(1.0)
            }
            TrackFormat::Uncompressed { .. } => 1.0,
        }
    }

    /// Quality score in `[0, 100]`.
    pub fn quality_score(&self) -> f64 {
        let score = match *self {
            TrackFormat::Compressed {
                bitrate_kbps,
                has_id3_tags,
            } => {
                let mut score =
                    f64::from(bitrate_kbps) / f64::from(REFERENCE_BITRATE_KBPS) * 100.0;
                if has_id3_tags {
                    score += 5.0;
                }
                if bitrate_kbps >= REFERENCE_BITRATE_KBPS {
                    score += 10.0;
                }
                if bitrate_kbps < 128 {
                    score -= 10.0;
                }
                score
            }
            TrackFormat::Uncompressed {
                sample_rate,
                bit_depth,
            } => {
                let mut score = 70.0;
                if sample_rate >= 44_100 {
                    score += 10.0;
                }
                if sample_rate >= 96_000 {
                    score += 5.0;
                }
                if bit_depth >= 16 {
                    score += 10.0;
                }
                if bit_depth >= 24 {
                    score += 5.0;
                }
                score
            }
        };
        score.clamp(0.0, 100.0)
    }
}

/// Outcome of a simulated load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    pub estimated_bytes: u64,
}

/// Outcome of a simulated beat-grid analysis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeatGrid {
    /// Estimated number of beats, truncated.
    pub beats: u64,
    pub precision_factor: f64,
}

/// A playable audio item.
#[derive(Debug, Clone)]
pub struct Track {
    title: String,
    artists: Vec<String>,
    duration_seconds: u32,
    bpm: u32,
    format: TrackFormat,
    loaded: bool,
    analyzed: bool,
}

impl Track {
    /// Creates a new, not yet loaded track.
    pub fn new(
        title: impl Into<String>,
        artists: Vec<String>,
        duration_seconds: u32,
        bpm: u32,
        format: TrackFormat,
    ) -> Self {
        Self {
            title: title.into(),
            artists,
            duration_seconds,
            bpm,
            format,
            loaded: false,
            analyzed: false,
        }
    }

    /// Creates a compressed track.
    pub fn compressed(
        title: impl Into<String>,
        artists: Vec<String>,
        duration_seconds: u32,
        bpm: u32,
        bitrate_kbps: u32,
        has_id3_tags: bool,
    ) -> Self {
        Self::new(
            title,
            artists,
            duration_seconds,
            bpm,
            TrackFormat::Compressed {
                bitrate_kbps,
                has_id3_tags,
            },
        )
    }

    /// Creates an uncompressed track.
    pub fn uncompressed(
        title: impl Into<String>,
        artists: Vec<String>,
        duration_seconds: u32,
        bpm: u32,
        sample_rate: u32,
        bit_depth: u32,
    ) -> Self {
        Self::new(
            title,
            artists,
            duration_seconds,
            bpm,
            TrackFormat::Uncompressed {
                sample_rate,
                bit_depth,
            },
        )
    }

    /// Title, also the key used by the cache and playlist lookups.
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn artists(&self) -> &[String] {
        &self.artists
    }

    /// Length in whole seconds.
    pub fn duration_seconds(&self) -> u32 {
        self.duration_seconds
    }

    pub fn bpm(&self) -> u32 {
        self.bpm
    }

    /// Overrides the tempo, as done by BPM sync.
    pub fn set_bpm(&mut self, bpm: u32) {
        self.bpm = bpm;
    }

    pub fn format(&self) -> &TrackFormat {
        &self.format
    }

    /// Variant tag of [`Track::format`].
    pub fn kind(&self) -> TrackKind {
        self.format.kind()
    }

    /// Returns true once [`Track::load`] has run on this instance.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Returns true once [`Track::analyze_beatgrid`] has run on this instance.
    pub fn is_analyzed(&self) -> bool {
        self.analyzed
    }

    /// Two tracks are the same entry in a playlist or cache iff their titles match.
    pub fn same_title(&self, other: &Track) -> bool {
        self.title == other.title
    }

    /// Produces an independently owned copy of this track.
    ///
    /// Every heap field is copied through fallible allocation, so running
    /// out of memory surfaces as `CLONE_FAILED` instead of aborting. Catalog,
    /// cache and deck hand-offs go through this method. The derived `Clone`
    /// stays infallible and backs in-memory copies such as `Playlist`
    /// assignment; use [`Playlist::try_clone`](crate::Playlist::try_clone)
    /// where a failed copy must be reported.
    pub fn try_clone(&self) -> Result<Track> {
        let title =
            try_copy_str(&self.title).map_err(|e| DjError::clone_failed(&self.title, e))?;

        let mut artists = Vec::new();
        artists
            .try_reserve_exact(self.artists.len())
            .map_err(|e| DjError::clone_failed(&self.title, e))?;
        for artist in &self.artists {
            artists.push(try_copy_str(artist).map_err(|e| DjError::clone_failed(&self.title, e))?);
        }

        Ok(Track {
            title,
            artists,
            duration_seconds: self.duration_seconds,
            bpm: self.bpm,
            format: self.format,
            loaded: self.loaded,
            analyzed: self.analyzed,
        })
    }

    /// Simulates ingesting the track. Idempotent.
    pub fn load(&mut self) -> LoadReport {
        let estimated_bytes = self.format.estimated_bytes(self.duration_seconds);
        info!(
            title = %self.title,
            kind = %self.kind(),
            estimated_bytes,
            "Loading track"
        );
        self.loaded = true;
        LoadReport { estimated_bytes }
    }

    /// Simulates beat-grid analysis. Idempotent.
    pub fn analyze_beatgrid(&mut self) -> BeatGrid {
        let beats = (f64::from(self.duration_seconds) / 60.0 * f64::from(self.bpm)) as u64;
        let precision_factor = self.format.precision_factor();
        debug!(
            title = %self.title,
            beats,
            precision_factor,
            "Analyzed beat grid"
        );
        self.analyzed = true;
        BeatGrid {
            beats,
            precision_factor,
        }
    }

    /// Quality score in `[0, 100]`.
    pub fn quality_score(&self) -> f64 {
        self.format.quality_score()
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} by {} ({}s, {} BPM)",
            self.title,
            self.artists.join(", "),
            self.duration_seconds,
            self.bpm
        )
    }
}

#[cfg(test)]
thread_local! {
    static FAIL_CLONES: std::cell::Cell<bool> = std::cell::Cell::new(false);
}

/// Makes every [`Track::try_clone`] on the current thread fail with
/// `CLONE_FAILED` until reset.
#[cfg(test)]
pub(crate) fn set_clone_failure(fail: bool) {
    FAIL_CLONES.with(|flag| flag.set(fail));
}

#[cfg(not(test))]
fn reserve_len(len: usize) -> usize {
    len
}

// A reservation past isize::MAX is a capacity overflow.
#[cfg(test)]
fn reserve_len(len: usize) -> usize {
    if FAIL_CLONES.with(|flag| flag.get()) {
        usize::MAX
    } else {
        len
    }
}

fn try_copy_str(s: &str) -> std::result::Result<String, TryReserveError> {
    let mut out = String::new();
    out.try_reserve_exact(reserve_len(s.len()))?;
    out.push_str(s);
    Ok(out)
}
