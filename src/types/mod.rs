//! Core types for djdeck.
//!
//! - [`Track`]: a playable item with compressed or uncompressed format
//! - [`TrackDescriptor`]: the record a track is built from

mod descriptor;
mod track;

pub use descriptor::{ExtraParam, TrackDescriptor, TrackKind};
pub use track::{BeatGrid, LoadReport, Track, TrackFormat, CHANNEL_COUNT, REFERENCE_BITRATE_KBPS};

#[cfg(test)]
pub(crate) use track::set_clone_failure;
