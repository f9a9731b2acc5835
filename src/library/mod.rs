//! Catalog and playlist management.

mod playlist;
mod service;

pub use playlist::{Playlist, PlaylistEntryView, PlaylistView};
pub use service::{LibraryService, PlaylistLoadReport, PlaylistLoadSummary};
