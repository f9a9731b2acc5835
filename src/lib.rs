//! djdeck: track-handling core of a DJ application.
//!
//! Three owners hand tracks to each other, always by deep copy:
//!
//! - [`library`]: the catalog built from descriptor records and the
//!   current [`Playlist`] (front-inserted, owned tracks)
//! - [`cache`]: the capacity-bounded LRU [`TrackCache`], fronted by
//!   [`controller::DjController`]
//! - [`mixing`]: the two-slot [`DeckManager`] with BPM matching
//!
//! [`session`] wires them together for a session file; [`config`],
//! [`error`] and [`logging`] carry the ambient concerns.
//!
//! # Example
//!
//! ```rust,ignore
//! use djdeck::{DeckManager, Playlist, Track};
//!
//! let mut playlist = Playlist::new("Warmup");
//! playlist.add_track(Track::uncompressed("Intro", vec![], 240, 124, 44_100, 16))?;
//!
//! let mut decks = DeckManager::new(3, true);
//! let track = playlist.find_track("Intro").unwrap();
//! assert_eq!(decks.load_track_to_deck(track)?.deck, 1);
//! ```

pub mod cache;
pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod library;
pub mod logging;
pub mod mixing;
pub mod session;
pub mod types;

// Re-export commonly used types at crate root for convenience
pub use cache::{CacheStatus, TrackCache};
pub use config::{DjConfig, SessionSettings};
pub use controller::{CacheLoad, DjController};
pub use error::{DjError, ErrorCode, Result};
pub use library::{LibraryService, Playlist, PlaylistLoadReport};
pub use mixing::{BpmSync, DeckLoad, DeckManager, DeckStatus};
pub use session::{DjSession, SessionFile, SessionReport};
pub use types::{Track, TrackDescriptor, TrackFormat, TrackKind};
