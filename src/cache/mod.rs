//! Cache module for track storage.
//!
//! Provides LRU-based caching of loaded tracks keyed by title.

pub mod tracks;

// Re-export commonly used types
pub use tracks::{CacheStatus, TrackCache, DEFAULT_MAX_ENTRIES};
