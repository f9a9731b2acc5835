//! Track cache with LRU eviction.
//!
//! Tracks are keyed by title. Recency is a monotonically increasing tick
//! stamped on every `get` hit and every `put`, so two entries never share a
//! stamp and an earlier insertion is always older.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::types::Track;

/// Default number of tracks to keep in cache.
pub const DEFAULT_MAX_ENTRIES: usize = 3;

/// Track cache with LRU eviction policy.
#[derive(Debug)]
pub struct TrackCache {
    /// Tracks indexed by title.
    tracks: HashMap<String, CacheEntry>,
    /// Maximum number of entries to keep.
    max_entries: usize,
    /// Next recency stamp.
    clock: u64,
}

/// A cached track with its last-use stamp.
#[derive(Debug)]
struct CacheEntry {
    track: Track,
    last_used: u64,
}

/// Snapshot of the cache for display and tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheStatus {
    pub size: usize,
    pub capacity: usize,
    /// Titles, most recently used first.
    pub recency: Vec<String>,
}

impl fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Cache: {}/{} tracks", self.size, self.capacity)?;
        for (i, title) in self.recency.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, title)?;
        }
        Ok(())
    }
}

impl TrackCache {
    /// Creates a new cache with default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_ENTRIES)
    }

    /// Creates a new cache with specified capacity.
    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            tracks: HashMap::with_capacity(max_entries),
            max_entries,
            clock: 0,
        }
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    /// Returns a track by title, marking it most recently used.
    pub fn get(&mut self, title: &str) -> Option<&Track> {
        let stamp = self.tick();
        let entry = self.tracks.get_mut(title)?;
        entry.last_used = stamp;
        Some(&entry.track)
    }

    /// Inserts or replaces the track stored under its title.
    ///
    /// A new title evicts the least recently used entry first when the cache
    /// is full. Returns the evicted track, if any. With zero capacity the
    /// incoming track itself is returned and nothing is stored.
    pub fn put(&mut self, track: Track) -> Option<Track> {
        if self.max_entries == 0 {
            debug!(title = %track.title(), "Cache has zero capacity, dropping track");
            return Some(track);
        }

        let stamp = self.tick();
        if let Some(entry) = self.tracks.get_mut(track.title()) {
            entry.track = track;
            entry.last_used = stamp;
            return None;
        }

        let evicted = if self.tracks.len() >= self.max_entries {
            self.evict_lru()
        } else {
            None
        };

        self.tracks.insert(
            track.title().to_string(),
            CacheEntry {
                track,
                last_used: stamp,
            },
        );
        evicted
    }

    /// Checks if a title exists in the cache.
    pub fn contains(&self, title: &str) -> bool {
        self.tracks.contains_key(title)
    }

    /// Returns the number of tracks in the cache.
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Maximum number of tracks held before eviction.
    pub fn capacity(&self) -> usize {
        self.max_entries
    }

    /// Changes the capacity, evicting least recently used entries until the
    /// cache fits. Returns the evicted tracks, oldest first.
    pub fn set_capacity(&mut self, max_entries: usize) -> Vec<Track> {
        self.max_entries = max_entries;
        let mut evicted = Vec::new();
        while self.tracks.len() > self.max_entries {
            match self.evict_lru() {
                Some(track) => evicted.push(track),
                None => break,
            }
        }
        evicted
    }

    /// Evicts the least recently used entry.
    ///
    /// Returns the evicted track if any.
    pub fn evict_lru(&mut self) -> Option<Track> {
        let oldest_key = self
            .tracks
            .iter()
            .min_by_key(|(_, entry)| entry.last_used)
            .map(|(k, _)| k.clone())?;

        let entry = self.tracks.remove(&oldest_key)?;
        debug!(title = %oldest_key, "Evicted least recently used track");
        Some(entry.track)
    }

    /// Removes a specific track from the cache.
    pub fn remove(&mut self, title: &str) -> Option<Track> {
        self.tracks.remove(title).map(|entry| entry.track)
    }

    /// Clears all entries from the cache.
    pub fn clear(&mut self) {
        self.tracks.clear();
    }

    /// Titles ordered from most to least recently used.
    pub fn recency_order(&self) -> Vec<&str> {
        let mut entries: Vec<(&String, &CacheEntry)> = self.tracks.iter().collect();
        entries.sort_by(|a, b| b.1.last_used.cmp(&a.1.last_used));
        entries.into_iter().map(|(title, _)| title.as_str()).collect()
    }

    /// Snapshot of size, capacity and recency order.
    pub fn status(&self) -> CacheStatus {
        CacheStatus {
            size: self.len(),
            capacity: self.max_entries,
            recency: self
                .recency_order()
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }
}

impl Default for TrackCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_track(title: &str) -> Track {
        Track::uncompressed(title, vec!["Artist".to_string()], 180, 128, 44_100, 16)
    }

    #[test]
    fn new_cache_is_empty() {
        let cache = TrackCache::new();
        assert!(cache.is_empty());
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.capacity(), DEFAULT_MAX_ENTRIES);
    }

    #[test]
    fn put_and_get() {
        let mut cache = TrackCache::new();
        cache.put(make_track("abc"));

        assert!(cache.contains("abc"));
        assert_eq!(cache.len(), 1);

        let retrieved = cache.get("abc").unwrap();
        assert_eq!(retrieved.title(), "abc");
    }

    #[test]
    fn get_nonexistent_returns_none() {
        let mut cache = TrackCache::new();
        assert!(cache.get("nonexistent").is_none());
    }

    #[test]
    fn evict_lru_removes_oldest() {
        let mut cache = TrackCache::with_capacity(2);

        cache.put(make_track("first"));
        cache.put(make_track("second"));

        // Access first to make it more recent
        cache.get("first");

        // Adding third should evict second (least recently accessed)
        let evicted = cache.put(make_track("third")).unwrap();

        assert_eq!(evicted.title(), "second");
        assert!(cache.contains("first"));
        assert!(!cache.contains("second"));
        assert!(cache.contains("third"));
    }

    #[test]
    fn untouched_entries_evict_in_insertion_order() {
        let mut cache = TrackCache::with_capacity(3);
        for title in ["a", "b", "c"] {
            cache.put(make_track(title));
        }

        assert_eq!(cache.put(make_track("d")).unwrap().title(), "a");
        assert_eq!(cache.put(make_track("e")).unwrap().title(), "b");
        assert_eq!(cache.recency_order(), vec!["e", "d", "c"]);
    }

    #[test]
    fn size_never_exceeds_capacity() {
        let mut cache = TrackCache::with_capacity(2);
        for i in 0..10 {
            cache.put(make_track(&format!("t{}", i)));
            if i % 3 == 0 {
                cache.get("t0");
            }
            assert!(cache.len() <= cache.capacity());
        }
    }

    #[test]
    fn hit_keeps_size_and_promotes() {
        let mut cache = TrackCache::with_capacity(3);
        for title in ["a", "b", "c"] {
            cache.put(make_track(title));
        }

        cache.get("a");
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.recency_order(), vec!["a", "c", "b"]);
    }

    #[test]
    fn replace_counts_as_use_without_eviction() {
        let mut cache = TrackCache::with_capacity(2);
        cache.put(make_track("a"));
        cache.put(make_track("b"));

        let mut faster = make_track("a");
        faster.set_bpm(140);
        assert!(cache.put(faster).is_none());

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a").unwrap().bpm(), 140);
        assert_eq!(cache.put(make_track("c")).unwrap().title(), "b");
    }

    #[test]
    fn shrinking_capacity_evicts_lru_first() {
        let mut cache = TrackCache::with_capacity(4);
        for title in ["a", "b", "c", "d"] {
            cache.put(make_track(title));
        }
        cache.get("a");

        let evicted: Vec<String> = cache
            .set_capacity(2)
            .iter()
            .map(|t| t.title().to_string())
            .collect();

        assert_eq!(evicted, vec!["b", "c"]);
        assert_eq!(cache.recency_order(), vec!["a", "d"]);
    }

    #[test]
    fn zero_capacity_holds_nothing() {
        let mut cache = TrackCache::with_capacity(2);
        cache.put(make_track("a"));
        cache.put(make_track("b"));

        assert_eq!(cache.set_capacity(0).len(), 2);
        assert!(cache.is_empty());

        let rejected = cache.put(make_track("c")).unwrap();
        assert_eq!(rejected.title(), "c");
        assert!(cache.is_empty());
    }

    #[test]
    fn growing_capacity_evicts_nothing() {
        let mut cache = TrackCache::with_capacity(2);
        cache.put(make_track("a"));
        cache.put(make_track("b"));

        assert!(cache.set_capacity(2).is_empty());
        assert!(cache.set_capacity(5).is_empty());
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn remove_track() {
        let mut cache = TrackCache::new();
        cache.put(make_track("abc"));

        let removed = cache.remove("abc");
        assert!(removed.is_some());
        assert!(!cache.contains("abc"));
    }

    #[test]
    fn clear_removes_all() {
        let mut cache = TrackCache::new();
        cache.put(make_track("a"));
        cache.put(make_track("b"));
        cache.put(make_track("c"));

        cache.clear();

        assert!(cache.is_empty());
    }

    #[test]
    fn status_reports_recency() {
        let mut cache = TrackCache::with_capacity(3);
        cache.put(make_track("a"));
        cache.put(make_track("b"));

        let status = cache.status();
        assert_eq!(status.size, 2);
        assert_eq!(status.capacity, 3);
        assert_eq!(status.recency, vec!["b", "a"]);
        assert!(status.to_string().contains("2/3"));
    }
}
