//! Cache-facing controller.
//!
//! Decides whether a track goes into the [`TrackCache`]: an entry already
//! cached under the same title wins, otherwise a loaded clone is inserted.

use tracing::{error, info};

use crate::cache::{CacheStatus, TrackCache};
use crate::error::Result;
use crate::types::Track;

/// Result of [`DjController::load_track_to_cache`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLoad {
    /// The title was already cached; that entry was promoted and the
    /// candidate left untouched.
    Hit,
    /// A clone of the candidate was loaded and inserted.
    Inserted {
        /// Title pushed out to make room, if any.
        evicted: Option<String>,
    },
    /// The cache has zero capacity; the loaded clone was dropped and
    /// nothing was stored or evicted.
    NotCached,
}

/// Owns the track cache on behalf of a session.
#[derive(Debug)]
pub struct DjController {
    cache: TrackCache,
}

impl DjController {
    /// Creates a controller with an empty cache of `cache_size` entries.
    pub fn new(cache_size: usize) -> Self {
        Self {
            cache: TrackCache::with_capacity(cache_size),
        }
    }

    /// Makes `track` available in the cache.
    ///
    /// On a clone failure nothing is inserted and `CLONE_FAILED` is returned.
    pub fn load_track_to_cache(&mut self, track: &Track) -> Result<CacheLoad> {
        // The clone runs before anything is inserted.
        if self.cache.get(track.title()).is_some() {
            info!(title = %track.title(), "Cache hit");
            return Ok(CacheLoad::Hit);
        }

        let mut copy = track.try_clone().map_err(|e| {
            error!(title = %track.title(), error = %e, "Failed to clone track for cache");
            e
        })?;
        copy.load();
        copy.analyze_beatgrid();

        // On a miss `put` can only hand back the candidate itself when the
        // cache has no room at all.
        match self.cache.put(copy) {
            Some(returned) if returned.same_title(track) => {
                info!(title = %track.title(), "Cache miss, cache disabled, track not cached");
                Ok(CacheLoad::NotCached)
            }
            returned => {
                let evicted = returned.map(|t| t.title().to_string());
                info!(title = %track.title(), evicted = ?evicted, "Cache miss, track cached");
                Ok(CacheLoad::Inserted { evicted })
            }
        }
    }

    /// Cached instance for `title`, marked most recently used.
    pub fn get_track_from_cache(&mut self, title: &str) -> Option<&Track> {
        self.cache.get(title)
    }

    /// Resizes the cache. Returns how many tracks were evicted.
    pub fn set_cache_size(&mut self, cache_size: usize) -> usize {
        let evicted = self.cache.set_capacity(cache_size).len();
        info!(cache_size, evicted, "Cache resized");
        evicted
    }

    /// Read-only view of the underlying cache.
    pub fn cache(&self) -> &TrackCache {
        &self.cache
    }

    /// Size, capacity and recency order of the cache.
    pub fn cache_status(&self) -> CacheStatus {
        self.cache.status()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(title: &str, bpm: u32) -> Track {
        Track::compressed(title, vec!["Artist".to_string()], 200, bpm, 320, true)
    }

    #[test]
    fn miss_inserts_loaded_clone() {
        let mut controller = DjController::new(2);
        let source = track("A", 128);

        let outcome = controller.load_track_to_cache(&source).unwrap();
        assert_eq!(outcome, CacheLoad::Inserted { evicted: None });

        let cached = controller.get_track_from_cache("A").unwrap();
        assert!(cached.is_loaded());
        assert!(cached.is_analyzed());
        assert!(!source.is_loaded());
    }

    #[test]
    fn hit_keeps_existing_entry() {
        let mut controller = DjController::new(2);
        controller.load_track_to_cache(&track("A", 128)).unwrap();

        let outcome = controller.load_track_to_cache(&track("A", 150)).unwrap();
        assert_eq!(outcome, CacheLoad::Hit);
        assert_eq!(controller.get_track_from_cache("A").unwrap().bpm(), 128);
        assert_eq!(controller.cache().len(), 1);
    }

    #[test]
    fn hit_promotes_entry() {
        let mut controller = DjController::new(2);
        controller.load_track_to_cache(&track("A", 128)).unwrap();
        controller.load_track_to_cache(&track("B", 128)).unwrap();
        controller.load_track_to_cache(&track("A", 128)).unwrap();

        let outcome = controller.load_track_to_cache(&track("C", 128)).unwrap();
        assert_eq!(
            outcome,
            CacheLoad::Inserted {
                evicted: Some("B".to_string())
            }
        );
    }

    #[test]
    fn resize_reports_evictions() {
        let mut controller = DjController::new(3);
        for title in ["A", "B", "C"] {
            controller.load_track_to_cache(&track(title, 120)).unwrap();
        }

        assert_eq!(controller.set_cache_size(1), 2);
        assert_eq!(controller.cache_status().recency, vec!["C"]);
    }

    #[test]
    fn missing_title_is_none() {
        let mut controller = DjController::new(1);
        assert!(controller.get_track_from_cache("nothing").is_none());
    }

    #[test]
    fn zero_capacity_is_not_an_eviction() {
        let mut controller = DjController::new(0);

        let outcome = controller.load_track_to_cache(&track("A", 128)).unwrap();
        assert_eq!(outcome, CacheLoad::NotCached);
        assert!(controller.cache().is_empty());
    }

    #[test]
    fn clone_failure_leaves_cache_unchanged() {
        let mut controller = DjController::new(1);
        controller.load_track_to_cache(&track("A", 128)).unwrap();

        crate::types::set_clone_failure(true);
        let result = controller.load_track_to_cache(&track("B", 128));
        crate::types::set_clone_failure(false);

        assert_eq!(result.unwrap_err().code, crate::error::ErrorCode::CloneFailed);
        assert_eq!(controller.cache().recency_order(), vec!["A"]);
    }
}
