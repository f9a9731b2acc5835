//! Session configuration module.
//!
//! Holds the knobs recognized at construction time (cache size, BPM
//! tolerance, auto-sync) plus the location of the session file. Values are
//! layered: defaults, then environment, then the session file's `settings`
//! block, then command-line flags.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::cache::DEFAULT_MAX_ENTRIES;

/// Default BPM compatibility window.
pub const DEFAULT_BPM_TOLERANCE: u32 = 5;

/// Largest accepted cache size.
pub const MAX_CACHE_SIZE: usize = 10_000;

/// Largest accepted BPM tolerance.
pub const MAX_BPM_TOLERANCE: u32 = 300;

/// Runtime configuration for a DJ session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DjConfig {
    /// Initial track cache capacity. Must be positive.
    pub cache_size: usize,

    /// Maximum BPM difference at which two tracks still mix.
    pub bpm_tolerance: u32,

    /// Reconcile BPM automatically when loading an incompatible track.
    pub auto_sync: bool,

    /// Session file to run.
    /// If None, uses the platform-specific default config location.
    pub session_path: Option<PathBuf>,
}

/// Optional overrides carried by a session file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    pub cache_size: Option<usize>,
    pub bpm_tolerance: Option<u32>,
    pub auto_sync: Option<bool>,
}

impl DjConfig {
    /// Creates a new DjConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a DjConfig from environment variables.
    ///
    /// Reads the following environment variables:
    /// - `DJ_CACHE_SIZE` - Initial cache capacity
    /// - `DJ_BPM_TOLERANCE` - BPM compatibility window
    /// - `DJ_AUTO_SYNC` - `true`/`false`/`1`/`0`/`yes`/`no`
    /// - `DJ_SESSION_PATH` - Session file to run
    ///
    /// Falls back to defaults for unset or unparseable variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(size_str) = std::env::var("DJ_CACHE_SIZE") {
            if let Ok(size) = size_str.trim().parse::<usize>() {
                config.cache_size = size;
            }
        }

        if let Ok(tolerance_str) = std::env::var("DJ_BPM_TOLERANCE") {
            if let Ok(tolerance) = tolerance_str.trim().parse::<u32>() {
                config.bpm_tolerance = tolerance;
            }
        }

        if let Ok(sync_str) = std::env::var("DJ_AUTO_SYNC") {
            if let Some(auto_sync) = parse_bool(&sync_str) {
                config.auto_sync = auto_sync;
            }
        }

        if let Ok(path) = std::env::var("DJ_SESSION_PATH") {
            config.session_path = Some(PathBuf::from(path));
        }

        config
    }

    /// Applies the overrides present in a session file.
    pub fn apply_settings(&mut self, settings: &SessionSettings) {
        if let Some(cache_size) = settings.cache_size {
            self.cache_size = cache_size;
        }
        if let Some(bpm_tolerance) = settings.bpm_tolerance {
            self.bpm_tolerance = bpm_tolerance;
        }
        if let Some(auto_sync) = settings.auto_sync {
            self.auto_sync = auto_sync;
        }
    }

    /// Returns the effective session path, using platform defaults if not specified.
    pub fn effective_session_path(&self) -> PathBuf {
        if let Some(ref path) = self.session_path {
            path.clone()
        } else {
            default_session_path()
        }
    }

    /// Validates the configuration.
    ///
    /// Returns an error message if validation fails, None otherwise.
    pub fn validate(&self) -> Option<String> {
        if self.cache_size == 0 {
            return Some("cache_size must be > 0".to_string());
        }
        if self.cache_size > MAX_CACHE_SIZE {
            return Some(format!(
                "cache_size too high: {} (max {})",
                self.cache_size, MAX_CACHE_SIZE
            ));
        }
        if self.bpm_tolerance > MAX_BPM_TOLERANCE {
            return Some(format!(
                "bpm_tolerance too high: {} (max {})",
                self.bpm_tolerance, MAX_BPM_TOLERANCE
            ));
        }

        None
    }
}

impl Default for DjConfig {
    fn default() -> Self {
        Self {
            cache_size: DEFAULT_MAX_ENTRIES,
            bpm_tolerance: DEFAULT_BPM_TOLERANCE,
            auto_sync: false,
            session_path: None,
        }
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Returns the platform-specific default session file path.
///
/// Uses the `directories` crate to find appropriate locations:
/// - macOS: ~/Library/Application Support/djdeck/session.json
/// - Linux: ~/.config/djdeck/session.json
/// - Windows: C:\Users\<user>\AppData\Roaming\djdeck\config\session.json
fn default_session_path() -> PathBuf {
    if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "djdeck") {
        proj_dirs.config_dir().join("session.json")
    } else {
        // Fallback to current directory
        PathBuf::from("./session.json")
    }
}
