//! Command-line interface for running a session file.

use std::path::PathBuf;

use clap::Parser;

use crate::config::DjConfig;
use crate::logging::{LogFormat, LogLevel, LoggingConfig};

/// djdeck: run a DJ session through the track cache and two decks
#[derive(Parser, Debug)]
#[command(name = "djdeck")]
#[command(about = "Run a DJ session through the track cache and two decks")]
#[command(version)]
pub struct Cli {
    /// Session file (JSON) describing the library and playlists
    #[arg(value_name = "SESSION")]
    pub session: Option<PathBuf>,

    /// Track cache capacity (overrides the session file)
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..=10_000))]
    pub cache_size: Option<u64>,

    /// Maximum BPM difference for two tracks to mix (overrides the session file)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(0..=300))]
    pub bpm_tolerance: Option<u32>,

    /// Reconcile BPM automatically when loading an incompatible track
    #[arg(short, long, conflicts_with = "no_auto_sync")]
    pub auto_sync: bool,

    /// Disable automatic BPM reconciliation (overrides the session file)
    #[arg(long)]
    pub no_auto_sync: bool,

    /// Only run the named playlist (repeatable, runs in the order given)
    #[arg(short, long = "playlist", value_name = "NAME")]
    pub playlists: Vec<String>,

    /// Minimum log level
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    /// Print the final session report as JSON instead of text
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig::default()
            .with_level(self.log_level)
            .with_format(self.log_format)
    }

    /// Layers the command-line flags on top of `config`.
    pub fn apply_to(&self, config: &mut DjConfig) {
        if let Some(ref path) = self.session {
            config.session_path = Some(path.clone());
        }
        if let Some(size) = self.cache_size {
            config.cache_size = size as usize;
        }
        if let Some(tolerance) = self.bpm_tolerance {
            config.bpm_tolerance = tolerance;
        }
        if self.auto_sync {
            config.auto_sync = true;
        } else if self.no_auto_sync {
            config.auto_sync = false;
        }
    }
}
