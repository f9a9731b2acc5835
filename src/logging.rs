//! Logging setup.
//!
//! The library only emits `tracing` events. The binary installs a
//! `tracing-subscriber` fmt layer writing to stderr, so stdout stays free
//! for status output and JSON reports. `RUST_LOG` takes precedence over the
//! configured level when set.

use std::io;

use clap::ValueEnum;
use tracing_subscriber::{filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{DjError, Result};

/// Minimum level emitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable multi-line format
    Pretty,
    /// One line per event
    #[default]
    Compact,
    /// Structured JSON for machine parsing
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    /// Full filter directive; overrides `level` when set.
    pub filter: Option<String>,
}

impl LoggingConfig {
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Filter directive: `RUST_LOG`, then the explicit filter, then our
    /// crate at `level` with everything else at warn.
    pub fn filter_directive(&self) -> String {
        if let Ok(env) = std::env::var(EnvFilter::DEFAULT_ENV) {
            if !env.trim().is_empty() {
                return env;
            }
        }
        if let Some(ref filter) = self.filter {
            return filter.clone();
        }
        format!("warn,{}={}", env!("CARGO_CRATE_NAME"), self.level.as_str())
    }
}

/// Installs the global subscriber. Fails if one is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_new(config.filter_directive())
        .map_err(|e| DjError::invalid_config(format!("Invalid log filter: {}", e)))?;

    let registry = tracing_subscriber::registry().with(filter);
    let result = match config.format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().pretty().with_writer(io::stderr))
            .try_init(),
        LogFormat::Compact => registry
            .with(tracing_subscriber::fmt::layer().compact().with_writer(io::stderr))
            .try_init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
            .try_init(),
    };

    result.map_err(|e| {
        DjError::invalid_config(format!("Failed to initialize logging: {}", e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_targets_this_crate() {
        let config = LoggingConfig {
            filter: None,
            ..LoggingConfig::default().with_level(LogLevel::Debug)
        };
        if std::env::var(EnvFilter::DEFAULT_ENV).is_err() {
            assert_eq!(config.filter_directive(), "warn,djdeck=debug");
        }
    }

    #[test]
    fn explicit_filter_wins_over_level() {
        let config = LoggingConfig {
            filter: Some("trace".to_string()),
            ..LoggingConfig::default()
        };
        if std::env::var(EnvFilter::DEFAULT_ENV).is_err() {
            assert_eq!(config.filter_directive(), "trace");
        }
    }

    #[test]
    fn second_init_is_an_error() {
        let config = LoggingConfig::default().with_format(LogFormat::Json);
        let _ = init_logging(&config);
        assert!(init_logging(&config).is_err());
    }
}
