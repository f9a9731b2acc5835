//! Error types for djdeck.
//!
//! Every recoverable condition raised by the cache, playlist, deck and
//! library components carries an [`ErrorCode`] so callers can decide on a
//! fallback without matching on message text.

use std::fmt;

/// Error codes for conditions raised by the core components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// A track could not be copied into an independently owned instance.
    /// Trigger: allocation failure while duplicating the track's fields.
    CloneFailed,

    /// A lookup by title missed.
    /// Trigger: title absent from a playlist or the track cache.
    NotFound,

    /// An operation was refused and left its target untouched.
    /// Trigger: adding a track without a usable title to a playlist.
    NoOpRejected,

    /// A catalog index was outside `[1, catalog_size]`.
    /// Trigger: playlist materialization with a stale or mistyped index.
    InvalidIndex,

    /// A descriptor record could not be turned into a track.
    /// Trigger: negative numbers, boolean bit depth, empty title.
    InvalidDescriptor,

    /// Structurally invalid configuration.
    /// Trigger: zero cache size or out-of-range tolerance at startup.
    InvalidConfig,

    /// The session file could not be read or parsed.
    /// Trigger: missing file, malformed JSON, unknown track type.
    SessionLoadFailed,
}

impl ErrorCode {
    /// Returns the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::CloneFailed => "CLONE_FAILED",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::NoOpRejected => "NO_OP_REJECTED",
            ErrorCode::InvalidIndex => "INVALID_INDEX",
            ErrorCode::InvalidDescriptor => "INVALID_DESCRIPTOR",
            ErrorCode::InvalidConfig => "INVALID_CONFIG",
            ErrorCode::SessionLoadFailed => "SESSION_LOAD_FAILED",
        }
    }

    /// Returns a human-readable description of the error.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::CloneFailed => "Track could not be copied into a new owner",
            ErrorCode::NotFound => "No track with the requested title",
            ErrorCode::NoOpRejected => "Operation rejected, nothing was changed",
            ErrorCode::InvalidIndex => "Catalog index out of range",
            ErrorCode::InvalidDescriptor => "Track descriptor is malformed",
            ErrorCode::InvalidConfig => "Configuration is invalid",
            ErrorCode::SessionLoadFailed => "Session file could not be loaded",
        }
    }

    /// Returns a recovery hint suggesting how to resolve this error.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCode::CloneFailed => {
                "Free memory or reduce the cache size, then retry the load"
            }
            ErrorCode::NotFound => "Check the title spelling or load the track first",
            ErrorCode::NoOpRejected => "Give the track a non-empty title before adding it",
            ErrorCode::InvalidIndex => {
                "Use 1-based indices no larger than the number of library tracks"
            }
            ErrorCode::InvalidDescriptor => {
                "Use non-negative numbers; bit depth and sample rate must be integers"
            }
            ErrorCode::InvalidConfig => {
                "Use a cache size between 1 and 10000 and a BPM tolerance of at most 300"
            }
            ErrorCode::SessionLoadFailed => {
                "Check that the session file exists and is valid JSON"
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type for djdeck operations.
#[derive(Debug)]
pub struct DjError {
    /// The error code identifying the type of error.
    pub code: ErrorCode,
    /// Human-readable error message with context.
    pub message: String,
    /// Optional underlying cause of the error.
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl DjError {
    /// Creates a new DjError with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new DjError with an underlying cause.
    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a CLONE_FAILED error.
    pub fn clone_failed(
        title: &str,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::with_source(
            ErrorCode::CloneFailed,
            format!("Failed to clone track '{}'", title),
            source,
        )
    }

    /// Creates a NOT_FOUND error.
    pub fn not_found(title: &str, container: &str) -> Self {
        Self::new(
            ErrorCode::NotFound,
            format!("Track '{}' not found in {}", title, container),
        )
    }

    /// Creates a NO_OP_REJECTED error.
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::new(ErrorCode::NoOpRejected, reason)
    }

    /// Creates an INVALID_INDEX error.
    pub fn invalid_index(index: i64, catalog_size: usize) -> Self {
        Self::new(
            ErrorCode::InvalidIndex,
            format!(
                "Invalid track index: {} (library has {} tracks)",
                index, catalog_size
            ),
        )
    }

    /// Creates an INVALID_DESCRIPTOR error.
    pub fn invalid_descriptor(title: &str, reason: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::InvalidDescriptor,
            format!("Invalid descriptor for '{}': {}", title, reason.into()),
        )
    }

    /// Creates an INVALID_CONFIG error.
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidConfig, reason)
    }

    /// Creates a SESSION_LOAD_FAILED error.
    pub fn session_load_failed(
        path: &str,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::with_source(
            ErrorCode::SessionLoadFailed,
            format!("Failed to load session file: {}", path),
            source,
        )
    }
}

impl fmt::Display for DjError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for DjError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Result type alias using DjError.
pub type Result<T> = std::result::Result<T, DjError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn error_code_as_str() {
        assert_eq!(ErrorCode::CloneFailed.as_str(), "CLONE_FAILED");
        assert_eq!(ErrorCode::NotFound.as_str(), "NOT_FOUND");
        assert_eq!(ErrorCode::NoOpRejected.as_str(), "NO_OP_REJECTED");
        assert_eq!(ErrorCode::InvalidIndex.as_str(), "INVALID_INDEX");
        assert_eq!(ErrorCode::InvalidDescriptor.as_str(), "INVALID_DESCRIPTOR");
        assert_eq!(ErrorCode::InvalidConfig.as_str(), "INVALID_CONFIG");
        assert_eq!(ErrorCode::SessionLoadFailed.as_str(), "SESSION_LOAD_FAILED");
    }

    #[test]
    fn error_code_hints_not_empty() {
        let codes = [
            ErrorCode::CloneFailed,
            ErrorCode::NotFound,
            ErrorCode::NoOpRejected,
            ErrorCode::InvalidIndex,
            ErrorCode::InvalidDescriptor,
            ErrorCode::InvalidConfig,
            ErrorCode::SessionLoadFailed,
        ];
        for code in codes {
            assert!(!code.recovery_hint().is_empty());
            assert!(!code.description().is_empty());
        }
    }

    #[test]
    fn invalid_index_display() {
        let err = DjError::invalid_index(5, 3);
        assert_eq!(err.code, ErrorCode::InvalidIndex);
        assert!(err.to_string().contains("INVALID_INDEX"));
        assert!(err.to_string().contains('5'));
    }

    #[test]
    fn session_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = DjError::session_load_failed("/tmp/none.json", io);
        assert!(err.source().is_some());
        assert!(err.to_string().contains("/tmp/none.json"));
    }
}
