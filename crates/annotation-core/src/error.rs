//! Error types for annotation
//!
//! Every error here is recoverable at the editor boundary:
//! - `ValidationError` is local and surfaced inline
//! - `SaveError` and `ClipboardError` are reported by collaborators
//! - `ConfigError` is raised while loading configuration

/// Local validation failure on the draft text
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Draft exceeds the configured maximum length
    #[error("Maximum {max} characters are allowed")]
    TooLong {
        /// Length of the rejected draft, in characters
        length: usize,
        /// Configured maximum
        max: usize,
    },
}

/// Failure reported by the injected persistence operation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SaveError {
    /// Backend refused the annotation
    #[error("save rejected: {0}")]
    Rejected(String),

    /// Backend could not be reached
    #[error("annotation store unavailable: {0}")]
    Unavailable(String),
}

/// Failure reported by the clipboard service
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClipboardError {
    /// No clipboard in this environment
    #[error("clipboard unavailable")]
    Unavailable,

    /// Write refused (permissions, focus)
    #[error("clipboard write denied: {0}")]
    Denied(String),

    /// Any other backend error
    #[error("clipboard backend error: {0}")]
    Backend(String),
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("cannot read config file {}: {source}", path.display())]
    Read {
        /// File that was requested
        path: std::path::PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// TOML could not be parsed
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// A field holds an unusable value
    #[error("invalid config value for `{field}`: {reason}")]
    Invalid {
        /// Offending field
        field: &'static str,
        /// Why it was rejected
        reason: String,
    },
}

impl ConfigError {
    /// Create invalid-field error
    #[inline]
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}
