//! Error types for absence engine configuration.

use thiserror::Error;

/// Errors raised while loading or resolving the engine configuration.
///
/// Field-level problems (a malformed number, a missing section) are not
/// errors: those fields fall back to their defaults with a warning.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The config text is not valid TOML.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// An absence category resolved to no marker ids while
    /// `policy.reject_empty_sets` is on.
    #[error("absence set '{0}' resolves to no marker ids")]
    EmptyAbsenceSet(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
