//! Configuration errors
//!
//! The simulation itself has no failure path: invalid gameplay requests are
//! ignored and everything else is clamped. Only loading a [`WorldConfig`]
//! from outside the program can fail.
//!
//! [`WorldConfig`]: crate::config::WorldConfig

use std::fmt;

/// Error raised while loading or validating a world configuration
#[derive(Debug)]
pub enum ConfigError {
    /// The config file could not be read
    Io {
        /// Path that was being read
        path: String,
        source: std::io::Error,
    },

    /// The document is not valid JSON for a `WorldConfig`
    Parse(serde_json::Error),

    /// A field is outside the range the simulation can run with
    Invalid {
        /// Name of the offending field
        field: &'static str,
        /// The rejected value
        value: f64,
        /// Human-readable description of the accepted range
        reason: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "failed to read config '{}': {}", path, source)
            }
            ConfigError::Parse(err) => write!(f, "malformed config: {}", err),
            ConfigError::Invalid {
                field,
                value,
                reason,
            } => write!(f, "config field '{}' = {} is invalid: {}", field, value, reason),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse(err) => Some(err),
            ConfigError::Invalid { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err)
    }
}

/// Convenience alias: a `Result` using `ConfigError` as the error type.
pub type ConfigResult<T> = Result<T, ConfigError>;
