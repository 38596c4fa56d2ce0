//! Error types for the routing engine.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating the triage configuration.
///
/// Any of these aborts an invocation before the tracker is contacted.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file missing or unreadable
    #[error("Failed to read config from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid YAML for the expected schema
    #[error("Failed to parse config from {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Configuration parsed but holds an invalid value
    #[error("Invalid config in {path:?}: {message}")]
    Invalid { path: PathBuf, message: String },
}
