//! Error type shared by configuration loading and simulation setup
//!
//! Only setup can fail. A running step never returns an error: bad
//! species lookups degrade to a zero coefficient and coincident particles
//! fall back to a fixed direction.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    /// Rejected before the first step (world size, capacity, radii, ...)
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("failed to read scenario file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scenario: {0}")]
    Parse(#[from] serde_yaml::Error),
}

impl SimError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        SimError::InvalidConfiguration(msg.into())
    }
}
