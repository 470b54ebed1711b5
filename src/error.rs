//! Process-level error taxonomy.
//!
//! `FatalError` covers the configuration failures that abort the run before any
//! deployment attempt is made. Transport errors during deploy attempts and any
//! failure inside the fallback health probe are handled where they occur and
//! never surface here.

use crate::config::ConfigError;
use std::io;

#[derive(Debug, thiserror::Error)]
pub enum FatalError {
    #[error("Required credential not set: environment variable {var} is missing or empty")]
    Credential { var: String },

    #[error("Failed to read function source {path}: {source}")]
    Artifact {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to create HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
