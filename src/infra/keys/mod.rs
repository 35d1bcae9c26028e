//! travelynx API-key management.
//!
//! [`ApiKeyFile`] locates and reads the key file.
//! [`ApiKey`] holds the secret and keeps it out of `Debug` output and logs.

mod config;

pub use config::{ApiKeyFile, KEY_FILE_NAME};

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// A travelynx status API token.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

#[derive(Debug, Error)]
pub enum KeyError {
    #[error("Could not find Travelynx API key at {}.", .0.display())]
    NotFound(PathBuf),

    #[error("Travelynx API key file {} is empty.", .0.display())]
    Empty(PathBuf),

    #[error("Could not read Travelynx API key from {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No per-user config directory; pass the key file path explicitly.")]
    NoConfigDir,
}
