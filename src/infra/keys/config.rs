use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{ApiKey, KeyError};

pub const KEY_FILE_NAME: &str = "travelynx.conf";

/// A plain-text file holding a single API key, surrounding whitespace
/// ignored.
#[derive(Debug, Clone)]
pub struct ApiKeyFile {
    path: PathBuf,
}

impl ApiKeyFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `travelynx.conf` in the per-user config directory
    /// (`$XDG_CONFIG_HOME` or `~/.config` on Linux).
    pub fn default_location() -> Result<Self, KeyError> {
        dirs::config_dir()
            .map(|dir| Self::new(dir.join(KEY_FILE_NAME)))
            .ok_or(KeyError::NoConfigDir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<ApiKey, KeyError> {
        let content = std::fs::read_to_string(&self.path).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                KeyError::NotFound(self.path.clone())
            } else {
                KeyError::Unreadable {
                    path: self.path.clone(),
                    source,
                }
            }
        })?;

        let key = content.trim();
        if key.is_empty() {
            return Err(KeyError::Empty(self.path.clone()));
        }

        debug!(path = %self.path.display(), "API key loaded");
        Ok(ApiKey::new(key))
    }
}
