use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Result};
use directories::BaseDirs;

use crate::contract::CONTENT_AUTHORITY;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".pets";
/// SQLite file name stored inside the application data directory.
pub const DATABASE_NAME: &str = "shelter.db";
/// How long a connection waits on a locked database before giving up.
const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Where the SQLite database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    File(PathBuf),
    /// Private to the opening provider; gone once it is dropped.
    Memory,
}

/// Everything needed to bring a provider up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Authority the provider answers under; URIs with any other authority
    /// are unknown resources.
    pub authority: String,
    pub location: DatabaseLocation,
    pub busy_timeout: Duration,
}

impl ProviderConfig {
    /// Database file at an explicit path.
    pub fn at(path: impl AsRef<Path>) -> Self {
        Self::with_location(DatabaseLocation::File(path.as_ref().to_path_buf()))
    }

    pub fn in_memory() -> Self {
        Self::with_location(DatabaseLocation::Memory)
    }

    /// The default on-disk location, `~/.pets/shelter.db`.
    pub fn from_home() -> Result<Self> {
        Ok(Self::at(default_db_path()?))
    }

    pub fn with_authority(mut self, authority: &str) -> Self {
        self.authority = authority.to_string();
        self
    }

    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    fn with_location(location: DatabaseLocation) -> Self {
        Self {
            authority: CONTENT_AUTHORITY.to_string(),
            location,
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }
}

/// Resolve the absolute path to the SQLite database inside the user's home.
fn default_db_path() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME).join(DATABASE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ProviderConfig::in_memory();
        assert_eq!(config.authority, CONTENT_AUTHORITY);
        assert_eq!(config.location, DatabaseLocation::Memory);
        assert_eq!(config.busy_timeout, DEFAULT_BUSY_TIMEOUT);
    }

    #[test]
    fn test_overrides() {
        let config = ProviderConfig::at("/tmp/pets.db")
            .with_authority("org.example.shelter")
            .with_busy_timeout(Duration::from_millis(250));

        assert_eq!(config.authority, "org.example.shelter");
        assert_eq!(config.location, DatabaseLocation::File(PathBuf::from("/tmp/pets.db")));
        assert_eq!(config.busy_timeout, Duration::from_millis(250));
    }
}
