//! Connection configuration.
//!
//! # Example YAML
//!
//! ```yaml
//! path: app.db
//! foreign_keys: true
//! busy_timeout_ms: 5000
//! ```
//!
//! Every key is optional; `path` defaults to an in-memory database.

use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SqliteError};

/// Path value that selects an in-memory database.
pub const IN_MEMORY: &str = ":memory:";

/// How to open and prepare a SQLite connection.
///
/// # Examples
///
/// ```
/// use rowbind_sqlite::DatabaseConfig;
///
/// let config: DatabaseConfig = serde_yaml::from_str("busy_timeout_ms: 250").unwrap();
/// assert!(config.is_in_memory());
/// assert_eq!(config.busy_timeout_ms, 250);
/// let conn = config.open().unwrap();
/// assert!(conn.is_autocommit());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database file, or `:memory:`.
    pub path: PathBuf,
    /// Enables `PRAGMA foreign_keys`.
    pub foreign_keys: bool,
    /// How long a statement waits on a locked database.
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(IN_MEMORY),
            foreign_keys: true,
            busy_timeout_ms: 5000,
        }
    }
}

impl DatabaseConfig {
    /// Configuration for a database file with default settings.
    pub fn for_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::SqliteError::IoError) if the file cannot
    /// be read, or [`YamlError`](crate::SqliteError::YamlError) if parsing
    /// fails.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let config = serde_yaml::from_reader(BufReader::new(file))?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_yaml::to_writer(BufWriter::new(file), self)?;
        Ok(())
    }

    pub fn is_in_memory(&self) -> bool {
        self.path.as_os_str() == IN_MEMORY
    }

    /// Opens a connection and applies the configured pragmas.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteError::ConfigError`] for an empty path.
    pub fn open(&self) -> Result<Connection> {
        if self.path.as_os_str().is_empty() {
            return Err(SqliteError::ConfigError("database path is empty".to_string()));
        }
        let conn = if self.is_in_memory() {
            Connection::open_in_memory()?
        } else {
            Connection::open(&self.path)?
        };
        conn.busy_timeout(Duration::from_millis(self.busy_timeout_ms))?;
        let foreign_keys = if self.foreign_keys { "ON" } else { "OFF" };
        conn.execute_batch(&format!("PRAGMA foreign_keys = {foreign_keys};"))?;
        debug!(path = %self.path.display(), foreign_keys = self.foreign_keys, "Opened database");
        Ok(conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_yaml() {
        let config: DatabaseConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, DatabaseConfig::default());
    }

    #[test]
    fn test_full_yaml() {
        let yaml = "path: data/app.db\nforeign_keys: false\nbusy_timeout_ms: 10\n";
        let config: DatabaseConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.path, PathBuf::from("data/app.db"));
        assert!(!config.foreign_keys);
        assert!(!config.is_in_memory());
    }

    #[test]
    fn test_empty_path_is_rejected() {
        let config = DatabaseConfig::for_path("");
        assert!(matches!(config.open(), Err(SqliteError::ConfigError(_))));
    }

    #[test]
    fn test_file_roundtrip_and_open() {
        let dir = tempfile::tempdir().unwrap();
        let config = DatabaseConfig::for_path(dir.path().join("app.db"));
        let yaml_path = dir.path().join("db.yml");
        config.to_file(&yaml_path).unwrap();

        let loaded = DatabaseConfig::from_file(&yaml_path).unwrap();
        assert_eq!(loaded, config);

        let conn = loaded.open().unwrap();
        let fk: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(fk, 1);
    }
}
