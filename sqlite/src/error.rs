//! Error types for SQLite execution.
//!
//! Provides a unified error type covering database access, model,
//! conversion, and configuration failures.

use thiserror::Error;

/// Errors that can occur while executing mapped statements.
#[derive(Debug, Error)]
pub enum SqliteError {
    /// SQLite database operation failure, passed through unchanged.
    #[error("database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    /// Schema resolution or statement building failure.
    #[error(transparent)]
    Model(#[from] rowbind_core::ModelError),

    /// A value could not cross the SQLite boundary.
    #[error("conversion error: {0}")]
    ConversionError(String),

    /// The row addressed by an entity's primary key does not exist.
    #[error("row not found in table '{table}'")]
    RowNotFound {
        /// Table name.
        table: String,
    },

    /// An inspected table is not present in the database.
    #[error("table '{0}' does not exist")]
    TableNotFound(String),

    /// Invalid connection configuration.
    #[error("config error: {0}")]
    ConfigError(String),

    /// File I/O failure while reading or writing configuration.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

/// Convenience alias for results with [`SqliteError`].
pub type Result<T> = std::result::Result<T, SqliteError>;
