// ABOUTME: Data layer and persistence for Agentdesk
// ABOUTME: Storage error type, SQLite pool bootstrap, and schema migrations

pub mod db;

pub use db::{connect_in_memory, init_pool, run_migrations};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Record not found")]
    NotFound,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Encryption error: {0}")]
    Encryption(String),
}

impl StorageError {
    /// Map UNIQUE and FOREIGN KEY violations to `Conflict`, keeping other errors as-is
    pub fn from_constraint(err: sqlx::Error, what: &str) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return StorageError::Conflict(format!("{} already exists", what));
            }
            if db_err.is_foreign_key_violation() {
                return StorageError::Conflict(format!("{} is referenced by other records", what));
            }
        }
        StorageError::Sqlx(err)
    }
}
