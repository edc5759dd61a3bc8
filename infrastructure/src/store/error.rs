//! Error types for the relational store

use thiserror::Error;

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur while talking to the store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store unavailable after {attempts} attempt(s): {reason}")]
    Unavailable { attempts: u32, reason: String },

    #[error("Failed to prepare store location: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl StoreError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, StoreError::Unavailable { .. })
    }
}
