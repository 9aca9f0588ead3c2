//! Error types for scriptdex operations

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ScriptdexError {
    #[error("Invalid {mode} pattern {pattern:?}: {message}")]
    InvalidPattern {
        mode: &'static str,
        pattern: String,
        message: String,
    },

    #[error("Unknown index category: {0}")]
    UnknownCategory(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Config parse error: {0}")]
    ConfigParse(String),

    #[error("Schema version mismatch: index is v{found}, expected v{expected}. Rebuild the index file.")]
    SchemaVersionMismatch { found: i32, expected: i32 },

    #[error("Index backend error: {0}")]
    Backend(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
