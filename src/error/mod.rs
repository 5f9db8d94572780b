//! # Error Module
//!
//! Error types for janitorr.
//!
//! ## Design Principles
//! - **Never panic** on library contents - return errors instead
//! - **Include context** - paths, patterns, what went wrong
//! - **Per-file failures are not fatal** - they are reported as outcomes

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum JanitorError {
    #[error("Scanning error: {0}")]
    Scan(#[from] ScanError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Vocabulary error: {0}")]
    Vocabulary(#[from] VocabularyError),

    #[error("Backup error: {0}")]
    Backup(#[from] BackupError),

    #[error("Execution error: {0}")]
    Execute(#[from] ExecuteError),

    #[error("Failed to write report {path}: {source}")]
    Report {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that occur while walking the media library
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Permission denied accessing: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Failed to read {path}: {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Invalid engine configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid fuzzy threshold: {value} (must be between 0.0 and 1.0)")]
    InvalidThreshold { value: f64 },

    #[error("Invalid minimum size: {value} MB")]
    InvalidMinSize { value: f64 },

    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

/// Errors loading a token vocabulary override
#[derive(Error, Debug)]
pub enum VocabularyError {
    #[error("Failed to read vocabulary file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Vocabulary file {path} is not valid JSON: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("Vocabulary token '{token}' could not be compiled: {reason}")]
    InvalidToken { token: String, reason: String },
}

/// Errors writing or reading the deletion backup log
#[derive(Error, Debug)]
pub enum BackupError {
    #[error("Failed to write backup log {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read backup log {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Backup log {path} line {line} is corrupt: {reason}")]
    Corrupt {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("Failed to serialize backup entry: {0}")]
    SerializationFailed(String),
}

/// Errors raised by a deletion executor
#[derive(Error, Debug)]
pub enum ExecuteError {
    #[error("Failed to delete {path}: {source}")]
    DeleteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File vanished before deletion: {path}")]
    Missing { path: PathBuf },
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, JanitorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_error_includes_path() {
        let error = ScanError::DirectoryNotFound {
            path: PathBuf::from("/media/movies"),
        };
        assert!(error.to_string().contains("/media/movies"));
    }

    #[test]
    fn config_error_names_pattern() {
        let error = ConfigError::InvalidPattern {
            pattern: "[abc".to_string(),
            reason: "unclosed bracket".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("[abc"));
        assert!(message.contains("unclosed bracket"));
    }

    #[test]
    fn backup_error_reports_line() {
        let error = BackupError::Corrupt {
            path: PathBuf::from("/tmp/janitorr_backup.jsonl"),
            line: 3,
            reason: "expected value".to_string(),
        };
        assert!(error.to_string().contains("line 3"));
    }

    #[test]
    fn top_level_wraps_sources() {
        let error: JanitorError = ConfigError::InvalidThreshold { value: 1.5 }.into();
        assert!(error.to_string().starts_with("Configuration error"));
    }
}
