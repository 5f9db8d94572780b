//! # Backup Module
//!
//! Append-only record of what was deleted, for recovery and audit.
//!
//! ## Format
//! JSON Lines: every executed group appends one [`BackupBatch`] on its own
//! line, so an interrupted run still leaves a readable log.
//!
//! ```text
//! {"id":"…","timestamp":"2024-05-01T10:00:00Z","label":"matrix (1999)",…,"entries":[…]}
//! ```

use crate::core::decision::{Decision, ScoredRecord};
use crate::core::grouper::GroupStrategy;
use crate::core::parser::MediaKind;
use crate::core::quality::Quality;
use crate::error::BackupError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

/// Default log file name, created in the working directory
pub const DEFAULT_BACKUP_FILE: &str = "janitorr_backup.jsonl";

/// One deleted video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupEntry {
    pub path: PathBuf,
    pub score: f64,
    pub size_bytes: u64,
    /// Sidecars deleted along with the video
    pub sidecars: Vec<PathBuf>,
    pub kind: MediaKind,
    pub quality: Quality,
    pub is_extra: bool,
}

impl From<&ScoredRecord> for BackupEntry {
    fn from(scored: &ScoredRecord) -> Self {
        let record = &scored.record;
        Self {
            path: record.path.clone(),
            score: scored.score.points,
            size_bytes: record.size_bytes,
            sidecars: record.sidecars.iter().cloned().collect(),
            kind: record.kind.clone(),
            quality: record.quality,
            is_extra: record.is_extra,
        }
    }
}

/// Everything deleted from one duplicate group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupBatch {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub group_id: Uuid,
    pub strategy: GroupStrategy,
    pub label: String,
    /// The copy that was kept
    pub kept: PathBuf,
    pub kept_score: f64,
    pub entries: Vec<BackupEntry>,
}

impl BackupBatch {
    pub fn from_decision(decision: &Decision) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            group_id: decision.group_id,
            strategy: decision.strategy,
            label: decision.label.clone(),
            kept: decision.keep.record.path.clone(),
            kept_score: decision.keep.score.points,
            entries: decision.delete.iter().map(BackupEntry::from).collect(),
        }
    }
}

/// A JSON Lines backup file
#[derive(Debug, Clone)]
pub struct BackupLog {
    path: PathBuf,
}

impl BackupLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one batch, creating the file if needed
    pub fn append(&self, batch: &BackupBatch) -> Result<(), BackupError> {
        let line = serde_json::to_string(batch)
            .map_err(|e| BackupError::SerializationFailed(e.to_string()))?;

        let write_error = |source| BackupError::Write {
            path: self.path.clone(),
            source,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(write_error)?;
        writeln!(file, "{}", line).map_err(write_error)?;

        debug!(
            "Backed up {} entries for {:?} to {}",
            batch.entries.len(),
            batch.label,
            self.path.display()
        );
        Ok(())
    }

    /// Read every batch back. A missing file reads as empty.
    pub fn read(&self) -> Result<Vec<BackupBatch>, BackupError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|source| BackupError::Read {
            path: self.path.clone(),
            source,
        })?;

        content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(index, line)| {
                serde_json::from_str(line).map_err(|e| BackupError::Corrupt {
                    path: self.path.clone(),
                    line: index + 1,
                    reason: e.to_string(),
                })
            })
            .collect()
    }
}
