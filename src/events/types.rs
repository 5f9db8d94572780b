//! Event type definitions for progress reporting.

use crate::core::grouper::{GroupStrategy, Mode};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted by the janitor pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Scanning phase events
    Scan(ScanEvent),
    /// Parsing, grouping and decision events
    Analyze(AnalyzeEvent),
    /// Review, backup and deletion events
    Apply(ApplyEvent),
    /// Pipeline-level events
    Pipeline(PipelineEvent),
}

/// Events during the scanning phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScanEvent {
    /// Scanning has started
    Started { paths: Vec<PathBuf> },
    /// Progress update during scanning
    Progress(ScanProgress),
    /// A video was found
    VideoFound { path: PathBuf },
    /// An error occurred but scanning continues
    Error { path: PathBuf, message: String },
    /// Scanning completed
    Completed { total_videos: usize },
}

/// Progress information during scanning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanProgress {
    /// Number of directories scanned so far
    pub directories_scanned: usize,
    /// Number of videos found so far
    pub videos_found: usize,
    /// Current directory being scanned
    pub current_path: PathBuf,
}

/// Events while turning a snapshot into decisions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AnalyzeEvent {
    /// Analysis has started
    Started { total_files: usize },
    /// The grouping mode was chosen
    ModeDetected { mode: Mode },
    /// A duplicate group was formed
    GroupFound {
        group_id: String,
        strategy: GroupStrategy,
        members: usize,
    },
    /// Analysis completed
    Completed {
        total_groups: usize,
        files_to_delete: usize,
    },
}

/// Events while carrying out decisions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ApplyEvent {
    /// A group is about to be reviewed
    GroupStarted { group_id: String, label: String },
    /// The reviewer skipped a group
    GroupSkipped { group_id: String },
    /// A file was deleted, or would have been on a dry run
    FileDeleted { path: PathBuf, dry_run: bool },
    /// A file could not be deleted
    FileFailed { path: PathBuf, message: String },
    /// The reviewer stopped the run early
    Stopped,
    /// All groups were processed
    Completed { deleted: usize, failed: usize },
}

/// Pipeline-level events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PipelineEvent {
    /// Pipeline has started
    Started,
    /// Moving to a new phase
    PhaseChanged { phase: PipelinePhase },
    /// Pipeline completed successfully
    Completed { summary: PipelineSummary },
    /// Pipeline was cancelled
    Cancelled,
    /// Pipeline encountered a fatal error
    Error { message: String },
}

/// Phases of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelinePhase {
    Scanning,
    Analyzing,
    Applying,
    Reporting,
}

/// Summary of pipeline results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSummary {
    /// Videos found by the scan
    pub total_videos: usize,
    /// Number of duplicate groups found
    pub duplicate_groups: usize,
    /// Videos marked for deletion
    pub files_to_delete: usize,
    /// Bytes freed by deleting every marked file
    pub reclaimable_bytes: u64,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl std::fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelinePhase::Scanning => write!(f, "Scanning"),
            PipelinePhase::Analyzing => write!(f, "Analyzing"),
            PipelinePhase::Applying => write!(f, "Applying"),
            PipelinePhase::Reporting => write!(f, "Reporting"),
        }
    }
}
