//! # Scanner Module
//!
//! Walks media directories and produces an immutable [`ScanSnapshot`]:
//! every video file with its size and sidecars. Everything after the scan
//! works on the snapshot only.
//!
//! ## Example
//! ```rust,ignore
//! use janitorr::core::scanner::{MediaScanner, ScanConfig, WalkDirScanner};
//!
//! let scanner = WalkDirScanner::new(ScanConfig::default(), vocabulary);
//! let snapshot = scanner.scan(&["/mnt/media/movies".into()])?;
//! ```

mod filter;
mod walker;

pub use filter::{PathFilter, PathPattern, VideoFilter};
pub use walker::{ScanConfig, WalkDirScanner};

use crate::error::ScanError;
use crate::events::EventSender;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A discovered video file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannedFile {
    pub path: PathBuf,
    /// File size in bytes at scan time
    pub size_bytes: u64,
    /// Subtitles, metadata and artwork sharing the video's base name
    #[serde(default)]
    pub sidecars: Vec<PathBuf>,
}

impl ScannedFile {
    pub fn new(path: impl Into<PathBuf>, size_bytes: u64) -> Self {
        Self {
            path: path.into(),
            size_bytes,
            sidecars: Vec::new(),
        }
    }

    pub fn with_sidecars(mut self, sidecars: Vec<PathBuf>) -> Self {
        self.sidecars = sidecars;
        self
    }
}

/// Result of a scan
#[derive(Debug, Default)]
pub struct ScanSnapshot {
    /// Directories that were scanned
    pub roots: Vec<PathBuf>,
    /// Videos, sorted by path
    pub files: Vec<ScannedFile>,
    /// Non-fatal errors met while walking
    pub errors: Vec<ScanError>,
}

impl ScanSnapshot {
    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.size_bytes).sum()
    }
}

/// Trait for media scanners
///
/// Implement this to feed the engine from somewhere other than the local
/// filesystem, or to hand it a fixed snapshot in tests.
pub trait MediaScanner: Send + Sync {
    /// Scan directories and return the discovered videos
    fn scan(&self, paths: &[PathBuf]) -> Result<ScanSnapshot, ScanError>;

    /// Scan with progress reporting via events
    fn scan_with_events(
        &self,
        paths: &[PathBuf],
        events: &EventSender,
    ) -> Result<ScanSnapshot, ScanError>;
}
