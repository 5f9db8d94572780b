//! # Executor Module
//!
//! Carries out a confirmed decision: deletes every marked video and its
//! sidecars, or on a dry run reports what would have been deleted.
//!
//! A failure on one file never stops the others; each path gets its own
//! [`FileOutcome`].

use crate::core::decision::Decision;
use crate::error::ExecuteError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// What happened to one path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum FileStatus {
    Deleted,
    /// Dry run; nothing was touched
    WouldDelete,
    /// Gone before we got to it
    Missing,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub status: FileStatus,
}

impl FileOutcome {
    /// Deleted, or would have been
    pub fn is_removed(&self) -> bool {
        matches!(self.status, FileStatus::Deleted | FileStatus::WouldDelete)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.status, FileStatus::Failed(_))
    }
}

/// Removes the files a decision marks for deletion
pub trait Executor {
    /// Remove the decision's files, reporting each outcome as it happens
    fn execute(
        &mut self,
        decision: &Decision,
        on_outcome: &mut dyn FnMut(&FileOutcome),
    ) -> Vec<FileOutcome>;

    /// True when nothing is actually removed
    fn is_dry_run(&self) -> bool;
}

/// Deletes files from the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct DeletionExecutor {
    dry_run: bool,
}

impl DeletionExecutor {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Delete a list of paths, reporting each outcome to a callback
    pub fn delete_paths<F>(&self, paths: &[PathBuf], mut on_outcome: F) -> Vec<FileOutcome>
    where
        F: FnMut(&FileOutcome),
    {
        let mut outcomes = Vec::with_capacity(paths.len());

        for path in paths {
            let status = if self.dry_run {
                if path.exists() {
                    FileStatus::WouldDelete
                } else {
                    FileStatus::Missing
                }
            } else {
                match remove_file(path) {
                    Ok(()) => FileStatus::Deleted,
                    Err(ExecuteError::Missing { .. }) => FileStatus::Missing,
                    Err(e) => {
                        warn!("{}", e);
                        FileStatus::Failed(e.to_string())
                    }
                }
            };

            debug!("{}: {:?}", path.display(), status);
            let outcome = FileOutcome {
                path: path.clone(),
                status,
            };
            on_outcome(&outcome);
            outcomes.push(outcome);
        }

        outcomes
    }
}

impl Executor for DeletionExecutor {
    fn execute(
        &mut self,
        decision: &Decision,
        on_outcome: &mut dyn FnMut(&FileOutcome),
    ) -> Vec<FileOutcome> {
        self.delete_paths(&decision.files_to_delete(), on_outcome)
    }

    fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}

fn remove_file(path: &Path) -> Result<(), ExecuteError> {
    fs::remove_file(path).map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            ExecuteError::Missing {
                path: path.to_path_buf(),
            }
        } else {
            ExecuteError::DeleteFailed {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}
