//! # Decision Module
//!
//! Picks the copy to keep in every duplicate group and marks the rest,
//! together with their sidecars, for deletion.
//!
//! The engine never touches the filesystem. It hands out [`Decision`]s; a
//! caller that wants confirmation passes a [`Reviewer`] to the pipeline,
//! which asks about each group before executing it.

mod review;

pub use review::{AutoApprove, Confirmation, Reviewer};

use crate::core::grouper::{DuplicateGroup, GroupStrategy};
use crate::core::parser::MediaRecord;
use crate::core::quality::{Score, Scorer, SizePreference};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::PathBuf;
use uuid::Uuid;

/// A record with its score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRecord {
    pub record: MediaRecord,
    pub score: Score,
}

/// Why the kept file won
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeepReason {
    /// Strictly highest quality score
    HighestScore,
    /// Strictly lowest quality score (reverse mode)
    LowestScore,
    /// Scores tied; the smaller file was preferred
    SmallerFile,
    /// Scores tied; the larger file was preferred
    LargerFile,
    /// Scores tied with no size preference; first path wins
    FirstByPath,
}

impl std::fmt::Display for KeepReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeepReason::HighestScore => write!(f, "Highest quality score"),
            KeepReason::LowestScore => write!(f, "Lowest quality score (reverse)"),
            KeepReason::SmallerFile => write!(f, "Equal score, smaller file"),
            KeepReason::LargerFile => write!(f, "Equal score, larger file"),
            KeepReason::FirstByPath => write!(f, "Equal score, first by path"),
        }
    }
}

/// Keep/delete verdict for one group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
    pub group_id: Uuid,
    pub strategy: GroupStrategy,
    pub label: String,
    pub keep: ScoredRecord,
    /// Best first, in the same order the keeper was chosen from
    pub delete: Vec<ScoredRecord>,
    pub keep_reason: KeepReason,
}

impl Decision {
    /// Every path to remove: each deleted video followed by its sidecars
    pub fn files_to_delete(&self) -> Vec<PathBuf> {
        self.delete
            .iter()
            .flat_map(|scored| scored.record.all_paths())
            .collect()
    }

    /// Sidecars of deleted videos
    pub fn sidecars_to_delete(&self) -> usize {
        self.delete.iter().map(|s| s.record.sidecars.len()).sum()
    }

    /// Bytes freed by deleting the marked videos
    pub fn reclaimable_bytes(&self) -> u64 {
        self.delete.iter().map(|s| s.record.size_bytes).sum()
    }

    /// Members in decision order, keeper first
    pub fn ranked(&self) -> impl Iterator<Item = &ScoredRecord> {
        std::iter::once(&self.keep).chain(self.delete.iter())
    }
}

/// Orders group members and chooses the keeper
#[derive(Debug, Clone, Copy, Default)]
pub struct DecisionEngine {
    scorer: Scorer,
}

impl DecisionEngine {
    pub fn new(scorer: Scorer) -> Self {
        Self { scorer }
    }

    pub fn scorer(&self) -> &Scorer {
        &self.scorer
    }

    /// Decide one group. None only for an empty group.
    pub fn decide(&self, group: &DuplicateGroup) -> Option<Decision> {
        let mut ranked: Vec<ScoredRecord> = group
            .members
            .iter()
            .map(|record| ScoredRecord {
                score: self.scorer.score(&record.quality, record.size_bytes),
                record: record.clone(),
            })
            .collect();

        ranked.sort_by(|a, b| {
            self.scorer
                .compare(&b.score, &a.score)
                .then_with(|| a.record.path.cmp(&b.record.path))
        });

        let keep_reason = match (ranked.first(), ranked.get(1)) {
            (Some(keep), Some(runner_up)) => self.keep_reason(&keep.score, &runner_up.score),
            (Some(keep), None) => self.keep_reason(&keep.score, &keep.score),
            (None, _) => return None,
        };

        let mut members = ranked.into_iter();
        let keep = members.next()?;

        Some(Decision {
            group_id: group.id,
            strategy: group.strategy,
            label: group.label.clone(),
            keep,
            delete: members.collect(),
            keep_reason,
        })
    }

    /// Decide every group, in input order
    pub fn decide_all(&self, groups: &[DuplicateGroup]) -> Vec<Decision> {
        groups.iter().filter_map(|g| self.decide(g)).collect()
    }

    fn keep_reason(&self, keep: &Score, runner_up: &Score) -> KeepReason {
        let config = self.scorer.config();
        if keep.points.total_cmp(&runner_up.points) != Ordering::Equal {
            return if config.reverse {
                KeepReason::LowestScore
            } else {
                KeepReason::HighestScore
            };
        }
        if keep.size_bytes != runner_up.size_bytes {
            match config.size_preference {
                SizePreference::Smaller => return KeepReason::SmallerFile,
                SizePreference::Larger => return KeepReason::LargerFile,
                SizePreference::Ignore => {}
            }
        }
        KeepReason::FirstByPath
    }
}
