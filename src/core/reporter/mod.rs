//! # Reporter Module
//!
//! Summarizes a run: how many groups each strategy found, how much would be
//! deleted, and why files never reached grouping.

mod export;

pub use export::{export_csv, export_to_file};

use crate::core::decision::Decision;
use crate::core::grouper::{GroupStrategy, Mode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Records dropped before grouping, by reason
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exclusions {
    /// Below the minimum size
    pub too_small: usize,
    /// Rejected by include/exclude patterns
    pub filtered: usize,
    /// Inside an extras folder
    pub extras: usize,
    /// A movie in tv mode or an episode in movie mode
    pub other_kind: usize,
}

impl Exclusions {
    pub fn total(&self) -> usize {
        self.too_small + self.filtered + self.extras + self.other_kind
    }
}

/// Counts describing one analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub mode: Mode,
    /// Videos in the snapshot
    pub total_videos: usize,
    pub excluded: Exclusions,
    pub total_groups: usize,
    pub groups_by_strategy: BTreeMap<GroupStrategy, usize>,
    /// Videos marked for deletion
    pub files_to_delete: usize,
    /// Sidecars deleted along with them
    pub sidecars_to_delete: usize,
    pub reclaimable_bytes: u64,
}

impl RunSummary {
    pub fn new(
        mode: Mode,
        total_videos: usize,
        excluded: Exclusions,
        decisions: &[Decision],
    ) -> Self {
        let mut groups_by_strategy = BTreeMap::new();
        for decision in decisions {
            *groups_by_strategy.entry(decision.strategy).or_insert(0) += 1;
        }

        Self {
            mode,
            total_videos,
            excluded,
            total_groups: decisions.len(),
            groups_by_strategy,
            files_to_delete: decisions.iter().map(|d| d.delete.len()).sum(),
            sidecars_to_delete: decisions.iter().map(|d| d.sidecars_to_delete()).sum(),
            reclaimable_bytes: decisions.iter().map(|d| d.reclaimable_bytes()).sum(),
        }
    }

    pub fn groups_for(&self, strategy: GroupStrategy) -> usize {
        self.groups_by_strategy.get(&strategy).copied().unwrap_or(0)
    }

    pub fn is_clean(&self) -> bool {
        self.total_groups == 0
    }
}

/// Format bytes as human-readable string
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    const TB: u64 = GB * 1024;

    if bytes >= TB {
        format!("{:.2} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
