//! Movie grouping: an ordered list of strategies with first-claim-wins.

use super::traits::{FuzzyThreshold, TitleSimilarity};
use super::{DuplicateGroup, GroupStrategy};
use crate::core::parser::{MediaKind, MediaRecord};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use tracing::debug;

/// A candidate cluster produced by one strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    pub label: String,
    /// Indices into the slice the strategy was given
    pub members: Vec<usize>,
}

/// One way of recognizing the same movie
///
/// Strategies only see records no earlier strategy has claimed. Clusters
/// they return must be disjoint; clusters of one are ignored.
pub trait GroupingStrategy: Send + Sync {
    fn strategy(&self) -> GroupStrategy;

    fn cluster(&self, records: &[&MediaRecord]) -> Vec<Cluster>;

    /// Human-readable description of the strategy
    fn description(&self) -> String;
}

fn movie_title(record: &MediaRecord) -> Option<(&str, Option<u16>)> {
    match &record.kind {
        MediaKind::Movie { title, year } => Some((title.as_str(), *year)),
        MediaKind::Episode { .. } => None,
    }
}

fn title_label(title: &str, year: Option<u16>) -> String {
    match year {
        Some(year) => format!("{} ({})", title, year),
        None => title.to_string(),
    }
}

/// Encodes placed side by side in one folder
#[derive(Debug, Clone, Default)]
pub struct FolderStrategy {
    roots: Vec<PathBuf>,
}

impl FolderStrategy {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }
}

impl GroupingStrategy for FolderStrategy {
    fn strategy(&self) -> GroupStrategy {
        GroupStrategy::Folder
    }

    /// Copies of one title share a key even when only some names carry the
    /// year. Two different known years in one folder split into one cluster
    /// per year and the undated copies stay unclaimed.
    fn cluster(&self, records: &[&MediaRecord]) -> Vec<Cluster> {
        let mut by_folder: BTreeMap<(PathBuf, &str), Vec<(usize, Option<u16>)>> = BTreeMap::new();

        for (index, record) in records.iter().enumerate() {
            let Some((title, year)) = movie_title(record) else {
                continue;
            };
            let Some(parent) = record.parent_dir() else {
                continue;
            };
            // A scan root is a library, not a movie folder
            if parent.as_os_str().is_empty() || self.roots.iter().any(|r| r == parent) {
                continue;
            }
            by_folder
                .entry((parent.to_path_buf(), title))
                .or_default()
                .push((index, year));
        }

        let mut clusters = Vec::new();
        for ((folder, _), entries) in by_folder {
            let label = folder
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| folder.display().to_string());
            let years: BTreeSet<u16> = entries.iter().filter_map(|(_, year)| *year).collect();

            if years.len() <= 1 {
                clusters.push(Cluster {
                    label,
                    members: entries.into_iter().map(|(index, _)| index).collect(),
                });
                continue;
            }

            debug!("{:?} holds {} different years", label, years.len());
            for year in years {
                clusters.push(Cluster {
                    label: format!("{} ({})", label, year),
                    members: entries
                        .iter()
                        .filter(|(_, y)| *y == Some(year))
                        .map(|(index, _)| *index)
                        .collect(),
                });
            }
        }
        clusters
    }

    fn description(&self) -> String {
        "Folder strategy: files sharing a movie folder".to_string()
    }
}

/// Same normalized title and year in different places
#[derive(Debug, Clone, Copy, Default)]
pub struct TitleStrategy;

impl GroupingStrategy for TitleStrategy {
    fn strategy(&self) -> GroupStrategy {
        GroupStrategy::Title
    }

    /// Extras only ever match other extras
    fn cluster(&self, records: &[&MediaRecord]) -> Vec<Cluster> {
        let mut by_title: BTreeMap<(&str, Option<u16>, bool), Vec<usize>> = BTreeMap::new();

        for (index, record) in records.iter().enumerate() {
            match movie_title(record) {
                Some((title, year)) if !title.is_empty() => by_title
                    .entry((title, year, record.is_extra))
                    .or_default()
                    .push(index),
                _ => {}
            }
        }

        by_title
            .into_iter()
            .map(|((title, year, _), members)| Cluster {
                label: title_label(title, year),
                members,
            })
            .collect()
    }

    fn description(&self) -> String {
        "Title strategy: identical normalized title and year".to_string()
    }
}

/// Titles that are similar but not identical
pub struct FuzzyStrategy {
    metric: Box<dyn TitleSimilarity>,
    threshold: FuzzyThreshold,
}

struct FuzzyCluster<'a> {
    seed: &'a str,
    seed_year: Option<u16>,
    year: Option<u16>,
    is_extra: bool,
    members: Vec<usize>,
}

impl FuzzyStrategy {
    pub fn new(metric: Box<dyn TitleSimilarity>, threshold: FuzzyThreshold) -> Self {
        Self { metric, threshold }
    }
}

impl GroupingStrategy for FuzzyStrategy {
    fn strategy(&self) -> GroupStrategy {
        GroupStrategy::Fuzzy
    }

    /// Distinct titles are visited alphabetically. Each joins the cluster
    /// whose seed it is most similar to, the earliest cluster on a tie, or
    /// seeds a new one. Two known years must agree and extras only join
    /// extras.
    fn cluster(&self, records: &[&MediaRecord]) -> Vec<Cluster> {
        let mut by_title: BTreeMap<(&str, Option<u16>, bool), Vec<usize>> = BTreeMap::new();
        for (index, record) in records.iter().enumerate() {
            match movie_title(record) {
                Some((title, year)) if !title.is_empty() => by_title
                    .entry((title, year, record.is_extra))
                    .or_default()
                    .push(index),
                _ => {}
            }
        }

        let mut clusters: Vec<FuzzyCluster> = Vec::new();
        for ((title, year, is_extra), members) in by_title {
            let mut best: Option<(usize, f64)> = None;
            for (position, cluster) in clusters.iter().enumerate() {
                if cluster.is_extra != is_extra {
                    continue;
                }
                if let (Some(a), Some(b)) = (year, cluster.year) {
                    if a != b {
                        continue;
                    }
                }
                let similarity = self.metric.similarity(title, cluster.seed);
                if !self.threshold.accepts(similarity) {
                    continue;
                }
                if best.map_or(true, |(_, top)| similarity > top) {
                    best = Some((position, similarity));
                }
            }

            match best {
                Some((position, similarity)) => {
                    let cluster = &mut clusters[position];
                    debug!(
                        "Fuzzy match {:?} -> {:?} ({:.3})",
                        title, cluster.seed, similarity
                    );
                    cluster.year = cluster.year.or(year);
                    cluster.members.extend(members);
                }
                None => clusters.push(FuzzyCluster {
                    seed: title,
                    seed_year: year,
                    year,
                    is_extra,
                    members,
                }),
            }
        }

        clusters
            .into_iter()
            .map(|c| Cluster {
                label: title_label(c.seed, c.seed_year.or(c.year)),
                members: c.members,
            })
            .collect()
    }

    fn description(&self) -> String {
        format!(
            "Fuzzy strategy: {} ≥ {:.2}",
            self.metric.description(),
            self.threshold.value()
        )
    }
}

/// Runs movie strategies in priority order
pub struct MovieGrouper {
    strategies: Vec<Box<dyn GroupingStrategy>>,
}

impl MovieGrouper {
    /// Folder then title grouping
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self {
            strategies: vec![Box::new(FolderStrategy::new(roots)), Box::new(TitleStrategy)],
        }
    }

    /// Append fuzzy title matching as the last strategy
    pub fn with_fuzzy(mut self, metric: Box<dyn TitleSimilarity>, threshold: FuzzyThreshold) -> Self {
        self.strategies
            .push(Box::new(FuzzyStrategy::new(metric, threshold)));
        self
    }

    pub fn descriptions(&self) -> Vec<String> {
        self.strategies.iter().map(|s| s.description()).collect()
    }

    /// Group movie records; episodes are ignored
    pub fn group(&self, records: &[MediaRecord]) -> Vec<DuplicateGroup> {
        let mut claimed = vec![false; records.len()];
        let mut groups = Vec::new();

        for strategy in &self.strategies {
            let candidates: Vec<usize> = (0..records.len())
                .filter(|&i| !claimed[i] && !records[i].kind.is_episode())
                .collect();
            let refs: Vec<&MediaRecord> = candidates.iter().map(|&i| &records[i]).collect();

            for cluster in strategy.cluster(&refs) {
                if cluster.members.len() < 2 {
                    continue;
                }
                let indices: Vec<usize> = cluster.members.iter().map(|&m| candidates[m]).collect();
                if indices.iter().any(|&i| claimed[i]) {
                    continue;
                }
                for &i in &indices {
                    claimed[i] = true;
                }

                debug!(
                    "{} group {:?} with {} members",
                    strategy.strategy(),
                    cluster.label,
                    indices.len()
                );
                groups.push(DuplicateGroup::new(
                    strategy.strategy(),
                    cluster.label,
                    indices.iter().map(|&i| records[i].clone()).collect(),
                ));
            }
        }

        groups
    }
}
