//! TV grouping on exact `(series, season, episodes)` keys.

use super::{DuplicateGroup, GroupStrategy};
use crate::core::parser::{format_marker, MediaKind, MediaRecord};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// Groups episode records; movies are ignored
#[derive(Debug, Clone, Copy, Default)]
pub struct TvGrouper;

impl TvGrouper {
    /// Extras only ever match other extras
    pub fn group(&self, records: &[MediaRecord]) -> Vec<DuplicateGroup> {
        let mut by_episode: BTreeMap<(&str, u32, &BTreeSet<u32>, bool), Vec<&MediaRecord>> =
            BTreeMap::new();

        for record in records {
            let MediaKind::Episode {
                series_name,
                season,
                episodes,
            } = &record.kind
            else {
                continue;
            };
            if series_name.is_empty() {
                warn!("No series name for {}, not grouping it", record.path.display());
                continue;
            }
            by_episode
                .entry((series_name.as_str(), *season, episodes, record.is_extra))
                .or_default()
                .push(record);
        }

        by_episode
            .into_iter()
            .filter(|(_, members)| members.len() > 1)
            .map(|((series, season, episodes, _), members)| {
                let label = format!("{} {}", series, format_marker(season, episodes));
                debug!("episode group {:?} with {} members", label, members.len());
                DuplicateGroup::new(
                    GroupStrategy::Episode,
                    label,
                    members.into_iter().cloned().collect(),
                )
            })
            .collect()
    }
}
