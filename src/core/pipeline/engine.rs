//! Pure analysis: snapshot in, decisions out.

use super::config::EngineConfig;
use crate::core::decision::{Decision, DecisionEngine};
use crate::core::grouper::{Grouper, GroupingOptions, Mode};
use crate::core::parser::{MediaParser, MediaRecord};
use crate::core::quality::Scorer;
use crate::core::reporter::{Exclusions, RunSummary};
use crate::core::scanner::ScannedFile;
use crate::core::vocabulary::VocabularyMatcher;
use crate::error::ConfigError;
use crate::events::{null_sender, AnalyzeEvent, Event, EventSender};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info};

/// Outcome of analyzing one snapshot
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    /// Resolved mode, never `Auto`
    pub mode: Mode,
    /// Records that took part in grouping
    pub candidates: Vec<MediaRecord>,
    pub decisions: Vec<Decision>,
    pub summary: RunSummary,
}

/// Turns scanned files into keep/delete decisions without side effects
pub struct Engine {
    config: EngineConfig,
    parser: MediaParser,
    roots: Vec<PathBuf>,
}

impl Engine {
    pub fn new(config: EngineConfig, vocabulary: VocabularyMatcher) -> Self {
        Self {
            config,
            parser: MediaParser::new(vocabulary),
            roots: Vec::new(),
        }
    }

    /// Scan roots the files came from
    pub fn with_roots(mut self, roots: Vec<PathBuf>) -> Self {
        self.parser = self.parser.with_roots(roots.clone());
        self.roots = roots;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn analyze(&self, files: &[ScannedFile]) -> Result<Analysis, ConfigError> {
        self.analyze_with_events(files, &null_sender())
    }

    /// Filter, parse, group and decide
    pub fn analyze_with_events(
        &self,
        files: &[ScannedFile],
        events: &EventSender,
    ) -> Result<Analysis, ConfigError> {
        events.send(Event::Analyze(AnalyzeEvent::Started {
            total_files: files.len(),
        }));

        let path_filter = self.config.path_filter()?;
        let min_size = self.config.min_size_bytes();
        let mut excluded = Exclusions::default();

        let mut records = Vec::with_capacity(files.len());
        for file in files {
            if !path_filter.allows(&file.path) {
                excluded.filtered += 1;
                continue;
            }
            if file.size_bytes < min_size {
                debug!("Too small: {} ({} bytes)", file.path.display(), file.size_bytes);
                excluded.too_small += 1;
                continue;
            }
            records.push(self.parser.parse(file));
        }

        let mode = self.config.mode.resolve(&records);
        events.send(Event::Analyze(AnalyzeEvent::ModeDetected { mode }));
        info!("Grouping {} records in {} mode", records.len(), mode);

        let candidates: Vec<MediaRecord> = records
            .into_iter()
            .filter(|record| {
                if record.is_extra && !self.config.keep_extras {
                    excluded.extras += 1;
                    return false;
                }
                if record.kind.is_episode() != (mode == Mode::Tv) {
                    excluded.other_kind += 1;
                    return false;
                }
                true
            })
            .collect();

        let grouper = Grouper::new(GroupingOptions {
            roots: self.roots.clone(),
            fuzzy: self.config.fuzzy_for(mode),
        });
        let groups = grouper.group(&candidates, mode);

        for group in &groups {
            events.send(Event::Analyze(AnalyzeEvent::GroupFound {
                group_id: group.id.to_string(),
                strategy: group.strategy,
                members: group.len(),
            }));
        }

        let decisions = DecisionEngine::new(Scorer::new(self.config.scoring)).decide_all(&groups);
        let summary = RunSummary::new(mode, files.len(), excluded, &decisions);

        events.send(Event::Analyze(AnalyzeEvent::Completed {
            total_groups: summary.total_groups,
            files_to_delete: summary.files_to_delete,
        }));
        info!(
            "{} duplicate groups, {} files marked for deletion",
            summary.total_groups, summary.files_to_delete
        );

        Ok(Analysis {
            mode,
            candidates,
            decisions,
            summary,
        })
    }
}
