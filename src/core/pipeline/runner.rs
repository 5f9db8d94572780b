//! Pipeline execution: scan, analyze, then apply decisions group by group.

use super::config::EngineConfig;
use super::engine::{Analysis, Engine};
use crate::core::backup::{BackupBatch, BackupLog};
use crate::core::decision::{AutoApprove, Confirmation, Decision, Reviewer};
use crate::core::executor::{DeletionExecutor, Executor, FileOutcome, FileStatus};
use crate::core::scanner::{MediaScanner, ScanConfig, WalkDirScanner};
use crate::core::vocabulary::Vocabulary;
use crate::error::JanitorError;
use crate::events::{
    null_sender, ApplyEvent, Event, EventSender, PipelineEvent, PipelinePhase, PipelineSummary,
};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;
use uuid::Uuid;

/// Result of scanning and analyzing
#[derive(Debug)]
pub struct PipelineResult {
    pub analysis: Analysis,
    /// Videos in the snapshot
    pub total_videos: usize,
    /// Non-fatal scan errors
    pub errors: Vec<String>,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

/// What happened to one executed group
#[derive(Debug, Clone, Serialize)]
pub struct GroupOutcome {
    pub group_id: Uuid,
    pub label: String,
    pub files: Vec<FileOutcome>,
}

/// Result of applying decisions
#[derive(Debug, Clone, Default, Serialize)]
pub struct ApplyReport {
    pub executed: Vec<GroupOutcome>,
    pub skipped: Vec<Uuid>,
    /// Set when the reviewer ended the run early
    pub stopped_by: Option<Confirmation>,
    pub dry_run: bool,
    /// Batches appended to the backup log
    pub backed_up: usize,
}

impl ApplyReport {
    fn files(&self) -> impl Iterator<Item = &FileOutcome> {
        self.executed.iter().flat_map(|g| g.files.iter())
    }

    /// Files deleted, or that would have been on a dry run
    pub fn removed(&self) -> usize {
        self.files().filter(|f| f.is_removed()).count()
    }

    pub fn failed(&self) -> usize {
        self.files().filter(|f| f.is_failure()).count()
    }

    pub fn missing(&self) -> usize {
        self.files()
            .filter(|f| f.status == FileStatus::Missing)
            .count()
    }
}

/// Configuration for the pipeline
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    /// Directories to scan
    pub paths: Vec<PathBuf>,
    pub engine: EngineConfig,
    pub vocabulary: Vocabulary,
    pub scan_config: ScanConfig,
    /// Backup log; None disables backups
    pub backup: Option<PathBuf>,
}

/// Builder for pipeline configuration
#[derive(Default)]
pub struct PipelineBuilder {
    config: PipelineConfig,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add directories to scan
    pub fn paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.config.paths = paths;
        self
    }

    pub fn engine_config(mut self, config: EngineConfig) -> Self {
        self.config.engine = config;
        self
    }

    /// Override the built-in token vocabulary
    pub fn vocabulary(mut self, vocabulary: Vocabulary) -> Self {
        self.config.vocabulary = vocabulary;
        self
    }

    pub fn scan_config(mut self, config: ScanConfig) -> Self {
        self.config.scan_config = config;
        self
    }

    /// Include hidden files
    pub fn include_hidden(mut self, include: bool) -> Self {
        self.config.scan_config.include_hidden = include;
        self
    }

    /// Write a backup log of deletions to this file
    pub fn backup(mut self, path: Option<PathBuf>) -> Self {
        self.config.backup = path;
        self
    }

    /// Validate configuration and build the pipeline
    pub fn build(self) -> Result<Pipeline, JanitorError> {
        self.config.engine.validate()?;
        let matcher = self.config.vocabulary.compile()?;
        let engine = Engine::new(self.config.engine.clone(), matcher.clone())
            .with_roots(self.config.paths.clone());
        let scanner = WalkDirScanner::new(self.config.scan_config.clone(), matcher);

        Ok(Pipeline {
            config: self.config,
            engine,
            scanner: Box::new(scanner),
        })
    }
}

/// The duplicate media pipeline
pub struct Pipeline {
    config: PipelineConfig,
    engine: Engine,
    scanner: Box<dyn MediaScanner>,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Scan and analyze without events
    pub fn run(&self) -> Result<PipelineResult, JanitorError> {
        self.run_with_events(&null_sender())
    }

    /// Scan and analyze with event reporting. Nothing is deleted.
    pub fn run_with_events(&self, events: &EventSender) -> Result<PipelineResult, JanitorError> {
        let start_time = Instant::now();

        events.send(Event::Pipeline(PipelineEvent::Started));
        events.phase(PipelinePhase::Scanning);

        let snapshot = self
            .scanner
            .scan_with_events(&self.config.paths, events)?;
        let errors: Vec<String> = snapshot.errors.iter().map(|e| e.to_string()).collect();

        events.phase(PipelinePhase::Analyzing);

        let analysis = self.engine.analyze_with_events(&snapshot.files, events)?;
        let duration_ms = start_time.elapsed().as_millis() as u64;

        events.send(Event::Pipeline(PipelineEvent::Completed {
            summary: PipelineSummary {
                total_videos: snapshot.files.len(),
                duplicate_groups: analysis.summary.total_groups,
                files_to_delete: analysis.summary.files_to_delete,
                reclaimable_bytes: analysis.summary.reclaimable_bytes,
                duration_ms,
            },
        }));

        Ok(PipelineResult {
            total_videos: snapshot.files.len(),
            analysis,
            errors,
            duration_ms,
        })
    }

    /// Apply decisions with the filesystem executor and configured backup log.
    ///
    /// The reviewer is only asked when the engine runs interactively;
    /// otherwise every group proceeds.
    pub fn apply<R: Reviewer>(
        &self,
        decisions: &[Decision],
        reviewer: &mut R,
        events: &EventSender,
    ) -> Result<ApplyReport, JanitorError> {
        let mut executor = DeletionExecutor::new(self.config.engine.dry_run);
        let backup = self.config.backup.as_ref().map(BackupLog::new);
        if self.config.engine.interactive {
            apply(decisions, reviewer, &mut executor, backup.as_ref(), events)
        } else {
            apply(decisions, &mut AutoApprove, &mut executor, backup.as_ref(), events)
        }
    }
}

/// Review, back up and execute decisions one group at a time.
///
/// A group is backed up before any of its files are touched; a failed backup
/// stops the run with an error. Groups executed before a stop stay executed.
/// Dry runs never write a backup.
pub fn apply<R, E>(
    decisions: &[Decision],
    reviewer: &mut R,
    executor: &mut E,
    backup: Option<&BackupLog>,
    events: &EventSender,
) -> Result<ApplyReport, JanitorError>
where
    R: Reviewer + ?Sized,
    E: Executor + ?Sized,
{
    events.phase(PipelinePhase::Applying);

    let dry_run = executor.is_dry_run();
    let mut report = ApplyReport {
        dry_run,
        ..Default::default()
    };

    for (position, decision) in decisions.iter().enumerate() {
        events.send(Event::Apply(ApplyEvent::GroupStarted {
            group_id: decision.group_id.to_string(),
            label: decision.label.clone(),
        }));

        match reviewer.review(decision, position, decisions.len()) {
            Confirmation::Proceed => {}
            Confirmation::Skip => {
                events.send(Event::Apply(ApplyEvent::GroupSkipped {
                    group_id: decision.group_id.to_string(),
                }));
                report.skipped.push(decision.group_id);
                continue;
            }
            stop @ (Confirmation::SkipRemaining | Confirmation::Quit) => {
                info!("Stopped at group {} of {}", position + 1, decisions.len());
                report.stopped_by = Some(stop);
                report
                    .skipped
                    .extend(decisions[position..].iter().map(|d| d.group_id));
                events.send(Event::Apply(ApplyEvent::Stopped));
                if stop == Confirmation::Quit {
                    events.send(Event::Pipeline(PipelineEvent::Cancelled));
                }
                break;
            }
        }

        if let (Some(log), false) = (backup, dry_run) {
            log.append(&BackupBatch::from_decision(decision))?;
            report.backed_up += 1;
        }

        let files = executor.execute(decision, &mut |outcome: &FileOutcome| {
            events.file_outcome(outcome, dry_run)
        });

        report.executed.push(GroupOutcome {
            group_id: decision.group_id,
            label: decision.label.clone(),
            files,
        });
    }

    events.send(Event::Apply(ApplyEvent::Completed {
        deleted: report.removed(),
        failed: report.failed(),
    }));

    Ok(report)
}
