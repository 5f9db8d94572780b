//! # CLI Module
//!
//! Command-line interface for the duplicate media janitor.
//!
//! ## Usage
//! ```bash
//! # Preview what would be removed
//! janitorr -d /media/movies --dry-run
//!
//! # Several libraries, confirm each group
//! janitorr -d /media/movies -d /mnt/old --interactive
//!
//! # TV episodes, keep the smaller file on equal quality
//! janitorr -d /media/tv --mode tv --prefer-smaller
//!
//! # JSON output
//! janitorr -d /media/movies --dry-run --output json
//! ```

use clap::{Parser, ValueEnum};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use janitorr::core::backup::DEFAULT_BACKUP_FILE;
use janitorr::core::decision::{Confirmation, Decision};
use janitorr::core::grouper::Mode;
use janitorr::core::pipeline::{ApplyReport, EngineConfig, Pipeline, PipelineResult};
use janitorr::core::quality::{ScoringConfig, SizePreference};
use janitorr::core::reporter::{export_to_file, format_bytes};
use janitorr::core::vocabulary::Vocabulary;
use janitorr::error::{JanitorError, Result};
use janitorr::events::{
    null_sender, AnalyzeEvent, Event, EventChannel, PipelineEvent, ScanEvent,
};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use tracing::{error, info};

/// janitorr - Remove duplicate movies and episodes, keep the best copy
#[derive(Parser, Debug)]
#[command(name = "janitorr")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Media directories to scan
    #[arg(short, long = "directory", required = true)]
    directories: Vec<PathBuf>,

    /// Library kind
    #[arg(long, default_value = "auto")]
    mode: CliMode,

    /// Show what would be deleted without touching anything
    #[arg(long)]
    dry_run: bool,

    /// Keep the lowest-quality copy instead of the best
    #[arg(long)]
    reverse: bool,

    /// On equal quality keep the smaller file
    #[arg(long, conflicts_with = "prefer_larger")]
    prefer_smaller: bool,

    /// On equal quality keep the larger file
    #[arg(long)]
    prefer_larger: bool,

    /// Confirm every group before deleting
    #[arg(short, long)]
    interactive: bool,

    /// Only consider paths matching these globs or substrings
    #[arg(long = "include")]
    include: Vec<String>,

    /// Ignore paths matching these globs or substrings
    #[arg(long = "exclude")]
    exclude: Vec<String>,

    /// Backup log of deleted files (JSON Lines)
    #[arg(long, default_value = DEFAULT_BACKUP_FILE)]
    backup: PathBuf,

    /// Do not write a backup log
    #[arg(long)]
    no_backup: bool,

    /// Ignore videos smaller than this many MiB
    #[arg(long, default_value_t = 100.0)]
    min_size_mb: f64,

    /// Also group movies whose titles are merely similar
    #[arg(long)]
    fuzzy_matching: bool,

    /// Similarity needed for a fuzzy match (0.0 - 1.0)
    #[arg(long, default_value_t = 0.85)]
    fuzzy_threshold: f64,

    /// Treat extras, samples and featurettes like any other video
    #[arg(long)]
    keep_extras: bool,

    /// JSON file overriding the built-in token vocabulary
    #[arg(long)]
    vocabulary: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "pretty")]
    output: OutputFormat,

    /// Write every decision to a CSV file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Include hidden files and directories
    #[arg(long)]
    include_hidden: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Also write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliMode {
    /// Movie library
    Movie,
    /// TV library, grouped by series, season and episode
    Tv,
    /// Guess from the files found (default)
    Auto,
}

impl From<CliMode> for Mode {
    fn from(mode: CliMode) -> Self {
        match mode {
            CliMode::Movie => Mode::Movie,
            CliMode::Tv => Mode::Tv,
            CliMode::Auto => Mode::Auto,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
    /// Minimal output (paths to delete)
    Minimal,
}

impl Cli {
    fn engine_config(&self) -> EngineConfig {
        let size_preference = if self.prefer_smaller {
            SizePreference::Smaller
        } else if self.prefer_larger {
            SizePreference::Larger
        } else {
            SizePreference::Ignore
        };

        EngineConfig {
            mode: self.mode.into(),
            dry_run: self.dry_run,
            interactive: self.interactive,
            scoring: ScoringConfig {
                reverse: self.reverse,
                size_preference,
            },
            min_size_mb: self.min_size_mb,
            include_patterns: self.include.clone(),
            exclude_patterns: self.exclude.clone(),
            fuzzy_matching: self.fuzzy_matching,
            fuzzy_threshold: self.fuzzy_threshold,
            keep_extras: self.keep_extras,
        }
    }
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = janitorr::init_tracing(cli.verbose, cli.log_file.as_deref());

    let term = Term::stderr();
    let output = cli.output;

    if matches!(output, OutputFormat::Pretty) {
        term.write_line(&format!(
            "{} {}",
            style("janitorr").bold().cyan(),
            style(concat!("v", env!("CARGO_PKG_VERSION"))).dim()
        ))
        .ok();
        if cli.dry_run {
            term.write_line(&format!("{}", style("Dry run: nothing will be deleted").yellow()))
                .ok();
        }
        term.write_line("").ok();
    }

    let vocabulary = match &cli.vocabulary {
        Some(path) => Vocabulary::load(path)?,
        None => Vocabulary::default(),
    };
    let backup = (!cli.no_backup).then(|| cli.backup.clone());

    let pipeline = Pipeline::builder()
        .paths(cli.directories.clone())
        .engine_config(cli.engine_config())
        .vocabulary(vocabulary)
        .include_hidden(cli.include_hidden)
        .backup(backup)
        .build()?;

    let result = scan_with_progress(&pipeline, output, cli.verbose)?;
    let decisions = &result.analysis.decisions;

    if let Some(csv_path) = &cli.csv {
        export_to_file(decisions, csv_path).map_err(|source| JanitorError::Report {
            path: csv_path.clone(),
            source,
        })?;
        info!("Wrote {} decisions to {}", decisions.len(), csv_path.display());
    }

    if matches!(output, OutputFormat::Pretty) {
        print_pretty_analysis(&term, &result, pipeline.config().engine.interactive);
    }

    let mut reviewer = |decision: &Decision, position: usize, total: usize| {
        prompt_decision(&term, decision, position, total)
    };
    let report = pipeline.apply(decisions, &mut reviewer, &null_sender())?;

    match output {
        OutputFormat::Pretty => print_pretty_report(&term, &report, &pipeline),
        OutputFormat::Json => print_json_results(&result, &report),
        OutputFormat::Minimal => print_minimal_results(decisions),
    }

    Ok(())
}

fn scan_with_progress(
    pipeline: &Pipeline,
    output: OutputFormat,
    verbose: bool,
) -> Result<PipelineResult> {
    let (sender, receiver) = EventChannel::new();

    let progress = if matches!(output, OutputFormat::Pretty) {
        let pb = ProgressBar::new_spinner();
        if let Ok(spinner) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(spinner);
        }
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let progress_clone = progress.clone();

    // Handle events in a separate thread
    let event_thread = thread::spawn(move || {
        for event in receiver.iter() {
            let Some(ref pb) = progress_clone else {
                continue;
            };
            match event {
                Event::Pipeline(PipelineEvent::PhaseChanged { phase }) => {
                    pb.set_message(format!("{}", phase));
                }
                Event::Scan(ScanEvent::Progress(p)) => {
                    if verbose {
                        pb.set_message(format!(
                            "Scanning {} ({} videos)",
                            p.current_path.display(),
                            p.videos_found
                        ));
                    } else {
                        pb.set_message(format!(
                            "Scanning: {} directories, {} videos",
                            p.directories_scanned, p.videos_found
                        ));
                    }
                }
                Event::Analyze(AnalyzeEvent::ModeDetected { mode }) => {
                    pb.set_message(format!("Analyzing {} library", mode));
                }
                Event::Pipeline(PipelineEvent::Completed { .. }) => {
                    pb.finish_and_clear();
                }
                _ => {}
            }
        }
    });

    let result = pipeline.run_with_events(&sender);

    // Drop sender to signal event thread to finish
    drop(sender);
    event_thread.join().ok();
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    result
}

fn print_pretty_analysis(term: &Term, result: &PipelineResult, interactive: bool) {
    let summary = &result.analysis.summary;

    term.write_line(&format!("{} Scan Complete", style("✓").green().bold()))
        .ok();
    term.write_line("").ok();

    term.write_line(&format!(
        "  {} videos scanned in {:.1}s ({} mode)",
        style(result.total_videos).cyan(),
        result.duration_ms as f64 / 1000.0,
        summary.mode
    ))
    .ok();

    let excluded = &summary.excluded;
    if excluded.total() > 0 {
        term.write_line(&format!(
            "  {} excluded ({} too small, {} filtered, {} extras, {} other kind)",
            style(excluded.total()).dim(),
            excluded.too_small,
            excluded.filtered,
            excluded.extras,
            excluded.other_kind
        ))
        .ok();
    }

    let by_strategy = summary
        .groups_by_strategy
        .iter()
        .map(|(strategy, count)| format!("{} {}", count, strategy))
        .collect::<Vec<_>>()
        .join(", ");
    term.write_line(&format!(
        "  {} duplicate groups{}",
        style(summary.total_groups).cyan(),
        if by_strategy.is_empty() {
            String::new()
        } else {
            format!(" ({})", by_strategy)
        }
    ))
    .ok();

    term.write_line(&format!(
        "  {} files marked for deletion ({} sidecars)",
        style(summary.files_to_delete).cyan(),
        summary.sidecars_to_delete
    ))
    .ok();

    term.write_line(&format!(
        "  {} reclaimable",
        style(format_bytes(summary.reclaimable_bytes)).yellow()
    ))
    .ok();

    if !result.errors.is_empty() {
        term.write_line(&format!(
            "  {} paths could not be read",
            style(result.errors.len()).red()
        ))
        .ok();
    }

    term.write_line("").ok();

    if result.analysis.decisions.is_empty() {
        term.write_line(&format!("  {} No duplicates found!", style("✓").green()))
            .ok();
        return;
    }

    // Interactive review prints each group as it is asked about
    if interactive {
        return;
    }

    term.write_line(&format!("{}", style("Duplicate Groups:").bold().underlined()))
        .ok();
    term.write_line("").ok();

    for (i, decision) in result.analysis.decisions.iter().enumerate() {
        print_decision(term, decision, i, result.analysis.decisions.len());
    }
}

fn print_decision(term: &Term, decision: &Decision, position: usize, total: usize) {
    term.write_line(&format!(
        "  {} {} {} ({}, {} reclaimable)",
        style(format!("Group {}/{}:", position + 1, total)).bold(),
        decision.label,
        style(format!("[{}]", decision.strategy)).yellow(),
        decision.keep_reason,
        format_bytes(decision.reclaimable_bytes())
    ))
    .ok();

    for scored in decision.ranked() {
        let keep = scored.record.path == decision.keep.record.path;
        let marker = if keep {
            style("★").green().to_string()
        } else {
            style("✗").red().to_string()
        };

        term.write_line(&format!(
            "    {} {:>6.1} {:>9}  {}",
            marker,
            scored.score.points,
            format_bytes(scored.record.size_bytes),
            display_path(&scored.record.path)
        ))
        .ok();

        let quality = scored.record.quality.label();
        if !quality.is_empty() {
            term.write_line(&format!("{:>22}{}", "", style(quality).dim()))
                .ok();
        }

        for sidecar in &scored.record.sidecars {
            term.write_line(&format!(
                "{:>22}{} {}",
                "",
                style("+").dim(),
                style(display_path(sidecar)).dim()
            ))
            .ok();
        }
    }

    term.write_line("").ok();
}

fn prompt_decision(term: &Term, decision: &Decision, position: usize, total: usize) -> Confirmation {
    print_decision(term, decision, position, total);

    loop {
        term.write_str(&format!(
            "  Delete the {} marked file(s)? {} ",
            decision.delete.len(),
            style("[y/N/s(kip all)/q(uit)]").dim()
        ))
        .ok();

        let answer = match term.read_line() {
            Ok(line) => line.trim().to_lowercase(),
            // No terminal to ask: stop rather than guess
            Err(_) => return Confirmation::Quit,
        };

        match answer.as_str() {
            "y" | "yes" => return Confirmation::Proceed,
            "" | "n" | "no" => return Confirmation::Skip,
            "s" | "skip" | "skip all" => return Confirmation::SkipRemaining,
            "q" | "quit" => return Confirmation::Quit,
            _ => {
                term.write_line(&format!("  {}", style("Please answer y, n, s or q").yellow()))
                    .ok();
            }
        }
    }
}

fn print_pretty_report(term: &Term, report: &ApplyReport, pipeline: &Pipeline) {
    if report.executed.is_empty() && report.skipped.is_empty() {
        return;
    }

    let verb = if report.dry_run { "Would delete" } else { "Deleted" };
    term.write_line(&format!(
        "{} {} {} files from {} groups",
        style("✓").green().bold(),
        verb,
        style(report.removed()).cyan(),
        report.executed.len()
    ))
    .ok();

    if !report.skipped.is_empty() {
        term.write_line(&format!("  {} groups skipped", style(report.skipped.len()).dim()))
            .ok();
    }

    if report.missing() > 0 {
        term.write_line(&format!(
            "  {} files were already gone",
            style(report.missing()).dim()
        ))
        .ok();
    }

    for group in &report.executed {
        for file in group.files.iter().filter(|f| f.is_failure()) {
            term.write_line(&format!(
                "  {} {} ({:?})",
                style("✗").red(),
                display_path(&file.path),
                file.status
            ))
            .ok();
        }
    }

    if let (Some(backup), true) = (&pipeline.config().backup, report.backed_up > 0) {
        term.write_line(&format!(
            "  {} batches written to {}",
            report.backed_up,
            style(display_path(backup)).dim()
        ))
        .ok();
    }

    if report.dry_run {
        term.write_line(&format!(
            "{}",
            style("Dry run: no files were deleted. Run without --dry-run to apply.").dim()
        ))
        .ok();
    }
}

fn print_json_results(result: &PipelineResult, report: &ApplyReport) {
    let output = serde_json::json!({
        "total_videos": result.total_videos,
        "duration_ms": result.duration_ms,
        "errors": result.errors,
        "analysis": result.analysis,
        "apply": report,
    });

    match serde_json::to_string_pretty(&output) {
        Ok(json) => println!("{}", json),
        Err(e) => error!("Failed to serialize results: {}", e),
    }
}

fn print_minimal_results(decisions: &[Decision]) {
    for decision in decisions {
        for path in decision.files_to_delete() {
            println!("{}", path.display());
        }
    }
}

/// Shorten paths under the home directory to `~/...`
fn display_path(path: &Path) -> String {
    match dirs::home_dir().and_then(|home| path.strip_prefix(home).ok().map(Path::to_path_buf)) {
        Some(relative) => format!("~/{}", relative.display()),
        None => path.display().to_string(),
    }
}
