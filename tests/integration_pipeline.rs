//! Integration tests for the pipeline module.
//!
//! These tests build small media libraries on disk and verify:
//! - The worked movie, episode, extras and size examples
//! - Grouping properties (idempotence, purity, single membership)
//! - Decision properties (sidecar coupling, reverse symmetry)
//! - Error handling for missing directories

use janitorr::core::decision::Decision;
use janitorr::core::grouper::{GroupStrategy, Mode};
use janitorr::core::parser::MediaKind;
use janitorr::core::pipeline::{EngineConfig, Pipeline, PipelineResult};
use janitorr::core::quality::ScoringConfig;
use std::collections::{BTreeSet, HashSet};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const MIB: u64 = 1024 * 1024;

/// Create a (sparse) file of the given size, creating parent folders
fn create_file(root: &Path, relative: &str, size_bytes: u64) -> PathBuf {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let file = File::create(&path).unwrap();
    file.set_len(size_bytes).unwrap();
    path
}

fn run(root: &Path, config: EngineConfig) -> PipelineResult {
    Pipeline::builder()
        .paths(vec![root.to_path_buf()])
        .engine_config(config)
        .build()
        .unwrap()
        .run()
        .unwrap()
}

fn any_size() -> EngineConfig {
    EngineConfig {
        min_size_mb: 0.0,
        ..Default::default()
    }
}

fn deleted_videos(decision: &Decision) -> Vec<PathBuf> {
    decision
        .delete
        .iter()
        .map(|scored| scored.record.path.clone())
        .collect()
}

/// Comparable view of a run: group ids are random, everything else is not
fn shape(result: &PipelineResult) -> Vec<(GroupStrategy, String, PathBuf, Vec<PathBuf>)> {
    result
        .analysis
        .decisions
        .iter()
        .map(|d| {
            (
                d.strategy,
                d.label.clone(),
                d.keep.record.path.clone(),
                deleted_videos(d),
            )
        })
        .collect()
}

#[test]
fn matrix_copies_in_one_folder_form_a_folder_group() {
    let temp_dir = TempDir::new().unwrap();
    let best = create_file(
        temp_dir.path(),
        "The Matrix (1999)/The Matrix (1999) [1080p BluRay x264].mkv",
        10,
    );
    let worse = create_file(
        temp_dir.path(),
        "The Matrix (1999)/The Matrix (1999) [720p WEB-DL].mkv",
        10,
    );

    let result = run(temp_dir.path(), any_size());

    assert_eq!(result.analysis.mode, Mode::Movie);
    assert_eq!(result.analysis.decisions.len(), 1);
    let decision = &result.analysis.decisions[0];
    assert_eq!(decision.strategy, GroupStrategy::Folder);
    assert_eq!(decision.keep.record.path, best);
    assert_eq!(deleted_videos(decision), vec![worse]);
    assert!(decision.keep.score.points > decision.delete[0].score.points);
}

#[test]
fn foundation_episodes_group_by_series_season_and_episode() {
    let temp_dir = TempDir::new().unwrap();
    let best = create_file(
        temp_dir.path(),
        "Foundation/Season 2/Foundation - S02E05 - The Sighted and the Blind [1080p webdl h264].mkv",
        10,
    );
    let worse = create_file(
        temp_dir.path(),
        "Foundation/Season 2/Foundation.2021.S02E05.720p.ATVP.WEBRip.x264-GalaxyTV.mkv",
        10,
    );
    create_file(
        temp_dir.path(),
        "Foundation/Season 2/Foundation.2021.S02E06.720p.ATVP.WEBRip.x264-GalaxyTV.mkv",
        10,
    );

    let result = run(temp_dir.path(), any_size());

    assert_eq!(result.analysis.mode, Mode::Tv);
    assert_eq!(result.analysis.decisions.len(), 1);
    let decision = &result.analysis.decisions[0];
    assert_eq!(decision.strategy, GroupStrategy::Episode);
    assert_eq!(
        decision.keep.record.kind,
        MediaKind::Episode {
            series_name: "foundation".into(),
            season: 2,
            episodes: BTreeSet::from([5]),
        }
    );
    assert_eq!(decision.keep.record.path, best);
    assert_eq!(deleted_videos(decision), vec![worse]);
}

#[test]
fn inception_in_separate_folders_is_grouped_by_title() {
    let temp_dir = TempDir::new().unwrap();
    let best = create_file(
        temp_dir.path(),
        "Inception (2010)/Inception.2010.2160p.UHD.BluRay.mkv",
        10,
    );
    let worse = create_file(
        temp_dir.path(),
        "Inception 2010/Inception 2010 1080p WEBRip.mkv",
        10,
    );

    let result = run(
        temp_dir.path(),
        EngineConfig {
            fuzzy_matching: true,
            ..any_size()
        },
    );

    assert_eq!(result.analysis.decisions.len(), 1);
    let decision = &result.analysis.decisions[0];
    // Identical normalized title and year are claimed before fuzzy matching runs
    assert_eq!(decision.strategy, GroupStrategy::Title);
    assert_eq!(decision.keep.record.path, best);
    assert_eq!(deleted_videos(decision), vec![worse]);
}

#[test]
fn similar_titles_need_fuzzy_matching() {
    let temp_dir = TempDir::new().unwrap();
    create_file(
        temp_dir.path(),
        "Spider-Man Into the Spider-Verse (2018)/Spider-Man Into the Spider-Verse 1080p.mkv",
        10,
    );
    create_file(
        temp_dir.path(),
        "Spiderman Into the Spiderverse (2018)/Spiderman Into the Spiderverse 720p.mkv",
        10,
    );

    let exact = run(temp_dir.path(), any_size());
    assert!(exact.analysis.decisions.is_empty());

    let fuzzy = run(
        temp_dir.path(),
        EngineConfig {
            fuzzy_matching: true,
            ..any_size()
        },
    );
    assert_eq!(fuzzy.analysis.decisions.len(), 1);
    assert_eq!(fuzzy.analysis.decisions[0].strategy, GroupStrategy::Fuzzy);
}

#[test]
fn extras_are_excluded_unless_kept() {
    let temp_dir = TempDir::new().unwrap();
    create_file(temp_dir.path(), "Heat (1995)/Heat.1995.1080p.mkv", 10);
    create_file(temp_dir.path(), "Heat (1995)/Heat.1995.720p.mkv", 10);
    create_file(temp_dir.path(), "Heat (1995)/Extras/behind-the-scenes.mkv", 10);
    create_file(temp_dir.path(), "Heat (1995)/Extras/behind-the-scenes.720p.mkv", 10);

    let default = run(temp_dir.path(), any_size());
    assert_eq!(default.analysis.decisions.len(), 1);
    assert_eq!(default.analysis.summary.excluded.extras, 2);
    assert!(default
        .analysis
        .decisions
        .iter()
        .flat_map(|d| d.ranked())
        .all(|scored| !scored.record.is_extra));

    let kept = run(
        temp_dir.path(),
        EngineConfig {
            keep_extras: true,
            ..any_size()
        },
    );
    assert_eq!(kept.analysis.decisions.len(), 2);
    assert_eq!(kept.analysis.summary.excluded.extras, 0);
}

#[test]
fn kept_featurette_is_never_grouped_with_the_film() {
    let temp_dir = TempDir::new().unwrap();
    let film = create_file(temp_dir.path(), "Heat (1995)/Heat.1995.1080p.BluRay.mkv", 10);
    create_file(temp_dir.path(), "Heat (1995)/Extras/behind-the-scenes.mkv", 10);

    for reverse in [false, true] {
        let result = run(
            temp_dir.path(),
            EngineConfig {
                keep_extras: true,
                scoring: ScoringConfig {
                    reverse,
                    ..Default::default()
                },
                ..any_size()
            },
        );

        assert_eq!(result.analysis.candidates.len(), 2);
        assert!(result.analysis.decisions.is_empty());
    }
    assert!(film.exists());
}

#[test]
fn copies_in_a_yearless_folder_group_together() {
    let temp_dir = TempDir::new().unwrap();
    let best = create_file(temp_dir.path(), "Heat/Heat.1995.1080p.mkv", 10);
    let worse = create_file(temp_dir.path(), "Heat/Heat.720p.mkv", 10);

    let result = run(temp_dir.path(), any_size());

    assert_eq!(result.analysis.decisions.len(), 1);
    let decision = &result.analysis.decisions[0];
    assert_eq!(decision.strategy, GroupStrategy::Folder);
    assert_eq!(decision.keep.record.path, best);
    assert_eq!(deleted_videos(decision), vec![worse]);
}

#[test]
fn small_files_are_excluded_before_grouping() {
    let temp_dir = TempDir::new().unwrap();
    create_file(temp_dir.path(), "Heat (1995)/Heat.1995.1080p.mkv", 40 * MIB);
    create_file(temp_dir.path(), "Heat (1995)/Heat.1995.720p.mkv", 40 * MIB);
    create_file(temp_dir.path(), "Ronin (1998)/Ronin.1998.1080p.mkv", 150 * MIB);
    create_file(temp_dir.path(), "Ronin (1998)/Ronin.1998.720p.mkv", 150 * MIB);

    let result = run(temp_dir.path(), EngineConfig::default());

    assert_eq!(result.total_videos, 4);
    assert_eq!(result.analysis.summary.excluded.too_small, 2);
    assert_eq!(result.analysis.decisions.len(), 1);
    assert_eq!(result.analysis.decisions[0].label, "Ronin (1998)");
}

#[test]
fn repeated_runs_give_identical_decisions() {
    let temp_dir = TempDir::new().unwrap();
    create_file(temp_dir.path(), "Heat (1995)/Heat.1995.1080p.mkv", 10);
    create_file(temp_dir.path(), "Heat (1995)/Heat.1995.720p.mkv", 10);
    create_file(temp_dir.path(), "Ronin 1998/Ronin.1998.720p.mkv", 10);
    create_file(temp_dir.path(), "Ronin.1998.1080p/Ronin.1998.1080p.mkv", 10);
    create_file(temp_dir.path(), "Tenet.2020.2160p.mkv", 10);

    let config = EngineConfig {
        fuzzy_matching: true,
        ..any_size()
    };
    let first = run(temp_dir.path(), config.clone());
    let second = run(temp_dir.path(), config);

    assert_eq!(first.analysis.decisions.len(), 2);
    assert_eq!(shape(&first), shape(&second));
}

#[test]
fn no_video_belongs_to_two_groups() {
    let temp_dir = TempDir::new().unwrap();
    create_file(temp_dir.path(), "Heat (1995)/Heat.1995.1080p.mkv", 10);
    create_file(temp_dir.path(), "Heat (1995)/Heat.1995.720p.mkv", 10);
    create_file(temp_dir.path(), "Heat 1995/Heat 1995 480p.mkv", 10);
    create_file(temp_dir.path(), "Heat.1995.BluRay/Heat.1995.BluRay.mkv", 10);

    let result = run(
        temp_dir.path(),
        EngineConfig {
            fuzzy_matching: true,
            ..any_size()
        },
    );

    let strategies: Vec<GroupStrategy> =
        result.analysis.decisions.iter().map(|d| d.strategy).collect();
    assert_eq!(strategies, vec![GroupStrategy::Folder, GroupStrategy::Title]);

    let mut seen = HashSet::new();
    for scored in result.analysis.decisions.iter().flat_map(|d| d.ranked()) {
        assert!(seen.insert(scored.record.path.clone()));
    }
    assert_eq!(seen.len(), 4);
}

#[test]
fn groups_are_pure() {
    let temp_dir = TempDir::new().unwrap();
    create_file(temp_dir.path(), "Heat (1995)/Heat.1995.1080p.mkv", 10);
    create_file(temp_dir.path(), "Heat (1995)/Heat.1995.720p.mkv", 10);
    create_file(temp_dir.path(), "Heat 1995/Heat.1995.480p.mkv", 10);
    create_file(temp_dir.path(), "Heat (1986)/Heat.1986.mkv", 10);
    create_file(temp_dir.path(), "Heat 1986/Heat.1986.720p.mkv", 10);

    let result = run(temp_dir.path(), any_size());

    assert_eq!(result.analysis.decisions.len(), 2);
    for decision in &result.analysis.decisions {
        let kinds: HashSet<&MediaKind> = decision.ranked().map(|s| &s.record.kind).collect();
        assert_eq!(kinds.len(), 1, "mixed group: {}", decision.label);
    }
}

#[test]
fn sidecars_follow_their_video() {
    let temp_dir = TempDir::new().unwrap();
    let keep = create_file(temp_dir.path(), "Heat (1995)/Heat.1995.1080p.BluRay.mkv", 10);
    let keep_srt = create_file(temp_dir.path(), "Heat (1995)/Heat.1995.1080p.BluRay.srt", 1);
    let drop = create_file(temp_dir.path(), "Heat (1995)/Heat.1995.720p.mkv", 10);
    let drop_srt = create_file(temp_dir.path(), "Heat (1995)/Heat.1995.720p.en.srt", 1);
    let drop_nfo = create_file(temp_dir.path(), "Heat (1995)/Heat.1995.720p.nfo", 1);

    let result = run(temp_dir.path(), any_size());

    let decision = &result.analysis.decisions[0];
    assert_eq!(decision.keep.record.path, keep);
    let marked = decision.files_to_delete();
    assert!(marked.contains(&drop));
    assert!(marked.contains(&drop_nfo));
    assert!(!marked.contains(&keep));
    assert!(!marked.contains(&keep_srt));
    // Sidecars need the exact base name
    assert!(!marked.contains(&drop_srt));
    assert_eq!(result.analysis.summary.sidecars_to_delete, 1);
}

#[test]
fn reverse_keeps_what_would_be_deleted() {
    let temp_dir = TempDir::new().unwrap();
    create_file(temp_dir.path(), "Heat (1995)/Heat.1995.2160p.Remux.mkv", 10);
    create_file(temp_dir.path(), "Heat (1995)/Heat.1995.720p.HDTV.mkv", 10);

    let normal = run(temp_dir.path(), any_size());
    let reversed = run(
        temp_dir.path(),
        EngineConfig {
            scoring: ScoringConfig {
                reverse: true,
                ..Default::default()
            },
            ..any_size()
        },
    );

    let normal = &normal.analysis.decisions[0];
    let reversed = &reversed.analysis.decisions[0];
    assert_eq!(reversed.keep.record.path, normal.delete[0].record.path);
    assert_eq!(normal.keep.record.path, reversed.delete[0].record.path);
}

#[test]
fn tv_mode_ignores_fuzzy_matching() {
    let temp_dir = TempDir::new().unwrap();
    create_file(temp_dir.path(), "Lost/Lost.S01E01.720p.mkv", 10);
    create_file(temp_dir.path(), "Lost/Lost.S01E01.1080p.mkv", 10);
    create_file(temp_dir.path(), "Lots/Lots.S01E01.1080p.mkv", 10);

    let result = run(
        temp_dir.path(),
        EngineConfig {
            mode: Mode::Tv,
            fuzzy_matching: true,
            ..any_size()
        },
    );

    assert_eq!(result.analysis.decisions.len(), 1);
    assert_eq!(result.analysis.decisions[0].delete.len(), 1);
}

#[test]
fn missing_directory_is_reported_not_fatal() {
    let temp_dir = TempDir::new().unwrap();
    create_file(temp_dir.path(), "Heat (1995)/Heat.1995.1080p.mkv", 10);
    create_file(temp_dir.path(), "Heat (1995)/Heat.1995.720p.mkv", 10);

    let result = Pipeline::builder()
        .paths(vec![
            temp_dir.path().to_path_buf(),
            PathBuf::from("/nonexistent/path/that/does/not/exist"),
        ])
        .engine_config(any_size())
        .build()
        .unwrap()
        .run()
        .unwrap();

    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.analysis.decisions.len(), 1);
}

#[test]
fn unique_library_is_clean() {
    let temp_dir = TempDir::new().unwrap();
    create_file(temp_dir.path(), "Heat (1995)/Heat.1995.1080p.mkv", 10);
    create_file(temp_dir.path(), "Ronin (1998)/Ronin.1998.1080p.mkv", 10);

    let result = run(temp_dir.path(), any_size());

    assert!(result.analysis.decisions.is_empty());
    assert!(result.analysis.summary.is_clean());
    assert_eq!(result.analysis.summary.reclaimable_bytes, 0);
}
