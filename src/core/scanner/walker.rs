//! Directory walking implementation using walkdir.

use super::filter::{is_hidden, VideoFilter};
use super::{MediaScanner, ScanSnapshot, ScannedFile};
use crate::core::parser::collect_sidecars;
use crate::core::vocabulary::VocabularyMatcher;
use crate::error::ScanError;
use crate::events::{Event, EventSender, ScanEvent, ScanProgress};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Configuration for the directory scanner
#[derive(Debug, Clone, Default)]
pub struct ScanConfig {
    /// Whether to follow symbolic links
    pub follow_symlinks: bool,
    /// Whether to include hidden files and directories
    pub include_hidden: bool,
    /// Maximum directory depth (None = unlimited)
    pub max_depth: Option<usize>,
}

/// Scanner implementation using the walkdir crate
pub struct WalkDirScanner {
    config: ScanConfig,
    filter: VideoFilter,
    vocabulary: VocabularyMatcher,
}

/// Paths found under one root, before metadata lookup
#[derive(Default)]
struct Walked {
    videos: Vec<PathBuf>,
    others: Vec<PathBuf>,
    errors: Vec<ScanError>,
}

impl WalkDirScanner {
    pub fn new(config: ScanConfig, vocabulary: VocabularyMatcher) -> Self {
        let filter =
            VideoFilter::new(vocabulary.video_extensions()).with_hidden(config.include_hidden);
        Self {
            config,
            filter,
            vocabulary,
        }
    }

    fn walk_directory(
        &self,
        root: &Path,
        events: &EventSender,
    ) -> Result<Walked, ScanError> {
        if !root.is_dir() {
            return Err(ScanError::DirectoryNotFound {
                path: root.to_path_buf(),
            });
        }

        let mut walked = Walked::default();
        let mut directories_scanned = 0;

        let mut walker = WalkDir::new(root).follow_links(self.config.follow_symlinks);
        if let Some(depth) = self.config.max_depth {
            walker = walker.max_depth(depth);
        }

        let include_hidden = self.config.include_hidden;
        let entries = walker
            .into_iter()
            .filter_entry(|entry| include_hidden || entry.depth() == 0 || !is_hidden(entry.path()));

        for entry_result in entries {
            match entry_result {
                Ok(entry) => {
                    let path = entry.path();

                    if entry.file_type().is_dir() {
                        directories_scanned += 1;
                        events.send(Event::Scan(ScanEvent::Progress(ScanProgress {
                            directories_scanned,
                            videos_found: walked.videos.len(),
                            current_path: path.to_path_buf(),
                        })));
                        continue;
                    }

                    if !entry.file_type().is_file() {
                        continue;
                    }

                    if self.filter.should_include(path) {
                        events.send(Event::Scan(ScanEvent::VideoFound {
                            path: path.to_path_buf(),
                        }));
                        walked.videos.push(path.to_path_buf());
                    } else {
                        walked.others.push(path.to_path_buf());
                    }
                }
                Err(e) => {
                    let path = e.path().map(|p| p.to_path_buf()).unwrap_or_default();

                    let error = if e.io_error().map(|e| e.kind())
                        == Some(std::io::ErrorKind::PermissionDenied)
                    {
                        ScanError::PermissionDenied { path: path.clone() }
                    } else {
                        ScanError::ReadDirectory {
                            path: path.clone(),
                            source: std::io::Error::other(e.to_string()),
                        }
                    };

                    events.send(Event::Scan(ScanEvent::Error {
                        path,
                        message: error.to_string(),
                    }));
                    walked.errors.push(error);
                }
            }
        }

        debug!(
            "Walked {}: {} directories, {} videos",
            root.display(),
            directories_scanned,
            walked.videos.len()
        );

        Ok(walked)
    }
}

impl MediaScanner for WalkDirScanner {
    fn scan(&self, paths: &[PathBuf]) -> Result<ScanSnapshot, ScanError> {
        self.scan_with_events(paths, &crate::events::null_sender())
    }

    fn scan_with_events(
        &self,
        paths: &[PathBuf],
        events: &EventSender,
    ) -> Result<ScanSnapshot, ScanError> {
        events.send(Event::Scan(ScanEvent::Started {
            paths: paths.to_vec(),
        }));

        let mut walked = Walked::default();
        for root in paths {
            match self.walk_directory(root, events) {
                Ok(found) => {
                    walked.videos.extend(found.videos);
                    walked.others.extend(found.others);
                    walked.errors.extend(found.errors);
                }
                Err(e) => walked.errors.push(e),
            }
        }

        let sidecars = collect_sidecars(&walked.videos, &walked.others, &self.vocabulary);

        // Sizes are looked up in parallel; a file that vanished since the walk
        // is reported and left out
        let sized: Vec<Result<ScannedFile, ScanError>> = walked
            .videos
            .par_iter()
            .map(|path| {
                let metadata = fs::metadata(path).map_err(|source| ScanError::ReadDirectory {
                    path: path.clone(),
                    source,
                })?;
                let file_sidecars = sidecars
                    .get(path)
                    .map(|set| set.iter().cloned().collect())
                    .unwrap_or_default();
                Ok(ScannedFile::new(path.clone(), metadata.len()).with_sidecars(file_sidecars))
            })
            .collect();

        let mut files = Vec::with_capacity(sized.len());
        for result in sized {
            match result {
                Ok(file) => files.push(file),
                Err(error) => {
                    if let ScanError::ReadDirectory { path, .. } = &error {
                        events.send(Event::Scan(ScanEvent::Error {
                            path: path.clone(),
                            message: error.to_string(),
                        }));
                    }
                    walked.errors.push(error);
                }
            }
        }
        files.sort_by(|a, b| a.path.cmp(&b.path));
        files.dedup_by(|a, b| a.path == b.path);

        info!(
            "Scan found {} videos ({} errors)",
            files.len(),
            walked.errors.len()
        );

        events.send(Event::Scan(ScanEvent::Completed {
            total_videos: files.len(),
        }));

        Ok(ScanSnapshot {
            roots: paths.to_vec(),
            files,
            errors: walked.errors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vocabulary::Vocabulary;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn scanner(config: ScanConfig) -> WalkDirScanner {
        WalkDirScanner::new(config, Vocabulary::default().compile().unwrap())
    }

    fn create_file(dir: &Path, name: &str, bytes: usize) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        let mut file = File::create(&path).unwrap();
        file.write_all(&vec![0u8; bytes]).unwrap();
        path
    }

    #[test]
    fn scan_empty_directory_returns_empty_snapshot() {
        let temp_dir = TempDir::new().unwrap();

        let snapshot = scanner(ScanConfig::default())
            .scan(&[temp_dir.path().to_path_buf()])
            .unwrap();

        assert!(snapshot.files.is_empty());
        assert!(snapshot.errors.is_empty());
    }

    #[test]
    fn scan_records_sizes_of_videos_only() {
        let temp_dir = TempDir::new().unwrap();
        create_file(temp_dir.path(), "Heat (1995)/Heat.1995.1080p.mkv", 64);
        create_file(temp_dir.path(), "Heat (1995)/notes.pdf", 8);

        let snapshot = scanner(ScanConfig::default())
            .scan(&[temp_dir.path().to_path_buf()])
            .unwrap();

        assert_eq!(snapshot.files.len(), 1);
        assert_eq!(snapshot.files[0].size_bytes, 64);
        assert!(snapshot.files[0].path.ends_with("Heat.1995.1080p.mkv"));
    }

    #[test]
    fn scan_attaches_sidecars() {
        let temp_dir = TempDir::new().unwrap();
        create_file(temp_dir.path(), "Heat/Heat.mkv", 10);
        create_file(temp_dir.path(), "Heat/Heat.srt", 1);
        create_file(temp_dir.path(), "Heat/Heat.nfo", 1);

        let snapshot = scanner(ScanConfig::default())
            .scan(&[temp_dir.path().to_path_buf()])
            .unwrap();

        assert_eq!(snapshot.files.len(), 1);
        assert_eq!(snapshot.files[0].sidecars.len(), 2);
    }

    #[test]
    fn scan_skips_hidden_directories_by_default() {
        let temp_dir = TempDir::new().unwrap();
        create_file(temp_dir.path(), "visible.mkv", 1);
        create_file(temp_dir.path(), ".trash/old.mkv", 1);
        create_file(temp_dir.path(), ".hidden.mkv", 1);

        let snapshot = scanner(ScanConfig::default())
            .scan(&[temp_dir.path().to_path_buf()])
            .unwrap();
        assert_eq!(snapshot.files.len(), 1);

        let snapshot = scanner(ScanConfig {
            include_hidden: true,
            ..Default::default()
        })
        .scan(&[temp_dir.path().to_path_buf()])
        .unwrap();
        assert_eq!(snapshot.files.len(), 3);
    }

    #[test]
    fn scan_results_are_sorted() {
        let temp_dir = TempDir::new().unwrap();
        create_file(temp_dir.path(), "b.mkv", 1);
        create_file(temp_dir.path(), "a.mkv", 1);
        create_file(temp_dir.path(), "c/a.mkv", 1);

        let snapshot = scanner(ScanConfig::default())
            .scan(&[temp_dir.path().to_path_buf()])
            .unwrap();

        let paths: Vec<_> = snapshot.files.iter().map(|f| f.path.clone()).collect();
        let mut sorted = paths.clone();
        sorted.sort();
        assert_eq!(paths, sorted);
    }

    #[test]
    fn scan_nonexistent_directory_records_error() {
        let snapshot = scanner(ScanConfig::default())
            .scan(&[PathBuf::from("/nonexistent/path/12345")])
            .unwrap();

        assert!(matches!(
            snapshot.errors[0],
            ScanError::DirectoryNotFound { .. }
        ));
    }

    #[test]
    fn scan_emits_started_and_completed() {
        let temp_dir = TempDir::new().unwrap();
        create_file(temp_dir.path(), "a.mkv", 1);
        let (sender, receiver) = crate::events::EventChannel::new();

        scanner(ScanConfig::default())
            .scan_with_events(&[temp_dir.path().to_path_buf()], &sender)
            .unwrap();

        let events = receiver.drain();
        assert!(matches!(events.first(), Some(Event::Scan(ScanEvent::Started { .. }))));
        assert!(matches!(
            events.last(),
            Some(Event::Scan(ScanEvent::Completed { total_videos: 1 }))
        ));
    }
}
