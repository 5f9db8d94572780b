//! # Parser Module
//!
//! Turns a scanned path into a [`MediaRecord`]: movie or episode, title and
//! year or series/season/episodes, quality attributes, extras flag and
//! sidecars.
//!
//! Parsing never fails. Anything the vocabulary does not recognize is left
//! at its unknown/absent value and the record still takes part in grouping.
//!
//! ## Title sources
//! Folder names are usually cleaner than file names, so a movie inside a
//! folder whose name carries a year (`The Matrix (1999)/`) takes its title
//! from the folder. Files lying loose in a scan root, or inside an extras
//! folder, use their own name.

mod episode;
mod sidecar;
mod title;

pub use episode::{find_marker, format_marker, is_season_folder, EpisodeMarker};
pub use sidecar::collect_sidecars;
pub use title::{movie_title_year, normalize_title, strip_years, TitleYear};

use crate::core::quality::Quality;
use crate::core::scanner::ScannedFile;
use crate::core::vocabulary::VocabularyMatcher;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// What a media file contains
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MediaKind {
    Movie {
        /// Normalized title
        title: String,
        year: Option<u16>,
    },
    Episode {
        /// Normalized series name
        series_name: String,
        season: u32,
        episodes: BTreeSet<u32>,
    },
}

impl MediaKind {
    pub fn is_episode(&self) -> bool {
        matches!(self, MediaKind::Episode { .. })
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::Movie {
                title,
                year: Some(year),
            } => write!(f, "{} ({})", title, year),
            MediaKind::Movie { title, year: None } => write!(f, "{}", title),
            MediaKind::Episode {
                series_name,
                season,
                episodes,
            } => write!(f, "{} {}", series_name, format_marker(*season, episodes)),
        }
    }
}

/// One discovered video file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaRecord {
    /// Location of the file, its identity
    pub path: PathBuf,
    /// Size at scan time
    pub size_bytes: u64,
    pub kind: MediaKind,
    pub quality: Quality,
    /// Lives under an extras/bonus folder
    pub is_extra: bool,
    /// Files that share this video's fate
    pub sidecars: BTreeSet<PathBuf>,
}

impl MediaRecord {
    /// Directory holding the file
    pub fn parent_dir(&self) -> Option<&Path> {
        self.path.parent()
    }

    /// File name for display
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// The video followed by its sidecars
    pub fn all_paths(&self) -> Vec<PathBuf> {
        std::iter::once(self.path.clone())
            .chain(self.sidecars.iter().cloned())
            .collect()
    }
}

/// Parses scanned files into media records
#[derive(Debug, Clone)]
pub struct MediaParser {
    vocabulary: VocabularyMatcher,
    roots: Vec<PathBuf>,
}

impl MediaParser {
    /// Create a parser with no known scan roots
    pub fn new(vocabulary: VocabularyMatcher) -> Self {
        Self {
            vocabulary,
            roots: Vec::new(),
        }
    }

    /// Directories that were scanned. Files directly inside one are "loose".
    pub fn with_roots(mut self, roots: Vec<PathBuf>) -> Self {
        self.roots = roots;
        self
    }

    pub fn vocabulary(&self) -> &VocabularyMatcher {
        &self.vocabulary
    }

    /// Parse a scanned file
    pub fn parse(&self, file: &ScannedFile) -> MediaRecord {
        let mut record = self.parse_path(&file.path, file.size_bytes);
        record.sidecars = file.sidecars.iter().cloned().collect();
        record
    }

    /// Parse a bare path and size
    pub fn parse_path(&self, path: &Path, size_bytes: u64) -> MediaRecord {
        let relative = self.relative_to_root(path);
        let quality = self.vocabulary.quality(&relative.to_string_lossy());
        let is_extra = self.is_extra(path);

        let kind = self
            .parse_episode(path)
            .unwrap_or_else(|| self.parse_movie(path));

        debug!(
            "Parsed {}: {} [{}]{}",
            path.display(),
            kind,
            quality.label(),
            if is_extra { " (extra)" } else { "" }
        );

        MediaRecord {
            path: path.to_path_buf(),
            size_bytes,
            kind,
            quality,
            is_extra,
            sidecars: BTreeSet::new(),
        }
    }

    fn parse_episode(&self, path: &Path) -> Option<MediaKind> {
        let stem = file_stem(path);
        let folder = self.title_folder(path);

        let (marker, prefix) = match find_marker(&stem) {
            Some(marker) => {
                let prefix = stem[..marker.start].to_string();
                (marker, prefix)
            }
            None => {
                let folder = folder.as_deref()?;
                let marker = find_marker(folder)?;
                let prefix = folder[..marker.start].to_string();
                (marker, prefix)
            }
        };

        let mut series_name = self.series_name(&prefix);

        // A release folder carrying the same marker usually has the cleaner name
        if let Some(folder) = folder.as_deref() {
            if let Some(folder_marker) = find_marker(folder) {
                if folder_marker.season == marker.season
                    && folder_marker.episodes == marker.episodes
                {
                    let from_folder = self.series_name(&folder[..folder_marker.start]);
                    if !from_folder.is_empty() {
                        series_name = from_folder;
                    }
                }
            }
        }

        if series_name.is_empty() {
            series_name = self.series_from_ancestors(path);
        }

        Some(MediaKind::Episode {
            series_name,
            season: marker.season,
            episodes: marker.episodes,
        })
    }

    fn parse_movie(&self, path: &Path) -> MediaKind {
        let from_file = movie_title_year(&file_stem(path), &self.vocabulary);

        let from_folder = self
            .title_folder(path)
            .map(|folder| movie_title_year(&folder, &self.vocabulary));

        let chosen = match from_folder {
            Some(folder) if folder.year.is_some() && !folder.title.is_empty() => folder,
            Some(folder) if from_file.title.is_empty() && !folder.title.is_empty() => folder,
            _ => from_file,
        };

        MediaKind::Movie {
            title: chosen.title,
            year: chosen.year,
        }
    }

    fn series_name(&self, raw: &str) -> String {
        strip_years(&normalize_title(raw, &self.vocabulary))
    }

    /// Nearest ancestor below the scan root that is neither a season nor an
    /// extras folder, used when the file name has nothing before its marker
    fn series_from_ancestors(&self, path: &Path) -> String {
        for dir in path.ancestors().skip(1) {
            if self.is_root(dir) {
                break;
            }
            let Some(name) = dir.file_name().map(|n| n.to_string_lossy().into_owned()) else {
                break;
            };
            if is_season_folder(&name) || self.vocabulary.is_extras_folder(&name) {
                continue;
            }
            let prefix = match find_marker(&name) {
                Some(marker) => name[..marker.start].to_string(),
                None => name,
            };
            let series = self.series_name(&prefix);
            if !series.is_empty() {
                return series;
            }
        }
        String::new()
    }

    /// Name of the folder a title may be read from: the file's own folder.
    /// None for loose files and for files inside an extras folder, whose
    /// folder says nothing about what the file is.
    fn title_folder(&self, path: &Path) -> Option<String> {
        let dir = path.parent()?;
        if self.is_root(dir) {
            return None;
        }
        let name = dir.file_name()?.to_string_lossy().into_owned();
        (!self.vocabulary.is_extras_folder(&name)).then_some(name)
    }

    fn is_extra(&self, path: &Path) -> bool {
        let relative = self.relative_to_root(path);
        let Some(dirs) = relative.parent() else {
            return false;
        };
        dirs.components().any(|component| match component {
            Component::Normal(name) => self.vocabulary.is_extras_folder(&name.to_string_lossy()),
            _ => false,
        })
    }

    fn is_root(&self, dir: &Path) -> bool {
        dir.as_os_str().is_empty() || self.roots.iter().any(|root| root == dir)
    }

    fn relative_to_root<'a>(&self, path: &'a Path) -> &'a Path {
        self.roots
            .iter()
            .filter_map(|root| path.strip_prefix(root).ok())
            .min_by_key(|relative| relative.components().count())
            .unwrap_or(path)
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
