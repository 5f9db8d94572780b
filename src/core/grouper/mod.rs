//! # Grouper Module
//!
//! Clusters media records into duplicate groups.
//!
//! ## Movies
//! An ordered list of strategies runs over the records; the first strategy
//! that claims a record owns it:
//! 1. **Folder**: records sharing an immediate parent folder
//! 2. **Title**: identical normalized title and year across folders
//! 3. **Fuzzy** (opt-in): similar titles, see [`TitleSimilarity`]
//!
//! ## TV
//! Episodes group on `(series, season, episodes)` with no fuzzy variant.
//!
//! Groups with a single member are discarded.

mod movie;
mod traits;
mod tv;

pub use movie::{
    FolderStrategy, FuzzyStrategy, GroupingStrategy, MovieGrouper, TitleStrategy,
};
pub use traits::{DiceSimilarity, FuzzyThreshold, LevenshteinSimilarity, TitleSimilarity};
pub use tv::TvGrouper;

use crate::core::parser::MediaRecord;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// Which kind of library is being cleaned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Movie,
    Tv,
    /// Decide from the scanned files
    #[default]
    Auto,
}

impl Mode {
    /// Resolve `Auto` against a set of records; explicit modes pass through
    pub fn resolve(self, records: &[MediaRecord]) -> Mode {
        match self {
            Mode::Auto => detect_mode(records),
            explicit => explicit,
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Movie => write!(f, "movie"),
            Mode::Tv => write!(f, "tv"),
            Mode::Auto => write!(f, "auto"),
        }
    }
}

/// Pick tv when a strict majority of records carry an episode marker
pub fn detect_mode(records: &[MediaRecord]) -> Mode {
    let episodes = records.iter().filter(|r| r.kind.is_episode()).count();
    if episodes * 2 > records.len() {
        Mode::Tv
    } else {
        Mode::Movie
    }
}

/// The rule that formed a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupStrategy {
    Folder,
    Title,
    Fuzzy,
    Episode,
}

impl std::fmt::Display for GroupStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupStrategy::Folder => write!(f, "folder"),
            GroupStrategy::Title => write!(f, "title"),
            GroupStrategy::Fuzzy => write!(f, "fuzzy"),
            GroupStrategy::Episode => write!(f, "episode"),
        }
    }
}

/// Records believed to hold the same content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateGroup {
    /// Unique identifier for this group
    pub id: Uuid,
    pub strategy: GroupStrategy,
    /// Human-readable name: folder, title or episode
    pub label: String,
    /// Members sorted by path
    pub members: Vec<MediaRecord>,
}

impl DuplicateGroup {
    pub fn new(strategy: GroupStrategy, label: String, mut members: Vec<MediaRecord>) -> Self {
        members.sort_by(|a, b| a.path.cmp(&b.path));
        Self {
            id: Uuid::new_v4(),
            strategy,
            label,
            members,
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn total_bytes(&self) -> u64 {
        self.members.iter().map(|m| m.size_bytes).sum()
    }
}

/// Options shared by the movie and TV groupers
#[derive(Debug, Clone, Default)]
pub struct GroupingOptions {
    /// Scan roots; files directly inside one are never folder-grouped
    pub roots: Vec<PathBuf>,
    /// Fuzzy threshold, or None to leave fuzzy matching off
    pub fuzzy: Option<FuzzyThreshold>,
}

/// Dispatches to the movie or TV grouper for a resolved mode
pub struct Grouper {
    movie: MovieGrouper,
    tv: TvGrouper,
}

impl Grouper {
    pub fn new(options: GroupingOptions) -> Self {
        let mut movie = MovieGrouper::new(options.roots);
        if let Some(threshold) = options.fuzzy {
            movie = movie.with_fuzzy(Box::new(DiceSimilarity), threshold);
        }
        Self {
            movie,
            tv: TvGrouper,
        }
    }

    /// Group records of the kind the mode selects. `Auto` is resolved first.
    pub fn group(&self, records: &[MediaRecord], mode: Mode) -> Vec<DuplicateGroup> {
        match mode.resolve(records) {
            Mode::Tv => self.tv.group(records),
            _ => self.movie.group(records),
        }
    }
}
