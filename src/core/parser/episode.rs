//! Season/episode marker detection (`S01E01`, `S01E01E02`, `S01E01-E02`).

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

static MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|[^\p{L}\p{N}])(s(\d{1,2})e(\d{1,3})(?:-?e\d{1,3})*)").unwrap()
});

static EPISODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)e(\d{1,3})").unwrap());

static SEASON_FOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:season|series|staffel|saison)?[\s._-]*s?\d{1,2}$|^specials?$").unwrap()
});

/// A parsed season/episode marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeMarker {
    pub season: u32,
    pub episodes: BTreeSet<u32>,
    /// Byte offset where the marker starts in the searched text
    pub start: usize,
}

/// Find the first season/episode marker in a name
pub fn find_marker(text: &str) -> Option<EpisodeMarker> {
    let caps = MARKER.captures(text)?;
    let marker = caps.get(1)?;
    let season = caps.get(2)?.as_str().parse().ok()?;

    // Skip the "sNN" prefix before collecting episode numbers
    let season_len = 1 + caps.get(2)?.as_str().len();
    let episodes: BTreeSet<u32> = EPISODE
        .captures_iter(&marker.as_str()[season_len..])
        .filter_map(|c| c.get(1)?.as_str().parse().ok())
        .collect();

    if episodes.is_empty() {
        return None;
    }

    Some(EpisodeMarker {
        season,
        episodes,
        start: marker.start(),
    })
}

/// Check whether a folder name only names a season (`Season 2`, `S02`, `Specials`)
pub fn is_season_folder(name: &str) -> bool {
    SEASON_FOLDER.is_match(name.trim())
}

/// Format a marker as `S02E05` or `S01E01E02`
pub fn format_marker(season: u32, episodes: &BTreeSet<u32>) -> String {
    let mut id = format!("S{:02}", season);
    for episode in episodes {
        id.push_str(&format!("E{:02}", episode));
    }
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_single_episode() {
        let marker = find_marker("Foundation.2021.S02E05.720p").unwrap();
        assert_eq!(marker.season, 2);
        assert_eq!(marker.episodes, BTreeSet::from([5]));
        assert_eq!(&"Foundation.2021.S02E05.720p"[..marker.start], "Foundation.2021.");
    }

    #[test]
    fn finds_multi_episode_forms() {
        let joined = find_marker("Show S01E01E02 1080p").unwrap();
        assert_eq!(joined.episodes, BTreeSet::from([1, 2]));

        let dashed = find_marker("Show.s01e01-e02.mkv").unwrap();
        assert_eq!(dashed.episodes, BTreeSet::from([1, 2]));
    }

    #[test]
    fn marker_is_case_insensitive() {
        let marker = find_marker("show - s03e10").unwrap();
        assert_eq!(marker.season, 3);
        assert_eq!(marker.episodes, BTreeSet::from([10]));
    }

    #[test]
    fn marker_needs_leading_boundary() {
        assert!(find_marker("Glass01E02").is_none());
        assert!(find_marker("The Matrix (1999)").is_none());
    }

    #[test]
    fn marker_at_start_of_name() {
        let marker = find_marker("S01E03.mkv").unwrap();
        assert_eq!(marker.start, 0);
    }

    #[test]
    fn season_folders_are_recognized() {
        assert!(is_season_folder("Season 2"));
        assert!(is_season_folder("season.02"));
        assert!(is_season_folder("S02"));
        assert!(is_season_folder("Specials"));
        assert!(!is_season_folder("Foundation"));
        assert!(!is_season_folder("Seasons of Love"));
    }

    #[test]
    fn format_marker_pads_numbers() {
        assert_eq!(format_marker(2, &BTreeSet::from([5])), "S02E05");
        assert_eq!(format_marker(1, &BTreeSet::from([1, 2])), "S01E01E02");
    }
}
