//! Sidecar discovery: subtitles, metadata and artwork that share a video's
//! base name and directory.

use crate::core::vocabulary::VocabularyMatcher;
use std::collections::{BTreeSet, HashMap};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Find the sidecars of every video among a set of sibling files.
///
/// Returns a map from video path to its sidecars. Videos without sidecars
/// are absent from the map.
pub fn collect_sidecars(
    videos: &[PathBuf],
    others: &[PathBuf],
    vocabulary: &VocabularyMatcher,
) -> HashMap<PathBuf, BTreeSet<PathBuf>> {
    let mut by_base: HashMap<(PathBuf, OsString), Vec<&PathBuf>> = HashMap::new();
    for other in others {
        let is_sidecar = other
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| vocabulary.is_sidecar_extension(e))
            .unwrap_or(false);
        if !is_sidecar {
            continue;
        }
        if let Some(key) = base_key(other) {
            by_base.entry(key).or_default().push(other);
        }
    }

    let mut result = HashMap::new();
    for video in videos {
        let Some(key) = base_key(video) else {
            continue;
        };
        if let Some(sidecars) = by_base.get(&key) {
            let set: BTreeSet<PathBuf> = sidecars
                .iter()
                .filter(|s| **s != video)
                .map(|s| (*s).clone())
                .collect();
            if !set.is_empty() {
                result.insert(video.clone(), set);
            }
        }
    }
    result
}

fn base_key(path: &Path) -> Option<(PathBuf, OsString)> {
    let parent = path.parent()?.to_path_buf();
    let stem = path.file_stem()?.to_os_string();
    Some((parent, stem))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vocabulary::Vocabulary;

    fn vocab() -> VocabularyMatcher {
        Vocabulary::default().compile().unwrap()
    }

    #[test]
    fn matches_same_stem_in_same_directory() {
        let video = PathBuf::from("/m/Heat (1995)/Heat.1995.1080p.mkv");
        let others = vec![
            PathBuf::from("/m/Heat (1995)/Heat.1995.1080p.srt"),
            PathBuf::from("/m/Heat (1995)/Heat.1995.1080p.nfo"),
            PathBuf::from("/m/Heat (1995)/Heat.1995.720p.srt"),
            PathBuf::from("/m/Other/Heat.1995.1080p.srt"),
        ];

        let sidecars = collect_sidecars(&[video.clone()], &others, &vocab());

        let found = &sidecars[&video];
        assert_eq!(found.len(), 2);
        assert!(found.contains(&PathBuf::from("/m/Heat (1995)/Heat.1995.1080p.srt")));
        assert!(found.contains(&PathBuf::from("/m/Heat (1995)/Heat.1995.1080p.nfo")));
    }

    #[test]
    fn ignores_unrecognized_extensions() {
        let video = PathBuf::from("/m/Heat.mkv");
        let others = vec![PathBuf::from("/m/Heat.part"), PathBuf::from("/m/Heat.mp4")];

        let sidecars = collect_sidecars(&[video], &others, &vocab());

        assert!(sidecars.is_empty());
    }

    #[test]
    fn videos_without_sidecars_are_absent() {
        let a = PathBuf::from("/m/A.mkv");
        let b = PathBuf::from("/m/B.mkv");
        let others = vec![PathBuf::from("/m/A.srt")];

        let sidecars = collect_sidecars(&[a.clone(), b.clone()], &others, &vocab());

        assert!(sidecars.contains_key(&a));
        assert!(!sidecars.contains_key(&b));
    }
}
