//! Compiled, boundary-aware token matching.
//!
//! A token only matches when it is not glued to other letters or digits, so
//! `web` matches `Movie.WEB.x264` but not `webrip`, and `ts` never matches
//! inside `shorts`. Dots and underscores in both tokens and haystacks are
//! treated as spaces, so `directors cut` also matches `Directors.Cut`.

use super::Vocabulary;
use crate::core::quality::{Audio, Quality, Resolution, Source, VideoCodec};
use crate::error::VocabularyError;
use regex::Regex;
use std::collections::HashSet;

/// Matches any token of a list at word boundaries
#[derive(Debug, Clone)]
pub struct TokenMatcher {
    regex: Option<Regex>,
}

impl TokenMatcher {
    pub fn new(tokens: &[String]) -> Result<Self, VocabularyError> {
        let mut alternatives: Vec<String> = tokens
            .iter()
            .map(|t| normalize_separators(&t.trim().to_lowercase()))
            .filter(|t| !t.is_empty())
            .map(|t| regex::escape(&t))
            .collect();

        if alternatives.is_empty() {
            return Ok(Self { regex: None });
        }

        // Longest first so alternation prefers the most specific token
        alternatives.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        alternatives.dedup();

        let pattern = format!(
            r"(?i)(?:^|[^\p{{L}}\p{{N}}])(?:{})(?:[^\p{{L}}\p{{N}}]|$)",
            alternatives.join("|")
        );

        let regex = Regex::new(&pattern).map_err(|e| VocabularyError::InvalidToken {
            token: tokens.join(", "),
            reason: e.to_string(),
        })?;

        Ok(Self { regex: Some(regex) })
    }

    /// Check whether any token occurs in the text
    pub fn is_match(&self, text: &str) -> bool {
        match &self.regex {
            Some(regex) => regex.is_match(&normalize_separators(text)),
            None => false,
        }
    }

    /// Byte offset of the first token occurrence, including its leading boundary
    pub fn first_offset(&self, text: &str) -> Option<usize> {
        self.regex
            .as_ref()
            .and_then(|regex| regex.find(&normalize_separators(text)).map(|m| m.start()))
    }

    /// Replace every token occurrence with a space
    pub fn strip(&self, text: &str) -> String {
        let Some(regex) = &self.regex else {
            return text.to_string();
        };

        // Matches consume their boundaries, so adjacent tokens need another pass
        let mut current = normalize_separators(text);
        loop {
            let next = regex.replace_all(&current, " ").into_owned();
            if next == current {
                return current;
            }
            current = next;
        }
    }
}

/// Picks the highest-ranked value whose tokens occur in the text
#[derive(Debug, Clone)]
pub struct RankedMatcher<T> {
    ranked: Vec<(T, TokenMatcher)>,
}

impl<T: Copy + Ord + Default> RankedMatcher<T> {
    pub fn new(sets: &[super::TokenSet<T>]) -> Result<Self, VocabularyError> {
        let mut ranked = sets
            .iter()
            .map(|set| Ok((set.value, TokenMatcher::new(&set.tokens)?)))
            .collect::<Result<Vec<_>, VocabularyError>>()?;
        ranked.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(Self { ranked })
    }

    /// Best value found, or the default (unknown) variant
    pub fn best(&self, text: &str) -> T {
        self.ranked
            .iter()
            .find(|(_, matcher)| matcher.is_match(text))
            .map(|(value, _)| *value)
            .unwrap_or_default()
    }
}

/// A compiled [`Vocabulary`]
#[derive(Debug, Clone)]
pub struct VocabularyMatcher {
    resolution: RankedMatcher<Resolution>,
    source: RankedMatcher<Source>,
    video_codec: RankedMatcher<VideoCodec>,
    audio: RankedMatcher<Audio>,
    hdr: TokenMatcher,
    dolby_vision: TokenMatcher,
    imax: TokenMatcher,
    directors_cut: TokenMatcher,
    extras_folders: HashSet<String>,
    quality_tokens: TokenMatcher,
    sidecar_extensions: HashSet<String>,
    video_extensions: HashSet<String>,
}

impl VocabularyMatcher {
    pub fn new(vocabulary: &Vocabulary) -> Result<Self, VocabularyError> {
        let mut title_noise = vocabulary.quality_tokens();
        // A lone "director" may be the title itself; only whole phrases are noise
        title_noise.extend(
            vocabulary
                .directors_cut
                .iter()
                .filter(|token| normalize_separators(token.trim()).contains(char::is_whitespace))
                .cloned(),
        );

        Ok(Self {
            resolution: RankedMatcher::new(&vocabulary.resolution)?,
            source: RankedMatcher::new(&vocabulary.source)?,
            video_codec: RankedMatcher::new(&vocabulary.video_codec)?,
            audio: RankedMatcher::new(&vocabulary.audio)?,
            hdr: TokenMatcher::new(&vocabulary.hdr)?,
            dolby_vision: TokenMatcher::new(&vocabulary.dolby_vision)?,
            imax: TokenMatcher::new(&vocabulary.imax)?,
            directors_cut: TokenMatcher::new(&vocabulary.directors_cut)?,
            extras_folders: vocabulary
                .extras_folders
                .iter()
                .map(|f| folder_key(f))
                .filter(|f| !f.is_empty())
                .collect(),
            quality_tokens: TokenMatcher::new(&title_noise)?,
            sidecar_extensions: extension_set(&vocabulary.sidecar_extensions),
            video_extensions: extension_set(&vocabulary.video_extensions),
        })
    }

    /// Read every quality dimension out of a path string
    pub fn quality(&self, text: &str) -> Quality {
        let dolby_vision = self.dolby_vision.is_match(text);
        Quality {
            resolution: self.resolution.best(text),
            source: self.source.best(text),
            video_codec: self.video_codec.best(text),
            audio: self.audio.best(text),
            // Dolby Vision is an HDR format
            hdr: dolby_vision || self.hdr.is_match(text),
            dolby_vision,
            imax: self.imax.is_match(text),
            directors_cut: self.directors_cut.is_match(text),
        }
    }

    /// Check whether a whole folder name marks bonus material
    pub fn is_extras_folder(&self, folder: &str) -> bool {
        self.extras_folders.contains(&folder_key(folder))
    }

    /// Quality tokens, used to keep them out of titles
    pub fn quality_tokens(&self) -> &TokenMatcher {
        &self.quality_tokens
    }

    pub fn is_sidecar_extension(&self, ext: &str) -> bool {
        self.sidecar_extensions.contains(&ext.to_lowercase())
    }

    pub fn is_video_extension(&self, ext: &str) -> bool {
        self.video_extensions.contains(&ext.to_lowercase())
    }

    pub fn video_extensions(&self) -> Vec<String> {
        let mut extensions: Vec<_> = self.video_extensions.iter().cloned().collect();
        extensions.sort();
        extensions
    }
}

fn extension_set(extensions: &[String]) -> HashSet<String> {
    extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

/// Lowercased folder name with `-`, `.` and `_` read as spaces
fn folder_key(name: &str) -> String {
    name.to_lowercase()
        .replace(['-', '.', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Dots and underscores act as word separators in release names
fn normalize_separators(text: &str) -> String {
    text.replace(['.', '_'], " ")
}
