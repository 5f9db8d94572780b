//! # Vocabulary Module
//!
//! Token vocabularies used to read quality, extras folders and sidecar files
//! out of paths. They are plain data: the built-in defaults can be replaced
//! from a JSON file without touching the parser.
//!
//! ## Example override
//! ```json
//! {
//!   "extras_folders": ["extras", "bonus", "making of"],
//!   "sidecar_extensions": ["srt", "nfo"]
//! }
//! ```
//! Fields missing from the file keep their defaults.

mod matcher;

pub use matcher::{RankedMatcher, TokenMatcher, VocabularyMatcher};

use crate::core::quality::{Audio, Resolution, Source, VideoCodec};
use crate::error::VocabularyError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A set of tokens that all map to one value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenSet<T> {
    pub value: T,
    pub tokens: Vec<String>,
}

impl<T> TokenSet<T> {
    fn new(value: T, tokens: &[&str]) -> Self {
        Self {
            value,
            tokens: strings(tokens),
        }
    }
}

/// All token vocabularies consulted by the parser
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vocabulary {
    pub resolution: Vec<TokenSet<Resolution>>,
    pub source: Vec<TokenSet<Source>>,
    pub video_codec: Vec<TokenSet<VideoCodec>>,
    pub audio: Vec<TokenSet<Audio>>,
    pub hdr: Vec<String>,
    pub dolby_vision: Vec<String>,
    pub imax: Vec<String>,
    pub directors_cut: Vec<String>,
    /// Folder names holding bonus material
    pub extras_folders: Vec<String>,
    /// Extensions of files that travel with a video (no leading dot)
    pub sidecar_extensions: Vec<String>,
    /// Extensions treated as video files (no leading dot)
    pub video_extensions: Vec<String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            resolution: vec![
                TokenSet::new(Resolution::Uhd2160, &["2160p", "4k", "uhd"]),
                TokenSet::new(Resolution::Qhd1440, &["1440p", "2k"]),
                TokenSet::new(Resolution::Hd1080, &["1080p", "1080i", "fhd"]),
                TokenSet::new(Resolution::Hd720, &["720p"]),
                TokenSet::new(Resolution::Sd480, &["480p", "576p"]),
            ],
            source: vec![
                TokenSet::new(Source::Remux, &["remux", "bdremux"]),
                TokenSet::new(Source::BluRay, &["bluray", "blu-ray", "bdrip", "brrip"]),
                TokenSet::new(Source::WebDl, &["web-dl", "webdl", "web"]),
                TokenSet::new(Source::WebRip, &["webrip", "web-rip"]),
                TokenSet::new(Source::Hdtv, &["hdtv", "pdtv"]),
            ],
            video_codec: vec![
                TokenSet::new(VideoCodec::Av1, &["av1"]),
                TokenSet::new(VideoCodec::X265, &["x265", "h265", "h.265", "hevc"]),
                TokenSet::new(VideoCodec::X264, &["x264", "h264", "h.264", "avc"]),
            ],
            audio: vec![
                TokenSet::new(
                    Audio::Lossless,
                    &["atmos", "truehd", "dts-hd", "dts-x", "dtshd", "dts-ma"],
                ),
                TokenSet::new(Audio::Dts, &["dts"]),
                TokenSet::new(Audio::Standard, &["ac3", "eac3", "aac", "dd5.1", "ddp5.1"]),
            ],
            hdr: strings(&["hdr", "hdr10", "hdr10plus"]),
            dolby_vision: strings(&["dv", "dovi", "dolby vision", "dolbyvision"]),
            imax: strings(&["imax"]),
            directors_cut: strings(&["directors cut", "director's cut", "directors", "director"]),
            extras_folders: strings(&[
                "extras",
                "extra",
                "bonus",
                "behind the scenes",
                "deleted scenes",
                "featurette",
                "featurettes",
                "trailers",
                "samples",
                "sample",
                "interviews",
            ]),
            sidecar_extensions: strings(&[
                "srt", "sub", "idx", "ass", "ssa", "vtt", "sup", "nfo", "jpg", "jpeg", "png",
                "txt", "xml",
            ]),
            video_extensions: strings(&[
                "mkv", "mp4", "avi", "ts", "m4v", "mov", "wmv", "flv", "webm",
            ]),
        }
    }
}

impl Vocabulary {
    /// Load a vocabulary override from a JSON file
    pub fn load(path: &Path) -> Result<Self, VocabularyError> {
        let contents = std::fs::read_to_string(path).map_err(|source| VocabularyError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&contents).map_err(|e| VocabularyError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Compile the vocabulary into matchers
    pub fn compile(&self) -> Result<VocabularyMatcher, VocabularyError> {
        VocabularyMatcher::new(self)
    }

    /// Every quality token across all dimensions
    pub fn quality_tokens(&self) -> Vec<String> {
        let mut tokens = Vec::new();
        tokens.extend(self.resolution.iter().flat_map(|s| s.tokens.iter().cloned()));
        tokens.extend(self.source.iter().flat_map(|s| s.tokens.iter().cloned()));
        tokens.extend(self.video_codec.iter().flat_map(|s| s.tokens.iter().cloned()));
        tokens.extend(self.audio.iter().flat_map(|s| s.tokens.iter().cloned()));
        tokens.extend(self.hdr.iter().cloned());
        tokens.extend(self.dolby_vision.iter().cloned());
        tokens.extend(self.imax.iter().cloned());
        tokens
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn default_vocabulary_compiles() {
        assert!(Vocabulary::default().compile().is_ok());
    }

    #[test]
    fn partial_override_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"extras_folders": ["making of"]}}"#).unwrap();

        let vocabulary = Vocabulary::load(file.path()).unwrap();

        assert_eq!(vocabulary.extras_folders, vec!["making of".to_string()]);
        assert_eq!(vocabulary.source, Vocabulary::default().source);
    }

    #[test]
    fn token_sets_use_snake_case_values() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"resolution": [{{"value": "uhd2160", "tokens": ["ultrahd"]}}]}}"#
        )
        .unwrap();

        let vocabulary = Vocabulary::load(file.path()).unwrap();

        assert_eq!(vocabulary.resolution.len(), 1);
        assert_eq!(vocabulary.resolution[0].value, Resolution::Uhd2160);
    }

    #[test]
    fn invalid_json_reports_path() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let error = Vocabulary::load(file.path()).unwrap_err();

        assert!(matches!(error, VocabularyError::Parse { .. }));
    }

    #[test]
    fn missing_file_is_read_error() {
        let error = Vocabulary::load(Path::new("/nonexistent/vocab.json")).unwrap_err();
        assert!(matches!(error, VocabularyError::Read { .. }));
    }
}
