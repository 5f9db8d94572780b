//! # Quality Module
//!
//! Structured quality attributes parsed from a release name, and the scorer
//! that turns them into a preference order.
//!
//! ## Point Table
//! | Dimension | Points |
//! |-----------|--------|
//! | Resolution | 2160p=8, 1440p=6, 1080p=5, 720p=4, 480p=3 |
//! | Source | Remux=10, BluRay=8, WEB-DL=7, WEBRip=5, HDTV=4 |
//! | Video codec | AV1=5, x265=3, x264=2 |
//! | Audio | Atmos/TrueHD=3, DTS=2, AC3/AAC=1 |
//! | Flags | HDR=2, Dolby Vision=+1, IMAX=2, Director's Cut=1 |
//!
//! Unknown values score 0. File size never changes the points; it only
//! breaks ties between equal scores when a [`SizePreference`] is configured.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Video resolution, ordered from worst to best
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    #[default]
    Unknown,
    Sd480,
    Hd720,
    Hd1080,
    Qhd1440,
    Uhd2160,
}

impl Resolution {
    pub fn points(&self) -> f64 {
        match self {
            Resolution::Uhd2160 => 8.0,
            Resolution::Qhd1440 => 6.0,
            Resolution::Hd1080 => 5.0,
            Resolution::Hd720 => 4.0,
            Resolution::Sd480 => 3.0,
            Resolution::Unknown => 0.0,
        }
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Resolution::Uhd2160 => write!(f, "2160p"),
            Resolution::Qhd1440 => write!(f, "1440p"),
            Resolution::Hd1080 => write!(f, "1080p"),
            Resolution::Hd720 => write!(f, "720p"),
            Resolution::Sd480 => write!(f, "480p"),
            Resolution::Unknown => write!(f, "unknown"),
        }
    }
}

/// Release source, ordered from worst to best
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    #[default]
    Unknown,
    Hdtv,
    WebRip,
    WebDl,
    BluRay,
    Remux,
}

impl Source {
    pub fn points(&self) -> f64 {
        match self {
            Source::Remux => 10.0,
            Source::BluRay => 8.0,
            Source::WebDl => 7.0,
            Source::WebRip => 5.0,
            Source::Hdtv => 4.0,
            Source::Unknown => 0.0,
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Remux => write!(f, "Remux"),
            Source::BluRay => write!(f, "BluRay"),
            Source::WebDl => write!(f, "WEB-DL"),
            Source::WebRip => write!(f, "WEBRip"),
            Source::Hdtv => write!(f, "HDTV"),
            Source::Unknown => write!(f, "unknown"),
        }
    }
}

/// Video codec, ordered from worst to best
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum VideoCodec {
    #[default]
    Unknown,
    X264,
    X265,
    Av1,
}

impl VideoCodec {
    pub fn points(&self) -> f64 {
        match self {
            VideoCodec::Av1 => 5.0,
            VideoCodec::X265 => 3.0,
            VideoCodec::X264 => 2.0,
            VideoCodec::Unknown => 0.0,
        }
    }
}

impl std::fmt::Display for VideoCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VideoCodec::Av1 => write!(f, "AV1"),
            VideoCodec::X265 => write!(f, "x265"),
            VideoCodec::X264 => write!(f, "x264"),
            VideoCodec::Unknown => write!(f, "unknown"),
        }
    }
}

/// Audio format, ordered from worst to best
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Audio {
    #[default]
    Unknown,
    /// AC3 or AAC
    Standard,
    Dts,
    /// Atmos, TrueHD and the lossless DTS variants
    Lossless,
}

impl Audio {
    pub fn points(&self) -> f64 {
        match self {
            Audio::Lossless => 3.0,
            Audio::Dts => 2.0,
            Audio::Standard => 1.0,
            Audio::Unknown => 0.0,
        }
    }
}

impl std::fmt::Display for Audio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Audio::Lossless => write!(f, "Atmos/TrueHD"),
            Audio::Dts => write!(f, "DTS"),
            Audio::Standard => write!(f, "AC3/AAC"),
            Audio::Unknown => write!(f, "unknown"),
        }
    }
}

/// Quality attributes extracted from a path
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quality {
    pub resolution: Resolution,
    pub source: Source,
    pub video_codec: VideoCodec,
    pub audio: Audio,
    pub hdr: bool,
    pub dolby_vision: bool,
    pub imax: bool,
    pub directors_cut: bool,
}

impl Quality {
    /// Short human-readable label, e.g. `1080p BluRay x264 HDR`
    pub fn label(&self) -> String {
        let mut parts = Vec::new();
        if self.resolution != Resolution::Unknown {
            parts.push(self.resolution.to_string());
        }
        if self.source != Source::Unknown {
            parts.push(self.source.to_string());
        }
        if self.video_codec != VideoCodec::Unknown {
            parts.push(self.video_codec.to_string());
        }
        if self.audio != Audio::Unknown {
            parts.push(self.audio.to_string());
        }
        if self.dolby_vision {
            parts.push("DV".to_string());
        } else if self.hdr {
            parts.push("HDR".to_string());
        }
        if self.imax {
            parts.push("IMAX".to_string());
        }
        if self.directors_cut {
            parts.push("Director's Cut".to_string());
        }

        if parts.is_empty() {
            "unknown quality".to_string()
        } else {
            parts.join(" ")
        }
    }
}

/// How file size breaks ties between equal scores
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizePreference {
    /// Size plays no part; ties fall back to path order
    #[default]
    Ignore,
    /// Prefer the smaller file
    Smaller,
    /// Prefer the larger file
    Larger,
}

impl SizePreference {
    /// Order two sizes so that the preferred one compares `Greater`
    pub fn compare(&self, a: u64, b: u64) -> Ordering {
        match self {
            SizePreference::Ignore => Ordering::Equal,
            SizePreference::Smaller => b.cmp(&a),
            SizePreference::Larger => a.cmp(&b),
        }
    }
}

/// Scoring options
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Keep the lowest-scored file instead of the highest
    pub reverse: bool,
    /// Secondary tie-break on file size
    pub size_preference: SizePreference,
}

/// A record's score together with the size used for tie-breaking
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub points: f64,
    pub size_bytes: u64,
}

/// Maps quality attributes to a numeric score
#[derive(Debug, Clone, Copy, Default)]
pub struct Scorer {
    config: ScoringConfig,
}

impl Scorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Additive points for a quality record
    pub fn points(&self, quality: &Quality) -> f64 {
        let mut points = quality.resolution.points()
            + quality.source.points()
            + quality.video_codec.points()
            + quality.audio.points();

        if quality.hdr {
            points += 2.0;
        }
        if quality.dolby_vision {
            points += 1.0;
        }
        if quality.imax {
            points += 2.0;
        }
        if quality.directors_cut {
            points += 1.0;
        }

        points
    }

    /// Score a record from its quality and size
    pub fn score(&self, quality: &Quality, size_bytes: u64) -> Score {
        Score {
            points: self.points(quality),
            size_bytes,
        }
    }

    /// Order two scores so the one that should be kept compares `Greater`.
    ///
    /// Points decide first (inverted when `reverse` is set); equal points fall
    /// through to the size preference, which `reverse` does not invert.
    pub fn compare(&self, a: &Score, b: &Score) -> Ordering {
        let by_points = a.points.total_cmp(&b.points);
        let by_points = if self.config.reverse {
            by_points.reverse()
        } else {
            by_points
        };

        by_points.then_with(|| {
            self.config
                .size_preference
                .compare(a.size_bytes, b.size_bytes)
        })
    }
}

/// Score a quality record with the given configuration
pub fn score(quality: &Quality, size_bytes: u64, config: &ScoringConfig) -> Score {
    Scorer::new(*config).score(quality, size_bytes)
}
