//! Title similarity metrics and the fuzzy acceptance threshold.

use strsim::{normalized_levenshtein, sorensen_dice};

/// A symmetric, normalized string similarity in `0.0..=1.0`
pub trait TitleSimilarity: Send + Sync {
    /// Similarity of two normalized titles; 1.0 means identical
    fn similarity(&self, a: &str, b: &str) -> f64;

    /// Human-readable description of the metric
    fn description(&self) -> String;
}

/// Sørensen-Dice coefficient over character bigrams
#[derive(Debug, Clone, Copy, Default)]
pub struct DiceSimilarity;

impl TitleSimilarity for DiceSimilarity {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        sorensen_dice(&a.to_lowercase(), &b.to_lowercase())
    }

    fn description(&self) -> String {
        "Sørensen-Dice bigram overlap".to_string()
    }
}

/// Normalized Levenshtein distance, 1.0 for identical strings
#[derive(Debug, Clone, Copy, Default)]
pub struct LevenshteinSimilarity;

impl TitleSimilarity for LevenshteinSimilarity {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        normalized_levenshtein(&a.to_lowercase(), &b.to_lowercase())
    }

    fn description(&self) -> String {
        "Normalized Levenshtein edit similarity".to_string()
    }
}

/// Minimum similarity for two titles to be treated as the same movie
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuzzyThreshold {
    value: f64,
}

impl FuzzyThreshold {
    /// Create a threshold; values outside `0.0..=1.0` are clamped
    ///
    /// Recommended thresholds:
    /// - 0.90: Strict, only near-identical spellings
    /// - 0.85: Balanced (default)
    /// - 0.75: Loose, catches subtitles and punctuation variants
    pub fn new(value: f64) -> Self {
        Self {
            value: value.clamp(0.0, 1.0),
        }
    }

    pub fn strict() -> Self {
        Self::new(0.90)
    }

    pub fn balanced() -> Self {
        Self::new(0.85)
    }

    pub fn loose() -> Self {
        Self::new(0.75)
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn accepts(&self, similarity: f64) -> bool {
        similarity >= self.value
    }
}

impl Default for FuzzyThreshold {
    fn default() -> Self {
        Self::balanced()
    }
}
