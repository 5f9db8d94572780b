//! Engine configuration.

use crate::core::grouper::{FuzzyThreshold, Mode};
use crate::core::quality::ScoringConfig;
use crate::core::scanner::PathFilter;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Everything that shapes a run
///
/// Passed by reference through every stage; nothing reads configuration
/// from anywhere else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub mode: Mode,
    /// Report what would be deleted without deleting
    pub dry_run: bool,
    /// Ask before executing each group
    pub interactive: bool,
    pub scoring: ScoringConfig,
    /// Files smaller than this are ignored
    pub min_size_mb: f64,
    /// When non-empty, only matching paths are considered
    pub include_patterns: Vec<String>,
    pub exclude_patterns: Vec<String>,
    /// Fuzzy title matching; movie mode only
    pub fuzzy_matching: bool,
    pub fuzzy_threshold: f64,
    /// Treat extras folders like any other
    pub keep_extras: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Auto,
            dry_run: false,
            interactive: false,
            scoring: ScoringConfig::default(),
            min_size_mb: 100.0,
            include_patterns: Vec::new(),
            exclude_patterns: Vec::new(),
            fuzzy_matching: false,
            fuzzy_threshold: FuzzyThreshold::default().value(),
            keep_extras: false,
        }
    }
}

impl EngineConfig {
    /// Reject values no run could use
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.fuzzy_threshold.is_finite() || !(0.0..=1.0).contains(&self.fuzzy_threshold) {
            return Err(ConfigError::InvalidThreshold {
                value: self.fuzzy_threshold,
            });
        }
        if !self.min_size_mb.is_finite() || self.min_size_mb < 0.0 {
            return Err(ConfigError::InvalidMinSize {
                value: self.min_size_mb,
            });
        }
        self.path_filter()?;
        Ok(())
    }

    /// Minimum size in bytes
    pub fn min_size_bytes(&self) -> u64 {
        (self.min_size_mb.max(0.0) * BYTES_PER_MB) as u64
    }

    pub fn path_filter(&self) -> Result<PathFilter, ConfigError> {
        PathFilter::new(&self.include_patterns, &self.exclude_patterns)
    }

    /// The fuzzy threshold, when fuzzy matching applies to this mode
    pub fn fuzzy_for(&self, mode: Mode) -> Option<FuzzyThreshold> {
        (self.fuzzy_matching && mode == Mode::Movie).then(|| FuzzyThreshold::new(self.fuzzy_threshold))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = EngineConfig::default();
        assert_eq!(config.mode, Mode::Auto);
        assert_eq!(config.min_size_mb, 100.0);
        assert_eq!(config.fuzzy_threshold, 0.85);
        assert!(!config.keep_extras);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn min_size_is_in_mebibytes() {
        let config = EngineConfig {
            min_size_mb: 100.0,
            ..Default::default()
        };
        assert_eq!(config.min_size_bytes(), 104_857_600);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let bad_threshold = EngineConfig {
            fuzzy_threshold: 1.2,
            ..Default::default()
        };
        assert!(matches!(
            bad_threshold.validate(),
            Err(ConfigError::InvalidThreshold { .. })
        ));

        let bad_size = EngineConfig {
            min_size_mb: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            bad_size.validate(),
            Err(ConfigError::InvalidMinSize { .. })
        ));

        let bad_pattern = EngineConfig {
            exclude_patterns: vec!["[oops".into()],
            ..Default::default()
        };
        assert!(matches!(
            bad_pattern.validate(),
            Err(ConfigError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn fuzzy_is_a_no_op_outside_movie_mode() {
        let config = EngineConfig {
            fuzzy_matching: true,
            ..Default::default()
        };
        assert!(config.fuzzy_for(Mode::Movie).is_some());
        assert!(config.fuzzy_for(Mode::Tv).is_none());
        assert!(EngineConfig::default().fuzzy_for(Mode::Movie).is_none());
    }

    #[test]
    fn partial_json_uses_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"mode": "tv", "scoring": {"reverse": true}}"#).unwrap();
        assert_eq!(config.mode, Mode::Tv);
        assert!(config.scoring.reverse);
        assert_eq!(config.min_size_mb, 100.0);
    }
}
