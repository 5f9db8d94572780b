//! Path filters: which files count as videos, and which paths the user
//! wants included or excluded.

use crate::error::ConfigError;
use glob::{MatchOptions, Pattern};
use std::collections::HashSet;
use std::path::Path;

/// Accepts video files by extension
#[derive(Debug, Clone)]
pub struct VideoFilter {
    extensions: HashSet<String>,
    include_hidden: bool,
}

impl VideoFilter {
    pub fn new(extensions: Vec<String>) -> Self {
        Self {
            extensions: extensions.into_iter().map(|e| e.to_lowercase()).collect(),
            include_hidden: false,
        }
    }

    /// Include hidden files (starting with .)
    pub fn with_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    pub fn include_hidden(&self) -> bool {
        self.include_hidden
    }

    /// Check if a file should be treated as a video
    pub fn should_include(&self, path: &Path) -> bool {
        if !self.include_hidden && is_hidden(path) {
            return false;
        }

        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.extensions.contains(&e.to_lowercase()))
            .unwrap_or(false)
    }
}

/// Check whether the final path component starts with a dot
pub fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('.'))
        .unwrap_or(false)
}

/// One include/exclude pattern
#[derive(Debug, Clone)]
pub enum PathPattern {
    /// Contains a glob metacharacter; matched against the whole path
    Glob(Pattern),
    /// Plain text; matched anywhere in the path
    Substring(String),
}

impl PathPattern {
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        if raw.contains(['*', '?', '[']) {
            Pattern::new(&raw.to_lowercase())
                .map(PathPattern::Glob)
                .map_err(|e| ConfigError::InvalidPattern {
                    pattern: raw.to_string(),
                    reason: e.to_string(),
                })
        } else {
            Ok(PathPattern::Substring(raw.to_lowercase()))
        }
    }

    /// Case-insensitive match against a path
    pub fn matches(&self, path: &Path) -> bool {
        let text = path.to_string_lossy().to_lowercase();
        match self {
            PathPattern::Glob(pattern) => pattern.matches_with(
                &text,
                MatchOptions {
                    case_sensitive: false,
                    require_literal_separator: false,
                    require_literal_leading_dot: false,
                },
            ),
            PathPattern::Substring(needle) => text.contains(needle.as_str()),
        }
    }
}

/// User include/exclude filters, applied to full paths before parsing
#[derive(Debug, Clone, Default)]
pub struct PathFilter {
    include: Vec<PathPattern>,
    exclude: Vec<PathPattern>,
}

impl PathFilter {
    pub fn new(include: &[String], exclude: &[String]) -> Result<Self, ConfigError> {
        let parse_all = |patterns: &[String]| {
            patterns
                .iter()
                .filter(|p| !p.trim().is_empty())
                .map(|p| PathPattern::parse(p.trim()))
                .collect::<Result<Vec<_>, _>>()
        };

        Ok(Self {
            include: parse_all(include)?,
            exclude: parse_all(exclude)?,
        })
    }

    /// A path passes when it matches some include pattern (if any are set)
    /// and no exclude pattern
    pub fn allows(&self, path: &Path) -> bool {
        let included = self.include.is_empty() || self.include.iter().any(|p| p.matches(path));
        included && !self.exclude.iter().any(|p| p.matches(path))
    }

    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }
}
