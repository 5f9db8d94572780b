//! # Core Module
//!
//! The UI-agnostic janitor engine.
//!
//! ## Modules
//! - `vocabulary` - Token tables for quality, extras and sidecars
//! - `scanner` - Walks directories into a snapshot
//! - `parser` - Reads title, episode and quality from paths
//! - `quality` - Quality attributes and scoring
//! - `grouper` - Clusters records into duplicate groups
//! - `decision` - Chooses the keeper in each group
//! - `executor` - Deletes the rest
//! - `backup` - Records what was deleted
//! - `reporter` - Summaries and CSV export
//! - `pipeline` - Orchestrates the full workflow

pub mod backup;
pub mod decision;
pub mod executor;
pub mod grouper;
pub mod parser;
pub mod pipeline;
pub mod quality;
pub mod reporter;
pub mod scanner;
pub mod vocabulary;

// Re-export commonly used types
pub use decision::{Confirmation, Decision, KeepReason};
pub use grouper::{DuplicateGroup, GroupStrategy, Mode};
pub use parser::{MediaKind, MediaRecord};
pub use pipeline::{Analysis, EngineConfig};
pub use quality::{Quality, Score, ScoringConfig, SizePreference};
pub use scanner::ScannedFile;
