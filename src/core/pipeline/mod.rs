//! # Pipeline Module
//!
//! Orchestrates a run.
//!
//! ## Pipeline Stages
//! 1. **Scan** - Walk the library into an immutable snapshot
//! 2. **Analyze** - Filter, parse, group, score and decide (pure)
//! 3. **Apply** - Review, back up and delete, one group at a time
//!
//! Analysis never touches the filesystem, so it can be run repeatedly
//! against the same snapshot with different configurations.

mod config;
mod engine;
mod runner;

pub use config::EngineConfig;
pub use engine::{Analysis, Engine};
pub use runner::{
    apply, ApplyReport, GroupOutcome, Pipeline, PipelineBuilder, PipelineConfig, PipelineResult,
};
