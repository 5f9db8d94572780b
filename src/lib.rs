//! # Janitorr
//!
//! Finds duplicate movies and TV episodes in a media library and decides
//! which copy to keep.
//!
//! ## Core Philosophy
//! - **Explain every decision** - each group says why its keeper won
//! - **Delete nothing by surprise** - dry runs, per-group review, backups
//! - **Pure analysis** - the same snapshot always yields the same decisions
//!
//! ## Architecture
//! - `core` - Scanner, parser, scorer, grouper, decision engine, executor
//! - `events` - Progress events for any UI
//! - `error` - Error types
//! - `cli` - Command-line interface (binary only)

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{JanitorError, Result};

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize tracing for the application.
///
/// Logs go to stderr, filtered by `RUST_LOG` when set, otherwise `info`
/// (`debug` when verbose). With a log file, a second plain-text layer
/// writes there too; keep the returned guard alive until exit so it flushes.
pub fn init_tracing(verbose: bool, log_file: Option<&Path>) -> Option<WorkerGuard> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let (file_layer, guard) = match log_file.and_then(|p| Some((p.parent()?, p.file_name()?))) {
        Some((dir, name)) => {
            let dir = if dir.as_os_str().is_empty() {
                Path::new(".")
            } else {
                dir
            };
            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    // A subscriber may already be installed (tests, embedding applications)
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(file_layer)
        .try_init();

    guard
}
