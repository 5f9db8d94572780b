//! # janitorr CLI
//!
//! Command-line interface for the duplicate media janitor.
//!
//! ## Usage
//! ```bash
//! janitorr -d /media/movies --dry-run
//! janitorr -d /media/tv --mode tv --interactive --output json
//! ```

mod cli;

use janitorr::Result;

fn main() -> Result<()> {
    cli::run()
}
