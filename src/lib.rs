//! pdfpress - Shrink, merge, split, and unlock PDF files.
//!
//! The compression core races several strategies per file (lossless
//! structural optimization, a Ghostscript pass, and a combined pipeline)
//! and keeps whichever produces the smallest valid output. Supporting
//! operations cover merging, page extraction, and password removal.
//!
//! # Examples
//!
//! ```no_run
//! use pdfpress::compress::PdfCompressor;
//! use pdfpress::config::Quality;
//! use std::path::Path;
//!
//! # async fn demo() -> pdfpress::error::Result<()> {
//! let compressor = PdfCompressor::new(Quality::Ebook)?;
//! let outcome = compressor
//!     .compress(Path::new("report.pdf"), Path::new("report.compressed.pdf"))
//!     .await?;
//! println!("best strategy: {}", outcome.best_strategy);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod commands;
pub mod compress;
pub mod config;
pub mod deps;
pub mod error;
pub mod merge;
pub mod output;
pub mod split;
pub mod unlock;
pub mod utils;
pub mod walker;

pub use error::{PdfPressError, Result};

use cli::{Cli, Command};
use output::OutputFormatter;

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Dispatch a parsed CLI invocation and return the process exit code.
///
/// # Errors
///
/// Propagates whatever the selected command fails with; callers map the
/// error to an exit code via [`error::PdfPressError::exit_code`].
pub async fn run(cli: Cli) -> Result<i32> {
    let formatter = OutputFormatter::new(cli.quiet, cli.verbose > 0);

    match &cli.command {
        Command::Compress(args) => commands::compress::run(args, &formatter).await,
        Command::Merge(args) => commands::merge::run(args, &formatter),
        Command::Split(args) => commands::split::run(args, &formatter),
        Command::Unlock(args) => commands::unlock::run(args, &formatter),
    }
}
