//! CLI argument parsing.
//!
//! Defines the command-line surface using `clap` derive. Each subcommand
//! maps to a handler in [`crate::commands`].

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Quality;
use crate::error::{PdfPressError, Result};

/// Shrink, merge, split, and unlock PDF files.
///
/// pdfpress compresses PDFs by racing several strategies per file and
/// keeping whichever produces the smallest valid output. Lossless
/// structural optimization always runs; lossy Ghostscript passes join
/// in when Ghostscript is installed.
#[derive(Parser, Debug)]
#[command(name = "pdfpress")]
#[command(version)]
#[command(about = "Shrink, merge, split, and unlock PDF files", long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Increase log verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-error output
    #[arg(long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compress one or more PDFs
    Compress(CompressArgs),
    /// Merge multiple PDFs into one document
    Merge(MergeArgs),
    /// Extract pages from a PDF
    Split(SplitArgs),
    /// Remove password protection from a PDF
    Unlock(UnlockArgs),
}

#[derive(Args, Debug)]
pub struct CompressArgs {
    /// Input PDF files or glob patterns
    ///
    /// When omitted, every .pdf file in the current directory is
    /// compressed.
    ///
    /// Examples:
    ///   pdfpress compress report.pdf
    ///   pdfpress compress scans/*.pdf -q screen
    #[arg(value_name = "FILE")]
    pub inputs: Vec<String>,

    /// Output file path
    ///
    /// Only valid when compressing exactly one input. By default each
    /// input is written next to itself as <name>.compressed.pdf.
    #[arg(short, long, value_name = "FILE", conflicts_with = "in_place")]
    pub output: Option<PathBuf>,

    /// Directory to write compressed files into, keeping input names
    #[arg(short = 'd', long, value_name = "DIR", conflicts_with_all = ["output", "in_place"])]
    pub output_dir: Option<PathBuf>,

    /// Replace each input file with its compressed version
    #[arg(short, long)]
    pub in_place: bool,

    /// Ghostscript quality preset
    ///
    /// - screen: 72 dpi images, smallest files
    /// - ebook: 150 dpi images, good for reading (default)
    /// - printer: 300 dpi images, print quality
    /// - prepress: 300 dpi, color-preserving
    /// - default: Ghostscript's own balance
    #[arg(short, long, value_name = "PRESET", default_value = "ebook")]
    #[arg(value_parser = ["screen", "ebook", "printer", "prepress", "default"])]
    pub quality: String,

    /// Number of files to compress in parallel
    ///
    /// Defaults to the number of CPU cores, capped at 8.
    #[arg(short = 'j', long, value_name = "N")]
    pub jobs: Option<usize>,

    /// List the files that would be compressed, then exit
    #[arg(short = 'n', long, conflicts_with_all = ["output", "output_dir", "in_place"])]
    pub dry_run: bool,

    /// Print outcomes as JSON instead of formatted text
    #[arg(long)]
    pub json: bool,
}

impl CompressArgs {
    /// Parse the quality preset.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for an unknown preset name; unreachable
    /// through clap, which restricts the value set.
    pub fn quality(&self) -> Result<Quality> {
        self.quality.parse()
    }

    /// Early validation that needs no file I/O.
    pub fn validate(&self) -> Result<()> {
        if let Some(jobs) = self.jobs
            && jobs == 0
        {
            return Err(PdfPressError::invalid_config(
                "number of jobs must be at least 1",
            ));
        }
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Input PDF files or glob patterns, merged in order
    ///
    /// When omitted with --group, every .pdf file in the current
    /// directory is considered.
    #[arg(value_name = "FILE")]
    pub inputs: Vec<String>,

    /// Output file for the merged document
    #[arg(short, long, value_name = "FILE", required_unless_present = "group")]
    pub output: Option<PathBuf>,

    /// Group inputs by shared base name and merge each group separately
    ///
    /// Files like scan_1.pdf, scan_2.pdf merge into scan_merged.pdf.
    /// Files without similarly named companions are left alone.
    #[arg(short, long, conflicts_with = "output")]
    pub group: bool,
}

#[derive(Args, Debug)]
pub struct SplitArgs {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Pages to extract: 'all', 'odd', 'even', or a list like 1,3,5-9
    ///
    /// Page numbers are 1-indexed.
    #[arg(short, long, value_name = "SPEC", default_value = "all")]
    pub pages: String,

    /// Output file, or output directory with --individual
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Write every page to its own single-page file
    #[arg(long, conflicts_with = "pages")]
    pub individual: bool,
}

#[derive(Args, Debug)]
pub struct UnlockArgs {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Password for the encrypted PDF
    #[arg(short, long, value_name = "PASSWORD")]
    pub password: String,

    /// Output file path (default: <name>.unlocked.pdf)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_compress_defaults() {
        let cli = parse(&["pdfpress", "compress", "a.pdf"]);
        let Command::Compress(args) = cli.command else {
            panic!("expected compress");
        };
        assert_eq!(args.inputs, vec!["a.pdf"]);
        assert_eq!(args.quality, "ebook");
        assert!(!args.in_place);
        assert!(!args.dry_run);
        assert!(args.jobs.is_none());
    }

    #[test]
    fn test_compress_quality_parses() {
        let cli = parse(&["pdfpress", "compress", "a.pdf", "-q", "screen"]);
        let Command::Compress(args) = cli.command else {
            panic!("expected compress");
        };
        assert_eq!(args.quality().unwrap(), Quality::Screen);
    }

    #[test]
    fn test_compress_rejects_unknown_quality() {
        assert!(Cli::try_parse_from(["pdfpress", "compress", "a.pdf", "-q", "tiny"]).is_err());
    }

    #[test]
    fn test_compress_output_conflicts_with_in_place() {
        assert!(
            Cli::try_parse_from(["pdfpress", "compress", "a.pdf", "-o", "b.pdf", "-i"]).is_err()
        );
    }

    #[test]
    fn test_compress_output_dir_conflicts_with_output() {
        assert!(
            Cli::try_parse_from(["pdfpress", "compress", "a.pdf", "-o", "b.pdf", "-d", "out"])
                .is_err()
        );
        let cli = parse(&["pdfpress", "compress", "a.pdf", "-d", "out"]);
        let Command::Compress(args) = cli.command else {
            panic!("expected compress");
        };
        assert_eq!(args.output_dir, Some(PathBuf::from("out")));
    }

    #[test]
    fn test_compress_dry_run_conflicts_with_output() {
        assert!(
            Cli::try_parse_from(["pdfpress", "compress", "a.pdf", "-n", "-o", "b.pdf"]).is_err()
        );
    }

    #[test]
    fn test_compress_zero_jobs_rejected_by_validate() {
        let cli = parse(&["pdfpress", "compress", "a.pdf", "-j", "0"]);
        let Command::Compress(args) = cli.command else {
            panic!("expected compress");
        };
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_merge_requires_output_or_group() {
        assert!(Cli::try_parse_from(["pdfpress", "merge", "a.pdf", "b.pdf"]).is_err());
        assert!(Cli::try_parse_from(["pdfpress", "merge", "a.pdf", "b.pdf", "-o", "m.pdf"]).is_ok());
        assert!(Cli::try_parse_from(["pdfpress", "merge", "--group"]).is_ok());
    }

    #[test]
    fn test_merge_group_conflicts_with_output() {
        assert!(
            Cli::try_parse_from(["pdfpress", "merge", "a.pdf", "--group", "-o", "m.pdf"]).is_err()
        );
    }

    #[test]
    fn test_split_defaults_to_all_pages() {
        let cli = parse(&["pdfpress", "split", "a.pdf"]);
        let Command::Split(args) = cli.command else {
            panic!("expected split");
        };
        assert_eq!(args.pages, "all");
        assert!(!args.individual);
    }

    #[test]
    fn test_split_individual_conflicts_with_pages() {
        assert!(
            Cli::try_parse_from(["pdfpress", "split", "a.pdf", "--individual", "-p", "1-3"])
                .is_err()
        );
    }

    #[test]
    fn test_unlock_requires_password() {
        assert!(Cli::try_parse_from(["pdfpress", "unlock", "a.pdf"]).is_err());
        let cli = parse(&["pdfpress", "unlock", "a.pdf", "-p", "secret"]);
        let Command::Unlock(args) = cli.command else {
            panic!("expected unlock");
        };
        assert_eq!(args.password, "secret");
    }

    #[test]
    fn test_global_flags() {
        let cli = parse(&["pdfpress", "compress", "a.pdf", "-vv"]);
        assert_eq!(cli.verbose, 2);
        assert!(!cli.quiet);

        assert!(Cli::try_parse_from(["pdfpress", "compress", "a.pdf", "-v", "--quiet"]).is_err());
    }
}
