//! The `compress` subcommand.

use std::path::{Path, PathBuf};

use crate::cli::CompressArgs;
use crate::compress::{BatchCompressor, CompressionTask, PdfCompressor};
use crate::deps::{check_dependencies, install_instructions};
use crate::error::{PdfPressError, Result};
use crate::output::OutputFormatter;
use crate::utils::format_size;
use crate::walker;

/// Resolve inputs, run the batch, and report.
///
/// Returns the process exit code: zero when every file produced an
/// output, one when any file failed all strategies.
pub async fn run(args: &CompressArgs, formatter: &OutputFormatter) -> Result<i32> {
    args.validate()?;

    let inputs = resolve_inputs(&args.inputs)?;
    if inputs.is_empty() {
        return Err(PdfPressError::invalid_config(
            "no PDF files to compress (pass files or run in a directory containing PDFs)",
        ));
    }
    if args.output.is_some() && inputs.len() != 1 {
        return Err(PdfPressError::invalid_config(
            "--output requires exactly one input file",
        ));
    }

    if args.dry_run {
        formatter.section(&format!("Would compress {} file(s):", inputs.len()));
        for input in &inputs {
            formatter.info(&format!(
                "  {} ({})",
                input.display(),
                format_size(crate::utils::file_size(input))
            ));
        }
        return Ok(0);
    }

    for missing in check_dependencies() {
        formatter.warning(&format!(
            "{missing} not found, lossy compression disabled\n{}",
            install_instructions()
        ));
    }

    let tasks: Vec<CompressionTask> = inputs
        .iter()
        .map(|input| CompressionTask::new(input.clone(), resolve_output(input, args)))
        .collect();

    let compressor = PdfCompressor::new(args.quality()?)?;
    let batch = match args.jobs {
        Some(jobs) => BatchCompressor::with_workers(compressor, jobs),
        None => BatchCompressor::new(compressor),
    };

    let json = args.json;
    let outcomes = batch
        .compress_batch(tasks, |outcome| {
            if !json {
                formatter.show_outcome(outcome);
            }
        })
        .await?;

    if json {
        let payload = serde_json::to_string_pretty(&outcomes)
            .map_err(|e| PdfPressError::other(format!("failed to encode JSON: {e}")))?;
        println!("{payload}");
    } else {
        formatter.show_summary(&outcomes);
    }

    let failures = outcomes.iter().filter(|o| !o.succeeded()).count();
    Ok(if failures > 0 { 1 } else { 0 })
}

fn resolve_inputs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    if patterns.is_empty() {
        walker::discover_pdfs(Path::new("."))
    } else {
        walker::resolve_pdf_paths(patterns)
    }
}

/// `report.pdf` compresses to `report.compressed.pdf` beside it.
fn default_output(input: &Path) -> PathBuf {
    input.with_extension("compressed.pdf")
}

/// Where the compressed copy of `input` goes for the given flags.
///
/// `--output-dir` keeps the default `.compressed.pdf` naming inside the
/// directory, so pointing it at the input's own directory never clobbers
/// the input.
fn resolve_output(input: &Path, args: &CompressArgs) -> PathBuf {
    if let Some(output) = &args.output {
        output.clone()
    } else if let Some(dir) = &args.output_dir {
        let name = default_output(input);
        dir.join(name.file_name().unwrap_or(name.as_os_str()))
    } else if args.in_place {
        input.to_path_buf()
    } else {
        default_output(input)
    }
}
