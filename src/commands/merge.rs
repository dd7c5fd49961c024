//! The `merge` subcommand.

use std::path::{Path, PathBuf};

use crate::cli::MergeArgs;
use crate::error::{PdfPressError, Result};
use crate::merge::{group_similar_pdfs, merge_pdfs};
use crate::output::OutputFormatter;
use crate::utils::format_size;
use crate::walker;

pub fn run(args: &MergeArgs, formatter: &OutputFormatter) -> Result<i32> {
    let inputs = if args.inputs.is_empty() {
        walker::discover_pdfs(Path::new("."))?
    } else {
        walker::resolve_pdf_paths(&args.inputs)?
    };
    if inputs.is_empty() {
        return Err(PdfPressError::invalid_config("no PDF files to merge"));
    }

    if args.group {
        return run_grouped(&inputs, formatter);
    }

    let output = args
        .output
        .as_ref()
        .ok_or_else(|| PdfPressError::invalid_config("output file required"))?;

    let result = merge_pdfs(&inputs, output)?;
    formatter.success(&format!(
        "merged {} files ({} pages) into {} ({})",
        result.input_count,
        result.total_pages,
        result.output_path.display(),
        format_size(result.output_size)
    ));
    Ok(0)
}

/// Merge each set of similarly named files into `<base>_merged.pdf`
/// beside the first member.
fn run_grouped(inputs: &[PathBuf], formatter: &OutputFormatter) -> Result<i32> {
    let groups = group_similar_pdfs(inputs);
    if groups.is_empty() {
        formatter.warning("no groups of similarly named PDFs found");
        return Ok(0);
    }

    for (base, members) in groups {
        let dir = members[0].parent().map(Path::to_path_buf).unwrap_or_default();
        let output = dir.join(format!("{base}_merged.pdf"));
        let result = merge_pdfs(&members, &output)?;
        formatter.success(&format!(
            "{base}: merged {} files ({} pages) into {}",
            result.input_count,
            result.total_pages,
            result.output_path.display()
        ));
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::fixtures;
    use lopdf::Document;
    use tempfile::TempDir;

    #[test]
    fn test_run_grouped_merges_each_group() {
        let dir = TempDir::new().unwrap();
        let inputs = vec![
            dir.path().join("scan_1.pdf"),
            dir.path().join("scan_2.pdf"),
            dir.path().join("lonely.pdf"),
        ];
        for input in &inputs {
            fixtures::write_pdf(input, 1);
        }

        let formatter = OutputFormatter::quiet();
        let code = run_grouped(&inputs, &formatter).unwrap();
        assert_eq!(code, 0);

        let merged = dir.path().join("scan_merged.pdf");
        assert!(merged.exists());
        assert_eq!(Document::load(&merged).unwrap().get_pages().len(), 2);
        assert!(!dir.path().join("lonely_merged.pdf").exists());
    }

    #[test]
    fn test_run_grouped_with_no_groups() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("solo.pdf");
        fixtures::write_pdf(&input, 1);

        let formatter = OutputFormatter::quiet();
        assert_eq!(run_grouped(&[input], &formatter).unwrap(), 0);
    }
}
