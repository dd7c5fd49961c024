//! The `split` subcommand.

use std::path::{Path, PathBuf};

use crate::cli::SplitArgs;
use crate::error::Result;
use crate::output::OutputFormatter;
use crate::split::{split_pdf, split_pdf_individual};

pub fn run(args: &SplitArgs, formatter: &OutputFormatter) -> Result<i32> {
    if args.individual {
        let output_dir = args
            .output
            .clone()
            .unwrap_or_else(|| default_pages_dir(&args.input));
        let result = split_pdf_individual(&args.input, &output_dir)?;
        formatter.success(&format!(
            "wrote {} single-page files to {}",
            result.pages_extracted,
            output_dir.display()
        ));
    } else {
        let output = args
            .output
            .clone()
            .unwrap_or_else(|| args.input.with_extension("split.pdf"));
        let result = split_pdf(&args.input, &output, &args.pages)?;
        formatter.success(&format!(
            "extracted {} page(s) into {}",
            result.pages_extracted,
            output.display()
        ));
    }
    Ok(0)
}

/// `deck.pdf` splits into the `deck_pages/` directory beside it.
fn default_pages_dir(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "pages".to_string());
    input
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default()
        .join(format!("{stem}_pages"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pages_dir() {
        assert_eq!(
            default_pages_dir(Path::new("docs/deck.pdf")),
            PathBuf::from("docs/deck_pages")
        );
    }
}
