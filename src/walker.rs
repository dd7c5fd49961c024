//! Turning CLI arguments and directories into lists of PDF paths.

use std::path::{Path, PathBuf};

use crate::error::Result;

/// Expand a list of paths or glob patterns into concrete file paths.
///
/// Literal paths pass through glob unchanged, so `report.pdf` and
/// `scans/*.pdf` can be mixed freely. Order follows the input patterns,
/// with each pattern's matches in filesystem sort order.
pub fn resolve_pdf_paths<T>(patterns: T) -> Result<Vec<PathBuf>>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    let mut resolved = Vec::new();
    for pattern in patterns {
        for entry in glob::glob(pattern.as_ref())? {
            resolved.push(entry?);
        }
    }
    Ok(resolved)
}

/// All `.pdf` files directly inside `dir`, sorted by path. The extension
/// match is case-insensitive and subdirectories are not descended into.
pub fn discover_pdfs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut pdfs = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_pdf = path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if is_pdf {
            pdfs.push(path);
        }
    }
    pdfs.sort();
    Ok(pdfs)
}
