//! Extracting pages from a PDF.

use std::path::{Path, PathBuf};

use log::info;
use lopdf::Document;
use serde::Serialize;

use crate::error::{PdfPressError, Result};
use crate::merge::{load_document, write_document};

/// Summary of one split operation.
#[derive(Debug, Clone, Serialize)]
pub struct SplitResult {
    pub outputs: Vec<PathBuf>,
    pub pages_extracted: usize,
}

/// Parse a page selection like `1,3,5-9`, `all`, `odd`, or `even` into
/// sorted zero-based page indices. Input numbering is one-based.
///
/// # Errors
///
/// Returns [`PdfPressError::InvalidPageSpec`] for malformed tokens,
/// inverted ranges, and pages outside `1..=total_pages`.
pub fn parse_page_spec(spec: &str, total_pages: usize) -> Result<Vec<usize>> {
    let spec = spec.trim();
    match spec.to_ascii_lowercase().as_str() {
        "all" => return Ok((0..total_pages).collect()),
        "odd" => return Ok((0..total_pages).step_by(2).collect()),
        "even" => return Ok((1..total_pages).step_by(2).collect()),
        _ => {}
    }

    let mut pages = Vec::new();
    for token in spec.split(',') {
        let token = token.trim();
        if token.is_empty() {
            return Err(PdfPressError::invalid_page_spec(spec, "empty page entry"));
        }

        if let Some((start, end)) = token.split_once('-') {
            let start = parse_page_number(spec, start.trim(), total_pages)?;
            let end = parse_page_number(spec, end.trim(), total_pages)?;
            if start > end {
                return Err(PdfPressError::invalid_page_spec(
                    spec,
                    format!("range {token} runs backwards"),
                ));
            }
            pages.extend(start - 1..end);
        } else {
            pages.push(parse_page_number(spec, token, total_pages)? - 1);
        }
    }

    pages.sort_unstable();
    pages.dedup();
    Ok(pages)
}

fn parse_page_number(spec: &str, token: &str, total_pages: usize) -> Result<usize> {
    let page: usize = token.parse().map_err(|_| {
        PdfPressError::invalid_page_spec(spec, format!("'{token}' is not a page number"))
    })?;
    if page == 0 {
        return Err(PdfPressError::invalid_page_spec(
            spec,
            "page numbers start at 1",
        ));
    }
    if page > total_pages {
        return Err(PdfPressError::invalid_page_spec(
            spec,
            format!("page {page} out of range (document has {total_pages} pages)"),
        ));
    }
    Ok(page)
}

/// Write the pages selected by `spec` into a single document at `output`.
pub fn split_pdf(input: &Path, output: &Path, spec: &str) -> Result<SplitResult> {
    let mut doc = load_document(input)?;
    let total_pages = doc.get_pages().len();
    let keep = parse_page_spec(spec, total_pages)?;
    if keep.is_empty() {
        return Err(PdfPressError::invalid_page_spec(spec, "selects no pages"));
    }

    retain_pages(&mut doc, &keep);
    write_document(&mut doc, output)?;
    info!(
        "extracted {} of {total_pages} pages from {} into {}",
        keep.len(),
        input.display(),
        output.display()
    );

    Ok(SplitResult {
        outputs: vec![output.to_path_buf()],
        pages_extracted: keep.len(),
    })
}

/// Write every page of `input` to its own single-page document inside
/// `output_dir`, named `<stem>_page_NNN.pdf`.
pub fn split_pdf_individual(input: &Path, output_dir: &Path) -> Result<SplitResult> {
    let doc = load_document(input)?;
    let total_pages = doc.get_pages().len();
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());

    std::fs::create_dir_all(output_dir)
        .map_err(|e| PdfPressError::failed_to_write(output_dir, e))?;

    let mut outputs = Vec::with_capacity(total_pages);
    for page in 0..total_pages {
        let output = output_dir.join(format!("{stem}_page_{:03}.pdf", page + 1));
        let mut single = doc.clone();
        retain_pages(&mut single, &[page]);
        write_document(&mut single, &output)?;
        outputs.push(output);
    }

    info!(
        "split {} into {total_pages} single-page files under {}",
        input.display(),
        output_dir.display()
    );
    Ok(SplitResult {
        outputs,
        pages_extracted: total_pages,
    })
}

/// Drop every page not listed in `keep` (zero-based indices), then
/// compact the document.
fn retain_pages(doc: &mut Document, keep: &[usize]) {
    let total = doc.get_pages().len();
    let delete: Vec<u32> = (0..total)
        .filter(|i| !keep.contains(i))
        .map(|i| (i + 1) as u32)
        .collect();

    // Delete back to front so earlier page numbers stay valid.
    for page in delete.into_iter().rev() {
        doc.delete_pages(&[page]);
    }
    doc.prune_objects();
    doc.renumber_objects();
    doc.compress();
}
