//! Merging multiple PDFs into one document.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};
use lopdf::{Document, Object, ObjectId};
use serde::Serialize;

use crate::error::{PdfPressError, Result};
use crate::utils::file_size;

/// Summary of one completed merge.
#[derive(Debug, Clone, Serialize)]
pub struct MergeResult {
    pub output_path: PathBuf,
    pub input_count: usize,
    pub total_pages: usize,
    pub output_size: u64,
}

/// Merge `paths` into a single document written to `output`, pages in
/// input order.
///
/// # Errors
///
/// Fails when the input list is empty, any input is missing or cannot
/// be parsed, or the output cannot be written. Encrypted inputs are
/// rejected with [`PdfPressError::EncryptedPdf`].
pub fn merge_pdfs(paths: &[PathBuf], output: &Path) -> Result<MergeResult> {
    if paths.is_empty() {
        return Err(PdfPressError::invalid_config("no input files to merge"));
    }

    for path in paths {
        if !path.exists() {
            return Err(PdfPressError::file_not_found(path));
        }
        if !path.is_file() {
            return Err(PdfPressError::not_a_file(path));
        }
    }

    let mut merged = load_document(&paths[0])?;
    let mut max_id = merged.max_id;
    debug!(
        "merge base {} ({} pages)",
        paths[0].display(),
        merged.get_pages().len()
    );

    for path in &paths[1..] {
        let mut doc = load_document(path)?;
        let page_count = doc.get_pages().len();
        debug!("appending {} ({page_count} pages)", path.display());

        // Shift object IDs past the merged document's range.
        doc.renumber_objects_with(max_id + 1);
        max_id = doc.max_id;

        let doc_pages: Vec<ObjectId> = doc.get_pages().into_iter().map(|(_, id)| id).collect();
        merged.objects.extend(doc.objects);

        append_to_page_tree(&mut merged, &doc_pages)?;
    }

    merged.renumber_objects();
    merged.compress();

    let total_pages = merged.get_pages().len();
    write_document(&mut merged, output)?;
    info!(
        "merged {} files ({total_pages} pages) into {}",
        paths.len(),
        output.display()
    );

    Ok(MergeResult {
        output_path: output.to_path_buf(),
        input_count: paths.len(),
        total_pages,
        output_size: file_size(output),
    })
}

/// Hook appended page references into the target's root page tree and
/// bump its count.
fn append_to_page_tree(merged: &mut Document, new_pages: &[ObjectId]) -> Result<()> {
    let pages_id = merged
        .catalog_mut()
        .and_then(|catalog| catalog.get(b"Pages").and_then(|p| p.as_reference()))
        .map_err(|e| PdfPressError::other(format!("malformed page tree: {e}")))?;

    let pages_dict = match merged.get_object_mut(pages_id) {
        Ok(Object::Dictionary(dict)) => dict,
        _ => {
            return Err(PdfPressError::other("malformed page tree: missing Pages"));
        }
    };

    match pages_dict.get_mut(b"Kids") {
        Ok(Object::Array(kids)) => {
            for page_id in new_pages {
                kids.push(Object::Reference(*page_id));
            }
        }
        _ => {
            return Err(PdfPressError::other(
                "malformed page tree: Kids is not an array",
            ));
        }
    }
    match pages_dict.get(b"Count") {
        Ok(Object::Integer(count)) => {
            let new_count = count + new_pages.len() as i64;
            pages_dict.set("Count", Object::Integer(new_count));
        }
        _ => {
            return Err(PdfPressError::other(
                "malformed page tree: Count is not an integer",
            ));
        }
    }
    Ok(())
}

pub(crate) fn load_document(path: &Path) -> Result<Document> {
    let doc =
        Document::load(path).map_err(|e| PdfPressError::failed_to_load_pdf(path, e.to_string()))?;
    if doc.trailer.get(b"Encrypt").is_ok() {
        return Err(PdfPressError::EncryptedPdf {
            path: path.to_path_buf(),
        });
    }
    Ok(doc)
}

pub(crate) fn write_document(doc: &mut Document, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| PdfPressError::failed_to_write(path, e))?;
    }
    let file = File::create(path).map_err(|e| PdfPressError::failed_to_write(path, e))?;
    let mut writer = BufWriter::new(file);
    doc.save_to(&mut writer)
        .map_err(|e| PdfPressError::failed_to_write(path, std::io::Error::other(e.to_string())))?;
    writer
        .flush()
        .map_err(|e| PdfPressError::failed_to_write(path, e))?;
    Ok(())
}

/// Stem of `path` with any trailing `-N` / `_N` / ` N` counter removed.
///
/// `report_1.pdf`, `report-2.pdf`, and `report 3.pdf` all map to
/// `report`, so sequentially numbered scans group together.
pub fn base_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let without_digits = stem.trim_end_matches(|c: char| c.is_ascii_digit());
    if without_digits.len() == stem.len() {
        return stem;
    }
    let without_sep = without_digits.trim_end_matches(['-', '_', ' ']);
    if without_sep.len() == without_digits.len() {
        // Digits without a separator are part of the name itself.
        return stem;
    }
    without_sep.to_string()
}

/// Group paths whose base names match, keeping only groups with more
/// than one member. Groups come back ordered by base name, members in
/// sorted path order.
pub fn group_similar_pdfs(paths: &[PathBuf]) -> Vec<(String, Vec<PathBuf>)> {
    let mut groups: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    for path in paths {
        groups.entry(base_name(path)).or_default().push(path.clone());
    }

    groups
        .into_iter()
        .filter(|(_, members)| members.len() > 1)
        .map(|(name, mut members)| {
            members.sort();
            (name, members)
        })
        .collect()
}
