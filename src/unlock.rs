//! Removing password protection from PDFs.

use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, info};
use lopdf::Document;
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::error::{PdfPressError, Result};

/// Summary of one unlock operation.
#[derive(Debug, Clone, Serialize)]
pub struct UnlockResult {
    pub output_path: PathBuf,
    /// False when the input had no encryption and was copied through.
    pub was_encrypted: bool,
}

/// Check whether `path` carries an encryption dictionary.
pub fn is_encrypted(path: &Path) -> Result<bool> {
    let doc = load_possibly_encrypted(path)?;
    Ok(doc.trailer.get(b"Encrypt").is_ok())
}

/// Decrypt `input` with `password` and write a permanently unlocked copy
/// to `output`. An unencrypted input is copied through unchanged.
///
/// The output is written to a temporary file beside the destination and
/// renamed into place, so a failed unlock never leaves a truncated file.
///
/// # Errors
///
/// Returns [`PdfPressError::WrongPassword`] when the password does not
/// open the document, plus the usual load and write failures.
pub fn unlock_pdf(input: &Path, output: &Path, password: &str) -> Result<UnlockResult> {
    if !input.exists() {
        return Err(PdfPressError::file_not_found(input));
    }

    let mut doc = load_possibly_encrypted(input)?;

    if doc.trailer.get(b"Encrypt").is_err() {
        debug!("{} is not encrypted, copying through", input.display());
        std::fs::copy(input, output).map_err(|e| PdfPressError::failed_to_write(output, e))?;
        return Ok(UnlockResult {
            output_path: output.to_path_buf(),
            was_encrypted: false,
        });
    }

    doc.decrypt(password)
        .map_err(|_| PdfPressError::WrongPassword {
            path: input.to_path_buf(),
        })?;
    doc.trailer.remove(b"Encrypt");

    write_atomic(&mut doc, output)?;
    info!("unlocked {} into {}", input.display(), output.display());

    Ok(UnlockResult {
        output_path: output.to_path_buf(),
        was_encrypted: true,
    })
}

fn load_possibly_encrypted(path: &Path) -> Result<Document> {
    Document::load(path).map_err(|e| PdfPressError::failed_to_load_pdf(path, e.to_string()))
}

fn write_atomic(doc: &mut Document, output: &Path) -> Result<()> {
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir).map_err(|e| PdfPressError::failed_to_write(output, e))?;

    let mut tmp =
        NamedTempFile::new_in(&dir).map_err(|e| PdfPressError::failed_to_write(output, e))?;
    doc.save_to(&mut tmp)
        .map_err(|e| PdfPressError::failed_to_write(output, std::io::Error::other(e.to_string())))?;
    tmp.flush()
        .map_err(|e| PdfPressError::failed_to_write(output, e))?;
    tmp.persist(output)
        .map_err(|e| PdfPressError::failed_to_write(output, e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::fixtures;
    use tempfile::TempDir;

    #[test]
    fn test_unencrypted_input_is_copied_through() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("plain.pdf");
        let output = dir.path().join("unlocked.pdf");
        fixtures::write_pdf(&input, 2);

        let result = unlock_pdf(&input, &output, "irrelevant").unwrap();
        assert!(!result.was_encrypted);
        assert_eq!(result.output_path, output);
        assert_eq!(
            std::fs::read(&input).unwrap(),
            std::fs::read(&output).unwrap()
        );
    }

    #[test]
    fn test_is_encrypted_false_for_plain_pdf() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("plain.pdf");
        fixtures::write_pdf(&input, 1);
        assert!(!is_encrypted(&input).unwrap());
    }

    #[test]
    fn test_missing_input() {
        let dir = TempDir::new().unwrap();
        let err = unlock_pdf(
            &dir.path().join("absent.pdf"),
            &dir.path().join("out.pdf"),
            "pw",
        )
        .unwrap_err();
        assert!(matches!(err, PdfPressError::FileNotFound { .. }));
    }

    #[test]
    fn test_corrupt_input() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("bad.pdf");
        std::fs::write(&input, b"not a pdf").unwrap();

        let err = unlock_pdf(&input, &dir.path().join("out.pdf"), "pw").unwrap_err();
        assert!(matches!(err, PdfPressError::FailedToLoadPdf { .. }));
    }

    #[test]
    fn test_failed_unlock_leaves_no_output() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("bad.pdf");
        let output = dir.path().join("out.pdf");
        std::fs::write(&input, b"not a pdf").unwrap();

        assert!(unlock_pdf(&input, &output, "pw").is_err());
        assert!(!output.exists());
    }
}
