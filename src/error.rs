//! Error types for pdfpress.
//!
//! Strategy, orchestrator, and batch-executor boundaries never propagate
//! errors as `Err`; they report failures as data inside result objects.
//! This error type covers everything outside those boundaries: argument
//! validation, file access, and the linear merge/split/unlock operations.

use std::io;
use std::path::PathBuf;

/// Result type alias for pdfpress operations.
pub type Result<T> = std::result::Result<T, PdfPressError>;

/// Main error type for pdfpress operations.
#[derive(Debug, thiserror::Error)]
pub enum PdfPressError {
    /// An external tool required by a compression strategy is not installed.
    #[error("{tool} not found on PATH\n{hint}")]
    ToolMissing { tool: String, hint: String },

    /// Input file was not found.
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Input path exists but is not a regular file.
    #[error("Not a file: {path}")]
    NotAFile { path: PathBuf },

    /// Failed to load a PDF document.
    #[error("Failed to load PDF: {path}\n  Reason: {reason}")]
    FailedToLoadPdf { path: PathBuf, reason: String },

    /// PDF is encrypted and the operation cannot proceed without a password.
    #[error("PDF is encrypted: {path}\n  Hint: run 'pdfpress unlock' first")]
    EncryptedPdf { path: PathBuf },

    /// Supplied password does not decrypt the document.
    #[error("Incorrect password for: {path}")]
    WrongPassword { path: PathBuf },

    /// Output could not be created or written.
    #[error("Failed to write output: {path}\n  Reason: {source}")]
    FailedToWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Page specification string could not be parsed.
    #[error("Invalid page specification '{spec}': {details}")]
    InvalidPageSpec { spec: String, details: String },

    /// Invalid combination of command-line options.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Failed to parse a glob pattern.
    #[error("Failed to parse glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// Failed to process a glob entry.
    #[error("Failed to process glob entry: {0}")]
    Glob(#[from] glob::GlobError),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Generic error with a custom message.
    #[error("{0}")]
    Other(String),
}

impl PdfPressError {
    /// Create a FileNotFound error.
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a NotAFile error.
    pub fn not_a_file(path: impl Into<PathBuf>) -> Self {
        Self::NotAFile { path: path.into() }
    }

    /// Create a FailedToLoadPdf error.
    pub fn failed_to_load_pdf(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::FailedToLoadPdf {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FailedToWrite error.
    pub fn failed_to_write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::FailedToWrite {
            path: path.into(),
            source,
        }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an InvalidPageSpec error.
    pub fn invalid_page_spec(spec: impl Into<String>, details: impl Into<String>) -> Self {
        Self::InvalidPageSpec {
            spec: spec.into(),
            details: details.into(),
        }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidConfig { .. } | Self::InvalidPageSpec { .. } | Self::Other(_) => 1,
            Self::FileNotFound { .. }
            | Self::NotAFile { .. }
            | Self::Pattern(_)
            | Self::Glob(_) => 2,
            Self::FailedToLoadPdf { .. }
            | Self::EncryptedPdf { .. }
            | Self::WrongPassword { .. } => 3,
            Self::ToolMissing { .. } => 4,
            Self::FailedToWrite { .. } | Self::Io(_) => 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_not_found_display() {
        let err = PdfPressError::file_not_found("/tmp/missing.pdf");
        let msg = format!("{err}");
        assert!(msg.contains("File not found"));
        assert!(msg.contains("missing.pdf"));
    }

    #[test]
    fn test_failed_to_load_pdf_display() {
        let err = PdfPressError::failed_to_load_pdf("bad.pdf", "Invalid PDF header");
        let msg = format!("{err}");
        assert!(msg.contains("Failed to load PDF"));
        assert!(msg.contains("bad.pdf"));
        assert!(msg.contains("Invalid PDF header"));
    }

    #[test]
    fn test_tool_missing_display() {
        let err = PdfPressError::ToolMissing {
            tool: "ghostscript".to_string(),
            hint: "apt install ghostscript".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("ghostscript not found"));
        assert!(msg.contains("apt install"));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(PdfPressError::invalid_config("x").exit_code(), 1);
        assert_eq!(PdfPressError::file_not_found("x").exit_code(), 2);
        assert_eq!(
            PdfPressError::failed_to_load_pdf("x", "error").exit_code(),
            3
        );
        assert_eq!(
            PdfPressError::ToolMissing {
                tool: "gs".into(),
                hint: String::new(),
            }
            .exit_code(),
            4
        );
        assert_eq!(
            PdfPressError::Io(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
                .exit_code(),
            5
        );
    }

    #[test]
    fn test_from_io_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "not found");
        let err: PdfPressError = io_err.into();
        assert!(matches!(err, PdfPressError::Io(_)));
    }
}
