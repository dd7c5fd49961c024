//! The compression strategy contract.
//!
//! Every compression technique implements the same shape: take an input
//! file, an output slot, and a quality preset, and report what happened.
//! Failures never cross the boundary as errors: a strategy that cannot
//! produce output returns a failed [`CompressionResult`] carrying a
//! human-readable message, and leaves no partial file at the output path.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;

use crate::config::Quality;

/// Result of a single compression attempt by one strategy.
///
/// Invariants: `output_path` is `Some` if and only if `success` is true;
/// `compressed_size` is 0 when the attempt failed.
#[derive(Debug, Clone, Serialize)]
pub struct CompressionResult {
    /// Whether the strategy produced a valid output file.
    pub success: bool,
    /// Location of the compressed output (present iff `success`).
    pub output_path: Option<PathBuf>,
    /// Size of the input file in bytes.
    pub original_size: u64,
    /// Size of the compressed output in bytes (0 when failed).
    pub compressed_size: u64,
    /// Strategy identifier, e.g. `"ghostscript(screen)"`.
    pub strategy_name: String,
    /// Human-readable failure description (present iff not `success`).
    pub error_message: Option<String>,
}

impl CompressionResult {
    /// Build a successful result.
    pub fn succeeded(
        output_path: &Path,
        original_size: u64,
        compressed_size: u64,
        strategy_name: impl Into<String>,
    ) -> Self {
        Self {
            success: true,
            output_path: Some(output_path.to_path_buf()),
            original_size,
            compressed_size,
            strategy_name: strategy_name.into(),
            error_message: None,
        }
    }

    /// Build a failed result.
    pub fn failed(
        original_size: u64,
        strategy_name: impl Into<String>,
        error_message: impl Into<String>,
    ) -> Self {
        Self {
            success: false,
            output_path: None,
            original_size,
            compressed_size: 0,
            strategy_name: strategy_name.into(),
            error_message: Some(error_message.into()),
        }
    }

    /// Reduction ratio in `0.0..=1.0` (0 when the original size is 0).
    pub fn reduction_ratio(&self) -> f64 {
        if self.original_size == 0 {
            return 0.0;
        }
        1.0 - (self.compressed_size as f64 / self.original_size as f64)
    }

    /// Reduction percentage, truncated toward zero.
    ///
    /// Truncation (not rounding) is deliberate: display output and the
    /// summary table rely on it.
    pub fn reduction_percent(&self) -> i64 {
        (self.reduction_ratio() * 100.0) as i64
    }
}

/// A self-contained compression technique.
///
/// Implementations must be safe to run concurrently against different
/// files; they hold no mutable state across calls.
#[async_trait]
pub trait CompressionStrategy: Send + Sync {
    /// Short identifier used for registration and error reporting.
    fn name(&self) -> &str;

    /// Compress `input` into `output`.
    ///
    /// The caller guarantees that `input` exists and that `output`'s
    /// parent directory exists. On success a complete, valid file exists
    /// at `output`; on failure no file is left there.
    async fn compress(&self, input: &Path, output: &Path, quality: Quality) -> CompressionResult;
}

/// Remove a possibly-partial output file, ignoring errors.
///
/// Strategies call this on their failure paths to uphold the "no partial
/// file at the destination" guarantee.
pub(crate) fn discard_partial_output(output: &Path) {
    if output.exists() {
        let _ = std::fs::remove_file(output);
    }
}
