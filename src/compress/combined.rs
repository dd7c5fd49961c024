//! Two-stage pipeline: Ghostscript first, then structural cleanup.
//!
//! The lossy pass shrinks images, the lossless pass then squeezes the
//! structure Ghostscript leaves behind. Often beats either stage alone.

use std::path::Path;

use async_trait::async_trait;
use tempfile::TempDir;

use crate::compress::ghostscript::GhostscriptStrategy;
use crate::compress::strategy::{CompressionResult, CompressionStrategy};
use crate::compress::structural::StructuralStrategy;
use crate::config::Quality;
use crate::error::Result;
use crate::utils::file_size;

/// Ghostscript followed by structural optimization.
#[derive(Debug, Clone)]
pub struct CombinedStrategy {
    ghostscript: GhostscriptStrategy,
    structural: StructuralStrategy,
}

impl CombinedStrategy {
    /// Build the pipeline.
    ///
    /// # Errors
    ///
    /// Fails when Ghostscript cannot be found, same as
    /// [`GhostscriptStrategy::new`].
    pub fn new() -> Result<Self> {
        Ok(Self {
            ghostscript: GhostscriptStrategy::new()?,
            structural: StructuralStrategy::new(),
        })
    }

    /// Build the pipeline around a pre-constructed Ghostscript stage.
    pub fn with_ghostscript(ghostscript: GhostscriptStrategy) -> Self {
        Self {
            ghostscript,
            structural: StructuralStrategy::new(),
        }
    }
}

#[async_trait]
impl CompressionStrategy for CombinedStrategy {
    fn name(&self) -> &str {
        "combined"
    }

    async fn compress(&self, input: &Path, output: &Path, quality: Quality) -> CompressionResult {
        let original_size = file_size(input);

        let staging = match TempDir::new() {
            Ok(dir) => dir,
            Err(e) => {
                return CompressionResult::failed(
                    original_size,
                    self.name(),
                    format!("failed to create staging directory: {e}"),
                );
            }
        };
        let intermediate = staging.path().join("lossy.pdf");

        let first = self
            .ghostscript
            .compress(input, &intermediate, quality)
            .await;
        if !first.success {
            let reason = first.error_message.unwrap_or_else(|| "unknown".to_string());
            return CompressionResult::failed(
                original_size,
                self.name(),
                format!("ghostscript stage failed: {reason}"),
            );
        }

        let second = self
            .structural
            .compress(&intermediate, output, quality)
            .await;
        if !second.success {
            let reason = second
                .error_message
                .unwrap_or_else(|| "unknown".to_string());
            return CompressionResult::failed(
                original_size,
                self.name(),
                format!("structural stage failed: {reason}"),
            );
        }

        // Sizes are measured against the caller's original, not the
        // intermediate the second stage saw.
        CompressionResult::succeeded(
            output,
            original_size,
            file_size(output),
            &format!("combined({quality})"),
        )
    }
}
