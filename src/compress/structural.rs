//! Lossless structural optimization strategy.
//!
//! Reopens the document through lopdf and re-serializes it with every
//! structural optimization the library offers: stream recompression,
//! pruning and deduplication of unreferenced objects, and renumbering for
//! a dense cross-reference table. Visible content is never altered.

use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use lopdf::Document;

use crate::compress::strategy::{CompressionResult, CompressionStrategy, discard_partial_output};
use crate::config::Quality;
use crate::utils::file_size;

/// Lossless PDF optimization via lopdf.
///
/// Best as a safe baseline: it never degrades quality, so it is always
/// worth racing against the lossy strategies.
#[derive(Debug, Clone, Default)]
pub struct StructuralStrategy;

impl StructuralStrategy {
    /// Create the strategy. Infallible: no external tool is involved.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CompressionStrategy for StructuralStrategy {
    fn name(&self) -> &str {
        "structural"
    }

    async fn compress(&self, input: &Path, output: &Path, _quality: Quality) -> CompressionResult {
        let original_size = file_size(input);
        let input = input.to_path_buf();
        let output = output.to_path_buf();
        let out_for_result = output.clone();

        // Pure CPU work; keep it off the async runtime.
        let optimized =
            tokio::task::spawn_blocking(move || optimize_document(&input, &output)).await;

        match optimized {
            Ok(Ok(())) => {
                let compressed_size = file_size(&out_for_result);
                CompressionResult::succeeded(
                    &out_for_result,
                    original_size,
                    compressed_size,
                    self.name(),
                )
            }
            Ok(Err(message)) => {
                discard_partial_output(&out_for_result);
                CompressionResult::failed(original_size, self.name(), message)
            }
            Err(join_err) => {
                discard_partial_output(&out_for_result);
                CompressionResult::failed(
                    original_size,
                    self.name(),
                    format!("optimization task failed: {join_err}"),
                )
            }
        }
    }
}

/// Load, optimize, and rewrite one document. Returns a message on failure.
fn optimize_document(input: &PathBuf, output: &PathBuf) -> Result<(), String> {
    let mut doc =
        Document::load(input).map_err(|e| format!("failed to load PDF: {e}"))?;

    if doc.trailer.get(b"Encrypt").is_ok() {
        return Err("PDF is encrypted; unlock it first".to_string());
    }

    doc.prune_objects();
    doc.renumber_objects();
    doc.compress();

    write_document(&mut doc, output).map_err(|e| format!("failed to write output: {e}"))
}

fn write_document(doc: &mut Document, path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let file = std::fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    doc.save_to(&mut writer)
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    writer.flush()
}
