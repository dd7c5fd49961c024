//! Multi-strategy PDF compression.
//!
//! Each [`CompressionStrategy`] is a self-contained way to shrink a PDF.
//! The [`PdfCompressor`] races all of them per file and keeps the
//! smallest output; [`BatchCompressor`] fans that out over many files.

mod batch;
mod combined;
mod compressor;
mod ghostscript;
mod strategy;
mod structural;

pub use batch::{BatchCompressor, CompressionTask};
pub use combined::CombinedStrategy;
pub use compressor::{CompressionOutcome, PdfCompressor};
pub use ghostscript::GhostscriptStrategy;
pub use strategy::{CompressionResult, CompressionStrategy};
pub use structural::StructuralStrategy;
