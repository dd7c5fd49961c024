//! Strategy orchestrator: race every strategy, keep the smallest result.

use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::Serialize;
use tempfile::TempDir;

use crate::compress::combined::CombinedStrategy;
use crate::compress::ghostscript::GhostscriptStrategy;
use crate::compress::strategy::{CompressionResult, CompressionStrategy};
use crate::compress::structural::StructuralStrategy;
use crate::config::Quality;
use crate::error::{PdfPressError, Result};
use crate::utils::file_size;

/// Final verdict for one input file after all strategies have run.
#[derive(Debug, Clone, Serialize)]
pub struct CompressionOutcome {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub original_size: u64,
    pub final_size: u64,
    /// Winning strategy name, or `"none"` when no strategy improved on
    /// the original (including when every strategy failed). `"error"` is
    /// reserved for outcomes the batch executor synthesizes for crashed
    /// workers.
    pub best_strategy: String,
    /// One entry per attempted strategy, in registration order.
    pub results: Vec<CompressionResult>,
}

impl CompressionOutcome {
    /// True unless this outcome was synthesized for a crashed worker.
    pub fn succeeded(&self) -> bool {
        self.best_strategy != "error"
    }

    /// Fraction of the original size that was shaved off.
    pub fn reduction_ratio(&self) -> f64 {
        if self.original_size == 0 {
            return 0.0;
        }
        1.0 - (self.final_size as f64 / self.original_size as f64)
    }

    /// Whole-number reduction percentage, truncated toward zero.
    pub fn reduction_percent(&self) -> i64 {
        (self.reduction_ratio() * 100.0) as i64
    }
}

/// A registered strategy, or a placeholder for one whose construction
/// failed (typically a missing external tool). Placeholders still report
/// a per-file failure so the outcome lists every configured strategy.
enum StrategySlot {
    Ready(Box<dyn CompressionStrategy>),
    Unavailable { name: &'static str, reason: String },
}

impl StrategySlot {
    fn name(&self) -> &str {
        match self {
            StrategySlot::Ready(s) => s.name(),
            StrategySlot::Unavailable { name, .. } => name,
        }
    }
}

/// Runs every registered strategy against an input and picks the best.
///
/// Strategies write into private slots inside a per-call temporary
/// directory; only the winner is copied to the caller's output path, so
/// a failed run never clobbers an existing file.
pub struct PdfCompressor {
    strategies: Vec<StrategySlot>,
    quality: Quality,
}

impl PdfCompressor {
    /// Build a compressor with the standard strategy lineup: structural,
    /// ghostscript, combined. Strategies whose tools are missing are kept
    /// as unavailable placeholders rather than aborting construction, as
    /// long as at least one strategy is usable.
    ///
    /// # Errors
    ///
    /// Returns [`PdfPressError::ToolMissing`] only when no strategy at
    /// all can run, which cannot happen with the current lineup since the
    /// structural strategy has no external dependency.
    pub fn new(quality: Quality) -> Result<Self> {
        let mut strategies: Vec<StrategySlot> =
            vec![StrategySlot::Ready(Box::new(StructuralStrategy::new()))];

        match GhostscriptStrategy::new() {
            Ok(gs) => {
                strategies.push(StrategySlot::Ready(Box::new(gs.clone())));
                strategies.push(StrategySlot::Ready(Box::new(
                    CombinedStrategy::with_ghostscript(gs),
                )));
            }
            Err(e) => {
                warn!("ghostscript unavailable, lossy strategies disabled: {e}");
                strategies.push(StrategySlot::Unavailable {
                    name: "ghostscript",
                    reason: e.to_string(),
                });
                strategies.push(StrategySlot::Unavailable {
                    name: "combined",
                    reason: e.to_string(),
                });
            }
        }

        Self::from_slots(strategies, quality)
    }

    /// Build a compressor from an explicit strategy list.
    pub fn with_strategies(
        strategies: Vec<Box<dyn CompressionStrategy>>,
        quality: Quality,
    ) -> Result<Self> {
        Self::from_slots(strategies.into_iter().map(StrategySlot::Ready).collect(), quality)
    }

    fn from_slots(strategies: Vec<StrategySlot>, quality: Quality) -> Result<Self> {
        if !strategies
            .iter()
            .any(|s| matches!(s, StrategySlot::Ready(_)))
        {
            return Err(PdfPressError::invalid_config(
                "no usable compression strategies",
            ));
        }
        Ok(Self { strategies, quality })
    }

    /// Names of the registered strategies, in the order they run.
    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Compress one file, trying every strategy and keeping the smallest
    /// successful output. When nothing beats the original, the original
    /// is copied to `output` unchanged and the outcome says `"none"`.
    ///
    /// # Errors
    ///
    /// Fails fast on a missing or unreadable input, or when the winning
    /// result cannot be copied into place. Individual strategy failures
    /// are recorded in the outcome, not returned as errors.
    pub async fn compress(&self, input: &Path, output: &Path) -> Result<CompressionOutcome> {
        if !input.exists() {
            return Err(PdfPressError::file_not_found(input));
        }
        if !input.is_file() {
            return Err(PdfPressError::not_a_file(input));
        }

        let original_size = file_size(input);
        let workspace = TempDir::new()?;

        let mut results = Vec::with_capacity(self.strategies.len());
        let mut best: Option<(usize, u64)> = None;
        let mut best_size = original_size;

        for (i, slot) in self.strategies.iter().enumerate() {
            let result = match slot {
                StrategySlot::Ready(strategy) => {
                    let slot_path = workspace.path().join(format!("strategy_{i}.pdf"));
                    debug!("trying strategy {} on {}", strategy.name(), input.display());
                    strategy.compress(input, &slot_path, self.quality).await
                }
                StrategySlot::Unavailable { name, reason } => {
                    CompressionResult::failed(original_size, *name, reason.clone())
                }
            };

            if result.success && result.compressed_size < best_size {
                best_size = result.compressed_size;
                best = Some((i, result.compressed_size));
            }
            results.push(result);
        }

        if results.iter().all(|r| !r.success) {
            warn!("all strategies failed for {}", input.display());
        }

        let (best_strategy, final_size) = match best {
            Some((index, size)) => {
                let slot_path = workspace.path().join(format!("strategy_{index}.pdf"));
                copy_into_place(&slot_path, output)?;
                (results[index].strategy_name.clone(), size)
            }
            None => {
                // No strategy beat the original, whether by producing a
                // larger file or by failing outright; pass it through.
                copy_into_place(input, output)?;
                ("none".to_string(), original_size)
            }
        };

        info!(
            "{}: {} -> {} bytes via {}",
            input.display(),
            original_size,
            final_size,
            best_strategy
        );

        Ok(CompressionOutcome {
            input_path: input.to_path_buf(),
            output_path: output.to_path_buf(),
            original_size,
            final_size,
            best_strategy,
            results,
        })
    }
}

fn copy_into_place(from: &Path, to: &Path) -> Result<()> {
    // In-place pass-through: the original is already where it belongs,
    // and copying a file onto itself would truncate it.
    if from == to {
        return Ok(());
    }
    if let Some(parent) = to.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .map_err(|e| PdfPressError::failed_to_write(to, e))?;
    }
    std::fs::copy(from, to).map_err(|e| PdfPressError::failed_to_write(to, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::fixtures;
    use async_trait::async_trait;
    use tempfile::TempDir;

    /// Test double that writes a fixed number of bytes, or fails.
    struct FixedSizeStrategy {
        name: &'static str,
        size: Option<u64>,
    }

    #[async_trait]
    impl CompressionStrategy for FixedSizeStrategy {
        fn name(&self) -> &str {
            self.name
        }

        async fn compress(
            &self,
            input: &Path,
            output: &Path,
            _quality: Quality,
        ) -> CompressionResult {
            let original = file_size(input);
            match self.size {
                Some(size) => {
                    std::fs::write(output, vec![0u8; size as usize]).unwrap();
                    CompressionResult::succeeded(output, original, size, self.name)
                }
                None => CompressionResult::failed(original, self.name, "forced failure"),
            }
        }
    }

    fn compressor(specs: Vec<(&'static str, Option<u64>)>) -> PdfCompressor {
        let strategies = specs
            .into_iter()
            .map(|(name, size)| {
                Box::new(FixedSizeStrategy { name, size }) as Box<dyn CompressionStrategy>
            })
            .collect();
        PdfCompressor::with_strategies(strategies, Quality::Ebook).unwrap()
    }

    #[tokio::test]
    async fn test_smallest_successful_result_wins() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("input.pdf");
        let output = dir.path().join("output.pdf");
        fixtures::write_pdf(&input, 1);

        let c = compressor(vec![("a", Some(500)), ("b", Some(100)), ("c", Some(300))]);
        let outcome = c.compress(&input, &output).await.unwrap();

        assert_eq!(outcome.best_strategy, "b");
        assert_eq!(outcome.final_size, 100);
        assert_eq!(file_size(&output), 100);
        assert_eq!(outcome.results.len(), 3);
    }

    #[tokio::test]
    async fn test_tie_goes_to_first_registered() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("input.pdf");
        let output = dir.path().join("output.pdf");
        fixtures::write_pdf(&input, 1);

        let c = compressor(vec![("first", Some(100)), ("second", Some(100))]);
        let outcome = c.compress(&input, &output).await.unwrap();

        assert_eq!(outcome.best_strategy, "first");
    }

    #[tokio::test]
    async fn test_no_improvement_copies_original() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("input.pdf");
        let output = dir.path().join("output.pdf");
        fixtures::write_pdf(&input, 1);
        let original_size = file_size(&input);

        // Every strategy produces something at least as large.
        let c = compressor(vec![
            ("bloat", Some(original_size * 2)),
            ("same", Some(original_size)),
        ]);
        let outcome = c.compress(&input, &output).await.unwrap();

        assert_eq!(outcome.best_strategy, "none");
        assert_eq!(outcome.final_size, original_size);
        assert_eq!(file_size(&output), original_size);
        assert_eq!(
            std::fs::read(&input).unwrap(),
            std::fs::read(&output).unwrap()
        );
    }

    #[tokio::test]
    async fn test_no_improvement_in_place_keeps_input_intact() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("input.pdf");
        fixtures::write_pdf(&input, 1);
        let before = std::fs::read(&input).unwrap();
        let original_size = before.len() as u64;

        let c = compressor(vec![("bloat", Some(original_size + 100))]);
        let outcome = c.compress(&input, &input).await.unwrap();

        assert_eq!(outcome.best_strategy, "none");
        assert_eq!(std::fs::read(&input).unwrap(), before);
    }

    #[tokio::test]
    async fn test_all_failures_copy_original_as_none() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("input.pdf");
        let output = dir.path().join("output.pdf");
        fixtures::write_pdf(&input, 1);

        let c = compressor(vec![("a", None), ("b", None)]);
        let outcome = c.compress(&input, &output).await.unwrap();

        assert_eq!(outcome.best_strategy, "none");
        assert_eq!(outcome.final_size, outcome.original_size);
        assert!(outcome.succeeded());
        assert_eq!(
            std::fs::read(&input).unwrap(),
            std::fs::read(&output).unwrap()
        );
        assert!(outcome.results.iter().all(|r| !r.success));
    }

    #[tokio::test]
    async fn test_failures_do_not_mask_a_winner() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("input.pdf");
        let output = dir.path().join("output.pdf");
        fixtures::write_pdf(&input, 1);

        let c = compressor(vec![("broken", None), ("works", Some(50))]);
        let outcome = c.compress(&input, &output).await.unwrap();

        assert_eq!(outcome.best_strategy, "works");
        assert_eq!(outcome.final_size, 50);
        assert!(outcome.succeeded());
    }

    #[tokio::test]
    async fn test_missing_input_is_an_error() {
        let dir = TempDir::new().unwrap();
        let c = compressor(vec![("a", Some(10))]);
        let err = c
            .compress(&dir.path().join("absent.pdf"), &dir.path().join("out.pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, PdfPressError::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn test_empty_strategy_list_rejected() {
        assert!(PdfCompressor::with_strategies(Vec::new(), Quality::Ebook).is_err());
    }

    #[test]
    fn test_outcome_reduction_percent_truncates() {
        let outcome = CompressionOutcome {
            input_path: PathBuf::from("a.pdf"),
            output_path: PathBuf::from("b.pdf"),
            original_size: 3,
            final_size: 1,
            best_strategy: "x".to_string(),
            results: Vec::new(),
        };
        assert_eq!(outcome.reduction_percent(), 66);
    }
}
