//! Parallel batch compression with bounded concurrency.

use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use futures::stream::{self, StreamExt};
use log::{debug, warn};

use crate::compress::compressor::{CompressionOutcome, PdfCompressor};
use crate::error::Result;
use crate::utils::file_size;

/// One unit of batch work: compress `input`, write the winner to `output`.
#[derive(Debug, Clone)]
pub struct CompressionTask {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl CompressionTask {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }
}

/// Default worker cap; more rarely helps since each task already fans
/// out to subprocesses and blocking threads.
const MAX_DEFAULT_WORKERS: usize = 8;

fn default_workers() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .min(MAX_DEFAULT_WORKERS)
}

/// Fans a list of tasks out over a bounded number of concurrent
/// compressions.
///
/// Each task runs in its own spawned task so a panic in one file's
/// pipeline is contained and reported as an error outcome for that file
/// alone. Results come back indexed by submission order regardless of
/// completion order.
pub struct BatchCompressor {
    compressor: Arc<PdfCompressor>,
    workers: usize,
}

impl BatchCompressor {
    /// Wrap a compressor with the default worker count
    /// (`min(available_parallelism, 8)`).
    pub fn new(compressor: PdfCompressor) -> Self {
        Self::with_workers(compressor, default_workers())
    }

    /// Wrap a compressor with an explicit worker count. Zero is clamped
    /// to one.
    pub fn with_workers(compressor: PdfCompressor, workers: usize) -> Self {
        Self {
            compressor: Arc::new(compressor),
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run every task, at most `workers` at a time.
    ///
    /// `on_complete` fires once per task as it finishes, in completion
    /// order; the returned vector is in submission order. A task whose
    /// pipeline errors or panics contributes an outcome with
    /// `best_strategy == "error"` instead of aborting the batch.
    pub async fn compress_batch<F>(
        &self,
        tasks: Vec<CompressionTask>,
        mut on_complete: F,
    ) -> Result<Vec<CompressionOutcome>>
    where
        F: FnMut(&CompressionOutcome),
    {
        let total = tasks.len();
        debug!("compressing {total} files with {} workers", self.workers);

        let mut slots: Vec<Option<CompressionOutcome>> = Vec::with_capacity(total);
        slots.resize_with(total, || None);

        let mut completions = stream::iter(tasks.into_iter().enumerate().map(|(index, task)| {
            let compressor = Arc::clone(&self.compressor);
            async move {
                let input = task.input.clone();
                let output = task.output.clone();
                let handle = tokio::spawn(async move {
                    compressor.compress(&task.input, &task.output).await
                });
                let outcome = match handle.await {
                    Ok(Ok(outcome)) => outcome,
                    Ok(Err(e)) => {
                        warn!("{}: {e}", input.display());
                        synthesize_error(input, output)
                    }
                    Err(join_err) => {
                        warn!("{}: worker panicked: {join_err}", input.display());
                        synthesize_error(input, output)
                    }
                };
                (index, outcome)
            }
        }))
        .buffer_unordered(self.workers);

        while let Some((index, outcome)) = completions.next().await {
            on_complete(&outcome);
            slots[index] = Some(outcome);
        }
        drop(completions);

        // Every slot was filled exactly once by its own task.
        Ok(slots.into_iter().flatten().collect())
    }
}

/// Outcome recorded for a task whose pipeline died before producing one.
/// The original size is re-read from disk on a best-effort basis.
fn synthesize_error(input: PathBuf, output: PathBuf) -> CompressionOutcome {
    let original_size = file_size(&input);
    CompressionOutcome {
        input_path: input,
        output_path: output,
        original_size,
        final_size: 0,
        best_strategy: "error".to_string(),
        results: Vec::new(),
    }
}
