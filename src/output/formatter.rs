//! Message formatting and display.
//!
//! Formatted terminal output for compression runs, with quiet and
//! verbose modes and automatic color detection.

use std::io::{self, Write};

use crate::compress::CompressionOutcome;
use crate::utils::format_size;

/// Level of output message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    /// Informational message.
    Info,
    /// Success message.
    Success,
    /// Warning message.
    Warning,
    /// Error message.
    Error,
    /// Debug/verbose message.
    Debug,
}

/// Output formatter with configurable verbosity.
pub struct OutputFormatter {
    /// Whether to suppress non-error output.
    quiet: bool,
    /// Whether to show verbose output.
    verbose: bool,
    /// Whether to use colored output.
    colored: bool,
}

impl OutputFormatter {
    /// Create a new output formatter.
    ///
    /// # Arguments
    ///
    /// * `quiet` - Suppress non-error output
    /// * `verbose` - Show verbose output
    pub fn new(quiet: bool, verbose: bool) -> Self {
        Self {
            quiet,
            verbose,
            colored: Self::should_use_color(),
        }
    }

    /// Create a quiet formatter (only errors).
    pub fn quiet() -> Self {
        Self::new(true, false)
    }

    /// Create a verbose formatter.
    pub fn verbose() -> Self {
        Self::new(false, true)
    }

    /// Detect if colored output should be used.
    ///
    /// Returns true if stdout is a TTY and TERM is set.
    fn should_use_color() -> bool {
        use std::io::IsTerminal;
        io::stdout().is_terminal() && std::env::var("TERM").is_ok()
    }

    /// Print an informational message. Suppressed in quiet mode.
    pub fn info(&self, message: &str) {
        if !self.quiet {
            self.print_message(MessageLevel::Info, message);
        }
    }

    /// Print a success message. Suppressed in quiet mode.
    pub fn success(&self, message: &str) {
        if !self.quiet {
            self.print_message(MessageLevel::Success, message);
        }
    }

    /// Print a warning message. Always displayed, even in quiet mode.
    pub fn warning(&self, message: &str) {
        self.print_message(MessageLevel::Warning, message);
    }

    /// Print an error message. Always displayed.
    pub fn error(&self, message: &str) {
        self.print_message(MessageLevel::Error, message);
    }

    /// Print a debug message. Only displayed in verbose mode.
    pub fn debug(&self, message: &str) {
        if self.verbose {
            self.print_message(MessageLevel::Debug, message);
        }
    }

    /// Print a message with level-appropriate formatting.
    fn print_message(&self, level: MessageLevel, message: &str) {
        let (prefix, color_code) = match level {
            MessageLevel::Info => ("", ""),
            MessageLevel::Success => ("✓ ", "\x1b[32m"), // Green
            MessageLevel::Warning => ("⚠ ", "\x1b[33m"), // Yellow
            MessageLevel::Error => ("✗ ", "\x1b[31m"),   // Red
            MessageLevel::Debug => ("→ ", "\x1b[36m"),   // Cyan
        };

        let reset = "\x1b[0m";

        if self.colored && !color_code.is_empty() {
            println!("{color_code}{prefix}{message}{reset}");
        } else {
            println!("{prefix}{message}");
        }
    }

    /// Print a section header. Suppressed in quiet mode.
    pub fn section(&self, title: &str) {
        if !self.quiet {
            println!("\n{title}");
        }
    }

    /// Print a progress indicator. Suppressed in quiet mode.
    pub fn progress(&self, current: usize, total: usize, message: Option<&str>) {
        if !self.quiet {
            let msg = message.unwrap_or("");
            print!("\r  [{current}/{total}] {msg}");
            io::stdout().flush().ok();

            if current == total {
                println!();
            }
        }
    }

    /// Print a blank line. Suppressed in quiet mode.
    pub fn blank_line(&self) {
        if !self.quiet {
            println!();
        }
    }

    /// One-line report for a finished file.
    pub fn show_outcome(&self, outcome: &CompressionOutcome) {
        let name = outcome
            .input_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| outcome.input_path.display().to_string());

        match outcome.best_strategy.as_str() {
            "error" => {
                self.error(&format!("{name}: compression failed"));
                if self.verbose {
                    for result in &outcome.results {
                        if let Some(msg) = &result.error_message {
                            self.debug(&format!("  {}: {msg}", result.strategy_name));
                        }
                    }
                }
            }
            "none" => {
                self.info(&format!(
                    "{name}: already compact, kept original ({})",
                    format_size(outcome.original_size)
                ));
            }
            strategy => {
                self.success(&format!(
                    "{name}: {} -> {} ({}% smaller, {strategy})",
                    format_size(outcome.original_size),
                    format_size(outcome.final_size),
                    outcome.reduction_percent()
                ));
            }
        }
    }

    /// Batch summary with per-file rows and a totals line.
    pub fn show_summary(&self, outcomes: &[CompressionOutcome]) {
        if self.quiet || outcomes.len() < 2 {
            return;
        }

        let mut total_original: u64 = 0;
        let mut total_final: u64 = 0;
        let mut failures = 0usize;

        self.section("Summary");
        for outcome in outcomes {
            if outcome.succeeded() {
                total_original += outcome.original_size;
                total_final += outcome.final_size;
            } else {
                failures += 1;
            }
        }

        let saved = total_original.saturating_sub(total_final);
        let percent = if total_original > 0 {
            ((saved as f64 / total_original as f64) * 100.0) as i64
        } else {
            0
        };
        println!(
            "  {} files, {} -> {} (saved {}, {percent}%)",
            outcomes.len() - failures,
            format_size(total_original),
            format_size(total_final),
            format_size(saved)
        );
        if failures > 0 {
            self.warning(&format!("{failures} file(s) failed"));
        }
    }

    /// Check if output should be shown.
    pub fn should_print(&self) -> bool {
        !self.quiet
    }

    /// Check if verbose output should be shown.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Check if quiet mode is enabled.
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }
}

impl Default for OutputFormatter {
    fn default() -> Self {
        Self::new(false, false)
    }
}
