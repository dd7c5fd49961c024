//! Lossy compression strategy backed by the Ghostscript CLI.
//!
//! Rewrites the document through the `pdfwrite` device with a quality
//! preset controlling image downsampling. This is where the big wins on
//! scan-heavy documents come from, at the cost of image fidelity.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use tokio::process::Command;

use crate::compress::strategy::{CompressionResult, CompressionStrategy, discard_partial_output};
use crate::config::Quality;
use crate::deps::find_ghostscript;
use crate::error::Result;
use crate::utils::file_size;

/// Hard cap on a single Ghostscript invocation.
const GS_TIMEOUT: Duration = Duration::from_secs(300);

/// Lossy PDF compression via an external Ghostscript process.
#[derive(Debug, Clone)]
pub struct GhostscriptStrategy {
    executable: PathBuf,
    timeout: Duration,
}

impl GhostscriptStrategy {
    /// Locate Ghostscript on `PATH` and build the strategy.
    ///
    /// # Errors
    ///
    /// Returns [`PdfPressError::ToolMissing`](crate::error::PdfPressError::ToolMissing)
    /// when no Ghostscript executable can be found.
    pub fn new() -> Result<Self> {
        Ok(Self {
            executable: find_ghostscript()?,
            timeout: GS_TIMEOUT,
        })
    }

    /// Build the strategy around a specific executable, bypassing the
    /// `PATH` search. Used by tests to substitute a fake binary.
    pub fn with_path(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            timeout: GS_TIMEOUT,
        }
    }

    /// Override the invocation timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn build_command(&self, input: &Path, output: &Path, quality: Quality) -> Command {
        let mut cmd = Command::new(&self.executable);
        cmd.arg("-sDEVICE=pdfwrite")
            .arg("-dCompatibilityLevel=1.4")
            .arg(format!("-dPDFSETTINGS={}", quality.pdf_setting()))
            .arg("-dNOPAUSE")
            .arg("-dQUIET")
            .arg("-dBATCH")
            .arg("-dDetectDuplicateImages=true")
            .arg("-dCompressFonts=true")
            .arg("-dSubsetFonts=true")
            .arg(format!("-sOutputFile={}", output.display()))
            .arg(input)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl CompressionStrategy for GhostscriptStrategy {
    fn name(&self) -> &str {
        "ghostscript"
    }

    async fn compress(&self, input: &Path, output: &Path, quality: Quality) -> CompressionResult {
        let original_size = file_size(input);
        let mut cmd = self.build_command(input, output, quality);
        debug!(
            "running {} on {} (quality {})",
            self.executable.display(),
            input.display(),
            quality
        );

        let child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                return CompressionResult::failed(
                    original_size,
                    self.name(),
                    format!("failed to start ghostscript: {e}"),
                );
            }
        };

        match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(out)) if out.status.success() => {
                let compressed_size = file_size(output);
                CompressionResult::succeeded(
                    output,
                    original_size,
                    compressed_size,
                    &format!("ghostscript({quality})"),
                )
            }
            Ok(Ok(out)) => {
                discard_partial_output(output);
                let stderr = String::from_utf8_lossy(&out.stderr);
                CompressionResult::failed(
                    original_size,
                    self.name(),
                    format!("ghostscript error: {}", stderr.trim()),
                )
            }
            Ok(Err(e)) => {
                discard_partial_output(output);
                CompressionResult::failed(
                    original_size,
                    self.name(),
                    format!("ghostscript error: {e}"),
                )
            }
            Err(_) => {
                // kill_on_drop reaps the child when the future is dropped.
                discard_partial_output(output);
                CompressionResult::failed(
                    original_size,
                    self.name(),
                    "ghostscript timeout exceeded (5 minutes)".to_string(),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[cfg(unix)]
    fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();
        path
    }

    /// Fake gs that copies the input to the -sOutputFile= destination.
    #[cfg(unix)]
    fn fake_gs_ok(dir: &Path) -> PathBuf {
        write_script(
            dir,
            "gs-ok",
            r#"out=""
in=""
for a in "$@"; do
  case "$a" in
    -sOutputFile=*) out="${a#-sOutputFile=}" ;;
    -*) ;;
    *) in="$a" ;;
  esac
done
cp "$in" "$out""#,
        )
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_success_reports_quality_in_name() {
        let dir = TempDir::new().unwrap();
        let gs = fake_gs_ok(dir.path());
        let input = dir.path().join("input.pdf");
        let output = dir.path().join("output.pdf");
        std::fs::write(&input, b"%PDF-1.4 fake body").unwrap();

        let strategy = GhostscriptStrategy::with_path(&gs);
        let result = strategy.compress(&input, &output, Quality::Screen).await;

        assert!(result.success, "{:?}", result.error_message);
        assert_eq!(result.strategy_name, "ghostscript(screen)");
        assert_eq!(result.compressed_size, result.original_size);
        assert!(output.exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit_captures_stderr() {
        let dir = TempDir::new().unwrap();
        let gs = write_script(dir.path(), "gs-fail", "echo 'boom: bad xref' >&2\nexit 1");
        let input = dir.path().join("input.pdf");
        let output = dir.path().join("output.pdf");
        std::fs::write(&input, b"%PDF-1.4").unwrap();

        let strategy = GhostscriptStrategy::with_path(&gs);
        let result = strategy.compress(&input, &output, Quality::Ebook).await;

        assert!(!result.success);
        assert_eq!(result.strategy_name, "ghostscript");
        let msg = result.error_message.unwrap();
        assert!(msg.starts_with("ghostscript error:"), "{msg}");
        assert!(msg.contains("boom: bad xref"), "{msg}");
        assert!(!output.exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout_kills_process() {
        let dir = TempDir::new().unwrap();
        let gs = write_script(dir.path(), "gs-hang", "sleep 30");
        let input = dir.path().join("input.pdf");
        let output = dir.path().join("output.pdf");
        std::fs::write(&input, b"%PDF-1.4").unwrap();

        let strategy =
            GhostscriptStrategy::with_path(&gs).with_timeout(Duration::from_millis(200));
        let result = strategy.compress(&input, &output, Quality::Ebook).await;

        assert!(!result.success);
        assert_eq!(
            result.error_message.as_deref(),
            Some("ghostscript timeout exceeded (5 minutes)")
        );
    }

    #[tokio::test]
    async fn test_missing_executable_fails_to_spawn() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("input.pdf");
        let output = dir.path().join("output.pdf");
        std::fs::write(&input, b"%PDF-1.4").unwrap();

        let strategy = GhostscriptStrategy::with_path(dir.path().join("no-such-gs"));
        let result = strategy.compress(&input, &output, Quality::Ebook).await;

        assert!(!result.success);
        assert!(
            result
                .error_message
                .unwrap()
                .starts_with("failed to start ghostscript:")
        );
    }
}
