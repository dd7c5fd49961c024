//! External tool discovery.
//!
//! The lossy compression strategy shells out to Ghostscript. This module
//! locates the executable on `PATH` and produces actionable install hints
//! when it is missing.

use std::env;
use std::path::PathBuf;

use crate::{PdfPressError, Result};

/// Platform-specific Ghostscript binary names, in search order.
pub const GHOSTSCRIPT_NAMES: &[&str] = &["gs", "gswin64c", "gswin32c"];

/// Search `PATH` for the first matching executable among `names`.
pub fn find_executable(names: &[&str]) -> Option<PathBuf> {
    let path_var = env::var_os("PATH")?;

    for dir in env::split_paths(&path_var) {
        for name in names {
            let candidate = dir.join(name);
            if is_executable(&candidate) {
                return Some(candidate);
            }
            #[cfg(windows)]
            {
                let candidate = dir.join(format!("{name}.exe"));
                if is_executable(&candidate) {
                    return Some(candidate);
                }
            }
        }
    }

    None
}

#[cfg(unix)]
fn is_executable(path: &std::path::Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.is_file()
        && std::fs::metadata(path)
            .map(|m| m.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &std::path::Path) -> bool {
    path.is_file()
}

/// Locate the Ghostscript executable.
///
/// # Errors
///
/// Returns [`PdfPressError::ToolMissing`] with install instructions when
/// no candidate binary is found on `PATH`.
pub fn find_ghostscript() -> Result<PathBuf> {
    find_executable(GHOSTSCRIPT_NAMES).ok_or_else(|| PdfPressError::ToolMissing {
        tool: "ghostscript".to_string(),
        hint: install_instructions().to_string(),
    })
}

/// Check for required external dependencies.
///
/// Returns the names of missing dependencies (empty when everything is
/// available).
pub fn check_dependencies() -> Vec<&'static str> {
    let mut missing = Vec::new();

    if find_executable(GHOSTSCRIPT_NAMES).is_none() {
        missing.push("ghostscript");
    }

    missing
}

/// Installation instructions for missing dependencies.
pub fn install_instructions() -> &'static str {
    "Install Ghostscript:\n\
     \x20 macOS:         brew install ghostscript\n\
     \x20 Ubuntu/Debian: apt install ghostscript\n\
     \x20 Fedora/RHEL:   dnf install ghostscript"
}
