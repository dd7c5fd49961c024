//! Configuration types shared across subcommands.
//!
//! The main piece here is the [`Quality`] preset, which controls the
//! aggressiveness/fidelity trade-off of the lossy compression stage.

use std::str::FromStr;

use serde::Serialize;

use crate::PdfPressError;

/// Quality preset for lossy compression.
///
/// Each preset maps to a Ghostscript `-dPDFSETTINGS` value controlling
/// the target image resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    /// 72 DPI - aggressive, web viewing.
    Screen,
    /// 150 DPI - balanced.
    Ebook,
    /// 300 DPI - high quality.
    Printer,
    /// 300 DPI - highest quality, color preserving.
    Prepress,
    /// General purpose.
    Default,
}

impl Quality {
    /// Get the preset name as used on the command line and in strategy
    /// identifiers (e.g. `"ghostscript(screen)"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Screen => "screen",
            Self::Ebook => "ebook",
            Self::Printer => "printer",
            Self::Prepress => "prepress",
            Self::Default => "default",
        }
    }

    /// Map the preset to a Ghostscript `-dPDFSETTINGS` value.
    ///
    /// Every preset has a mapping; the most aggressive (`/screen`) is the
    /// catch-all so the external tool never sees an unknown setting.
    pub fn pdf_setting(&self) -> &'static str {
        match self {
            Self::Ebook => "/ebook",
            Self::Printer => "/printer",
            Self::Prepress => "/prepress",
            Self::Default => "/default",
            Self::Screen => "/screen",
        }
    }

    /// All valid preset names, for help text and validation messages.
    pub fn names() -> [&'static str; 5] {
        ["screen", "ebook", "printer", "prepress", "default"]
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self::Ebook
    }
}

impl FromStr for Quality {
    type Err = PdfPressError;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "screen" => Ok(Self::Screen),
            "ebook" => Ok(Self::Ebook),
            "printer" => Ok(Self::Printer),
            "prepress" => Ok(Self::Prepress),
            "default" => Ok(Self::Default),
            _ => Err(PdfPressError::invalid_config(format!(
                "Invalid quality '{s}'. Choose from: {}",
                Self::names().join(", ")
            ))),
        }
    }
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_from_str() {
        assert_eq!(Quality::from_str("screen").unwrap(), Quality::Screen);
        assert_eq!(Quality::from_str("ebook").unwrap(), Quality::Ebook);
        assert_eq!(Quality::from_str("printer").unwrap(), Quality::Printer);
        assert_eq!(Quality::from_str("prepress").unwrap(), Quality::Prepress);
        assert_eq!(Quality::from_str("default").unwrap(), Quality::Default);
        assert_eq!(Quality::from_str("SCREEN").unwrap(), Quality::Screen);
        assert!(Quality::from_str("ultra").is_err());
    }

    #[test]
    fn test_pdf_setting_mapping() {
        assert_eq!(Quality::Screen.pdf_setting(), "/screen");
        assert_eq!(Quality::Ebook.pdf_setting(), "/ebook");
        assert_eq!(Quality::Printer.pdf_setting(), "/printer");
        assert_eq!(Quality::Prepress.pdf_setting(), "/prepress");
        assert_eq!(Quality::Default.pdf_setting(), "/default");
    }

    #[test]
    fn test_display_matches_as_str() {
        assert_eq!(Quality::Ebook.to_string(), "ebook");
        assert_eq!(format!("{}", Quality::Screen), "screen");
    }

    #[test]
    fn test_default_is_ebook() {
        assert_eq!(Quality::default(), Quality::Ebook);
    }
}
