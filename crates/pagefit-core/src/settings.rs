//! Print order settings and source document info.
//!
//! These are the document-level options that travel with the recipe. All
//! fields have defaults so a partially filled settings object from the UI
//! deserializes cleanly.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard paper sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PaperSize {
    A3,
    #[default]
    A4,
    A5,
    Letter,
    Legal,
}

impl PaperSize {
    /// Portrait dimensions in millimeters as `(width, height)`.
    pub fn dimensions_mm(self) -> (f64, f64) {
        match self {
            PaperSize::A3 => (297.0, 420.0),
            PaperSize::A4 => (210.0, 297.0),
            PaperSize::A5 => (148.0, 210.0),
            PaperSize::Letter => (215.9, 279.4),
            PaperSize::Legal => (215.9, 355.6),
        }
    }
}

/// Color mode for the print order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Color,
    Grayscale,
}

/// Error returned for an unsupported pages-per-sheet count.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PagesPerSheetError {
    #[error("Pages per sheet must be 1, 2 or 4, got {0}")]
    Unsupported(u8),
}

/// How many logical pages share one physical sheet (N-up).
///
/// Serialized as the page count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PagesPerSheet {
    #[default]
    One,
    Two,
    Four,
}

impl PagesPerSheet {
    pub fn count(self) -> u32 {
        match self {
            PagesPerSheet::One => 1,
            PagesPerSheet::Two => 2,
            PagesPerSheet::Four => 4,
        }
    }

    /// Grid as `(columns, rows)`.
    pub fn grid_dimensions(self) -> (u32, u32) {
        match self {
            PagesPerSheet::One => (1, 1),
            PagesPerSheet::Two => (2, 1),
            PagesPerSheet::Four => (2, 2),
        }
    }
}

impl From<PagesPerSheet> for u8 {
    fn from(value: PagesPerSheet) -> Self {
        value.count() as u8
    }
}

impl TryFrom<u8> for PagesPerSheet {
    type Error = PagesPerSheetError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(PagesPerSheet::One),
            2 => Ok(PagesPerSheet::Two),
            4 => Ok(PagesPerSheet::Four),
            other => Err(PagesPerSheetError::Unsupported(other)),
        }
    }
}

/// Print order options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PrintSettings {
    pub paper_size: PaperSize,
    pub color_mode: ColorMode,
    pub pages_per_sheet: PagesPerSheet,
    /// Number of copies (at least 1)
    pub copies: u32,
}

impl Default for PrintSettings {
    fn default() -> Self {
        Self {
            paper_size: PaperSize::A4,
            color_mode: ColorMode::Color,
            pages_per_sheet: PagesPerSheet::One,
            copies: 1,
        }
    }
}

impl PrintSettings {
    /// Copy with out-of-range values clamped (zero copies becomes one).
    pub fn normalized(&self) -> Self {
        Self {
            copies: self.copies.max(1),
            ..self.clone()
        }
    }
}

/// The uploaded document the recipe applies to.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceInfo {
    pub file_name: String,
    /// Size in bytes
    pub file_size: u64,
    pub total_pages: u32,
}

impl SourceInfo {
    pub fn new(file_name: impl Into<String>, file_size: u64, total_pages: u32) -> Self {
        Self {
            file_name: file_name.into(),
            file_size,
            total_pages,
        }
    }
}
