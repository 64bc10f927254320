//! N-up sheet layout.
//!
//! In sheet mode several logical pages share one physical sheet. Each page is
//! fit into its own slot, so the transform engine needs the slot's aspect
//! ratio rather than the sheet's. Two-up sheets are laid out landscape with
//! the pages side by side; one-up and four-up sheets stay portrait.

use serde::{Deserialize, Serialize};

use crate::settings::{PagesPerSheet, PaperSize, PrintSettings};

/// Where a page lands on the printed output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotPosition {
    /// Zero-based sheet index
    pub sheet: u32,
    pub column: u32,
    pub row: u32,
}

/// Grid geometry of one printed sheet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetLayout {
    pub paper_size: PaperSize,
    pub pages_per_sheet: PagesPerSheet,
}

impl SheetLayout {
    pub fn new(paper_size: PaperSize, pages_per_sheet: PagesPerSheet) -> Self {
        Self {
            paper_size,
            pages_per_sheet,
        }
    }

    pub fn from_settings(settings: &PrintSettings) -> Self {
        Self::new(settings.paper_size, settings.pages_per_sheet)
    }

    /// Sheet dimensions in millimeters with orientation applied.
    pub fn sheet_dimensions_mm(&self) -> (f64, f64) {
        let (w, h) = self.paper_size.dimensions_mm();
        match self.pages_per_sheet {
            PagesPerSheet::Two => (h, w),
            PagesPerSheet::One | PagesPerSheet::Four => (w, h),
        }
    }

    /// Width over height of the whole sheet.
    pub fn sheet_aspect_ratio(&self) -> f64 {
        let (w, h) = self.sheet_dimensions_mm();
        w / h
    }

    /// Width over height of one page slot.
    pub fn slot_aspect_ratio(&self) -> f64 {
        let (cols, rows) = self.pages_per_sheet.grid_dimensions();
        let (w, h) = self.sheet_dimensions_mm();
        (w / cols as f64) / (h / rows as f64)
    }

    /// Slot for a 1-based page number. Page 0 is treated as page 1.
    pub fn slot_for_page(&self, page_number: u32) -> SlotPosition {
        let per_sheet = self.pages_per_sheet.count();
        let (cols, _) = self.pages_per_sheet.grid_dimensions();
        let index = page_number.saturating_sub(1);
        let within = index % per_sheet;

        SlotPosition {
            sheet: index / per_sheet,
            column: within % cols,
            row: within / cols,
        }
    }

    /// Number of sheets needed for `total_pages`.
    pub fn sheet_count(&self, total_pages: u32) -> u32 {
        total_pages.div_ceil(self.pages_per_sheet.count())
    }
}
