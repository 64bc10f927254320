//! One open document.
//!
//! A [`Document`] owns the page store for a single upload together with the
//! print order options. There is exactly one per open document, so "apply to
//! all pages", "reset all" and export all see the same state.

use chrono::{DateTime, Utc};

use crate::constants::MIN_CROP_FRACTION;
use crate::edit::{apply_edit, apply_edits, EditCommand, EditScope};
use crate::geometry::{crop_from_gesture, handles_for_crop, ScreenView};
use crate::layout::SheetLayout;
use crate::model::{CropBox, PageDimensions};
use crate::recipe::Recipe;
use crate::settings::{PrintSettings, SourceInfo};
use crate::store::{PageRasterizer, PageStore};

#[derive(Debug, Clone, Default)]
pub struct Document {
    source: SourceInfo,
    print: PrintSettings,
    store: PageStore,
}

impl Document {
    pub fn new(source: SourceInfo) -> Self {
        Self {
            source,
            print: PrintSettings::default(),
            store: PageStore::new(),
        }
    }

    /// Create a document and register every page the rasterizer reports.
    pub fn from_rasterizer<R: PageRasterizer>(source: SourceInfo, rasterizer: &R) -> Self {
        let mut document = Self::new(source);
        document.store.register_pages(rasterizer);
        document
    }

    pub fn source(&self) -> &SourceInfo {
        &self.source
    }

    pub fn print_settings(&self) -> &PrintSettings {
        &self.print
    }

    pub fn set_print_settings(&mut self, settings: PrintSettings) {
        self.print = settings.normalized();
    }

    pub fn store(&self) -> &PageStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut PageStore {
        &mut self.store
    }

    pub fn init_page(&mut self, page_number: u32, dimensions: PageDimensions) {
        self.store.init_page(page_number, dimensions);
    }

    pub fn apply_edit(&mut self, page_number: u32, command: &EditCommand, scope: EditScope) {
        apply_edit(&mut self.store, page_number, command, scope);
    }

    pub fn apply_edits(&mut self, page_number: u32, commands: &[EditCommand], scope: EditScope) {
        apply_edits(&mut self.store, page_number, commands, scope);
    }

    pub fn sheet_layout(&self) -> SheetLayout {
        SheetLayout::from_settings(&self.print)
    }

    /// Screen mapping for a page in its current sheet slot.
    pub fn screen_view(&self, page_number: u32) -> Option<ScreenView> {
        let slot_aspect = self.sheet_layout().slot_aspect_ratio();
        self.store
            .get(page_number)
            .map(|meta| meta.screen_view(slot_aspect))
    }

    /// Convert a box dragged over the page preview into a crop command.
    pub fn crop_command_from_gesture(
        &self,
        page_number: u32,
        screen_box: CropBox,
    ) -> Option<EditCommand> {
        let view = self.screen_view(page_number)?;
        let committed = self.store.transforms(page_number).crop;
        let crop = crop_from_gesture(&view, screen_box, committed, MIN_CROP_FRACTION);
        Some(EditCommand::Crop { crop })
    }

    /// Screen box for a crop drawn over the page preview. `None` if the page
    /// is unknown.
    pub fn crop_handles(&self, page_number: u32, absolute: CropBox) -> Option<CropBox> {
        let view = self.screen_view(page_number)?;
        let committed = self.store.transforms(page_number).crop;
        Some(handles_for_crop(&view, committed, absolute))
    }

    pub fn export_recipe(&self, generated_at: DateTime<Utc>) -> Recipe {
        Recipe::export(&self.store, &self.source, &self.print, generated_at)
    }
}
