//! WASM bindings for an open document.
//!
//! [`JsDocument`] owns the page store for one upload. The UI registers page
//! sizes as the PDF loads, sends edit commands as the user works, and asks
//! for the recipe when the order is placed.

use crate::types::{
    file_size_from_js, from_js, js_error, parse_timestamp, rotation_from_js, scope_from_flag,
    to_js,
};
use pagefit_core::{
    CropBox, Document, EditCommand, EditScope, PageDimensions, PrintSettings, SourceInfo,
};
use wasm_bindgen::prelude::*;

/// An open document and its per-page edit state.
#[wasm_bindgen]
pub struct JsDocument {
    inner: Document,
}

#[wasm_bindgen]
impl JsDocument {
    /// Open a document. Pages are registered separately with `init_page`.
    #[wasm_bindgen(constructor)]
    pub fn new(file_name: String, file_size: f64, total_pages: u32) -> JsDocument {
        JsDocument {
            inner: Document::new(SourceInfo::new(
                file_name,
                file_size_from_js(file_size),
                total_pages,
            )),
        }
    }

    /// Register a page's native size in points.
    pub fn init_page(&mut self, page_number: u32, width: f64, height: f64) {
        self.inner
            .init_page(page_number, PageDimensions::new(width, height));
    }

    /// Number of registered pages.
    #[wasm_bindgen(getter)]
    pub fn page_count(&self) -> usize {
        self.inner.store().len()
    }

    /// Print options as a plain object.
    pub fn print_settings(&self) -> Result<JsValue, JsValue> {
        to_js(self.inner.print_settings())
    }

    /// Replace the print options. Missing fields take their defaults.
    pub fn set_print_settings(&mut self, settings: JsValue) -> Result<(), JsValue> {
        let settings: PrintSettings = from_js(settings, "print settings")?;
        self.inner.set_print_settings(settings);
        Ok(())
    }

    /// Width over height of one slot on the printed sheet.
    pub fn slot_aspect_ratio(&self) -> f64 {
        self.inner.sheet_layout().slot_aspect_ratio()
    }

    /// Apply one edit command, e.g. `{ type: "rotate", degrees: 90 }`.
    pub fn apply_edit(
        &mut self,
        page_number: u32,
        command: JsValue,
        apply_to_all: bool,
    ) -> Result<(), JsValue> {
        let command: EditCommand = from_js(command, "edit command")?;
        self.inner
            .apply_edit(page_number, &command, scope_from_flag(apply_to_all));
        Ok(())
    }

    /// Apply an array of edit commands in canonical order.
    pub fn apply_edits(
        &mut self,
        page_number: u32,
        commands: JsValue,
        apply_to_all: bool,
    ) -> Result<(), JsValue> {
        let commands: Vec<EditCommand> = from_js(commands, "edit commands")?;
        self.inner
            .apply_edits(page_number, &commands, scope_from_flag(apply_to_all));
        Ok(())
    }

    pub fn crop(
        &mut self,
        page_number: u32,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        apply_to_all: bool,
    ) {
        let command = EditCommand::Crop {
            crop: CropBox::new(x, y, width, height),
        };
        self.inner
            .apply_edit(page_number, &command, scope_from_flag(apply_to_all));
    }

    pub fn rotate(&mut self, page_number: u32, degrees: i32, apply_to_all: bool) {
        self.inner.apply_edit(
            page_number,
            &EditCommand::Rotate { degrees },
            scope_from_flag(apply_to_all),
        );
    }

    pub fn set_rotation(&mut self, page_number: u32, degrees: i32, apply_to_all: bool) {
        let command = EditCommand::SetRotation {
            rotation: rotation_from_js(degrees),
        };
        self.inner
            .apply_edit(page_number, &command, scope_from_flag(apply_to_all));
    }

    pub fn set_scale(&mut self, page_number: u32, percent: f64, apply_to_all: bool) {
        self.inner.apply_edit(
            page_number,
            &EditCommand::Scale { percent },
            scope_from_flag(apply_to_all),
        );
    }

    pub fn translate(&mut self, page_number: u32, dx: f64, dy: f64, apply_to_all: bool) {
        self.inner.apply_edit(
            page_number,
            &EditCommand::Translate { dx, dy },
            scope_from_flag(apply_to_all),
        );
    }

    pub fn clear_crop(&mut self, page_number: u32) {
        self.inner.store_mut().clear_crop(page_number);
    }

    pub fn set_fit_crop_to_page(&mut self, page_number: u32, fit: bool) {
        self.inner.store_mut().set_fit_crop_to_page(page_number, fit);
    }

    pub fn reset_page(&mut self, page_number: u32) {
        self.inner.apply_edit(page_number, &EditCommand::Reset, EditScope::Page);
    }

    pub fn reset_all(&mut self) {
        for page_number in self.inner.store().page_numbers() {
            self.inner.apply_edit(page_number, &EditCommand::Reset, EditScope::Page);
        }
    }

    /// Copy one page's transforms onto another.
    pub fn clone_transforms(&mut self, from: u32, to: u32) {
        self.inner.store_mut().clone_transforms(from, to);
    }

    pub fn is_edited(&self, page_number: u32) -> bool {
        self.inner.store().is_edited(page_number)
    }

    /// Page numbers with non-identity transforms, ascending.
    pub fn edited_pages(&self) -> Vec<u32> {
        self.inner.store().edited_pages()
    }

    /// Full page metadata, or `null` for an unknown page.
    pub fn page(&self, page_number: u32) -> Result<JsValue, JsValue> {
        match self.inner.store().get(page_number) {
            Some(meta) => to_js(&meta),
            None => Ok(JsValue::NULL),
        }
    }

    /// Transforms for a page; identity for an unknown page.
    pub fn transforms(&self, page_number: u32) -> Result<JsValue, JsValue> {
        to_js(&self.inner.store().transforms(page_number))
    }

    /// Turn a box dragged on the preview into a crop command object, or
    /// `null` for an unknown page.
    pub fn crop_command_from_gesture(
        &self,
        page_number: u32,
        screen_box: JsValue,
    ) -> Result<JsValue, JsValue> {
        let screen_box: CropBox = from_js(screen_box, "screen box")?;
        match self.inner.crop_command_from_gesture(page_number, screen_box) {
            Some(command) => to_js(&command),
            None => Ok(JsValue::NULL),
        }
    }

    /// Screen box for the crop handles of an absolute crop, or `null` for an
    /// unknown page.
    pub fn crop_handles(&self, page_number: u32, absolute: JsValue) -> Result<JsValue, JsValue> {
        let absolute: CropBox = from_js(absolute, "crop")?;
        match self.inner.crop_handles(page_number, absolute) {
            Some(handles) => to_js(&handles),
            None => Ok(JsValue::NULL),
        }
    }

    /// Export the recipe JSON stamped with the current time.
    pub fn export_recipe(&self) -> Result<String, JsValue> {
        let now: String = js_sys::Date::new_0().to_iso_string().into();
        self.export_recipe_at(&now)
    }

    /// Export the recipe JSON stamped with an ISO 8601 timestamp.
    pub fn export_recipe_at(&self, generated_at: &str) -> Result<String, JsValue> {
        let generated_at = parse_timestamp(generated_at)
            .map_err(|e| js_error(format!("Invalid timestamp: {}", e)))?;
        self.inner
            .export_recipe(generated_at)
            .to_json()
            .map_err(|e| js_error(format!("Recipe export failed: {}", e)))
    }
}
