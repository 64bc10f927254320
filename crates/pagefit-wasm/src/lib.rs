//! Pagefit WASM - WebAssembly bindings for Pagefit
//!
//! This crate exposes the pagefit-core transform engine to the browser
//! editor.
//!
//! # Module Structure
//!
//! - `document` - `JsDocument`, the per-upload page store and recipe export
//! - `geometry` - Crop composition and preview box mapping
//! - `types` - Conversions between JS values and core types
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsDocument } from '@pagefit/wasm';
//!
//! await init();
//!
//! const doc = new JsDocument(file.name, file.size, pdf.numPages);
//! doc.init_page(1, 595, 842);
//! doc.apply_edit(1, { type: 'rotate', degrees: 90 }, false);
//! const recipe = JSON.parse(doc.export_recipe());
//! ```

use wasm_bindgen::prelude::*;

mod document;
mod geometry;
mod types;

pub use document::JsDocument;
pub use geometry::{
    clamp_box, compose_crop, decompose_crop, forward_transform_box, inverse_transform_box,
};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Recipe format version written by `export_recipe`.
#[wasm_bindgen]
pub fn recipe_version() -> String {
    pagefit_core::constants::RECIPE_VERSION.to_string()
}
