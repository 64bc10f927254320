//! Pagefit Core - Page transform engine
//!
//! This crate provides the core of the Pagefit print editor: per-page edit
//! state (crop, rotation, scale, translation), the math that maps crop boxes
//! between page content and the on-screen preview, the edit command
//! dispatcher, and the recipe handed to the external renderer.
//!
//! # Module Structure
//!
//! - `model` - Value types (`CropBox`, `Rotation`, `PageTransforms`, ...)
//! - `geometry` - Crop composition and content ↔ screen mapping
//! - `store` - Per-document page metadata store
//! - `edit` - Edit commands and canonical-order dispatch
//! - `settings` / `layout` - Print options and N-up sheet slots
//! - `recipe` - Versioned recipe export
//! - `document` - One open document tying the above together
//!
//! The engine never touches pixels and performs no I/O.

pub mod constants;
pub mod document;
pub mod edit;
pub mod geometry;
pub mod layout;
pub mod model;
pub mod recipe;
pub mod settings;
pub mod store;

pub use document::Document;
pub use edit::{apply_edit, apply_edits, EditCommand, EditScope, EditStage};
pub use geometry::{
    clamp_box, compose_crop, decompose_crop, forward_transform_box, inverse_transform_box,
    ScreenView,
};
pub use layout::{SheetLayout, SlotPosition};
pub use model::{CropBox, PageDimensions, PageMetadata, PageTransforms, Rotation, RotationError};
pub use recipe::{Recipe, RecipeError, RecipePage};
pub use settings::{ColorMode, PagesPerSheet, PaperSize, PrintSettings, SourceInfo};
pub use store::{PageRasterizer, PageStore};
