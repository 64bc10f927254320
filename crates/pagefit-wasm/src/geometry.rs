//! WASM bindings for the coordinate transform engine.
//!
//! The crop overlay calls [`forward_transform_box`] to position its handles
//! and [`inverse_transform_box`] + [`compose_crop`] + [`clamp_box`] to turn a
//! drag into a crop command.
//!
//! # Example (TypeScript)
//!
//! ```typescript
//! const draft = inverse_transform_box(dragged, 90, 100, 0.707, 0.707);
//! const absolute = compose_crop(committedCrop ?? null, draft);
//! const crop = clamp_box(absolute, 0.05);
//! ```

use crate::types::{from_js, rotation_from_js, to_js};
use pagefit_core::geometry;
use pagefit_core::CropBox;
use wasm_bindgen::prelude::*;

/// Express a draft crop drawn inside `committed` (or `null` for the full
/// page) in absolute page coordinates.
#[wasm_bindgen]
pub fn compose_crop(committed: JsValue, draft: JsValue) -> Result<JsValue, JsValue> {
    let committed: Option<CropBox> = from_js(committed, "committed crop")?;
    let draft: CropBox = from_js(draft, "draft crop")?;
    to_js(&geometry::compose_crop(committed, draft))
}

/// Express an absolute crop relative to `committed`. Inverse of
/// [`compose_crop`].
#[wasm_bindgen]
pub fn decompose_crop(committed: JsValue, absolute: JsValue) -> Result<JsValue, JsValue> {
    let committed: Option<CropBox> = from_js(committed, "committed crop")?;
    let absolute: CropBox = from_js(absolute, "absolute crop")?;
    to_js(&geometry::decompose_crop(committed, absolute))
}

/// Map a page-space box to the preview slot.
///
/// # Arguments
///
/// * `content_box` - `{x, y, width, height}` in page space (0.0 to 1.0)
/// * `rotation` - Clockwise rotation in degrees (snapped to 0/90/180/270)
/// * `scale` - User scale in percent
/// * `content_aspect_ratio` - Width over height of the displayed content
/// * `slot_aspect_ratio` - Width over height of the preview slot
#[wasm_bindgen]
pub fn forward_transform_box(
    content_box: JsValue,
    rotation: i32,
    scale: f64,
    content_aspect_ratio: f64,
    slot_aspect_ratio: f64,
) -> Result<JsValue, JsValue> {
    let content_box: CropBox = from_js(content_box, "box")?;
    to_js(&geometry::forward_transform_box(
        content_box,
        rotation_from_js(rotation),
        scale,
        content_aspect_ratio,
        slot_aspect_ratio,
    ))
}

/// Recover the page-space box behind a box drawn on the preview. Inverse of
/// [`forward_transform_box`].
#[wasm_bindgen]
pub fn inverse_transform_box(
    screen_box: JsValue,
    rotation: i32,
    scale: f64,
    content_aspect_ratio: f64,
    slot_aspect_ratio: f64,
) -> Result<JsValue, JsValue> {
    let screen_box: CropBox = from_js(screen_box, "box")?;
    to_js(&geometry::inverse_transform_box(
        screen_box,
        rotation_from_js(rotation),
        scale,
        content_aspect_ratio,
        slot_aspect_ratio,
    ))
}

/// Clamp a box into the unit square with a minimum edge of `min_fraction`.
#[wasm_bindgen]
pub fn clamp_box(b: JsValue, min_fraction: f64) -> Result<JsValue, JsValue> {
    let b: CropBox = from_js(b, "box")?;
    to_js(&geometry::clamp_box(b, min_fraction))
}
