//! Glue between pointer gestures and crop commands.

use super::crop::{clamp_box, compose_crop, decompose_crop};
use super::screen::ScreenView;
use crate::model::CropBox;

/// Turn a box dragged on screen into an absolute crop ready for storage.
///
/// `view` must describe what is currently displayed, i.e. the committed crop
/// region of the page (see [`crate::model::PageMetadata::screen_view`]). The
/// dragged box is mapped back into that region, composed into absolute
/// content space and clamped to `min_fraction`.
pub fn crop_from_gesture(
    view: &ScreenView,
    screen_box: CropBox,
    committed: Option<CropBox>,
    min_fraction: f64,
) -> CropBox {
    let draft = view.inverse(screen_box);
    let absolute = compose_crop(committed, draft);
    clamp_box(absolute, min_fraction)
}

/// Screen position of the handles for an absolute crop, drawn on top of the
/// committed region described by `view`.
pub fn handles_for_crop(view: &ScreenView, committed: Option<CropBox>, absolute: CropBox) -> CropBox {
    view.forward(decompose_crop(committed, absolute))
}
