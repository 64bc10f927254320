//! Crop composition and clamping.
//!
//! A committed crop is stored in absolute content space. When the user crops
//! again, the new box is drawn relative to the committed window and composed
//! back into absolute space, so repeated crops never accumulate drift.
//!
//! # Example
//!
//! ```ignore
//! // Keep the bottom-right quarter of a centered half-size window
//! let committed = CropBox::new(0.2, 0.2, 0.5, 0.5);
//! let draft = CropBox::new(0.5, 0.5, 0.5, 0.5);
//! let absolute = compose_crop(Some(committed), draft);
//! // absolute == CropBox::new(0.45, 0.45, 0.25, 0.25)
//! ```

use crate::constants::MIN_CROP_FRACTION;
use crate::model::CropBox;

/// A committed window that can be divided by. Degenerate windows are treated
/// as the full page.
fn usable_window(committed: Option<CropBox>) -> Option<CropBox> {
    committed.filter(CropBox::is_finite_positive)
}

/// Express a draft crop, drawn relative to `committed`, in absolute content
/// space.
///
/// For each axis:
/// - `origin = committed.origin + draft.origin × committed.size`
/// - `size = draft.size × committed.size`
///
/// With no committed window this is the identity.
pub fn compose_crop(committed: Option<CropBox>, draft: CropBox) -> CropBox {
    match usable_window(committed) {
        Some(c) => CropBox {
            x: c.x + draft.x * c.width,
            y: c.y + draft.y * c.height,
            width: draft.width * c.width,
            height: draft.height * c.height,
        },
        None => draft,
    }
}

/// Express an absolute crop relative to `committed`. Exact inverse of
/// [`compose_crop`].
///
/// For each axis:
/// - `origin = (absolute.origin − committed.origin) / committed.size`
/// - `size = absolute.size / committed.size`
pub fn decompose_crop(committed: Option<CropBox>, absolute: CropBox) -> CropBox {
    match usable_window(committed) {
        Some(c) => CropBox {
            x: (absolute.x - c.x) / c.width,
            y: (absolute.y - c.y) / c.height,
            width: absolute.width / c.width,
            height: absolute.height / c.height,
        },
        None => absolute,
    }
}

/// Clamp one axis: origin into `[0, 1 − m]`, size into `[m, 1 − origin]`.
fn clamp_axis(origin: f64, size: f64, min_fraction: f64) -> (f64, f64) {
    let origin = if origin.is_finite() { origin } else { 0.0 };
    let origin = origin.max(0.0).min(1.0 - min_fraction);
    let limit = 1.0 - origin;
    let size = if size.is_finite() { size } else { limit };
    let size = size.max(min_fraction).min(limit);
    (origin, size)
}

/// Clamp a box into the unit square with a minimum edge of `min_fraction`.
///
/// # Behavior
///
/// - Origins are clamped into `[0, 1 − min_fraction]`
/// - Sizes are clamped into `[min_fraction, 1 − origin]`
/// - Non-finite origins become 0, non-finite sizes take the remaining extent
/// - `min_fraction` is clamped into `[0, 1]`; a non-finite value falls back
///   to [`MIN_CROP_FRACTION`]
///
/// The result never leaves the unit square and clamping is idempotent.
pub fn clamp_box(b: CropBox, min_fraction: f64) -> CropBox {
    let min_fraction = if min_fraction.is_finite() {
        min_fraction.clamp(0.0, 1.0)
    } else {
        MIN_CROP_FRACTION
    };

    let (x, width) = clamp_axis(b.x, b.width, min_fraction);
    let (y, height) = clamp_axis(b.y, b.height, min_fraction);

    CropBox {
        x,
        y,
        width,
        height,
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
