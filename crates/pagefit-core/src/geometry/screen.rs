//! Content space ↔ screen space mapping.
//!
//! The preview shows a page (or the committed crop region of a page) inside a
//! display slot. To get there the content is:
//!
//! 1. rotated clockwise by the page rotation,
//! 2. fit into the slot, shrinking only (a 90°/270° rotation swaps the
//!    content's width and height before fitting),
//! 3. scaled by the user scale percentage,
//! 4. centered in the slot.
//!
//! The slot may have a different aspect ratio than the content, for example a
//! half-width slot of a 2-up sheet. All math is done in slot-normalized
//! coordinates, so only the ratio `content_aspect / slot_aspect` matters.
//!
//! For a rotated page the forward map of a point `(u, v)` is:
//! ```text
//!   90°: (1 - v, u)
//!  180°: (1 - u, 1 - v)
//!  270°: (v, 1 - u)
//! ```

use tracing::debug;

use crate::constants::DEFAULT_SCALE;
use crate::model::{CropBox, Rotation};

/// Replace a non-finite or non-positive aspect ratio with `1.0`.
pub fn sanitize_aspect_ratio(aspect_ratio: f64) -> f64 {
    if aspect_ratio.is_finite() && aspect_ratio > 0.0 {
        aspect_ratio
    } else {
        debug!(aspect_ratio, "degenerate aspect ratio replaced with 1.0");
        1.0
    }
}

/// Replace a non-finite or non-positive scale with [`DEFAULT_SCALE`].
pub fn sanitize_scale(scale: f64) -> f64 {
    if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        debug!(scale, "degenerate scale replaced with default");
        DEFAULT_SCALE
    }
}

/// Where the rotated, fit and scaled content lands inside the slot.
#[derive(Debug, Clone, Copy)]
struct Placement {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

impl Placement {
    fn compute(rotation: Rotation, scale: f64, content_aspect: f64, slot_aspect: f64) -> Self {
        let content_aspect = sanitize_aspect_ratio(content_aspect);
        let slot_aspect = sanitize_aspect_ratio(slot_aspect);

        let rotated_aspect = if rotation.swaps_dimensions() {
            1.0 / content_aspect
        } else {
            content_aspect
        };

        // Fit factor min(slotW/contentW, slotH/contentH, 1), expressed as the
        // fraction of the slot covered on each axis.
        let ratio = rotated_aspect / slot_aspect;
        let factor = sanitize_scale(scale) / 100.0;
        let width = ratio.min(1.0) * factor;
        let height = (1.0 / ratio).min(1.0) * factor;

        Self {
            left: (1.0 - width) / 2.0,
            top: (1.0 - height) / 2.0,
            width,
            height,
        }
    }
}

/// Rotate a box clockwise inside the unit square.
fn rotate_box(b: CropBox, rotation: Rotation) -> CropBox {
    match rotation {
        Rotation::Deg0 => b,
        Rotation::Deg90 => CropBox::new(1.0 - b.bottom(), b.x, b.height, b.width),
        Rotation::Deg180 => CropBox::new(1.0 - b.right(), 1.0 - b.bottom(), b.width, b.height),
        Rotation::Deg270 => CropBox::new(b.y, 1.0 - b.right(), b.height, b.width),
    }
}

/// Undo [`rotate_box`].
fn unrotate_box(b: CropBox, rotation: Rotation) -> CropBox {
    match rotation {
        Rotation::Deg0 => b,
        Rotation::Deg90 => CropBox::new(b.y, 1.0 - b.right(), b.height, b.width),
        Rotation::Deg180 => CropBox::new(1.0 - b.right(), 1.0 - b.bottom(), b.width, b.height),
        Rotation::Deg270 => CropBox::new(1.0 - b.bottom(), b.x, b.height, b.width),
    }
}

/// Map a content-space box to the box an observer sees in the slot.
///
/// # Arguments
///
/// * `content_box` - Box in content space (0.0 to 1.0)
/// * `rotation` - Clockwise page rotation
/// * `scale` - User scale in percent
/// * `content_aspect_ratio` - Width over height of the content
/// * `slot_aspect_ratio` - Width over height of the display slot
///
/// Degenerate aspect ratios are treated as `1.0` and a degenerate scale as
/// 100%. With a scale above 100% the result may extend past the slot.
pub fn forward_transform_box(
    content_box: CropBox,
    rotation: Rotation,
    scale: f64,
    content_aspect_ratio: f64,
    slot_aspect_ratio: f64,
) -> CropBox {
    let placement = Placement::compute(rotation, scale, content_aspect_ratio, slot_aspect_ratio);
    let rotated = rotate_box(content_box, rotation);

    CropBox {
        x: placement.left + rotated.x * placement.width,
        y: placement.top + rotated.y * placement.height,
        width: rotated.width * placement.width,
        height: rotated.height * placement.height,
    }
}

/// Recover the content-space box behind a box drawn on screen. Exact inverse
/// of [`forward_transform_box`] for the same parameters.
pub fn inverse_transform_box(
    screen_box: CropBox,
    rotation: Rotation,
    scale: f64,
    content_aspect_ratio: f64,
    slot_aspect_ratio: f64,
) -> CropBox {
    let placement = Placement::compute(rotation, scale, content_aspect_ratio, slot_aspect_ratio);

    let rotated = CropBox {
        x: (screen_box.x - placement.left) / placement.width,
        y: (screen_box.y - placement.top) / placement.height,
        width: screen_box.width / placement.width,
        height: screen_box.height / placement.height,
    };

    unrotate_box(rotated, rotation)
}

/// The parameters that place one page's content inside one slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenView {
    pub rotation: Rotation,
    /// User scale in percent.
    pub scale: f64,
    /// Width over height of the displayed content.
    pub content_aspect_ratio: f64,
    /// Width over height of the display slot.
    pub slot_aspect_ratio: f64,
}

impl ScreenView {
    pub fn new(
        rotation: Rotation,
        scale: f64,
        content_aspect_ratio: f64,
        slot_aspect_ratio: f64,
    ) -> Self {
        Self {
            rotation,
            scale,
            content_aspect_ratio,
            slot_aspect_ratio,
        }
    }

    /// See [`forward_transform_box`].
    pub fn forward(&self, content_box: CropBox) -> CropBox {
        forward_transform_box(
            content_box,
            self.rotation,
            self.scale,
            self.content_aspect_ratio,
            self.slot_aspect_ratio,
        )
    }

    /// See [`inverse_transform_box`].
    pub fn inverse(&self, screen_box: CropBox) -> CropBox {
        inverse_transform_box(
            screen_box,
            self.rotation,
            self.scale,
            self.content_aspect_ratio,
            self.slot_aspect_ratio,
        )
    }

    /// Screen rectangle covered by the whole content.
    pub fn content_rect(&self) -> CropBox {
        self.forward(CropBox::full())
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
