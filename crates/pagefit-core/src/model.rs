//! Value types for per-page edit state.
//!
//! Everything here is plain data plus the invariants that go with it. The
//! behavior that mutates these values lives in [`crate::store`]; the math that
//! maps them onto the screen lives in [`crate::geometry`].
//!
//! # Coordinate System
//!
//! - Crop boxes are normalized (0.0 to 1.0) relative to a reference frame,
//!   usually the full untransformed page
//! - Origin is the top-left corner
//! - Rotations are clockwise quarter turns

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{DEFAULT_SCALE, GEOMETRY_EPSILON};
use crate::geometry::{sanitize_aspect_ratio, ScreenView};

// =============================================================================
// CropBox
// =============================================================================

/// A rectangle normalized to the unit square of some reference frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropBox {
    /// Left edge (0.0 to 1.0)
    pub x: f64,
    /// Top edge (0.0 to 1.0)
    pub y: f64,
    /// Width (0.0 to 1.0)
    pub width: f64,
    /// Height (0.0 to 1.0)
    pub height: f64,
}

impl CropBox {
    /// Create a new crop box. No clamping is performed; see
    /// [`crate::geometry::clamp_box`].
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The whole reference frame.
    pub const fn full() -> Self {
        Self::new(0.0, 0.0, 1.0, 1.0)
    }

    /// Right edge.
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Center point as `(x, y)`.
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Component-wise comparison within `epsilon`.
    pub fn approx_eq(&self, other: &CropBox, epsilon: f64) -> bool {
        (self.x - other.x).abs() <= epsilon
            && (self.y - other.y).abs() <= epsilon
            && (self.width - other.width).abs() <= epsilon
            && (self.height - other.height).abs() <= epsilon
    }

    /// True if this box covers the whole frame (within [`GEOMETRY_EPSILON`]).
    pub fn is_full(&self) -> bool {
        self.approx_eq(&Self::full(), GEOMETRY_EPSILON)
    }

    /// True if every component is finite and the box has positive area.
    pub fn is_finite_positive(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0
    }

    /// True if the box has positive area and lies inside the unit square,
    /// allowing `epsilon` of overshoot on the far edges.
    pub fn is_within_unit_square(&self, epsilon: f64) -> bool {
        self.is_finite_positive()
            && self.x >= -epsilon
            && self.y >= -epsilon
            && self.right() <= 1.0 + epsilon
            && self.bottom() <= 1.0 + epsilon
    }
}

// =============================================================================
// Rotation
// =============================================================================

/// Error returned when an integer is not one of the four quarter turns.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RotationError {
    #[error("Rotation must be 0, 90, 180 or 270 degrees, got {0}")]
    NotQuarterTurn(i32),
}

/// Clockwise page rotation in quarter turns.
///
/// Serialized as the integer number of degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// All rotations in ascending order.
    pub const ALL: [Rotation; 4] = [
        Rotation::Deg0,
        Rotation::Deg90,
        Rotation::Deg180,
        Rotation::Deg270,
    ];

    /// Rotation in degrees (0, 90, 180 or 270).
    pub fn degrees(self) -> i32 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    /// Build a rotation from any angle in degrees.
    ///
    /// The angle is normalized into `[0, 360)` and snapped to the nearest
    /// quarter turn, so `-90` becomes `Deg270` and `450` becomes `Deg90`.
    pub fn from_degrees(degrees: i32) -> Self {
        let normalized = degrees.rem_euclid(360);
        match ((normalized + 45) / 90) % 4 {
            0 => Rotation::Deg0,
            1 => Rotation::Deg90,
            2 => Rotation::Deg180,
            _ => Rotation::Deg270,
        }
    }

    /// Add a relative rotation: `((current + delta) % 360 + 360) % 360`.
    pub fn rotated_by(self, delta_degrees: i32) -> Self {
        // i64 so that extreme deltas cannot overflow before reduction.
        let sum = (self.degrees() as i64 + delta_degrees as i64).rem_euclid(360);
        Self::from_degrees(sum as i32)
    }

    /// Returns true if this rotation swaps width and height.
    #[inline]
    pub fn swaps_dimensions(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }
}

impl From<Rotation> for i32 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}

impl TryFrom<i32> for Rotation {
    type Error = RotationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Rotation::Deg0),
            90 => Ok(Rotation::Deg90),
            180 => Ok(Rotation::Deg180),
            270 => Ok(Rotation::Deg270),
            other => Err(RotationError::NotQuarterTurn(other)),
        }
    }
}

// =============================================================================
// PageTransforms
// =============================================================================

/// Edit state for one page.
///
/// Field order mirrors application order: content is cropped, then rotated,
/// then scaled, then translated before it is placed into a display slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageTransforms {
    /// Committed crop in absolute content space, or `None` for the full page.
    pub crop: Option<CropBox>,
    /// Clockwise rotation.
    pub rotation: Rotation,
    /// User scale in percent (10 to 500).
    pub scale: f64,
    /// Horizontal translation.
    pub offset_x: f64,
    /// Vertical translation.
    pub offset_y: f64,
}

impl Default for PageTransforms {
    fn default() -> Self {
        Self {
            crop: None,
            rotation: Rotation::Deg0,
            scale: DEFAULT_SCALE,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

impl PageTransforms {
    /// Identity transforms.
    pub fn new() -> Self {
        Self::default()
    }

    /// True if no axis differs from identity.
    pub fn is_identity(&self) -> bool {
        self.crop.is_none()
            && self.rotation == Rotation::Deg0
            && self.scale == DEFAULT_SCALE
            && self.offset_x == 0.0
            && self.offset_y == 0.0
    }
}

// =============================================================================
// PageDimensions
// =============================================================================

/// Page size in page-content units (not pixels).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageDimensions {
    pub width: f64,
    pub height: f64,
}

impl PageDimensions {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether both sides are finite and positive.
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Width over height, or `1.0` if either side is degenerate.
    pub fn aspect_ratio(&self) -> f64 {
        if self.height == 0.0 {
            return 1.0;
        }
        sanitize_aspect_ratio(self.width / self.height)
    }

    /// Dimensions after a rotation is applied.
    pub fn rotated(&self, rotation: Rotation) -> Self {
        if rotation.swaps_dimensions() {
            Self::new(self.height, self.width)
        } else {
            *self
        }
    }
}

// =============================================================================
// PageMetadata
// =============================================================================

/// Everything the engine knows about one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub page_number: u32,
    pub original_dimensions: PageDimensions,
    pub transforms: PageTransforms,
    /// Derived: true iff any transform axis differs from identity.
    pub edited: bool,
    /// Derived: true iff a crop is committed.
    pub is_cropped: bool,
    /// Whether the renderer should scale the cropped region up to the page.
    pub fit_crop_to_page: bool,
}

impl PageMetadata {
    /// Create a record with identity transforms.
    pub fn new(page_number: u32, original_dimensions: PageDimensions) -> Self {
        Self {
            page_number,
            original_dimensions,
            transforms: PageTransforms::default(),
            edited: false,
            is_cropped: false,
            fit_crop_to_page: false,
        }
    }

    /// Recompute `edited` and `is_cropped` from the transforms.
    pub(crate) fn refresh_flags(&mut self) {
        self.edited = !self.transforms.is_identity();
        self.is_cropped = self.transforms.crop.is_some();
    }

    /// Aspect ratio of the content currently shown: the committed crop region
    /// of the page, or the whole page when uncropped.
    pub fn content_aspect_ratio(&self) -> f64 {
        match self.transforms.crop {
            Some(crop) => {
                let width = self.original_dimensions.width * crop.width;
                let height = self.original_dimensions.height * crop.height;
                if height == 0.0 {
                    1.0
                } else {
                    sanitize_aspect_ratio(width / height)
                }
            }
            None => self.original_dimensions.aspect_ratio(),
        }
    }

    /// The screen mapping for this page inside a slot of `slot_aspect_ratio`.
    pub fn screen_view(&self, slot_aspect_ratio: f64) -> ScreenView {
        ScreenView::new(
            self.transforms.rotation,
            self.transforms.scale,
            self.content_aspect_ratio(),
            slot_aspect_ratio,
        )
    }
}
