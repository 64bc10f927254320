//! Shared constants for the page transform engine.
//!
//! This module centralizes the limits and defaults that the store, the
//! geometry functions and the recipe validator all agree on.

// =============================================================================
// Scale
// =============================================================================

/// Smallest user scale, in percent.
pub const MIN_SCALE: f64 = 10.0;

/// Largest user scale, in percent.
pub const MAX_SCALE: f64 = 500.0;

/// Identity scale, in percent.
pub const DEFAULT_SCALE: f64 = 100.0;

// =============================================================================
// Crop
// =============================================================================

/// Minimum crop edge as a fraction of the reference dimension (5%).
pub const MIN_CROP_FRACTION: f64 = 0.05;

/// Tolerance used when comparing normalized coordinates.
pub const GEOMETRY_EPSILON: f64 = 1e-6;

// =============================================================================
// Recipe
// =============================================================================

/// Recipe format version.
///
/// Bump whenever the field set or the meaning of `transforms` changes; the
/// renderer parses the recipe structurally.
pub const RECIPE_VERSION: &str = "1.0";
