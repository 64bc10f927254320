//! Coordinate transform engine.
//!
//! Pure, stateless functions that map boxes between the three frames the
//! editor works in. Nothing here touches the page store.
//!
//! # Frames
//!
//! - **Absolute content space**: the full, untransformed page, normalized to
//!   `[0, 1]²`
//! - **Relative space**: `[0, 1]²` inside a previously committed crop window,
//!   so a second crop is expressed in the coordinates the user is looking at
//! - **Screen space**: `[0, 1]²` of the display slot, after the content has
//!   been rotated, fit, scaled and centered
//!
//! # Pipeline
//!
//! A drag gesture becomes a crop command via
//! [`inverse_transform_box`] → [`compose_crop`] → [`clamp_box`]
//! (see [`crop_from_gesture`]). Handles for an existing crop are placed via
//! [`decompose_crop`] → [`forward_transform_box`] (see [`handles_for_crop`]).

mod crop;
mod gesture;
mod screen;

pub use crop::{clamp_box, compose_crop, decompose_crop};
pub use gesture::{crop_from_gesture, handles_for_crop};
pub use screen::{
    forward_transform_box, inverse_transform_box, sanitize_aspect_ratio, sanitize_scale,
    ScreenView,
};
