//! Conversions between JavaScript values and core types.
//!
//! Structured values (crop boxes, commands, settings) cross the boundary as
//! plain JS objects via serde_wasm_bindgen. Failures are logged to the
//! browser console and returned as string errors.

use chrono::{DateTime, Utc};
use pagefit_core::{EditScope, Rotation};
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Log a binding error to the console and wrap it for JavaScript.
pub(crate) fn js_error(message: String) -> JsValue {
    web_sys::console::warn_1(&JsValue::from_str(&message));
    JsValue::from_str(&message)
}

/// Deserialize a JS object, naming `what` in the error message.
pub(crate) fn from_js<T: DeserializeOwned>(value: JsValue, what: &str) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(|e| js_error(format!("Invalid {}: {}", what, e)))
}

/// Serialize a value into a plain JS object.
pub(crate) fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| js_error(format!("Serialization failed: {}", e)))
}

/// Map the "apply to all pages" checkbox onto an edit scope.
pub(crate) fn scope_from_flag(apply_to_all: bool) -> EditScope {
    if apply_to_all {
        EditScope::AllPages
    } else {
        EditScope::Page
    }
}

/// Rotation from a JS number of degrees; any angle snaps to a quarter turn.
pub(crate) fn rotation_from_js(degrees: i32) -> Rotation {
    Rotation::from_degrees(degrees)
}

/// File size from a JS number. Negative or non-finite values become 0.
pub(crate) fn file_size_from_js(size: f64) -> u64 {
    if size.is_finite() && size > 0.0 {
        size as u64
    } else {
        0
    }
}

/// Parse an ISO 8601 timestamp as produced by `Date.prototype.toISOString`.
pub(crate) fn parse_timestamp(iso: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(iso).map(|t| t.with_timezone(&Utc))
}
