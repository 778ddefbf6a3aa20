//! Crop rectangle parsing and clamping.
//!
//! Callers supply crop rectangles in source-pixel coordinates, and nothing
//! about them can be trusted: coordinates may be negative, zero-sized, or
//! far outside the image. Structural problems (a malformed payload) are a
//! hard error; numeric problems are silently clamped to the nearest legal
//! rectangle, which is always at least 1x1 and inside the image.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Malformed crop payload: missing keys, non-numeric fields, or invalid JSON.
#[derive(Debug, Error)]
#[error("malformed crop payload: {0}")]
pub struct InvalidCropError(#[from] serde_json::Error);

/// Caller-supplied crop rectangle in source-pixel coordinates.
///
/// Raw and unvalidated; values may be negative or exceed the image bounds.
/// Resolution against actual image dimensions happens in
/// [`ResolvedCrop::clamp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: i64,
    pub y: i64,
    #[serde(rename = "w")]
    pub width: i64,
    #[serde(rename = "h")]
    pub height: i64,
}

impl CropRect {
    pub fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Parse a crop rectangle from the upload form's JSON field,
    /// e.g. `{"x": 10, "y": 20, "w": 300, "h": 300}`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCropError`] when the payload is not valid JSON or
    /// any of the four keys is missing or non-numeric. Out-of-range values
    /// parse fine; they are handled later by clamping.
    pub fn from_json(payload: &str) -> Result<Self, InvalidCropError> {
        Ok(serde_json::from_str(payload)?)
    }
}

/// A crop rectangle resolved against concrete image dimensions.
///
/// Invariants: `x + width <= image width`, `y + height <= image height`,
/// `width >= 1`, `height >= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedCrop {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl ResolvedCrop {
    /// Largest centered square inscribed in a `width x height` image.
    ///
    /// Side length is `min(width, height)`; offsets use floor division, so
    /// an odd leftover pixel lands on the right/bottom edge.
    pub fn center_square(width: u32, height: u32) -> Self {
        let side = width.min(height);
        Self {
            x: (width - side) / 2,
            y: (height - side) / 2,
            width: side,
            height: side,
        }
    }

    /// Clamp a caller rectangle into a `width x height` image.
    ///
    /// The origin is clamped inside the image, then the far corner is
    /// clamped to `[origin + 1, edge]`. The result is never empty and never
    /// exceeds the image bounds, whatever integers the caller supplied.
    /// `width` and `height` must be non-zero (guaranteed upstream by the
    /// zero-dimension check in the resolver).
    pub fn clamp(rect: &CropRect, width: u32, height: u32) -> Self {
        let (w, h) = (i64::from(width), i64::from(height));

        let x = rect.x.clamp(0, w - 1);
        let y = rect.y.clamp(0, h - 1);
        let x2 = rect.width.saturating_add(x).clamp(x + 1, w);
        let y2 = rect.height.saturating_add(y).clamp(y + 1, h);

        Self {
            x: x as u32,
            y: y as u32,
            width: (x2 - x) as u32,
            height: (y2 - y) as u32,
        }
    }

    /// Largest centered square inscribed in this rectangle, in the same
    /// (source image) coordinate space.
    pub fn inner_square(&self) -> Self {
        let side = self.width.min(self.height);
        Self {
            x: self.x + (self.width - side) / 2,
            y: self.y + (self.height - side) / 2,
            width: side,
            height: side,
        }
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
