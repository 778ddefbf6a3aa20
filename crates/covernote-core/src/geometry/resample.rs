//! Square resampling: from a flattened RGB buffer to the exact target side.
//!
//! Two modes feed the resampler. Automatic mode crops the largest centered
//! square out of the source and scales it. Manual mode clamps the caller's
//! rectangle first and then squares it according to the configured
//! [`CropPolicy`]; both policies preserve aspect ratio, they differ only in
//! whether the square is taken before or after scaling.

use image::imageops;
use image::RgbImage;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::{CropRect, ResolvedCrop};

/// Error types for square resolution.
#[derive(Debug, Error)]
pub enum GeometryError {
    /// The source buffer has zero width or height.
    #[error("source image has degenerate dimensions ({width}x{height})")]
    EmptySource { width: u32, height: u32 },
}

/// Filter type for resampling operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterType {
    /// Nearest neighbor interpolation (fastest, lowest quality).
    Nearest,
    /// Bilinear interpolation (fast, acceptable quality).
    Bilinear,
    /// Lanczos3 interpolation (slowest, highest quality; minimizes
    /// aliasing on downscale).
    #[default]
    Lanczos3,
}

impl FilterType {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> imageops::FilterType {
        match self {
            FilterType::Nearest => imageops::FilterType::Nearest,
            FilterType::Bilinear => imageops::FilterType::Triangle,
            FilterType::Lanczos3 => imageops::FilterType::Lanczos3,
        }
    }
}

/// How a non-square manual crop becomes a square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CropPolicy {
    /// Scale the clamped rectangle so its shorter edge matches the target,
    /// then center-crop the overflow on the longer edge (cover transform).
    #[default]
    ScaleThenCrop,
    /// Center-crop the clamped rectangle to its largest inscribed square,
    /// then scale.
    CropThenResize,
}

/// Resolve a source buffer to an exact `side x side` square.
///
/// With no crop, the largest centered square of the source is resampled.
/// With a crop, the rectangle is clamped into bounds (never rejected) and
/// squared per `policy`. Either way the output is exactly `side x side`
/// and the scale factor applied to width and height is identical.
///
/// # Errors
///
/// Returns [`GeometryError::EmptySource`] if the source has zero width or
/// height.
pub fn resolve_square(
    source: &RgbImage,
    crop: Option<&CropRect>,
    side: u32,
    filter: FilterType,
    policy: CropPolicy,
) -> Result<RgbImage, GeometryError> {
    let (width, height) = source.dimensions();
    if width == 0 || height == 0 {
        return Err(GeometryError::EmptySource { width, height });
    }

    let square = match crop {
        None => {
            let region = ResolvedCrop::center_square(width, height);
            debug!(?region, "automatic center-square crop");
            scale_square_region(source, region, side, filter)
        }
        Some(rect) => {
            let region = ResolvedCrop::clamp(rect, width, height);
            debug!(?rect, ?region, ?policy, "manual crop resolved");
            match policy {
                CropPolicy::CropThenResize => {
                    scale_square_region(source, region.inner_square(), side, filter)
                }
                CropPolicy::ScaleThenCrop => cover_region(source, region, side, filter),
            }
        }
    };

    Ok(square)
}

/// Extract a region of the source into its own buffer.
fn crop_region(source: &RgbImage, region: ResolvedCrop) -> RgbImage {
    imageops::crop_imm(source, region.x, region.y, region.width, region.height).to_image()
}

/// Crop an already-square region and scale it to `side x side`.
fn scale_square_region(
    source: &RgbImage,
    region: ResolvedCrop,
    side: u32,
    filter: FilterType,
) -> RgbImage {
    let cropped = crop_region(source, region);
    imageops::resize(&cropped, side, side, filter.to_image_filter())
}

/// Cover transform: scale the region so its shorter edge equals `side`,
/// then center-crop the longer edge down to `side`.
fn cover_region(source: &RgbImage, region: ResolvedCrop, side: u32, filter: FilterType) -> RgbImage {
    let cropped = crop_region(source, region);
    let (fill_w, fill_h) = cover_dimensions(region.width, region.height, side);
    let scaled = imageops::resize(&cropped, fill_w, fill_h, filter.to_image_filter());

    let overflow = ResolvedCrop {
        x: (fill_w - side) / 2,
        y: (fill_h - side) / 2,
        width: side,
        height: side,
    };
    crop_region(&scaled, overflow)
}

/// Scaled dimensions that cover a `side x side` square: the shorter edge
/// lands exactly on `side`, the longer edge keeps the aspect ratio and is
/// never rounded below `side`.
fn cover_dimensions(width: u32, height: u32, side: u32) -> (u32, u32) {
    if width <= height {
        let scaled = (f64::from(height) * f64::from(side) / f64::from(width)).round() as u32;
        (side, scaled.max(side))
    } else {
        let scaled = (f64::from(width) * f64::from(side) / f64::from(height)).round() as u32;
        (scaled.max(side), side)
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
