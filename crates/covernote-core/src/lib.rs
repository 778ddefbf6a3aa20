//! Covernote Core - cover art normalization pipeline
//!
//! This crate turns a user-uploaded image into a fixed-dimension square
//! JPEG suitable for a distribution platform's cover-art requirement.
//! The pipeline is strictly linear:
//!
//! 1. **Decode** - sniff the container, decode, apply EXIF orientation
//! 2. **Flatten** - composite alpha onto black, convert to opaque RGB
//! 3. **Geometry** - resolve the crop (caller-supplied and clamped, or the
//!    automatic centered square) and resample to the target side
//! 4. **Encode** - progressive JPEG, optimized Huffman tables, 4:4:4 chroma
//!
//! Each call owns its buffers end to end; there is no shared state, so the
//! pipeline is trivially safe to invoke from concurrent request handlers.
//! Any stage failure aborts the call with a typed error; partial output is
//! never returned.
//!
//! ```ignore
//! use covernote_core::{normalize_cover, TargetSpec};
//!
//! let upload = std::fs::read("cover.png").unwrap();
//! let cover = normalize_cover(&upload, None, Some("cover.png"), &TargetSpec::standard()).unwrap();
//! std::fs::write(&cover.suggested_filename, &cover.bytes).unwrap();
//! ```

use std::ffi::OsStr;
use std::path::Path;

use thiserror::Error;
use tracing::debug;

pub mod decode;
pub mod encode;
pub mod flatten;
pub mod geometry;

pub use decode::{decode, DecodeError, Orientation, SourceImage};
pub use encode::{encode_jpeg, ChromaSampling, EncodeError};
pub use flatten::flatten;
pub use geometry::{
    resolve_square, CropPolicy, CropRect, FilterType, GeometryError, InvalidCropError,
    ResolvedCrop,
};

/// Fallback filename stem when the upload has no usable name.
const DEFAULT_STEM: &str = "cover";

/// Encoding and geometry parameters for one normalization run.
///
/// There is no process-wide configuration: callers pass a `TargetSpec`
/// (usually one of the named profiles) into every call.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TargetSpec {
    /// Output side length in pixels; the result is always `side x side`.
    pub side: u32,
    /// JPEG quality factor (0-100; clamped to 1-100 at encode time).
    pub quality: u8,
    /// Resampling filter.
    pub filter: FilterType,
    /// Chroma subsampling of the encoded JPEG.
    pub chroma: ChromaSampling,
    /// Progressive scan layout instead of baseline.
    pub progressive: bool,
    /// How a non-square manual crop becomes a square.
    pub crop_policy: CropPolicy,
}

impl TargetSpec {
    /// Side length required for cover art.
    pub const COVER_SIDE: u32 = 3000;

    /// The standard distribution profile: quality 95, cover-style manual
    /// crops (scale, then trim the overflow).
    pub fn standard() -> Self {
        Self {
            side: Self::COVER_SIDE,
            quality: 95,
            filter: FilterType::Lanczos3,
            chroma: ChromaSampling::Full,
            progressive: true,
            crop_policy: CropPolicy::ScaleThenCrop,
        }
    }

    /// Higher-fidelity profile: quality 98, manual crops squared before
    /// resampling.
    pub fn archival() -> Self {
        Self {
            quality: 98,
            crop_policy: CropPolicy::CropThenResize,
            ..Self::standard()
        }
    }
}

impl Default for TargetSpec {
    fn default() -> Self {
        Self::standard()
    }
}

/// Final result of a normalization run: JPEG bytes plus the download
/// filename the caller should suggest. Nothing is retained by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedCover {
    pub bytes: Vec<u8>,
    pub suggested_filename: String,
}

/// Any failure of the normalization pipeline, by stage.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// Unreadable, empty, or unsupported input bytes.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Structurally malformed crop payload. Out-of-range coordinates are
    /// not an error; they are clamped.
    #[error(transparent)]
    InvalidCrop(#[from] InvalidCropError),

    /// Degenerate image dimensions after decode.
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Serialization failure; internal, not caused by user input.
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Run the full normalization pipeline on an uploaded image.
///
/// `crop` selects manual mode; without it the largest centered square of
/// the source is used. `source_name` is the uploaded filename, used only
/// to derive the suggested download name.
///
/// # Errors
///
/// Returns the failing stage's error; see [`NormalizeError`]. No partial
/// output is produced on failure.
pub fn normalize_cover(
    input: &[u8],
    crop: Option<&CropRect>,
    source_name: Option<&str>,
    target: &TargetSpec,
) -> Result<EncodedCover, NormalizeError> {
    let source = decode(input)?;
    debug!(
        width = source.width(),
        height = source.height(),
        alpha = source.has_alpha(),
        "decoded source image"
    );

    let rgb = flatten(source);
    let square = resolve_square(&rgb, crop, target.side, target.filter, target.crop_policy)?;
    let bytes = encode_jpeg(&square, target.quality, target.chroma, target.progressive)?;
    debug!(bytes = bytes.len(), side = target.side, "encoded cover");

    Ok(EncodedCover {
        bytes,
        suggested_filename: suggested_filename(source_name, target.side),
    })
}

/// Derive the suggested download filename from the uploaded name.
///
/// Uses the original filename's stem, falling back to `cover` when the
/// name is absent or blank.
fn suggested_filename(source_name: Option<&str>, side: u32) -> String {
    let stem = source_name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .and_then(|name| Path::new(name).file_stem())
        .and_then(OsStr::to_str)
        .unwrap_or(DEFAULT_STEM);

    format!("{stem}_routenote_{side}x{side}.jpg")
}
