//! JPEG serialization.
//!
//! This is the highest-fidelity legal JPEG path: progressive scan layout,
//! optimized Huffman tables, and selectable chroma subsampling with
//! full-resolution 4:4:4 as the default. The encoder starts from a bare
//! pixel buffer, so no EXIF, ICC, or comment segment from the source can
//! survive into the output.

use image::RgbImage;
use jpeg_encoder::{ColorType, Encoder, SamplingFactor};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during JPEG encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Width or height is zero or beyond what JPEG can address.
    #[error("invalid dimensions: {width}x{height} (each side must be 1..=65535)")]
    InvalidDimensions { width: u32, height: u32 },

    /// The encoder failed; given a valid buffer this indicates resource
    /// exhaustion and is not retried.
    #[error("JPEG encoding failed: {0}")]
    EncodingFailed(String),
}

/// Chroma subsampling mode for the encoded JPEG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChromaSampling {
    /// Full-resolution chroma (4:4:4). Maximum color fidelity; the right
    /// choice for artwork with hard color edges.
    #[default]
    Full,
    /// 2x2 subsampled chroma (4:2:0). Smaller files, softer color edges.
    Quarter,
}

impl ChromaSampling {
    fn sampling_factor(self) -> SamplingFactor {
        match self {
            ChromaSampling::Full => SamplingFactor::F_1_1,
            ChromaSampling::Quarter => SamplingFactor::F_2_2,
        }
    }
}

/// Encode an RGB buffer to JPEG bytes.
///
/// `quality` is clamped to 1-100. Optimized Huffman tables are always on.
/// Output is deterministic: the same buffer and settings produce
/// byte-identical results.
///
/// # Errors
///
/// Returns [`EncodeError::InvalidDimensions`] for zero or JPEG-unaddressable
/// dimensions, [`EncodeError::EncodingFailed`] if serialization itself fails.
pub fn encode_jpeg(
    image: &RgbImage,
    quality: u8,
    chroma: ChromaSampling,
    progressive: bool,
) -> Result<Vec<u8>, EncodeError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 || width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let quality = quality.clamp(1, 100);

    let mut bytes = Vec::new();
    let mut encoder = Encoder::new(&mut bytes, quality);
    encoder.set_sampling_factor(chroma.sampling_factor());
    encoder.set_optimized_huffman_tables(true);
    encoder.set_progressive(progressive);

    encoder
        .encode(image.as_raw(), width as u16, height as u16, ColorType::Rgb)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(bytes)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
