//! Color-mode flattening: every decoded image becomes opaque 8-bit RGB.
//!
//! JPEG has no transparency, so alpha must be resolved before encoding.
//! Alpha is composited onto an opaque black background; grayscale and
//! high-bit-depth modes are converted through the `image` crate.

use image::{Rgb, RgbImage};

use crate::decode::SourceImage;

/// Flatten a decoded image to opaque RGB.
///
/// Images with an alpha channel are composited onto black; everything else
/// is converted to 8-bit RGB directly. Total: always succeeds given a valid
/// decode, and re-flattening an already-opaque RGB image leaves every pixel
/// value unchanged.
pub fn flatten(source: SourceImage) -> RgbImage {
    let image = source.into_inner();

    if !image.color().has_alpha() {
        return image.into_rgb8();
    }

    let rgba = image.into_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        Rgb([
            composite_onto_black(r, a),
            composite_onto_black(g, a),
            composite_onto_black(b, a),
        ])
    })
}

/// Blend one channel against a black background: `round(c * a / 255)`.
#[inline]
fn composite_onto_black(channel: u8, alpha: u8) -> u8 {
    ((u16::from(channel) * u16::from(alpha) + 127) / 255) as u8
}

#[cfg(test)]
mod tests {
    use image::{DynamicImage, GrayImage, Luma, LumaA, Rgba, RgbaImage};

    use super::*;
    use crate::decode::SourceImage;

    fn source(image: DynamicImage) -> SourceImage {
        SourceImage::new(image)
    }

    #[test]
    fn test_opaque_rgb_is_untouched() {
        let rgb = RgbImage::from_pixel(3, 2, Rgb([200, 100, 50]));
        let result = flatten(source(DynamicImage::ImageRgb8(rgb.clone())));

        assert_eq!(result, rgb);
    }

    #[test]
    fn test_flatten_is_idempotent() {
        let rgba = RgbaImage::from_pixel(4, 4, Rgba([180, 90, 45, 77]));
        let once = flatten(source(DynamicImage::ImageRgba8(rgba)));
        let twice = flatten(source(DynamicImage::ImageRgb8(once.clone())));

        assert_eq!(once, twice);
    }

    #[test]
    fn test_semi_transparent_composites_onto_black() {
        let rgba = RgbaImage::from_pixel(1, 1, Rgba([200, 100, 50, 128]));
        let result = flatten(source(DynamicImage::ImageRgba8(rgba)));

        // round(c * 128 / 255) per channel
        assert_eq!(result.get_pixel(0, 0).0, [100, 50, 25]);
    }

    #[test]
    fn test_fully_transparent_becomes_black() {
        let rgba = RgbaImage::from_pixel(2, 2, Rgba([255, 255, 255, 0]));
        let result = flatten(source(DynamicImage::ImageRgba8(rgba)));

        for pixel in result.pixels() {
            assert_eq!(pixel.0, [0, 0, 0]);
        }
    }

    #[test]
    fn test_fully_opaque_alpha_preserves_values() {
        let rgba = RgbaImage::from_pixel(2, 2, Rgba([200, 100, 50, 255]));
        let result = flatten(source(DynamicImage::ImageRgba8(rgba)));

        assert_eq!(result.get_pixel(0, 0).0, [200, 100, 50]);
    }

    #[test]
    fn test_grayscale_expands_to_rgb() {
        let gray = GrayImage::from_pixel(2, 2, Luma([99]));
        let result = flatten(source(DynamicImage::ImageLuma8(gray)));

        assert_eq!(result.get_pixel(0, 0).0, [99, 99, 99]);
    }

    #[test]
    fn test_grayscale_alpha_composites() {
        let gray = image::GrayAlphaImage::from_pixel(1, 1, LumaA([100, 0]));
        let result = flatten(source(DynamicImage::ImageLumaA8(gray)));

        assert_eq!(result.get_pixel(0, 0).0, [0, 0, 0]);
    }

    #[test]
    fn test_composite_rounding() {
        assert_eq!(composite_onto_black(255, 255), 255);
        assert_eq!(composite_onto_black(255, 0), 0);
        assert_eq!(composite_onto_black(0, 255), 0);
        // 255 * 128 / 255 = 128 exactly
        assert_eq!(composite_onto_black(255, 128), 128);
        // 100 * 128 / 255 = 50.19 -> 50
        assert_eq!(composite_onto_black(100, 128), 50);
    }
}
