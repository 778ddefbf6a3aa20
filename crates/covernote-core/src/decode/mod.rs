//! Image decoding stage for covernote.
//!
//! Turns raw upload bytes into an in-memory pixel buffer with EXIF
//! orientation already applied:
//! - The container format is sniffed from the bytes (JPEG, PNG, WebP, ...)
//! - Orientation metadata is read and consumed; pixels are physically
//!   rotated/flipped before anything downstream sees them
//! - The original color mode (including alpha) is preserved for the
//!   flattening stage
//!
//! # Examples
//!
//! ```ignore
//! use covernote_core::decode::decode;
//!
//! let bytes = std::fs::read("upload.png").unwrap();
//! let source = decode(&bytes).unwrap();
//! println!("Decoded {}x{} image", source.width(), source.height());
//! ```

mod reader;
mod types;

pub use reader::decode;
pub use types::{DecodeError, Orientation, SourceImage};
