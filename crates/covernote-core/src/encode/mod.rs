//! JPEG encoding stage for covernote.
//!
//! Serializes the final square buffer with configurable quality, chroma
//! subsampling, and scan layout. No source metadata can reach the output:
//! encoding always starts from a freshly composited pixel buffer.

mod jpeg;

pub use jpeg::{encode_jpeg, ChromaSampling, EncodeError};
