//! Upload decoding for Doccrop.
//!
//! This module provides functionality for:
//! - Classifying uploaded files by MIME type
//! - Decoding raster images (PNG, JPEG, GIF, WebP, BMP) with EXIF orientation
//! - Resizing rasters for on-screen display
//!
//! # Architecture
//!
//! Decoding is designed to be called from the browser main thread via WASM
//! bindings. All operations are synchronous; the only asynchronous step (reading
//! the file bytes) happens in JavaScript before the bytes reach us.

mod file;
mod raster;
mod resize;
mod types;

pub use file::{FileInput, FileKind, RawFile, PDF_MIME};
pub use raster::decode_image;
pub use resize::resize;
pub use types::{DecodeError, DecodedImage, FilterType, Orientation};
