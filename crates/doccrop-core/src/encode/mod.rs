//! Re-encoding of cropped rasters.
//!
//! This module provides functionality for:
//! - Encoding RGB rasters to PNG (default, lossless) or JPEG
//! - Packaging the result as an [`EncodedImage`] that can be rendered as a
//!   `data:` URL for browser-side OCR
//!
//! # Examples
//!
//! ```ignore
//! use doccrop_core::encode::{encode, OutputFormat};
//!
//! let pixels = vec![255u8; 100 * 100 * 3];
//! let encoded = encode(&pixels, 100, 100, OutputFormat::Png, 90).unwrap();
//! let url = encoded.to_data_url();
//! ```

mod jpeg;
mod png;
mod types;

pub use jpeg::encode_jpeg;
pub use png::encode_png;
pub use types::{EncodeError, EncodedImage, OutputFormat};

use crate::decode::DecodedImage;

/// Encode RGB pixel data in the requested format.
///
/// `jpeg_quality` is ignored for PNG.
pub fn encode(
    pixels: &[u8],
    width: u32,
    height: u32,
    format: OutputFormat,
    jpeg_quality: u8,
) -> Result<EncodedImage, EncodeError> {
    let bytes = match format {
        OutputFormat::Png => encode_png(pixels, width, height)?,
        OutputFormat::Jpeg => encode_jpeg(pixels, width, height, jpeg_quality)?,
    };

    Ok(EncodedImage {
        format,
        width,
        height,
        bytes,
    })
}

/// Encode a decoded raster in the requested format.
pub fn encode_image(
    image: &DecodedImage,
    format: OutputFormat,
    jpeg_quality: u8,
) -> Result<EncodedImage, EncodeError> {
    encode(&image.pixels, image.width, image.height, format, jpeg_quality)
}
