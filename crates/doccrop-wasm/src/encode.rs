//! Image encoding WASM bindings.
//!
//! # Functions
//!
//! - [`encode_png`] - Encode RGB pixel data to PNG bytes
//! - [`encode_jpeg`] - Encode RGB pixel data to JPEG bytes
//! - [`encode_image`] - Encode a JsDecodedImage in a named format
//!
//! # Example
//!
//! ```typescript
//! import { encode_image } from '@doccrop/wasm';
//!
//! const encoded = encode_image(image, 'png', 90);
//! img.src = encoded.data_url();
//! ```

use crate::types::{JsDecodedImage, JsEncodedImage};
use doccrop_core::encode::{self, OutputFormat};
use wasm_bindgen::prelude::*;

/// Encode RGB pixel data (3 bytes per pixel, row-major) to PNG bytes.
///
/// # Errors
///
/// Returns an error if the pixel data length doesn't match width * height * 3
/// or either dimension is zero.
#[wasm_bindgen]
pub fn encode_png(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, JsValue> {
    encode::encode_png(pixels, width, height).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Encode RGB pixel data to JPEG bytes. `quality` is clamped to 1-100.
#[wasm_bindgen]
pub fn encode_jpeg(pixels: &[u8], width: u32, height: u32, quality: u8) -> Result<Vec<u8>, JsValue> {
    encode::encode_jpeg(pixels, width, height, quality).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Encode a decoded image. `format` is `"png"` or `"jpeg"`.
#[wasm_bindgen]
pub fn encode_image(
    image: &JsDecodedImage,
    format: &str,
    quality: u8,
) -> Result<JsEncodedImage, JsValue> {
    let format = parse_format(format)?;
    encode::encode_image(image.as_decoded(), format, quality)
        .map(JsEncodedImage::from_encoded)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

fn parse_format(format: &str) -> Result<OutputFormat, JsValue> {
    match format.to_ascii_lowercase().as_str() {
        "png" => Ok(OutputFormat::Png),
        "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
        other => Err(JsValue::from_str(&format!("Unknown output format: {}", other))),
    }
}
