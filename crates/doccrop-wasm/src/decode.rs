//! Image decoding WASM bindings.
//!
//! # Functions
//!
//! - [`decode_image`] - Decode an uploaded image (EXIF orientation applied)
//! - [`file_kind`] - Classify a MIME type as `image`, `document` or `unsupported`
//!
//! # Example
//!
//! ```typescript
//! import { decode_image, file_kind } from '@doccrop/wasm';
//!
//! if (file_kind(file.type) === 'image') {
//!   const bytes = new Uint8Array(await file.arrayBuffer());
//!   const image = decode_image(bytes);
//!   console.log(`Decoded ${image.width}x${image.height}`);
//! }
//! ```

use crate::types::JsDecodedImage;
use doccrop_core::decode::{self, FileKind};
use wasm_bindgen::prelude::*;

/// Decode JPEG, PNG, GIF, WebP or BMP bytes to RGB.
///
/// # Errors
///
/// Returns an error if the bytes are empty, in an unrecognized format, or
/// corrupted.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsDecodedImage, JsValue> {
    decode::decode_image(bytes)
        .map(JsDecodedImage::from_decoded)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Classify a file by MIME type.
#[wasm_bindgen]
pub fn file_kind(mime_type: &str) -> String {
    kind_name(FileKind::from_mime(mime_type)).to_string()
}

pub(crate) fn kind_name(kind: FileKind) -> &'static str {
    match kind {
        FileKind::Image => "image",
        FileKind::Document => "document",
        FileKind::Unsupported => "unsupported",
    }
}
