//! Doccrop WASM - WebAssembly bindings for Doccrop
//!
//! This crate exposes the doccrop-core cropper to a JavaScript/TypeScript
//! document capture page.
//!
//! # Module Structure
//!
//! - `cropper` - The interactive crop state machine (`JsCropper`)
//! - `types` - WASM-compatible wrapper types for image data
//! - `decode` - Upload decoding and file classification
//! - `encode` - PNG/JPEG encoding
//! - `ocr` - Request bodies and response parsing for the OCR and segmentation services
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsCropper, set_log_level } from '@doccrop/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//! set_log_level('debug');
//!
//! const cropper = new JsCropper();
//! cropper.load(file.name, file.type, new Uint8Array(await file.arrayBuffer()));
//! ```

use wasm_bindgen::prelude::*;

mod cropper;
mod decode;
mod encode;
mod logging;
mod ocr;
mod types;

// Re-export public types
pub use cropper::{JsCropper, JsLoadTicket};
pub use decode::{decode_image, file_kind};
pub use encode::{encode_image, encode_jpeg, encode_png};
pub use ocr::{
    ocr_failure_text, ocr_parsed_text, ocr_pending_text, segmentation_failure_text,
    segmentation_request, segmented_text, split_sections,
};
pub use types::{JsDecodedImage, JsEncodedImage};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    logging::init(log::LevelFilter::Info);
}

/// Change how much the core logs to the browser console (`off`, `error`,
/// `warn`, `info`, `debug`, `trace`).
#[wasm_bindgen]
pub fn set_log_level(level: &str) -> Result<(), JsValue> {
    let level = logging::parse_level(level)
        .ok_or_else(|| JsValue::from_str(&format!("Unknown log level: {}", level)))?;
    logging::init(level);
    Ok(())
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
