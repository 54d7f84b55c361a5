//! Helpers for the OCR and segmentation round trips made by the page.
//!
//! The page performs the HTTP calls itself; these functions build request
//! bodies and turn raw responses into the text it displays.

use doccrop_core::ocr::{self, FailureKind, RecognitionStatus, SegmentationInput};
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;

fn to_json(value: JsValue) -> Result<Value, JsValue> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Invalid response: {}", e)))
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Text from a remote OCR response, or the "couldn't read" fallback.
#[wasm_bindgen]
pub fn ocr_parsed_text(response: JsValue) -> Result<String, JsValue> {
    Ok(ocr::parsed_text(&to_json(response)?))
}

/// Text to show while recognition runs.
#[wasm_bindgen]
pub fn ocr_pending_text() -> String {
    RecognitionStatus::Pending.display_text().to_string()
}

/// Text to show when recognition fails. `backend` is `"local"` or
/// `"remote"`; `http_status` is the non-success status the remote service
/// answered with, if any.
#[wasm_bindgen]
pub fn ocr_failure_text(backend: &str, http_status: Option<u16>) -> String {
    let kind = match (backend, http_status) {
        ("local", _) => FailureKind::Local,
        (_, Some(_)) => FailureKind::RemoteHttp,
        _ => FailureKind::Remote,
    };
    log::debug!("{} OCR failure shown as {:?}", backend, kind);
    RecognitionStatus::Failed(kind).display_text().to_string()
}

/// Body for the segmentation relay, or `null` when `ocr_text` is empty.
#[wasm_bindgen]
pub fn segmentation_request(ocr_text: &str) -> Result<JsValue, JsValue> {
    to_js(&SegmentationInput::new(ocr_text))
}

/// Formatted sections from a relay response, or the retry message.
#[wasm_bindgen]
pub fn segmented_text(response: JsValue) -> Result<String, JsValue> {
    Ok(ocr::segmented_text(Ok(&to_json(response)?)))
}

/// Text to show when the relay could not be reached.
#[wasm_bindgen]
pub fn segmentation_failure_text() -> String {
    ocr::SEGMENTATION_FAILED_TEXT.to_string()
}

/// Split formatted text into `[{heading, content}]`.
#[wasm_bindgen]
pub fn split_sections(text: &str) -> Result<JsValue, JsValue> {
    to_js(&ocr::split_sections(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_texts() {
        assert_eq!(ocr_pending_text(), "Processing OCR...");
        assert_eq!(
            ocr_failure_text("local", None),
            "Error reading text with Tesseract"
        );
        assert_eq!(
            ocr_failure_text("remote", Some(502)),
            "Error: Unable to process OCR"
        );
        assert_eq!(ocr_failure_text("remote", None), "Error reading text");
        assert_eq!(segmentation_failure_text(), "Error categorizing content.");
    }
}
