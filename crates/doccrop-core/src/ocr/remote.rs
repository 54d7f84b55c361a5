//! Whole-document recognition through the remote OCR service.
//!
//! The service takes a multipart form and answers with JSON whose text lives
//! at `ParsedResults[0].ParsedText`.

use serde_json::Value;

use super::{Backend, RecognitionError, RecognitionStatus, OCR_LANGUAGE};
use crate::config::ServiceConfig;
use crate::decode::RawFile;

pub const OCR_SPACE_ENDPOINT: &str = "https://api.ocr.space/parse/image";

/// Shown when the service answers but found no text.
pub const UNREADABLE_TEXT: &str = "Couldn't read. Please try a smaller file.";

/// The multipart form the relay forwards to the OCR service.
#[derive(Clone)]
pub struct RemoteOcrForm<'a> {
    pub endpoint: &'static str,
    pub file: &'a RawFile,
    api_key: &'a str,
}

impl<'a> RemoteOcrForm<'a> {
    pub fn new(file: &'a RawFile, config: &'a ServiceConfig) -> Result<Self, RecognitionError> {
        if file.bytes.is_empty() {
            return Err(RecognitionError::MissingFile);
        }
        Ok(Self {
            endpoint: OCR_SPACE_ENDPOINT,
            file,
            api_key: config.ocr_key()?,
        })
    }

    /// Non-file form fields, in the order they are appended.
    pub fn text_fields(&self) -> [(&'static str, &str); 2] {
        [("apikey", self.api_key), ("language", OCR_LANGUAGE)]
    }

    /// Name of the form field carrying the file.
    pub fn file_field(&self) -> &'static str {
        "file"
    }
}

impl std::fmt::Debug for RemoteOcrForm<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteOcrForm")
            .field("endpoint", &self.endpoint)
            .field("file", &self.file.name)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Posts a [`RemoteOcrForm`] and returns the service's JSON untouched.
pub trait RemoteRecognizer {
    fn recognize(&self, file: &RawFile) -> Result<Value, RecognitionError>;
}

/// Pull the recognized text out of a service response.
pub fn parsed_text(response: &Value) -> String {
    response["ParsedResults"][0]["ParsedText"]
        .as_str()
        .filter(|text| !text.is_empty())
        .unwrap_or(UNREADABLE_TEXT)
        .to_string()
}

pub fn recognize_remote<R: RemoteRecognizer + ?Sized>(
    recognizer: &R,
    file: &RawFile,
) -> RecognitionStatus {
    log::info!(
        "remote OCR on {:?} ({}, {} bytes)",
        file.name,
        file.mime_type,
        file.bytes.len()
    );
    let result = recognizer.recognize(file).map(|response| {
        log::debug!("remote OCR response: {}", response);
        parsed_text(&response)
    });
    RecognitionStatus::from_result(Backend::Remote, result)
}
