//! Boundary types for the services that consume the cropper's output.
//!
//! Two recognizers turn images into text: a local in-page engine fed the
//! cropped image, and a remote HTTP service fed the original upload. A third
//! service re-segments recognized text into headed sections. This module
//! holds the request/response shapes and the text shown to the user; the
//! actual transport belongs to the host.

mod local;
mod remote;
mod segment;
mod status;

pub use local::{recognize_local, LocalRecognizer};
pub use remote::{
    parsed_text, recognize_remote, RemoteOcrForm, RemoteRecognizer, OCR_SPACE_ENDPOINT,
    UNREADABLE_TEXT,
};
pub use segment::{
    segmented_text, split_sections, ChatMessage, ChatRequest, Section, SegmentationInput,
    LLM_ENDPOINT, LLM_MODEL, SEGMENTATION_FAILED_TEXT, SEGMENTATION_PROMPT, UNSEGMENTED_TEXT,
};
pub use status::{Backend, FailureKind, RecognitionStatus};

use thiserror::Error;

use crate::config::ConfigError;

/// Recognition language passed to both engines.
pub const OCR_LANGUAGE: &str = "eng";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecognitionError {
    #[error("No file provided")]
    MissingFile,

    #[error("Recognition engine failed: {0}")]
    Engine(String),

    #[error("Service responded with HTTP {status}")]
    Http { status: u16 },

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Malformed service response: {0}")]
    MalformedResponse(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<serde_json::Error> for RecognitionError {
    fn from(e: serde_json::Error) -> Self {
        RecognitionError::MalformedResponse(e.to_string())
    }
}
