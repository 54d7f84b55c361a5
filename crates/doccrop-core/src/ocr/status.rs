//! What the text panel shows while and after recognition runs.

use super::RecognitionError;

pub(crate) const PENDING_TEXT: &str = "Processing OCR...";
const LOCAL_FAILED_TEXT: &str = "Error reading text with Tesseract";
const REMOTE_HTTP_FAILED_TEXT: &str = "Error: Unable to process OCR";
const REMOTE_FAILED_TEXT: &str = "Error reading text";

/// Which recognizer produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Local,
    Remote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The in-page engine threw.
    Local,
    /// The remote service answered with a non-success status.
    RemoteHttp,
    /// Anything else on the remote path (network, bad JSON).
    Remote,
}

impl FailureKind {
    pub fn classify(backend: Backend, error: &RecognitionError) -> Self {
        match (backend, error) {
            (Backend::Local, _) => FailureKind::Local,
            (Backend::Remote, RecognitionError::Http { .. }) => FailureKind::RemoteHttp,
            (Backend::Remote, _) => FailureKind::Remote,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RecognitionStatus {
    #[default]
    Idle,
    Pending,
    Done(String),
    Failed(FailureKind),
}

impl RecognitionStatus {
    pub fn from_result(backend: Backend, result: Result<String, RecognitionError>) -> Self {
        match result {
            Ok(text) => RecognitionStatus::Done(text),
            Err(e) => {
                log::warn!("{:?} recognition failed: {}", backend, e);
                RecognitionStatus::Failed(FailureKind::classify(backend, &e))
            }
        }
    }

    pub fn display_text(&self) -> &str {
        match self {
            RecognitionStatus::Idle => "",
            RecognitionStatus::Pending => PENDING_TEXT,
            RecognitionStatus::Done(text) => text,
            RecognitionStatus::Failed(FailureKind::Local) => LOCAL_FAILED_TEXT,
            RecognitionStatus::Failed(FailureKind::RemoteHttp) => REMOTE_HTTP_FAILED_TEXT,
            RecognitionStatus::Failed(FailureKind::Remote) => REMOTE_FAILED_TEXT,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, RecognitionStatus::Pending)
    }

    /// Recognized text worth sending for segmentation.
    pub fn text(&self) -> Option<&str> {
        match self {
            RecognitionStatus::Done(text) if !text.is_empty() => Some(text),
            _ => None,
        }
    }
}
