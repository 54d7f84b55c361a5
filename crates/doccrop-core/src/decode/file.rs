//! Uploaded file classification.
//!
//! The browser hands us a file name, a MIME type string and (eventually)
//! the bytes. Only the MIME type decides how the file is routed.

use serde::{Deserialize, Serialize};

/// MIME type of documents that skip cropping and go to remote OCR whole.
pub const PDF_MIME: &str = "application/pdf";

/// How an upload is routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// `image/*`: decoded and offered for interactive cropping.
    Image,
    /// A document (PDF): kept as a raw file for whole-document OCR.
    Document,
    /// Anything else.
    Unsupported,
}

impl FileKind {
    /// Classify a MIME type string. Matching ignores ASCII case and
    /// parameters such as `; charset=...`.
    pub fn from_mime(mime: &str) -> Self {
        let essence = mime
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        if essence.starts_with("image/") {
            FileKind::Image
        } else if essence == PDF_MIME {
            FileKind::Document
        } else {
            FileKind::Unsupported
        }
    }
}

/// A user-provided file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInput {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl FileInput {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub fn kind(&self) -> FileKind {
        FileKind::from_mime(&self.mime_type)
    }
}

/// The original upload, retained untouched for the remote OCR path.
pub type RawFile = FileInput;
