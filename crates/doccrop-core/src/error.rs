//! Errors surfaced by the interactive cropper.
//!
//! Every variant is recoverable: the cropper leaves its previous state in
//! place and the host shows the message to the user.

use thiserror::Error;

use crate::config::ConfigError;
use crate::decode::DecodeError;
use crate::encode::EncodeError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CropError {
    /// The upload is neither an image nor a PDF.
    #[error("Unsupported file type{}. Please upload an image or PDF.", format_mime(.mime_type))]
    UnsupportedFileType { mime_type: String },

    /// The image bytes could not be decoded.
    #[error("Could not read image: {0}")]
    DecodeFailure(#[from] DecodeError),

    /// The selection has zero width or height.
    #[error("Selection is empty; drag a rectangle over the image first")]
    DegenerateCrop,

    /// The selection lies entirely outside the image.
    #[error("Selection lies outside the image")]
    OutOfBoundsCrop,

    /// No image is loaded.
    #[error("No image loaded")]
    NoImage,

    /// An image is still being decoded.
    #[error("Image is still loading")]
    DecodePending,

    /// The loaded file is a document that cannot be cropped interactively.
    #[error("This file type can't be cropped; it will be read as a whole document")]
    NotCroppable,

    /// A crop was already applied; reset to the original to crop again.
    #[error("Image is already cropped; reset to crop again")]
    AlreadyCropped,

    /// Re-encoding the crop failed.
    #[error("Could not encode cropped image: {0}")]
    Encode(#[from] EncodeError),

    /// Invalid cropper configuration.
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

fn format_mime(mime_type: &str) -> String {
    if mime_type.is_empty() {
        String::new()
    } else {
        format!(" ({})", mime_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_message_includes_mime() {
        let err = CropError::UnsupportedFileType {
            mime_type: "text/plain".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unsupported file type (text/plain). Please upload an image or PDF."
        );

        let err = CropError::UnsupportedFileType {
            mime_type: String::new(),
        };
        assert_eq!(
            err.to_string(),
            "Unsupported file type. Please upload an image or PDF."
        );
    }

    #[test]
    fn test_decode_error_converts() {
        let err: CropError = DecodeError::InvalidFormat.into();
        assert_eq!(
            err.to_string(),
            "Could not read image: Invalid or unsupported image format"
        );
    }
}
