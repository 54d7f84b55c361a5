//! Cropper state and the values it hands out.

use serde::{Deserialize, Serialize};

use crate::decode::DecodedImage;
use crate::encode::EncodedImage;
use crate::transform::PixelRect;

/// Lifecycle of the document currently held by a [`super::Cropper`].
///
/// ```text
/// Empty -> Decoding -> Loaded -> Cropping -> Cropped
///                  \-> PassThrough     Cropped -> Loaded (reset)
/// any -> Empty (discard)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CropperState {
    /// Nothing loaded.
    #[default]
    Empty,
    /// A file was accepted and its bytes are being read/decoded.
    Decoding,
    /// Source image shown, no selection yet.
    Loaded,
    /// A selection is being dragged or has been dragged.
    Cropping,
    /// A crop was applied; the cropped image is the working image.
    Cropped,
    /// A document that skips cropping; only the raw file is available.
    PassThrough,
}

impl CropperState {
    pub fn as_str(self) -> &'static str {
        match self {
            CropperState::Empty => "empty",
            CropperState::Decoding => "decoding",
            CropperState::Loaded => "loaded",
            CropperState::Cropping => "cropping",
            CropperState::Cropped => "cropped",
            CropperState::PassThrough => "passThrough",
        }
    }

    /// Whether a raster is on screen.
    pub fn has_image(self) -> bool {
        matches!(
            self,
            CropperState::Loaded | CropperState::Cropping | CropperState::Cropped
        )
    }
}

impl std::fmt::Display for CropperState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies one file selection. A decode result is only accepted if it
/// carries the ticket of the most recent selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket {
    pub(crate) generation: u64,
}

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// What happened to a finished load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// An image was decoded and is now the source.
    Image { width: u32, height: u32 },
    /// A document was stored for whole-document OCR.
    Document,
    /// The selection was replaced or discarded while loading; ignored.
    Superseded,
}

/// Result of applying a crop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CroppedImage {
    /// Cropped raster at source resolution.
    pub image: DecodedImage,
    /// The raster re-encoded for hand-off.
    pub encoded: EncodedImage,
    /// Region of the source it was cut from.
    pub source_region: PixelRect,
}
