//! Doccrop Core - document capture and crop library
//!
//! This crate holds everything the document capture page needs that is not
//! browser glue: decoding uploads, projecting them onto a bounded display
//! raster, the interactive crop state machine, re-encoding the result, and
//! the data shapes exchanged with the OCR and segmentation services.

pub mod config;
pub mod cropper;
pub mod decode;
pub mod encode;
pub mod error;
pub mod ocr;
pub mod transform;

pub use config::{CropperConfig, ServiceConfig};
pub use cropper::{
    CroppedImage, Cropper, CropperEvent, CropperState, ListenerId, LoadOutcome, LoadTicket,
};
pub use decode::{DecodedImage, FileInput, FileKind, RawFile};
pub use encode::{EncodedImage, OutputFormat};
pub use error::CropError;
pub use transform::{CropRect, DisplayProjection, PixelRect, Point};
