//! Geometry between the source raster and the on-screen raster.
//!
//! # Pipeline
//!
//! 1. [`compute_projection`] picks a scale so the source fits the display bounds
//! 2. The user drags a [`CropRect`] on the display raster ([`draw_outline`]
//!    shows it)
//! 3. [`map_to_source`] normalizes the rectangle and maps it back to source pixels
//! 4. [`crop_pixels`] copies that region out of the untouched source
//!
//! # Coordinate System
//!
//! - Display coordinates are floats in the projected raster's pixel space
//! - Source coordinates are whole pixels of the decoded upload
//! - Origin is top-left corner

mod crop;
mod overlay;
mod projection;

pub use crop::{apply_crop, crop_pixels, map_to_source, CropRect, PixelRect, Point};
pub use overlay::draw_outline;
pub use projection::{compute_projection, DisplayProjection};
