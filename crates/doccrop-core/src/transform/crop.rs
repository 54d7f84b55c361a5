//! Crop geometry: from a dragged display rectangle to source pixels.
//!
//! # Coordinate System
//!
//! - Selections live in display coordinates (the projected raster the user
//!   sees), as floats, with possibly negative width/height
//! - Crops are cut from the source raster in integer pixels at 1:1 scale
//! - Origin is top-left corner
//!
//! # Example
//!
//! ```ignore
//! let projection = compute_projection(1600, 1200, 800, 600);
//! let selection = CropRect::from_points(Point::new(100.0, 100.0), Point::new(300.0, 250.0));
//! let region = map_to_source(&selection, &projection)?;
//! assert_eq!(region, PixelRect::new(200, 200, 400, 300));
//! ```

use serde::{Deserialize, Serialize};

use super::DisplayProjection;
use crate::decode::DecodedImage;
use crate::error::CropError;

/// A pointer position in display coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A selection rectangle in display coordinates.
///
/// `w` and `h` are signed: dragging up or left yields negative extents.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl CropRect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// The rectangle spanned by a drag from `start` to `current`.
    pub fn from_points(start: Point, current: Point) -> Self {
        Self {
            x: start.x,
            y: start.y,
            w: current.x - start.x,
            h: current.y - start.y,
        }
    }

    /// Sign-correct the rectangle so `w` and `h` are non-negative and
    /// `(x, y)` is the top-left corner.
    pub fn normalized(&self) -> Self {
        let (x, w) = if self.w < 0.0 {
            (self.x + self.w, -self.w)
        } else {
            (self.x, self.w)
        };
        let (y, h) = if self.h < 0.0 {
            (self.y + self.h, -self.h)
        } else {
            (self.y, self.h)
        };
        Self { x, y, w, h }
    }

    /// Zero width or zero height (or not a number at all).
    pub fn is_degenerate(&self) -> bool {
        !(self.w.abs() > 0.0 && self.h.abs() > 0.0)
    }
}

/// A region of the source raster in whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Map a display selection onto source pixels.
///
/// Edges are mapped independently through the inverse scale and rounded,
/// then clamped to `[0, source_width] x [0, source_height]`.
///
/// # Errors
///
/// - `CropError::DegenerateCrop` if the selection has zero area, either in
///   display space or after rounding to source pixels
/// - `CropError::OutOfBoundsCrop` if the selection has area but none of it
///   overlaps the source
pub fn map_to_source(
    selection: &CropRect,
    projection: &DisplayProjection,
) -> Result<PixelRect, CropError> {
    if selection.is_degenerate() {
        return Err(CropError::DegenerateCrop);
    }

    let rect = selection.normalized();
    let (sx, sy) = (projection.inverse_x(), projection.inverse_y());

    let left = (rect.x * sx).round();
    let top = (rect.y * sy).round();
    let right = ((rect.x + rect.w) * sx).round();
    let bottom = ((rect.y + rect.h) * sy).round();

    // Written so NaN edges fail as well
    if !(right > left && bottom > top) {
        return Err(CropError::DegenerateCrop);
    }

    let clamp_x = |v: f64| v.clamp(0.0, projection.source_width as f64) as u32;
    let clamp_y = |v: f64| v.clamp(0.0, projection.source_height as f64) as u32;

    let (left, right) = (clamp_x(left), clamp_x(right));
    let (top, bottom) = (clamp_y(top), clamp_y(bottom));

    let region = PixelRect::new(left, top, right - left, bottom - top);
    if region.is_empty() {
        return Err(CropError::OutOfBoundsCrop);
    }
    Ok(region)
}

/// Copy a pixel region out of `image` into a new raster at 1:1 scale.
///
/// The region is clipped to the image; the source is only read.
pub fn crop_pixels(image: &DecodedImage, region: PixelRect) -> Result<DecodedImage, CropError> {
    let left = region.x.min(image.width);
    let top = region.y.min(image.height);
    let right = region.x.saturating_add(region.width).min(image.width);
    let bottom = region.y.saturating_add(region.height).min(image.height);

    let out_width = right - left;
    let out_height = bottom - top;
    if out_width == 0 || out_height == 0 {
        return Err(CropError::OutOfBoundsCrop);
    }

    // Fast path: full region returns a clone
    if out_width == image.width && out_height == image.height {
        return Ok(image.clone());
    }

    let src_stride = image.width as usize * 3;
    let row_len = out_width as usize * 3;
    let mut output = Vec::with_capacity(row_len * out_height as usize);

    for y in top..bottom {
        let start = y as usize * src_stride + left as usize * 3;
        output.extend_from_slice(&image.pixels[start..start + row_len]);
    }

    Ok(DecodedImage::new(out_width, out_height, output))
}

/// Crop `image` to the part covered by a display selection.
pub fn apply_crop(
    image: &DecodedImage,
    selection: &CropRect,
    projection: &DisplayProjection,
) -> Result<(DecodedImage, PixelRect), CropError> {
    let region = map_to_source(selection, projection)?;
    let cropped = crop_pixels(image, region)?;
    Ok((cropped, region))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::compute_projection;

    /// Create a test image where each pixel has a unique value based on position.
    fn test_image(width: u32, height: u32) -> DecodedImage {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = ((y * width + x) % 256) as u8;
                pixels.extend_from_slice(&[v, v, v]);
            }
        }
        DecodedImage::new(width, height, pixels)
    }

    #[test]
    fn test_from_points_keeps_drag_direction() {
        let rect = CropRect::from_points(Point::new(300.0, 250.0), Point::new(100.0, 100.0));
        assert_eq!(rect, CropRect::new(300.0, 250.0, -200.0, -150.0));
    }

    #[test]
    fn test_normalize_negative_extents() {
        let rect = CropRect::new(300.0, 250.0, -200.0, -150.0).normalized();
        assert_eq!(rect, CropRect::new(100.0, 100.0, 200.0, 150.0));

        let rect = CropRect::new(10.0, 50.0, 20.0, -30.0).normalized();
        assert_eq!(rect, CropRect::new(10.0, 20.0, 20.0, 30.0));
    }

    #[test]
    fn test_degenerate_detection() {
        assert!(CropRect::new(5.0, 5.0, 0.0, 10.0).is_degenerate());
        assert!(CropRect::new(5.0, 5.0, 10.0, 0.0).is_degenerate());
        assert!(CropRect::new(5.0, 5.0, f64::NAN, 10.0).is_degenerate());
        assert!(!CropRect::new(5.0, 5.0, -1.0, -1.0).is_degenerate());
    }

    #[test]
    fn test_document_scenario() {
        let projection = compute_projection(1600, 1200, 800, 600);
        let selection =
            CropRect::from_points(Point::new(100.0, 100.0), Point::new(300.0, 250.0));

        assert_eq!(
            selection.normalized(),
            CropRect::new(100.0, 100.0, 200.0, 150.0)
        );

        let region = map_to_source(&selection, &projection).unwrap();
        assert_eq!(region, PixelRect::new(200, 200, 400, 300));

        let (cropped, _) = apply_crop(&test_image(1600, 1200), &selection, &projection).unwrap();
        assert_eq!((cropped.width, cropped.height), (400, 300));
    }

    #[test]
    fn test_reverse_drag_matches_forward_drag() {
        let projection = compute_projection(1600, 1200, 800, 600);
        let forward = CropRect::from_points(Point::new(100.0, 100.0), Point::new(300.0, 250.0));
        let backward = CropRect::from_points(Point::new(300.0, 250.0), Point::new(100.0, 100.0));

        assert_eq!(
            map_to_source(&forward, &projection),
            map_to_source(&backward, &projection)
        );
    }

    #[test]
    fn test_degenerate_rejected() {
        let projection = compute_projection(100, 100, 800, 600);
        assert_eq!(
            map_to_source(&CropRect::new(10.0, 10.0, 0.0, 40.0), &projection),
            Err(CropError::DegenerateCrop)
        );
    }

    #[test]
    fn test_sub_pixel_selection_rejected() {
        // 0.2 display px at scale 1 rounds to nothing
        let projection = compute_projection(100, 100, 800, 600);
        assert_eq!(
            map_to_source(&CropRect::new(10.0, 10.0, 0.2, 40.0), &projection),
            Err(CropError::DegenerateCrop)
        );
    }

    #[test]
    fn test_selection_clamped_to_bounds() {
        let projection = compute_projection(100, 80, 800, 600);
        let region =
            map_to_source(&CropRect::new(-20.0, 60.0, 200.0, 100.0), &projection).unwrap();
        assert_eq!(region, PixelRect::new(0, 60, 100, 20));
    }

    #[test]
    fn test_selection_outside_bounds_rejected() {
        let projection = compute_projection(100, 80, 800, 600);
        assert_eq!(
            map_to_source(&CropRect::new(150.0, 10.0, 30.0, 30.0), &projection),
            Err(CropError::OutOfBoundsCrop)
        );
        assert_eq!(
            map_to_source(&CropRect::new(-50.0, -50.0, 20.0, 20.0), &projection),
            Err(CropError::OutOfBoundsCrop)
        );
    }

    #[test]
    fn test_infinite_selection_clamped_to_source() {
        let projection = compute_projection(100, 80, 800, 600);
        let region = map_to_source(
            &CropRect::new(1.0, 1.0, f64::INFINITY, f64::INFINITY),
            &projection,
        )
        .unwrap();
        assert_eq!(region, PixelRect::new(1, 1, 99, 79));

        let region =
            map_to_source(&CropRect::new(1.0, 1.0, 1e300, 1e300), &projection).unwrap();
        assert_eq!(region, PixelRect::new(1, 1, 99, 79));
    }

    #[test]
    fn test_non_finite_edges_rejected() {
        let projection = compute_projection(100, 80, 800, 600);
        for selection in [
            CropRect::new(f64::NAN, 1.0, 10.0, 10.0),
            CropRect::new(1.0, f64::NAN, 10.0, 10.0),
            CropRect::new(1.0, 1.0, f64::NAN, 10.0),
            // -inf + inf leaves the right edge undefined
            CropRect::new(f64::NEG_INFINITY, 1.0, f64::INFINITY, 10.0),
            CropRect::new(f64::INFINITY, 1.0, 10.0, 10.0),
        ] {
            assert_eq!(
                map_to_source(&selection, &projection),
                Err(CropError::DegenerateCrop),
                "{:?}",
                selection
            );
        }
    }

    #[test]
    fn test_crop_pixel_values_preserved() {
        let img = test_image(10, 10);
        let cropped = crop_pixels(&img, PixelRect::new(3, 3, 4, 4)).unwrap();

        assert_eq!((cropped.width, cropped.height), (4, 4));
        // First pixel from (3, 3): (3 * 10 + 3) % 256 = 33
        assert_eq!(&cropped.pixels[0..3], &[33, 33, 33]);
        // Last pixel from (6, 6): 66
        assert_eq!(&cropped.pixels[cropped.pixels.len() - 3..], &[66, 66, 66]);
    }

    #[test]
    fn test_crop_pixels_clips_region() {
        let img = test_image(10, 10);
        let cropped = crop_pixels(&img, PixelRect::new(8, 8, 5, 5)).unwrap();
        assert_eq!((cropped.width, cropped.height), (2, 2));
    }

    #[test]
    fn test_crop_pixels_does_not_touch_source() {
        let img = test_image(20, 20);
        let before = img.clone();
        let _ = crop_pixels(&img, PixelRect::new(2, 2, 5, 5)).unwrap();
        assert_eq!(img, before);
    }

    #[test]
    fn test_full_display_selection_is_identity() {
        let img = test_image(1001, 777);
        let projection = compute_projection(1001, 777, 800, 600);
        let full = CropRect::new(
            0.0,
            0.0,
            projection.display_width as f64,
            projection.display_height as f64,
        );

        let (cropped, region) = apply_crop(&img, &full, &projection).unwrap();
        assert_eq!(region, PixelRect::new(0, 0, 1001, 777));
        assert_eq!(cropped, img);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
