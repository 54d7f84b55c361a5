//! Display projection: the bounded on-screen raster of a source image.
//!
//! The user drags on a downscaled copy of the upload so that very large
//! photographs stay navigable. Everything the user does happens in display
//! coordinates and is mapped back through this projection.

use serde::{Deserialize, Serialize};

use crate::decode::{resize, DecodeError, DecodedImage, FilterType};

/// Slack for float error when flooring `width * scale`.
const FLOOR_EPSILON: f64 = 1e-9;

/// Scale between a source raster and its on-screen raster.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayProjection {
    /// `min(1, max_width / width, max_height / height)`.
    pub scale: f64,
    pub source_width: u32,
    pub source_height: u32,
    pub display_width: u32,
    pub display_height: u32,
}

impl DisplayProjection {
    /// Source pixels per display pixel along x.
    ///
    /// This is `1 / scale` up to the sub-pixel loss from flooring the
    /// display width; using the realized ratio keeps a full-display
    /// selection mapping onto exactly the full source.
    pub fn inverse_x(&self) -> f64 {
        self.source_width as f64 / self.display_width as f64
    }

    /// Source pixels per display pixel along y.
    pub fn inverse_y(&self) -> f64 {
        self.source_height as f64 / self.display_height as f64
    }

    /// Whether the display raster is the source at 1:1.
    pub fn is_identity(&self) -> bool {
        self.display_width == self.source_width && self.display_height == self.source_height
    }

    /// Produce the on-screen raster for `image`.
    pub fn render(
        &self,
        image: &DecodedImage,
        filter: FilterType,
    ) -> Result<DecodedImage, DecodeError> {
        resize(image, self.display_width, self.display_height, filter)
    }
}

/// Choose the largest scale `s <= 1` with `width * s <= max_width` and
/// `height * s <= max_height`. Images that already fit are never upscaled.
///
/// Display dimensions are floored (as a canvas truncates fractional sizes)
/// and kept at least one pixel.
pub fn compute_projection(
    width: u32,
    height: u32,
    max_width: u32,
    max_height: u32,
) -> DisplayProjection {
    let scale = if width <= max_width && height <= max_height {
        1.0
    } else {
        (max_width as f64 / width as f64).min(max_height as f64 / height as f64)
    };

    let fit = |extent: u32, bound: u32| -> u32 {
        if scale >= 1.0 {
            return extent;
        }
        ((extent as f64 * scale + FLOOR_EPSILON).floor() as u32)
            .min(bound)
            .max(1)
    };

    DisplayProjection {
        scale,
        source_width: width,
        source_height: height,
        display_width: fit(width, max_width),
        display_height: fit(height, max_height),
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: Images within bounds keep scale 1.
        #[test]
        fn prop_fitting_images_not_scaled(
            (max_w, max_h) in (1u32..=2000, 1u32..=2000),
            (fw, fh) in (0.0f64..=1.0, 0.0f64..=1.0),
        ) {
            let width = ((max_w as f64 * fw) as u32).max(1);
            let height = ((max_h as f64 * fh) as u32).max(1);
            let p = compute_projection(width, height, max_w, max_h);

            prop_assert_eq!(p.scale, 1.0);
            prop_assert_eq!(p.display_width, width);
            prop_assert_eq!(p.display_height, height);
        }

        /// Property: Oversized images land within bounds with aspect preserved.
        #[test]
        fn prop_oversized_images_bounded(
            (width, height) in (1u32..=20_000, 1u32..=20_000),
            (max_w, max_h) in (50u32..=1200, 50u32..=1200),
        ) {
            prop_assume!(width > max_w || height > max_h);
            let p = compute_projection(width, height, max_w, max_h);

            prop_assert!(p.scale < 1.0);
            prop_assert!(p.display_width <= max_w);
            prop_assert!(p.display_height <= max_h);
            prop_assert!(p.display_width >= 1 && p.display_height >= 1);

            // Each display edge is the scaled edge, floored
            let exact_w = width as f64 * p.scale;
            let exact_h = height as f64 * p.scale;
            prop_assert!((exact_w - p.display_width as f64) < 1.0 + 1e-6 || p.display_width == 1);
            prop_assert!((exact_h - p.display_height as f64) < 1.0 + 1e-6 || p.display_height == 1);

            // One axis touches its bound
            prop_assert!(p.display_width == max_w || p.display_height == max_h);
        }
    }
}
