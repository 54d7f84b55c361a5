//! Selection outline drawn over the display raster while the user drags.

use super::CropRect;
use crate::decode::DecodedImage;

/// Stroke `rect` onto `image` with a line `thickness` pixels wide, centered
/// on the rectangle's edges like a canvas `strokeRect`. Parts outside the
/// raster are clipped.
pub fn draw_outline(image: &mut DecodedImage, rect: &CropRect, color: [u8; 3], thickness: u32) {
    if thickness == 0 || rect.is_degenerate() {
        return;
    }

    let t = thickness as i64;
    let half = t / 2;

    // Edges further than one stroke outside the raster draw nothing more, so
    // clamp them there before leaving f64. Non-finite pointer input then
    // stays within i64.
    let x_limit = (image.width as i64 + t) as f64;
    let y_limit = (image.height as i64 + t) as f64;
    let r = rect.normalized();
    let left = clamp_edge(r.x, t, x_limit);
    let top = clamp_edge(r.y, t, y_limit);
    let right = clamp_edge(r.x + r.w, t, x_limit);
    let bottom = clamp_edge(r.y + r.h, t, y_limit);

    // top, bottom, left, right bands
    fill_rect(image, left - half, top - half, right - half + t, top - half + t, color);
    fill_rect(image, left - half, bottom - half, right - half + t, bottom - half + t, color);
    fill_rect(image, left - half, top - half, left - half + t, bottom - half + t, color);
    fill_rect(image, right - half, top - half, right - half + t, bottom - half + t, color);
}

fn clamp_edge(v: f64, thickness: i64, limit: f64) -> i64 {
    if v.is_nan() {
        return -thickness;
    }
    v.clamp(-(thickness as f64), limit).round() as i64
}

/// Fill the half-open box `[x0, x1) x [y0, y1)`, clipped to the image.
fn fill_rect(image: &mut DecodedImage, x0: i64, y0: i64, x1: i64, y1: i64, color: [u8; 3]) {
    let x0 = x0.clamp(0, image.width as i64) as usize;
    let x1 = x1.clamp(0, image.width as i64) as usize;
    let y0 = y0.clamp(0, image.height as i64) as usize;
    let y1 = y1.clamp(0, image.height as i64) as usize;

    let stride = image.width as usize * 3;
    for y in y0..y1 {
        let row = &mut image.pixels[y * stride..(y + 1) * stride];
        for px in row[x0 * 3..x1 * 3].chunks_exact_mut(3) {
            px.copy_from_slice(&color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: [u8; 3] = [255, 0, 0];

    fn black(width: u32, height: u32) -> DecodedImage {
        DecodedImage::new(width, height, vec![0u8; (width * height * 3) as usize])
    }

    fn pixel(img: &DecodedImage, x: u32, y: u32) -> [u8; 3] {
        let i = ((y * img.width + x) * 3) as usize;
        [img.pixels[i], img.pixels[i + 1], img.pixels[i + 2]]
    }

    #[test]
    fn test_outline_edges_colored_interior_untouched() {
        let mut img = black(10, 10);
        draw_outline(&mut img, &CropRect::new(2.0, 2.0, 5.0, 5.0), RED, 2);

        assert_eq!(pixel(&img, 2, 2), RED);
        assert_eq!(pixel(&img, 7, 4), RED);
        assert_eq!(pixel(&img, 4, 7), RED);
        assert_eq!(pixel(&img, 4, 4), [0, 0, 0]);
        assert_eq!(pixel(&img, 0, 0), [0, 0, 0]);
        assert_eq!(pixel(&img, 9, 9), [0, 0, 0]);
    }

    #[test]
    fn test_outline_negative_extent_same_as_positive() {
        let mut a = black(12, 12);
        let mut b = black(12, 12);
        draw_outline(&mut a, &CropRect::new(2.0, 3.0, 6.0, 5.0), RED, 2);
        draw_outline(&mut b, &CropRect::new(8.0, 8.0, -6.0, -5.0), RED, 2);
        assert_eq!(a, b);
    }

    #[test]
    fn test_outline_clipped_at_edges() {
        let mut img = black(6, 6);
        draw_outline(&mut img, &CropRect::new(-4.0, -4.0, 20.0, 20.0), RED, 2);
        // Entire stroke lies outside the raster
        assert_eq!(img, black(6, 6));
    }

    #[test]
    fn test_huge_rect_draws_visible_edges_only() {
        let mut img = black(8, 8);
        draw_outline(&mut img, &CropRect::new(1.0, 1.0, 1e300, 1e300), RED, 2);

        assert_eq!(pixel(&img, 1, 1), RED);
        assert_eq!(pixel(&img, 7, 1), RED);
        assert_eq!(pixel(&img, 1, 7), RED);
        assert_eq!(pixel(&img, 4, 4), [0, 0, 0]);
    }

    #[test]
    fn test_infinite_rect_matches_huge_rect() {
        let mut huge = black(8, 8);
        let mut inf = black(8, 8);
        draw_outline(&mut huge, &CropRect::new(1.0, 1.0, 1e300, 1e300), RED, 2);
        draw_outline(&mut inf, &CropRect::new(1.0, 1.0, f64::INFINITY, f64::INFINITY), RED, 2);
        assert_eq!(huge, inf);

        let mut neg = black(8, 8);
        draw_outline(
            &mut neg,
            &CropRect::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::INFINITY),
            RED,
            2,
        );
        // Every edge lies outside the raster
        assert_eq!(neg, black(8, 8));
    }

    #[test]
    fn test_nan_rect_draws_nothing() {
        let mut img = black(6, 6);
        draw_outline(&mut img, &CropRect::new(f64::NAN, 2.0, 3.0, 3.0), RED, 2);
        draw_outline(&mut img, &CropRect::new(2.0, 2.0, f64::NAN, 3.0), RED, 2);
        assert_eq!(img, black(6, 6));
    }

    #[test]
    fn test_degenerate_rect_draws_nothing() {
        let mut img = black(6, 6);
        draw_outline(&mut img, &CropRect::new(2.0, 2.0, 0.0, 3.0), RED, 2);
        assert_eq!(img, black(6, 6));
    }
}
