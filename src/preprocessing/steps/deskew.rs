use super::grayscale;
use crate::error::OcrError;
use image::{DynamicImage, GrayImage, Rgb, RgbImage};
use imageproc::geometry::convex_hull;
use imageproc::point::Point;

/// Angles closer to zero than this are float noise from axis-aligned edges
const ANGLE_EPSILON: f64 = 1e-6;

/// Edge directions are snapped to this many steps per degree, so integer
/// diagonals land exactly on +-45 and the -45 boundary is deterministic
const DIRECTION_STEPS_PER_DEGREE: f64 = 1e9;

/// Deskew image by straightening the minimum-area rectangle around its foreground
///
/// Every non-black grayscale pixel counts as foreground. The rectangle angle is
/// reported in the [-90, 0) degree convention and mapped to a correction angle,
/// then the colour image is rotated about its center with bicubic sampling and
/// replicated borders. Dimensions are preserved.
pub fn apply(image: DynamicImage) -> Result<DynamicImage, OcrError> {
    let gray = grayscale::to_luma(&image);
    let angle = correction_angle(&gray);

    // Blank images and axis-aligned foreground come back untouched
    if angle == 0.0 {
        return Ok(image);
    }

    tracing::debug!("Deskew: rotating by {:.2} degrees", angle);
    let rotated = rotate_about_center(&image.to_rgb8(), angle);
    Ok(DynamicImage::ImageRgb8(rotated))
}

/// Counter-clockwise rotation, in degrees, that levels the foreground
pub fn correction_angle(gray: &GrayImage) -> f64 {
    let points = foreground_outline(gray);
    if points.is_empty() {
        return 0.0;
    }

    let hull = convex_hull(points.as_slice());
    let Some(rect_angle) = min_area_rect_angle(&hull) else {
        return 0.0;
    };

    let angle = if rect_angle < -45.0 {
        -(90.0 + rect_angle)
    } else {
        -rect_angle
    };

    if angle.abs() < ANGLE_EPSILON {
        0.0
    } else {
        angle
    }
}

/// Leftmost and rightmost foreground pixel of every row, as (row, col) points.
/// The convex hull of these equals the hull of the full foreground.
fn foreground_outline(gray: &GrayImage) -> Vec<Point<i64>> {
    let width = gray.width() as usize;
    if width == 0 {
        return Vec::new();
    }

    let mut points = Vec::new();
    for (row, pixels) in gray.as_raw().chunks_exact(width).enumerate() {
        let Some(first) = pixels.iter().position(|&p| p > 0) else {
            continue;
        };
        let last = pixels.iter().rposition(|&p| p > 0).unwrap_or(first);

        points.push(Point::new(row as i64, first as i64));
        if last != first {
            points.push(Point::new(row as i64, last as i64));
        }
    }
    points
}

/// Angle of the minimum-area enclosing rectangle, in [-90, 0) degrees.
/// One of its sides is collinear with a hull edge, so only those are tried.
fn min_area_rect_angle(hull: &[Point<i64>]) -> Option<f64> {
    let mut best: Option<(f64, f64)> = None;

    for (i, a) in hull.iter().enumerate() {
        let b = hull[(i + 1) % hull.len()];
        let (dx, dy) = ((b.x - a.x) as f64, (b.y - a.y) as f64);
        let len = dx.hypot(dy);
        if len == 0.0 {
            continue;
        }
        let (ux, uy) = (dx / len, dy / len);

        let (mut min_u, mut max_u) = (f64::MAX, f64::MIN);
        let (mut min_v, mut max_v) = (f64::MAX, f64::MIN);
        for p in hull {
            let (px, py) = (p.x as f64, p.y as f64);
            let u = px * ux + py * uy;
            let v = py * ux - px * uy;
            min_u = min_u.min(u);
            max_u = max_u.max(u);
            min_v = min_v.min(v);
            max_v = max_v.max(v);
        }

        let area = (max_u - min_u) * (max_v - min_v);
        if best.map_or(true, |(best_area, _)| area < best_area) {
            let direction = uy.atan2(ux).to_degrees();
            let snapped =
                (direction * DIRECTION_STEPS_PER_DEGREE).round() / DIRECTION_STEPS_PER_DEGREE;
            best = Some((area, snapped));
        }
    }

    best.map(|(_, direction)| rect_angle(direction))
}

/// Map an edge direction to the rectangle angle in [-90, 0).
/// Perpendicular edges describe the same rectangle and map to the same value.
fn rect_angle(direction: f64) -> f64 {
    let angle = (direction + 90.0).rem_euclid(180.0) - 90.0;
    if angle >= 0.0 {
        angle - 90.0
    } else {
        angle
    }
}

/// Rotate counter-clockwise by `degrees` about (w/2, h/2), keeping dimensions
fn rotate_about_center(image: &RgbImage, degrees: f64) -> RgbImage {
    let (width, height) = image.dimensions();
    let cx = (width / 2) as f64;
    let cy = (height / 2) as f64;
    let (sin, cos) = degrees.to_radians().sin_cos();

    RgbImage::from_fn(width, height, |x, y| {
        let dx = x as f64 - cx;
        let dy = y as f64 - cy;
        let src_x = cos * dx - sin * dy + cx;
        let src_y = sin * dx + cos * dy + cy;
        sample_bicubic(image, src_x, src_y)
    })
}

/// Bicubic sample; coordinates outside the image read the nearest edge pixel
fn sample_bicubic(image: &RgbImage, x: f64, y: f64) -> Rgb<u8> {
    let (width, height) = image.dimensions();
    let (x0, y0) = (x.floor(), y.floor());
    let wx = cubic_weights(x - x0);
    let wy = cubic_weights(y - y0);

    let mut acc = [0.0f64; 3];
    for (j, weight_y) in wy.iter().enumerate() {
        let sy = clamp_coord(y0 as i64 + j as i64 - 1, height);
        for (i, weight_x) in wx.iter().enumerate() {
            let sx = clamp_coord(x0 as i64 + i as i64 - 1, width);
            let pixel = image.get_pixel(sx, sy);
            for (channel, value) in acc.iter_mut().zip(pixel.0.iter()) {
                *channel += weight_x * weight_y * *value as f64;
            }
        }
    }

    Rgb(acc.map(|v| v.round().clamp(0.0, 255.0) as u8))
}

/// Keys cubic convolution weights (a = -0.75) for the 4 taps around `t`
fn cubic_weights(t: f64) -> [f64; 4] {
    const A: f64 = -0.75;
    let w0 = ((A * (t + 1.0) - 5.0 * A) * (t + 1.0) + 8.0 * A) * (t + 1.0) - 4.0 * A;
    let w1 = ((A + 2.0) * t - (A + 3.0)) * t * t + 1.0;
    let w2 = ((A + 2.0) * (1.0 - t) - (A + 3.0)) * (1.0 - t) * (1.0 - t) + 1.0;
    [w0, w1, w2, 1.0 - w0 - w1 - w2]
}

fn clamp_coord(v: i64, len: u32) -> u32 {
    v.clamp(0, len as i64 - 1) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    /// Rows that contain at least one bright pixel
    fn bright_rows(img: &RgbImage) -> Vec<u32> {
        (0..img.height())
            .filter(|&y| (0..img.width()).any(|x| img.get_pixel(x, y).0[0] > 64))
            .collect()
    }

    /// 1px line descending one row every ten columns (slope 0.1)
    fn sloped_line() -> RgbImage {
        let mut img = RgbImage::new(100, 60);
        for x in 0..100 {
            img.put_pixel(x, 20 + x / 10, Rgb([255, 255, 255]));
        }
        img
    }

    #[test]
    fn test_deskew_blank_image_is_unrotated() {
        let img = RgbImage::new(40, 30);
        assert_eq!(correction_angle(&GrayImage::new(40, 30)), 0.0);

        let result = apply(DynamicImage::ImageRgb8(img.clone())).unwrap();
        assert_eq!(result.to_rgb8(), img);
    }

    #[test]
    fn test_deskew_full_foreground_is_unrotated() {
        // Light paper: every pixel is foreground, rectangle is the image itself
        let gray = GrayImage::from_pixel(80, 50, Luma([230]));
        assert_eq!(correction_angle(&gray), 0.0);
    }

    #[test]
    fn test_deskew_axis_aligned_block_is_unrotated() {
        let mut gray = GrayImage::new(60, 40);
        for y in 10..20 {
            for x in 5..50 {
                gray.put_pixel(x, y, Luma([255]));
            }
        }
        assert_eq!(correction_angle(&gray), 0.0);
    }

    #[test]
    fn test_deskew_single_pixel_is_unrotated() {
        let mut gray = GrayImage::new(20, 20);
        gray.put_pixel(7, 3, Luma([255]));
        assert_eq!(correction_angle(&gray), 0.0);
    }

    #[test]
    fn test_deskew_detects_slope() {
        let gray = grayscale::to_luma(&DynamicImage::ImageRgb8(sloped_line()));
        let angle = correction_angle(&gray);
        let expected = 0.1_f64.atan().to_degrees();
        assert!(
            (angle - expected).abs() < 0.1,
            "Expected ~{:.2} degrees, got {:.2}",
            expected,
            angle
        );
    }

    #[test]
    fn test_deskew_levels_sloped_line() {
        let img = sloped_line();
        let before = bright_rows(&img);

        let result = apply(DynamicImage::ImageRgb8(img)).unwrap().to_rgb8();
        let after = bright_rows(&result);

        assert_eq!(before.len(), 10);
        assert!(
            after.len() <= 5,
            "Line should span fewer rows after deskew, got {:?}",
            after
        );
    }

    #[test]
    fn test_deskew_preserves_dimensions() {
        let result = apply(DynamicImage::ImageRgb8(sloped_line())).unwrap();
        assert_eq!(result.width(), 100);
        assert_eq!(result.height(), 60);
    }

    #[test]
    fn test_rect_angle_range() {
        assert_eq!(rect_angle(0.0), -90.0);
        assert_eq!(rect_angle(90.0), -90.0);
        assert_eq!(rect_angle(-90.0), -90.0);
        assert!((rect_angle(5.0) - -85.0).abs() < 1e-9);
        assert!((rect_angle(-85.0) - -85.0).abs() < 1e-9);
        assert!((rect_angle(135.0) - -45.0).abs() < 1e-9);
    }

    #[test]
    fn test_min_area_rect_of_diamond() {
        let hull = vec![
            Point::new(0, 0),
            Point::new(10, -10),
            Point::new(20, 0),
            Point::new(10, 10),
        ];
        let rect = min_area_rect_angle(&hull).unwrap();
        assert_eq!(rect, -45.0);
    }

    #[test]
    fn test_deskew_minus_45_rectangle_corrects_by_plus_45() {
        // Filled diamond: every hull edge is an exact diagonal
        let gray = GrayImage::from_fn(41, 41, |x, y| {
            let d = (x as i32 - 20).abs() + (y as i32 - 20).abs();
            if d <= 15 {
                Luma([255])
            } else {
                Luma([0])
            }
        });
        assert_eq!(correction_angle(&gray), 45.0);
    }

    #[test]
    fn test_cubic_weights_at_integer_position() {
        assert_eq!(cubic_weights(0.0), [0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_rotation_replicates_borders() {
        // Uniform image stays uniform: no default-colored corners after rotation
        let img = RgbImage::from_pixel(30, 20, Rgb([90, 120, 150]));
        let rotated = rotate_about_center(&img, 30.0);
        assert!(rotated.pixels().all(|p| *p == Rgb([90, 120, 150])));
    }
}
