use crate::error::OcrError;
use image::{imageops, DynamicImage, GrayImage};
use imageproc::filter::separable_filter_equal;

/// Kernel size (taps per axis)
pub const KSIZE: usize = 5;

/// Sigma of a Gaussian kernel whose sigma is derived from its size:
/// 0.3 * ((5 - 1) / 2 - 1) + 0.8
pub const SIGMA: f32 = 1.1;

const RADIUS: u32 = (KSIZE / 2) as u32;

/// Mild 5x5 Gaussian blur to suppress scanner noise.
/// Borders are reflected without repeating the edge pixel (`dcb|abcd|cba`).
pub fn apply(image: DynamicImage) -> Result<DynamicImage, OcrError> {
    let gray = image.into_luma8();
    let (width, height) = gray.dimensions();
    if width == 0 || height == 0 {
        return Ok(DynamicImage::ImageLuma8(gray));
    }

    let padded = pad_reflect_101(&gray, RADIUS);
    let blurred = separable_filter_equal(&padded, &gaussian_kernel());
    let cropped = imageops::crop_imm(&blurred, RADIUS, RADIUS, width, height).to_image();
    Ok(DynamicImage::ImageLuma8(cropped))
}

/// Normalized 1-D Gaussian taps
fn gaussian_kernel() -> [f32; KSIZE] {
    let center = (KSIZE / 2) as f32;
    let mut kernel = [0.0f32; KSIZE];
    for (i, tap) in kernel.iter_mut().enumerate() {
        let x = i as f32 - center;
        *tap = (-(x * x) / (2.0 * SIGMA * SIGMA)).exp();
    }
    let sum: f32 = kernel.iter().sum();
    kernel.map(|tap| tap / sum)
}

fn pad_reflect_101(image: &GrayImage, pad: u32) -> GrayImage {
    let (width, height) = image.dimensions();
    GrayImage::from_fn(width + 2 * pad, height + 2 * pad, |x, y| {
        let sx = reflect_101(x as i64 - pad as i64, width);
        let sy = reflect_101(y as i64 - pad as i64, height);
        *image.get_pixel(sx, sy)
    })
}

fn reflect_101(i: i64, len: u32) -> u32 {
    let len = len as i64;
    if len == 1 {
        return 0;
    }
    let period = 2 * (len - 1);
    let m = i.rem_euclid(period);
    (if m < len { m } else { period - m }) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_blur_spreads_isolated_pixel() {
        let mut img = GrayImage::from_pixel(11, 11, Luma([0]));
        img.put_pixel(5, 5, Luma([255]));

        let result = apply(DynamicImage::ImageLuma8(img)).unwrap().to_luma8();

        // 5x5 footprint: [7, 23, 35, 23, 7] through the center row
        let row: Vec<u8> = (2..9).map(|x| result.get_pixel(x, 5).0[0]).collect();
        let expected = [0u8, 7, 23, 35, 23, 7, 0];
        for (got, want) in row.iter().zip(expected.iter()) {
            assert!(
                got.abs_diff(*want) <= 1,
                "Expected ~{:?}, got {:?}",
                expected,
                row
            );
        }
    }

    #[test]
    fn test_blur_reflects_borders_without_edge_repeat() {
        // Bright left column: with dcb|abcd reflection the edge pixel is not
        // counted twice, so it keeps only the center tap weight (~0.37)
        let img = GrayImage::from_fn(9, 9, |x, _| if x == 0 { Luma([255]) } else { Luma([0]) });
        let result = apply(DynamicImage::ImageLuma8(img)).unwrap().to_luma8();

        let edge = result.get_pixel(0, 4).0[0];
        assert!(edge.abs_diff(94) <= 1, "Expected ~94 at the edge, got {}", edge);
    }

    #[test]
    fn test_blur_keeps_uniform_image() {
        let img = GrayImage::from_pixel(20, 20, Luma([128]));
        let result = apply(DynamicImage::ImageLuma8(img)).unwrap().to_luma8();
        assert!(result.pixels().all(|p| p.0[0].abs_diff(128) <= 1));
    }

    #[test]
    fn test_gaussian_kernel_is_normalized_and_symmetric() {
        let kernel = gaussian_kernel();
        assert!((kernel.iter().sum::<f32>() - 1.0).abs() < 1e-5);
        assert_eq!(kernel[0], kernel[4]);
        assert_eq!(kernel[1], kernel[3]);
        assert!(kernel[2] > kernel[1] && kernel[1] > kernel[0]);
    }

    #[test]
    fn test_reflect_101_indices() {
        let mapped: Vec<u32> = (-2..7).map(|i| reflect_101(i, 5)).collect();
        assert_eq!(mapped, vec![2, 1, 0, 1, 2, 3, 4, 3, 2]);
        assert_eq!(reflect_101(-2, 1), 0);
    }
}
