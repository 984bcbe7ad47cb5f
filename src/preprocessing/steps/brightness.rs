use crate::error::OcrError;
use image::{DynamicImage, GrayImage, Luma};

/// Contrast gain
const ALPHA: f32 = 1.0;
/// Brightness offset
const BETA: f32 = 30.0;

/// Linear intensity transform `|ALPHA * p + BETA|`, saturated to 0-255
pub fn apply(image: DynamicImage) -> Result<DynamicImage, OcrError> {
    let gray = image.into_luma8();
    let brightened = GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        let pixel = gray.get_pixel(x, y).0[0] as f32;
        Luma([scale_abs(pixel, ALPHA, BETA)])
    });
    Ok(DynamicImage::ImageLuma8(brightened))
}

fn scale_abs(value: f32, alpha: f32, beta: f32) -> u8 {
    (alpha * value + beta).abs().round().min(255.0) as u8
}
