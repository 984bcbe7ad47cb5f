use crate::error::OcrError;
use image::{DynamicImage, GrayImage, Luma};

/// Convert image to grayscale
pub fn apply(image: DynamicImage) -> Result<DynamicImage, OcrError> {
    Ok(DynamicImage::ImageLuma8(to_luma(&image)))
}

/// BT.601 luma (0.299 R + 0.587 G + 0.114 B) in 14-bit fixed point.
/// Alpha is ignored.
pub fn to_luma(image: &DynamicImage) -> GrayImage {
    if let DynamicImage::ImageLuma8(gray) = image {
        return gray.clone();
    }

    let rgb = image.to_rgb8();
    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        let luma = (r as u32 * 4899 + g as u32 * 9617 + b as u32 * 1868 + (1 << 13)) >> 14;
        Luma([luma as u8])
    })
}
