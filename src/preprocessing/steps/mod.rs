//! Individual preprocessing steps

pub mod blur;
pub mod brightness;
pub mod deskew;
pub mod grayscale;
