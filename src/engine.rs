use crate::error::OcrError;
use image::GrayImage;

/// Trait that all OCR engines must implement
pub trait OcrEngine: Send + Sync {
    /// Returns the engine identifier (e.g., "tesseract")
    fn name(&self) -> &'static str;

    /// Returns a human-readable description of the engine
    fn description(&self) -> &'static str;

    /// Recognize text in a preprocessed single-channel image.
    /// Line breaks are whatever the engine detected.
    fn recognize(&self, image: &GrayImage) -> Result<String, OcrError>;

    /// Get the languages this engine was configured with
    fn supported_languages(&self) -> Vec<String>;
}
