//! OCR engine implementations
//!
//! This module contains implementations of the OcrEngine trait. Engines are
//! conditionally compiled based on feature flags.

#[cfg(feature = "engine-tesseract")]
pub mod tesseract;

use crate::config::Config;
use crate::engine::OcrEngine;
use crate::error::OcrError;

/// Create the compiled-in OCR engine
#[cfg(feature = "engine-tesseract")]
pub fn create(config: &Config) -> Result<Box<dyn OcrEngine>, OcrError> {
    tracing::info!("Initializing tesseract engine...");
    let engine = tesseract::TesseractEngine::new(config)?;
    Ok(Box::new(engine))
}

#[cfg(not(feature = "engine-tesseract"))]
pub fn create(_config: &Config) -> Result<Box<dyn OcrEngine>, OcrError> {
    Err(OcrError::InitializationError(
        "No OCR engines available. Build with --features engine-tesseract".to_string(),
    ))
}
