//! Tesseract engine implementation
//!
//! Uses tesseract-static crate for static linking (no system dependencies).
//! Downloads tessdata (training data) for every configured language on first
//! use unless an explicit tessdata directory is given.

use crate::config::{Config, OcrSettings};
use crate::engine::OcrEngine;
use crate::error::OcrError;
use image::{DynamicImage, GrayImage};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tesseract_static::tesseract::Tesseract;

/// Tesseract OCR Engine
pub struct TesseractEngine {
    /// Path to tessdata directory
    tessdata_path: String,
    settings: OcrSettings,
}

impl TesseractEngine {
    /// Create a new Tesseract-based OCR engine
    pub fn new(config: &Config) -> Result<Self, OcrError> {
        let settings = config.ocr.clone();
        if settings.languages.is_empty() {
            return Err(OcrError::InitializationError(
                "No recognition languages configured".to_string(),
            ));
        }

        let tessdata_dir = match &config.tessdata_path {
            Some(path) => path.clone(),
            None => ensure_tessdata_available(&settings.languages)?,
        };
        let tessdata_path = tessdata_dir
            .to_str()
            .map(|s| s.to_string())
            .ok_or_else(|| OcrError::InitializationError("Invalid tessdata path".to_string()))?;

        // Validate that every language loads before touching any input file
        let test_tess = Tesseract::new(Some(&tessdata_path), Some(&settings.language_spec()))
            .map_err(|e| {
                OcrError::InitializationError(format!("Failed to initialize Tesseract: {}", e))
            })?;
        drop(test_tess);

        tracing::info!(
            "Tesseract engine initialized (tessdata: {}, config: {})",
            tessdata_path,
            settings.config_string()
        );

        Ok(Self {
            tessdata_path,
            settings,
        })
    }
}

impl OcrEngine for TesseractEngine {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    fn description(&self) -> &'static str {
        "Tesseract OCR engine, statically linked"
    }

    fn recognize(&self, image: &GrayImage) -> Result<String, OcrError> {
        let (width, height) = image.dimensions();
        let bmp_data = encode_bmp(image)?;

        tracing::debug!(
            "Recognizing image: {}x{}, BMP size: {} bytes",
            width,
            height,
            bmp_data.len()
        );

        let mut tess = Tesseract::new(
            Some(&self.tessdata_path),
            Some(&self.settings.language_spec()),
        )
        .map_err(|e| OcrError::RecognitionError(format!("Failed to create Tesseract: {}", e)))?;

        tess = tess
            .set_variable(
                "tessedit_pageseg_mode",
                &self.settings.page_seg_mode.to_string(),
            )
            .map_err(|e| {
                OcrError::RecognitionError(format!("Failed to set page segmentation mode: {}", e))
            })?;

        tess = tess.set_image_from_mem(&bmp_data).map_err(|e| {
            OcrError::RecognitionError(format!(
                "Failed to set image ({}x{}, {} bytes): {}",
                width,
                height,
                bmp_data.len(),
                e
            ))
        })?;

        tess = tess
            .recognize()
            .map_err(|e| OcrError::RecognitionError(format!("Failed to recognize text: {}", e)))?;

        tess.get_text()
            .map_err(|e| OcrError::RecognitionError(format!("Failed to get text: {}", e)))
    }

    fn supported_languages(&self) -> Vec<String> {
        self.settings.languages.clone()
    }
}

/// Encode to BMP in memory (BMP is always supported by leptonica)
fn encode_bmp(image: &GrayImage) -> Result<Vec<u8>, OcrError> {
    let rgb_img = DynamicImage::ImageLuma8(image.clone()).to_rgb8();
    let mut bmp_data = Vec::new();
    rgb_img
        .write_to(
            &mut std::io::Cursor::new(&mut bmp_data),
            image::ImageFormat::Bmp,
        )
        .map_err(|e| OcrError::RecognitionError(format!("Failed to convert to BMP: {}", e)))?;
    Ok(bmp_data)
}

// ============================================================================
// Tessdata download helpers
// ============================================================================

/// Ensure tessdata for all languages is available, downloading if needed
fn ensure_tessdata_available(languages: &[String]) -> Result<PathBuf, OcrError> {
    let cache_dir = dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("scan2text")
        .join("tessdata");

    std::fs::create_dir_all(&cache_dir).map_err(|e| {
        OcrError::InitializationError(format!("Failed to create tessdata directory: {}", e))
    })?;

    for language in languages {
        let traineddata_path = cache_dir.join(traineddata_file(language));
        if traineddata_path.exists() {
            tracing::debug!("Using cached tessdata {:?}", traineddata_path);
            continue;
        }

        tracing::info!(
            "Downloading tessdata for '{}' (this may take a moment)...",
            language
        );
        download_file(&tessdata_url(language), &traineddata_path)?;
        tracing::info!("Downloaded tessdata to {:?}", traineddata_path);
    }

    // Tesseract expects the directory, not the file
    Ok(cache_dir)
}

fn traineddata_file(language: &str) -> String {
    format!("{}.traineddata", language)
}

/// Get tessdata download URL for a language
fn tessdata_url(language: &str) -> String {
    // tessdata_fast: smaller, faster downloads
    format!(
        "https://github.com/tesseract-ocr/tessdata_fast/raw/main/{}",
        traineddata_file(language)
    )
}

/// Download a file from URL to path using ureq
fn download_file(url: &str, path: &Path) -> Result<(), OcrError> {
    let response = ureq::get(url)
        .call()
        .map_err(|e| OcrError::InitializationError(format!("Failed to download tessdata: {}", e)))?;

    let buffer = response.into_body().read_to_vec().map_err(|e| {
        OcrError::InitializationError(format!("Failed to read tessdata response: {}", e))
    })?;

    // Cached .traineddata files are always complete
    let partial_path = path.with_extension("partial");
    let mut file = File::create(&partial_path).map_err(|e| {
        OcrError::InitializationError(format!("Failed to create tessdata file: {}", e))
    })?;
    file.write_all(&buffer).map_err(|e| {
        OcrError::InitializationError(format!("Failed to write tessdata file: {}", e))
    })?;
    std::fs::rename(&partial_path, path).map_err(|e| {
        OcrError::InitializationError(format!("Failed to move tessdata into place: {}", e))
    })?;

    Ok(())
}
