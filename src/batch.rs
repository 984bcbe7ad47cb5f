//! Batch driver: walks the input folder and runs every image through the
//! load, preprocess, debug snapshot, OCR, correction and write sequence.

use crate::config::Config;
use crate::corrections::Corrections;
use crate::engine::OcrEngine;
use crate::error::OcrError;
use crate::preprocessing::Pipeline;
use image::{DynamicImage, ImageDecoder, ImageReader};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Extensions (lower-case, with dot) accepted as input images
pub const SUPPORTED_EXTENSIONS: [&str; 5] = [".png", ".jpg", ".jpeg", ".bmp", ".tiff"];

/// Prefix of the preprocessed snapshots in the debug folder
pub const DEBUG_PREFIX: &str = "processed_";

/// Outcome for a single input file
#[derive(Debug)]
pub struct FileOutcome {
    pub file_name: String,
    /// Path of the written text file
    pub result: Result<PathBuf, OcrError>,
}

impl FileOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-file outcomes of one batch run, in processing order
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &OcrError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.file_name.as_str(), e)))
    }
}

/// True when the file name ends with a supported image extension (case-insensitive)
pub fn is_supported_image(file_name: &str) -> bool {
    let lower = file_name.to_lowercase();
    SUPPORTED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// `scan1.jpg` -> `scan1.txt`
pub fn text_file_name(file_name: &OsStr) -> OsString {
    let stem = Path::new(file_name)
        .file_stem()
        .unwrap_or(file_name)
        .to_os_string();
    let mut name = stem;
    name.push(".txt");
    name
}

/// `scan1.jpg` -> `processed_scan1.jpg`
pub fn debug_file_name(file_name: &OsStr) -> OsString {
    let mut name = OsString::from(DEBUG_PREFIX);
    name.push(file_name);
    name
}

/// Create the output and debug folders if absent
pub fn prepare_output_dirs(config: &Config) -> Result<(), OcrError> {
    for dir in [&config.output_dir, &config.debug_dir] {
        std::fs::create_dir_all(dir).map_err(|e| OcrError::io(dir, e))?;
    }
    Ok(())
}

/// Sequential batch processor
pub struct BatchProcessor {
    config: Config,
    engine: Box<dyn OcrEngine>,
    corrections: Corrections,
    pipeline: Pipeline,
}

impl BatchProcessor {
    pub fn new(config: Config, engine: Box<dyn OcrEngine>, corrections: Corrections) -> Self {
        Self {
            config,
            engine,
            corrections,
            pipeline: Pipeline::new(),
        }
    }

    /// Process every supported image in the input folder.
    ///
    /// Fails only if the output folders cannot be created or the input folder
    /// cannot be listed; per-file errors are collected in the report.
    pub fn run(&self) -> Result<BatchReport, OcrError> {
        prepare_output_dirs(&self.config)?;

        let start = Instant::now();
        let mut report = BatchReport::default();

        for path in self.list_inputs()? {
            let Some(file_name) = path.file_name() else {
                continue;
            };
            let display_name = file_name.to_string_lossy().into_owned();

            match self.process_file(&path) {
                Ok(text_path) => {
                    let text_name = text_file_name(file_name);
                    tracing::info!(
                        "Processed: {} -> {}",
                        display_name,
                        text_name.to_string_lossy()
                    );
                    report.outcomes.push(FileOutcome {
                        file_name: display_name,
                        result: Ok(text_path),
                    });
                }
                Err(e) => {
                    tracing::error!("Failed to process file {}: {}", display_name, e);
                    report.outcomes.push(FileOutcome {
                        file_name: display_name,
                        result: Err(e),
                    });
                }
            }
        }

        tracing::info!(
            "Processing complete: {} succeeded, {} failed in {}ms",
            report.succeeded(),
            report.failed(),
            start.elapsed().as_millis()
        );

        Ok(report)
    }

    /// Supported image files directly inside the input folder, sorted by name
    fn list_inputs(&self) -> Result<Vec<PathBuf>, OcrError> {
        let input_dir = &self.config.input_dir;
        let entries = std::fs::read_dir(input_dir).map_err(|e| OcrError::io(input_dir, e))?;

        let mut inputs = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| OcrError::io(input_dir, e))?;
            let file_name = entry.file_name();

            if !is_supported_image(&file_name.to_string_lossy()) {
                tracing::trace!("Skipping {:?}", file_name);
                continue;
            }
            if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                tracing::trace!("Skipping directory {:?}", file_name);
                continue;
            }
            inputs.push(entry.path());
        }

        inputs.sort();
        Ok(inputs)
    }

    /// Run the full sequence for one image and return the text file path.
    ///
    /// The debug snapshot is written before OCR, so a recognition failure can
    /// leave a snapshot without a text file.
    pub fn process_file(&self, path: &Path) -> Result<PathBuf, OcrError> {
        let file_name = path.file_name().ok_or_else(|| {
            OcrError::io(
                path,
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name"),
            )
        })?;

        let image = load_image(path)?;
        tracing::debug!(
            "Loaded {:?}: {}x{}",
            file_name,
            image.width(),
            image.height()
        );

        let preprocessed = self.pipeline.process(image)?;

        let debug_path = self.config.debug_dir.join(debug_file_name(file_name));
        preprocessed
            .image
            .save(&debug_path)
            .map_err(|source| OcrError::Encode {
                path: debug_path.clone(),
                source,
            })?;

        let raw_text = self.engine.recognize(&preprocessed.image)?;
        let text = self.corrections.apply(&raw_text);

        let text_path = self.config.output_dir.join(text_file_name(file_name));
        std::fs::write(&text_path, text.as_bytes()).map_err(|e| OcrError::io(&text_path, e))?;

        Ok(text_path)
    }
}

/// Decode by file content rather than extension, then apply the EXIF orientation
pub fn load_image(path: &Path) -> Result<DynamicImage, OcrError> {
    let decode_error = |source: image::ImageError| OcrError::Decode {
        path: path.to_path_buf(),
        source,
    };

    let reader = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| OcrError::io(path, e))?;
    let mut decoder = reader.into_decoder().map_err(decode_error)?;
    let orientation = decoder.orientation().map_err(decode_error)?;

    let mut image = DynamicImage::from_decoder(decoder).map_err(decode_error)?;
    image.apply_orientation(orientation);
    Ok(image)
}
