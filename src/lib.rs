//! Batch OCR of scanned document images.
//!
//! Each image in the input folder is deskewed, converted to an enhanced
//! grayscale image (saved to the debug folder), recognized, corrected with a
//! list of literal replacements and written as a UTF-8 text file.

pub mod batch;
pub mod config;
pub mod corrections;
pub mod engine;
pub mod engines;
pub mod error;
pub mod preprocessing;

pub use batch::{BatchProcessor, BatchReport, FileOutcome};
pub use config::{Config, OcrSettings};
pub use corrections::{Correction, Corrections};
pub use engine::OcrEngine;
pub use error::OcrError;
