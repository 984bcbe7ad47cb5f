//! Image preprocessing module for OCR enhancement
//!
//! Deskews a scan and produces the single-channel image handed to the engine.

pub mod pipeline;
pub mod steps;

pub use pipeline::{Pipeline, PreprocessingResult, StepTiming};
