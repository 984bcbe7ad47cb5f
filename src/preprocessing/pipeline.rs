use crate::error::OcrError;
use image::{DynamicImage, GrayImage};
use std::time::Instant;

use super::steps;

type StepFn = fn(DynamicImage) -> Result<DynamicImage, OcrError>;

/// Timing information for a single preprocessing step
#[derive(Debug, Clone)]
pub struct StepTiming {
    pub name: &'static str,
    pub time_ms: u64,
}

/// Result of preprocessing including timing stats
#[derive(Debug, Clone)]
pub struct PreprocessingResult {
    /// Preprocessed single-channel image
    pub image: GrayImage,
    /// Total preprocessing time in milliseconds
    pub total_time_ms: u64,
    /// Individual step timings
    pub steps: Vec<StepTiming>,
}

/// Preprocessing pipeline: deskew, grayscale, blur, brightness
pub struct Pipeline {
    steps: Vec<(&'static str, StepFn)>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            steps: vec![
                ("deskew", steps::deskew::apply as StepFn),
                ("grayscale", steps::grayscale::apply as StepFn),
                ("blur", steps::blur::apply as StepFn),
                ("brightness", steps::brightness::apply as StepFn),
            ],
        }
    }

    /// Names of the steps, in the order they run
    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|(name, _)| *name).collect()
    }

    /// Process an image through every step
    pub fn process(&self, image: DynamicImage) -> Result<PreprocessingResult, OcrError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(OcrError::PreprocessingError(format!(
                "Empty image ({}x{})",
                image.width(),
                image.height()
            )));
        }

        let start = Instant::now();
        let mut steps_timing = Vec::with_capacity(self.steps.len());

        let mut img = image;
        for &(name, step_fn) in &self.steps {
            img = self.run_step(name, img, &mut steps_timing, step_fn)?;
        }

        let result = PreprocessingResult {
            image: img.into_luma8(),
            total_time_ms: start.elapsed().as_millis() as u64,
            steps: steps_timing,
        };

        tracing::debug!(
            "Preprocessing finished in {}ms ({})",
            result.total_time_ms,
            result
                .steps
                .iter()
                .map(|s| format!("{}={}ms", s.name, s.time_ms))
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(result)
    }

    fn run_step<F>(
        &self,
        name: &'static str,
        img: DynamicImage,
        timings: &mut Vec<StepTiming>,
        step_fn: F,
    ) -> Result<DynamicImage, OcrError>
    where
        F: FnOnce(DynamicImage) -> Result<DynamicImage, OcrError>,
    {
        let step_start = Instant::now();
        let result = step_fn(img)?;
        timings.push(StepTiming {
            name,
            time_ms: step_start.elapsed().as_millis() as u64,
        });
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_pipeline_runs_steps_in_order() {
        let pipeline = Pipeline::new();
        assert_eq!(
            pipeline.step_names(),
            vec!["deskew", "grayscale", "blur", "brightness"]
        );

        let img = RgbImage::from_pixel(40, 20, Rgb([100, 100, 100]));
        let result = pipeline.process(DynamicImage::ImageRgb8(img)).unwrap();

        let names: Vec<_> = result.steps.iter().map(|s| s.name).collect();
        assert_eq!(names, pipeline.step_names());
    }

    #[test]
    fn test_pipeline_rejects_empty_image() {
        let err = Pipeline::new()
            .process(DynamicImage::new_luma8(0, 0))
            .unwrap_err();
        assert_eq!(err.code(), "PREPROCESSING_ERROR");
    }

    #[test]
    fn test_pipeline_blank_image_brightens_uniformly() {
        // No foreground: unrotated, then blur is a no-op and brightness lifts 0 to 30
        let img = RgbImage::new(30, 30);
        let result = Pipeline::new()
            .process(DynamicImage::ImageRgb8(img))
            .unwrap();

        assert_eq!(result.image.dimensions(), (30, 30));
        assert!(result.image.pixels().all(|p| p.0[0] == 30));
    }
}
