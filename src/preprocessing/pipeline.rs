use crate::bitmap::Bitmap;
use std::time::Instant;

use super::steps;

/// Timing information for a single preprocessing step
#[derive(Debug, Clone)]
pub struct StepTiming {
    pub name: &'static str,
    pub time_ms: u64,
}

/// Result of preprocessing including timing stats
#[derive(Debug, Clone)]
pub struct PreprocessingResult {
    /// Preprocessed image, always grayscale
    pub image: Bitmap,
    /// Total preprocessing time in milliseconds
    pub total_time_ms: u64,
    /// Individual step timings, in execution order
    pub steps: Vec<StepTiming>,
}

/// Fixed preprocessing chain that conditions images for text recognition.
///
/// Steps run in this order and cannot be reordered, each one depends on the
/// color mode produced by the previous:
/// flatten, grayscale, denoise, contrast, sharpen, upscale.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pipeline;

impl Pipeline {
    pub fn new() -> Self {
        Self
    }

    /// Run every step on the image
    pub fn process(&self, image: Bitmap) -> PreprocessingResult {
        let start = Instant::now();
        let mut timings = Vec::with_capacity(6);

        let img = run_step("flatten", image, &mut timings, steps::flatten::apply);
        let gray = run_step("grayscale", img, &mut timings, steps::grayscale::apply);
        let gray = run_step("denoise", gray, &mut timings, steps::denoise::apply);
        let gray = run_step("contrast", gray, &mut timings, steps::contrast::apply);
        let gray = run_step("sharpen", gray, &mut timings, steps::sharpen::apply);
        let gray = run_step("upscale", gray, &mut timings, steps::upscale::apply);

        let result = PreprocessingResult {
            image: Bitmap::Grayscale(gray),
            total_time_ms: start.elapsed().as_millis() as u64,
            steps: timings,
        };

        let (width, height) = result.image.dimensions();
        tracing::debug!(
            "Preprocessing finished in {}ms, output {}x{}, steps: {:?}",
            result.total_time_ms,
            width,
            height,
            result.steps
        );

        result
    }
}

fn run_step<I, O, F>(name: &'static str, img: I, timings: &mut Vec<StepTiming>, step_fn: F) -> O
where
    F: FnOnce(I) -> O,
{
    let step_start = Instant::now();
    let result = step_fn(img);
    timings.push(StepTiming {
        name,
        time_ms: step_start.elapsed().as_millis() as u64,
    });
    result
}

/// Condition an image for recognition. Output is grayscale with both
/// dimensions at least 1000 pixels.
pub fn preprocess(image: Bitmap) -> Bitmap {
    Pipeline::new().process(image).image
}
