use image::{GrayImage, Luma};

/// Contrast multiplier, 1.0 leaves the image unchanged
pub const CONTRAST_FACTOR: f32 = 2.0;

/// Boost contrast around the mean luminance.
/// Each pixel becomes `mean + factor * (pixel - mean)`, clamped to 0-255.
pub fn apply(gray: GrayImage) -> GrayImage {
    enhance(gray, CONTRAST_FACTOR)
}

pub fn enhance(gray: GrayImage, factor: f32) -> GrayImage {
    let mean = mean_luminance(&gray) as f32;

    let mut out = gray;
    for pixel in out.pixels_mut() {
        let value = mean + factor * (pixel.0[0] as f32 - mean);
        *pixel = Luma([value.round().clamp(0.0, 255.0) as u8]);
    }
    out
}

/// Mean pixel value, rounded to the nearest integer
fn mean_luminance(img: &GrayImage) -> u8 {
    let count = img.width() as u64 * img.height() as u64;
    if count == 0 {
        return 0;
    }
    let sum: u64 = img.pixels().map(|p| p.0[0] as u64).sum();
    ((sum + count / 2) / count) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contrast_spreads_values_around_mean() {
        // Left half 100, right half 150, mean 125
        let img = GrayImage::from_fn(10, 4, |x, _| if x < 5 { Luma([100]) } else { Luma([150]) });

        let result = apply(img);

        assert_eq!(result.get_pixel(0, 0).0[0], 75);
        assert_eq!(result.get_pixel(9, 0).0[0], 175);
    }

    #[test]
    fn test_contrast_clamps_to_valid_range() {
        let img = GrayImage::from_fn(10, 1, |x, _| if x < 5 { Luma([10]) } else { Luma([240]) });

        let result = apply(img);

        assert_eq!(result.get_pixel(0, 0).0[0], 0);
        assert_eq!(result.get_pixel(9, 0).0[0], 255);
    }

    #[test]
    fn test_unit_factor_is_identity() {
        let img = GrayImage::from_fn(6, 6, |x, y| Luma([(x * 40 + y) as u8]));
        assert_eq!(enhance(img.clone(), 1.0), img);
    }

    #[test]
    fn test_uniform_image_is_unchanged() {
        let img = GrayImage::from_pixel(5, 5, Luma([128]));
        assert_eq!(apply(img.clone()), img);
    }
}
