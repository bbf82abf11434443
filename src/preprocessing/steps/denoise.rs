use image::GrayImage;
use imageproc::filter::median_filter;

/// Apply median filter to reduce noise
/// Median filter preserves edges better than a mean filter
pub fn apply(gray: GrayImage) -> GrayImage {
    // 3x3 median filter (radius 1) - effective for salt-and-pepper noise
    median_filter(&gray, 1, 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_denoise_removes_isolated_pixels() {
        let mut img = GrayImage::from_pixel(10, 10, Luma([128]));
        img.put_pixel(5, 5, Luma([0])); // "pepper" noise
        img.put_pixel(2, 7, Luma([255])); // "salt" noise

        let result = apply(img);

        assert_eq!(result.get_pixel(5, 5).0[0], 128);
        assert_eq!(result.get_pixel(2, 7).0[0], 128);
    }

    #[test]
    fn test_denoise_reduces_variance() {
        let img = GrayImage::from_fn(16, 16, |x, y| {
            if (x * 7 + y * 3) % 11 == 0 {
                Luma([255])
            } else {
                Luma([100])
            }
        });

        let result = apply(img.clone());
        assert!(calculate_variance(&result) <= calculate_variance(&img));
    }

    fn calculate_variance(img: &GrayImage) -> f64 {
        let pixels: Vec<f64> = img.pixels().map(|p| p.0[0] as f64).collect();
        let mean = pixels.iter().sum::<f64>() / pixels.len() as f64;
        pixels.iter().map(|p| (p - mean).powi(2)).sum::<f64>() / pixels.len() as f64
    }
}
