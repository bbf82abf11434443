use image::{imageops::FilterType, GrayImage};

/// Both dimensions must reach this size before recognition
pub const MIN_DIMENSION: u32 = 1000;

/// Upscale small images with Lanczos3 so both sides reach `MIN_DIMENSION`.
/// Aspect ratio is preserved and large images are never scaled down.
pub fn apply(gray: GrayImage) -> GrayImage {
    match target_size(gray.width(), gray.height()) {
        Some((width, height)) => image::imageops::resize(&gray, width, height, FilterType::Lanczos3),
        None => gray,
    }
}

/// Size after upscaling, or `None` when the image is already large enough.
///
/// `ratio = max(MIN / width, MIN / height)` is applied to both sides and the
/// results are rounded to the nearest pixel.
pub fn target_size(width: u32, height: u32) -> Option<(u32, u32)> {
    if width == 0 || height == 0 {
        return None;
    }
    if width >= MIN_DIMENSION && height >= MIN_DIMENSION {
        return None;
    }

    let min = MIN_DIMENSION as f64;
    let ratio = (min / width as f64).max(min / height as f64);
    let new_width = (width as f64 * ratio).round() as u32;
    let new_height = (height as f64 * ratio).round() as u32;

    Some((new_width.max(MIN_DIMENSION), new_height.max(MIN_DIMENSION)))
}
