use image::GrayImage;
use imageproc::filter::filter3x3;

/// Sharpen with a fixed edge-enhancement kernel
/// Compensates for the softening introduced by the median filter.
/// The 1-pixel border has no full neighborhood and is copied through unchanged.
pub fn apply(gray: GrayImage) -> GrayImage {
    // Center weight 32, neighbors -2 each, normalized by 16
    let kernel: [f32; 9] = [
        -2.0 / 16.0,
        -2.0 / 16.0,
        -2.0 / 16.0,
        -2.0 / 16.0,
        32.0 / 16.0,
        -2.0 / 16.0,
        -2.0 / 16.0,
        -2.0 / 16.0,
        -2.0 / 16.0,
    ];

    let mut sharpened: GrayImage = filter3x3(&gray, &kernel);
    copy_border(&gray, &mut sharpened);
    sharpened
}

fn copy_border(src: &GrayImage, dst: &mut GrayImage) {
    let (width, height) = src.dimensions();
    if width == 0 || height == 0 {
        return;
    }

    for x in 0..width {
        dst.put_pixel(x, 0, *src.get_pixel(x, 0));
        dst.put_pixel(x, height - 1, *src.get_pixel(x, height - 1));
    }
    for y in 0..height {
        dst.put_pixel(0, y, *src.get_pixel(0, y));
        dst.put_pixel(width - 1, y, *src.get_pixel(width - 1, y));
    }
}
