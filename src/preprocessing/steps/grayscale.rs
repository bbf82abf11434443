use crate::bitmap::Bitmap;
use image::{GrayImage, Luma, Rgb};

/// Convert to a single luminance channel using ITU-R 601 weights.
/// This is the foundation for every later step, which all work on `GrayImage`.
pub fn apply(image: Bitmap) -> GrayImage {
    match image {
        Bitmap::Grayscale(gray) => gray,
        Bitmap::Rgb(rgb) => GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
            Luma([luma(rgb.get_pixel(x, y))])
        }),
        Bitmap::Rgba(rgba) => GrayImage::from_fn(rgba.width(), rgba.height(), |x, y| {
            let [r, g, b, _] = rgba.get_pixel(x, y).0;
            Luma([luma(&Rgb([r, g, b]))])
        }),
    }
}

/// L = 0.299 R + 0.587 G + 0.114 B in 16-bit fixed point, rounded
fn luma(pixel: &Rgb<u8>) -> u8 {
    let [r, g, b] = pixel.0;
    let weighted = r as u32 * 19595 + g as u32 * 38470 + b as u32 * 7471 + 0x8000;
    (weighted >> 16) as u8
}
