use crate::bitmap::Bitmap;
use image::{Rgb, RgbImage};

/// Drop the alpha channel of RGBA images.
///
/// Color channels are kept as stored; nothing is composited against a
/// background. Other modes pass through untouched.
pub fn apply(image: Bitmap) -> Bitmap {
    match image {
        Bitmap::Rgba(rgba) => {
            let rgb = RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
                let [r, g, b, _] = rgba.get_pixel(x, y).0;
                Rgb([r, g, b])
            });
            Bitmap::Rgb(rgb)
        }
        other => other,
    }
}
