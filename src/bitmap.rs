//! In-memory raster image passed between pipeline stages
//!
//! A `Bitmap` owns its pixel buffer. Converting between color modes always
//! produces a new buffer, the old one is dropped with the consumed value.

use image::{DynamicImage, GrayImage, RgbImage, RgbaImage};

/// Pixel layout of a `Bitmap`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Rgba,
    Rgb,
    Grayscale,
}

impl ColorMode {
    /// Number of 8-bit channels per pixel
    pub fn channels(&self) -> usize {
        match self {
            Self::Rgba => 4,
            Self::Rgb => 3,
            Self::Grayscale => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rgba => "RGBA",
            Self::Rgb => "RGB",
            Self::Grayscale => "L",
        }
    }
}

#[derive(Debug, Clone)]
pub enum Bitmap {
    Rgba(RgbaImage),
    Rgb(RgbImage),
    Grayscale(GrayImage),
}

impl Bitmap {
    pub fn width(&self) -> u32 {
        match self {
            Self::Rgba(img) => img.width(),
            Self::Rgb(img) => img.width(),
            Self::Grayscale(img) => img.width(),
        }
    }

    pub fn height(&self) -> u32 {
        match self {
            Self::Rgba(img) => img.height(),
            Self::Rgb(img) => img.height(),
            Self::Grayscale(img) => img.height(),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    pub fn mode(&self) -> ColorMode {
        match self {
            Self::Rgba(_) => ColorMode::Rgba,
            Self::Rgb(_) => ColorMode::Rgb,
            Self::Grayscale(_) => ColorMode::Grayscale,
        }
    }

    /// Raw pixel bytes, row-major, `channels()` bytes per pixel
    pub fn as_raw(&self) -> &[u8] {
        match self {
            Self::Rgba(img) => img.as_raw(),
            Self::Rgb(img) => img.as_raw(),
            Self::Grayscale(img) => img.as_raw(),
        }
    }

    pub fn into_dynamic(self) -> DynamicImage {
        match self {
            Self::Rgba(img) => DynamicImage::ImageRgba8(img),
            Self::Rgb(img) => DynamicImage::ImageRgb8(img),
            Self::Grayscale(img) => DynamicImage::ImageLuma8(img),
        }
    }
}

impl From<DynamicImage> for Bitmap {
    /// Normalize whatever the decoder produced into one of the three modes.
    /// Alpha-carrying layouts become RGBA, single-channel layouts become
    /// grayscale, everything else becomes RGB. Deeper bit depths are reduced
    /// to 8 bits per channel.
    fn from(image: DynamicImage) -> Self {
        match image {
            DynamicImage::ImageRgba8(img) => Self::Rgba(img),
            DynamicImage::ImageRgb8(img) => Self::Rgb(img),
            DynamicImage::ImageLuma8(img) => Self::Grayscale(img),
            other if other.color().has_alpha() => Self::Rgba(other.to_rgba8()),
            other if other.color().channel_count() == 1 => Self::Grayscale(other.to_luma8()),
            other => Self::Rgb(other.to_rgb8()),
        }
    }
}
