//! Individual preprocessing steps, in pipeline order

pub mod flatten;
pub mod grayscale;
pub mod denoise;
pub mod contrast;
pub mod sharpen;
pub mod upscale;
