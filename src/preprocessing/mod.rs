//! Image preprocessing module for OCR enhancement
//!
//! Conditions decoded images with a fixed chain of filters before they are
//! handed to the recognition engine.

pub mod pipeline;
pub mod steps;

pub use pipeline::preprocess;
