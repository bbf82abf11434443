use crate::bitmap::Bitmap;
use crate::error::OcrError;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;

/// Recognition model used by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EngineMode {
    /// Classic pattern-matching recognizer
    Legacy,
    /// Neural network line recognizer
    #[default]
    Lstm,
    /// Legacy and LSTM combined
    Combined,
}

impl EngineMode {
    /// Numeric value understood by `--oem`
    pub fn oem(&self) -> u8 {
        match self {
            Self::Legacy => 0,
            Self::Lstm => 1,
            Self::Combined => 2,
        }
    }
}

/// Highest page segmentation mode the engine defines
pub const MAX_PAGE_SEGMENTATION_MODE: u8 = 13;

/// Assume a single uniform block of text
pub const DEFAULT_PAGE_SEGMENTATION_MODE: u8 = 6;

/// Engine directives applied to every recognition call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecognitionConfig {
    engine_mode: EngineMode,
    page_segmentation_mode: u8,
}

impl RecognitionConfig {
    pub fn new(engine_mode: EngineMode, page_segmentation_mode: u8) -> Result<Self, OcrError> {
        if page_segmentation_mode > MAX_PAGE_SEGMENTATION_MODE {
            return Err(OcrError::InvalidConfig(format!(
                "page segmentation mode must be 0-{}, got {}",
                MAX_PAGE_SEGMENTATION_MODE, page_segmentation_mode
            )));
        }
        Ok(Self {
            engine_mode,
            page_segmentation_mode,
        })
    }

    pub fn engine_mode(&self) -> EngineMode {
        self.engine_mode
    }

    pub fn page_segmentation_mode(&self) -> u8 {
        self.page_segmentation_mode
    }

    /// Command line directives, e.g. `["--oem", "1", "--psm", "6"]`
    pub fn to_args(&self) -> Vec<String> {
        vec![
            "--oem".to_string(),
            self.engine_mode().oem().to_string(),
            "--psm".to_string(),
            self.page_segmentation_mode().to_string(),
        ]
    }
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            engine_mode: EngineMode::Lstm,
            page_segmentation_mode: DEFAULT_PAGE_SEGMENTATION_MODE,
        }
    }
}

impl fmt::Display for RecognitionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_args().join(" "))
    }
}

/// Trait that the text recognition backend must implement
#[async_trait]
pub trait Recognizer: Send + Sync {
    /// Returns the engine identifier (e.g., "tesseract")
    fn name(&self) -> &'static str;

    /// Recognize the text in a preprocessed image. One attempt, no retries.
    async fn recognize(&self, image: &Bitmap, config: &RecognitionConfig)
        -> Result<String, OcrError>;
}
