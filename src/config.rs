use crate::engine::RecognitionConfig;
use crate::engines::EnginePath;
use crate::error::OcrError;
use crate::Args;
use std::time::Duration;

/// Server configuration, built once at startup and never mutated
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub max_file_size: usize,
    pub max_output_pixels: u64,
    pub fetch_timeout: Duration,
    pub recognition_timeout: Duration,
    pub recognition: RecognitionConfig,
    pub engine_path: EnginePath,
}

impl TryFrom<Args> for Config {
    type Error = OcrError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        Ok(Self {
            host: args.host,
            port: args.port,
            max_file_size: args.max_file_size,
            max_output_pixels: args.max_output_pixels,
            fetch_timeout: Duration::from_secs(args.fetch_timeout_secs),
            recognition_timeout: Duration::from_secs(args.recognition_timeout_secs),
            recognition: RecognitionConfig::new(args.engine_mode, args.page_segmentation_mode)?,
            engine_path: EnginePath::resolve(args.tesseract_cmd),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineMode;
    use clap::Parser;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["ocr-token-server"]).unwrap();
        let config = Config::try_from(args).unwrap();

        assert_eq!(config.port, 5000);
        assert_eq!(config.max_file_size, 52_428_800);
        assert_eq!(config.max_output_pixels, 50_000_000);
        assert_eq!(config.fetch_timeout, Duration::from_secs(30));
        assert_eq!(config.recognition, RecognitionConfig::default());
    }

    #[test]
    fn test_engine_flags() {
        let args = Args::try_parse_from([
            "ocr-token-server",
            "--engine-mode",
            "legacy",
            "--page-segmentation-mode",
            "3",
        ])
        .unwrap();
        let config = Config::try_from(args).unwrap();

        assert_eq!(config.recognition.engine_mode(), EngineMode::Legacy);
        assert_eq!(config.recognition.page_segmentation_mode(), 3);
    }

    #[test]
    fn test_out_of_range_psm_is_rejected() {
        let args =
            Args::try_parse_from(["ocr-token-server", "--page-segmentation-mode", "42"]).unwrap();
        assert!(matches!(
            Config::try_from(args),
            Err(OcrError::InvalidConfig(_))
        ));
    }
}
