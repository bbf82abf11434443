use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod bitmap;
mod config;
mod engine;
mod engines;
mod error;
mod loader;
mod preprocessing;
mod response;
mod server;
mod tokenizer;

#[derive(Parser, Debug)]
#[command(name = "ocr-token-server")]
#[command(about = "OCR server that returns recognized text and normalized tokens")]
#[command(version)]
pub struct Args {
    /// Host address to bind to
    #[arg(long, env = "OCR_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "OCR_PORT", default_value = "5000")]
    pub port: u16,

    /// Maximum image size in bytes, for uploads and fetched URLs (default: 50MB)
    #[arg(long, env = "OCR_MAX_FILE_SIZE", default_value = "52428800")]
    pub max_file_size: usize,

    /// Largest image, in pixels, accepted after upscaling (default: 50 megapixels)
    #[arg(long, env = "OCR_MAX_OUTPUT_PIXELS", default_value = "50000000")]
    pub max_output_pixels: u64,

    /// Timeout for fetching remote images, in seconds
    #[arg(long, env = "OCR_FETCH_TIMEOUT_SECS", default_value = "30")]
    pub fetch_timeout_secs: u64,

    /// Timeout for a single tesseract run, in seconds
    #[arg(long, env = "OCR_RECOGNITION_TIMEOUT_SECS", default_value = "30")]
    pub recognition_timeout_secs: u64,

    /// Tesseract engine mode
    #[arg(long, env = "OCR_ENGINE_MODE", value_enum, default_value_t = engine::EngineMode::Lstm)]
    pub engine_mode: engine::EngineMode,

    /// Tesseract page segmentation mode (0-13, 6 = uniform block of text)
    #[arg(long, env = "OCR_PSM", default_value = "6")]
    pub page_segmentation_mode: u8,

    /// Path to the tesseract binary, used when it is not found on PATH
    #[arg(long, env = "TESSERACT_CMD")]
    pub tesseract_cmd: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config::Config::try_from(args)?;

    tracing::info!("Starting ocr-token-server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Tesseract binary: {} (from {:?}), directives: {}",
        config.engine_path.path.display(),
        config.engine_path.source,
        config.recognition
    );
    tracing::info!("Binding to {}:{}", config.host, config.port);

    server::run(config).await
}
