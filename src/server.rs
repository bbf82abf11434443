use crate::config::Config;
use crate::engine::{RecognitionConfig, Recognizer};
use crate::engines::tesseract::TesseractEngine;
use crate::engines::EnginePath;
use crate::error::OcrError;
use crate::loader::{ImageLoader, ImageSource};
use crate::preprocessing;
use crate::response::{self, ProcessImageResponse};
use crate::tokenizer;
use axum::{
    extract::{DefaultBodyLimit, FromRequest, Multipart, Request, State},
    http::header,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub loader: Arc<ImageLoader>,
    pub recognizer: Arc<dyn Recognizer>,
    pub config: Arc<Config>,
}

/// JSON request body for remote images
#[derive(Debug, Deserialize)]
pub struct ImageUrlRequest {
    pub image: Option<String>,
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Server info response
#[derive(Serialize)]
pub struct InfoResponse {
    pub version: String,
    pub engine: String,
    pub engine_path: EnginePath,
    pub recognition: RecognitionConfig,
    pub max_file_size_bytes: usize,
    pub max_output_pixels: u64,
}

/// Run the HTTP server
pub async fn run(config: Config) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let loader = ImageLoader::new(
        config.fetch_timeout,
        config.max_file_size,
        config.max_output_pixels,
    )?;
    let engine = TesseractEngine::new(config.engine_path.clone(), config.recognition_timeout);

    let state = AppState {
        loader: Arc::new(loader),
        recognizer: Arc::new(engine),
        config: Arc::new(config),
    };

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

pub fn create_router(state: AppState) -> Router {
    let max_file_size = state.config.max_file_size;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/process-image", post(handle_process_image).layer(cors))
        .route("/test", get(handle_test))
        .route("/health", get(handle_health))
        .route("/info", get(handle_info))
        .layer(DefaultBodyLimit::max(max_file_size))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Handle OCR requests: load, preprocess, recognize, tokenize
async fn handle_process_image(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<ProcessImageResponse>, OcrError> {
    let start = Instant::now();

    let source = extract_source(request).await?;
    let bitmap = state.loader.load(source).await?;

    let processed = tokio::task::spawn_blocking(move || preprocessing::preprocess(bitmap))
        .await
        .map_err(|e| OcrError::Internal(format!("Preprocessing task failed: {}", e)))?;

    let raw_text = state
        .recognizer
        .recognize(&processed, &state.config.recognition)
        .await?;
    let tokens = tokenizer::tokenize(&raw_text);

    tracing::info!(
        "OCR completed in {}ms with {}, text length: {}, tokens: {}",
        start.elapsed().as_millis(),
        state.recognizer.name(),
        raw_text.len(),
        tokens.len()
    );
    tracing::debug!("Extracted text: {:?}", raw_text);

    Ok(Json(response::assemble(raw_text, tokens)))
}

/// Pick the image source from either a multipart upload or a JSON body
async fn extract_source(request: Request) -> Result<ImageSource, OcrError> {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    if content_type.starts_with("multipart/form-data") {
        let multipart = Multipart::from_request(request, &())
            .await
            .map_err(|e| OcrError::InvalidRequest(e.body_text()))?;
        read_upload(multipart).await
    } else if content_type.starts_with("application/json") {
        let Json(body) = Json::<ImageUrlRequest>::from_request(request, &())
            .await
            .map_err(|e| OcrError::InvalidRequest(e.body_text()))?;
        body.image
            .map(ImageSource::RemoteUrl)
            .ok_or(OcrError::MissingImage)
    } else {
        Err(OcrError::MissingImage)
    }
}

async fn read_upload(mut multipart: Multipart) -> Result<ImageSource, OcrError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| OcrError::InvalidRequest(format!("Failed to parse multipart: {}", e)))?
    {
        if field.name() != Some("image") {
            // Ignore unknown fields
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(|s| s.to_string());
        let bytes = field.bytes().await.map_err(|e| {
            OcrError::InvalidRequest(format!("Failed to read file data: {}", e))
        })?;

        return Ok(ImageSource::Upload {
            file_name,
            content_type,
            bytes,
        });
    }

    Err(OcrError::MissingImage)
}

/// Liveness check
async fn handle_test() -> &'static str {
    "HELLO"
}

/// Handle health check requests
async fn handle_health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Handle info requests
async fn handle_info(State(state): State<AppState>) -> impl IntoResponse {
    Json(InfoResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        engine: state.recognizer.name().to_string(),
        engine_path: state.config.engine_path.clone(),
        recognition: state.config.recognition,
        max_file_size_bytes: state.config.max_file_size,
        max_output_pixels: state.config.max_output_pixels,
    })
}
