//! Obtain and decode the image for a request

use crate::bitmap::Bitmap;
use crate::error::OcrError;
use crate::preprocessing::steps::upscale;
use axum::body::Bytes;
use image::{ImageReader, Limits};
use std::io::Cursor;
use std::time::Duration;

/// Where the request's image comes from
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// Multipart upload
    Upload {
        file_name: String,
        content_type: Option<String>,
        bytes: Bytes,
    },
    /// URL to fetch with a single GET
    RemoteUrl(String),
}

pub struct ImageLoader {
    client: reqwest::Client,
    max_size: usize,
    max_output_pixels: u64,
}

impl ImageLoader {
    pub fn new(
        fetch_timeout: Duration,
        max_size: usize,
        max_output_pixels: u64,
    ) -> Result<Self, OcrError> {
        let client = reqwest::Client::builder()
            .timeout(fetch_timeout)
            .user_agent(concat!("ocr-token-server/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| OcrError::InvalidConfig(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            max_size,
            max_output_pixels,
        })
    }

    /// Validate, fetch if remote, and decode
    pub async fn load(&self, source: ImageSource) -> Result<Bitmap, OcrError> {
        let bytes = match source {
            ImageSource::Upload {
                file_name,
                content_type,
                bytes,
            } => {
                tracing::info!(
                    "Received file: {} ({}), {} bytes",
                    file_name,
                    content_type.as_deref().unwrap_or("unknown content type"),
                    bytes.len()
                );
                self.check_upload(&file_name, bytes)?
            }
            ImageSource::RemoteUrl(url) => self.fetch(&url).await?,
        };

        let max_pixels = self.max_output_pixels;
        let bitmap = tokio::task::spawn_blocking(move || decode(&bytes, max_pixels))
            .await
            .map_err(|e| OcrError::Internal(format!("Decoder task failed: {}", e)))??;

        tracing::info!(
            "Image mode: {}, size: {}x{}",
            bitmap.mode().as_str(),
            bitmap.width(),
            bitmap.height()
        );
        tracing::debug!(
            "Decoded buffer: {} bytes, {} channel(s) per pixel",
            bitmap.as_raw().len(),
            bitmap.mode().channels()
        );

        self.check_output_size(&bitmap)?;

        Ok(bitmap)
    }

    /// Reject images whose upscaled size would exceed the pixel budget
    fn check_output_size(&self, bitmap: &Bitmap) -> Result<(), OcrError> {
        let (width, height) = bitmap.dimensions();
        let (out_width, out_height) =
            upscale::target_size(width, height).unwrap_or((width, height));
        let pixels = u64::from(out_width) * u64::from(out_height);

        if pixels > self.max_output_pixels {
            return Err(OcrError::DimensionsTooLarge(format!(
                "{}x{} upscales to {}x{} ({} pixels, max: {})",
                width, height, out_width, out_height, pixels, self.max_output_pixels
            )));
        }
        Ok(())
    }

    fn check_upload(&self, file_name: &str, bytes: Bytes) -> Result<Bytes, OcrError> {
        if file_name.is_empty() {
            return Err(OcrError::EmptyFileName);
        }
        if bytes.is_empty() {
            return Err(OcrError::EmptyInput);
        }
        if bytes.len() > self.max_size {
            return Err(OcrError::ImageTooLarge {
                size: bytes.len(),
                max: self.max_size,
            });
        }
        Ok(bytes)
    }

    async fn fetch(&self, url: &str) -> Result<Bytes, OcrError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(OcrError::MissingImage);
        }

        tracing::info!("Fetching image from {}", url);

        let fetch_error = |reason: String| OcrError::FetchFailed {
            url: url.to_string(),
            reason,
        };

        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_error(format!("HTTP {}", status)));
        }

        let too_large = |size: u64| {
            fetch_error(format!(
                "response of {} bytes exceeds limit of {} bytes",
                size, self.max_size
            ))
        };

        let declared = response.content_length();
        if let Some(length) = declared {
            if length > self.max_size as u64 {
                return Err(too_large(length));
            }
        }

        // Content-Length is absent on chunked responses, so count as we read
        let capacity = declared.map(|len| len as usize).unwrap_or(0);
        let mut body = Vec::with_capacity(capacity);
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| fetch_error(format!("failed to read body: {}", e)))?
        {
            let total = body.len() + chunk.len();
            if total > self.max_size {
                return Err(too_large(total as u64));
            }
            body.extend_from_slice(&chunk);
        }

        Ok(Bytes::from(body))
    }
}

/// Decode any supported raster format, detected from the content itself.
///
/// The decoder may not allocate more than an RGBA buffer of `max_pixels`.
pub fn decode(bytes: &[u8], max_pixels: u64) -> Result<Bitmap, OcrError> {
    let mut limits = Limits::default();
    limits.max_alloc = Some(max_pixels.saturating_mul(4));

    let mut reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| OcrError::DecodeFailed(e.to_string()))?;
    reader.limits(limits);

    let image = reader.decode().map_err(|e| match e {
        image::ImageError::Limits(limit) => OcrError::DimensionsTooLarge(limit.to_string()),
        other => OcrError::DecodeFailed(other.to_string()),
    })?;

    if image.width() == 0 || image.height() == 0 {
        return Err(OcrError::DecodeFailed(format!(
            "image has no pixels ({}x{})",
            image.width(),
            image.height()
        )));
    }

    Ok(Bitmap::from(image))
}
