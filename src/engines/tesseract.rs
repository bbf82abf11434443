//! Tesseract engine implementation
//!
//! Runs the `tesseract` command line program once per request. The
//! preprocessed bitmap is written to a temporary PNG file and the recognized
//! text is read from the program's stdout.

use super::EnginePath;
use crate::bitmap::Bitmap;
use crate::engine::{RecognitionConfig, Recognizer};
use crate::error::OcrError;
use async_trait::async_trait;
use std::io::Write;
use std::process::Stdio;
use std::time::Duration;
use tempfile::NamedTempFile;
use tokio::process::Command;

pub struct TesseractEngine {
    engine_path: EnginePath,
    timeout: Duration,
}

impl TesseractEngine {
    pub fn new(engine_path: EnginePath, timeout: Duration) -> Self {
        if !engine_path.exists() {
            tracing::warn!(
                "Tesseract binary not found at {} (resolved from {:?}), recognition will fail",
                engine_path.path.display(),
                engine_path.source
            );
        }

        tracing::info!(
            "Tesseract engine initialized (binary: {}, timeout: {}s)",
            engine_path.path.display(),
            timeout.as_secs()
        );

        Self {
            engine_path,
            timeout,
        }
    }

    fn failure(&self, message: impl Into<String>) -> OcrError {
        OcrError::RecognitionFailed {
            message: message.into(),
            engine_path: self.engine_path.path.clone(),
        }
    }
}

#[async_trait]
impl Recognizer for TesseractEngine {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    async fn recognize(
        &self,
        image: &Bitmap,
        config: &RecognitionConfig,
    ) -> Result<String, OcrError> {
        let owned = image.clone();
        let input = tokio::task::spawn_blocking(move || write_png(owned))
            .await
            .map_err(|e| OcrError::Internal(format!("PNG encoder task failed: {}", e)))??;

        tracing::debug!(
            "Running {} {} stdout {}",
            self.engine_path.path.display(),
            input.path().display(),
            config
        );

        let mut command = Command::new(&self.engine_path.path);
        command
            .arg(input.path())
            .arg("stdout")
            .args(config.to_args())
            .stdin(Stdio::null())
            // reaps the child when the timeout drops the future
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| {
                self.failure(format!(
                    "tesseract timed out after {} seconds",
                    self.timeout.as_secs()
                ))
            })?
            .map_err(|e| self.failure(format!("failed to run tesseract: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(self.failure(format!(
                "tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        String::from_utf8(output.stdout)
            .map_err(|e| self.failure(format!("tesseract produced invalid UTF-8: {}", e)))
    }
}

/// Encode the bitmap as PNG into a temp file that lives until dropped
fn write_png(image: Bitmap) -> Result<NamedTempFile, OcrError> {
    let mut png = Vec::new();
    image
        .into_dynamic()
        .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
        .map_err(|e| OcrError::Internal(format!("Failed to encode PNG: {}", e)))?;

    let mut file = tempfile::Builder::new()
        .prefix("ocr-input-")
        .suffix(".png")
        .tempfile()
        .map_err(|e| OcrError::Internal(format!("Failed to create temp file: {}", e)))?;

    file.write_all(&png)
        .and_then(|_| file.flush())
        .map_err(|e| OcrError::Internal(format!("Failed to write temp file: {}", e)))?;

    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineMode;
    use crate::engines::EnginePathSource;
    use image::{GrayImage, Luma};

    fn engine(path: &str) -> TesseractEngine {
        TesseractEngine::new(
            EnginePath::new(path, EnginePathSource::Environment),
            Duration::from_secs(5),
        )
    }

    fn sample_bitmap() -> Bitmap {
        Bitmap::Grayscale(GrayImage::from_pixel(32, 16, Luma([255])))
    }

    #[test]
    fn test_write_png_produces_decodable_file() {
        let file = write_png(sample_bitmap()).unwrap();
        let decoded = image::open(file.path()).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (32, 16));
    }

    #[tokio::test]
    async fn test_missing_binary_is_recognition_error() {
        let engine = engine("/nonexistent/bin/tesseract");
        let err = engine
            .recognize(&sample_bitmap(), &RecognitionConfig::default())
            .await
            .unwrap_err();

        match err {
            OcrError::RecognitionFailed {
                message,
                engine_path,
            } => {
                assert!(message.contains("failed to run tesseract"));
                assert_eq!(engine_path.to_str(), Some("/nonexistent/bin/tesseract"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    // `echo` stands in for the engine and prints back the arguments it got
    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_engine_receives_directives() {
        let engine = engine("/bin/echo");
        let config = RecognitionConfig::new(EngineMode::Combined, 11).unwrap();

        let text = engine.recognize(&sample_bitmap(), &config).await.unwrap();

        assert!(text.contains(".png stdout --oem 2 --psm 11"), "got {:?}", text);
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_slow_engine_is_killed_after_timeout() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("tesseract");
        std::fs::write(&script, "#!/bin/sh\nexec sleep 10\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let engine = TesseractEngine::new(
            EnginePath::new(script.clone(), EnginePathSource::Environment),
            Duration::from_secs(1),
        );

        let start = std::time::Instant::now();
        let mut result = engine
            .recognize(&sample_bitmap(), &RecognitionConfig::default())
            .await;
        // A freshly written script can briefly report ETXTBSY while another
        // test thread forks
        for _ in 0..5 {
            let busy = matches!(&result, Err(err) if err.to_string().contains("Text file busy"));
            if !busy {
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
            result = engine
                .recognize(&sample_bitmap(), &RecognitionConfig::default())
                .await;
        }

        let err = result.unwrap_err();
        assert!(start.elapsed() < Duration::from_secs(8), "took {:?}", start.elapsed());
        match err {
            OcrError::RecognitionFailed {
                message,
                engine_path,
            } => {
                assert!(message.contains("timed out after 1 seconds"), "got {:?}", message);
                assert_eq!(engine_path, script);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_failing_engine_is_recognition_error() {
        let engine = engine("/bin/false");
        let err = engine
            .recognize(&sample_bitmap(), &RecognitionConfig::default())
            .await
            .unwrap_err();

        assert!(matches!(err, OcrError::RecognitionFailed { .. }));
        assert!(err.to_string().contains("exited with"));
    }
}
