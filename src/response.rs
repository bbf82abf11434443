//! Response payloads for `/process-image`

use crate::error::{ErrorKind, OcrError};
use crate::tokenizer::TokenList;
use serde::Serialize;

/// Successful OCR result
#[derive(Debug, Serialize)]
pub struct ProcessImageResponse {
    pub raw_text: String,
    pub tokens: TokenList,
    pub token_count: usize,
}

/// Structured error body
#[derive(Debug, Serialize)]
pub struct ErrorPayload {
    pub error: String,
    #[serde(rename = "type")]
    pub kind: ErrorKind,
    /// Resolved engine binary, only reported for recognition failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine_path: Option<String>,
}

pub fn assemble(raw_text: String, tokens: TokenList) -> ProcessImageResponse {
    let token_count = tokens.len();
    ProcessImageResponse {
        raw_text,
        tokens,
        token_count,
    }
}

pub fn assemble_error(err: &OcrError) -> ErrorPayload {
    let engine_path = match err {
        OcrError::RecognitionFailed { engine_path, .. } => {
            Some(engine_path.display().to_string())
        }
        _ => None,
    };

    ErrorPayload {
        error: err.to_string(),
        kind: err.kind(),
        engine_path,
    }
}

impl From<&OcrError> for ErrorPayload {
    fn from(err: &OcrError) -> Self {
        assemble_error(err)
    }
}
