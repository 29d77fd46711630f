//! OCR Types

use serde::{Deserialize, Serialize};

/// OCR backend kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcrBackend {
    /// Tesseract binary (local install)
    Tesseract,
    /// Built-in fixture lists, selected by hashing the upload filename
    Fixture,
}

/// An uploaded scan handed to the OCR chain.
pub struct ScanInput<'a> {
    /// Original (client-supplied) filename.
    pub filename: &'a str,
    /// Raw image bytes.
    pub bytes: &'a [u8],
}

/// Text recovered from a scan.
#[derive(Debug, Clone, Serialize)]
pub struct OcrText {
    /// Recognized text, trimmed.
    pub text: String,
    /// Backend that produced it.
    pub backend: OcrBackend,
}

/// OCR error types
#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("no OCR backend available")]
    NoBackendAvailable,

    #[error("OCR processing failed: {0}")]
    ProcessingError(String),
}

impl OcrError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            Self::NoBackendAvailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::ProcessingError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
