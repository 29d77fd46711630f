//! OCR Module
//!
//! Recovers code text from uploaded scans.
//!
//! Backends:
//! - Tesseract (local binary, behind the `ocr-tesseract` feature)
//! - Fixture lists selected by hashing the upload filename (always on,
//!   unless disabled in config)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use codesheet_server::ocr::{OcrService, OcrServiceConfig, ScanInput};
//!
//! let service = OcrService::new(OcrServiceConfig::default());
//! let text = service
//!     .recognize(&ScanInput { filename: "labels.png", bytes: &image_bytes }, None)
//!     .await?;
//! ```

mod provider;
mod service;
mod types;

pub use provider::{FixtureProvider, OcrProvider};
pub use service::{OcrService, OcrServiceConfig};
pub use types::{OcrBackend, OcrError, OcrText, ScanInput};

#[cfg(feature = "ocr-tesseract")]
pub use provider::TesseractProvider;
