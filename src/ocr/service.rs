//! OCR Service
//!
//! Orchestrates the provider chain: try each configured backend in order,
//! skipping unavailable ones and falling through on failure. The fixture
//! provider sits last so a real backend wins whenever one is installed.

use std::sync::Arc;

use super::provider::{FixtureProvider, OcrProvider};
use super::types::{OcrBackend, OcrError, OcrText, ScanInput};

/// OCR service configuration
#[derive(Debug, Clone)]
pub struct OcrServiceConfig {
    /// Default OCR language (tesseract language code)
    pub language: String,
    /// Whether the fixture fallback is enabled
    pub fixture_fallback: bool,
}

impl Default for OcrServiceConfig {
    fn default() -> Self {
        Self {
            language: "eng".to_string(),
            fixture_fallback: true,
        }
    }
}

/// OCR service for recovering code text from uploaded scans
pub struct OcrService {
    config: OcrServiceConfig,
    providers: Vec<Arc<dyn OcrProvider>>,
}

impl OcrService {
    /// Create a new OCR service with the standard provider chain.
    pub fn new(config: OcrServiceConfig) -> Self {
        let mut providers: Vec<Arc<dyn OcrProvider>> = Vec::new();

        #[cfg(feature = "ocr-tesseract")]
        {
            use super::provider::TesseractProvider;
            providers.push(Arc::new(TesseractProvider::new(&config.language)));
        }

        if config.fixture_fallback {
            providers.push(Arc::new(FixtureProvider));
        }

        Self { config, providers }
    }

    /// Create a service with an explicit provider chain, bypassing the
    /// standard one. Providers are tried in the order given.
    pub fn with_providers(config: OcrServiceConfig, providers: Vec<Arc<dyn OcrProvider>>) -> Self {
        Self { config, providers }
    }

    /// Get the backends that are currently usable
    pub async fn available_backends(&self) -> Vec<OcrBackend> {
        let mut available = Vec::new();
        for provider in &self.providers {
            if provider.is_available().await {
                available.push(provider.backend());
            }
        }
        available
    }

    /// Recover text from a scan, trying providers in order.
    pub async fn recognize(
        &self,
        scan: &ScanInput<'_>,
        language: Option<&str>,
    ) -> Result<OcrText, OcrError> {
        let lang = language.unwrap_or(&self.config.language);

        for provider in &self.providers {
            if !provider.is_available().await {
                continue;
            }
            match provider.recognize(scan, Some(lang)).await {
                Ok(result) => {
                    tracing::info!(backend = ?result.backend, chars = result.text.len(), "scan recognized");
                    return Ok(result);
                }
                Err(e) => {
                    tracing::warn!(
                        backend = ?provider.backend(),
                        error = %e,
                        "OCR backend failed, trying next"
                    );
                }
            }
        }

        Err(OcrError::NoBackendAvailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::provider::MockProvider;

    fn scan() -> ScanInput<'static> {
        ScanInput {
            filename: "scan.png",
            bytes: &[],
        }
    }

    #[tokio::test]
    async fn default_chain_always_has_the_fixture_fallback() {
        let service = OcrService::new(OcrServiceConfig::default());
        let backends = service.available_backends().await;
        assert!(backends.contains(&OcrBackend::Fixture));

        let result = service.recognize(&scan(), None).await.unwrap();
        assert!(!result.text.is_empty());
    }

    #[tokio::test]
    async fn disabled_fallback_with_no_backends_errors() {
        let service = OcrService::with_providers(
            OcrServiceConfig {
                fixture_fallback: false,
                ..Default::default()
            },
            Vec::new(),
        );
        let result = service.recognize(&scan(), None).await;
        assert!(matches!(result, Err(OcrError::NoBackendAvailable)));
    }

    #[tokio::test]
    async fn unavailable_provider_is_skipped() {
        let service = OcrService::with_providers(
            OcrServiceConfig::default(),
            vec![
                Arc::new(MockProvider {
                    text: "unreachable".to_string(),
                    available: false,
                    fail: false,
                }),
                Arc::new(FixtureProvider),
            ],
        );
        let result = service.recognize(&scan(), None).await.unwrap();
        assert_eq!(result.backend, OcrBackend::Fixture);
    }

    #[tokio::test]
    async fn failing_provider_falls_through_to_next() {
        let service = OcrService::with_providers(
            OcrServiceConfig::default(),
            vec![
                Arc::new(MockProvider {
                    text: String::new(),
                    available: true,
                    fail: true,
                }),
                Arc::new(MockProvider {
                    text: "I16334-5050998-5070996".to_string(),
                    available: true,
                    fail: false,
                }),
            ],
        );
        let result = service.recognize(&scan(), None).await.unwrap();
        assert_eq!(result.text, "I16334-5050998-5070996");
    }
}
