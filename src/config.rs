//! Configuration management for Codesheet Server

use std::env;

use crate::barcode::RenderOptions;
use crate::ocr::OcrServiceConfig;
use crate::sheet::SheetOptions;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub layout: LayoutConfig,
    pub ocr: OcrConfig,
    pub limits: LimitsConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub upload_dir: String,
    pub temp_dir: String,
    /// Stale scratch entries older than this are deleted at startup.
    pub retention_minutes: i64,
}

#[derive(Debug, Clone)]
pub struct LayoutConfig {
    pub barcode_width_mm: f64,
    pub barcode_height_mm: f64,
    pub spacing_mm: f64,
    pub margin_mm: f64,
    /// Overrides the capacity derived from the page height.
    pub max_per_page: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct OcrConfig {
    pub language: String,
    pub fixture_fallback: bool,
}

#[derive(Debug, Clone)]
pub struct LimitsConfig {
    /// Request body cap for uploads, bytes.
    pub max_upload_bytes: usize,
    /// Most codes accepted in one batch.
    pub max_codes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
            },
            storage: StorageConfig {
                upload_dir: "uploads".to_string(),
                temp_dir: "temp".to_string(),
                retention_minutes: 60,
            },
            layout: LayoutConfig {
                barcode_width_mm: 80.0,
                barcode_height_mm: 25.0,
                spacing_mm: 8.0,
                margin_mm: 5.0,
                max_per_page: None,
            },
            ocr: OcrConfig {
                language: "eng".to_string(),
                fixture_fallback: true,
            },
            limits: LimitsConfig {
                max_upload_bytes: 10 * 1024 * 1024,
                max_codes: 200,
            },
        }
    }
}

impl Config {
    /// Build from environment variables, falling back to defaults for
    /// anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Config::default();
        Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or(defaults.server.host),
                port: parse_env("PORT", defaults.server.port),
            },
            storage: StorageConfig {
                upload_dir: env::var("UPLOAD_DIR").unwrap_or(defaults.storage.upload_dir),
                temp_dir: env::var("TEMP_DIR").unwrap_or(defaults.storage.temp_dir),
                retention_minutes: parse_env(
                    "SCRATCH_RETENTION_MINUTES",
                    defaults.storage.retention_minutes,
                ),
            },
            layout: LayoutConfig {
                barcode_width_mm: parse_env("BARCODE_WIDTH_MM", defaults.layout.barcode_width_mm),
                barcode_height_mm: parse_env(
                    "BARCODE_HEIGHT_MM",
                    defaults.layout.barcode_height_mm,
                ),
                spacing_mm: parse_env("BARCODE_SPACING_MM", defaults.layout.spacing_mm),
                margin_mm: parse_env("PAGE_MARGIN_MM", defaults.layout.margin_mm),
                max_per_page: env::var("MAX_PER_PAGE").ok().and_then(|v| v.parse().ok()),
            },
            ocr: OcrConfig {
                language: env::var("OCR_LANGUAGE").unwrap_or(defaults.ocr.language),
                fixture_fallback: parse_env("OCR_FIXTURE_FALLBACK", defaults.ocr.fixture_fallback),
            },
            limits: LimitsConfig {
                max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", defaults.limits.max_upload_bytes),
                max_codes: parse_env("MAX_CODES", defaults.limits.max_codes),
            },
        }
    }

    /// Sheet geometry for the PDF writer.
    pub fn sheet_options(&self) -> SheetOptions {
        SheetOptions {
            barcode_width_mm: self.layout.barcode_width_mm,
            barcode_height_mm: self.layout.barcode_height_mm,
            spacing_mm: self.layout.spacing_mm,
            margin_mm: self.layout.margin_mm,
            max_per_page: self.layout.max_per_page,
            ..SheetOptions::default()
        }
    }

    /// Raster settings for barcode PNGs.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions::default()
    }

    /// OCR chain settings.
    pub fn ocr_config(&self) -> OcrServiceConfig {
        OcrServiceConfig {
            language: self.ocr.language.clone(),
            fixture_fallback: self.ocr.fixture_fallback,
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
