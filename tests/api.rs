//! HTTP surface tests
//!
//! Drives the full router with in-process requests: form and multipart
//! round-trips, error mapping, and scratch-dir cleanup.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use tower::util::ServiceExt;

use codesheet_server::config::Config;
use codesheet_server::ocr::{OcrBackend, OcrError, OcrProvider, OcrService, OcrText, ScanInput};
use codesheet_server::routes;
use codesheet_server::state::AppState;

struct TestApp {
    app: Router,
    temp_dir: std::path::PathBuf,
    root: tempfile::TempDir,
}

fn test_app() -> TestApp {
    let guard = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.storage.upload_dir = guard.path().join("uploads").to_str().unwrap().to_string();
    config.storage.temp_dir = guard.path().join("temp").to_str().unwrap().to_string();

    let temp_dir = guard.path().join("temp");
    let state = AppState::new(config).unwrap();
    TestApp {
        app: routes::router(state),
        temp_dir,
        root: guard,
    }
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

fn form_request(codes: &str) -> Request<Body> {
    let encoded: String = url_encode(codes);
    Request::builder()
        .method("POST")
        .uri("/generate")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(format!("codes={}", encoded)))
        .unwrap()
}

fn url_encode(s: &str) -> String {
    s.bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' => {
                (b as char).to_string()
            }
            other => format!("%{:02X}", other),
        })
        .collect()
}

fn multipart_request(filename: Option<&str>, content: &[u8]) -> Request<Body> {
    let boundary = "codesheet-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    match filename {
        Some(name) => body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n",
                name
            )
            .as_bytes(),
        ),
        None => body.extend_from_slice(
            b"Content-Disposition: form-data; name=\"other\"\r\n\r\n",
        ),
    }
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

    Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .unwrap()
}

fn tiny_png() -> Vec<u8> {
    let img = image::GrayImage::from_pixel(8, 8, image::Luma([255u8]));
    let mut bytes = Vec::new();
    img.write_to(
        &mut std::io::Cursor::new(&mut bytes),
        image::ImageFormat::Png,
    )
    .unwrap();
    bytes
}

#[tokio::test]
async fn index_serves_the_form() {
    let test = test_app();
    let response = test
        .app
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_bytes(response).await;
    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("action=\"/generate\""));
    assert!(html.contains("action=\"/upload\""));
}

#[tokio::test]
async fn health_reports_version() {
    let test = test_app();
    let response = test
        .app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn generate_returns_a_pdf_attachment() {
    let test = test_app();
    let response = test
        .app
        .clone()
        .oneshot(form_request(
            "I16334-5050998-5070996\nI16412-3803972-3823971\n",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/pdf"
    );
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"barcodes.pdf\""
    );
    let body = body_bytes(response).await;
    assert!(body.starts_with(b"%PDF"));

    // Scratch dirs are cleaned once the PDF exists.
    let leftovers = std::fs::read_dir(&test.temp_dir).unwrap().count();
    assert_eq!(leftovers, 0);
}

#[tokio::test]
async fn generate_rejects_blank_input() {
    let test = test_app();
    let response = test.app.oneshot(form_request("  \n \n")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn generate_rejects_oversized_batches() {
    let test = test_app();
    let many: String = (0..500).map(|i| format!("CODE-{}\n", i)).collect();
    let response = test.app.oneshot(form_request(&many)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upload_without_file_part_is_rejected() {
    let test = test_app();
    let response = test
        .app
        .oneshot(multipart_request(None, b"irrelevant"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upload_rejects_non_image_extension() {
    let test = test_app();
    let response = test
        .app
        .oneshot(multipart_request(Some("codes.txt"), b"not an image"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upload_rejects_fake_image_content() {
    let test = test_app();
    let response = test
        .app
        .oneshot(multipart_request(Some("scan.png"), b"not really a png"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upload_produces_a_pdf_via_the_fixture_chain() {
    let test = test_app();
    let response = test
        .app
        .clone()
        .oneshot(multipart_request(Some("labels.png"), &tiny_png()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/pdf"
    );
    let body = body_bytes(response).await;
    assert!(body.starts_with(b"%PDF"));
}

/// OCR backend that recognizes text containing nothing shaped like a code.
struct CodeFreeProvider;

#[async_trait::async_trait]
impl OcrProvider for CodeFreeProvider {
    fn backend(&self) -> OcrBackend {
        OcrBackend::Tesseract
    }

    async fn is_available(&self) -> bool {
        true
    }

    async fn recognize(
        &self,
        _scan: &ScanInput<'_>,
        _language: Option<&str>,
    ) -> Result<OcrText, OcrError> {
        Ok(OcrText {
            text: "handling note: fragile, this side up".to_string(),
            backend: OcrBackend::Tesseract,
        })
    }
}

#[tokio::test]
async fn upload_with_code_free_scan_text_is_rejected() {
    let guard = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.storage.upload_dir = guard.path().join("uploads").to_str().unwrap().to_string();
    config.storage.temp_dir = guard.path().join("temp").to_str().unwrap().to_string();

    let ocr = OcrService::with_providers(
        config.ocr_config(),
        vec![std::sync::Arc::new(CodeFreeProvider)],
    );
    let app = routes::router(AppState::with_ocr(config, ocr).unwrap());

    let response = app
        .oneshot(multipart_request(Some("labels.png"), &tiny_png()))
        .await
        .unwrap();

    // Recognized text with no extractable code is a client error, not an
    // empty PDF.
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["error"], "bad_request");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("No codes recognized"));
}

#[tokio::test]
async fn upload_stores_the_scan() {
    let test = test_app();
    let uploads = test.root.path().join("uploads");
    let response = test
        .app
        .clone()
        .oneshot(multipart_request(Some("my labels.png"), &tiny_png()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let stored: Vec<_> = std::fs::read_dir(&uploads)
        .unwrap()
        .filter_map(|e| e.ok())
        .collect();
    assert_eq!(stored.len(), 1);
    let name = stored[0].file_name().into_string().unwrap();
    assert!(name.ends_with("my_labels.png"));
}
