//! Route modules for Codesheet Server

pub mod generate;
pub mod health;
pub mod index;
pub mod upload;

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::{header, StatusCode},
    response::Response,
    routing::{get, post},
    Router,
};

use crate::codes::Code;
use crate::error::{AppError, Result};
use crate::sheet;
use crate::state::AppState;

/// Assemble the application router.
pub fn router(state: AppState) -> Router {
    let body_limit = state.config().limits.max_upload_bytes;
    Router::new()
        .route("/", get(index::index))
        .route("/health", get(health::health_check))
        .route("/generate", post(generate::generate_from_text))
        .route("/upload", post(upload::upload_scan))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Run the code-list-to-PDF pipeline and wrap the result as a download.
///
/// The raster and PDF work is CPU-bound, so it runs on the blocking pool;
/// the request scratch dir is dropped (and deleted) as soon as the PDF
/// bytes exist.
pub(crate) async fn sheet_response(state: &AppState, codes: Vec<Code>) -> Result<Response> {
    let max_codes = state.config().limits.max_codes;
    if codes.len() > max_codes {
        return Err(AppError::BadRequest(format!(
            "Too many codes: {} (limit {})",
            codes.len(),
            max_codes
        )));
    }

    let session = state.workspace().create_session()?;
    let opts = state.config().sheet_options();
    let raster = state.config().render_options();

    let pdf = tokio::task::spawn_blocking(move || {
        let result = sheet::generate_sheet(&codes, &opts, &raster, session.path());
        drop(session);
        result
    })
    .await
    .map_err(|e| AppError::Internal(format!("render task failed: {}", e)))??;

    pdf_download(pdf)
}

/// Serve PDF bytes as an attachment named `barcodes.pdf`.
fn pdf_download(pdf: Vec<u8>) -> Result<Response> {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/pdf")
        .header(header::CONTENT_LENGTH, pdf.len())
        .header(
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"barcodes.pdf\"",
        )
        .body(Body::from(pdf))
        .map_err(|e| AppError::Internal(e.to_string()))
}
