//! Upload route
//!
//! `POST /upload` - multipart field `file` carrying a scanned label image.
//! The scan is persisted, run through the OCR chain, and the recovered
//! codes are rendered to a `barcodes.pdf` attachment.

use axum::{
    extract::{Multipart, State},
    response::Response,
};
use mime_guess::mime;

use crate::codes;
use crate::error::{AppError, Result};
use crate::ocr::ScanInput;
use crate::state::AppState;

use super::sheet_response;

pub async fn upload_scan(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response> {
    let mut scan: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field
            .file_name()
            .map(str::to_string)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| AppError::BadRequest("No selected file".to_string()))?;
        let bytes = field.bytes().await?;
        scan = Some((filename, bytes.to_vec()));
    }

    let (filename, bytes) =
        scan.ok_or_else(|| AppError::BadRequest("No file part in request".to_string()))?;
    if bytes.is_empty() {
        return Err(AppError::BadRequest("Uploaded file is empty".to_string()));
    }

    let looks_like_image = mime_guess::from_path(&filename)
        .first()
        .map(|m| m.type_() == mime::IMAGE)
        .unwrap_or(false);
    if !looks_like_image {
        return Err(AppError::BadRequest(format!(
            "Unsupported file type: {}",
            filename
        )));
    }

    // Reject files that merely wear an image extension.
    image::load_from_memory(&bytes)?;

    let stored = state.workspace().store_upload(&filename, &bytes)?;
    tracing::info!(path = %stored.display(), bytes = bytes.len(), "scan stored");

    let recognized = state
        .ocr()
        .recognize(
            &ScanInput {
                filename: &filename,
                bytes: &bytes,
            },
            None,
        )
        .await?;

    let codes = codes::extract_codes(&recognized.text);
    if codes.is_empty() {
        return Err(AppError::BadRequest(
            "No codes recognized in the uploaded scan".to_string(),
        ));
    }

    tracing::info!(
        count = codes.len(),
        backend = ?recognized.backend,
        "generating sheet from scan"
    );
    sheet_response(&state, codes).await
}
