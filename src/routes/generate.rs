//! Generate route
//!
//! `POST /generate` - urlencoded form field `codes` holding newline-separated
//! text, answered with a `barcodes.pdf` attachment.

use axum::{extract::State, response::Response, Form};
use serde::Deserialize;

use crate::codes;
use crate::error::{AppError, Result};
use crate::state::AppState;

use super::sheet_response;

#[derive(Debug, Deserialize)]
pub struct GenerateForm {
    #[serde(default)]
    pub codes: String,
}

pub async fn generate_from_text(
    State(state): State<AppState>,
    Form(form): Form<GenerateForm>,
) -> Result<Response> {
    let codes = codes::parse_code_lines(&form.codes);
    if codes.is_empty() {
        return Err(AppError::BadRequest("No codes provided".to_string()));
    }

    tracing::info!(count = codes.len(), "generating sheet from pasted codes");
    sheet_response(&state, codes).await
}
