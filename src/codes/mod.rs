//! Code acquisition
//!
//! A `Code` is the one entity in the system: a trimmed, non-empty string that
//! lives for a single PDF-generation request. Codes arrive either as pasted
//! newline-separated text (accepted as-is after trimming, bounded in length)
//! or recovered from a scanned image by the OCR pipeline, where they must
//! match the canonical shipment-code shape.

mod extract;

pub use extract::extract_codes;

use serde::Serialize;

/// Longest code accepted on the paste path. Bounds the printed symbol width;
/// anything longer would not fit legibly in the 80 mm barcode box.
pub const MAX_CODE_LEN: usize = 48;

/// A single barcode payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Code(String);

impl Code {
    /// Trim and accept a raw line. Returns `None` for blank or overlong
    /// input; no shape validation is applied on the paste path.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.len() > MAX_CODE_LEN {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Split pasted text into codes: one per line, trimmed, blank lines dropped.
/// Overlong lines are logged and skipped rather than failing the batch.
/// Duplicates are kept; a pasted duplicate prints twice.
pub fn parse_code_lines(text: &str) -> Vec<Code> {
    text.lines()
        .filter_map(|line| {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                return None;
            }
            match Code::new(trimmed) {
                Some(code) => Some(code),
                None => {
                    tracing::warn!(len = trimmed.len(), "skipping overlong code line");
                    None
                }
            }
        })
        .collect()
}
