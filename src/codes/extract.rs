//! Code extraction from OCR text
//!
//! Scans recognized text for candidates of the shipment-code shape
//! `<letter><5 digits>-<7 digits>-<7 digits>` and repairs the common OCR
//! confusions in the leading character: the letter is frequently read as a
//! visually similar digit (I as 1, O as 0, B as 8, S as 5, Z as 2) or in
//! lowercase. Anything that still fails the canonical shape after repair is
//! discarded.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

use super::Code;

/// Candidate shape: leading character is left loose so repairable misreads
/// are caught, the digit groups are exact.
static CANDIDATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9][0-9]{5}-[0-9]{7}-[0-9]{7}").unwrap());

/// Canonical shape a repaired code must satisfy.
static CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][0-9]{5}-[0-9]{7}-[0-9]{7}$").unwrap());

/// Map a misread leading character back to the letter it resembles.
fn repair_leading(c: char) -> Option<char> {
    match c {
        '1' => Some('I'),
        '0' => Some('O'),
        '8' => Some('B'),
        '5' => Some('S'),
        '2' => Some('Z'),
        'a'..='z' => Some(c.to_ascii_uppercase()),
        'A'..='Z' => Some(c),
        _ => None,
    }
}

/// Extract every code present in OCR output, in order of first appearance.
/// The same physical label often matches more than once in a noisy scan, so
/// duplicates are dropped here (unlike the paste path).
pub fn extract_codes(text: &str) -> Vec<Code> {
    let mut seen = HashSet::new();
    let mut codes = Vec::new();

    for candidate in CANDIDATE_RE.find_iter(text) {
        let raw = candidate.as_str();
        let mut chars = raw.chars();
        let lead = match chars.next().and_then(repair_leading) {
            Some(c) => c,
            None => {
                tracing::debug!(candidate = raw, "unrepairable leading character");
                continue;
            }
        };

        let repaired: String = std::iter::once(lead).chain(chars).collect();
        if !CODE_RE.is_match(&repaired) {
            continue;
        }
        if seen.insert(repaired.clone()) {
            // Shape-checked above, so Code::new cannot reject it.
            if let Some(code) = Code::new(&repaired) {
                codes.push(code);
            }
        }
    }

    codes
}
