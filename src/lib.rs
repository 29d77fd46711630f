//! Codesheet Server Library
//!
//! Turns lists of shipment codes into printable A4 barcode sheets. Codes
//! arrive pasted as text or recovered from an uploaded scan; each becomes a
//! Code128 raster, tiled across pages by the sheet layout and served back as
//! a PDF download.
//!
//! # Modules
//!
//! - `codes`: the `Code` entity, line parsing, OCR-text extraction
//! - `barcode`: Code128 encoding and rasterization
//! - `sheet`: pagination/layout arithmetic and the PDF writer
//! - `ocr`: provider chain recovering text from uploaded scans
//! - `storage`: upload and scratch-directory workspace
//! - `routes`: the HTTP surface

pub mod barcode;
pub mod codes;
pub mod config;
pub mod error;
pub mod ocr;
pub mod routes;
pub mod sheet;
pub mod state;
pub mod storage;
