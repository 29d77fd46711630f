//! Sheet Module
//!
//! The code-list-to-PDF pipeline: rasterize every code, drop the ones that
//! fail to encode (logged, per the skip-and-continue error policy), keep a
//! PNG of each raster in the request scratch directory, and tile the rest
//! across A4 pages.

mod layout;
mod writer;

pub use layout::{Slot, SheetOptions, A4_HEIGHT_MM, A4_WIDTH_MM};
pub use writer::{write_pdf, RenderedBarcode, SheetError};

use std::path::Path;

use crate::barcode::{self, RenderOptions};
use crate::codes::Code;

/// Render `codes` into a finished PDF.
///
/// Individual codes that cannot be encoded are skipped with a warning; the
/// batch only fails when nothing at all could be rendered. CPU-bound, so
/// handlers run it under `spawn_blocking`.
pub fn generate_sheet(
    codes: &[Code],
    opts: &SheetOptions,
    raster: &RenderOptions,
    scratch_dir: &Path,
) -> Result<Vec<u8>, SheetError> {
    let mut barcodes = Vec::with_capacity(codes.len());

    for code in codes {
        let image = match barcode::barcode_image(code.as_str(), raster) {
            Ok(image) => image,
            Err(e) => {
                tracing::warn!(code = %code, error = %e, "skipping unencodable code");
                continue;
            }
        };

        // Scratch PNGs mirror what lands on the sheet; losing one is not
        // worth failing the request over.
        let png_path = scratch_dir.join(format!("{}.png", sanitize_stem(code.as_str())));
        if let Err(e) = barcode::save_png(&image, &png_path) {
            tracing::warn!(code = %code, error = %e, "failed to write scratch PNG");
        }

        barcodes.push(RenderedBarcode {
            code: code.clone(),
            image: barcode::to_dynamic(image),
        });
    }

    tracing::info!(
        requested = codes.len(),
        rendered = barcodes.len(),
        "rasterized barcode batch"
    );
    write_pdf(&barcodes, opts)
}

/// Codes become scratch filenames; keep only filesystem-safe characters.
fn sanitize_stem(code: &str) -> String {
    code.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
