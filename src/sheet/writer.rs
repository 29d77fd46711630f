//! PDF assembly
//!
//! Places rasterized barcodes onto A4 pages with printpdf. Layout math lives
//! in [`super::layout`]; this module only converts slots (top-left mm) into
//! printpdf's bottom-left coordinate space and scales each raster to its
//! printed size.

use image::DynamicImage;
use printpdf::{Image, ImageTransform, Mm, PdfDocument};

use crate::codes::Code;

use super::layout::SheetOptions;

/// Pixels-per-inch the rasters are embedded at before scaling.
const EMBED_DPI: f64 = 300.0;
const MM_PER_INCH: f64 = 25.4;

/// Sheet assembly errors
#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    #[error("no barcodes to render")]
    Empty,

    #[error("PDF assembly failed: {0}")]
    Pdf(String),
}

/// A code together with its raster, ready for placement.
pub struct RenderedBarcode {
    pub code: Code,
    pub image: DynamicImage,
}

/// Tile `barcodes` across as many A4 pages as needed and return the PDF
/// bytes. Every barcode is placed exactly once.
pub fn write_pdf(barcodes: &[RenderedBarcode], opts: &SheetOptions) -> Result<Vec<u8>, SheetError> {
    if barcodes.is_empty() {
        return Err(SheetError::Empty);
    }

    let page_w = Mm(opts.page_width_mm as f32);
    let page_h = Mm(opts.page_height_mm as f32);
    let (doc, first_page, first_layer) = PdfDocument::new("Barcodes", page_w, page_h, "barcodes");

    for (page_index, range) in opts.paginate(barcodes.len()).into_iter().enumerate() {
        let layer = if page_index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page, layer) = doc.add_page(page_w, page_h, "barcodes");
            doc.get_page(page).get_layer(layer)
        };

        let slots = opts.slots(range.len());
        for (barcode, slot) in barcodes[range].iter().zip(slots) {
            let image = Image::from_dynamic_image(&barcode.image);

            let natural_w_mm = barcode.image.width() as f64 * MM_PER_INCH / EMBED_DPI;
            let natural_h_mm = barcode.image.height() as f64 * MM_PER_INCH / EMBED_DPI;

            // Slot coordinates are top-left; printpdf places the image from
            // its lower-left corner.
            let y_bottom = opts.page_height_mm - slot.y_mm - opts.barcode_height_mm;

            image.add_to_layer(
                layer.clone(),
                ImageTransform {
                    translate_x: Some(Mm(slot.x_mm as f32)),
                    translate_y: Some(Mm(y_bottom as f32)),
                    scale_x: Some((opts.barcode_width_mm / natural_w_mm) as f32),
                    scale_y: Some((opts.barcode_height_mm / natural_h_mm) as f32),
                    dpi: Some(EMBED_DPI as f32),
                    ..Default::default()
                },
            );
            tracing::debug!(code = %barcode.code, page = page_index + 1, "barcode placed");
        }
    }

    doc.save_to_bytes().map_err(|e| SheetError::Pdf(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::barcode::{barcode_image, to_dynamic, RenderOptions};

    fn rendered(codes: &[&str]) -> Vec<RenderedBarcode> {
        codes
            .iter()
            .map(|c| RenderedBarcode {
                code: Code::new(c).unwrap(),
                image: to_dynamic(barcode_image(c, &RenderOptions::default()).unwrap()),
            })
            .collect()
    }

    #[test]
    fn writes_a_parsable_pdf_header() {
        let pdf = write_pdf(&rendered(&["I16334-5050998-5070996"]), &SheetOptions::default())
            .unwrap();
        assert!(pdf.starts_with(b"%PDF"));
        assert!(pdf.len() > 500);
    }

    #[test]
    fn multi_page_batch_emits_expected_page_count() {
        let opts = SheetOptions {
            max_per_page: Some(2),
            ..Default::default()
        };
        let codes: Vec<String> = (0..5).map(|i| format!("I1633{}-5050998-5070996", i)).collect();
        let refs: Vec<&str> = codes.iter().map(String::as_str).collect();
        let pdf = write_pdf(&rendered(&refs), &opts).unwrap();

        // 5 codes at 2 per page -> a page tree with /Count 3.
        let text = String::from_utf8_lossy(&pdf);
        assert!(text.contains("/Count 3"), "expected 3 pages in the page tree");
    }

    #[test]
    fn empty_batch_is_rejected() {
        assert!(matches!(
            write_pdf(&[], &SheetOptions::default()),
            Err(SheetError::Empty)
        ));
    }
}
