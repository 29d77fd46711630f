//! Sheet layout arithmetic
//!
//! Computes how N fixed-size barcodes tile across A4 pages: per-page
//! capacity, page slicing, and the centered position of every barcode on its
//! page. All distances are millimeters with a top-left origin; the PDF
//! writer converts to the PDF's bottom-left origin when placing images.

/// A4 portrait, millimeters.
pub const A4_WIDTH_MM: f64 = 210.0;
pub const A4_HEIGHT_MM: f64 = 297.0;

/// Printed dimensions of the sheet and its barcodes.
#[derive(Debug, Clone)]
pub struct SheetOptions {
    pub page_width_mm: f64,
    pub page_height_mm: f64,
    pub barcode_width_mm: f64,
    pub barcode_height_mm: f64,
    pub spacing_mm: f64,
    pub margin_mm: f64,
    /// Explicit per-page capacity; derived from the page height when unset.
    pub max_per_page: Option<usize>,
}

impl Default for SheetOptions {
    fn default() -> Self {
        Self {
            page_width_mm: A4_WIDTH_MM,
            page_height_mm: A4_HEIGHT_MM,
            barcode_width_mm: 80.0,
            barcode_height_mm: 25.0,
            spacing_mm: 8.0,
            margin_mm: 5.0,
            max_per_page: None,
        }
    }
}

/// Position of one barcode on a page, top-left corner in mm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    pub x_mm: f64,
    pub y_mm: f64,
}

impl SheetOptions {
    /// Barcodes that fit on one page with spacing, inside the margins.
    /// Always at least one, so a single oversized barcode still prints.
    pub fn capacity(&self) -> usize {
        if let Some(n) = self.max_per_page {
            return n.max(1);
        }
        let usable = self.page_height_mm - 2.0 * self.margin_mm + self.spacing_mm;
        let per_code = self.barcode_height_mm + self.spacing_mm;
        ((usable / per_code).floor() as usize).max(1)
    }

    /// Number of pages needed for `n` codes.
    pub fn page_count(&self, n: usize) -> usize {
        n.div_ceil(self.capacity())
    }

    /// Slice `n` codes into per-page index ranges.
    pub fn paginate(&self, n: usize) -> Vec<std::ops::Range<usize>> {
        let capacity = self.capacity();
        (0..n)
            .step_by(capacity)
            .map(|start| start..(start + capacity).min(n))
            .collect()
    }

    /// Slots for a page holding `count` barcodes: horizontally centered,
    /// the group vertically centered as a block.
    pub fn slots(&self, count: usize) -> Vec<Slot> {
        if count == 0 {
            return Vec::new();
        }
        let group_height = count as f64 * self.barcode_height_mm
            + (count - 1) as f64 * self.spacing_mm;
        let start_y = (self.page_height_mm - group_height) / 2.0;
        let x_mm = (self.page_width_mm - self.barcode_width_mm) / 2.0;

        (0..count)
            .map(|i| Slot {
                x_mm,
                y_mm: start_y + i as f64 * (self.barcode_height_mm + self.spacing_mm),
            })
            .collect()
    }
}
