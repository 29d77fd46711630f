//! Barcode rasterization
//!
//! Turns a Code128 module pattern into a grayscale PNG, one fixed-width
//! column of pixels per module, with quiet zones on both sides. The raster
//! is deliberately generated wider than its printed size (80 mm on the
//! sheet) so bars stay crisp after PDF scaling.

use std::path::Path;

use image::{DynamicImage, GrayImage, Luma};

use super::code128::{self, Code128Error, QUIET_ZONE_MODULES};

const BLACK: Luma<u8> = Luma([0u8]);
const WHITE: Luma<u8> = Luma([255u8]);

/// Raster settings for one barcode image.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Horizontal pixels per module.
    pub module_width_px: u32,
    /// Bar height in pixels.
    pub height_px: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            module_width_px: 4,
            height_px: 120,
        }
    }
}

/// Paint a module pattern into a grayscale image.
pub fn rasterize(modules: &[bool], opts: &RenderOptions) -> GrayImage {
    let total_modules = modules.len() as u32 + 2 * QUIET_ZONE_MODULES;
    let width = total_modules * opts.module_width_px;
    let mut img = GrayImage::from_pixel(width, opts.height_px, WHITE);

    for (index, is_bar) in modules.iter().enumerate() {
        if !*is_bar {
            continue;
        }
        let x0 = (QUIET_ZONE_MODULES + index as u32) * opts.module_width_px;
        for x in x0..x0 + opts.module_width_px {
            for y in 0..opts.height_px {
                img.put_pixel(x, y, BLACK);
            }
        }
    }

    img
}

/// Encode and rasterize a single code.
pub fn barcode_image(code: &str, opts: &RenderOptions) -> Result<GrayImage, Code128Error> {
    let modules = code128::encode(code)?;
    Ok(rasterize(&modules, opts))
}

/// Write a barcode raster as a PNG file (one file per code in the request
/// scratch directory, mirroring what lands on the sheet).
pub fn save_png(img: &GrayImage, path: &Path) -> Result<(), image::ImageError> {
    img.save_with_format(path, image::ImageFormat::Png)
}

/// Wrap a raster for PDF embedding.
pub fn to_dynamic(img: GrayImage) -> DynamicImage {
    DynamicImage::ImageLuma8(img)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raster_width_includes_quiet_zones() {
        let modules = code128::encode("A1").unwrap();
        let opts = RenderOptions::default();
        let img = rasterize(&modules, &opts);
        let expected = (modules.len() as u32 + 2 * QUIET_ZONE_MODULES) * opts.module_width_px;
        assert_eq!(img.width(), expected);
        assert_eq!(img.height(), opts.height_px);
    }

    #[test]
    fn quiet_zones_are_white_and_symbol_edges_are_black() {
        let opts = RenderOptions {
            module_width_px: 2,
            height_px: 10,
        };
        let modules = code128::encode("TEST-01").unwrap();
        let img = rasterize(&modules, &opts);

        let quiet_px = QUIET_ZONE_MODULES * opts.module_width_px;
        for x in 0..quiet_px {
            assert_eq!(img.get_pixel(x, 5), &WHITE);
            assert_eq!(img.get_pixel(img.width() - 1 - x, 5), &WHITE);
        }
        // First and last modules of any Code128 symbol are bars.
        assert_eq!(img.get_pixel(quiet_px, 5), &BLACK);
        assert_eq!(img.get_pixel(img.width() - quiet_px - 1, 5), &BLACK);
    }

    #[test]
    fn png_round_trips_through_scratch_dir() {
        let dir = tempfile::tempdir().unwrap();
        let img = barcode_image("I16334-5050998-5070996", &RenderOptions::default()).unwrap();
        let path = dir.path().join("I16334-5050998-5070996.png");
        save_png(&img, &path).unwrap();

        let reloaded = image::open(&path).unwrap().to_luma8();
        assert_eq!(reloaded.dimensions(), img.dimensions());
    }
}
