//! Barcode Module
//!
//! Code128 symbol encoding and rasterization. The encoder produces the raw
//! module pattern (code sets B/C, check symbol, stop); the renderer paints
//! it into a grayscale PNG ready for PDF embedding.

mod code128;
mod render;

pub use code128::{encode, Code128Error, QUIET_ZONE_MODULES};
pub use render::{barcode_image, rasterize, save_png, to_dynamic, RenderOptions};
