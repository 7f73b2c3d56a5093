//! PDF Module
//!
//! Rasterizes PDF uploads into page images for recognition.
//!
//! - `pdftoppm` (poppler-utils, always available as a system binary)
//! - MuPDF (in-process, behind the `pdf-mupdf` feature)

mod pdftoppm;
mod rasterizer;
mod types;

#[cfg(feature = "pdf-mupdf")]
mod mupdf_backend;

pub use pdftoppm::PdftoppmRasterizer;
pub use rasterizer::PageRasterizer;
pub use types::{RasterizeError, RasterizerKind, DEFAULT_RENDER_DPI};

#[cfg(feature = "pdf-mupdf")]
pub use mupdf_backend::MupdfRasterizer;
