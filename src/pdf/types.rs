//! Rasterization types

use std::str::FromStr;

/// Resolution used when rendering PDF pages for OCR
pub const DEFAULT_RENDER_DPI: u32 = 300;

/// Rasterizer backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RasterizerKind {
    /// poppler `pdftoppm` binary
    #[default]
    Pdftoppm,
    /// In-process MuPDF rendering
    Mupdf,
}

impl FromStr for RasterizerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdftoppm" | "poppler" => Ok(Self::Pdftoppm),
            "mupdf" => Ok(Self::Mupdf),
            other => Err(format!("unknown PDF rasterizer '{}'", other)),
        }
    }
}

/// Rasterization error types
#[derive(Debug, thiserror::Error)]
pub enum RasterizeError {
    #[error("PDF rasterizer not available: {0}")]
    NotAvailable(String),

    #[error("Failed to rasterize PDF: {0}")]
    Failed(String),

    #[error("PDF produced no pages")]
    NoPages,

    #[error("Failed to encode page image: {0}")]
    Encode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(feature = "pdf-mupdf")]
impl From<mupdf::Error> for RasterizeError {
    fn from(err: mupdf::Error) -> Self {
        RasterizeError::Failed(err.to_string())
    }
}
