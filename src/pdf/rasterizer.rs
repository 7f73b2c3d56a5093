//! Page rasterizer capability

use std::path::Path;

use async_trait::async_trait;

use super::types::RasterizeError;

/// PDF page rasterization capability
///
/// Renders every page of a PDF, in page order, as an encoded JPEG image.
#[async_trait]
pub trait PageRasterizer: Send + Sync {
    /// Short backend name for logs and health output
    fn name(&self) -> &'static str;

    /// Check if the backend can be used
    async fn is_available(&self) -> bool;

    /// Render all pages of `pdf_path` at `dpi`
    async fn rasterize(&self, pdf_path: &Path, dpi: u32) -> Result<Vec<Vec<u8>>, RasterizeError>;
}
