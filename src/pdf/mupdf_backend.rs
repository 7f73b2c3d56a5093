//! MuPDF rasterizer
//!
//! Renders pages in-process. MuPDF contexts are not thread-safe, so the
//! document is opened inside a blocking task and never leaves it.

use std::io::Cursor;
use std::path::Path;

use async_trait::async_trait;
use image::{DynamicImage, RgbImage};
use mupdf::{Colorspace, Document, Matrix, Pixmap};

use super::rasterizer::PageRasterizer;
use super::types::RasterizeError;

/// PDF user space is 72 points per inch
const POINTS_PER_INCH: f32 = 72.0;

/// Rasterizer backed by the MuPDF library
#[derive(Default)]
pub struct MupdfRasterizer;

impl MupdfRasterizer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PageRasterizer for MupdfRasterizer {
    fn name(&self) -> &'static str {
        "mupdf"
    }

    async fn is_available(&self) -> bool {
        true
    }

    async fn rasterize(&self, pdf_path: &Path, dpi: u32) -> Result<Vec<Vec<u8>>, RasterizeError> {
        let path = pdf_path.to_string_lossy().to_string();
        let scale = dpi as f32 / POINTS_PER_INCH;

        tokio::task::spawn_blocking(move || {
            let doc = Document::open(&path)?;
            let page_count = doc.page_count()?;
            if page_count == 0 {
                return Err(RasterizeError::NoPages);
            }

            let matrix = Matrix::new_scale(scale, scale);
            let colorspace = Colorspace::device_rgb();

            let mut images = Vec::with_capacity(page_count as usize);
            for index in 0..page_count {
                let page = doc.load_page(index)?;
                let pixmap = page.to_pixmap(&matrix, &colorspace, false, true)?;
                images.push(encode_jpeg(&pixmap)?);
            }

            tracing::debug!(pdf = %path, pages = images.len(), dpi, "PDF rasterized");
            Ok(images)
        })
        .await
        .map_err(|e| RasterizeError::Failed(format!("Task join error: {}", e)))?
    }
}

/// Encode an RGB pixmap as JPEG
fn encode_jpeg(pixmap: &Pixmap) -> Result<Vec<u8>, RasterizeError> {
    let width = pixmap.width() as u32;
    let height = pixmap.height() as u32;
    let samples = pixmap.samples();
    let n = pixmap.n() as usize;

    let mut rgb_buffer = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height as usize {
        for x in 0..width as usize {
            let offset = (y * width as usize + x) * n;
            let r = samples.get(offset).copied().unwrap_or(0);
            let g = samples.get(offset + 1).copied().unwrap_or(0);
            let b = samples.get(offset + 2).copied().unwrap_or(0);
            rgb_buffer.extend_from_slice(&[r, g, b]);
        }
    }

    let img = RgbImage::from_raw(width, height, rgb_buffer)
        .ok_or_else(|| RasterizeError::Encode("Failed to create image buffer".to_string()))?;

    let mut output = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut output), image::ImageFormat::Jpeg)
        .map_err(|e| RasterizeError::Encode(e.to_string()))?;

    Ok(output)
}
