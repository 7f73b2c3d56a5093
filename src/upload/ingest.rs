//! Document ingestion
//!
//! Persists a validated batch to scratch storage as an ordered list of page
//! images.

use std::path::PathBuf;
use std::sync::Arc;

use crate::pdf::{PageRasterizer, RasterizeError};

use super::sanitize::secure_filename;
use super::scratch::ScratchSpace;
use super::types::{FileKind, UploadBatch, UploadedFile};

/// Ingestion error types
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Rasterization(#[from] RasterizeError),
}

/// Writes uploads to scratch storage and expands PDFs into page images
pub struct Ingestor {
    scratch_root: PathBuf,
    rasterizer: Arc<dyn PageRasterizer>,
    render_dpi: u32,
}

impl Ingestor {
    pub fn new(scratch_root: PathBuf, rasterizer: Arc<dyn PageRasterizer>, render_dpi: u32) -> Self {
        Self {
            scratch_root,
            rasterizer,
            render_dpi,
        }
    }

    /// Shared root under which request scratch spaces are created
    pub fn scratch_root(&self) -> &std::path::Path {
        &self.scratch_root
    }

    /// Name of the PDF rasterizer backend
    pub fn rasterizer_name(&self) -> &'static str {
        self.rasterizer.name()
    }

    /// Check if the PDF rasterizer can be used
    pub async fn rasterizer_available(&self) -> bool {
        self.rasterizer.is_available().await
    }

    /// Open a new scratch space for one request
    pub fn open_scratch(&self) -> std::io::Result<ScratchSpace> {
        ScratchSpace::create_in(&self.scratch_root)
    }

    /// Persist every file of `batch` into `scratch`.
    ///
    /// Returns image paths in upload order, with each PDF replaced by its
    /// pages in page order. On failure, whatever was written stays in
    /// `scratch` and goes away with it.
    pub async fn ingest(
        &self,
        batch: &UploadBatch,
        scratch: &mut ScratchSpace,
    ) -> Result<Vec<PathBuf>, IngestError> {
        let mut image_paths = Vec::with_capacity(batch.len());

        for (kind, file) in batch.files() {
            match kind {
                FileKind::Image => {
                    let path = self.persist(file, scratch).await?;
                    image_paths.push(path);
                }
                FileKind::Pdf => {
                    let pages = self.expand_pdf(file, scratch).await?;
                    image_paths.extend(pages);
                }
            }
        }

        tracing::debug!(
            files = batch.len(),
            images = image_paths.len(),
            "Batch ingested"
        );

        Ok(image_paths)
    }

    async fn persist(
        &self,
        file: &UploadedFile,
        scratch: &mut ScratchSpace,
    ) -> Result<PathBuf, IngestError> {
        let path = scratch.allocate(&secure_filename(&file.filename));
        tokio::fs::write(&path, &file.data).await?;
        Ok(path)
    }

    async fn expand_pdf(
        &self,
        file: &UploadedFile,
        scratch: &mut ScratchSpace,
    ) -> Result<Vec<PathBuf>, IngestError> {
        let pdf_path = self.persist(file, scratch).await?;

        let pages = self.rasterizer.rasterize(&pdf_path, self.render_dpi).await?;

        let mut page_paths = Vec::with_capacity(pages.len());
        for (index, page) in pages.iter().enumerate() {
            let path = scratch.allocate(&format!("{}.jpg", index));
            tokio::fs::write(&path, page).await?;
            page_paths.push(path);
        }

        // The PDF itself is not needed once its pages exist
        scratch.discard(&pdf_path).await?;

        tracing::info!(
            file = %file.filename,
            pages = page_paths.len(),
            rasterizer = self.rasterizer.name(),
            "PDF expanded into pages"
        );

        Ok(page_paths)
    }
}
