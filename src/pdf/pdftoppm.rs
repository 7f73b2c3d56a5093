//! poppler `pdftoppm` rasterizer

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;

use super::rasterizer::PageRasterizer;
use super::types::RasterizeError;

/// Rasterizer backed by the `pdftoppm` binary from poppler-utils
pub struct PdftoppmRasterizer {
    binary: String,
}

impl PdftoppmRasterizer {
    pub fn new(binary: &str) -> Self {
        Self {
            binary: binary.to_string(),
        }
    }
}

impl Default for PdftoppmRasterizer {
    fn default() -> Self {
        Self::new("pdftoppm")
    }
}

#[async_trait]
impl PageRasterizer for PdftoppmRasterizer {
    fn name(&self) -> &'static str {
        "pdftoppm"
    }

    async fn is_available(&self) -> bool {
        // pdftoppm prints its version on stderr and exits 0
        Command::new(&self.binary)
            .arg("-v")
            .kill_on_drop(true)
            .output()
            .await
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    async fn rasterize(&self, pdf_path: &Path, dpi: u32) -> Result<Vec<Vec<u8>>, RasterizeError> {
        // Pages are rendered next to the PDF so they share its scratch lifetime
        let parent = pdf_path.parent().unwrap_or_else(|| Path::new("."));
        let work_dir = tempfile::Builder::new().prefix("pages-").tempdir_in(parent)?;
        let output_prefix = work_dir.path().join("page");

        let output = Command::new(&self.binary)
            .arg("-jpeg")
            .arg("-r")
            .arg(dpi.to_string())
            .arg(pdf_path)
            .arg(&output_prefix)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => RasterizeError::NotAvailable(format!(
                    "{} not found (install poppler-utils)",
                    self.binary
                )),
                _ => RasterizeError::Io(e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RasterizeError::Failed(stderr.trim().to_string()));
        }

        let mut pages: Vec<(u32, PathBuf)> = Vec::new();
        let mut entries = tokio::fs::read_dir(work_dir.path()).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if let Some(index) = page_index(&path) {
                pages.push((index, path));
            }
        }

        if pages.is_empty() {
            return Err(RasterizeError::NoPages);
        }
        pages.sort_by_key(|(index, _)| *index);

        let mut images = Vec::with_capacity(pages.len());
        for (_, path) in &pages {
            images.push(tokio::fs::read(path).await?);
        }

        tracing::debug!(
            pdf = %pdf_path.display(),
            pages = images.len(),
            dpi,
            "PDF rasterized"
        );

        Ok(images)
    }
}

/// Page number of a `pdftoppm` output file.
///
/// pdftoppm zero-pads the number to the width of the page count, so
/// `page-7.jpg`, `page-07.jpg` and `page-007.jpg` are all page 7.
fn page_index(path: &Path) -> Option<u32> {
    if path.extension().and_then(|ext| ext.to_str()) != Some("jpg") {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    let (_, number) = stem.rsplit_once('-')?;
    number.parse().ok()
}
