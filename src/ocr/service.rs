//! OCR Service
//!
//! Owns the process-wide recognizer and turns a batch of page images into one
//! recognized document.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::stream::{self, StreamExt, TryStreamExt};
use tokio::sync::Mutex;

use super::{provider::TextRecognizer, types::OcrError};

/// Separator inserted between the text of consecutive pages
pub const PAGE_BREAK: &str = "\n\n--- PAGE BREAK ---\n\n";

/// Recognition calls a single request may have in flight by default
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;

/// OCR service configuration
#[derive(Debug, Clone)]
pub struct OcrServiceConfig {
    /// Serialize recognition calls even when the engine is reentrant
    pub serialize: bool,
    /// Upper bound on concurrent recognition calls per batch
    pub max_concurrency: usize,
}

impl Default for OcrServiceConfig {
    fn default() -> Self {
        Self {
            serialize: false,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}

/// OCR service shared by all requests
pub struct OcrService {
    recognizer: Arc<dyn TextRecognizer>,
    /// Held around every recognition call when calls must not overlap
    gate: Option<Mutex<()>>,
    max_concurrency: usize,
}

impl OcrService {
    /// Create a new OCR service around a recognizer built once at startup
    pub fn new(recognizer: Arc<dyn TextRecognizer>, config: OcrServiceConfig) -> Self {
        let serialize = config.serialize || !recognizer.is_reentrant();
        if serialize {
            tracing::info!(engine = recognizer.name(), "Recognition calls will be serialized");
        }

        Self {
            recognizer,
            gate: serialize.then(|| Mutex::new(())),
            max_concurrency: config.max_concurrency.max(1),
        }
    }

    /// Name of the underlying engine
    pub fn recognizer_name(&self) -> &'static str {
        self.recognizer.name()
    }

    /// Whether recognition calls are serialized
    pub fn is_serialized(&self) -> bool {
        self.gate.is_some()
    }

    /// Check if the underlying engine can be used
    pub async fn is_available(&self) -> bool {
        self.recognizer.is_available().await
    }

    /// Recognize the text fragments of a single image
    pub async fn recognize(&self, image_path: &Path) -> Result<Vec<String>, OcrError> {
        let _guard = match &self.gate {
            Some(gate) => Some(gate.lock().await),
            None => None,
        };

        let fragments = self.recognizer.recognize(image_path).await?;

        tracing::debug!(
            image = %image_path.display(),
            fragments = fragments.len(),
            "Image recognized"
        );

        Ok(fragments)
    }

    /// Recognize every image and aggregate the result into one document.
    ///
    /// Page order follows `image_paths`. At most `max_concurrency` pages are
    /// recognized at once. The first failure aborts the batch and drops the
    /// calls still in flight.
    pub async fn extract_text(&self, image_paths: &[PathBuf]) -> Result<String, OcrError> {
        let calls: Vec<_> = image_paths.iter().map(|path| self.recognize(path)).collect();
        let pages: Vec<Vec<String>> = stream::iter(calls)
            .buffered(self.max_concurrency)
            .try_collect()
            .await?;
        Ok(join_pages(&pages))
    }
}

/// Join fragments with newlines and pages with [`PAGE_BREAK`].
pub fn join_pages(pages: &[Vec<String>]) -> String {
    pages
        .iter()
        .map(|fragments| fragments.join("\n"))
        .collect::<Vec<_>>()
        .join(PAGE_BREAK)
}
