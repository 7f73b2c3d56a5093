//! Application state management

use std::sync::Arc;

use crate::config::{Config, ConfigError};
use crate::ocr::{OcrService, OcrServiceConfig, TesseractRecognizer, TextRecognizer};
use crate::pdf::{PageRasterizer, PdftoppmRasterizer};
use crate::upload::Ingestor;

/// Shared application state
///
/// The recognizer and rasterizer are constructed once at startup and shared
/// read-only by every request.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    ocr: OcrService,
    ingestor: Ingestor,
}

impl AppState {
    /// Create application state around injected collaborators
    pub fn new(
        config: Config,
        recognizer: Arc<dyn TextRecognizer>,
        rasterizer: Arc<dyn PageRasterizer>,
    ) -> Self {
        let ocr = OcrService::new(
            recognizer,
            OcrServiceConfig {
                serialize: config.ocr.serialize,
                max_concurrency: config.ocr.max_concurrency,
            },
        );
        let ingestor = Ingestor::new(
            config.ingest.scratch_dir.clone(),
            rasterizer,
            config.ingest.render_dpi,
        );

        Self {
            inner: Arc::new(AppStateInner {
                config,
                ocr,
                ingestor,
            }),
        }
    }

    /// Create application state with the engines selected by `config`
    pub fn from_config(config: Config) -> Result<Self, ConfigError> {
        config.ingest.validate()?;

        let recognizer = Arc::new(TesseractRecognizer::new(
            &config.ocr.tesseract_path,
            &config.ocr.tesseract_languages(),
        ));

        let rasterizer: Arc<dyn PageRasterizer> = match config.ingest.rasterizer {
            #[cfg(feature = "pdf-mupdf")]
            crate::pdf::RasterizerKind::Mupdf => Arc::new(crate::pdf::MupdfRasterizer::new()),
            // Without the feature, validate() has already rejected Mupdf
            _ => Arc::new(PdftoppmRasterizer::new(&config.ingest.pdftoppm_path)),
        };

        Ok(Self::new(config, recognizer, rasterizer))
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the OCR service
    pub fn ocr(&self) -> &OcrService {
        &self.inner.ocr
    }

    /// Get the document ingestor
    pub fn ingestor(&self) -> &Ingestor {
        &self.inner.ingestor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::RasterizerKind;

    #[test]
    fn test_default_config_uses_tesseract_and_pdftoppm() {
        let state = AppState::from_config(Config::default()).unwrap();

        assert_eq!(state.ocr().recognizer_name(), "tesseract");
        assert_eq!(state.ingestor().rasterizer_name(), "pdftoppm");
    }

    #[cfg(not(feature = "pdf-mupdf"))]
    #[test]
    fn test_mupdf_rejected_without_feature() {
        let mut config = Config::default();
        config.ingest.rasterizer = RasterizerKind::Mupdf;

        let err = AppState::from_config(config).err().unwrap();
        assert_eq!(
            err.to_string(),
            "Invalid value for PDF_RASTERIZER: built without the pdf-mupdf feature"
        );
    }
}
