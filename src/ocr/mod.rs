//! OCR Module
//!
//! Text recognition for uploaded page images.
//!
//! The recognition engine is an external collaborator hidden behind the
//! [`TextRecognizer`] capability trait. [`OcrService`] owns one long-lived
//! recognizer, serializes calls when the engine is not reentrant, and
//! aggregates the per-page text of a batch into one document.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use passport_ocr_server::ocr::{OcrService, OcrServiceConfig, TesseractRecognizer};
//!
//! let recognizer = Arc::new(TesseractRecognizer::new("tesseract", "hin+eng"));
//! let service = OcrService::new(recognizer, OcrServiceConfig::default());
//!
//! let text = service.extract_text(&image_paths).await?;
//! ```

mod provider;
mod service;
mod types;

pub use provider::{TesseractRecognizer, TextRecognizer};
pub use service::{join_pages, OcrService, OcrServiceConfig, DEFAULT_MAX_CONCURRENCY, PAGE_BREAK};
pub use types::OcrError;
