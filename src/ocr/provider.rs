//! OCR Providers
//!
//! Defines the recognizer capability and the Tesseract implementation.

use std::io::ErrorKind;
use std::path::Path;

use async_trait::async_trait;
use tokio::process::Command;

use super::types::OcrError;

/// Text recognition capability
///
/// Given an image file, produce the recognized text fragments in the
/// engine's reading order. No geometry or correctness is guaranteed.
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    /// Short engine name for logs and health output
    fn name(&self) -> &'static str;

    /// Whether concurrent `recognize` calls are safe.
    ///
    /// Engines returning `false` are serialized by the OCR service.
    fn is_reentrant(&self) -> bool {
        true
    }

    /// Check if the engine can be used
    async fn is_available(&self) -> bool;

    /// Recognize the text fragments of one image
    async fn recognize(&self, image_path: &Path) -> Result<Vec<String>, OcrError>;
}

/// Tesseract OCR provider
///
/// Runs the `tesseract` binary once per image. Every call is a separate
/// process, so the provider is reentrant.
pub struct TesseractRecognizer {
    /// Binary name or path
    binary: String,
    /// Language list in Tesseract syntax, e.g. `hin+eng`
    languages: String,
}

impl TesseractRecognizer {
    pub fn new(binary: &str, languages: &str) -> Self {
        Self {
            binary: binary.to_string(),
            languages: languages.to_string(),
        }
    }
}

#[async_trait]
impl TextRecognizer for TesseractRecognizer {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    async fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("--version")
            .kill_on_drop(true)
            .output()
            .await
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    async fn recognize(&self, image_path: &Path) -> Result<Vec<String>, OcrError> {
        let output = Command::new(&self.binary)
            .arg(image_path)
            .arg("stdout")
            .arg("-l")
            .arg(&self.languages)
            .arg("--oem")
            .arg("3")
            .arg("--psm")
            .arg("3")
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => OcrError::ProviderNotAvailable(format!(
                    "{} not found (install tesseract-ocr)",
                    self.binary
                )),
                _ => OcrError::ProcessingError(format!("Failed to run tesseract: {}", e)),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::UnreadableImage {
                path: image_path.display().to_string(),
                reason: stderr.trim().to_string(),
            });
        }

        Ok(fragments(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Split engine output into non-empty trimmed lines
fn fragments(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}
