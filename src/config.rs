//! Configuration management for the Passport OCR server
//!
//! Everything is read once at startup from the environment (and `.env`);
//! nothing is reconfigurable at runtime.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::ocr::DEFAULT_MAX_CONCURRENCY;
use crate::pdf::{RasterizerKind, DEFAULT_RENDER_DPI};

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub ocr: OcrConfig,
    pub ingest: IngestConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Multipart body limit in bytes
    pub max_upload_bytes: usize,
    /// Per-request processing timeout, `None` to disable
    pub request_timeout: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct OcrConfig {
    /// Recognition languages (Tesseract codes)
    pub languages: Vec<String>,
    pub tesseract_path: String,
    /// Serialize recognition calls across requests
    pub serialize: bool,
    /// Pages of one request recognized at the same time
    pub max_concurrency: usize,
}

#[derive(Debug, Clone)]
pub struct IngestConfig {
    pub scratch_dir: PathBuf,
    pub rasterizer: RasterizerKind,
    pub pdftoppm_path: String,
    pub render_dpi: u32,
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl ConfigError {
    fn mupdf_not_built() -> Self {
        ConfigError::Invalid {
            key: "PDF_RASTERIZER",
            reason: "built without the pdf-mupdf feature".to_string(),
        }
    }
}

impl IngestConfig {
    /// Reject a rasterizer this build cannot provide
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rasterizer == RasterizerKind::Mupdf && !cfg!(feature = "pdf-mupdf") {
            return Err(ConfigError::mupdf_not_built());
        }
        Ok(())
    }
}

impl OcrConfig {
    /// Languages in Tesseract's `-l` syntax, e.g. `hin+eng`
    pub fn tesseract_languages(&self) -> String {
        self.languages.join("+")
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
                max_upload_bytes: 50 * 1024 * 1024,
                request_timeout: Some(Duration::from_secs(120)),
            },
            ocr: OcrConfig {
                languages: vec!["hin".to_string(), "eng".to_string()],
                tesseract_path: "tesseract".to_string(),
                serialize: false,
                max_concurrency: DEFAULT_MAX_CONCURRENCY,
            },
            ingest: IngestConfig {
                scratch_dir: env::temp_dir(),
                rasterizer: RasterizerKind::Pdftoppm,
                pdftoppm_path: "pdftoppm".to_string(),
                render_dpi: DEFAULT_RENDER_DPI,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Config::default();

        let rasterizer = match env::var("PDF_RASTERIZER") {
            Ok(value) => value.parse().map_err(|reason| ConfigError::Invalid {
                key: "PDF_RASTERIZER",
                reason,
            })?,
            Err(_) => defaults.ingest.rasterizer,
        };

        let languages = env::var("OCR_LANGUAGES")
            .map(|value| parse_languages(&value))
            .ok()
            .filter(|languages| !languages.is_empty())
            .unwrap_or(defaults.ocr.languages);

        let request_timeout = match parse_or("REQUEST_TIMEOUT_SECS", 120u64) {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };

        let config = Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or(defaults.server.host),
                port: parse_or("SERVER_PORT", defaults.server.port),
                max_upload_bytes: parse_or("MAX_UPLOAD_BYTES", defaults.server.max_upload_bytes),
                request_timeout,
            },
            ocr: OcrConfig {
                languages,
                tesseract_path: env::var("TESSERACT_PATH").unwrap_or(defaults.ocr.tesseract_path),
                serialize: parse_or("OCR_SERIALIZE", defaults.ocr.serialize),
                max_concurrency: parse_or("OCR_MAX_CONCURRENCY", defaults.ocr.max_concurrency),
            },
            ingest: IngestConfig {
                scratch_dir: env::var("SCRATCH_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.ingest.scratch_dir),
                rasterizer,
                pdftoppm_path: env::var("PDFTOPPM_PATH").unwrap_or(defaults.ingest.pdftoppm_path),
                render_dpi: parse_or("PDF_RENDER_DPI", defaults.ingest.render_dpi),
            },
        };

        config.ingest.validate()?;
        Ok(config)
    }
}

/// Parse an environment variable, falling back to `default` when unset or invalid
fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

/// Split a `hin,eng` / `hin+eng` language list
fn parse_languages(value: &str) -> Vec<String> {
    value
        .split([',', '+'])
        .map(str::trim)
        .filter(|lang| !lang.is_empty())
        .map(String::from)
        .collect()
}
