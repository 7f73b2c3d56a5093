//! Upload types

use axum::body::Bytes;
use axum::http::StatusCode;

// ============================================================================
// Constants
// ============================================================================

/// Accepted image extensions (lower case)
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Accepted PDF extension (lower case)
pub const PDF_EXTENSION: &str = "pdf";

/// Multipart field carrying the uploaded files
pub const FILES_FIELD: &str = "files";

// ============================================================================
// Files
// ============================================================================

/// What an uploaded file contributes to the batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// A single page image
    Image,
    /// A PDF expanded into page images
    Pdf,
}

impl FileKind {
    /// Classify a file name by extension, case-insensitively
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, ext) = filename.rsplit_once('.')?;
        let ext = ext.to_ascii_lowercase();

        if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            Some(Self::Image)
        } else if ext == PDF_EXTENSION {
            Some(Self::Pdf)
        } else {
            None
        }
    }
}

/// One file of an upload batch
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// File name as sent by the client
    pub filename: String,
    /// Raw file contents
    pub data: Bytes,
}

impl UploadedFile {
    pub fn new(filename: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            data: data.into(),
        }
    }
}

// ============================================================================
// Batch
// ============================================================================

/// A validated, non-empty, ordered set of uploaded files
#[derive(Debug, Clone)]
pub struct UploadBatch {
    files: Vec<(FileKind, UploadedFile)>,
}

impl UploadBatch {
    /// Validate a batch.
    ///
    /// Fails on an empty batch or on the first file whose extension is not
    /// accepted; no file of a rejected batch is processed.
    pub fn new(files: Vec<UploadedFile>) -> Result<Self, UploadError> {
        if files.is_empty() {
            return Err(UploadError::NoFiles);
        }

        let files = files
            .into_iter()
            .map(|file| match FileKind::from_filename(&file.filename) {
                Some(kind) => Ok((kind, file)),
                None => Err(UploadError::InvalidFileFormat(file.filename)),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { files })
    }

    /// Files in upload order
    pub fn files(&self) -> impl Iterator<Item = (FileKind, &UploadedFile)> {
        self.files.iter().map(|(kind, file)| (*kind, file))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Number of PDFs in the batch
    pub fn pdf_count(&self) -> usize {
        self.files.iter().filter(|(kind, _)| *kind == FileKind::Pdf).count()
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Upload validation errors
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("No files uploaded")]
    NoFiles,

    #[error("Invalid file format for {0}")]
    InvalidFileFormat(String),

    #[error("Failed to read upload: {message}")]
    Multipart { status: StatusCode, message: String },
}

impl UploadError {
    /// HTTP status for this rejection
    pub fn status_code(&self) -> StatusCode {
        match self {
            UploadError::Multipart { status, .. } => *status,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
