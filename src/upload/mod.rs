//! Upload Module
//!
//! Turns an uploaded batch into an ordered list of page images on scratch
//! storage:
//!
//! 1. Validate every file name against the extension whitelist
//! 2. Persist images under unique scratch names
//! 3. Expand PDFs into one JPEG per page, dropping the PDF afterwards
//!
//! All scratch files live in a per-request [`ScratchSpace`] which removes
//! them when it is dropped, whatever the outcome of the request.

pub mod ingest;
pub mod sanitize;
pub mod scratch;
pub mod types;

pub use ingest::{IngestError, Ingestor};
pub use sanitize::secure_filename;
pub use scratch::ScratchSpace;
pub use types::*;
