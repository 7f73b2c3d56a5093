//! Passport OCR Server Library
//!
//! Accepts uploaded passport images or PDFs, recognizes their text with an
//! external OCR engine and extracts structured passport fields.
//!
//! # Modules
//!
//! - `passport`: Field extraction from recognized text (pure, engine-free)
//! - `ocr`: Text recognizer capability and page text aggregation
//! - `pdf`: PDF page rasterization
//! - `upload`: Batch validation, scratch storage and ingestion
//! - `pipeline`: Per-request processing state machine
//! - `routes`: HTTP surface

pub mod config;
pub mod error;
pub mod ocr;
pub mod passport;
pub mod pdf;
pub mod pipeline;
pub mod routes;
pub mod state;
pub mod upload;
