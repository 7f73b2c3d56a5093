//! Upload processing pipeline
//!
//! One request moves through
//! `RECEIVED → VALIDATED → INGESTED → RECOGNIZED → PARSED → RESPONDED`,
//! and may drop to `ERROR` from any stage before `RESPONDED`. The request's
//! [`ScratchSpace`](crate::upload::ScratchSpace) is held here and released on
//! every exit path, including a timeout.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::Instrument;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::passport::{parse_passport_text, PassportRecord};
use crate::state::AppState;
use crate::upload::{ScratchSpace, UploadBatch, UploadedFile};

/// Request processing stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Received,
    Validated,
    Ingested,
    Recognized,
    Parsed,
    Responded,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Received => "RECEIVED",
            Stage::Validated => "VALIDATED",
            Stage::Ingested => "INGESTED",
            Stage::Recognized => "RECOGNIZED",
            Stage::Parsed => "PARSED",
            Stage::Responded => "RESPONDED",
        };
        f.write_str(name)
    }
}

/// Successful extraction, returned as the upload response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extraction {
    /// Recognized text of all pages, joined with page breaks
    pub extracted_text: String,
    /// Fields parsed from `extracted_text`
    pub passport_data: PassportRecord,
}

/// Run one upload through the whole pipeline
pub async fn process_upload(state: &AppState, files: Vec<UploadedFile>) -> Result<Extraction> {
    let span = tracing::info_span!("upload", request_id = %Uuid::new_v4());

    async move {
        tracing::debug!(stage = %Stage::Received, files = files.len(), "Upload received");

        let batch = UploadBatch::new(files)?;
        tracing::debug!(
            stage = %Stage::Validated,
            files = batch.len(),
            pdfs = batch.pdf_count(),
            "Upload validated"
        );

        let mut scratch = state.ingestor().open_scratch()?;
        let work = extract(state, &batch, &mut scratch);

        let result = match state.config().server.request_timeout {
            Some(limit) => tokio::time::timeout(limit, work)
                .await
                .unwrap_or_else(|_| Err(AppError::Timeout(limit.as_secs()))),
            None => work.await,
        };

        // Scratch files go before the response is sent
        drop(scratch);

        match &result {
            Ok(extraction) => tracing::info!(
                stage = %Stage::Responded,
                chars = extraction.extracted_text.len(),
                passport_number = %extraction.passport_data.passport_number,
                "Upload processed"
            ),
            Err(e) => tracing::debug!(stage = "ERROR", error = %e, "Upload failed"),
        }

        result
    }
    .instrument(span)
    .await
}

async fn extract(
    state: &AppState,
    batch: &UploadBatch,
    scratch: &mut ScratchSpace,
) -> Result<Extraction> {
    let image_paths = state.ingestor().ingest(batch, scratch).await?;
    tracing::debug!(stage = %Stage::Ingested, images = image_paths.len(), "Batch ingested");

    let extracted_text = state.ocr().extract_text(&image_paths).await?;
    tracing::debug!(
        stage = %Stage::Recognized,
        chars = extracted_text.len(),
        engine = state.ocr().recognizer_name(),
        "Text recognized"
    );

    let passport_data = parse_passport_text(&extracted_text);
    tracing::debug!(stage = %Stage::Parsed, "Passport fields parsed");

    Ok(Extraction {
        extracted_text,
        passport_data,
    })
}
