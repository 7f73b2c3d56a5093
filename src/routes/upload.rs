//! Upload Routes
//!
//! Endpoints:
//! - POST /upload - Recognize uploaded passport images / PDFs and extract fields
//!
//! Files are sent as repeated multipart fields named `files`.

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    routing::post,
    Json, Router,
};

use crate::error::Result;
use crate::pipeline::{process_upload, Extraction};
use crate::state::AppState;
use crate::upload::{UploadError, UploadedFile, FILES_FIELD};

/// Create the upload router
pub fn router() -> Router<AppState> {
    Router::new().route("/upload", post(upload))
}

/// POST /upload
///
/// Responds with the recognized text and the parsed passport fields. A
/// request that is not a multipart form carries no files.
async fn upload(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<Extraction>> {
    let multipart = multipart.map_err(|rejection| {
        tracing::debug!(reason = %rejection.body_text(), "Upload is not a multipart form");
        UploadError::NoFiles
    })?;

    let files = read_files(multipart).await?;
    let extraction = process_upload(&state, files).await?;
    Ok(Json(extraction))
}

/// Collect every `files` field of the form, in order
async fn read_files(mut multipart: Multipart) -> std::result::Result<Vec<UploadedFile>, UploadError> {
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(multipart_error)?
    {
        let name = field.name().unwrap_or("").to_string();
        if name != FILES_FIELD {
            tracing::debug!(field = %name, "Ignoring multipart field");
            continue;
        }

        let filename = field.file_name().unwrap_or("").to_string();
        let data = field.bytes().await.map_err(multipart_error)?;

        tracing::debug!(file = %filename, bytes = data.len(), "Received file");
        files.push(UploadedFile::new(filename, data));
    }

    Ok(files)
}

/// Keep the status axum assigns, e.g. 413 when the body limit is hit
fn multipart_error(err: MultipartError) -> UploadError {
    UploadError::Multipart {
        status: err.status(),
        message: err.body_text(),
    }
}
