//! HTTP tests for the upload endpoint, using stub OCR collaborators

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use serde_json::Value;
use tempfile::TempDir;

use passport_ocr_server::config::Config;
use passport_ocr_server::ocr::{OcrError, TextRecognizer};
use passport_ocr_server::pdf::{PageRasterizer, RasterizeError};
use passport_ocr_server::routes;
use passport_ocr_server::state::AppState;

/// Treats each image's bytes as its recognized text; `FAIL` bytes are unreadable
struct EchoRecognizer;

#[async_trait]
impl TextRecognizer for EchoRecognizer {
    fn name(&self) -> &'static str {
        "echo"
    }

    async fn is_available(&self) -> bool {
        true
    }

    async fn recognize(&self, image_path: &Path) -> Result<Vec<String>, OcrError> {
        let bytes = tokio::fs::read(image_path)
            .await
            .map_err(|e| OcrError::ProcessingError(e.to_string()))?;
        if bytes == b"FAIL" {
            return Err(OcrError::ProcessingError("cannot identify image file".to_string()));
        }
        Ok(String::from_utf8_lossy(&bytes).lines().map(String::from).collect())
    }
}

/// Splits the PDF bytes on form feeds into pages; `CORRUPT` fails
struct FormFeedRasterizer;

#[async_trait]
impl PageRasterizer for FormFeedRasterizer {
    fn name(&self) -> &'static str {
        "form-feed"
    }

    async fn is_available(&self) -> bool {
        true
    }

    async fn rasterize(&self, pdf_path: &Path, _dpi: u32) -> Result<Vec<Vec<u8>>, RasterizeError> {
        let bytes = tokio::fs::read(pdf_path).await?;
        if bytes == b"CORRUPT" {
            return Err(RasterizeError::Failed("Syntax Error: Couldn't find trailer dictionary".to_string()));
        }
        Ok(bytes.split(|b| *b == 0x0c).map(<[u8]>::to_vec).collect())
    }
}

fn server(scratch: &TempDir) -> TestServer {
    server_with(scratch, Config::default())
}

fn server_with(scratch: &TempDir, mut config: Config) -> TestServer {
    config.ingest.scratch_dir = scratch.path().to_path_buf();

    let state = AppState::new(config, Arc::new(EchoRecognizer), Arc::new(FormFeedRasterizer));
    TestServer::new(routes::router(state)).unwrap()
}

fn file(name: &str, contents: &[u8]) -> Part {
    Part::bytes(contents.to_vec()).file_name(name.to_string())
}

fn assert_scratch_empty(scratch: &TempDir) {
    let leftovers: Vec<_> = std::fs::read_dir(scratch.path()).unwrap().collect();
    assert!(leftovers.is_empty(), "scratch files left behind: {:?}", leftovers);
}

const FRONT_PAGE: &[u8] = b"REPUBLIC OF INDIA\nSex M\nDate of Birth 14/08/1990\n\
Place of Birth: JAIPUR\nDate of Issue 01/02/2016\nDate of Expiry 31/01/2026";

const BACK_PAGE: &[u8] = b"File Number: JP4061234567816\n\
P<INDSHARMA<<PRIYA<<<<<<<<<<<<<<<<<<<<<<<<<<<\nK1234567<2IND9008141F2601312<<<<<<<<<<<<<<04";

#[tokio::test]
async fn test_upload_images_extracts_fields() {
    let scratch = TempDir::new().unwrap();
    let server = server(&scratch);

    let form = MultipartForm::new()
        .add_part("files", file("front.png", FRONT_PAGE))
        .add_part("files", file("back.JPG", BACK_PAGE));

    let response = server.post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();

    let text = body["extracted_text"].as_str().unwrap();
    assert!(text.starts_with("REPUBLIC OF INDIA\nSex M"));
    assert!(text.contains("31/01/2026\n\n--- PAGE BREAK ---\n\nFile Number: JP4061234567816"));

    let data = &body["passport_data"];
    assert_eq!(data.as_object().unwrap().len(), 11);
    assert_eq!(data["surname"], "SHARMA");
    assert_eq!(data["givenName"], "PRIYA");
    assert_eq!(data["nationality"], "INDIAN");
    assert_eq!(data["sex"], "M");
    assert_eq!(data["dob"], "14/08/1990");
    assert_eq!(data["dateOfIssue"], "01/02/2016");
    assert_eq!(data["dateOfExpiry"], "31/01/2026");
    assert_eq!(data["fileNumber"], "JP4061234567816");
    assert_eq!(data["placeOfBirth"], "JAIPUR DATE OF ISSUE");
    assert_eq!(data["placeOfIssue"], data["placeOfBirth"]);
    assert_eq!(data["passportNumber"], "SHARMAPR");

    assert_scratch_empty(&scratch);
}

#[tokio::test]
async fn test_upload_pdf_pages_in_order() {
    let scratch = TempDir::new().unwrap();
    let server = server(&scratch);

    let form = MultipartForm::new()
        .add_part("files", file("cover.jpeg", b"COVER"))
        .add_part("files", file("passport.PDF", b"PAGE 1\x0cPAGE 2"));

    let response = server.post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(
        body["extracted_text"],
        "COVER\n\n--- PAGE BREAK ---\n\nPAGE 1\n\n--- PAGE BREAK ---\n\nPAGE 2"
    );
    assert_eq!(body["passport_data"]["passportNumber"], "");

    assert_scratch_empty(&scratch);
}

#[tokio::test]
async fn test_disallowed_extension_rejects_batch() {
    let scratch = TempDir::new().unwrap();
    let server = server(&scratch);

    let form = MultipartForm::new()
        .add_part("files", file("front.png", FRONT_PAGE))
        .add_part("files", file("notes.txt", b"hello"));

    let response = server.post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "Invalid file format for notes.txt");

    assert_scratch_empty(&scratch);
}

#[tokio::test]
async fn test_no_files_rejected() {
    let scratch = TempDir::new().unwrap();
    let server = server(&scratch);

    let form = MultipartForm::new().add_text("comment", "forgot the files");

    let response = server.post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "No files uploaded");
}

#[tokio::test]
async fn test_recognition_failure_is_server_error() {
    let scratch = TempDir::new().unwrap();
    let server = server(&scratch);

    let form = MultipartForm::new()
        .add_part("files", file("front.png", FRONT_PAGE))
        .add_part("files", file("broken.png", b"FAIL"));

    let response = server.post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["error"], "OCR processing failed: cannot identify image file");

    assert_scratch_empty(&scratch);
}

#[tokio::test]
async fn test_rasterization_failure_is_server_error() {
    let scratch = TempDir::new().unwrap();
    let server = server(&scratch);

    let form = MultipartForm::new()
        .add_part("files", file("front.png", FRONT_PAGE))
        .add_part("files", file("scan.pdf", b"CORRUPT"));

    let response = server.post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(
        body["error"],
        "Failed to rasterize PDF: Syntax Error: Couldn't find trailer dictionary"
    );

    assert_scratch_empty(&scratch);
}

#[tokio::test]
async fn test_non_multipart_body_is_json_no_files() {
    let scratch = TempDir::new().unwrap();
    let server = server(&scratch);

    let response = server.post("/upload").await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "No files uploaded");
}

#[tokio::test]
async fn test_body_over_limit_is_payload_too_large() {
    let scratch = TempDir::new().unwrap();
    let mut config = Config::default();
    config.server.max_upload_bytes = 1024;
    let server = server_with(&scratch, config);

    let form = MultipartForm::new().add_part("files", file("huge.png", &vec![b'x'; 64 * 1024]));

    let response = server.post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().starts_with("Failed to read upload"));

    assert_scratch_empty(&scratch);
}
