//! Upload route
//!
//! POST /upload takes a multipart `file` field, stages the bytes in a temp
//! file, runs PDF extraction, and returns the text with per-page word
//! counts. The temp file is removed on every exit path.

use std::path::{Path, PathBuf};

use axum::{
    extract::{Multipart, State},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::extract;
use crate::state::AppState;
use crate::text::char_prefix;

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(upload_pdf))
}

/// Successful upload response
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    success: bool,
    text: String,
    pages: usize,
    word_count: usize,
    extraction_method: String,
    text_preview: String,
    page_details: Vec<PageDetail>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PageDetail {
    page: usize,
    word_count: usize,
}

/// Uploaded file staged on disk; removed when dropped.
struct StagedUpload {
    path: PathBuf,
}

impl StagedUpload {
    fn write(dir: &Path, data: &[u8]) -> std::io::Result<Self> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(format!("upload_{}.pdf", Uuid::new_v4()));
        std::fs::write(&path, data)?;
        Ok(Self { path })
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StagedUpload {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to remove staged upload");
        }
    }
}

async fn upload_pdf(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let mut file = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidUpload(format!("Malformed multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let original_name = field.file_name().unwrap_or("upload.pdf").to_string();
            let mime_type = field.content_type().unwrap_or_default().to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::InvalidUpload(format!("Failed to read upload: {e}")))?;
            file = Some((original_name, mime_type, data));
            break;
        }
    }

    let (original_name, mime_type, data) =
        file.ok_or_else(|| AppError::InvalidUpload("No file uploaded".to_string()))?;

    if mime_type != "application/pdf" {
        return Err(AppError::InvalidUpload(
            "Only PDF files are allowed".to_string(),
        ));
    }

    tracing::info!(file = %original_name, bytes = data.len(), "processing upload");

    let staged = StagedUpload::write(&state.config().server.upload_dir, &data)?;

    // MuPDF parsing is blocking work; keep it off the async executor.
    let path = staged.path().to_path_buf();
    let result = tokio::task::spawn_blocking(move || extract::extract(&path))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    drop(staged);

    if !result.success {
        return Err(AppError::ExtractionFailure(
            result.error.unwrap_or_else(|| "unknown parser error".to_string()),
        ));
    }

    if result.text.trim().is_empty() {
        return Err(AppError::EmptyContent {
            message: "No text content found".to_string(),
            details: "The PDF appears to be image-based or contains no extractable text"
                .to_string(),
            suggestion: "Please upload a PDF with selectable text content".to_string(),
        });
    }

    tracing::info!(
        pages = result.total_pages,
        words = result.total_word_count,
        "extraction complete"
    );

    let preview_chars = state.config().limits.preview_chars;
    let preview = char_prefix(&result.text, preview_chars);
    let text_preview = if preview.len() < result.text.len() {
        format!("{preview}...")
    } else {
        preview.to_string()
    };

    Ok(Json(UploadResponse {
        success: true,
        pages: result.total_pages,
        word_count: result.total_word_count,
        extraction_method: result.method,
        text_preview,
        page_details: result
            .pages
            .iter()
            .map(|p| PageDetail {
                page: p.page,
                word_count: p.word_count,
            })
            .collect(),
        text: result.text,
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;

    use crate::ai::client::MockGenerator;
    use crate::config::Config;
    use crate::state::AppState;

    fn server_with_upload_dir(dir: std::path::PathBuf) -> TestServer {
        let state = AppState::new(
            Config::for_tests(dir),
            Arc::new(MockGenerator::new("unused")),
        );
        TestServer::new(crate::app(state)).unwrap()
    }

    #[tokio::test]
    async fn rejects_non_pdf_upload_and_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let server = server_with_upload_dir(dir.path().to_path_buf());

        let form = MultipartForm::new().add_part(
            "file",
            Part::bytes(b"plain text".to_vec())
                .file_name("notes.txt")
                .mime_type("text/plain"),
        );
        let response = server.post("/upload").multipart(form).await;

        response.assert_status_bad_request();
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], "Only PDF files are allowed");

        let leftover = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftover, 0);
    }

    #[tokio::test]
    async fn rejects_missing_file_field() {
        let dir = tempfile::tempdir().unwrap();
        let server = server_with_upload_dir(dir.path().to_path_buf());

        let form = MultipartForm::new().add_text("other", "value");
        let response = server.post("/upload").multipart(form).await;

        response.assert_status_bad_request();
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], "No file uploaded");
    }

    #[tokio::test]
    async fn corrupt_pdf_reports_extraction_failure_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let server = server_with_upload_dir(dir.path().to_path_buf());

        let form = MultipartForm::new().add_part(
            "file",
            Part::bytes(b"%PDF-not really a pdf".to_vec())
                .file_name("broken.pdf")
                .mime_type("application/pdf"),
        );
        let response = server.post("/upload").multipart(form).await;

        response.assert_status_bad_request();
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], "Failed to extract text from PDF");
        assert!(body["suggestion"].as_str().unwrap().contains("corrupted"));

        let leftover = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftover, 0);
    }
}
