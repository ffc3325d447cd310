//! Error types for the Studydeck server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::ai::client::AiError;
use crate::ai::normalize::NormalizeError;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
///
/// Every failure mode on a request path maps to one of these variants;
/// all are recovered at the request boundary and rendered as JSON.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    InvalidUpload(String),

    #[error("Failed to extract text from PDF: {0}")]
    ExtractionFailure(String),

    #[error("{message}: {details}")]
    EmptyContent {
        message: String,
        details: String,
        suggestion: String,
    },

    #[error("AI response doesn't contain valid JSON")]
    MalformedResponse { raw: String },

    #[error("No valid questions and answers were generated")]
    NoValidItems,

    #[error("AI provider request failed: {0}")]
    UpstreamFailure(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<AiError> for AppError {
    fn from(e: AiError) -> Self {
        AppError::UpstreamFailure(e.to_string())
    }
}

impl From<NormalizeError> for AppError {
    fn from(e: NormalizeError) -> Self {
        match e {
            NormalizeError::Malformed { raw } => AppError::MalformedResponse { raw },
            NormalizeError::NoValidItems => AppError::NoValidItems,
        }
    }
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    suggestion: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details, suggestion) = match self {
            AppError::InvalidUpload(msg) => (StatusCode::BAD_REQUEST, msg, None, None),
            AppError::ExtractionFailure(details) => (
                StatusCode::BAD_REQUEST,
                "Failed to extract text from PDF".to_string(),
                Some(details),
                Some("The PDF might be corrupted, encrypted, or image-based".to_string()),
            ),
            AppError::EmptyContent {
                message,
                details,
                suggestion,
            } => (
                StatusCode::BAD_REQUEST,
                message,
                Some(details),
                Some(suggestion),
            ),
            AppError::MalformedResponse { raw } => {
                tracing::warn!(raw_length = raw.len(), "unparseable AI completion");
                tracing::debug!(raw = %raw, "raw AI completion");
                (
                    StatusCode::BAD_GATEWAY,
                    "AI response doesn't contain valid JSON format".to_string(),
                    Some("The model returned output that could not be parsed".to_string()),
                    Some("Please try again with a different PDF or check the text content".to_string()),
                )
            }
            AppError::NoValidItems => (
                StatusCode::BAD_GATEWAY,
                "No valid questions and answers were generated".to_string(),
                None,
                Some("Please try again with a different PDF or check the text content".to_string()),
            ),
            AppError::UpstreamFailure(details) => {
                tracing::error!("AI provider failure: {}", details);
                (
                    StatusCode::BAD_GATEWAY,
                    "AI provider request failed".to_string(),
                    Some(details),
                    None,
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                    None,
                    None,
                )
            }
            AppError::Io(e) => {
                tracing::error!("IO error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                    None,
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error,
            details,
            suggestion,
        });

        (status, body).into_response()
    }
}
