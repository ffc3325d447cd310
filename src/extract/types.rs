//! Extraction result types

use serde::Serialize;

/// Text extracted from a single page
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PageResult {
    /// 1-based page number
    pub page: usize,
    /// Page text in reading order
    pub content: String,
    /// Whitespace-delimited non-empty token count of `content`
    pub word_count: usize,
}

/// Outcome of extracting a whole document
///
/// Extraction never returns an `Err`; failures are carried in the
/// `success = false` branch so callers see a single shape.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    pub success: bool,
    pub text: String,
    pub pages: Vec<PageResult>,
    pub total_pages: usize,
    pub total_word_count: usize,
    /// Name of the extraction backend
    pub method: String,
    pub error: Option<String>,
}

impl ExtractionResult {
    pub fn failure(method: &str, error: String) -> Self {
        Self {
            success: false,
            text: String::new(),
            pages: Vec::new(),
            total_pages: 0,
            total_word_count: 0,
            method: method.to_string(),
            error: Some(error),
        }
    }
}
