//! PDF text extraction via MuPDF
//!
//! The stext API reports text as blocks of lines, each line with a bounding
//! box. We flatten every page into positioned fragments, sort them top to
//! bottom then left to right, and join the results. This approximates
//! reading order for single-column layouts; multi-column or rotated text
//! will interleave.

use std::path::Path;

use mupdf::{Document, Page, TextPageOptions};
use thiserror::Error;

use crate::text::word_count;

use super::types::{ExtractionResult, PageResult};

/// Extraction backend name reported in results
pub const EXTRACTION_METHOD: &str = "mupdf";

#[derive(Error, Debug)]
pub enum PdfExtractError {
    #[error("document is password protected")]
    PasswordProtected,
    #[error("file path is not valid UTF-8")]
    NonUtf8Path,
    #[error("{0}")]
    Mupdf(#[from] mupdf::Error),
}

/// A positioned run of text, before reading-order reconstruction
#[derive(Debug, Clone)]
struct Fragment {
    x: f32,
    y: f32,
    text: String,
}

/// Extract plain text from a PDF file.
///
/// Never fails: parser errors, encrypted documents, and unreadable files
/// all surface as `success = false` with the error message attached.
pub fn extract(path: &Path) -> ExtractionResult {
    match try_extract(path) {
        Ok(result) => result,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "PDF extraction failed");
            ExtractionResult::failure(EXTRACTION_METHOD, e.to_string())
        }
    }
}

fn try_extract(path: &Path) -> Result<ExtractionResult, PdfExtractError> {
    let path_str = path.to_str().ok_or(PdfExtractError::NonUtf8Path)?;
    let doc = Document::open(path_str)?;

    if doc.needs_password()? {
        return Err(PdfExtractError::PasswordProtected);
    }

    let page_count = doc.page_count()? as usize;
    tracing::debug!(pages = page_count, "PDF opened");

    let mut pages = Vec::with_capacity(page_count);
    for index in 0..page_count {
        let page = doc.load_page(index as i32)?;
        let fragments = page_fragments(&page)?;
        let content = assemble_content(fragments);
        let word_count = word_count(&content);
        pages.push(PageResult {
            page: index + 1,
            content,
            word_count,
        });
    }

    Ok(build_result(pages, page_count))
}

/// Flatten a page's structured text into positioned fragments.
fn page_fragments(page: &Page) -> Result<Vec<Fragment>, mupdf::Error> {
    let text_page = page.to_text_page(TextPageOptions::empty())?;

    let mut fragments = Vec::new();
    for block in text_page.blocks() {
        for line in block.lines() {
            let bounds = line.bounds();
            let mut text = String::new();
            for ch in line.chars() {
                if let Some(c) = ch.char() {
                    text.push(c);
                }
            }
            fragments.push(Fragment {
                x: bounds.x0,
                y: bounds.y0,
                text,
            });
        }
    }
    Ok(fragments)
}

/// Sort fragments into reading order (ascending y, ties by ascending x)
/// and join the non-blank ones with single spaces.
fn assemble_content(mut fragments: Vec<Fragment>) -> String {
    fragments.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));

    let mut content = String::new();
    for fragment in &fragments {
        let trimmed = fragment.text.trim();
        if trimmed.is_empty() {
            continue;
        }
        if !content.is_empty() {
            content.push(' ');
        }
        content.push_str(trimmed);
    }
    content
}

fn build_result(pages: Vec<PageResult>, total_pages: usize) -> ExtractionResult {
    let mut full_text = String::new();
    for page in &pages {
        full_text.push_str(&format!("--- Page {} ---\n", page.page));
        full_text.push_str(&page.content);
        full_text.push_str("\n\n");
    }

    let total_word_count = pages.iter().map(|p| p.word_count).sum();

    ExtractionResult {
        success: true,
        text: full_text.trim().to_string(),
        pages,
        total_pages,
        total_word_count,
        method: EXTRACTION_METHOD.to_string(),
        error: None,
    }
}
