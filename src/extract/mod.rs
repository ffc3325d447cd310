//! PDF text extraction
//!
//! Turns a PDF file into plain text with per-page word counts. Positioned
//! text lines are sorted into reading order before being joined.

pub mod pdf;
pub mod types;

pub use pdf::extract;
pub use types::{ExtractionResult, PageResult};
