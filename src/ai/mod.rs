//! AI provider integration
//!
//! - `client`: the provider trait and the Gemini implementation
//! - `prompt`: templates that embed document text into instructions
//! - `normalize`: turns unreliable completions into validated structures

pub mod client;
pub mod normalize;
pub mod prompt;
