//! Generation routes
//!
//! POST /ai/generate-qa and POST /ai/generate-mindmap take document text,
//! gate on a minimum word count, call the AI provider, and normalize the
//! completion into structured results.

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use crate::ai::normalize::{normalize_mindmap, normalize_qa, MindmapNode, QaItem};
use crate::ai::prompt::{mindmap_prompt, qa_prompt};
use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::text::word_count;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/generate-qa", post(generate_qa))
        .route("/generate-mindmap", post(generate_mindmap))
}

#[derive(Deserialize)]
pub struct GenerateRequest {
    pub text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QaResponse {
    success: bool,
    qa: Vec<QaItem>,
    total_generated: usize,
    model_used: String,
    word_count: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MindmapResponse {
    success: bool,
    mindmap: MindmapNode,
    model_used: String,
    word_count: usize,
}

/// Validate the input text and return its word count.
///
/// The provider is never called for documents below the configured minimum.
fn check_word_gate(text: &str, min_words: usize, purpose: &str) -> Result<usize> {
    let words = word_count(text);
    if words < min_words {
        return Err(AppError::EmptyContent {
            message: "Insufficient text content".to_string(),
            details: format!("Only {words} words found. Need more content for {purpose}."),
            suggestion: "Please upload a PDF with more text content".to_string(),
        });
    }
    Ok(words)
}

async fn generate_qa(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<QaResponse>> {
    let words = check_word_gate(
        &request.text,
        state.config().limits.min_generation_words,
        "Q&A generation",
    )?;

    tracing::info!(words, "generating Q&A");

    let prompt = qa_prompt(&request.text);
    let completion = state.generator().generate(&prompt).await?;
    let qa = normalize_qa(&completion)?;

    tracing::info!(count = qa.len(), "Q&A generation complete");

    Ok(Json(QaResponse {
        success: true,
        total_generated: qa.len(),
        qa,
        model_used: state.generator().model().to_string(),
        word_count: words,
    }))
}

async fn generate_mindmap(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<MindmapResponse>> {
    let words = check_word_gate(
        &request.text,
        state.config().limits.min_generation_words,
        "mind map generation",
    )?;

    tracing::info!(words, "generating mind map");

    let prompt = mindmap_prompt(&request.text, state.config().limits.mindmap_input_chars);
    let completion = state.generator().generate(&prompt).await?;
    let mindmap = normalize_mindmap(&completion)?;

    tracing::info!(topics = mindmap.children.len(), "mind map generation complete");

    Ok(Json(MindmapResponse {
        success: true,
        mindmap,
        model_used: state.generator().model().to_string(),
        word_count: words,
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum_test::TestServer;
    use serde_json::json;

    use crate::ai::client::MockGenerator;
    use crate::config::Config;
    use crate::state::AppState;

    const LONG_TEXT: &str = "the quick brown fox jumps over the lazy dog \
        and keeps running through fields of study material for a long while \
        until enough words have accumulated for generation";

    fn server_with(generator: Arc<MockGenerator>) -> TestServer {
        let dir = std::env::temp_dir();
        let state = AppState::new(Config::for_tests(dir), generator);
        TestServer::new(crate::app(state)).unwrap()
    }

    #[tokio::test]
    async fn short_text_is_rejected_without_calling_provider() {
        let generator = Arc::new(MockGenerator::new("[]"));
        let server = server_with(generator.clone());

        let response = server
            .post("/ai/generate-qa")
            .json(&json!({"text": "too few words here"}))
            .await;

        response.assert_status_bad_request();
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], "Insufficient text content");
        assert!(body["details"].as_str().unwrap().contains("4 words"));
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn generates_qa_from_fenced_completion() {
        let completion = "```json\n[{\"question\":\"What is the main topic discussed?\",\"answer\":\"A running fox\"}]\n```";
        let generator = Arc::new(MockGenerator::new(completion));
        let server = server_with(generator.clone());

        let response = server
            .post("/ai/generate-qa")
            .json(&json!({ "text": LONG_TEXT }))
            .await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["totalGenerated"], 1);
        assert_eq!(body["qa"][0]["question"], "What is the main topic discussed?");
        assert_eq!(body["modelUsed"], "mock-model");
        assert_eq!(generator.call_count(), 1);
    }

    #[tokio::test]
    async fn garbage_completion_maps_to_bad_gateway() {
        let generator = Arc::new(MockGenerator::new("sorry, no can do"));
        let server = server_with(generator);

        let response = server
            .post("/ai/generate-qa")
            .json(&json!({ "text": LONG_TEXT }))
            .await;

        response.assert_status(axum::http::StatusCode::BAD_GATEWAY);
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], "AI response doesn't contain valid JSON format");
    }

    #[tokio::test]
    async fn generates_mindmap_with_repaired_root() {
        let generator = Arc::new(MockGenerator::new(r#"{"children":[{"title":"A"}]}"#));
        let server = server_with(generator);

        let response = server
            .post("/ai/generate-mindmap")
            .json(&json!({ "text": LONG_TEXT }))
            .await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["mindmap"]["title"], "Document Overview");
        assert_eq!(body["mindmap"]["children"][0]["title"], "A");
    }

    #[tokio::test]
    async fn mindmap_word_gate_matches_qa_gate() {
        let generator = Arc::new(MockGenerator::new("{}"));
        let server = server_with(generator.clone());

        let response = server
            .post("/ai/generate-mindmap")
            .json(&json!({"text": ""}))
            .await;

        response.assert_status_bad_request();
        assert_eq!(generator.call_count(), 0);
    }
}
