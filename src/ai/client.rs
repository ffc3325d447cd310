//! AI provider client
//!
//! Defines the generator trait and the Gemini REST implementation.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::AiConfig;

/// Errors from the AI provider boundary
#[derive(Error, Debug)]
pub enum AiError {
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),
    #[error("failed to reach AI provider: {0}")]
    Transport(String),
    #[error("AI provider returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("AI provider returned no completion text")]
    NoCompletion,
}

/// Text generation provider trait
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Identifier of the model answering `generate` calls
    fn model(&self) -> &str;

    /// Produce a completion for the given prompt
    async fn generate(&self, prompt: &str) -> Result<String, AiError>;
}

/// Gemini provider over the Generative Language REST API
pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    /// Build a client from configuration.
    ///
    /// The model id and request timeout are fixed at construction; there is
    /// no process-global model state.
    pub fn new(config: &AiConfig) -> Result<Self, AiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| AiError::ClientBuild(e.to_string()))?;

        Ok(Self {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String, AiError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint, self.model
        );

        let request = serde_json::json!({
            "contents": [{"parts": [{"text": prompt}]}],
            "generationConfig": {
                "temperature": 0.3,
                "maxOutputTokens": 1024,
                "topP": 0.7,
                "topK": 30
            }
        });

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AiError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Api { status, body });
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AiError::Transport(e.to_string()))?;

        let text = body["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or(AiError::NoCompletion)?;

        Ok(text.to_string())
    }
}

/// Mock generator for tests: returns a canned completion and records calls.
#[cfg(test)]
pub struct MockGenerator {
    pub completion: String,
    pub calls: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl MockGenerator {
    pub fn new(completion: &str) -> Self {
        Self {
            completion: completion.to_string(),
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
#[async_trait]
impl TextGenerator for MockGenerator {
    fn model(&self) -> &str {
        "mock-model"
    }

    async fn generate(&self, _prompt: &str) -> Result<String, AiError> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Ok(self.completion.clone())
    }
}
