// OpenAI-specific client implementation

use crate::streaming::parse_chat_sse_stream;
use crate::traits::{CompletionClient, CompletionRequest, CompletionStream};
use crate::types::Message;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde_json::Value;

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// Decoding is pinned to the most probable continuation at each step, so
/// repeated submissions of the same question vary as little as possible.
const TEMPERATURE: f32 = 0.0;

/// OpenAI client (HTTP direct, no SDK)
///
/// Holds the connection pool only; the credential arrives with each request.
pub struct OpenAIClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl OpenAIClient {
    pub fn new() -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            base_url: OPENAI_API_BASE.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Build chat completion request payload
    fn build_payload(&self, model: &str, messages: &[Message]) -> Value {
        let chat_messages: Vec<Value> = messages.iter().map(convert_message).collect();

        serde_json::json!({
            "model": model,
            "messages": chat_messages,
            "temperature": TEMPERATURE,
            "stream": true,
        })
    }
}

fn convert_message(message: &Message) -> Value {
    serde_json::json!({
        "role": message.role(),
        "content": message.content(),
    })
}

#[async_trait]
impl CompletionClient for OpenAIClient {
    async fn stream_completion(&self, request: CompletionRequest) -> Result<CompletionStream> {
        anyhow::ensure!(!request.api_key.is_empty(), "API key must be non-empty");

        let payload = self.build_payload(&request.model, &request.messages);

        tracing::debug!(model = %request.model, "Opening completion stream");

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(request.api_key.expose())
            .json(&payload)
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("OpenAI API error ({}): {}", status, error_text);
        }

        Ok(parse_chat_sse_stream(response))
    }
}
