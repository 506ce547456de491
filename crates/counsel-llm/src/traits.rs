use crate::streaming::CompletionEvent;
use crate::types::{ApiKey, Message};
use anyhow::Result;
use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

/// Lazy, single-pass sequence of completion events for one request.
pub type CompletionStream = Pin<Box<dyn Stream<Item = Result<CompletionEvent>> + Send>>;

/// Trait for streaming chat completions
///
/// One outbound connection per invocation; the stream ends when the remote
/// service closes it. Mid-stream failures surface as `Err` items.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn stream_completion(&self, request: CompletionRequest) -> Result<CompletionStream>;
}

#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub api_key: ApiKey,
}

impl CompletionRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Message>, api_key: ApiKey) -> Self {
        Self {
            model: model.into(),
            messages,
            api_key,
        }
    }
}
