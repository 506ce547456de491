//! The per-submission answer pipeline: validate, build the prompt, resolve
//! the credential, stream deltas, accumulate.

use counsel_llm::{CompletionEvent, CompletionRequest};
use futures::{Stream, StreamExt};
use serde::Serialize;
use std::pin::Pin;

use crate::{error::ApiError, secrets, state::AppState};

/// Events of one answer, detached from the request that spawned them.
pub type AnswerStream = Pin<Box<dyn Stream<Item = AnswerEvent> + Send>>;

/// One event of a streamed answer, as delivered to the page.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnswerEvent {
    Delta { text: String },
    Done,
    Failed { message: String },
}

/// Answer text for one submission, grown in arrival order.
///
/// Scoped to a single request; dropped when the stream ends either way.
#[derive(Debug, Default)]
pub struct StreamedAnswer {
    text: String,
}

impl StreamedAnswer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, delta: &str) {
        self.text.push_str(delta);
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Run the pipeline for one submission.
///
/// Validation, prompt assembly, and credential resolution happen before the
/// completion stream opens; a failure in any of them aborts the request
/// without a network call. Once streaming, a failure ends the stream with a
/// single `Failed` event and deltas already emitted stand.
pub async fn answer_stream(
    state: &AppState,
    persona: &str,
    question: &str,
) -> Result<AnswerStream, ApiError> {
    if question.trim().is_empty() {
        return Err(ApiError::EmptyInput);
    }

    let messages = counsel_prompt::build_messages(&state.catalog, persona, question)?;
    let api_key = secrets::resolve_api_key(&state.config.secrets.store_path)?;

    let request = CompletionRequest::new(state.config.llm.model.clone(), messages, api_key);

    let mut completion = state
        .llm
        .stream_completion(request)
        .await
        .map_err(ApiError::Completion)?;

    Ok(Box::pin(async_stream::stream! {
        let mut answer = StreamedAnswer::new();
        let mut finished = false;

        while let Some(event) = completion.next().await {
            match event {
                Ok(CompletionEvent::Delta { text }) => {
                    answer.push(&text);
                    yield AnswerEvent::Delta { text };
                }
                Ok(CompletionEvent::Done { .. }) => {
                    tracing::debug!(chars = answer.len(), "Completion stream finished");
                    finished = true;
                    yield AnswerEvent::Done;
                    break;
                }
                Err(e) => {
                    tracing::error!("Completion stream failed: {:#}", e);
                    finished = true;
                    yield AnswerEvent::Failed {
                        message: format!("Completion failed: {}", e),
                    };
                    break;
                }
            }
        }

        // Remote closed without a terminal chunk
        if !finished {
            yield AnswerEvent::Done;
        }
    }))
}
