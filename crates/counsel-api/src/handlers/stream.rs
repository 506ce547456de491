use axum::{
    extract::State,
    response::sse::{Event, Sse},
    Json,
};
use futures::stream::{Stream, StreamExt};
use serde::Deserialize;
use std::convert::Infallible;
use std::sync::Arc;

use crate::{
    answer::{answer_stream, AnswerEvent},
    error::ApiResult,
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub persona: String,
    pub question: String,
}

/// Answer one submission, streaming the reply using Server-Sent Events
pub async fn ask_stream(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AskRequest>,
) -> ApiResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    tracing::info!(persona = %req.persona, "Answer requested");

    let events = answer_stream(&state, &req.persona, &req.question).await?;

    let sse_stream = events.map(|event| {
        let name = match &event {
            AnswerEvent::Delta { .. } => "delta",
            AnswerEvent::Done => "done",
            AnswerEvent::Failed { .. } => "error",
        };

        let sse_event = Event::default()
            .event(name)
            .json_data(&event)
            .unwrap_or_else(|_| Event::default().event("error").data("event serialization failed"));

        Ok::<Event, Infallible>(sse_event)
    });

    Ok(Sse::new(sse_stream))
}
