//! `/api/chat` handler and its wire types

use aigen::{AiContext, GenerationStream, Prompt, RequestOptions, StreamEvent};
use axum::{
    body::Body,
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use bytes::Bytes;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Temperature used when the request does not carry one
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Body of `POST /api/chat`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// Text or conversation to answer
    #[serde(default)]
    pub prompt: Option<Prompt>,
    /// Stream the answer as newline-delimited JSON
    #[serde(default)]
    pub stream: bool,
    /// Optional system instructions
    #[serde(default)]
    pub system_message: Option<String>,
    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

/// One line of a streamed answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatLine {
    /// Terminal failure
    Error {
        /// Failure description
        error: String,
        /// Always true
        done: bool,
    },
    /// Text increment, or the final `done` line
    Chunk {
        /// Generated text
        chunk: String,
        /// Whether this is the last line
        done: bool,
    },
}

impl From<StreamEvent> for ChatLine {
    fn from(event: StreamEvent) -> Self {
        match event.error {
            Some(error) => ChatLine::Error { error, done: true },
            None => ChatLine::Chunk {
                chunk: event.text,
                done: event.done,
            },
        }
    }
}

/// Build the axum router with `/api/chat` and `/health`.
pub fn router(context: AiContext) -> Router {
    Router::new()
        .route("/api/chat", post(chat))
        .route("/health", get(health))
        .with_state(context)
}

async fn health() -> &'static str {
    "ok"
}

async fn chat(
    State(context): State<AiContext>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return error_response(StatusCode::BAD_REQUEST, rejection.body_text()),
    };

    let Some(prompt) = request.prompt.filter(|prompt| !prompt.is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "Prompt is required");
    };

    let mut builder = RequestOptions::builder(prompt).temperature(request.temperature);
    if let Some(system) = request.system_message {
        builder = builder.system_message(system);
    }
    let options = builder.build();

    if request.stream {
        tracing::debug!("streaming chat response");
        return stream_response(context.generate_text_stream(options).await);
    }

    match context.generate_text(options).await {
        Ok(response) => Json(json!({ "response": response })).into_response(),
        Err(e) => {
            tracing::error!("chat generation failed: {e}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// Newline-delimited JSON body; ends after the first `done` line.
fn stream_response(stream: GenerationStream) -> Response {
    let lines = stream.map(|event| {
        if let Some(error) = &event.error {
            tracing::warn!("chat stream failed: {error}");
        }
        serde_json::to_vec(&ChatLine::from(event)).map(|mut line| {
            line.push(b'\n');
            Bytes::from(line)
        })
    });

    (
        [
            (header::CONTENT_TYPE, "text/event-stream"),
            (header::CACHE_CONTROL, "no-cache, no-transform"),
        ],
        Body::from_stream(lines),
    )
        .into_response()
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}
