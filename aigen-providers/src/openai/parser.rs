//! Response parsing for OpenAI

use crate::error::{self, ErrorBody};
use crate::stream_utils::SseEvent;
use crate::traits::{ResponseParser, StreamEventParser};
use aigen_core::{Completion, Error, FinishReason, StreamEvent, Usage};
use serde::Deserialize;
use serde_json::Value;

/// Stream terminator sent as the last `data:` payload
const DONE_MARKER: &str = "[DONE]";

/// Parses OpenAI responses
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenAIParser;

impl ResponseParser for OpenAIParser {
    fn parse_response(&self, value: Value) -> Result<Completion, Error> {
        let response: OpenAIResponse =
            serde_json::from_value(value).map_err(error::serialization_error)?;

        let choice = response.choices.into_iter().next();
        let finish_reason = choice
            .as_ref()
            .and_then(|c| c.finish_reason.as_deref())
            .map(parse_finish_reason);

        Ok(Completion {
            text: choice
                .and_then(|c| c.message)
                .and_then(|m| m.content)
                .unwrap_or_default(),
            model: response.model,
            id: response.id,
            usage: response.usage.map(|u| Usage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
            finish_reason,
        })
    }
}

impl StreamEventParser for OpenAIParser {
    fn parse_event(&self, event: &SseEvent) -> Result<Option<StreamEvent>, Error> {
        let data = event.data.trim();
        if data == DONE_MARKER {
            return Ok(Some(StreamEvent::done()));
        }
        if data.is_empty() {
            return Ok(None);
        }

        let chunk: StreamChunk = serde_json::from_str(data).map_err(error::serialization_error)?;

        if let Some(err) = chunk.error {
            return Err(error::to_core_error("openai", err.describe(), None));
        }

        let content = chunk
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.delta)
            .and_then(|delta| delta.content)
            .filter(|text| !text.is_empty());

        Ok(content.map(StreamEvent::chunk))
    }
}

fn parse_finish_reason(reason: &str) -> FinishReason {
    match reason {
        "stop" => FinishReason::Stop,
        "length" => FinishReason::Length,
        "content_filter" => FinishReason::ContentFilter,
        _ => FinishReason::Other,
    }
}

// OpenAI response types

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    id: Option<String>,
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    delta: Option<Delta>,
}

#[derive(Debug, Deserialize)]
struct Delta {
    content: Option<String>,
}
