//! Anthropic response parsing

use crate::anthropic::converter::{extract_text_content, AnthropicResponse, AnthropicUsage};
use crate::error::{self, ErrorBody};
use crate::stream_utils::SseEvent;
use crate::traits::{ResponseParser, StreamEventParser};
use aigen_core::{Completion, Error, FinishReason, StreamEvent, Usage};
use serde::Deserialize;
use serde_json::Value;

pub fn parse_response(response: AnthropicResponse) -> Completion {
    Completion {
        text: extract_text_content(&response),
        model: response.model,
        id: response.id,
        usage: response.usage.as_ref().map(parse_usage),
        finish_reason: response.stop_reason.as_deref().map(parse_stop_reason),
    }
}

pub fn parse_usage(usage: &AnthropicUsage) -> Usage {
    Usage::new(usage.input_tokens, usage.output_tokens)
}

fn parse_stop_reason(reason: &str) -> FinishReason {
    match reason {
        "end_turn" => FinishReason::Stop,
        "max_tokens" => FinishReason::Length,
        "stop_sequence" => FinishReason::StopSequence,
        _ => FinishReason::Other,
    }
}

/// Parser implementation for Anthropic
#[derive(Debug, Clone, Copy, Default)]
pub struct AnthropicParser;

impl ResponseParser for AnthropicParser {
    fn parse_response(&self, value: Value) -> Result<Completion, Error> {
        let anthropic_response: AnthropicResponse =
            serde_json::from_value(value).map_err(error::serialization_error)?;
        Ok(parse_response(anthropic_response))
    }
}

impl StreamEventParser for AnthropicParser {
    fn parse_event(&self, event: &SseEvent) -> Result<Option<StreamEvent>, Error> {
        if event.data.trim().is_empty() {
            return Ok(None);
        }

        let frame: StreamFrame =
            serde_json::from_str(&event.data).map_err(error::serialization_error)?;

        match frame {
            StreamFrame::ContentBlockDelta {
                delta: Delta::TextDelta { text },
            } if !text.is_empty() => Ok(Some(StreamEvent::chunk(text))),
            StreamFrame::MessageStop => Ok(Some(StreamEvent::done())),
            StreamFrame::Error { error: err } => {
                Err(error::to_core_error("anthropic", err.describe(), None))
            }
            _ => Ok(None),
        }
    }
}

// Anthropic streaming frame types; everything else (message_start, ping,
// content_block_start/stop, message_delta) is skipped

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum StreamFrame {
    ContentBlockDelta {
        delta: Delta,
    },
    MessageStop,
    Error {
        error: ErrorBody,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Delta {
    TextDelta {
        text: String,
    },
    #[serde(other)]
    Other,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream_utils::data_event;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn frame(event: &str, data: &str) -> SseEvent {
        SseEvent {
            event: event.to_string(),
            ..data_event(data)
        }
    }

    #[test]
    fn test_parse_response() {
        let value = json!({
            "id": "msg_1",
            "type": "message",
            "role": "assistant",
            "model": "claude-3-opus-20240229",
            "content": [{"type": "text", "text": "Hello"}],
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 10, "output_tokens": 2}
        });

        let completion = AnthropicParser.parse_response(value).unwrap();
        assert_eq!(completion.text, "Hello");
        assert_eq!(completion.id.as_deref(), Some("msg_1"));
        assert_eq!(completion.usage, Some(Usage::new(10, 2)));
        assert_eq!(completion.finish_reason, Some(FinishReason::Stop));
    }

    #[test]
    fn test_oversized_usage_does_not_overflow() {
        let completion = AnthropicParser
            .parse_response(json!({
                "content": [{"type": "text", "text": "4"}],
                "usage": {"input_tokens": 4_294_967_295u32, "output_tokens": 1}
            }))
            .unwrap();
        assert_eq!(completion.text, "4");
        assert_eq!(completion.usage.map(|u| u.total_tokens), Some(u32::MAX));
    }

    #[test]
    fn test_empty_content_is_empty_text() {
        let completion = AnthropicParser
            .parse_response(json!({"content": [], "stop_reason": "max_tokens"}))
            .unwrap();
        assert_eq!(completion.text, "");
        assert_eq!(completion.finish_reason, Some(FinishReason::Length));
    }

    #[test]
    fn test_stop_reasons() {
        assert_eq!(parse_stop_reason("end_turn"), FinishReason::Stop);
        assert_eq!(parse_stop_reason("max_tokens"), FinishReason::Length);
        assert_eq!(parse_stop_reason("stop_sequence"), FinishReason::StopSequence);
        assert_eq!(parse_stop_reason("tool_use"), FinishReason::Other);
    }

    #[test]
    fn test_text_delta() {
        let event = frame(
            "content_block_delta",
            r#"{"type":"content_block_delta","index":0,"delta":{"type":"text_delta","text":"Hi"}}"#,
        );
        assert_eq!(
            AnthropicParser.parse_event(&event).unwrap(),
            Some(StreamEvent::chunk("Hi"))
        );
    }

    #[test]
    fn test_skipped_frames() {
        let frames = [
            frame("ping", r#"{"type":"ping"}"#),
            frame(
                "message_start",
                r#"{"type":"message_start","message":{"id":"msg_1","model":"m"}}"#,
            ),
            frame(
                "content_block_start",
                r#"{"type":"content_block_start","index":0,"content_block":{"type":"text","text":""}}"#,
            ),
            frame(
                "content_block_delta",
                r#"{"type":"content_block_delta","index":0,"delta":{"type":"input_json_delta","partial_json":"{"}}"#,
            ),
            frame(
                "message_delta",
                r#"{"type":"message_delta","delta":{"stop_reason":"end_turn"}}"#,
            ),
        ];

        for event in &frames {
            assert_eq!(AnthropicParser.parse_event(event).unwrap(), None, "{event:?}");
        }
    }

    #[test]
    fn test_message_stop_ends_stream() {
        let event = frame("message_stop", r#"{"type":"message_stop"}"#);
        assert_eq!(
            AnthropicParser.parse_event(&event).unwrap(),
            Some(StreamEvent::done())
        );
    }

    #[test]
    fn test_error_frame() {
        let event = frame(
            "error",
            r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#,
        );
        let err = AnthropicParser.parse_event(&event).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Provider error (anthropic): overloaded_error: Overloaded"
        );
    }
}
