//! Conversion between aigen types and Anthropic Messages API types

use crate::constants::ANTHROPIC_DEFAULT_MAX_TOKENS;
use crate::error;
use crate::traits::RequestConverter;
use crate::utils::{merge_additional, serialize_short_f32};
use aigen_core::{Error, RequestOptions, Role};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body keys `additional_options` may not replace
const RESERVED_KEYS: &[&str] = &["model", "messages", "stream", "system"];

// Anthropic API request types
#[derive(Debug, Serialize)]
pub struct AnthropicRequest {
    pub model: String,
    pub messages: Vec<AnthropicMessage>,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_short_f32"
    )]
    pub temperature: Option<f32>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_short_f32"
    )]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_sequences: Option<Vec<String>>,
    pub stream: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnthropicMessage {
    pub role: Role,
    pub content: String,
}

// Anthropic API response types
#[derive(Debug, Deserialize)]
pub struct AnthropicResponse {
    pub id: Option<String>,
    pub model: Option<String>,
    #[serde(default)]
    pub content: Vec<ContentBlock>,
    pub stop_reason: Option<String>,
    pub usage: Option<AnthropicUsage>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
pub struct AnthropicUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Converts request options to the Messages API format
#[derive(Debug, Clone, Copy, Default)]
pub struct AnthropicConverter;

impl RequestConverter for AnthropicConverter {
    fn convert_request(&self, model: &str, options: &RequestOptions) -> Result<Value, Error> {
        let request = build_request(model, options)?;
        let mut body = serde_json::to_value(&request).map_err(error::serialization_error)?;
        merge_additional(&mut body, &options.additional_options, RESERVED_KEYS);
        Ok(body)
    }
}

/// Build the typed request
///
/// The Messages API rejects system turns inside `messages`, so they are
/// appended to the top-level `system` field after `system_message`. A prompt
/// left with no user or assistant turn is rejected.
pub fn build_request(model: &str, options: &RequestOptions) -> Result<AnthropicRequest, Error> {
    let mut system_parts: Vec<String> = options
        .system_message
        .iter()
        .filter(|s| !s.is_empty())
        .cloned()
        .collect();
    let mut messages = Vec::new();

    for message in options.messages() {
        match message.role {
            Role::System => system_parts.push(message.content),
            role => messages.push(AnthropicMessage {
                role,
                content: message.content,
            }),
        }
    }

    if messages.is_empty() {
        return Err(Error::Validation(
            "prompt must contain at least one non-system message".into(),
        ));
    }

    Ok(AnthropicRequest {
        model: model.to_string(),
        messages,
        max_tokens: options.max_tokens.unwrap_or(ANTHROPIC_DEFAULT_MAX_TOKENS),
        system: (!system_parts.is_empty()).then(|| system_parts.join("\n\n")),
        temperature: options.temperature,
        top_p: options.top_p,
        stop_sequences: options.stop_sequences.clone(),
        stream: options.stream,
    })
}

pub fn extract_text_content(response: &AnthropicResponse) -> String {
    response
        .content
        .iter()
        .filter_map(|block| match block {
            ContentBlock::Text { text } => Some(text.as_str()),
            ContentBlock::Other => None,
        })
        .collect()
}
