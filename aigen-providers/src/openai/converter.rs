//! Request conversion for OpenAI

use crate::traits::RequestConverter;
use crate::utils::{json_number, merge_additional};
use aigen_core::{Error, Message, RequestOptions};
use serde_json::{json, Value};

/// Body keys `additional_options` may not replace
const RESERVED_KEYS: &[&str] = &["model", "messages", "stream"];

/// Converts request options to the chat completions format
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenAIConverter;

impl RequestConverter for OpenAIConverter {
    fn convert_request(&self, model: &str, options: &RequestOptions) -> Result<Value, Error> {
        let mut body = json!({
            "model": model,
            "messages": self.convert_messages(options),
            "stream": options.stream,
        });

        if let Some(temperature) = options.temperature {
            body["temperature"] = json_number(temperature);
        }
        if let Some(max_tokens) = options.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }
        if let Some(top_p) = options.top_p {
            body["top_p"] = json_number(top_p);
        }
        if let Some(presence_penalty) = options.presence_penalty {
            body["presence_penalty"] = json_number(presence_penalty);
        }
        if let Some(frequency_penalty) = options.frequency_penalty {
            body["frequency_penalty"] = json_number(frequency_penalty);
        }
        if let Some(stop) = &options.stop_sequences {
            body["stop"] = json!(stop);
        }

        merge_additional(&mut body, &options.additional_options, RESERVED_KEYS);

        Ok(body)
    }
}

impl OpenAIConverter {
    fn convert_messages(&self, options: &RequestOptions) -> Vec<Value> {
        let system = options
            .system_message
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(Message::system);

        system
            .into_iter()
            .chain(options.messages())
            .map(|message| self.convert_message(&message))
            .collect()
    }

    fn convert_message(&self, message: &Message) -> Value {
        json!({
            "role": message.role.as_str(),
            "content": message.content,
        })
    }
}
