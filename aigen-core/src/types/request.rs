//! Request options for generation calls

use crate::error::{Error, Result};
use crate::types::message::{Message, Prompt};
use serde_json::{Map, Value};

/// Options for a single generation call
///
/// No defaults are implied here; each provider applies its own (for example
/// the Anthropic adapter caps output at 1024 tokens when `max_tokens` is
/// unset).
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOptions {
    /// The prompt or conversation to generate from
    pub prompt: Prompt,
    /// Randomness, 0.0 (deterministic) to 1.0
    pub temperature: Option<f32>,
    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
    /// Whether the response should be streamed
    pub stream: bool,
    /// Sequences that end generation
    pub stop_sequences: Option<Vec<String>>,
    /// System instructions, placed according to the vendor's contract
    pub system_message: Option<String>,
    /// Top-p nucleus sampling
    pub top_p: Option<f32>,
    /// Presence penalty
    pub presence_penalty: Option<f32>,
    /// Frequency penalty
    pub frequency_penalty: Option<f32>,
    /// Vendor-specific fields merged into the request body as-is
    pub additional_options: Map<String, Value>,
}

impl RequestOptions {
    /// Create options for a prompt with nothing else set
    pub fn new(prompt: impl Into<Prompt>) -> Self {
        Self {
            prompt: prompt.into(),
            temperature: None,
            max_tokens: None,
            stream: false,
            stop_sequences: None,
            system_message: None,
            top_p: None,
            presence_penalty: None,
            frequency_penalty: None,
            additional_options: Map::new(),
        }
    }

    /// Create a new options builder
    pub fn builder(prompt: impl Into<Prompt>) -> RequestOptionsBuilder {
        RequestOptionsBuilder {
            options: Self::new(prompt),
        }
    }

    /// The prompt normalized into an ordered message sequence
    pub fn messages(&self) -> Vec<Message> {
        self.prompt.to_messages()
    }

    /// Check the options before any network call is made
    pub fn validate(&self) -> Result<()> {
        if let Prompt::Messages(entries) = &self.prompt {
            if entries.is_empty() {
                return Err(Error::Validation(
                    "prompt must contain at least one message".into(),
                ));
            }
        }
        check_unit_range("temperature", self.temperature)?;
        check_unit_range("top_p", self.top_p)?;
        Ok(())
    }
}

fn check_unit_range(name: &str, value: Option<f32>) -> Result<()> {
    match value {
        Some(v) if !(0.0..=1.0).contains(&v) => Err(Error::Validation(format!(
            "{name} must be within [0, 1], got {v}"
        ))),
        _ => Ok(()),
    }
}

/// Builder for RequestOptions
#[derive(Debug, Clone)]
pub struct RequestOptionsBuilder {
    options: RequestOptions,
}

impl RequestOptionsBuilder {
    /// Set temperature
    pub fn temperature(mut self, temp: f32) -> Self {
        self.options.temperature = Some(temp);
        self
    }

    /// Set maximum tokens
    pub fn max_tokens(mut self, tokens: u32) -> Self {
        self.options.max_tokens = Some(tokens);
        self
    }

    /// Request a streamed response
    pub fn stream(mut self, stream: bool) -> Self {
        self.options.stream = stream;
        self
    }

    /// Set stop sequences
    pub fn stop(mut self, sequences: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.options.stop_sequences = Some(sequences.into_iter().map(Into::into).collect());
        self
    }

    /// Set the system instructions
    pub fn system_message(mut self, message: impl Into<String>) -> Self {
        self.options.system_message = Some(message.into());
        self
    }

    /// Set top-p
    pub fn top_p(mut self, p: f32) -> Self {
        self.options.top_p = Some(p);
        self
    }

    /// Set presence penalty
    pub fn presence_penalty(mut self, penalty: f32) -> Self {
        self.options.presence_penalty = Some(penalty);
        self
    }

    /// Set frequency penalty
    pub fn frequency_penalty(mut self, penalty: f32) -> Self {
        self.options.frequency_penalty = Some(penalty);
        self
    }

    /// Add a vendor-specific passthrough field
    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options
            .additional_options
            .insert(key.into(), value.into());
        self
    }

    /// Build the options
    pub fn build(self) -> RequestOptions {
        self.options
    }

    /// Build the options, returning an error if validation fails
    pub fn try_build(self) -> Result<RequestOptions> {
        self.options.validate()?;
        Ok(self.options)
    }
}
