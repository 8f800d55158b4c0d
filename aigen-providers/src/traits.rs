//! Common traits for provider implementations

use crate::stream_utils::SseEvent;
use aigen_core::{Completion, Error, RequestOptions, StreamEvent};
use serde_json::Value;

/// Convert request options to a provider-specific body
pub trait RequestConverter: Send + Sync {
    /// Build the vendor JSON body for `model`
    fn convert_request(&self, model: &str, options: &RequestOptions) -> Result<Value, Error>;
}

/// Parse responses from provider-specific format
pub trait ResponseParser: Send + Sync {
    /// Parse provider-specific JSON into a completion
    fn parse_response(&self, value: Value) -> Result<Completion, Error>;
}

/// Parse streaming events from provider-specific format
pub trait StreamEventParser: Send + Sync {
    /// Map one server-sent event to a stream event
    ///
    /// `Ok(None)` skips the event, a `done` event ends the stream, and an
    /// error ends it with a failure.
    fn parse_event(&self, event: &SseEvent) -> Result<Option<StreamEvent>, Error>;
}
