//! Provider implementations for the OpenAI and Anthropic APIs
//!
//! Each adapter is split into a request converter, a response parser and the
//! provider itself. All vendor traffic goes through [`http::HttpClient`].

#![warn(missing_docs)]

pub mod config;
pub mod constants;
pub mod error;
pub mod factory;
pub mod http;
pub mod stream_utils;
pub mod traits;
pub mod utils;

// Provider implementations
pub mod anthropic;
pub mod openai;

#[cfg(test)]
mod testing;

// Re-export provider types
pub use anthropic::Anthropic;
pub use config::ProviderConfig;
pub use factory::{create_provider, create_provider_with_client, default_model_for, ProviderKind};
pub use http::{HttpClient, HttpRequest, ReqwestClient};
pub use openai::OpenAI;

// Re-export common traits
pub use traits::{RequestConverter, ResponseParser, StreamEventParser};
