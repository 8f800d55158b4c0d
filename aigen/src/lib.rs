//! Aigen - one interface for text generation over OpenAI and Anthropic
//!
//! This crate ties the core types, the vendor adapters and environment
//! configuration together behind an [`AiContext`].
//!
//! # Quick Start
//!
//! ```no_run
//! use aigen::prelude::*;
//! use futures::StreamExt;
//!
//! # #[tokio::main]
//! # async fn main() -> aigen::Result<()> {
//! // Reads AI_PROVIDER, OPENAI_API_KEY / ANTHROPIC_API_KEY, ...
//! let ai = AiContext::from_env()?;
//!
//! let text = ai.generate_text(RequestOptions::new("Say hello")).await?;
//! println!("{text}");
//!
//! let mut stream = ai
//!     .generate_text_stream(RequestOptions::builder("Tell me a story").temperature(0.7).build())
//!     .await;
//! while let Some(event) = stream.next().await {
//!     if let Some(error) = event.error {
//!         eprintln!("stream failed: {error}");
//!         break;
//!     }
//!     print!("{}", event.text);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod context;
mod settings;

// Re-export core types
pub use aigen_core::*;

pub use context::{
    generate_text_stream_with, generate_text_with, shared, AiContext, CustomProviderConfig,
};
pub use settings::{
    Settings, DEFAULT_PROVIDER, MODEL_VAR, ORGANIZATION_VAR, PROVIDER_VAR, TIMEOUT_VAR,
};

pub mod providers {
    //! Provider implementations
    pub use aigen_providers::*;
}

/// Common imports for convenience
pub mod prelude {
    pub use crate::{AiContext, CustomProviderConfig, Settings};
    pub use aigen_core::{
        Completion, Error, GenerationStream, Message, Prompt, PromptEntry, Provider,
        RequestOptions, Result, Role, SharedProvider, StreamEvent,
    };
    pub use aigen_providers::{create_provider, default_model_for, ProviderConfig, ProviderKind};
}
