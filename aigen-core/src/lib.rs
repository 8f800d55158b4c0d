//! Core traits and types for the aigen provider facade
//!
//! This crate provides the vendor-neutral contract: request options, the
//! [`Provider`] trait, the error taxonomy and the channel-backed
//! [`GenerationStream`]. Vendor adapters live in `aigen-providers`.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod provider;
pub mod types;

// Re-export commonly used items
pub use error::{BoxError, Error, Result};
pub use provider::{Provider, SharedProvider};
pub use types::{
    message::{Message, Prompt, PromptEntry, Role},
    request::{RequestOptions, RequestOptionsBuilder},
    response::{Completion, FinishReason, Usage},
    stream::{EventSink, GenerationStream, StreamEvent, DEFAULT_STREAM_BUFFER},
};
