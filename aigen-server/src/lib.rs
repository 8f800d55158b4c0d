//! HTTP chat endpoint over the aigen default provider.
//!
//! `POST /api/chat` answers buffered as `{"response": ...}` or, with
//! `"stream": true`, as newline-delimited `{"chunk", "done"}` lines.

#![warn(missing_docs)]

pub mod chat;
pub mod serve;

pub use chat::{router, ChatLine, ChatRequest, DEFAULT_TEMPERATURE};
pub use serve::{serve, serve_with_context, ServeHandle};

/// Environment variable holding the bind address
pub const BIND_VAR: &str = "AIGEN_BIND";

/// Address used when neither an argument nor [`BIND_VAR`] is given
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";
