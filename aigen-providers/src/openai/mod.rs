//! OpenAI provider implementation

pub(crate) mod converter;
pub(crate) mod parser;
mod provider;

pub use provider::OpenAI;
