//! Constants for provider implementations

use std::time::Duration;

/// Default OpenAI base URL
pub const OPENAI_DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default OpenAI model
pub const OPENAI_DEFAULT_MODEL: &str = "gpt-4o";

/// Default OpenAI request timeout
pub const OPENAI_DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);

/// Header carrying the OpenAI organization id
pub const OPENAI_ORGANIZATION_HEADER: &str = "OpenAI-Organization";

/// Default Anthropic base URL
pub const ANTHROPIC_DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

/// Default Anthropic model
pub const ANTHROPIC_DEFAULT_MODEL: &str = "claude-3-opus-20240229";

/// Default Anthropic request timeout
pub const ANTHROPIC_DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

/// Anthropic API version sent with every request
pub const ANTHROPIC_API_VERSION: &str = "2023-06-01";

/// Anthropic requires `max_tokens`; this is used when the caller sets none
pub const ANTHROPIC_DEFAULT_MAX_TOKENS: u32 = 1024;
