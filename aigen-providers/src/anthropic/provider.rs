//! Anthropic provider implementation
//!
//! Talks to the Messages API. The system message travels in the top-level
//! `system` field and `max_tokens` is always sent.

use crate::anthropic::{converter::AnthropicConverter, parser::AnthropicParser};
use crate::config::ProviderConfig;
use crate::constants::{
    ANTHROPIC_API_VERSION, ANTHROPIC_DEFAULT_BASE_URL, ANTHROPIC_DEFAULT_MODEL,
    ANTHROPIC_DEFAULT_TIMEOUT,
};
use crate::http::{header_value, HttpClient, HttpRequest, ReqwestClient};
use crate::stream_utils::spawn_sse_stream;
use crate::traits::{RequestConverter, ResponseParser};
use aigen_core::{Completion, Error, GenerationStream, Provider, RequestOptions};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

const NAME: &str = "anthropic";

/// Anthropic Claude provider for the Messages API
///
/// `organization_id` in the configuration is ignored, as are presence and
/// frequency penalties in request options.
///
/// # Example
///
/// ```no_run
/// use aigen_providers::{Anthropic, ProviderConfig};
/// use aigen_providers::http::{HttpClient, ReqwestClient};
/// use std::sync::Arc;
///
/// let provider = Anthropic::with_api_key("your-api-key")?;
///
/// let config = ProviderConfig::new("your-api-key", "claude-3-sonnet-20240229");
/// let client = Arc::new(ReqwestClient::new()?);
/// let provider = Anthropic::new(config, client)?;
/// # Ok::<(), aigen_core::Error>(())
/// ```
#[derive(Clone)]
pub struct Anthropic {
    config: ProviderConfig,
    client: Arc<dyn HttpClient>,
    converter: AnthropicConverter,
    parser: AnthropicParser,
}

impl Anthropic {
    /// Create a new Anthropic provider with the given configuration and client
    pub fn new(config: ProviderConfig, client: Arc<dyn HttpClient>) -> Result<Self, Error> {
        config.validate(NAME)?;
        Ok(Self {
            config,
            client,
            converter: AnthropicConverter,
            parser: AnthropicParser,
        })
    }

    /// Create a provider with a reqwest client honouring the configured timeout
    pub fn from_config(config: ProviderConfig) -> Result<Self, Error> {
        let timeout = config.timeout.unwrap_or(ANTHROPIC_DEFAULT_TIMEOUT);
        let client = Arc::new(ReqwestClient::with_timeout(timeout)?);
        Self::new(config, client)
    }

    /// Create a new Anthropic provider with just an API key and the default model
    pub fn with_api_key(api_key: impl Into<String>) -> Result<Self, Error> {
        Self::from_config(ProviderConfig::new(api_key, ANTHROPIC_DEFAULT_MODEL))
    }

    /// The configuration this provider was built with
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/v1/messages",
            self.config.base_url_or(ANTHROPIC_DEFAULT_BASE_URL)
        )
    }

    /// Create Anthropic-specific headers
    fn create_headers(&self) -> Result<HeaderMap, Error> {
        let mut headers = HeaderMap::new();

        headers.insert("x-api-key", header_value("x-api-key", &self.config.api_key)?);
        headers.insert(
            "anthropic-version",
            HeaderValue::from_static(ANTHROPIC_API_VERSION),
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Ok(headers)
    }

    fn build_request(&self, options: &RequestOptions, stream: bool) -> Result<HttpRequest, Error> {
        options.validate()?;

        let mut body = self.converter.convert_request(&self.config.model, options)?;
        body["stream"] = json!(stream);

        Ok(HttpRequest {
            provider: NAME,
            url: self.messages_url(),
            headers: self.create_headers()?,
            body,
        })
    }
}

impl std::fmt::Debug for Anthropic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Anthropic")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Provider for Anthropic {
    fn name(&self) -> &'static str {
        NAME
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, options: RequestOptions) -> Result<Completion, Error> {
        let request = self.build_request(&options, false)?;
        let start = Instant::now();
        debug!(
            provider = NAME,
            model = %self.config.model,
            messages = request.body["messages"].as_array().map_or(0, Vec::len),
            "sending messages request"
        );

        let response = self.client.post(request).await.map_err(|e| {
            warn!(provider = NAME, error = %e, "messages request failed");
            e
        })?;
        let completion = self.parser.parse_response(response)?;

        debug!(
            provider = NAME,
            duration_ms = start.elapsed().as_millis(),
            finish_reason = ?completion.finish_reason,
            "completion received"
        );
        Ok(completion)
    }

    async fn generate_stream(&self, options: RequestOptions) -> GenerationStream {
        match self.build_request(&options, true) {
            Ok(request) => spawn_sse_stream(self.client.clone(), request, self.parser),
            Err(e) => {
                warn!(provider = NAME, error = %e, "rejected stream request");
                GenerationStream::failed(&e)
            }
        }
    }
}
