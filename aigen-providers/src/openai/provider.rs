//! OpenAI provider implementation
//!
//! Talks to the chat completions endpoint, buffered or streamed. A system
//! message is sent as the leading message of the conversation.

use crate::config::ProviderConfig;
use crate::constants::{
    OPENAI_DEFAULT_BASE_URL, OPENAI_DEFAULT_MODEL, OPENAI_DEFAULT_TIMEOUT,
    OPENAI_ORGANIZATION_HEADER,
};
use crate::http::{create_headers, header_value, HttpClient, HttpRequest, ReqwestClient};
use crate::openai::{converter::OpenAIConverter, parser::OpenAIParser};
use crate::stream_utils::spawn_sse_stream;
use crate::traits::{RequestConverter, ResponseParser};
use aigen_core::{Completion, Error, GenerationStream, Provider, RequestOptions};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

const NAME: &str = "openai";

/// OpenAI provider for chat completions
///
/// # Example
///
/// ```no_run
/// use aigen_providers::{OpenAI, ProviderConfig};
///
/// // Create with API key
/// let provider = OpenAI::with_api_key("your-api-key")?;
///
/// // Or with a full configuration
/// let config = ProviderConfig::new("your-api-key", "gpt-4o-mini")
///     .with_organization("org-id");
/// let provider = OpenAI::from_config(config)?;
/// # Ok::<(), aigen_core::Error>(())
/// ```
#[derive(Clone)]
pub struct OpenAI {
    client: Arc<dyn HttpClient>,
    config: ProviderConfig,
    converter: OpenAIConverter,
    parser: OpenAIParser,
}

impl OpenAI {
    /// Create a new OpenAI provider with the given configuration and client
    pub fn new(config: ProviderConfig, client: Arc<dyn HttpClient>) -> Result<Self, Error> {
        config.validate(NAME)?;
        Ok(Self {
            client,
            config,
            converter: OpenAIConverter,
            parser: OpenAIParser,
        })
    }

    /// Create a provider with a reqwest client honouring the configured timeout
    pub fn from_config(config: ProviderConfig) -> Result<Self, Error> {
        let timeout = config.timeout.unwrap_or(OPENAI_DEFAULT_TIMEOUT);
        let client = Arc::new(ReqwestClient::with_timeout(timeout)?);
        Self::new(config, client)
    }

    /// Create a new OpenAI provider with just an API key and the default model
    pub fn with_api_key(api_key: impl Into<String>) -> Result<Self, Error> {
        Self::from_config(ProviderConfig::new(api_key, OPENAI_DEFAULT_MODEL))
    }

    /// The configuration this provider was built with
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn chat_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url_or(OPENAI_DEFAULT_BASE_URL)
        )
    }

    fn headers(&self) -> Result<HeaderMap, Error> {
        let extra = match &self.config.organization_id {
            Some(org) => {
                let name = HeaderName::from_bytes(OPENAI_ORGANIZATION_HEADER.as_bytes())
                    .map_err(|e| Error::Configuration(format!("Invalid header name: {e}")))?;
                let mut extra = HeaderMap::new();
                extra.insert(name, header_value(OPENAI_ORGANIZATION_HEADER, org)?);
                Some(extra)
            }
            None => None,
        };
        create_headers(&self.config.api_key, extra)
    }

    fn build_request(&self, options: &RequestOptions, stream: bool) -> Result<HttpRequest, Error> {
        options.validate()?;

        let mut body = self.converter.convert_request(&self.config.model, options)?;
        body["stream"] = json!(stream);

        Ok(HttpRequest {
            provider: NAME,
            url: self.chat_url(),
            headers: self.headers()?,
            body,
        })
    }
}

impl std::fmt::Debug for OpenAI {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAI")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Provider for OpenAI {
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
            "sending completion request"
        );

        let response = self.client.post(request).await.map_err(|e| {
            warn!(provider = NAME, error = %e, "completion request failed");
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubClient;
    use aigen_core::StreamEvent;
    use futures::StreamExt;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn provider(stub: Arc<StubClient>) -> OpenAI {
        OpenAI::new(ProviderConfig::new("sk-test", "gpt-4o"), stub).unwrap()
    }

    #[tokio::test]
    async fn test_generate_returns_first_choice() {
        let stub = Arc::new(StubClient::replying(json!({
            "choices": [{"message": {"role": "assistant", "content": "Hello"}}]
        })));

        let text = provider(stub.clone())
            .generate(RequestOptions::new("Say hi"))
            .await
            .unwrap();
        assert_eq!(text, "Hello");

        let request = stub.last();
        assert_eq!(request.provider, "openai");
        assert_eq!(request.url, "https://api.openai.com/v1/chat/completions");
        assert_eq!(request.headers.get("authorization").unwrap(), "Bearer sk-test");
        assert_eq!(
            request.body,
            json!({
                "model": "gpt-4o",
                "messages": [{"role": "user", "content": "Say hi"}],
                "stream": false,
            })
        );
    }

    #[tokio::test]
    async fn test_zero_temperature_is_sent() {
        let stub = Arc::new(StubClient::replying(json!({
            "choices": [{"message": {"role": "assistant", "content": "4"}}]
        })));
        let options = RequestOptions::builder("What is 2+2?").temperature(0.0).build();

        let text = provider(stub.clone()).generate(options).await.unwrap();
        assert_eq!(text, "4");
        assert_eq!(stub.last().body["temperature"], json!(0.0));
    }

    #[tokio::test]
    async fn test_generate_stream_forces_stream_flag() {
        let stub = Arc::new(StubClient::streaming(vec![
            "data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"lo\"}}]}\n\n",
            "data: [DONE]\n\n",
        ]));

        let events: Vec<StreamEvent> = provider(stub.clone())
            .generate_stream(RequestOptions::new("Say hi"))
            .await
            .collect()
            .await;

        assert_eq!(
            events,
            vec![
                StreamEvent::chunk("Hel"),
                StreamEvent::chunk("lo"),
                StreamEvent::done(),
            ]
        );
        assert_eq!(stub.last().body["stream"], json!(true));
    }

    #[tokio::test]
    async fn test_organization_header_and_base_url() {
        let stub = Arc::new(StubClient::replying(json!({"choices": []})));
        let config = ProviderConfig::new("sk-test", "gpt-4o-mini")
            .with_organization("org-42")
            .with_base_url("http://localhost:8080/v1/");
        let provider = OpenAI::new(config, stub.clone()).unwrap();

        provider.generate(RequestOptions::new("hi")).await.unwrap();

        let request = stub.last();
        assert_eq!(request.url, "http://localhost:8080/v1/chat/completions");
        assert_eq!(request.headers.get("openai-organization").unwrap(), "org-42");
        assert_eq!(request.body["model"], json!("gpt-4o-mini"));
    }

    #[tokio::test]
    async fn test_request_failure_surfaces_as_error() {
        let stub = Arc::new(StubClient::failing(|| Error::Timeout));
        let provider = provider(stub);

        let err = provider.generate(RequestOptions::new("hi")).await.unwrap_err();
        assert!(matches!(err, Error::Timeout));

        let events: Vec<StreamEvent> = provider
            .generate_stream(RequestOptions::new("hi"))
            .await
            .collect()
            .await;
        assert_eq!(events, vec![StreamEvent::failed("Operation timed out")]);
    }

    #[tokio::test]
    async fn test_invalid_options_never_reach_the_client() {
        let stub = Arc::new(StubClient::default());
        let provider = provider(stub.clone());
        let options = RequestOptions::builder("hi").temperature(1.5).build();

        let err = provider.complete(options.clone()).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let events: Vec<StreamEvent> = provider.generate_stream(options).await.collect().await;
        assert_eq!(events.len(), 1);
        assert!(events[0].is_error());
        assert_eq!(stub.request_count(), 0);
    }

    #[test]
    fn test_construction_rejects_bad_config() {
        let stub: Arc<dyn HttpClient> = Arc::new(StubClient::default());
        let err = OpenAI::new(ProviderConfig::new("", "gpt-4o"), stub.clone()).unwrap_err();
        assert!(err.is_configuration());

        let err = OpenAI::new(
            ProviderConfig::new("sk", "gpt-4o").with_base_url("not a url"),
            stub,
        )
        .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_accessors() {
        let provider = OpenAI::from_config(
            ProviderConfig::new("sk-test", "gpt-4o").with_timeout(Duration::from_secs(5)),
        )
        .unwrap();
        assert_eq!(provider.name(), "openai");
        assert_eq!(provider.model(), "gpt-4o");
        assert_eq!(provider.config().timeout, Some(Duration::from_secs(5)));
        assert!(!format!("{provider:?}").contains("sk-test"));
    }
}
