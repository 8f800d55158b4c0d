//! HTTP client abstraction and utilities

use crate::error;
use aigen_core::Error;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use std::pin::Pin;
use std::time::Duration;

/// Type alias for response body streams
pub type ResponseStream = Pin<Box<dyn Stream<Item = Result<Bytes, Error>> + Send>>;

/// A JSON POST addressed to a vendor endpoint
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// Provider name used to label errors
    pub provider: &'static str,
    /// Full endpoint URL
    pub url: String,
    /// Request headers
    pub headers: HeaderMap,
    /// JSON body
    pub body: Value,
}

/// HTTP client abstraction
///
/// Providers only talk to vendors through this trait, which is also the
/// seam tests use to stub vendor responses.
#[async_trait::async_trait]
pub trait HttpClient: Send + Sync {
    /// Send a POST request and decode the JSON response
    async fn post(&self, request: HttpRequest) -> Result<Value, Error>;

    /// Send a POST request and return the raw response body as it arrives
    async fn post_stream(&self, request: HttpRequest) -> Result<ResponseStream, Error>;
}

/// Default HTTP client implementation using reqwest
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Create a new HTTP client with a 300 second timeout
    pub fn new() -> Result<Self, Error> {
        Self::with_timeout(Duration::from_secs(300))
    }

    /// Create a new HTTP client with the given timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(error::network_error)?;

        Ok(Self { client })
    }

    async fn send(&self, request: HttpRequest) -> Result<reqwest::Response, Error> {
        let response = self
            .client
            .post(&request.url)
            .headers(request.headers)
            .json(&request.body)
            .send()
            .await
            .map_err(error::network_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let headers = response.headers().clone();
            let text = response.text().await.unwrap_or_default();
            return Err(error::status_error(
                request.provider,
                status,
                &headers,
                &text,
            ));
        }

        Ok(response)
    }
}

#[async_trait::async_trait]
impl HttpClient for ReqwestClient {
    async fn post(&self, request: HttpRequest) -> Result<Value, Error> {
        let response = self.send(request).await?;
        let bytes = response.bytes().await.map_err(error::network_error)?;
        serde_json::from_slice(&bytes).map_err(error::serialization_error)
    }

    async fn post_stream(&self, request: HttpRequest) -> Result<ResponseStream, Error> {
        let response = self.send(request).await?;
        Ok(Box::pin(
            response
                .bytes_stream()
                .map(|chunk| chunk.map_err(error::network_error)),
        ))
    }
}

/// Helper to create bearer-token headers
pub fn create_headers(api_key: &str, additional: Option<HeaderMap>) -> Result<HeaderMap, Error> {
    let mut headers = HeaderMap::new();

    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|e| Error::Configuration(format!("Invalid API key: {e}")))?,
    );

    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    if let Some(additional) = additional {
        headers.extend(additional);
    }

    Ok(headers)
}

/// Helper to build a header value from configuration text
pub fn header_value(name: &str, value: &str) -> Result<HeaderValue, Error> {
    HeaderValue::from_str(value)
        .map_err(|e| Error::Configuration(format!("Invalid {name} header: {e}")))
}
