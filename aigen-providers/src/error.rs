//! Conversions from transport and vendor failures to core errors

use aigen_core::Error as CoreError;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

/// Build a provider error for a vendor-reported failure
pub fn to_core_error(
    provider: impl Into<String>,
    message: impl Into<String>,
    retry_after: Option<Duration>,
) -> CoreError {
    CoreError::Provider {
        provider: provider.into(),
        status: None,
        message: message.into(),
        retry_after,
    }
}

/// Convert network errors to core errors
pub fn network_error(error: reqwest::Error) -> CoreError {
    if error.is_timeout() {
        return CoreError::Timeout;
    }
    CoreError::Network {
        message: error.to_string(),
        source: Some(Box::new(error)),
    }
}

/// Convert serialization errors to core errors
pub fn serialization_error(error: serde_json::Error) -> CoreError {
    CoreError::Serialization {
        message: error.to_string(),
        source: Some(Box::new(error)),
    }
}

/// Convert a non-success HTTP response into a provider error
///
/// Both vendors wrap failures as `{"error": {"message": ...}}`; the raw body
/// is used when it does not parse that way.
pub fn status_error(
    provider: &str,
    status: StatusCode,
    headers: &HeaderMap,
    body: &str,
) -> CoreError {
    let detail = vendor_message(body).unwrap_or_else(|| {
        if body.trim().is_empty() {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        } else {
            body.trim().to_string()
        }
    });

    CoreError::Provider {
        provider: provider.to_string(),
        status: Some(status.as_u16()),
        message: format!("HTTP {}: {}", status.as_u16(), detail),
        retry_after: parse_retry_after(headers),
    }
}

/// Extract `error.message` from a vendor error payload
pub fn vendor_message(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct Envelope {
        error: ErrorBody,
    }

    serde_json::from_str::<Envelope>(body)
        .ok()
        .map(|envelope| envelope.error.describe())
}

/// The `error` object both vendors send
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    /// Vendor error category
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// Human-readable message
    #[serde(default)]
    pub message: String,
}

impl ErrorBody {
    /// `kind: message`, or just the message when the kind is absent
    pub fn describe(&self) -> String {
        match &self.kind {
            Some(kind) if !kind.is_empty() => format!("{kind}: {}", self.message),
            _ => self.message.clone(),
        }
    }
}

fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_status_error_uses_vendor_message() {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static("20"));
        let body = r#"{"error":{"type":"rate_limit_error","message":"Too many requests"}}"#;

        match status_error("anthropic", StatusCode::TOO_MANY_REQUESTS, &headers, body) {
            CoreError::Provider {
                provider,
                status,
                message,
                retry_after,
            } => {
                assert_eq!(provider, "anthropic");
                assert_eq!(status, Some(429));
                assert_eq!(message, "HTTP 429: rate_limit_error: Too many requests");
                assert_eq!(retry_after, Some(Duration::from_secs(20)));
            }
            other => panic!("Expected Provider error, got {other:?}"),
        }
    }

    #[test]
    fn test_status_error_falls_back_to_body() {
        let error = status_error(
            "openai",
            StatusCode::BAD_GATEWAY,
            &HeaderMap::new(),
            "upstream unavailable",
        );
        assert_eq!(
            error.to_string(),
            "Provider error (openai): HTTP 502: upstream unavailable"
        );
        assert_eq!(error.retry_after(), None);
    }

    #[test]
    fn test_status_error_empty_body() {
        let error = status_error("openai", StatusCode::UNAUTHORIZED, &HeaderMap::new(), "");
        assert_eq!(
            error.to_string(),
            "Provider error (openai): HTTP 401: Unauthorized"
        );
    }

    #[test]
    fn test_vendor_message_without_kind() {
        let body = r#"{"error":{"message":"Incorrect API key provided"}}"#;
        assert_eq!(
            vendor_message(body).as_deref(),
            Some("Incorrect API key provided")
        );
        assert_eq!(vendor_message("not json"), None);
    }
}
