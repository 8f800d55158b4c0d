//! Provider configuration shared by every adapter

use aigen_core::Error;
use std::fmt;
use std::time::Duration;
use url::Url;

/// Configuration for one provider instance
///
/// Built once and held immutably by the provider.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// API key for authentication
    pub api_key: String,
    /// Model identifier
    pub model: String,
    /// Override for the vendor's base URL
    pub base_url: Option<String>,
    /// Optional organization ID (OpenAI only)
    pub organization_id: Option<String>,
    /// Per-request timeout handed to the HTTP client
    pub timeout: Option<Duration>,
}

impl ProviderConfig {
    /// Create a new configuration with an API key and model
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: None,
            organization_id: None,
            timeout: None,
        }
    }

    /// Set a custom base URL
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the organization ID
    pub fn with_organization(mut self, org: impl Into<String>) -> Self {
        self.organization_id = Some(org.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The configured base URL or `default`, without a trailing slash
    pub fn base_url_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.base_url
            .as_deref()
            .unwrap_or(default)
            .trim_end_matches('/')
    }

    /// Reject configurations no vendor would accept
    pub fn validate(&self, provider: &str) -> Result<(), Error> {
        if self.api_key.trim().is_empty() {
            return Err(Error::Configuration(format!(
                "missing API key for {provider} provider"
            )));
        }
        if self.model.trim().is_empty() {
            return Err(Error::Configuration(format!(
                "missing model for {provider} provider"
            )));
        }
        if let Some(base_url) = &self.base_url {
            let parsed = Url::parse(base_url).map_err(|e| {
                Error::Configuration(format!("invalid base URL {base_url:?}: {e}"))
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(Error::Configuration(format!(
                    "base URL must use http or https: {base_url}"
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("organization_id", &self.organization_id)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_methods() {
        let config = ProviderConfig::new("sk-test", "gpt-4o")
            .with_base_url("https://proxy.example.com/v1/")
            .with_organization("org-1")
            .with_timeout(Duration::from_secs(5));

        assert_eq!(config.base_url_or("unused"), "https://proxy.example.com/v1");
        assert_eq!(config.organization_id.as_deref(), Some("org-1"));
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_base_url_default() {
        let config = ProviderConfig::new("k", "m");
        assert_eq!(
            config.base_url_or("https://api.openai.com/v1"),
            "https://api.openai.com/v1"
        );
    }

    #[test]
    fn test_validate() {
        assert!(ProviderConfig::new("k", "m").validate("openai").is_ok());

        let err = ProviderConfig::new("", "m").validate("openai").unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("missing API key for openai"));

        let err = ProviderConfig::new("k", " ").validate("anthropic").unwrap_err();
        assert!(err.to_string().contains("missing model"));

        let err = ProviderConfig::new("k", "m")
            .with_base_url("not a url")
            .validate("openai")
            .unwrap_err();
        assert!(err.is_configuration());

        let err = ProviderConfig::new("k", "m")
            .with_base_url("ftp://example.com")
            .validate("openai")
            .unwrap_err();
        assert!(err.to_string().contains("http or https"));
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = ProviderConfig::new("sk-very-secret", "gpt-4o");
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-very-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
