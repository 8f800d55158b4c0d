//! Provider selection by type name
//!
//! Every entry point parses the type through [`ProviderKind`], so the factory
//! and [`default_model_for`] accept and reject exactly the same names.
//!
//! ```no_run
//! use aigen_providers::{create_provider, default_model_for, ProviderConfig};
//!
//! let model = default_model_for("anthropic")?;
//! let provider = create_provider("Anthropic", ProviderConfig::new("sk-ant-...", model))?;
//! # Ok::<(), aigen_core::Error>(())
//! ```

use crate::anthropic::Anthropic;
use crate::config::ProviderConfig;
use crate::constants::{ANTHROPIC_DEFAULT_MODEL, OPENAI_DEFAULT_MODEL};
use crate::http::HttpClient;
use crate::openai::OpenAI;
use aigen_core::{Error, SharedProvider};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

/// The supported vendors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    /// OpenAI chat completions
    OpenAI,
    /// Anthropic Messages API
    Anthropic,
}

impl ProviderKind {
    /// Lowercase type name
    pub fn as_str(self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "openai",
            ProviderKind::Anthropic => "anthropic",
        }
    }

    /// Model used when the caller does not choose one
    pub fn default_model(self) -> &'static str {
        match self {
            ProviderKind::OpenAI => OPENAI_DEFAULT_MODEL,
            ProviderKind::Anthropic => ANTHROPIC_DEFAULT_MODEL,
        }
    }

    /// Environment variable holding the API key
    pub fn api_key_var(self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "OPENAI_API_KEY",
            ProviderKind::Anthropic => "ANTHROPIC_API_KEY",
        }
    }

    /// Environment variable overriding the base URL
    pub fn base_url_var(self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "OPENAI_API_BASE_URL",
            ProviderKind::Anthropic => "ANTHROPIC_API_BASE_URL",
        }
    }

    /// Build a provider of this kind with its default reqwest client
    pub fn create(self, config: ProviderConfig) -> Result<SharedProvider, Error> {
        let provider: SharedProvider = match self {
            ProviderKind::OpenAI => Arc::new(OpenAI::from_config(config)?),
            ProviderKind::Anthropic => Arc::new(Anthropic::from_config(config)?),
        };
        info!(provider = self.as_str(), model = provider.model(), "provider created");
        Ok(provider)
    }

    /// Build a provider of this kind over an injected HTTP client
    pub fn create_with_client(
        self,
        config: ProviderConfig,
        client: Arc<dyn HttpClient>,
    ) -> Result<SharedProvider, Error> {
        let provider: SharedProvider = match self {
            ProviderKind::OpenAI => Arc::new(OpenAI::new(config, client)?),
            ProviderKind::Anthropic => Arc::new(Anthropic::new(config, client)?),
        };
        info!(provider = self.as_str(), model = provider.model(), "provider created");
        Ok(provider)
    }
}

impl FromStr for ProviderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAI),
            "anthropic" => Ok(ProviderKind::Anthropic),
            _ => Err(Error::UnsupportedProvider(s.to_string())),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Create a provider from a case-insensitive type name
pub fn create_provider(kind: &str, config: ProviderConfig) -> Result<SharedProvider, Error> {
    kind.parse::<ProviderKind>()?.create(config)
}

/// Create a provider that sends requests through `client`
pub fn create_provider_with_client(
    kind: &str,
    config: ProviderConfig,
    client: Arc<dyn HttpClient>,
) -> Result<SharedProvider, Error> {
    kind.parse::<ProviderKind>()?.create_with_client(config, client)
}

/// Default model for a case-insensitive type name
pub fn default_model_for(kind: &str) -> Result<&'static str, Error> {
    Ok(kind.parse::<ProviderKind>()?.default_model())
}
