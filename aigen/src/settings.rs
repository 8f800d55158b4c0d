//! Environment-driven configuration for the default provider

use aigen_core::{Error, Result};
use aigen_providers::{ProviderConfig, ProviderKind};
use std::time::Duration;
use tracing::warn;

/// Selects the provider type
pub const PROVIDER_VAR: &str = "AI_PROVIDER";
/// Carries the OpenAI organization id
pub const ORGANIZATION_VAR: &str = "OPENAI_ORGANIZATION_ID";
/// Overrides the provider's default model
pub const MODEL_VAR: &str = "AI_MODEL";
/// Per-request timeout in milliseconds
pub const TIMEOUT_VAR: &str = "AI_TIMEOUT_MS";
/// Provider type used when none is configured
pub const DEFAULT_PROVIDER: &str = "openai";

/// Settings for the default provider, resolved once at startup
///
/// Only the key and base URL of the selected provider type are read; an
/// unknown type is kept as-is and rejected when a provider is built.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// Lowercased provider type
    pub provider: String,
    /// API key for the selected provider
    pub api_key: Option<String>,
    /// Base URL override for the selected provider
    pub base_url: Option<String>,
    /// OpenAI organization id
    pub organization_id: Option<String>,
    /// Model override
    pub model: Option<String>,
    /// Request timeout override
    pub timeout: Option<Duration>,
}

impl Settings {
    /// Read settings from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through `lookup`; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let provider = get(PROVIDER_VAR)
            .unwrap_or_else(|| DEFAULT_PROVIDER.to_string())
            .to_lowercase();

        let (api_key, base_url) = match provider.parse::<ProviderKind>() {
            Ok(kind) => {
                let api_key = get(kind.api_key_var());
                if api_key.is_none() {
                    warn!(
                        provider = %provider,
                        var = kind.api_key_var(),
                        "no API key found for provider"
                    );
                }
                (api_key, get(kind.base_url_var()))
            }
            Err(_) => (None, None),
        };

        let timeout = get(TIMEOUT_VAR).and_then(|raw| match raw.trim().parse::<u64>() {
            Ok(ms) => Some(Duration::from_millis(ms)),
            Err(_) => {
                warn!(var = TIMEOUT_VAR, value = %raw, "ignoring invalid timeout");
                None
            }
        });

        Self {
            provider,
            api_key,
            base_url,
            organization_id: get(ORGANIZATION_VAR),
            model: get(MODEL_VAR),
            timeout,
        }
    }

    /// The selected provider type
    pub fn kind(&self) -> Result<ProviderKind> {
        self.provider.parse()
    }

    /// Build the provider configuration, applying the type's default model
    pub fn provider_config(&self) -> Result<ProviderConfig> {
        let kind = self.kind()?;
        let api_key = self.api_key.clone().ok_or_else(|| {
            Error::Configuration(format!(
                "no API key for {kind} provider; set {}",
                kind.api_key_var()
            ))
        })?;

        let mut config = ProviderConfig::new(
            api_key,
            self.model.as_deref().unwrap_or(kind.default_model()),
        );
        config.base_url = self.base_url.clone();
        config.organization_id = self.organization_id.clone();
        config.timeout = self.timeout;
        Ok(config)
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("provider", &self.provider)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("organization_id", &self.organization_id)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}
