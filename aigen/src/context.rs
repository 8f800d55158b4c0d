//! The default provider and the calls made through it
//!
//! An [`AiContext`] is built once at startup, usually from [`Settings`], and
//! handed to whatever needs to generate text. Callers holding their own
//! provider can use [`generate_text_with`] and [`generate_text_stream_with`]
//! instead.

use crate::settings::Settings;
use aigen_core::{GenerationStream, Provider, RequestOptions, Result, SharedProvider};
use aigen_providers::{create_provider, default_model_for, ProviderConfig, ProviderKind};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Caller-supplied values for [`AiContext::custom_provider`]
///
/// Unset fields fall back to the context's default configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomProviderConfig {
    /// API key, always required
    pub api_key: String,
    /// Model override
    pub model: Option<String>,
    /// Base URL override
    pub base_url: Option<String>,
    /// Organization id override
    pub organization_id: Option<String>,
    /// Timeout override
    pub timeout: Option<Duration>,
}

impl CustomProviderConfig {
    /// Values carrying only an API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Set the model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the base URL
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the organization id
    pub fn with_organization(mut self, org: impl Into<String>) -> Self {
        self.organization_id = Some(org.into());
        self
    }

    /// Set the timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Holds the default provider
#[derive(Clone)]
pub struct AiContext {
    provider: SharedProvider,
    defaults: Option<(ProviderKind, ProviderConfig)>,
}

impl AiContext {
    /// Wrap a caller-built provider
    pub fn new(provider: SharedProvider) -> Self {
        Self {
            provider,
            defaults: None,
        }
    }

    /// Build the default provider from settings
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let kind = settings.kind()?;
        let config = settings.provider_config()?;
        let provider = kind.create(config.clone())?;
        info!(provider = kind.as_str(), model = %config.model, "default provider ready");

        Ok(Self {
            provider,
            defaults: Some((kind, config)),
        })
    }

    /// Build the default provider from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_settings(&Settings::from_env())
    }

    /// The default provider
    pub fn provider(&self) -> &SharedProvider {
        &self.provider
    }

    /// Buffered generation through the default provider
    pub async fn generate_text(&self, options: RequestOptions) -> Result<String> {
        generate_text_with(self.provider.as_ref(), options).await
    }

    /// Streamed generation through the default provider
    pub async fn generate_text_stream(&self, options: RequestOptions) -> GenerationStream {
        generate_text_stream_with(self.provider.as_ref(), options).await
    }

    /// Build a provider of `kind` from `custom` merged over the default
    /// configuration
    ///
    /// The default model and base URL only carry over when `kind` matches the
    /// default provider's type; otherwise the type's own defaults apply.
    pub fn custom_provider(&self, kind: &str, custom: CustomProviderConfig) -> Result<SharedProvider> {
        let target: ProviderKind = kind.parse()?;
        let same_kind = self.defaults.as_ref().filter(|(k, _)| *k == target);
        let defaults = self.defaults.as_ref().map(|(_, config)| config);

        let model = match (custom.model, same_kind) {
            (Some(model), _) => model,
            (None, Some((_, config))) => config.model.clone(),
            (None, None) => default_model_for(kind)?.to_string(),
        };

        let mut config = ProviderConfig::new(custom.api_key, model);
        config.base_url = custom
            .base_url
            .or_else(|| same_kind.and_then(|(_, c)| c.base_url.clone()));
        config.organization_id = custom
            .organization_id
            .or_else(|| defaults.and_then(|c| c.organization_id.clone()));
        config.timeout = custom.timeout.or_else(|| defaults.and_then(|c| c.timeout));

        create_provider(kind, config)
    }
}

impl From<SharedProvider> for AiContext {
    fn from(provider: SharedProvider) -> Self {
        Self::new(provider)
    }
}

impl std::fmt::Debug for AiContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiContext")
            .field("provider", &self.provider.name())
            .field("model", &self.provider.model())
            .finish()
    }
}

/// Buffered generation through `provider`
pub async fn generate_text_with(provider: &dyn Provider, options: RequestOptions) -> Result<String> {
    provider.generate(options).await
}

/// Streamed generation through `provider`; `stream` is always set
pub async fn generate_text_stream_with(
    provider: &dyn Provider,
    mut options: RequestOptions,
) -> GenerationStream {
    options.stream = true;
    provider.generate_stream(options).await
}

/// Convenience for wrapping a concrete provider
pub fn shared<P: Provider + 'static>(provider: P) -> SharedProvider {
    Arc::new(provider)
}
