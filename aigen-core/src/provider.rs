//! Core provider trait for text generation

use crate::error::Result;
use crate::types::request::RequestOptions;
use crate::types::response::Completion;
use crate::types::stream::GenerationStream;
use async_trait::async_trait;
use std::sync::Arc;

/// A provider shared between callers
pub type SharedProvider = Arc<dyn Provider>;

/// The uniform generation contract every vendor adapter implements
///
/// Implementations hold only immutable configuration and a client handle, so
/// one instance can serve any number of concurrent calls.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Lowercase provider identifier (e.g., "openai")
    fn name(&self) -> &'static str;

    /// Model this instance sends requests to
    fn model(&self) -> &str;

    /// Send one buffered request and wait for the full response
    ///
    /// A successful response without text yields an empty `text`.
    async fn complete(&self, options: RequestOptions) -> Result<Completion>;

    /// Send one buffered request and return only the generated text
    async fn generate(&self, options: RequestOptions) -> Result<String> {
        Ok(self.complete(options).await?.text)
    }

    /// Start a streamed request
    ///
    /// This never fails directly: request, transport and vendor failures are
    /// delivered as the stream's terminal event. Must be called from within a
    /// Tokio runtime.
    async fn generate_stream(&self, options: RequestOptions) -> GenerationStream;
}

#[async_trait]
impl<P: Provider + ?Sized> Provider for Arc<P> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn model(&self) -> &str {
        (**self).model()
    }

    async fn complete(&self, options: RequestOptions) -> Result<Completion> {
        (**self).complete(options).await
    }

    async fn generate(&self, options: RequestOptions) -> Result<String> {
        (**self).generate(options).await
    }

    async fn generate_stream(&self, options: RequestOptions) -> GenerationStream {
        (**self).generate_stream(options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::stream::StreamEvent;
    use futures::StreamExt;

    struct Echo;

    #[async_trait]
    impl Provider for Echo {
        fn name(&self) -> &'static str {
            "echo"
        }

        fn model(&self) -> &str {
            "echo-1"
        }

        async fn complete(&self, options: RequestOptions) -> Result<Completion> {
            let last = options.messages().pop().map(|m| m.content).unwrap_or_default();
            Ok(Completion::text(last))
        }

        async fn generate_stream(&self, options: RequestOptions) -> GenerationStream {
            let text = self.generate(options).await.unwrap_or_default();
            GenerationStream::from_events([StreamEvent::chunk(text), StreamEvent::done()])
        }
    }

    #[tokio::test]
    async fn test_generate_defaults_to_completion_text() {
        let provider = Echo;
        let text = provider.generate(RequestOptions::new("ping")).await.unwrap();
        assert_eq!(text, "ping");
    }

    #[tokio::test]
    async fn test_shared_provider_delegates() {
        let provider: SharedProvider = Arc::new(Echo);
        assert_eq!(provider.name(), "echo");
        assert_eq!(provider.model(), "echo-1");

        let events: Vec<StreamEvent> = provider
            .generate_stream(RequestOptions::new("pong"))
            .await
            .collect()
            .await;
        assert_eq!(events, vec![StreamEvent::chunk("pong"), StreamEvent::done()]);
    }

    #[test]
    fn test_provider_is_object_safe() {
        fn assert_shared(_: &SharedProvider) {}
        let provider: SharedProvider = Arc::new(Echo);
        assert_shared(&provider);
    }
}
