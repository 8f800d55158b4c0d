//! Error types for the aigen facade

use std::error::Error as StdError;
use std::time::Duration;
use thiserror::Error;

/// Boxed underlying error
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// The main error type for all facade operations
///
/// Variants split into two families. [`Error::Configuration`] and
/// [`Error::UnsupportedProvider`] are raised while constructing a provider;
/// everything else is raised by a generation call.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Transport-level failure talking to a vendor
    #[error("Network error: {message}")]
    Network {
        /// Error message
        message: String,
        /// Underlying error if available
        #[source]
        source: Option<BoxError>,
    },

    /// The vendor answered with an error status or an error frame
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name (e.g., "openai", "anthropic")
        provider: String,
        /// HTTP status code, when the error came from a response status
        status: Option<u16>,
        /// Error message
        message: String,
        /// Time to wait before retrying (for rate limits)
        retry_after: Option<Duration>,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message
        message: String,
        /// Underlying error if available
        #[source]
        source: Option<BoxError>,
    },

    /// Request options failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Timeout errors
    #[error("Operation timed out")]
    Timeout,

    /// Invalid or missing provider configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The requested provider type is not known
    #[error("Unsupported AI provider type: {0}")]
    UnsupportedProvider(String),

    /// A stream ended with a terminal error event
    #[error("Stream error: {0}")]
    Stream(String),
}

impl Error {
    /// Whether this error was raised while constructing a provider
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration(_) | Error::UnsupportedProvider(_))
    }

    /// Rate-limit hint attached by the vendor, if any
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Error::Provider { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

/// Result type alias for facade operations
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Network {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_error_display() {
        let error = Error::Network {
            message: "Connection refused".into(),
            source: None,
        };
        assert_eq!(error.to_string(), "Network error: Connection refused");

        let error = Error::Provider {
            provider: "openai".into(),
            status: Some(429),
            message: "Rate limit exceeded".into(),
            retry_after: Some(Duration::from_secs(60)),
        };
        assert_eq!(
            error.to_string(),
            "Provider error (openai): Rate limit exceeded"
        );

        let error = Error::Validation("temperature must be within [0, 1]".into());
        assert_eq!(
            error.to_string(),
            "Validation error: temperature must be within [0, 1]"
        );

        let error = Error::UnsupportedProvider("azure".into());
        assert_eq!(error.to_string(), "Unsupported AI provider type: azure");

        let error = Error::Configuration("missing API key".into());
        assert_eq!(error.to_string(), "Configuration error: missing API key");

        assert_eq!(Error::Timeout.to_string(), "Operation timed out");
        assert_eq!(
            Error::Stream("connection reset".into()).to_string(),
            "Stream error: connection reset"
        );
    }

    #[test]
    fn test_error_source() {
        let error = Error::Network {
            message: "Connection failed".into(),
            source: None,
        };
        assert!(error.source().is_none());

        let io_error = io::Error::new(io::ErrorKind::ConnectionRefused, "refused");
        let error = Error::Network {
            message: "Connection failed".into(),
            source: Some(Box::new(io_error)),
        };
        assert!(error.source().is_some());

        let json_error = serde_json::from_str::<String>("invalid").unwrap_err();
        let error: Error = json_error.into();
        assert!(error.source().is_some());

        assert!(Error::Timeout.source().is_none());
    }

    #[test]
    fn test_configuration_family() {
        assert!(Error::Configuration("x".into()).is_configuration());
        assert!(Error::UnsupportedProvider("azure".into()).is_configuration());
        assert!(!Error::Timeout.is_configuration());
        assert!(!Error::Validation("x".into()).is_configuration());
    }

    #[test]
    fn test_retry_after() {
        let error = Error::Provider {
            provider: "anthropic".into(),
            status: Some(429),
            message: "slow down".into(),
            retry_after: Some(Duration::from_secs(30)),
        };
        assert_eq!(error.retry_after(), Some(Duration::from_secs(30)));
        assert_eq!(Error::Timeout.retry_after(), None);
    }

    #[test]
    fn test_error_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::ConnectionRefused, "Connection refused");
        let error: Error = io_error.into();

        match error {
            Error::Network { message, source } => {
                assert!(message.contains("Connection refused"));
                assert!(source.is_some());
            }
            _ => panic!("Expected Network error"),
        }
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }
}
