//! Error types for model access.

use thiserror::Error;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to a model provider.
#[derive(Debug, Error)]
pub enum Error {
    /// Credentials not found for provider.
    #[error("credentials not found for provider: {0}")]
    CredentialsNotFound(String),

    /// Failed to access system keyring.
    #[error("keyring error: {0}")]
    Keyring(String),

    /// Provider API error (non-success status or error payload).
    #[error("provider API error: {0}")]
    ProviderApi(String),

    /// Request failed before a response was received.
    #[error("request failed: {0}")]
    Request(String),

    /// The provider answered without any usable content.
    #[error("provider returned an empty response")]
    EmptyResponse,

    /// Model output did not match the declared result shape.
    #[error("invalid structured output: {0}")]
    InvalidStructuredOutput(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the failure came from the model's output rather than transport.
    pub fn is_output_error(&self) -> bool {
        matches!(
            self,
            Error::EmptyResponse | Error::InvalidStructuredOutput(_) | Error::Serialization(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formats_correctly() {
        let err = Error::ProviderApi("429 Too Many Requests".to_string());
        assert_eq!(err.to_string(), "provider API error: 429 Too Many Requests");
    }

    #[test]
    fn error_from_serde_json() {
        let json_err: serde_json::Error = serde_json::from_str::<String>("invalid").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Serialization(_)));
        assert!(err.is_output_error());
    }

    #[test]
    fn transport_errors_are_not_output_errors() {
        assert!(!Error::Request("connection refused".into()).is_output_error());
        assert!(!Error::ProviderApi("500".into()).is_output_error());
        assert!(Error::EmptyResponse.is_output_error());
    }
}
