//! Error types for the DDNS system
//!
//! Every component returns [`Result`]; only the daemon decides whether an
//! error terminates the process.

use thiserror::Error;

/// Result type alias for DDNS operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the DDNS system
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or malformed configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// DNS resolution, connect, TLS, timeout or body read failures
    #[error("Transport error: {0}")]
    Transport(String),

    /// Non-success HTTP status that doesn't fit a more specific variant
    #[error("HTTP error: {0}")]
    Http(String),

    /// Credential rejected by the provider (401/403)
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Provider rate limit hit (429)
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Response body was not valid JSON for the expected envelope
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Lookup succeeded but returned nothing
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Provider-reported failure (`success: false`)
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a rate limit error
    pub fn rate_limited(msg: impl Into<String>) -> Self {
        Self::RateLimited(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Whether this error came from configuration rather than a running cycle
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_display() {
        let err = Error::provider("cloudflare", "9109: Invalid access token");
        assert_eq!(
            err.to_string(),
            "Provider error (cloudflare): 9109: Invalid access token"
        );
    }

    #[test]
    fn test_decode_error_from_serde() {
        let serde_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: Error = serde_err.into();
        assert!(matches!(err, Error::Decode(_)));
        assert!(err.to_string().starts_with("Decode error:"));
    }

    #[test]
    fn test_is_config() {
        assert!(Error::config("missing").is_config());
        assert!(!Error::transport("reset").is_config());
    }
}
