// # IP Source Trait
//
// Defines the interface for discovering the host's current public IP.
//
// ## Implementations
//
// - HTTP echo service: `ddns-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::IpSource;
//
// let ip = source.current().await?;
// println!("public IP: {}", ip);
// ```

use async_trait::async_trait;

/// Trait for IP source implementations
///
/// Each call to [`IpSource::current`] performs a fresh lookup; nothing is
/// cached between cycles.
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Get the current public IP address as text
    ///
    /// The value is compared verbatim against the DNS record content, so
    /// implementations return it trimmed but otherwise unmodified.
    async fn current(&self) -> Result<String, crate::Error>;

    /// Get the source name (for logging/debugging)
    fn source_name(&self) -> &'static str;
}
