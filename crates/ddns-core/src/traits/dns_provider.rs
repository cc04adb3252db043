// # DNS Provider Trait
//
// Defines the interface for reading and updating a DNS record via a
// provider API.
//
// ## Implementations
//
// - Cloudflare: `ddns-provider-cloudflare` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::DnsProvider;
//
// let record = provider.get_record("home.example.com").await?;
// if record.content != "203.0.113.9" {
//     provider
//         .update_record(&record.id, "home.example.com", "203.0.113.9")
//         .await?;
// }
// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A DNS record as returned by the provider
///
/// Snapshot of one record, fetched fresh on every cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Provider-assigned record ID
    pub id: String,
    /// Record type, e.g. "A"
    #[serde(rename = "type")]
    pub record_type: String,
    /// Fully-qualified record name
    pub name: String,
    /// Record content (an IPv4 literal for A records)
    pub content: String,
}

/// Trait for DNS provider implementations
///
/// Providers are single-shot: each call makes its HTTP request and returns.
/// They never retry, sleep, or cache; the engine owns scheduling and the
/// decision of whether an update is needed.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Fetch the record with the given name
    ///
    /// Returns the first match when the provider lists several.
    ///
    /// # Errors
    ///
    /// - `Error::NotFound` if the listing is empty
    /// - transport, decode or provider errors otherwise
    async fn get_record(&self, record_name: &str) -> Result<DnsRecord, crate::Error>;

    /// Replace the content of an A record with `new_ip`
    ///
    /// # Parameters
    ///
    /// - `record_id`: ID from a prior [`DnsProvider::get_record`]
    /// - `record_name`: Fully-qualified record name
    /// - `new_ip`: New record content
    ///
    /// # Returns
    ///
    /// The record as stored by the provider after the update.
    async fn update_record(
        &self,
        record_id: &str,
        record_name: &str,
        new_ip: &str,
    ) -> Result<DnsRecord, crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_ignores_unknown_fields() {
        let json = r#"{
            "id": "abc",
            "zone_id": "zone123",
            "type": "A",
            "name": "home.example.com",
            "content": "203.0.113.1",
            "proxied": false,
            "ttl": 1,
            "locked": false
        }"#;

        let record: DnsRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, "abc");
        assert_eq!(record.record_type, "A");
        assert_eq!(record.content, "203.0.113.1");
    }
}
