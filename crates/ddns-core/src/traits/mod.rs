//! Core traits for the DDNS system
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`IpSource`]: Discover the current public IP
//! - [`DnsProvider`]: Read and update a DNS record via a provider API
//! - [`Ticker`]: Wait between check cycles

pub mod ip_source;
pub mod dns_provider;
pub mod ticker;

pub use ip_source::IpSource;
pub use dns_provider::{DnsProvider, DnsRecord};
pub use ticker::Ticker;
