// # ddns-core
//
// Core library for the DDNS polling daemon.
//
// ## Architecture Overview
//
// This library provides the core functionality for dynamic DNS updates:
// - **IpSource**: Trait for discovering the current public IP
// - **DnsProvider**: Trait for reading and updating a DNS record via a provider API
// - **Ticker**: Trait for the wait between check cycles
// - **DdnsEngine**: Core loop that compares the two and updates on change
// - **DdnsConfig**: Immutable configuration loaded once from the environment
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Core logic is separate from HTTP implementations
// 2. **Typed Errors**: Components return `Result`; only the daemon decides to exit
// 3. **Library-First**: All core functionality can be used as a library

pub mod traits;
pub mod engine;
pub mod schedule;
pub mod config;
pub mod error;

// Re-export core types for convenience
pub use traits::{IpSource, DnsProvider, DnsRecord, Ticker};
pub use engine::{DdnsEngine, CycleOutcome};
pub use schedule::IntervalTicker;
pub use config::{DdnsConfig, FailurePolicy};
pub use error::{Error, Result};
