//! Test doubles and common utilities for engine contract tests
//!
//! The doubles record every call so tests can assert on exactly what the
//! engine asked of its components.

#![allow(dead_code)]

use async_trait::async_trait;
use ddns_core::error::{Error, Result};
use ddns_core::traits::{DnsProvider, DnsRecord, IpSource, Ticker};
use ddns_core::{DdnsConfig, FailurePolicy};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;

/// An IpSource that returns a fixed answer
pub struct StaticIpSource {
    /// IP to return, or None to fail
    ip: Option<String>,
    /// Call counter for current()
    call_count: Arc<AtomicUsize>,
}

impl StaticIpSource {
    pub fn new(ip: &str) -> Self {
        Self {
            ip: Some(ip.to_string()),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A source whose lookups always fail with a transport error
    pub fn failing() -> Self {
        Self {
            ip: None,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the number of times current() was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Create a new StaticIpSource that shares counters with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            ip: other.ip.clone(),
            call_count: Arc::clone(&other.call_count),
        }
    }
}

#[async_trait]
impl IpSource for StaticIpSource {
    async fn current(&self) -> Result<String> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.ip
            .clone()
            .ok_or_else(|| Error::transport("connection refused"))
    }

    fn source_name(&self) -> &'static str {
        "static"
    }
}

/// One recorded update call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateCall {
    pub record_id: String,
    pub record_name: String,
    pub new_ip: String,
}

/// A mock DnsProvider that serves one record and tracks calls
pub struct MockDnsProvider {
    /// Record returned by get_record(), None for an empty listing
    record: Option<DnsRecord>,
    /// Whether update_record() reports a provider failure
    fail_updates: bool,
    /// Time each update_record() call takes
    update_delay: Duration,
    /// Number of update_record() calls that ran to completion
    completed_updates: Arc<AtomicUsize>,
    /// Call counter for get_record()
    lookup_count: Arc<AtomicUsize>,
    /// Recorded update_record() calls
    updates: Arc<Mutex<Vec<UpdateCall>>>,
}

impl MockDnsProvider {
    pub fn with_record(id: &str, name: &str, content: &str) -> Self {
        Self {
            record: Some(DnsRecord {
                id: id.to_string(),
                record_type: "A".to_string(),
                name: name.to_string(),
                content: content.to_string(),
            }),
            fail_updates: false,
            update_delay: Duration::ZERO,
            completed_updates: Arc::new(AtomicUsize::new(0)),
            lookup_count: Arc::new(AtomicUsize::new(0)),
            updates: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A provider whose listing is always empty
    pub fn empty() -> Self {
        Self {
            record: None,
            fail_updates: false,
            update_delay: Duration::ZERO,
            completed_updates: Arc::new(AtomicUsize::new(0)),
            lookup_count: Arc::new(AtomicUsize::new(0)),
            updates: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Make every update_record() call fail
    pub fn failing_updates(mut self) -> Self {
        self.fail_updates = true;
        self
    }

    /// Make every update_record() call take `delay` before answering
    pub fn slow_updates(mut self, delay: Duration) -> Self {
        self.update_delay = delay;
        self
    }

    /// Get the number of update_record() calls that finished
    pub fn completed_updates(&self) -> usize {
        self.completed_updates.load(Ordering::SeqCst)
    }

    /// Get the number of times get_record() was called
    pub fn lookup_count(&self) -> usize {
        self.lookup_count.load(Ordering::SeqCst)
    }

    /// Get the recorded update calls
    pub fn updates(&self) -> Vec<UpdateCall> {
        self.updates.lock().unwrap().clone()
    }

    /// Create a new MockDnsProvider that shares counters with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            record: other.record.clone(),
            fail_updates: other.fail_updates,
            update_delay: other.update_delay,
            completed_updates: Arc::clone(&other.completed_updates),
            lookup_count: Arc::clone(&other.lookup_count),
            updates: Arc::clone(&other.updates),
        }
    }
}

#[async_trait]
impl DnsProvider for MockDnsProvider {
    async fn get_record(&self, record_name: &str) -> Result<DnsRecord> {
        self.lookup_count.fetch_add(1, Ordering::SeqCst);
        self.record
            .clone()
            .ok_or_else(|| Error::not_found(format!("DNS record not found: {}", record_name)))
    }

    async fn update_record(
        &self,
        record_id: &str,
        record_name: &str,
        new_ip: &str,
    ) -> Result<DnsRecord> {
        self.updates.lock().unwrap().push(UpdateCall {
            record_id: record_id.to_string(),
            record_name: record_name.to_string(),
            new_ip: new_ip.to_string(),
        });

        if !self.update_delay.is_zero() {
            tokio::time::sleep(self.update_delay).await;
        }
        self.completed_updates.fetch_add(1, Ordering::SeqCst);

        if self.fail_updates {
            return Err(Error::provider("mock", "1004: DNS Validation Error"));
        }

        Ok(DnsRecord {
            id: record_id.to_string(),
            record_type: "A".to_string(),
            name: record_name.to_string(),
            content: new_ip.to_string(),
        })
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// A Ticker that returns immediately and counts ticks
///
/// When built with [`CountingTicker::stop_after`], it fires the shutdown
/// sender on the n-th tick so the loop ends deterministically.
pub struct CountingTicker {
    ticks: Arc<AtomicUsize>,
    stop_at: usize,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl CountingTicker {
    pub fn new() -> Self {
        Self {
            ticks: Arc::new(AtomicUsize::new(0)),
            stop_at: usize::MAX,
            shutdown_tx: None,
        }
    }

    /// Request shutdown on tick number `n` (1-based)
    pub fn stop_after(n: usize) -> (Self, oneshot::Receiver<()>) {
        let (tx, rx) = oneshot::channel();
        let ticker = Self {
            ticks: Arc::new(AtomicUsize::new(0)),
            stop_at: n,
            shutdown_tx: Some(tx),
        };
        (ticker, rx)
    }

    /// Shared handle on the tick counter
    pub fn counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.ticks)
    }
}

#[async_trait]
impl Ticker for CountingTicker {
    async fn tick(&mut self) {
        let n = self.ticks.fetch_add(1, Ordering::SeqCst) + 1;
        if n >= self.stop_at
            && let Some(tx) = self.shutdown_tx.take()
        {
            let _ = tx.send(());
        }
        tokio::task::yield_now().await;
    }
}

/// Helper to create a minimal DdnsConfig for testing
pub fn minimal_config(record_name: &str) -> DdnsConfig {
    DdnsConfig {
        api_token: "test-token".to_string(),
        zone_id: "zone123".to_string(),
        record_name: record_name.to_string(),
        check_interval: Duration::from_millis(5000),
        ip_source_url: ddns_core::config::DEFAULT_IP_SOURCE_URL.to_string(),
        failure_policy: FailurePolicy::Exit,
        dry_run: false,
        log_level: tracing::Level::INFO,
    }
}
