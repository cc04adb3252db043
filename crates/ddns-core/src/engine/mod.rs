//! Core DDNS engine
//!
//! The DdnsEngine is responsible for:
//! - Resolving the public IP via IpSource
//! - Reading the current DNS record via DnsProvider
//! - Updating the record when the two differ
//! - Waiting one interval via Ticker, then repeating
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐         ┌──────────────┐         ┌─────────────┐
//! │  IpSource   │──ip────▶│ DdnsEngine   │◀─record─│ DnsProvider │
//! └─────────────┘         └──────────────┘         └─────────────┘
//!                           │          │                  ▲
//!                           │          └──update (if ≠)───┘
//!                           ▼
//!                     ┌─────────────┐
//!                     │   Ticker    │
//!                     │  (sleep)    │
//!                     └─────────────┘
//! ```
//!
//! ## Cycle
//!
//! 1. Idle: resolve public IP, fetch DNS record
//! 2. Comparing: record content vs. public IP
//! 3. Updating: only when they differ, exactly one update call
//! 4. Sleeping: one tick, then back to 1

use crate::config::{DdnsConfig, FailurePolicy};
use crate::error::Result;
use crate::traits::{DnsProvider, IpSource, Ticker};
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;
use tracing::{debug, error, info};

/// Result of a single check cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Record already pointed at the public IP
    Unchanged {
        /// The current IP
        ip: String,
    },
    /// Record was updated
    Updated {
        /// Record content before the update
        previous: String,
        /// New record content
        current: String,
    },
}

/// Core DDNS engine
///
/// ## Lifecycle
///
/// 1. Create with [`DdnsEngine::new()`]
/// 2. Start with [`DdnsEngine::run()`]
/// 3. Engine runs until a cycle fails under [`FailurePolicy::Exit`],
///    or forever otherwise
///
/// ## Threading
///
/// Everything happens on the calling task. The engine spawns nothing.
pub struct DdnsEngine {
    /// IP source for the public address
    ip_source: Box<dyn IpSource>,

    /// DNS provider for reading and updating the record
    provider: Box<dyn DnsProvider>,

    /// Scheduler between cycles
    ticker: Box<dyn Ticker>,

    /// DNS record to manage
    record_name: String,

    /// What to do with a failed cycle
    failure_policy: FailurePolicy,
}

impl DdnsEngine {
    /// Create a new DDNS engine
    ///
    /// Only `record_name` and `failure_policy` are taken from `config`;
    /// credentials and URLs belong to the components.
    pub fn new(
        ip_source: Box<dyn IpSource>,
        provider: Box<dyn DnsProvider>,
        ticker: Box<dyn Ticker>,
        config: &DdnsConfig,
    ) -> Self {
        Self {
            ip_source,
            provider,
            ticker,
            record_name: config.record_name.clone(),
            failure_policy: config.failure_policy,
        }
    }

    /// Run the polling loop
    ///
    /// Never returns `Ok`: without a shutdown receiver the loop only ends
    /// on a failed cycle. Use [`DdnsEngine::run_with_shutdown()`] to stop it.
    ///
    /// # Returns
    ///
    /// - `Err(Error)`: A cycle failed under [`FailurePolicy::Exit`]
    pub async fn run(&mut self) -> Result<()> {
        self.run_with_shutdown(None).await
    }

    /// Run the polling loop until `shutdown_rx` fires
    ///
    /// The signal is checked before each cycle and raced against the sleep.
    /// A cycle that has started always runs to completion, so an update
    /// already sent to the provider is never abandoned.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Shutdown signal received
    /// - `Err(Error)`: A cycle failed under [`FailurePolicy::Exit`]
    pub async fn run_with_shutdown(
        &mut self,
        mut shutdown_rx: Option<oneshot::Receiver<()>>,
    ) -> Result<()> {
        info!(
            "Monitoring {} via {} / {}",
            self.record_name,
            self.ip_source.source_name(),
            self.provider.provider_name()
        );

        loop {
            if shutdown_requested(&mut shutdown_rx) {
                break;
            }

            if let Err(e) = self.check_once().await {
                match self.failure_policy {
                    FailurePolicy::Exit => return Err(e),
                    FailurePolicy::Skip => {
                        error!("Check cycle failed, retrying next interval: {}", e);
                    }
                }
            }

            match shutdown_rx.as_mut() {
                Some(rx) => {
                    tokio::select! {
                        biased;

                        // A dropped sender counts as a shutdown request too
                        _ = rx => break,

                        _ = self.ticker.tick() => {}
                    }
                }
                None => self.ticker.tick().await,
            }
        }

        info!("Shutdown signal received, engine stopped");
        Ok(())
    }

    /// Perform a single check cycle
    ///
    /// Resolves the public IP, fetches the record and updates it if the
    /// content differs. Issues at most one update call.
    pub async fn check_once(&self) -> Result<CycleOutcome> {
        info!("Checking public IP.");

        let public_ip = self.ip_source.current().await?;

        let record = self.provider.get_record(&self.record_name).await?;
        debug!(
            "Current record {} ({}): {} -> {}",
            record.name, record.id, record.record_type, record.content
        );

        if record.content == public_ip {
            info!("Public IP same as DNS record.");
            return Ok(CycleOutcome::Unchanged { ip: public_ip });
        }

        info!(
            "Public IP has changed from {} to {}",
            record.content, public_ip
        );
        info!("Updating DNS record.");

        self.provider
            .update_record(&record.id, &self.record_name, &public_ip)
            .await?;

        Ok(CycleOutcome::Updated {
            previous: record.content,
            current: public_ip,
        })
    }
}

/// Whether a shutdown was signalled (or its sender dropped) before now
fn shutdown_requested(shutdown_rx: &mut Option<oneshot::Receiver<()>>) -> bool {
    match shutdown_rx.as_mut().map(|rx| rx.try_recv()) {
        None | Some(Err(TryRecvError::Empty)) => false,
        Some(Ok(())) | Some(Err(TryRecvError::Closed)) => true,
    }
}
