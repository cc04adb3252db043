// # ddnsd - DDNS Daemon
//
// Keeps one Cloudflare A record pointed at this host's public IPv4 address.
//
// This is a THIN integration layer: it reads configuration, sets up logging
// and the runtime, wires the components into a `DdnsEngine` and turns the
// outcome into an exit code. All DDNS logic lives in ddns-core.
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// ### Required
// - `CLOUDFLARE_API_TOKEN`: API token
// - `CLOUDFLARE_ZONE_ID`: Zone ID
// - `CLOUDFLARE_RECORD_NAME`: Record to keep updated
// - `CHECK_PUBLIC_IP_INTERVAL`: Milliseconds between checks
//
// ### Optional
// - `DDNS_IP_SOURCE_URL`: IP echo service URL
// - `DDNS_FAILURE_POLICY`: `exit` (default) or `skip`
// - `DDNS_MODE`: `dry-run` to skip updates
// - `DDNS_LOG_LEVEL`: trace, debug, info, warn, error
//
// ## Example
//
// ```bash
// export CLOUDFLARE_API_TOKEN=your_token
// export CLOUDFLARE_ZONE_ID=your_zone_id
// export CLOUDFLARE_RECORD_NAME=home.example.com
// export CHECK_PUBLIC_IP_INTERVAL=60000
//
// ddnsd
// ```

use anyhow::{Context, Result};
use chrono::{DateTime, Local, TimeZone};
use ddns_core::{DdnsConfig, DdnsEngine, IntervalTicker};
use ddns_ip_http::HttpIpSource;
use ddns_provider_cloudflare::CloudflareProvider;
use std::fmt::Display;
use std::process::ExitCode;
use tokio::sync::oneshot;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// - 0: Stopped by SIGINT/SIGTERM
/// - 1: Configuration error or failed check cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DdnsExitCode {
    /// Clean shutdown (external termination)
    CleanShutdown = 0,
    /// Any fatal condition
    Fatal = 1,
}

impl From<DdnsExitCode> for ExitCode {
    fn from(code: DdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Log timestamp in local time, e.g. `Tue 02 15:04:05.000000`
struct LocalTimestamp;

impl FormatTime for LocalTimestamp {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", format_timestamp(&Local::now()))
    }
}

fn format_timestamp<Tz>(time: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    time.format("%a %d %H:%M:%S%.6f").to_string()
}

fn init_tracing(level: Level) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_timer(LocalTimestamp)
        .with_writer(std::io::stdout)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")
}

fn main() -> ExitCode {
    // Logging comes up first so configuration errors are logged like everything else
    let config = DdnsConfig::from_env();
    let log_level = config.as_ref().map_or(Level::INFO, |c| c.log_level);

    if let Err(e) = init_tracing(log_level) {
        eprintln!("{:#}", e);
        return DdnsExitCode::Fatal.into();
    }

    let config = match config {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("{}", e);
            return DdnsExitCode::Fatal.into();
        }
    };

    info!("Starting ddnsd daemon");
    info!(
        "Managing record {} every {:?}{}",
        config.record_name,
        config.check_interval,
        if config.dry_run { " [DRY-RUN]" } else { "" }
    );

    // Single thread of control: every call is awaited in sequence
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DdnsExitCode::Fatal.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run_daemon(&config).await {
            error!("{:#}", e);
            DdnsExitCode::Fatal
        } else {
            DdnsExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Run the daemon
///
/// Returns `Ok` only after a shutdown signal.
async fn run_daemon(config: &DdnsConfig) -> Result<()> {
    let ip_source =
        HttpIpSource::from_config(config).context("Failed to initialize the IP source")?;
    let provider = CloudflareProvider::from_config(config)
        .context("Failed to initialize the Cloudflare provider")?;

    let mut engine = DdnsEngine::new(
        Box::new(ip_source),
        Box::new(provider),
        Box::new(IntervalTicker::new(config.check_interval)),
        config,
    );

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let run = engine.run_with_shutdown(Some(shutdown_rx));
    tokio::pin!(run);

    let signal = tokio::select! {
        result = &mut run => {
            return result.context("DNS check failed");
        }
        signal = wait_for_shutdown() => signal?,
    };

    info!("Received shutdown signal: {}", signal);

    // Let an in-flight cycle finish before the engine stops
    let _ = shutdown_tx.send(());
    run.await.context("DNS check failed")?;

    info!("Shutting down daemon");
    Ok(())
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
///
/// # Returns
///
/// Returns the name of the signal received.
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm =
        signal(SignalKind::terminate()).context("Failed to setup SIGTERM handler")?;
    let mut sigint = signal(SignalKind::interrupt()).context("Failed to setup SIGINT handler")?;

    Ok(tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    })
}

/// Wait for shutdown signals (SIGINT only)
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .context("Failed to wait for CTRL-C")?;
    Ok("SIGINT")
}
