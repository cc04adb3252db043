//! Configuration for the DDNS daemon
//!
//! All configuration comes from environment variables. It is loaded once at
//! startup into an immutable [`DdnsConfig`] which is then passed by reference
//! to every component.
//!
//! ## Required
//!
//! - `CLOUDFLARE_API_TOKEN`: bearer token for the Cloudflare API
//! - `CLOUDFLARE_ZONE_ID`: zone holding the record
//! - `CLOUDFLARE_RECORD_NAME`: fully-qualified record name to keep updated
//! - `CHECK_PUBLIC_IP_INTERVAL`: milliseconds between checks (> 0)
//!
//! ## Optional
//!
//! - `DDNS_IP_SOURCE_URL`: IP echo endpoint (default `https://ipv4.icanhazip.com`)
//! - `DDNS_FAILURE_POLICY`: `exit` (default) or `skip`
//! - `DDNS_MODE`: `dry-run` to skip record updates
//! - `DDNS_LOG_LEVEL`: trace, debug, info (default), warn, error

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::Level;

pub const ENV_API_TOKEN: &str = "CLOUDFLARE_API_TOKEN";
pub const ENV_ZONE_ID: &str = "CLOUDFLARE_ZONE_ID";
pub const ENV_RECORD_NAME: &str = "CLOUDFLARE_RECORD_NAME";
pub const ENV_CHECK_INTERVAL: &str = "CHECK_PUBLIC_IP_INTERVAL";

pub const ENV_IP_SOURCE_URL: &str = "DDNS_IP_SOURCE_URL";
pub const ENV_FAILURE_POLICY: &str = "DDNS_FAILURE_POLICY";
pub const ENV_MODE: &str = "DDNS_MODE";
pub const ENV_LOG_LEVEL: &str = "DDNS_LOG_LEVEL";

/// Default public IP echo service (IPv4 only, plain text body)
pub const DEFAULT_IP_SOURCE_URL: &str = "https://ipv4.icanhazip.com";

/// What the engine does when a check cycle fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop the loop and surface the error (the daemon exits with status 1)
    #[default]
    Exit,
    /// Log the error and try again after the next interval
    Skip,
}

impl FromStr for FailurePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "exit" => Ok(Self::Exit),
            "skip" => Ok(Self::Skip),
            other => Err(Error::config(format!(
                "{} '{}' is not valid. Valid policies: exit, skip",
                ENV_FAILURE_POLICY, other
            ))),
        }
    }
}

/// Main DDNS configuration
#[derive(Clone)]
pub struct DdnsConfig {
    /// Cloudflare API token
    /// ⚠️ NEVER log this value
    pub api_token: String,

    /// Cloudflare zone ID
    pub zone_id: String,

    /// DNS record to monitor, e.g. "home.example.com"
    pub record_name: String,

    /// Time between check cycles
    pub check_interval: Duration,

    /// URL of the public IP echo service
    pub ip_source_url: String,

    /// Behavior when a cycle fails
    pub failure_policy: FailurePolicy,

    /// Perform lookups but never modify records
    pub dry_run: bool,

    /// Maximum log level
    pub log_level: Level,
}

// Custom Debug implementation that hides the API token
impl fmt::Debug for DdnsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DdnsConfig")
            .field("api_token", &"<REDACTED>")
            .field("zone_id", &self.zone_id)
            .field("record_name", &self.record_name)
            .field("check_interval", &self.check_interval)
            .field("ip_source_url", &self.ip_source_url)
            .field("failure_policy", &self.failure_policy)
            .field("dry_run", &self.dry_run)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl DdnsConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key/value lookup
    ///
    /// `from_env` delegates here; tests pass a closure over a map so they
    /// never have to mutate the real process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_token = required(&lookup, ENV_API_TOKEN)?;
        let zone_id = required(&lookup, ENV_ZONE_ID)?;
        let record_name = required(&lookup, ENV_RECORD_NAME)?;
        let check_interval = parse_interval(&required(&lookup, ENV_CHECK_INTERVAL)?)?;

        let ip_source_url = lookup(ENV_IP_SOURCE_URL)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_IP_SOURCE_URL.to_string());

        let failure_policy = match lookup(ENV_FAILURE_POLICY) {
            Some(value) => value.parse()?,
            None => FailurePolicy::default(),
        };

        let dry_run = lookup(ENV_MODE).is_some_and(|mode| mode.trim().to_lowercase() == "dry-run");

        let log_level = match lookup(ENV_LOG_LEVEL) {
            Some(value) => parse_log_level(&value)?,
            None => Level::INFO,
        };

        let config = Self {
            api_token,
            zone_id,
            record_name,
            check_interval,
            ip_source_url,
            failure_policy,
            dry_run,
            log_level,
        };
        config.validate()?;

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.check_interval.is_zero() {
            return Err(Error::config("Check interval must be greater than 0"));
        }

        if !self.ip_source_url.starts_with("https://") && !self.ip_source_url.starts_with("http://")
        {
            return Err(Error::config(format!(
                "{} must use HTTP or HTTPS scheme. Got: {}",
                ENV_IP_SOURCE_URL, self.ip_source_url
            )));
        }

        Ok(())
    }
}

fn required<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::config(format!("Environment variable not found: {}", key))),
    }
}

/// Parse a millisecond count into a positive [`Duration`]
pub fn parse_interval(value: &str) -> Result<Duration> {
    match value.trim().parse::<u64>() {
        Ok(ms) if ms > 0 => Ok(Duration::from_millis(ms)),
        _ => Err(Error::config(format!("Invalid check interval: {}", value))),
    }
}

fn parse_log_level(value: &str) -> Result<Level> {
    match value.trim().to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(Error::config(format!(
            "{} '{}' is not valid. Valid levels: trace, debug, info, warn, error",
            ENV_LOG_LEVEL, value
        ))),
    }
}
