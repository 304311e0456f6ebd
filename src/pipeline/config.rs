//! Pipeline configuration.
//!
//! An explicit struct handed to the controller at construction, so the core
//! stays unit-testable without process-level state. Invalid values fail
//! fast at startup, before any event processing begins.

use anyhow::{bail, Result};
use std::path::PathBuf;

/// Pump.fun bonding-curve program, the default watched launch program.
pub const PUMP_FUN_PROGRAM: &str = "6EF8rrecthR5Dkzon8Nwu78hRvfCKubJ14M5uBEwF6P";

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Maximum pending events held before drop-oldest eviction kicks in
    pub queue_capacity: usize,
    /// Desired resolutions per second (the worker floors this at 5/s)
    pub resolve_rate_per_sec: u32,
    /// Log the running overflow counter every Nth dropped event
    pub drop_report_every: u64,
    /// HTTP RPC endpoint for transaction and mint lookups
    pub rpc_http_url: String,
    /// WebSocket endpoint for the launch feed subscription
    pub rpc_ws_url: String,
    /// Program whose transactions the feed watches
    pub watched_program: String,
    /// Append-only launch log path
    pub log_path: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 512,
            resolve_rate_per_sec: 2,
            drop_report_every: 25,
            rpc_http_url: "https://api.mainnet-beta.solana.com".to_string(),
            rpc_ws_url: "wss://api.mainnet-beta.solana.com".to_string(),
            watched_program: PUMP_FUN_PROGRAM.to_string(),
            log_path: PathBuf::from("launches.log"),
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.queue_capacity == 0 {
            bail!("queue_capacity must be at least 1");
        }
        if self.resolve_rate_per_sec == 0 {
            bail!("resolve_rate_per_sec must be at least 1");
        }
        if self.drop_report_every == 0 {
            bail!("drop_report_every must be at least 1");
        }
        if self.rpc_http_url.is_empty() {
            bail!("rpc_http_url must not be empty");
        }
        if self.watched_program.is_empty() {
            bail!("watched_program must not be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_capacity_fails_fast() {
        let config = PipelineConfig {
            queue_capacity: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_rate_fails_fast() {
        let config = PipelineConfig {
            resolve_rate_per_sec: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_drop_report_interval_fails_fast() {
        let config = PipelineConfig {
            drop_report_every: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
