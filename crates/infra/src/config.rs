//! Configuration loading and representation.
//!
//! All settings come from environment variables with development defaults.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

use retailpulse_inventory::SurplusPolicy;
use retailpulse_observability::LogFormat;

pub const ENV_DATA_DIR: &str = "RETAILPULSE_DATA_DIR";
pub const ENV_BIND_ADDR: &str = "RETAILPULSE_BIND_ADDR";
pub const ENV_SURPLUS_POLICY: &str = "RETAILPULSE_SURPLUS_POLICY";
pub const ENV_DEMAND_SAMPLE_ROWS: &str = "RETAILPULSE_DEMAND_SAMPLE_ROWS";
pub const ENV_LOG_FORMAT: &str = "RETAILPULSE_LOG_FORMAT";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid value for {key}: '{value}' ({reason})")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Directory holding the three CSV files.
    pub data_dir: PathBuf,
    pub bind_addr: SocketAddr,
    pub surplus_policy: SurplusPolicy,
    /// Rows returned by the demand sample view when the request does not say.
    pub demand_sample_rows: usize,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            surplus_policy: SurplusPolicy::Shared,
            demand_sample_rows: 5,
            log_format: LogFormat::Json,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (unset keys keep defaults).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut cfg = Self::default();

        if let Some(dir) = lookup(ENV_DATA_DIR) {
            cfg.data_dir = PathBuf::from(dir);
        }
        if let Some(addr) = lookup(ENV_BIND_ADDR) {
            cfg.bind_addr = parse(ENV_BIND_ADDR, &addr)?;
        }
        if let Some(policy) = lookup(ENV_SURPLUS_POLICY) {
            cfg.surplus_policy = parse(ENV_SURPLUS_POLICY, &policy)?;
        }
        if let Some(rows) = lookup(ENV_DEMAND_SAMPLE_ROWS) {
            cfg.demand_sample_rows = parse(ENV_DEMAND_SAMPLE_ROWS, &rows)?;
        }
        if let Some(format) = lookup(ENV_LOG_FORMAT) {
            cfg.log_format = parse(ENV_LOG_FORMAT, &format)?;
        }

        Ok(cfg)
    }
}

fn parse<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: core::str::FromStr,
    T::Err: core::fmt::Display,
{
    value.trim().parse::<T>().map_err(|e| ConfigError {
        key,
        value: value.to_string(),
        reason: e.to_string(),
    })
}
