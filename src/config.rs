//! Configuration parsed from environment variables.
//!
//! All variables are optional:
//! - `POCKETLINKS_BACKEND`: `local` (default), `remote` or `memory`
//! - `POCKETLINKS_DATA_DIR`: directory of the slot database (platform data dir by default)
//! - `POCKETLINKS_SLOT`: slot name, default `pocket-links`
//! - `POCKETLINKS_ENDPOINT`: links URL for the remote backend
//! - `POCKETLINKS_REQUEST_TIMEOUT_SECS`: default 30
//! - `POCKETLINKS_CONNECT_TIMEOUT_SECS`: default 10

use std::path::PathBuf;
use std::time::Duration;

use crate::gateway::local::DEFAULT_SLOT;
use crate::gateway::remote::{DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_ENDPOINT, DEFAULT_REQUEST_TIMEOUT_SECS};
use crate::platform;
use crate::types::errors::ConfigError;

/// File name of the slot database inside the data directory.
pub const DB_FILE_NAME: &str = "pocketlinks.db";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Local,
    Remote,
    Memory,
}

impl Backend {
    fn parse(raw: &str) -> Result<Self, ConfigError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Backend::Local),
            "remote" => Ok(Backend::Remote),
            "memory" => Ok(Backend::Memory),
            _ => Err(ConfigError::InvalidBackend(raw.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub backend: Backend,
    pub data_dir: PathBuf,
    pub slot: String,
    pub endpoint: String,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Local,
            data_dir: platform::get_data_dir(),
            slot: DEFAULT_SLOT.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds config from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let backend = match get("POCKETLINKS_BACKEND") {
            Some(raw) => Backend::parse(&raw)?,
            None => defaults.backend,
        };

        Ok(Self {
            backend,
            data_dir: get("POCKETLINKS_DATA_DIR").map(PathBuf::from).unwrap_or(defaults.data_dir),
            slot: get("POCKETLINKS_SLOT").unwrap_or(defaults.slot),
            endpoint: get("POCKETLINKS_ENDPOINT").unwrap_or(defaults.endpoint),
            request_timeout_secs: parse_secs(
                "POCKETLINKS_REQUEST_TIMEOUT_SECS",
                get("POCKETLINKS_REQUEST_TIMEOUT_SECS"),
                defaults.request_timeout_secs,
            )?,
            connect_timeout_secs: parse_secs(
                "POCKETLINKS_CONNECT_TIMEOUT_SECS",
                get("POCKETLINKS_CONNECT_TIMEOUT_SECS"),
                defaults.connect_timeout_secs,
            )?,
        })
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

fn parse_secs(var: &str, raw: Option<String>, default: u64) -> Result<u64, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse::<u64>().map_err(|_| ConfigError::InvalidNumber {
            var: var.to_string(),
            value,
        }),
    }
}
