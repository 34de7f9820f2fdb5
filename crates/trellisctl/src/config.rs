//! TOML configuration for `trellisctl`.
//!
//! Every section is optional. Without a config file the client talks to a
//! log service on `localhost:8090` with default timeouts and retries.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;
use trellis_canon::{CanonicalEncoder, KeyOrder};
use trellis_client::{ConnectionOptions, RetryPolicy};

/// Top-level configuration, parsed from TOML.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Where the log service listens.
    pub service: ServiceSection,
    /// Per-call timeouts.
    pub rpc: RpcSection,
    /// Retry of transient failures.
    pub retry: RetryPolicy,
    /// Canonical record encoding.
    pub canon: CanonSection,
    /// Logging configuration.
    pub log: LogSection,
}

/// `[service]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServiceSection {
    pub host: String,
    pub port: u16,
}

impl Default for ServiceSection {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8090,
        }
    }
}

/// `[rpc]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RpcSection {
    /// Upper bound on each call (e.g. `"10s"`, `"500ms"`).
    #[serde(with = "humantime_serde")]
    pub deadline: Duration,
    /// Upper bound on establishing the connection.
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Duration,
}

impl Default for RpcSection {
    fn default() -> Self {
        let defaults = ConnectionOptions::default();
        Self {
            deadline: defaults.deadline,
            connect_timeout: defaults.connect_timeout,
        }
    }
}

/// `[canon]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CanonSection {
    /// `"descending"` (default) or `"ascending"`.
    pub key_order: KeyOrder,
}

/// `[log]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LogSection {
    /// Log level filter (e.g. `"info"`, `"debug"`, `"warn"`).
    pub level: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl CliConfig {
    /// Load config from `path`, or from the per-user config file when it
    /// exists, or fall back to defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match default_path().filter(|p| p.is_file()) {
                Some(p) => p,
                None => return Ok(Self::default()),
            },
        };
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Parse config from a TOML string (used in tests).
    #[cfg(test)]
    pub fn from_toml(s: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Timeouts and retry policy for the clients.
    pub fn connection_options(&self) -> ConnectionOptions {
        ConnectionOptions {
            deadline: self.rpc.deadline,
            connect_timeout: self.rpc.connect_timeout,
            retry: self.retry,
        }
    }

    /// Encoder used for `queue` records.
    pub fn encoder(&self) -> CanonicalEncoder {
        CanonicalEncoder::new(self.canon.key_order)
    }
}

/// `~/.config/trellis/trellisctl.toml` on Linux, the platform equivalent elsewhere.
fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("trellis").join("trellisctl.toml"))
}
