//! Server configuration.
//!
//! Values come from an optional YAML file (named by `WIRELINE_CONFIG`) with
//! the listen address overridable through `LISTEN`. Every field has a default,
//! so a partial file is valid.

use anyhow::Context;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub limits: Limits,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
}

/// Bounds applied to every connection.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Longest accepted request or header line, terminator included.
    pub max_line_bytes: usize,
    /// Largest `Content-Length` accepted.
    pub max_body_bytes: usize,
    /// Maximum number of header lines in one request.
    pub max_headers: usize,
    /// Deadline for receiving one complete request. `None` waits forever.
    pub read_timeout_secs: Option<u64>,
    /// Deadline for flushing one complete response.
    pub write_timeout_secs: Option<u64>,
    /// Cap on concurrently served connections. `None` means one worker per
    /// accepted socket with no upper bound.
    pub max_connections: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
        }
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_line_bytes: 4096,
            max_body_bytes: 64 * 1024,
            max_headers: 100,
            read_timeout_secs: Some(30),
            write_timeout_secs: Some(30),
            max_connections: None,
        }
    }
}

impl Limits {
    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout_secs.map(Duration::from_secs)
    }

    pub fn write_timeout(&self) -> Option<Duration> {
        self.write_timeout_secs.map(Duration::from_secs)
    }
}

impl Config {
    /// Loads the file named by `WIRELINE_CONFIG` if set, then applies `LISTEN`.
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match std::env::var("WIRELINE_CONFIG") {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::default(),
        };

        if let Ok(addr) = std::env::var("LISTEN") {
            cfg.server.listen_addr = addr;
        }

        Ok(cfg)
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    pub fn from_yaml_str(raw: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }
}
