//! Server configuration
//!
//! Loaded from a JSON file; every field has a default so a missing or
//! partial file still produces a working configuration. The default file
//! location is `<config dir>/f1t/config.json`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Default UDP listen port, matching the sim's default telemetry target.
pub const DEFAULT_PORT: u16 = 20777;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// UDP port to listen on, bound on all interfaces
    pub port: u16,
    pub forwarding: ForwardingConfig,
}

/// Raw-datagram relay target. Rebuilt whole on configuration change;
/// never partially updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForwardingConfig {
    pub enabled: bool,
    pub host: String,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            forwarding: ForwardingConfig::default(),
        }
    }
}

impl Default for ForwardingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl Config {
    /// Load configuration from `path`, or from the default location when
    /// None. A missing file yields the defaults; a malformed file is an
    /// error rather than a silent fallback.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Some(p) => p,
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("f1t").join("config.json"))
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}
