//! Core configuration types and loading.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use super::defaults::{
    default_encoding, default_event_capacity, default_queue_interval_ms, default_true,
};

/// Port used when the configuration does not name one.
pub const DEFAULT_PORT: u16 = 6667;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Client configuration as written by the user.
///
/// Only `host` and `nick` are required to connect; everything else has a
/// default that [`ClientConfig::resolve`] fills in.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Server hostname or address.
    #[serde(default)]
    pub host: String,
    /// Server port (default: 6667).
    pub port: Option<u16>,
    /// Desired nickname.
    #[serde(default)]
    pub nick: String,
    /// Username sent in USER (default: lowercased nick).
    pub ident: Option<String>,
    /// Real name sent in USER (default: nick).
    pub realname: Option<String>,
    /// Connection password sent as PASS before registration.
    pub password: Option<String>,
    /// Text encoding label for the wire (default: "utf-8").
    #[serde(default = "default_encoding")]
    pub encoding: String,
    /// Wrap the connection in TLS.
    #[serde(default)]
    pub tls: bool,
    /// Verify the server certificate against the system roots (default: true).
    /// Disable only for self-signed test servers.
    #[serde(default = "default_true")]
    pub tls_verify: bool,
    /// Minimum milliseconds between outbound lines after registration
    /// (default: 1000, 0 disables pacing).
    #[serde(default = "default_queue_interval_ms")]
    pub queue_interval_ms: u64,
    /// Give up on registration after this many seconds. Unset waits forever.
    pub registration_timeout_secs: Option<u64>,
    /// Event bus buffer per subscriber (default: 256).
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
    /// Channels joined by the `slirc` binary once registered.
    #[serde(default)]
    pub channels: Vec<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: None,
            nick: String::new(),
            ident: None,
            realname: None,
            password: None,
            encoding: default_encoding(),
            tls: false,
            tls_verify: default_true(),
            queue_interval_ms: default_queue_interval_ms(),
            registration_timeout_secs: None,
            event_capacity: default_event_capacity(),
            channels: Vec::new(),
        }
    }
}

impl ClientConfig {
    /// Configuration with a host and nick and every other field defaulted.
    pub fn new(host: impl Into<String>, nick: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            nick: nick.into(),
            ..Self::default()
        }
    }

    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: ClientConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Host and nick are both present.
    pub fn is_initialized(&self) -> bool {
        !self.host.is_empty() && !self.nick.is_empty()
    }

    /// Apply defaults, producing the snapshot used for one connection attempt.
    pub fn resolve(&self) -> ResolvedConfig {
        let ident = match self.ident.as_deref() {
            Some(ident) if !ident.is_empty() => ident.to_string(),
            _ => self.nick.to_lowercase(),
        };
        let realname = match self.realname.as_deref() {
            Some(realname) if !realname.is_empty() => realname.to_string(),
            _ => self.nick.clone(),
        };

        ResolvedConfig {
            host: self.host.clone(),
            port: self.port.filter(|p| *p != 0).unwrap_or(DEFAULT_PORT),
            nick: self.nick.clone(),
            ident,
            realname,
            password: self.password.clone().filter(|p| !p.is_empty()),
            encoding: self.encoding.clone(),
            tls: self.tls,
            tls_verify: self.tls_verify,
            queue_interval: Duration::from_millis(self.queue_interval_ms),
            registration_timeout: self.registration_timeout_secs.map(Duration::from_secs),
            event_capacity: self.event_capacity.max(1),
        }
    }
}

/// Immutable connection settings with all defaults applied.
///
/// The nick here is the one requested at registration; the live nick is
/// tracked by the client since it can change after connecting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub host: String,
    pub port: u16,
    pub nick: String,
    pub ident: String,
    pub realname: String,
    pub password: Option<String>,
    pub encoding: String,
    pub tls: bool,
    pub tls_verify: bool,
    pub queue_interval: Duration,
    pub registration_timeout: Option<Duration>,
    pub event_capacity: usize,
}
