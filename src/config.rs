//! hire-sync configuration, loaded from `hire-sync.toml`.
//!
//! Every field has a default, so the file is optional. The two secrets are
//! normally supplied through the environment: `PINPOINT_API_KEY` and
//! `HIBOB_CREDENTIALS` take precedence over the file.

use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use thiserror::Error;

use crate::http::Timeouts;
use crate::{hibob, pinpoint};

pub const DEFAULT_CONFIG_FILE: &str = "hire-sync.toml";
pub const CONFIG_PATH_ENV: &str = "HIRE_SYNC_CONFIG";
pub const PINPOINT_API_KEY_ENV: &str = "PINPOINT_API_KEY";
pub const HIBOB_CREDENTIALS_ENV: &str = "HIBOB_CREDENTIALS";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing secret: set {0}")]
    MissingSecret(&'static str),

    #[error("{field} must be an http(s) URL, got {value:?}")]
    InvalidBaseUrl { field: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("invalid listen address {0:?}")]
    InvalidListenAddress(String),
}

/// Top-level configuration. `Debug` output redacts both secrets.
#[derive(Clone, Deserialize)]
pub struct HireSyncConfig {
    /// API key sent to Pinpoint as `X-API-KEY`.
    #[serde(default)]
    pub pinpoint_api_key: String,

    /// Base64 `user:token` pair for HiBob basic auth.
    #[serde(default)]
    pub hibob_credentials: String,

    #[serde(default = "default_pinpoint_base_url")]
    pub pinpoint_base_url: String,

    #[serde(default = "default_hibob_base_url")]
    pub hibob_base_url: String,

    /// HiBob site new employees are assigned to.
    #[serde(default = "default_site")]
    pub default_site: String,

    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// Longest wait for the next chunk of a response.
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,

    /// Bound on a whole request, response body included.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    #[serde(default)]
    pub server: ServerConfig,

    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

fn default_pinpoint_base_url() -> String {
    pinpoint::client::API_URL.to_string()
}

fn default_hibob_base_url() -> String {
    hibob::client::API_URL.to_string()
}

fn default_site() -> String {
    "Headquarters".to_string()
}

fn default_connect_timeout_ms() -> u64 {
    5_000
}

fn default_read_timeout_ms() -> u64 {
    20_000
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for HireSyncConfig {
    fn default() -> Self {
        Self {
            pinpoint_api_key: String::new(),
            hibob_credentials: String::new(),
            pinpoint_base_url: default_pinpoint_base_url(),
            hibob_base_url: default_hibob_base_url(),
            default_site: default_site(),
            connect_timeout_ms: default_connect_timeout_ms(),
            read_timeout_ms: default_read_timeout_ms(),
            request_timeout_ms: default_request_timeout_ms(),
            server: ServerConfig::default(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}

fn redacted(secret: &str) -> &'static str {
    if secret.is_empty() { "<unset>" } else { "<redacted>" }
}

impl fmt::Debug for HireSyncConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HireSyncConfig")
            .field("pinpoint_api_key", &redacted(&self.pinpoint_api_key))
            .field("hibob_credentials", &redacted(&self.hibob_credentials))
            .field("pinpoint_base_url", &self.pinpoint_base_url)
            .field("hibob_base_url", &self.hibob_base_url)
            .field("default_site", &self.default_site)
            .field("connect_timeout_ms", &self.connect_timeout_ms)
            .field("read_timeout_ms", &self.read_timeout_ms)
            .field("request_timeout_ms", &self.request_timeout_ms)
            .field("server", &self.server)
            .field("log_level", &self.log_level)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl HireSyncConfig {
    /// Resolve the config file path: explicit path, then `HIRE_SYNC_CONFIG`,
    /// then `hire-sync.toml` in the working directory.
    pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
        if let Some(path) = explicit {
            return path.to_path_buf();
        }
        std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    /// Load the file at `path` (defaults if absent) and apply env overrides.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = Self::from_file(path)?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse the file at `path`, or return defaults if it does not exist.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Overlay secrets from the environment; empty values are ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(PINPOINT_API_KEY_ENV).filter(|v| !v.is_empty()) {
            self.pinpoint_api_key = key;
        }
        if let Some(credentials) = lookup(HIBOB_CREDENTIALS_ENV).filter(|v| !v.is_empty()) {
            self.hibob_credentials = credentials;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pinpoint_api_key.trim().is_empty() {
            return Err(ConfigError::MissingSecret(PINPOINT_API_KEY_ENV));
        }
        if self.hibob_credentials.trim().is_empty() {
            return Err(ConfigError::MissingSecret(HIBOB_CREDENTIALS_ENV));
        }
        for (field, value) in [
            ("pinpoint_base_url", &self.pinpoint_base_url),
            ("hibob_base_url", &self.hibob_base_url),
        ] {
            if !(value.starts_with("http://") || value.starts_with("https://")) {
                return Err(ConfigError::InvalidBaseUrl {
                    field,
                    value: value.clone(),
                });
            }
        }
        if self.connect_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout("connect_timeout_ms"));
        }
        if self.read_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout("read_timeout_ms"));
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout("request_timeout_ms"));
        }
        Ok(())
    }

    pub fn timeouts(&self) -> Timeouts {
        Timeouts {
            connect: Duration::from_millis(self.connect_timeout_ms),
            read: Duration::from_millis(self.read_timeout_ms),
            request: Duration::from_millis(self.request_timeout_ms),
        }
    }

    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = format!("{}:{}", self.server.host, self.server.port);
        raw.parse()
            .map_err(|_| ConfigError::InvalidListenAddress(raw))
    }
}
