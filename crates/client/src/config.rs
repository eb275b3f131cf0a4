// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Client configuration.
//!
//! Configuration is read from a TOML file and includes:
//! - `url`: WebSocket URL of the hub (`ws://` or `wss://`)
//! - `send_method` / `receive_method`: hub methods used by the console
//! - reconnection and start-timeout tuning
//! - `auth_url`: token endpoint for optional logins
//!
//! Every field has a default, so an empty or missing file is valid.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::supervisor::SupervisorConfig;

/// Error type for configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid hub URL '{0}'\n  hint: must start with ws:// or wss://")]
    InvalidUrl(String),

    #[error("reconnect interval must be at least one second")]
    InvalidInterval,

    #[error("start timeout must be at least one second")]
    InvalidStartTimeout,

    #[error("{0} must not be empty")]
    EmptyMethod(&'static str),

    #[error("invalid token URL '{0}'\n  hint: must start with http:// or https://")]
    InvalidAuthUrl(String),
}

/// Client configuration, usually stored in `hublink.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// WebSocket URL of the hub.
    #[serde(default = "default_url")]
    pub url: String,
    /// Hub method invoked for each line of input.
    #[serde(default = "default_send_method")]
    pub send_method: String,
    /// Client method the hub calls with output text.
    #[serde(default = "default_receive_method")]
    pub receive_method: String,
    /// Seconds to wait in `Disconnected` before retrying (default: 10).
    #[serde(default = "default_reconnect_interval_secs")]
    pub reconnect_interval_secs: u64,
    /// Seconds before a pending `start` counts as failed (default: 5).
    #[serde(default = "default_start_timeout_secs")]
    pub start_timeout_secs: u64,
    /// Connect on startup instead of waiting for the first retry tick.
    #[serde(default = "default_connect_immediately")]
    pub connect_immediately: bool,
    /// Token endpoint used by `--user` logins.
    #[serde(default = "default_auth_url")]
    pub auth_url: String,
}

fn default_url() -> String {
    "ws://localhost:8080/hub".to_string()
}

fn default_send_method() -> String {
    "HandleMessageFromCaller".to_string()
}

fn default_receive_method() -> String {
    "HandleMessageFromServer".to_string()
}

fn default_reconnect_interval_secs() -> u64 {
    10
}

fn default_start_timeout_secs() -> u64 {
    5
}

fn default_connect_immediately() -> bool {
    true
}

fn default_auth_url() -> String {
    "http://localhost:8080/token".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            url: default_url(),
            send_method: default_send_method(),
            receive_method: default_receive_method(),
            reconnect_interval_secs: default_reconnect_interval_secs(),
            start_timeout_secs: default_start_timeout_secs(),
            connect_immediately: default_connect_immediately(),
            auth_url: default_auth_url(),
        }
    }
}

impl Config {
    /// Loads configuration from `path`, falling back to defaults if the file
    /// does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parses configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Checks the values the supervisor cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.url.starts_with("ws://") || self.url.starts_with("wss://")) {
            return Err(ConfigError::InvalidUrl(self.url.clone()));
        }
        if self.reconnect_interval_secs == 0 {
            return Err(ConfigError::InvalidInterval);
        }
        if self.start_timeout_secs == 0 {
            return Err(ConfigError::InvalidStartTimeout);
        }
        if self.send_method.is_empty() {
            return Err(ConfigError::EmptyMethod("send_method"));
        }
        if self.receive_method.is_empty() {
            return Err(ConfigError::EmptyMethod("receive_method"));
        }
        if !(self.auth_url.starts_with("http://") || self.auth_url.starts_with("https://")) {
            return Err(ConfigError::InvalidAuthUrl(self.auth_url.clone()));
        }
        Ok(())
    }

    /// Supervisor settings derived from this configuration.
    pub fn supervisor_config(&self) -> SupervisorConfig {
        SupervisorConfig {
            reconnect_interval: Duration::from_secs(self.reconnect_interval_secs),
            start_timeout: Duration::from_secs(self.start_timeout_secs),
            connect_immediately: self.connect_immediately,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
