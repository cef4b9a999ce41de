// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

use clap::Parser;

use crate::auth::UserToken;
use crate::client::{FeedConfig, DEFAULT_ENDPOINT};

/// Tail the room-notification feed to stdout.
#[derive(Debug, Parser)]
#[command(name = "station", version, about)]
pub struct Config {
    /// WebSocket endpoint of the notification server.
    #[arg(long, env = "STATION_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Client identifier sent in setClient and heartbeat messages.
    #[arg(long, env = "STATION_CLIENT", default_value = "station")]
    pub client: String,

    /// Access token for group permissions (optional).
    #[arg(long, env = "STATION_TOKEN")]
    pub token: Option<String>,

    /// Heartbeat interval in seconds.
    #[arg(long, env = "STATION_HEARTBEAT_SECS", default_value_t = 30)]
    pub heartbeat_secs: u64,

    /// Log level filter (e.g. "info", "station=debug").
    #[arg(long, env = "STATION_LOG", default_value = "info")]
    pub log_level: String,

    /// Log format: "text" or "json".
    #[arg(long, env = "STATION_LOG_FORMAT", default_value = "text")]
    pub log_format: String,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.endpoint.starts_with("ws://") && !self.endpoint.starts_with("wss://") {
            anyhow::bail!("endpoint must be a ws:// or wss:// URL: {}", self.endpoint);
        }
        if self.heartbeat_secs == 0 {
            anyhow::bail!("heartbeat interval must be at least 1 second");
        }
        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!("invalid log format: {}", self.log_format);
        }
        Ok(())
    }

    /// Feed configuration derived from the CLI arguments.
    pub fn feed_config(&self) -> FeedConfig {
        FeedConfig {
            endpoint: self.endpoint.clone(),
            client: self.client.clone(),
            token: self.token.clone().map(UserToken::new),
            heartbeat_interval: Duration::from_secs(self.heartbeat_secs),
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
