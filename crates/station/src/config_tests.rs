// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::client::DEFAULT_ENDPOINT;

fn parse(args: &[&str]) -> Config {
    let mut full = vec!["station"];
    full.extend_from_slice(args);
    Config::try_parse_from(full).expect("args should parse")
}

#[test]
fn defaults_are_valid() {
    let config = parse(&[]);
    assert!(config.validate().is_ok());
    assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
    assert_eq!(config.heartbeat_secs, 30);
    assert!(config.token.is_none());
}

#[test]
fn rejects_non_websocket_endpoint() {
    let config = parse(&["--endpoint", "https://api.bandoristation.com"]);
    assert!(config.validate().is_err());
}

#[test]
fn rejects_zero_heartbeat() {
    let config = parse(&["--heartbeat-secs", "0"]);
    assert!(config.validate().is_err());
}

#[test]
fn rejects_unknown_log_format() {
    let config = parse(&["--log-format", "xml"]);
    assert!(config.validate().is_err());
    assert!(parse(&["--log-format", "json"]).validate().is_ok());
}

#[test]
fn feed_config_maps_all_fields() {
    let config = parse(&[
        "--endpoint",
        "ws://127.0.0.1:9999",
        "--client",
        "myapp",
        "--token",
        "tok",
        "--heartbeat-secs",
        "5",
    ]);
    let feed = config.feed_config();
    assert_eq!(feed.endpoint, "ws://127.0.0.1:9999");
    assert_eq!(feed.client, "myapp");
    assert_eq!(feed.token, Some(crate::auth::UserToken::new("tok")));
    assert_eq!(feed.heartbeat_interval, std::time::Duration::from_secs(5));
}
