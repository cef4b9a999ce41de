// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn default_config_targets_production_endpoint() {
    let config = FeedConfig::default();
    assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
    assert_eq!(config.heartbeat_interval, DEFAULT_HEARTBEAT);
    assert!(config.token.is_none());
    assert!(!config.client.is_empty());
}

#[tokio::test]
async fn connect_failure_surfaces_as_connect_error() {
    // Nothing listens on this port; the call must fail before spawning any
    // background work and still return promptly.
    let config = FeedConfig {
        endpoint: "ws://127.0.0.1:1/".to_owned(),
        ..FeedConfig::default()
    };
    let result = receive_rooms(config, CancellationToken::new(), |_| {}).await;
    assert!(matches!(result, Err(crate::error::FeedError::Connect(_))));
}

#[tokio::test]
async fn invalid_endpoint_is_a_connect_error() {
    let config = FeedConfig { endpoint: "not a url".to_owned(), ..FeedConfig::default() };
    let result = receive_rooms(config, CancellationToken::new(), |_| {}).await;
    assert!(matches!(result, Err(crate::error::FeedError::Connect(_))));
}
