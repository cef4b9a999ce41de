// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client library for the bandoristation room-notification service.
//!
//! The core is [`client::receive_rooms`]: a long-lived call that keeps one
//! WebSocket connection open and pushes parsed [`room::Room`] batches to a
//! callback. [`auth::StationApi`] covers the sibling account REST calls
//! (signup, login, email verification) whose tokens feed the handshake.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod message;
pub mod room;
