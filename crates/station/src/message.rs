// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire protocol codec for the room-notification WebSocket.
//!
//! Outbound messages are a JSON array of `{"action": ..., "data": ...}`
//! objects. Inbound messages are single `{"action": ..., "response": ...}`
//! objects; unrecognized actions decode to [`ServerEvent::Other`] and are
//! ignored by the client (forward-compatibility policy, not an error).

use serde_json::{json, Value};

use crate::auth::UserToken;

/// One outbound action object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientAction {
    /// Identify the calling application and opt into room pushes.
    SetClient { client: String },
    /// Request the current room list.
    GetRoomNumberList,
    /// Attach a previously-obtained access token.
    SetAccessPermission { token: String },
    /// Periodic keep-alive.
    Heartbeat { client: String },
}

impl ClientAction {
    fn to_frame(&self) -> Value {
        match self {
            Self::SetClient { client } => json!({
                "action": "setClient",
                "data": { "client": client, "send_room_number": true },
            }),
            Self::GetRoomNumberList => json!({
                "action": "getRoomNumberList",
                "data": null,
            }),
            Self::SetAccessPermission { token } => json!({
                "action": "setAccessPermission",
                "data": { "token": token },
            }),
            Self::Heartbeat { client } => json!({
                "action": "heartbeat",
                "data": { "client": client },
            }),
        }
    }
}

/// Encode a batch of actions as one outbound text frame.
#[must_use]
pub fn encode_batch(actions: &[ClientAction]) -> String {
    Value::Array(actions.iter().map(ClientAction::to_frame).collect()).to_string()
}

/// The initial batch sent once the server signals readiness.
///
/// Always contains `setClient` and `getRoomNumberList`; `setAccessPermission`
/// is appended if and only if a token was supplied.
#[must_use]
pub fn handshake_batch(client: &str, token: Option<&UserToken>) -> Vec<ClientAction> {
    let mut actions = vec![
        ClientAction::SetClient { client: client.to_owned() },
        ClientAction::GetRoomNumberList,
    ];
    if let Some(token) = token {
        actions.push(ClientAction::SetAccessPermission { token: token.reveal().to_owned() });
    }
    actions
}

/// A decoded inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    /// `sendServerTime`: the sole trigger for the handshake batch. The
    /// payload itself is not consumed.
    ServerTime,
    /// `sendRoomNumberList`: raw room objects, in server order.
    RoomList(Vec<Value>),
    /// Anything unrecognized or unparseable.
    Other,
}

/// Decode one inbound text frame.
pub fn decode(text: &str) -> ServerEvent {
    let Ok(value) = serde_json::from_str::<Value>(text) else {
        return ServerEvent::Other;
    };
    match value.get("action").and_then(Value::as_str) {
        Some("sendServerTime") => ServerEvent::ServerTime,
        Some("sendRoomNumberList") => ServerEvent::RoomList(room_entries(value.get("response"))),
        _ => ServerEvent::Other,
    }
}

/// The server sends the room list as an array, but older payloads used an
/// object keyed by numeric index; accept both. Keyed entries are ordered by
/// their numeric key (non-numeric keys sort last), not lexicographically, so
/// `"10"` follows `"2"`. A missing response is an empty list.
fn room_entries(response: Option<&Value>) -> Vec<Value> {
    match response {
        Some(Value::Array(entries)) => entries.clone(),
        Some(Value::Object(map)) => {
            let mut keyed: Vec<(&String, &Value)> = map.iter().collect();
            keyed.sort_by_key(|(key, _)| key.parse::<u64>().unwrap_or(u64::MAX));
            keyed.into_iter().map(|(_, entry)| entry.clone()).collect()
        }
        _ => Vec::new(),
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
