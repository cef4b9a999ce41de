// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Room data model and tolerant parser.
//!
//! A [`Room`] is one announced multiplayer session record broadcast by the
//! notification server. Rooms are parsed from raw JSON objects carried in
//! `sendRoomNumberList` messages. Parsing never fails: any missing or
//! malformed field degrades to a default value so that one bad entry can
//! never drop the rest of a batch.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

/// Base URL for user avatar images.
pub(crate) const AVATAR_BASE: &str = "https://asset.bandoristation.com/images/user-avatar";

/// Ranked-match tier a room was announced for.
///
/// Codes are the server's numeric-string tier codes. Unrecognized codes fall
/// back to [`RoomType::Daredemo`], the lowest tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RoomType {
    #[default]
    Daredemo,
    Standard,
    Master,
    Grand,
    Legend,
}

impl RoomType {
    /// Map a numeric tier code onto a tier. Unknown codes are `Daredemo`.
    #[must_use]
    pub fn from_code(code: i64) -> Self {
        match code {
            7 => Self::Standard,
            12 => Self::Master,
            18 => Self::Grand,
            25 => Self::Legend,
            _ => Self::Daredemo,
        }
    }

    /// The server-side numeric code for this tier.
    #[must_use]
    pub fn code(&self) -> i64 {
        match self {
            Self::Daredemo => 0,
            Self::Standard => 7,
            Self::Master => 12,
            Self::Grand => 18,
            Self::Legend => 25,
        }
    }
}

/// Where a room announcement originated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum RoomSource {
    /// Relayed from an external QQ chat group, tagged with the group name.
    Qq(String),
    /// Posted on a website, tagged with the site name.
    Website(String),
    #[default]
    Unknown,
}

/// Game server region a player profile belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum GameServer {
    #[default]
    Jp,
    En,
    Tw,
    Cn,
    Kr,
}

impl GameServer {
    /// Parse a region tag, falling back to `Jp` for anything unrecognized.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "en" => Self::En,
            "tw" => Self::Tw,
            "cn" => Self::Cn,
            "kr" => Self::Kr,
            _ => Self::Jp,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jp => "jp",
            Self::En => "en",
            Self::Tw => "tw",
            Self::Cn => "cn",
            Self::Kr => "kr",
        }
    }
}

/// One card in a player's main deck.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeckMember {
    pub id: i64,
    pub trained: bool,
    pub illust: String,
}

/// Linked game account details embedded in a creator's profile.
///
/// Present only when the server embedded one; its absence is a valid,
/// expected state, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GameProfile {
    /// Linked game account id.
    pub id: i64,
    /// Decoration/degree ids shown on the profile.
    pub degree_ids: Vec<i64>,
    /// When the profile snapshot was last refreshed.
    pub date_updated: DateTime<Utc>,
    /// Game server region the account lives on.
    pub server: GameServer,
    /// Aggregate band power score.
    pub band_power: i64,
    /// Main deck members, up to 5.
    pub main_deck: Vec<DeckMember>,
}

/// Identity of the user who announced a room.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserInformation {
    pub id: i64,
    /// Server-side display type tag (e.g. `"qq"`).
    pub kind: String,
    pub username: String,
    avatar_file: String,
    pub game_profile: Option<GameProfile>,
}

impl UserInformation {
    /// Full URL of the user's avatar image, or `None` if they have none.
    #[must_use]
    pub fn avatar_url(&self) -> Option<String> {
        avatar_url(&self.avatar_file)
    }
}

/// One announced multiplayer session record.
///
/// Created only by [`Room::parse`]; never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Room {
    raw: String,
    pub room_type: RoomType,
    pub source: RoomSource,
    pub creator: UserInformation,
    pub date_created: DateTime<Utc>,
    /// Free-form display text the creator attached to the announcement.
    pub message: String,
    /// Room code used to join the session.
    pub number: String,
}

impl Room {
    /// Parse one raw room object.
    ///
    /// Tolerant by design: every field degrades to a default when missing or
    /// malformed, and the original raw text is retained for diagnostics.
    #[must_use]
    pub fn parse(json: &Value) -> Self {
        let user_info = json.get("user_info").unwrap_or(&Value::Null);
        Self {
            raw: json.to_string(),
            room_type: RoomType::from_code(int_of(json, "type")),
            source: parse_source(json.get("source_info").unwrap_or(&Value::Null)),
            creator: parse_creator(user_info),
            date_created: date_from_millis(float_of(json, "time") as i64),
            message: str_of(json, "raw_message"),
            number: str_of(json, "number"),
        }
    }

    /// The original raw message text this room was parsed from.
    #[must_use]
    pub fn raw_json(&self) -> &str {
        &self.raw
    }
}

fn parse_source(json: &Value) -> RoomSource {
    match str_of(json, "type").as_str() {
        "qq" => RoomSource::Qq(str_of(json, "name")),
        "website" => RoomSource::Website(str_of(json, "name")),
        _ => RoomSource::Unknown,
    }
}

fn parse_creator(json: &Value) -> UserInformation {
    let brief = json.get("bandori_player_brief_info").unwrap_or(&Value::Null);

    // The profile is considered present only when the update-time field is
    // numeric; string or missing values mean the server sent no snapshot.
    let game_profile = brief
        .get("latest_update_time")
        .and_then(Value::as_f64)
        .map(|updated| GameProfile {
            id: int_of(brief, "user_id"),
            degree_ids: array_of(brief, "degrees").iter().map(int_value).collect(),
            date_updated: date_from_secs(updated),
            server: GameServer::from_tag(&str_of(brief, "server")),
            band_power: int_of(brief, "band_power"),
            main_deck: array_of(brief, "main_deck").iter().map(parse_deck_member).collect(),
        });

    UserInformation {
        id: int_of(json, "user_id"),
        kind: str_of(json, "type"),
        username: str_of(json, "username"),
        avatar_file: str_of(json, "avatar"),
        game_profile,
    }
}

fn parse_deck_member(json: &Value) -> DeckMember {
    DeckMember {
        id: int_of(json, "situationId"),
        trained: str_of(json, "trainingStatus") == "done",
        illust: str_of(json, "illust"),
    }
}

/// Millisecond epoch → timestamp, clamped to the epoch on overflow.
pub(crate) fn date_from_millis(millis: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(millis).single().unwrap_or_default()
}

/// Fractional-second epoch → timestamp.
pub(crate) fn date_from_secs(secs: f64) -> DateTime<Utc> {
    date_from_millis((secs * 1000.0) as i64)
}

pub(crate) fn avatar_url(file: &str) -> Option<String> {
    if file.is_empty() {
        None
    } else {
        Some(format!("{AVATAR_BASE}/{file}"))
    }
}

// ---------------------------------------------------------------------------
// Tolerant field accessors. These mirror the coercions the wire format
// relies on: numeric fields may arrive as JSON numbers or as numeric
// strings, and string fields may arrive as bare numbers or booleans.
// ---------------------------------------------------------------------------

pub(crate) fn str_of(json: &Value, key: &str) -> String {
    match json.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

pub(crate) fn int_of(json: &Value, key: &str) -> i64 {
    json.get(key).map(int_value).unwrap_or(0)
}

pub(crate) fn int_value(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n.as_i64().unwrap_or_else(|| n.as_f64().unwrap_or(0.0) as i64),
        Value::String(s) => s.parse().unwrap_or(0),
        _ => 0,
    }
}

pub(crate) fn float_of(json: &Value, key: &str) -> f64 {
    match json.get(key) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

pub(crate) fn bool_of(json: &Value, key: &str) -> bool {
    json.get(key).and_then(Value::as_bool).unwrap_or(false)
}

pub(crate) fn array_of<'a>(json: &'a Value, key: &str) -> &'a [Value] {
    json.get(key).and_then(Value::as_array).map_or(&[], Vec::as_slice)
}

#[cfg(test)]
#[path = "room_tests.rs"]
mod tests;
