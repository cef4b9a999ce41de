// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Account REST API: signup, login, and email verification.
//!
//! All calls POST to a single endpoint with a JSON body naming the
//! `UserLogin` function group. The server always answers HTTP 200 and
//! reports failures as plain strings in `response`, which map onto
//! [`ApiError`]. Token-bearing calls attach the token as an `Auth-Token`
//! header.

use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::room::{
    avatar_url, bool_of, date_from_secs, float_of, int_of, str_of, RoomType,
};

/// Default REST endpoint.
pub const SERVER_URL: &str = "https://server.bandoristation.com";

/// User-Agent attached to every request (REST and WebSocket).
pub(crate) const USER_AGENT: &str =
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// A verified access token. Opaque: the client attaches it to requests but
/// never interprets or refreshes it.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct UserToken(String);

impl std::fmt::Debug for UserToken {
    /// Redacted: tokens must not leak into logs.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("UserToken(..)")
    }
}

impl UserToken {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub(crate) fn reveal(&self) -> &str {
        &self.0
    }
}

/// A token issued before email verification has completed. Only usable for
/// the verification flow itself.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct UnverifiedUserToken(String);

impl std::fmt::Debug for UnverifiedUserToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("UnverifiedUserToken(..)")
    }
}

impl UnverifiedUserToken {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub(crate) fn reveal(&self) -> &str {
        &self.0
    }
}

/// Outcome of a login attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum LoginResponse {
    /// The account exists but its email is unverified; finish the flow with
    /// [`StationApi::verify_email`].
    EmailVerificationRequired { token: UnverifiedUserToken },
    Success { token: UserToken, user: SelfInformation },
}

/// Ban state of the logged-in account.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BanStatus {
    Normal,
    Banned { interval_secs: f64 },
}

/// Room-posting preferences stored on the website.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostPreference {
    pub room_type: RoomType,
    pub preselected_words: Vec<String>,
}

/// Website-side settings for the logged-in account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebsiteSettings {
    pub background_dynamic_effect: bool,
    pub post_preference: PostPreference,
}

/// A user the account follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowedUser {
    pub id: i64,
    pub following_date: DateTime<Utc>,
}

/// Profile of the logged-in account, returned on successful login.
#[derive(Debug, Clone, PartialEq)]
pub struct SelfInformation {
    pub id: i64,
    avatar_file: String,
    pub role: i64,
    pub ban_status: BanStatus,
    pub website_settings: WebsiteSettings,
    pub followed_users: Vec<FollowedUser>,
}

impl SelfInformation {
    /// Full URL of the account's avatar image, or `None` if it has none.
    #[must_use]
    pub fn avatar_url(&self) -> Option<String> {
        avatar_url(&self.avatar_file)
    }
}

/// Client for the account API.
pub struct StationApi {
    http: reqwest::Client,
    base_url: String,
}

impl Default for StationApi {
    fn default() -> Self {
        Self::new()
    }
}

impl StationApi {
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_url(SERVER_URL)
    }

    /// Point the client at a different endpoint (tests).
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap_or_default();
        Self { http, base_url: base_url.into() }
    }

    /// Create an account. Returns an unverified token; the account becomes
    /// usable once the email is verified.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        email: &str,
    ) -> Result<UnverifiedUserToken, ApiError> {
        let body = self
            .call(
                "signup",
                json!({ "username": username, "password": password, "email": email }),
                None,
            )
            .await?;
        match body["response"].get("token").and_then(Value::as_str) {
            Some(token) => Ok(UnverifiedUserToken::new(token)),
            None => Err(response_error(&body)),
        }
    }

    /// Log in with a username and password.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let body = self
            .call("login", json!({ "username": username, "password": password }), None)
            .await?;
        parse_login_response(&body)
    }

    /// The email address associated with an unverified account.
    pub async fn current_email(&self, token: &UnverifiedUserToken) -> Result<String, ApiError> {
        let body = self.call("getCurrentEmail", json!({}), Some(token.reveal())).await?;
        match body["response"].get("email").and_then(Value::as_str) {
            Some(email) => Ok(email.to_owned()),
            None => Err(response_error(&body)),
        }
    }

    /// Ask the server to email a verification code.
    pub async fn send_verification_code(
        &self,
        token: &UnverifiedUserToken,
    ) -> Result<(), ApiError> {
        let body =
            self.call("sendEmailVerificationCode", json!({}), Some(token.reveal())).await?;
        if body.get("status").and_then(Value::as_str) == Some("success") {
            Ok(())
        } else {
            Err(response_error(&body))
        }
    }

    /// Redeem a verification code for a full access token.
    pub async fn verify_email(
        &self,
        token: &UnverifiedUserToken,
        code: &str,
    ) -> Result<UserToken, ApiError> {
        let body = self
            .call("verifyEmail", json!({ "verification_code": code }), Some(token.reveal()))
            .await?;
        match body["response"].get("token").and_then(Value::as_str) {
            Some(token) => Ok(UserToken::new(token)),
            None => Err(response_error(&body)),
        }
    }

    async fn call(
        &self,
        function: &str,
        params: Value,
        token: Option<&str>,
    ) -> Result<Value, ApiError> {
        let mut body = json!({ "function_group": "UserLogin", "function": function });
        if let (Some(dst), Some(src)) = (body.as_object_mut(), params.as_object()) {
            for (key, value) in src {
                dst.insert(key.clone(), value.clone());
            }
        }
        let mut request = self.http.post(&self.base_url).json(&body);
        if let Some(token) = token {
            request = request.header("Auth-Token", token);
        }
        let response = request.send().await?;
        Ok(response.json().await?)
    }
}

/// A non-success `response` is a plain error string.
fn response_error(body: &Value) -> ApiError {
    ApiError::from_response(body.get("response").and_then(Value::as_str).unwrap_or(""))
}

pub(crate) fn parse_login_response(body: &Value) -> Result<LoginResponse, ApiError> {
    let response = body.get("response").unwrap_or(&Value::Null);
    if response.get("redirect_to").and_then(Value::as_str).is_some() {
        return Ok(LoginResponse::EmailVerificationRequired {
            token: UnverifiedUserToken::new(str_of(response, "token")),
        });
    }
    match response.get("token").and_then(Value::as_str) {
        Some(token) => Ok(LoginResponse::Success {
            token: UserToken::new(token),
            user: parse_self_information(response),
        }),
        None => Err(response_error(body)),
    }
}

pub(crate) fn parse_self_information(response: &Value) -> SelfInformation {
    let ban = response.get("ban_status").unwrap_or(&Value::Null);
    let settings = response.get("website_setting").unwrap_or(&Value::Null);
    let posting = settings.get("send_room_number").unwrap_or(&Value::Null);

    SelfInformation {
        id: int_of(response, "user_id"),
        avatar_file: str_of(response, "avatar"),
        role: int_of(response, "role"),
        ban_status: if bool_of(ban, "is_banned") {
            BanStatus::Banned { interval_secs: float_of(ban, "interval") }
        } else {
            BanStatus::Normal
        },
        website_settings: WebsiteSettings {
            background_dynamic_effect: bool_of(
                settings.get("background").unwrap_or(&Value::Null),
                "dynamic_effect",
            ),
            post_preference: PostPreference {
                room_type: RoomType::from_code(int_of(posting, "type")),
                preselected_words: posting
                    .get("preselection_word_list")
                    .and_then(Value::as_array)
                    .map(|words| {
                        words
                            .iter()
                            .map(|w| w.as_str().unwrap_or_default().to_owned())
                            .collect()
                    })
                    .unwrap_or_default(),
            },
        },
        followed_users: response
            .get("following_user")
            .and_then(Value::as_array)
            .map(|users| {
                users
                    .iter()
                    .map(|u| FollowedUser {
                        id: int_of(u, "user_id"),
                        following_date: date_from_secs(float_of(u, "time")),
                    })
                    .collect()
            })
            .unwrap_or_default(),
    }
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
