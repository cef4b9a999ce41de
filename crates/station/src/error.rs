// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the room feed and the account API.

use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Fatal errors surfaced by [`crate::client::receive_rooms`].
///
/// Every variant terminates the call after teardown has run; retry and
/// backoff are a caller policy decision.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The WebSocket could not be created or opened.
    #[error("websocket connect failed: {0}")]
    Connect(#[source] tungstenite::Error),
    /// A receive or send failed after a successful open.
    #[error("transport failure: {0}")]
    Transport(#[source] tungstenite::Error),
    /// The initial handshake batch could not be sent.
    #[error("failed to initialize connection: {0}")]
    Handshake(#[source] tungstenite::Error),
    /// The server closed the connection without a transport error.
    ///
    /// Surfaced as a distinct error rather than a normal return so that
    /// callers can tell a peer-initiated close apart from their own
    /// cancellation when deciding whether to reconnect.
    #[error("connection closed by peer (code {code:?}): {reason}")]
    ClosedByPeer { code: Option<u16>, reason: String },
}

/// Errors from the account REST API.
///
/// The server always answers HTTP 200 and describes failures as plain
/// response strings; [`ApiError::from_response`] maps those strings onto
/// this enumeration, falling back to [`ApiError::Unknown`].
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("not allowed")]
    OperationNotAllowed,
    #[error("no permission")]
    Forbidden,
    #[error("unparsable format")]
    BadRequest,
    #[error("missing parameters")]
    MissingParameters,
    #[error("missing function name")]
    MissingFunctionName,
    #[error("undefined function group")]
    UndefinedFunctionGroup,
    #[error("undefined function")]
    UndefinedFunction,
    #[error("forbidden method")]
    MethodNotAllowed,
    #[error("undefined access token")]
    UndefinedAccessToken,
    #[error("token validation failure")]
    InvalidToken,
    #[error("nonexistent user")]
    UserNotFound,
    #[error("undefined email")]
    EmailNotFound,
    #[error("duplicate email")]
    EmailNotAvailable,
    #[error("invalid email")]
    InvalidEmail,
    #[error("email already verified")]
    EmailVerified,
    #[error("undefined verification code")]
    UndefinedVerificationCode,
    #[error("invalid verification code")]
    InvalidVerificationCode,
    #[error("too many logins")]
    TooManyLogins,
    #[error("wrong password")]
    WrongPassword,
    #[error("too many signups")]
    TooManySignups,
    #[error("username or email already exists")]
    UsernameOrEmailNotAvailable,
    #[error("username already exists")]
    UsernameNotAvailable,
    #[error("qq already bound to an account")]
    QqNotAvailable,
    #[error("undefined verification request")]
    UndefinedVerificationRequest,
    #[error("duplicate room number submission")]
    DuplicateNumberSubmit,
    #[error("player verification failure")]
    PlayerVerificationFailure,
    #[error("no player data")]
    NoPlayerData,
    #[error("requests are too frequent")]
    TooManyRequests,
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("api request failure")]
    Unknown,
}

impl ApiError {
    /// Map a server response string onto an error.
    #[must_use]
    pub fn from_response(response: &str) -> Self {
        match response {
            "Not allowed" => Self::OperationNotAllowed,
            "No permission" => Self::Forbidden,
            "Unparsable format" => Self::BadRequest,
            "Missing Parameters" => Self::MissingParameters,
            "Missing Parameter \"function\"" => Self::MissingFunctionName,
            "Undefined function group" => Self::UndefinedFunctionGroup,
            "Undefined function" => Self::UndefinedFunction,
            "Forbidden method" => Self::MethodNotAllowed,
            "Undefined access token" => Self::UndefinedAccessToken,
            "Token validation failure" => Self::InvalidToken,
            "Nonexistent user" => Self::UserNotFound,
            "Undefined email" => Self::EmailNotFound,
            "Duplicate email" => Self::EmailNotAvailable,
            "Invalid email" => Self::InvalidEmail,
            "Verified email" => Self::EmailVerified,
            "Undefined verification code" => Self::UndefinedVerificationCode,
            "Invalid verification code" => Self::InvalidVerificationCode,
            "Too many logins" => Self::TooManyLogins,
            "Wrong password" => Self::WrongPassword,
            "Too many signups" => Self::TooManySignups,
            "Username or email already exists" => Self::UsernameOrEmailNotAvailable,
            "Username already exists" => Self::UsernameNotAvailable,
            "QQ already exists" => Self::QqNotAvailable,
            "Undefined verification request" => Self::UndefinedVerificationRequest,
            "Duplicate number submit" => Self::DuplicateNumberSubmit,
            "Player verification failure" => Self::PlayerVerificationFailure,
            "No player data" => Self::NoPlayerData,
            "Requests are too frequent" => Self::TooManyRequests,
            _ => Self::Unknown,
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
