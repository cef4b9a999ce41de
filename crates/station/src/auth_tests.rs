// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::error::ApiError;
use serde_json::json;

fn login_success_body() -> Value {
    json!({
        "status": "success",
        "response": {
            "token": "tok-123",
            "user_id": 7,
            "avatar": "me.png",
            "role": 1,
            "ban_status": { "is_banned": false },
            "website_setting": {
                "background": { "dynamic_effect": true },
                "send_room_number": {
                    "type": "12",
                    "preselection_word_list": ["大師", "q1"]
                }
            },
            "following_user": [
                { "user_id": 3, "time": 1690000000.0 }
            ]
        }
    })
}

#[test]
fn login_success_parses_profile() {
    let parsed = parse_login_response(&login_success_body());
    let Ok(LoginResponse::Success { token, user }) = parsed else {
        panic!("expected success, got {parsed:?}");
    };
    assert_eq!(token, UserToken::new("tok-123"));
    assert_eq!(user.id, 7);
    assert_eq!(user.role, 1);
    assert_eq!(user.ban_status, BanStatus::Normal);
    assert_eq!(
        user.avatar_url().as_deref(),
        Some("https://asset.bandoristation.com/images/user-avatar/me.png")
    );
    assert!(user.website_settings.background_dynamic_effect);
    assert_eq!(user.website_settings.post_preference.room_type, RoomType::Master);
    assert_eq!(user.website_settings.post_preference.preselected_words, ["大師", "q1"]);
    assert_eq!(user.followed_users.len(), 1);
    assert_eq!(user.followed_users[0].id, 3);
    assert_eq!(user.followed_users[0].following_date.timestamp(), 1_690_000_000);
}

#[test]
fn login_redirect_means_email_verification_required() {
    let body = json!({
        "response": { "redirect_to": "/verify", "token": "unverified-1" }
    });
    let parsed = parse_login_response(&body);
    assert_eq!(
        parsed.ok(),
        Some(LoginResponse::EmailVerificationRequired {
            token: UnverifiedUserToken::new("unverified-1")
        })
    );
}

#[test]
fn login_error_string_maps_to_api_error() {
    let body = json!({ "response": "Wrong password" });
    assert!(matches!(parse_login_response(&body), Err(ApiError::WrongPassword)));
}

#[test]
fn login_garbage_response_is_unknown_error() {
    let body = json!({ "response": { "unexpected": true } });
    assert!(matches!(parse_login_response(&body), Err(ApiError::Unknown)));
}

#[test]
fn banned_account_carries_interval() {
    let mut body = login_success_body();
    body["response"]["ban_status"] = json!({ "is_banned": true, "interval": 3600.0 });
    let Ok(LoginResponse::Success { user, .. }) = parse_login_response(&body) else {
        panic!("expected success");
    };
    assert_eq!(user.ban_status, BanStatus::Banned { interval_secs: 3600.0 });
}

#[test]
fn missing_settings_degrade_to_defaults() {
    let user = parse_self_information(&json!({ "user_id": 9 }));
    assert_eq!(user.id, 9);
    assert_eq!(user.avatar_url(), None);
    assert_eq!(user.ban_status, BanStatus::Normal);
    assert_eq!(user.website_settings.post_preference.room_type, RoomType::Daredemo);
    assert!(user.website_settings.post_preference.preselected_words.is_empty());
    assert!(user.followed_users.is_empty());
}
