//! Decoding of login-popup `postMessage` payloads.
//!
//! The popup posts either `{type: "auth-success", token, user}` or
//! `{type: "auth-error", error}`. Decoding is a single step that yields a
//! validated [`AuthMessage`] or a [`AuthError::Validation`]; anything that is
//! not tagged with one of those two types decodes to [`AuthMessage::Unknown`]
//! because windows receive unrelated messages all the time.

#[cfg(test)]
#[path = "message_test.rs"]
mod message_test;

use serde_json::Value;

use super::types::User;
use crate::error::AuthError;
use crate::util::security::is_valid_user_object;

pub const AUTH_SUCCESS: &str = "auth-success";
pub const AUTH_ERROR: &str = "auth-error";

#[derive(Clone, Debug, PartialEq)]
pub enum AuthMessage {
    /// The popup completed login. The user's avatar URL is already sanitized.
    Success { token: String, user: User },
    /// The popup reported a provider error.
    Failure { message: String },
    /// Not an auth message.
    Unknown,
}

impl AuthMessage {
    /// Decode a message payload.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Validation`] for an `auth-success` payload that
    /// lacks a token, lacks a user, or carries a malformed user record.
    pub fn decode(data: &Value) -> Result<Self, AuthError> {
        let kind = data.get("type").and_then(Value::as_str);
        match kind {
            Some(AUTH_SUCCESS) => decode_success(data),
            Some(AUTH_ERROR) => {
                let message = data
                    .get("error")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown error")
                    .to_owned();
                Ok(Self::Failure { message })
            }
            _ => Ok(Self::Unknown),
        }
    }
}

fn decode_success(data: &Value) -> Result<AuthMessage, AuthError> {
    let token = data
        .get("token")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AuthError::Validation("auth-success without token".to_owned()))?;
    let raw_user = data
        .get("user")
        .filter(|u| !u.is_null())
        .ok_or_else(|| AuthError::Validation("auth-success without user".to_owned()))?;
    if !is_valid_user_object(raw_user) {
        return Err(AuthError::Validation("user record has an invalid shape".to_owned()));
    }
    let user: User =
        serde_json::from_value(raw_user.clone()).map_err(|e| AuthError::Validation(format!("user record: {e}")))?;

    Ok(AuthMessage::Success { token: token.to_owned(), user: user.with_sanitized_avatar() })
}
