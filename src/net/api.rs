//! Auth backend client contract and shared response handling.
//!
//! DESIGN
//! ======
//! [`AuthApi`] is the seam the session depends on; transports
//! ([`super::http::HttpAuthApi`] natively, [`super::browser::BrowserAuthApi`]
//! in the browser) only move bytes and hand `(status, body)` to the
//! `interpret_*` functions here, so every status/field rule is shared and
//! testable without a network.
//!
//! ERROR HANDLING
//! ==============
//! Each call is one round trip with no retry. `check_auth_type` never fails:
//! any problem yields the `"none"` default so the UI is never blocked on it.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::types::{AuthTypeResponse, CallbackResponse, LoginUrlResponse, User};
use crate::error::AuthError;

pub const LOGIN_URL_PATH: &str = "/auth/login-url";
pub const CALLBACK_PATH: &str = "/auth/callback-handler";
pub const ME_PATH: &str = "/auth/me";
pub const TYPE_PATH: &str = "/auth/type";
pub const LOGOUT_PATH: &str = "/auth/logout";

/// Request/response operations against the auth backend.
///
/// Futures are not required to be `Send` so browser fetch transports qualify.
#[async_trait(?Send)]
pub trait AuthApi {
    /// `GET /auth/login-url`.
    async fn get_login_url(&self) -> Result<String, AuthError>;

    /// `POST /auth/callback-handler`: exchange an authorization code.
    async fn handle_callback(&self, code: &str, state: Option<&str>) -> Result<CallbackResponse, AuthError>;

    /// `GET /auth/me` with cookie credentials and an optional bearer token.
    async fn get_current_user(&self, token: Option<&str>) -> Result<User, AuthError>;

    /// `GET /auth/type`, falling back to `"none"` on any failure.
    async fn check_auth_type(&self) -> AuthTypeResponse;

    /// `POST /auth/logout` with cookie credentials.
    async fn logout(&self) -> Result<(), AuthError>;
}

/// Join a base URL and an endpoint path.
#[must_use]
pub fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{path}", base_url.trim_end_matches('/'))
}

/// `Authorization` header value for a non-empty token.
#[must_use]
pub fn bearer(token: Option<&str>) -> Option<String> {
    token.map(str::trim).filter(|t| !t.is_empty()).map(|t| format!("Bearer {t}"))
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Pull a human-readable reason out of an error body (`{"detail": ...}` or
/// `{"message": ...}`), falling back to the status code.
fn failure(status: u16, body: &str) -> AuthError {
    let detail = serde_json::from_str::<serde_json::Value>(body).ok().and_then(|v| {
        ["detail", "message", "error"]
            .iter()
            .find_map(|key| v.get(*key).and_then(serde_json::Value::as_str).map(str::to_owned))
    });
    AuthError::status(status, detail.unwrap_or_else(|| format!("status {status}")))
}

fn parse<T: DeserializeOwned>(body: &str, what: &str) -> Result<T, AuthError> {
    serde_json::from_str(body).map_err(|e| AuthError::Protocol(format!("{what}: {e}")))
}

pub(crate) fn interpret_login_url(status: u16, body: &str) -> Result<String, AuthError> {
    if !is_success(status) {
        return Err(failure(status, body));
    }
    let resp: LoginUrlResponse = parse(body, "login url response")?;
    resp.login_url
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| AuthError::Protocol("response has no login_url".to_owned()))
}

pub(crate) fn interpret_callback(status: u16, body: &str) -> Result<CallbackResponse, AuthError> {
    if !is_success(status) {
        return Err(failure(status, body));
    }
    let value: serde_json::Value = parse(body, "callback response")?;
    let token = value.get("token").and_then(serde_json::Value::as_str).filter(|t| !t.is_empty());
    let user = value.get("user").filter(|u| u.is_object());
    let (Some(token), Some(user)) = (token, user) else {
        return Err(AuthError::Auth("response is missing token or user".to_owned()));
    };
    let user: User =
        serde_json::from_value(user.clone()).map_err(|e| AuthError::Auth(format!("malformed user: {e}")))?;
    Ok(CallbackResponse { token: token.to_owned(), user })
}

pub(crate) fn interpret_current_user(status: u16, body: &str) -> Result<User, AuthError> {
    if status == 401 {
        return Err(AuthError::Unauthorized);
    }
    if !is_success(status) {
        return Err(failure(status, body));
    }
    parse(body, "user response")
}

pub(crate) fn interpret_auth_type(status: u16, body: &str) -> AuthTypeResponse {
    if !is_success(status) {
        tracing::warn!(status, "auth type probe failed; assuming no auth");
        return AuthTypeResponse::default();
    }
    match parse(body, "auth type response") {
        Ok(resp) => resp,
        Err(e) => {
            tracing::warn!(error = %e, "auth type probe unreadable; assuming no auth");
            AuthTypeResponse::default()
        }
    }
}

pub(crate) fn interpret_logout(status: u16, body: &str) -> Result<(), AuthError> {
    if is_success(status) { Ok(()) } else { Err(failure(status, body)) }
}
