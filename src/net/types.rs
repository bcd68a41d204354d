//! Wire DTOs for the `/auth/*` endpoints.
//!
//! DESIGN
//! ======
//! Field names follow the backend JSON exactly, including the camelCase
//! credit balances, so responses deserialize without adapters.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

use crate::util::security::sanitize_url;

/// An authenticated user as returned by `/auth/me` and the login popup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Backend user identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Avatar URL. Sanitized before it is stored in session state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// Identity provider tag (e.g. `"github"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
    /// Credits included with the current subscription.
    #[serde(rename = "subscriptionCredits", default, skip_serializing_if = "Option::is_none")]
    pub subscription_credits: Option<f64>,
    /// Credits purchased on top of the subscription.
    #[serde(rename = "subscriptionPurchasedCredits", default, skip_serializing_if = "Option::is_none")]
    pub subscription_purchased_credits: Option<f64>,
    #[serde(rename = "extraCredits", default, skip_serializing_if = "Option::is_none")]
    pub extra_credits: Option<f64>,
}

impl User {
    /// Minimal user with only the required fields.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: None,
            avatar_url: None,
            provider: None,
            roles: None,
            subscription_credits: None,
            subscription_purchased_credits: None,
            extra_credits: None,
        }
    }

    /// Replace the avatar URL with its sanitized form.
    #[must_use]
    pub fn with_sanitized_avatar(mut self) -> Self {
        self.avatar_url = self.avatar_url.as_deref().map(sanitize_url);
        self
    }

    /// Sum of all known credit balances; `None` when the backend sent none.
    #[must_use]
    pub fn total_credits(&self) -> Option<f64> {
        let balances = [self.subscription_credits, self.subscription_purchased_credits, self.extra_credits];
        if balances.iter().all(Option::is_none) {
            return None;
        }
        Some(balances.iter().flatten().sum())
    }
}

/// Server-declared login mode. `"none"` means no login is required.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthType(String);

impl AuthType {
    pub const NONE: &'static str = "none";

    pub fn new(kind: impl Into<String>) -> Self {
        Self(kind.into())
    }

    #[must_use]
    pub fn none() -> Self {
        Self(Self::NONE.to_owned())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn requires_login(&self) -> bool {
        self.0 != Self::NONE
    }
}

impl Default for AuthType {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Display for AuthType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// `GET /auth/type` response.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthTypeResponse {
    #[serde(rename = "type")]
    pub kind: AuthType,
    /// Paths the backend serves without authentication.
    #[serde(default)]
    pub exclude_paths: Vec<String>,
}

/// `GET /auth/login-url` response. The field is optional so a missing URL
/// surfaces as a protocol error rather than a JSON error.
#[derive(Debug, Deserialize)]
pub(crate) struct LoginUrlResponse {
    pub login_url: Option<String>,
}

/// `POST /auth/callback-handler` request body.
#[derive(Debug, Serialize)]
pub(crate) struct CallbackRequest<'a> {
    pub code: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<&'a str>,
}

/// Successful `POST /auth/callback-handler` response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CallbackResponse {
    pub token: String,
    pub user: User,
}
