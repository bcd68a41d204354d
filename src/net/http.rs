//! Native auth transport built on `reqwest`.
//!
//! Used by SSR, tooling, and integration tests. A cookie store stands in for
//! the browser's `credentials: include`, so a session cookie set by the
//! backend is replayed on `/auth/me` and `/auth/logout`.

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};

use super::api::{
    AuthApi, CALLBACK_PATH, LOGIN_URL_PATH, LOGOUT_PATH, ME_PATH, TYPE_PATH, bearer, endpoint, interpret_auth_type,
    interpret_callback, interpret_current_user, interpret_login_url, interpret_logout,
};
use super::types::{AuthTypeResponse, CallbackRequest, CallbackResponse, User};
use crate::config::AuthConfig;
use crate::error::AuthError;

#[derive(Clone, Debug)]
pub struct HttpAuthApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAuthApi {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(base_url: impl Into<String>) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .map_err(AuthError::transport)?;
        Ok(Self { client, base_url: base_url.into() })
    }

    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn from_config(config: &AuthConfig) -> Result<Self, AuthError> {
        Self::new(config.server_base_url.clone())
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<(u16, String), AuthError> {
        let resp = request
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(AuthError::transport)?;
        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(AuthError::transport)?;
        Ok((status, body))
    }

    fn url(&self, path: &str) -> String {
        endpoint(&self.base_url, path)
    }
}

#[async_trait(?Send)]
impl AuthApi for HttpAuthApi {
    async fn get_login_url(&self) -> Result<String, AuthError> {
        let (status, body) = self.send(self.client.get(self.url(LOGIN_URL_PATH))).await?;
        interpret_login_url(status, &body)
    }

    async fn handle_callback(&self, code: &str, state: Option<&str>) -> Result<CallbackResponse, AuthError> {
        let payload = serde_json::to_string(&CallbackRequest { code, state })
            .map_err(|e| AuthError::Protocol(format!("callback request: {e}")))?;
        let (status, body) = self.send(self.client.post(self.url(CALLBACK_PATH)).body(payload)).await?;
        interpret_callback(status, &body)
    }

    async fn get_current_user(&self, token: Option<&str>) -> Result<User, AuthError> {
        let mut request = self.client.get(self.url(ME_PATH));
        if let Some(value) = bearer(token) {
            request = request.header(AUTHORIZATION, value);
        }
        let (status, body) = self.send(request).await?;
        interpret_current_user(status, &body)
    }

    async fn check_auth_type(&self) -> AuthTypeResponse {
        match self.send(self.client.get(self.url(TYPE_PATH))).await {
            Ok((status, body)) => interpret_auth_type(status, &body),
            Err(e) => {
                tracing::warn!(error = %e, "auth type probe unreachable; assuming no auth");
                AuthTypeResponse::default()
            }
        }
    }

    async fn logout(&self) -> Result<(), AuthError> {
        let (status, body) = self.send(self.client.post(self.url(LOGOUT_PATH))).await?;
        interpret_logout(status, &body)
    }
}
