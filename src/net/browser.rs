//! Browser auth transport built on `gloo-net` fetch.
//!
//! Client-side (hydrate): real HTTP calls with `credentials: include` so the
//! backend session cookie travels with each request.
//! Server-side (SSR): stubs returning errors (or the `"none"` auth type)
//! since these endpoints are only meaningful in the browser.

#![allow(clippy::unused_async)]

use async_trait::async_trait;

#[cfg(feature = "hydrate")]
use super::api::{
    CALLBACK_PATH, LOGIN_URL_PATH, LOGOUT_PATH, ME_PATH, TYPE_PATH, bearer, endpoint, interpret_auth_type,
    interpret_callback, interpret_current_user, interpret_login_url, interpret_logout,
};
use super::api::AuthApi;
#[cfg(feature = "hydrate")]
use super::types::CallbackRequest;
use super::types::{AuthTypeResponse, CallbackResponse, User};
use crate::config::AuthConfig;
use crate::error::AuthError;

#[derive(Clone, Debug)]
pub struct BrowserAuthApi {
    base_url: String,
}

impl BrowserAuthApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into() }
    }

    #[must_use]
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.server_base_url.clone())
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(not(feature = "hydrate"))]
fn unavailable() -> AuthError {
    AuthError::transport("not available on server")
}

#[cfg(feature = "hydrate")]
mod fetch {
    use gloo_net::http::{Request, RequestBuilder};
    use web_sys::RequestCredentials;

    use crate::error::AuthError;

    pub(super) fn get(url: &str) -> RequestBuilder {
        with_defaults(Request::get(url))
    }

    pub(super) fn post(url: &str) -> RequestBuilder {
        with_defaults(Request::post(url))
    }

    fn with_defaults(builder: RequestBuilder) -> RequestBuilder {
        builder
            .credentials(RequestCredentials::Include)
            .header("Content-Type", "application/json")
    }

    pub(super) async fn send(builder: RequestBuilder) -> Result<(u16, String), AuthError> {
        let resp = builder.send().await.map_err(AuthError::transport)?;
        read(resp).await
    }

    pub(super) async fn send_body(builder: RequestBuilder, body: String) -> Result<(u16, String), AuthError> {
        let request = builder.body(body).map_err(AuthError::transport)?;
        let resp = request.send().await.map_err(AuthError::transport)?;
        read(resp).await
    }

    async fn read(resp: gloo_net::http::Response) -> Result<(u16, String), AuthError> {
        let status = resp.status();
        let body = resp.text().await.map_err(AuthError::transport)?;
        Ok((status, body))
    }
}

#[async_trait(?Send)]
impl AuthApi for BrowserAuthApi {
    async fn get_login_url(&self) -> Result<String, AuthError> {
        #[cfg(feature = "hydrate")]
        {
            let (status, body) = fetch::send(fetch::get(&endpoint(&self.base_url, LOGIN_URL_PATH))).await?;
            interpret_login_url(status, &body)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Err(unavailable())
        }
    }

    async fn handle_callback(&self, code: &str, state: Option<&str>) -> Result<CallbackResponse, AuthError> {
        #[cfg(feature = "hydrate")]
        {
            let payload = serde_json::to_string(&CallbackRequest { code, state })
                .map_err(|e| AuthError::Protocol(format!("callback request: {e}")))?;
            let builder = fetch::post(&endpoint(&self.base_url, CALLBACK_PATH));
            let (status, body) = fetch::send_body(builder, payload).await?;
            interpret_callback(status, &body)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (code, state);
            Err(unavailable())
        }
    }

    async fn get_current_user(&self, token: Option<&str>) -> Result<User, AuthError> {
        #[cfg(feature = "hydrate")]
        {
            let mut builder = fetch::get(&endpoint(&self.base_url, ME_PATH));
            if let Some(value) = bearer(token) {
                builder = builder.header("Authorization", &value);
            }
            let (status, body) = fetch::send(builder).await?;
            interpret_current_user(status, &body)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = token;
            Err(unavailable())
        }
    }

    async fn check_auth_type(&self) -> AuthTypeResponse {
        #[cfg(feature = "hydrate")]
        {
            match fetch::send(fetch::get(&endpoint(&self.base_url, TYPE_PATH))).await {
                Ok((status, body)) => interpret_auth_type(status, &body),
                Err(e) => {
                    tracing::warn!(error = %e, "auth type probe unreachable; assuming no auth");
                    AuthTypeResponse::default()
                }
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            AuthTypeResponse::default()
        }
    }

    async fn logout(&self) -> Result<(), AuthError> {
        #[cfg(feature = "hydrate")]
        {
            let (status, body) = fetch::send(fetch::post(&endpoint(&self.base_url, LOGOUT_PATH))).await?;
            interpret_logout(status, &body)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Err(unavailable())
        }
    }
}
