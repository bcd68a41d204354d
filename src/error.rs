//! Error taxonomy for auth client and handshake failures.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

/// Errors produced by auth backend calls and cross-window message decoding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The request could not be sent, or the server answered with a
    /// non-success status other than 401.
    #[error("request failed: {message}")]
    Request { status: Option<u16>, message: String },

    /// The server rejected the session credentials (HTTP 401).
    #[error("unauthorized")]
    Unauthorized,

    /// The auth exchange completed but did not yield a token and user.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// A cross-window payload did not have the expected shape.
    #[error("invalid auth message: {0}")]
    Validation(String),

    /// A response was missing an expected field or was not valid JSON.
    #[error("unexpected response: {0}")]
    Protocol(String),
}

impl AuthError {
    /// Transport-level failure with no HTTP status.
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Request { status: None, message: err.to_string() }
    }

    /// HTTP failure with the response status.
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Request { status: Some(status), message: message.into() }
    }

    /// HTTP status attached to the error, if any.
    #[must_use]
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Request { status, .. } => *status,
            Self::Unauthorized => Some(401),
            _ => None,
        }
    }
}

/// Errors produced while resolving [`crate::config::AuthConfig`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// `AUTH_ENV` held something other than a known environment name.
    #[error("unknown AUTH_ENV: {0}")]
    UnknownEnvironment(String),

    /// A trusted origin could not be parsed as an absolute URL.
    #[error("invalid trusted origin '{0}'")]
    InvalidOrigin(String),
}
