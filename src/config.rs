//! Auth configuration resolved once at startup.
//!
//! DESIGN
//! ======
//! Every environment-dependent value (cookie name, backend base URL, trusted
//! popup origins, pricing page) lives in one typed struct that is passed to
//! the session instead of being read ad hoc from the environment.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::collections::BTreeSet;

use crate::error::ConfigError;
use crate::util::security::normalize_origin;

pub const DEFAULT_SERVER_URL: &str = "/api";
pub const DEV_COOKIE_NAME: &str = "authjs.session-token";
pub const PROD_COOKIE_NAME: &str = "__Secure-authjs.session-token";

/// Build flavor; selects the session cookie name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    /// Name of the backend session cookie for this environment.
    #[must_use]
    pub fn cookie_name(self) -> &'static str {
        match self {
            Self::Development => DEV_COOKIE_NAME,
            Self::Production => PROD_COOKIE_NAME,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    pub environment: Environment,
    /// Base URL for `/auth/*` endpoints, without a trailing slash.
    pub server_base_url: String,
    /// Normalized origins (`scheme://host[:port]`) allowed to post auth messages.
    pub trusted_origins: BTreeSet<String>,
    /// Base URL of the external site hosting `/pricing`.
    pub pricing_base_url: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Development,
            server_base_url: DEFAULT_SERVER_URL.to_owned(),
            trusted_origins: BTreeSet::new(),
            pricing_base_url: String::new(),
        }
    }
}

impl AuthConfig {
    /// Build typed auth config from process environment variables.
    ///
    /// Optional:
    /// - `AUTH_ENV`: `development` (default) or `production`
    /// - `AUTH_SERVER_URL`: default `/api`
    /// - `AUTH_TRUSTED_ORIGINS`: comma-separated origins; defaults to the
    ///   origin of `AUTH_SERVER_URL` when that is absolute
    /// - `AUTH_PRICING_URL`: base of the external pricing page
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown `AUTH_ENV` or a malformed origin.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from values baked in at compile time (browser builds).
    ///
    /// # Errors
    ///
    /// Same as [`AuthConfig::from_env`].
    pub fn from_build_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| build_env(key).map(str::to_owned))
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`AuthConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = parse_environment(lookup("AUTH_ENV").as_deref())?;
        let server_base_url = lookup("AUTH_SERVER_URL")
            .map(|raw| raw.trim().to_owned())
            .filter(|raw| !raw.is_empty())
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_owned())
            .trim_end_matches('/')
            .to_owned();

        let mut trusted_origins = BTreeSet::new();
        if let Some(raw) = lookup("AUTH_TRUSTED_ORIGINS") {
            for item in raw.split(',').map(str::trim).filter(|item| !item.is_empty()) {
                let origin = normalize_origin(item).ok_or_else(|| ConfigError::InvalidOrigin(item.to_owned()))?;
                trusted_origins.insert(origin);
            }
        }
        if trusted_origins.is_empty() {
            if let Some(origin) = normalize_origin(&server_base_url) {
                trusted_origins.insert(origin);
            }
        }

        let pricing_base_url = lookup("AUTH_PRICING_URL")
            .unwrap_or_default()
            .trim()
            .trim_end_matches('/')
            .to_owned();

        Ok(Self { environment, server_base_url, trusted_origins, pricing_base_url })
    }

    /// Add one more trusted origin, typically the page's own origin.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOrigin`] if `origin` is not an absolute URL.
    pub fn with_trusted_origin(mut self, origin: &str) -> Result<Self, ConfigError> {
        let normalized = normalize_origin(origin).ok_or_else(|| ConfigError::InvalidOrigin(origin.to_owned()))?;
        self.trusted_origins.insert(normalized);
        Ok(self)
    }

    #[must_use]
    pub fn cookie_name(&self) -> &'static str {
        self.environment.cookie_name()
    }

    /// Absolute or root-relative URL of the pricing page.
    #[must_use]
    pub fn pricing_page_url(&self) -> String {
        format!("{}/pricing", self.pricing_base_url)
    }
}

fn parse_environment(raw: Option<&str>) -> Result<Environment, ConfigError> {
    let value = raw.map(|v| v.trim().to_ascii_lowercase()).unwrap_or_default();
    match value.as_str() {
        "" | "development" | "dev" => Ok(Environment::Development),
        "production" | "prod" => Ok(Environment::Production),
        _ => Err(ConfigError::UnknownEnvironment(value)),
    }
}

fn build_env(key: &str) -> Option<&'static str> {
    match key {
        "AUTH_ENV" => option_env!("AUTH_ENV"),
        "AUTH_SERVER_URL" => option_env!("AUTH_SERVER_URL"),
        "AUTH_TRUSTED_ORIGINS" => option_env!("AUTH_TRUSTED_ORIGINS"),
        "AUTH_PRICING_URL" => option_env!("AUTH_PRICING_URL"),
        _ => None,
    }
}
