//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Used by route guards and user-aware components to coordinate login
//! redirects and identity-dependent rendering. This is a plain value with no
//! framework or I/O dependencies; [`super::session::SessionContext`] drives it
//! and the UI mirrors it into a signal.
//!
//! Lifecycle: `Uninitialized -> Loading -> {Authenticated, Anonymous}`.
//! `loading` starts true and is cleared exactly once, when the initial load
//! resolves.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::error::AuthError;
use crate::net::types::{AuthType, AuthTypeResponse, User};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionPhase {
    #[default]
    Uninitialized,
    Loading,
    Authenticated,
    Anonymous,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AuthState {
    phase: SessionPhase,
    user: Option<User>,
    loading: bool,
    load_started: bool,
    auth_type: AuthType,
    exclude_paths: Vec<String>,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            phase: SessionPhase::Uninitialized,
            user: None,
            loading: true,
            load_started: false,
            auth_type: AuthType::none(),
            exclude_paths: Vec::new(),
        }
    }
}

impl AuthState {
    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn auth_type(&self) -> &AuthType {
        &self.auth_type
    }

    /// Paths the backend declared as not requiring auth.
    #[must_use]
    pub fn exclude_paths(&self) -> &[String] {
        &self.exclude_paths
    }

    /// Start the initial load. Returns `false` if it already started.
    ///
    /// A sign-in or sign-out that landed first keeps its phase; only an
    /// untouched state moves to `Loading`.
    pub fn begin_load(&mut self) -> bool {
        if self.load_started {
            return false;
        }
        self.load_started = true;
        if self.phase == SessionPhase::Uninitialized {
            self.phase = SessionPhase::Loading;
        }
        self.loading = true;
        true
    }

    /// Resolve the initial load. Only the first call after [`Self::begin_load`]
    /// has an effect; it always clears `loading`.
    pub fn finish_load(&mut self, auth: AuthTypeResponse, user: Result<User, AuthError>) -> bool {
        if !self.load_started || !self.loading {
            return false;
        }
        self.auth_type = auth.kind;
        self.exclude_paths = auth.exclude_paths;
        match user {
            Ok(user) => self.set_user(user),
            Err(_) => {
                self.user = None;
                self.phase = SessionPhase::Anonymous;
            }
        }
        self.loading = false;
        true
    }

    /// Enter `Authenticated` with `user`, sanitizing its avatar URL.
    pub fn sign_in(&mut self, user: User) {
        self.set_user(user);
    }

    /// Drop the user and enter `Anonymous`.
    pub fn sign_out(&mut self) {
        self.user = None;
        self.phase = SessionPhase::Anonymous;
    }

    fn set_user(&mut self, user: User) {
        self.user = Some(user.with_sanitized_avatar());
        self.phase = SessionPhase::Authenticated;
    }
}
