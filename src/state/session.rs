//! Session driver: owns the auth client and applies its results to [`AuthState`].
//!
//! DESIGN
//! ======
//! The auth client, the local store, and the UI side effects (notices,
//! navigation, state mirroring) are injected, so the whole lifecycle runs
//! under a plain async executor in tests. State lives in a `RefCell` that is
//! only borrowed inside synchronous sections, never across an await, so a
//! popup message arriving mid-load cannot hit an outstanding borrow.
//!
//! ERROR HANDLING
//! ==============
//! - initial load: logged, session becomes anonymous, nothing shown
//! - login/logout/callback: logged and surfaced as a notice
//! - popup messages: logged only; they may come from untrusted senders

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::cell::RefCell;

use serde_json::Value;

use super::auth::AuthState;
use super::notices::Notice;
use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::net::api::AuthApi;
use crate::net::message::AuthMessage;
use crate::net::types::{AuthType, User};
use crate::util::security::{HOME_ROUTE, is_trusted_origin, sanitize_redirect_url};
use crate::util::storage::{KeyValueStore, TOKEN_KEY, USER_INFO_KEY, save_json};

pub const LOGIN_ROUTE: &str = "/login";

/// UI-side effects requested by the session.
pub trait SessionEffects {
    /// Show a transient notification.
    fn notify(&self, notice: Notice);

    /// Navigate the main window to an in-app path.
    fn navigate(&self, path: &str);

    /// Called after every state transition with the new state.
    fn session_changed(&self, state: &AuthState) {
        let _ = state;
    }
}

/// What [`SessionContext::handle_message`] did with a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageOutcome {
    /// Origin not on the allow-list; dropped.
    UntrustedOrigin,
    /// Trusted origin but malformed `auth-success` payload; dropped.
    Invalid,
    /// User signed in.
    SignedIn,
    /// Popup reported a login error; shown to the user.
    ReportedError,
    /// Not an auth message.
    Ignored,
}

pub struct SessionContext<A, S, E> {
    config: AuthConfig,
    api: A,
    store: S,
    effects: E,
    state: RefCell<AuthState>,
}

impl<A, S, E> SessionContext<A, S, E>
where
    A: AuthApi,
    S: KeyValueStore,
    E: SessionEffects,
{
    pub fn new(config: AuthConfig, api: A, store: S, effects: E) -> Self {
        Self { config, api, store, effects, state: RefCell::new(AuthState::default()) }
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.state.borrow().user().cloned()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    #[must_use]
    pub fn auth_type(&self) -> AuthType {
        self.state.borrow().auth_type().clone()
    }

    #[must_use]
    pub fn cookie_name(&self) -> &'static str {
        self.config.cookie_name()
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn effects(&self) -> &E {
        &self.effects
    }

    /// Run the initial load: probe the auth type and fetch the current user
    /// concurrently, then settle into `Authenticated` or `Anonymous`.
    ///
    /// Only the first call does anything.
    pub async fn initialize(&self) {
        if !self.transition(AuthState::begin_load) {
            tracing::debug!("session already initialized");
            return;
        }

        let token = self.store.get(TOKEN_KEY);
        let (auth, user) = futures::join!(self.api.check_auth_type(), self.api.get_current_user(token.as_deref()));
        tracing::info!(auth_type = %auth.kind, "auth type resolved");

        if let Err(e) = &user {
            tracing::warn!(error = %e, "failed to load user");
            self.store.remove(TOKEN_KEY);
        }
        self.transition(|state| state.finish_load(auth, user));
        self.mirror_user();
    }

    /// Request a login URL for the caller to open.
    ///
    /// Returns an empty string when the backend needs no login, or when
    /// the request failed (an error notice has then been shown).
    pub async fn login(&self) -> String {
        if !self.auth_type().requires_login() {
            return String::new();
        }
        match self.api.get_login_url().await {
            Ok(url) => url,
            Err(e) => {
                tracing::error!(error = %e, "login error");
                self.effects.notify(Notice::error("Failed to initiate login"));
                String::new()
            }
        }
    }

    /// Clear the local session, tell the backend, and go to the login route.
    ///
    /// Backend failures are logged; the local sign-out and navigation always happen.
    pub async fn logout(&self) {
        self.update(AuthState::sign_out);
        self.store.remove(TOKEN_KEY);
        self.mirror_user();
        self.effects.notify(Notice::info("Successfully logged out"));

        if let Err(e) = self.api.logout().await {
            tracing::warn!(error = %e, "backend logout failed");
        }
        self.effects.navigate(LOGIN_ROUTE);
    }

    /// Exchange an authorization code (callback page without an opener).
    ///
    /// # Errors
    ///
    /// Returns the exchange error after surfacing it as a notice; session
    /// state is unchanged in that case.
    pub async fn complete_callback(&self, code: &str, state: Option<&str>) -> Result<(), AuthError> {
        match self.api.handle_callback(code, state).await {
            Ok(resp) => {
                self.accept_login(&resp.token, resp.user);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "auth callback exchange failed");
                self.effects.notify(Notice::error(format!("Authentication failed: {e}")));
                Err(e)
            }
        }
    }

    /// Apply a `postMessage` event from the login popup.
    pub fn handle_message(&self, origin: &str, data: &Value) -> MessageOutcome {
        if !is_trusted_origin(origin, &self.config.trusted_origins) {
            tracing::warn!(%origin, "rejected message from untrusted origin");
            return MessageOutcome::UntrustedOrigin;
        }

        match AuthMessage::decode(data) {
            Ok(AuthMessage::Success { token, user }) => {
                self.accept_login(&token, user);
                MessageOutcome::SignedIn
            }
            Ok(AuthMessage::Failure { message }) => {
                self.effects.notify(Notice::error(format!("Authentication failed: {message}")));
                MessageOutcome::ReportedError
            }
            Ok(AuthMessage::Unknown) => MessageOutcome::Ignored,
            Err(e) => {
                tracing::warn!(error = %e, %origin, "dropped auth message");
                MessageOutcome::Invalid
            }
        }
    }

    fn accept_login(&self, token: &str, user: User) {
        self.store.set(TOKEN_KEY, token);
        self.update(|state| state.sign_in(user));
        self.mirror_user();
        self.effects.notify(Notice::success("Successfully logged in"));
        self.effects.navigate(&sanitize_redirect_url(HOME_ROUTE));
    }

    fn mirror_user(&self) {
        match self.state.borrow().user() {
            Some(user) => save_json(&self.store, USER_INFO_KEY, user),
            None => self.store.remove(USER_INFO_KEY),
        }
    }

    fn update(&self, apply: impl FnOnce(&mut AuthState)) {
        self.transition(|state| {
            apply(state);
            true
        });
    }

    /// Apply a guarded transition; observers hear about it only when it applied.
    fn transition(&self, apply: impl FnOnce(&mut AuthState) -> bool) -> bool {
        let snapshot = {
            let mut state = self.state.borrow_mut();
            apply(&mut state).then(|| state.clone())
        };
        match snapshot {
            Some(snapshot) => {
                self.effects.session_changed(&snapshot);
                true
            }
            None => false,
        }
    }
}
