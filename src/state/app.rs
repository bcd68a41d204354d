//! App-level context combining the session with the dark-mode preference.
//!
//! Provided once by [`crate::app::AuthProvider`] and read by components via
//! `use_context::<AppContext>()`. Every field is a copyable handle.

use leptos::prelude::*;

use super::auth::AuthState;
use super::notices::Notices;
use crate::net::types::User;
use crate::util::dark_mode::DarkMode;

#[derive(Clone, Copy)]
pub struct AppContext {
    /// Mirror of the session state, updated after every transition.
    pub auth: RwSignal<AuthState>,
    pub notices: RwSignal<Notices>,
    pub dark_mode: RwSignal<DarkMode>,
    /// Session cookie name for the current environment.
    pub cookie_name: &'static str,
    /// Full pricing page URL for upgrade links.
    pub pricing_url: StoredValue<String>,
    /// Start login (popup or redirect).
    pub login: Callback<()>,
    pub logout: Callback<()>,
    /// Exchange an authorization code from the callback route.
    pub complete_callback: Callback<(String, Option<String>)>,
    /// Persist and apply a dark-mode preference.
    pub set_dark_mode: Callback<DarkMode>,
}

impl AppContext {
    pub fn user(&self) -> Option<User> {
        self.auth.with(|state| state.user().cloned())
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.with(AuthState::is_authenticated)
    }

    pub fn is_loading(&self) -> bool {
        self.auth.with(AuthState::is_loading)
    }

    pub fn toggle_dark_mode(&self) {
        self.set_dark_mode.run(self.dark_mode.get_untracked().toggled());
    }
}

/// Fetch the app context provided by the auth provider.
///
/// # Panics
///
/// Panics when called outside [`crate::app::AuthProvider`].
pub fn use_app_context() -> AppContext {
    expect_context::<AppContext>()
}
