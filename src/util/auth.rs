//! Shared auth route-guard helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Route components should apply identical unauthenticated redirect behavior.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;

use crate::state::auth::AuthState;
use crate::state::session::LOGIN_ROUTE;

/// Whether `path` should bounce to the login route for `state`.
///
/// Never while loading, never when the backend needs no login, and never for
/// the login route itself or paths the backend excludes from auth.
pub fn should_redirect_unauth(state: &AuthState, path: &str) -> bool {
    if state.is_loading() || state.is_authenticated() || !state.auth_type().requires_login() {
        return false;
    }
    if path == LOGIN_ROUTE {
        return false;
    }
    !state.exclude_paths().iter().any(|excluded| is_under(path, excluded))
}

/// Whether `path` is `prefix` itself or lies below it, on segment boundaries.
fn is_under(path: &str, prefix: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    path == prefix || path.strip_prefix(prefix).is_some_and(|rest| rest.starts_with('/'))
}

/// Redirect to `/login` whenever auth has loaded and no user is present.
pub fn install_unauth_redirect<P, F>(auth: RwSignal<AuthState>, path: P, navigate: F)
where
    P: Fn() -> String + 'static,
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        let current = path();
        if auth.with(|state| should_redirect_unauth(state, &current)) {
            navigate(LOGIN_ROUTE, NavigateOptions::default());
        }
    });
}
