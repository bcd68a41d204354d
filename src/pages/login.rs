//! Login page: starts the popup handshake, or skips ahead when no login is needed.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::state::app::use_app_context;
use crate::state::auth::AuthState;
use crate::util::security::HOME_ROUTE;

/// Where the login page should send the user instead of rendering, if anywhere.
pub(crate) fn login_redirect(state: &AuthState) -> Option<&'static str> {
    if state.is_loading() {
        return None;
    }
    (state.is_authenticated() || !state.auth_type().requires_login()).then_some(HOME_ROUTE)
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let ctx = use_app_context();
    let auth = ctx.auth;
    let navigate = use_navigate();

    Effect::new(move || {
        if let Some(target) = auth.with(login_redirect) {
            navigate(target, NavigateOptions::default());
        }
    });

    let on_sign_in = move |ev: leptos::ev::MouseEvent| {
        ev.prevent_default();
        ctx.login.run(());
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Studio"</h1>
                <Show
                    when=move || !ctx.is_loading()
                    fallback=|| view! { <p class="login-message">"Checking session..."</p> }
                >
                    <p class="login-card__subtitle">"Sign in to continue"</p>
                    <button class="login-button" on:click=on_sign_in>
                        "Sign in"
                    </button>
                </Show>
            </div>
        </div>
    }
}
