//! Authenticated landing page with the account summary.
//!
//! SYSTEM CONTEXT
//! ==============
//! Guarded by the shared unauth redirect. Offers logout, the dark-mode
//! toggle, and the upgrade dialog when the credit balance is exhausted.

#[cfg(test)]
#[path = "home_test.rs"]
mod home_test;

use leptos::prelude::*;
use leptos_router::hooks::{use_location, use_navigate};

use crate::components::credits_modal::InsufficientCreditsModal;
use crate::net::types::User;
use crate::state::app::use_app_context;
use crate::util::auth::install_unauth_redirect;

/// Credit balance text, or `None` when the backend reports no balances.
pub(crate) fn credits_label(user: &User) -> Option<String> {
    user.total_credits().map(|total| format!("{total} credits"))
}

pub(crate) fn is_out_of_credits(user: &User) -> bool {
    user.total_credits().is_some_and(|total| total <= 0.0)
}

#[component]
pub fn HomePage() -> impl IntoView {
    let ctx = use_app_context();
    let location = use_location();
    install_unauth_redirect(ctx.auth, move || location.pathname.get(), use_navigate());

    let show_credits = RwSignal::new(false);
    Effect::new(move || {
        if ctx.auth.with(|state| state.user().is_some_and(is_out_of_credits)) {
            show_credits.set(true);
        }
    });

    let user_name = move || ctx.user().map(|u| u.name).unwrap_or_default();
    let avatar = move || ctx.user().and_then(|u| u.avatar_url);
    let credits = move || ctx.user().as_ref().and_then(credits_label);
    let dark_label = move || if ctx.dark_mode.get().is_dark() { "Light mode" } else { "Dark mode" };

    view! {
        <div class="home-page">
            <header class="home-page__header">
                <Show when=move || avatar().is_some()>
                    <img class="home-page__avatar" src=move || avatar().unwrap_or_default() alt="" />
                </Show>
                <span class="home-page__name">{user_name}</span>
                <Show when=move || credits().is_some()>
                    <button class="home-page__credits" on:click=move |_| show_credits.set(true)>
                        {move || credits().unwrap_or_default()}
                    </button>
                </Show>
                <button class="btn" on:click=move |_| ctx.toggle_dark_mode()>
                    {dark_label}
                </button>
                <button class="btn" on:click=move |_| ctx.logout.run(())>
                    "Logout"
                </button>
            </header>
            <InsufficientCreditsModal
                open=show_credits
                on_hide=Callback::new(move |()| show_credits.set(false))
                pricing_url=ctx.pricing_url.get_value()
            />
        </div>
    }
}
