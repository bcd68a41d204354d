//! OAuth callback route for logins that did not go through a popup.

#[cfg(test)]
#[path = "callback_test.rs"]
mod callback_test;

use leptos::prelude::*;
use leptos_router::hooks::use_query_map;

use crate::state::app::use_app_context;

/// Extract `(code, state)` from the callback query; `None` without a code.
pub(crate) fn callback_params(code: Option<String>, state: Option<String>) -> Option<(String, Option<String>)> {
    let code = code.filter(|c| !c.trim().is_empty())?;
    Some((code, state.filter(|s| !s.is_empty())))
}

#[component]
pub fn CallbackPage() -> impl IntoView {
    let ctx = use_app_context();
    let query = use_query_map();
    let started = StoredValue::new(false);
    let missing_code = RwSignal::new(false);

    Effect::new(move || {
        if started.get_value() {
            return;
        }
        started.set_value(true);
        let params = query.with(|q| callback_params(q.get("code"), q.get("state")));
        match params {
            Some(params) => ctx.complete_callback.run(params),
            None => {
                tracing::warn!("auth callback reached without code");
                missing_code.set(true);
            }
        }
    });

    view! {
        <div class="login-page">
            <div class="login-card">
                <Show
                    when=move || missing_code.get()
                    fallback=|| view! { <p class="login-message">"Completing sign in..."</p> }
                >
                    <p class="login-message">"Missing authorization code."</p>
                    <a class="login-button" href="/login">"Back to login"</a>
                </Show>
            </div>
        </div>
    }
}
