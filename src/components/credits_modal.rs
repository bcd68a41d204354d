//! Dialog shown when the user has run out of credits.

#[cfg(test)]
#[path = "credits_modal_test.rs"]
mod credits_modal_test;

use leptos::prelude::*;

use crate::util::browser::open_in_new_context;
use crate::util::security::{BLANK_URL, sanitize_url};

pub const TITLE: &str = "Insufficient Credits";
pub const BODY: &str = "You've used all your credits. Please upgrade your plan to continue using our services.";

/// Resolve the pricing link, or `None` when it sanitizes to nothing usable.
pub(crate) fn upgrade_target(pricing_url: &str) -> Option<String> {
    let url = sanitize_url(pricing_url);
    (url != BLANK_URL).then_some(url)
}

/// Modal offering an upgrade; "Upgrade Now" hides it and opens pricing in a new tab.
#[component]
pub fn InsufficientCreditsModal(
    #[prop(into)] open: Signal<bool>,
    on_hide: Callback<()>,
    pricing_url: String,
) -> impl IntoView {
    let pricing_url = StoredValue::new(pricing_url);
    let on_cancel = move |_| on_hide.run(());
    let on_upgrade = move |_| {
        on_hide.run(());
        match pricing_url.with_value(|url| upgrade_target(url)) {
            Some(url) => open_in_new_context(&url),
            None => tracing::warn!("pricing url rejected"),
        }
    };

    view! {
        <Show when=move || open.get()>
            <div class="credits-modal__backdrop" on:click=move |_| on_hide.run(())>
                <div class="credits-modal" on:click=move |ev| ev.stop_propagation()>
                    <h2 class="credits-modal__title">{TITLE}</h2>
                    <p class="credits-modal__body">{BODY}</p>
                    <div class="credits-modal__actions">
                        <button class="btn" on:click=on_cancel>
                            "Cancel"
                        </button>
                        <button class="btn btn--primary" on:click=on_upgrade>
                            "Upgrade Now"
                        </button>
                    </div>
                </div>
            </div>
        </Show>
    }
}
