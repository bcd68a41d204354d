//! Stack of transient notices in the corner of the viewport.

use leptos::prelude::*;

use crate::state::app::use_app_context;

#[component]
pub fn NoticeStack() -> impl IntoView {
    let ctx = use_app_context();
    let notices = ctx.notices;

    view! {
        <div class="notice-stack" role="status" aria-live="polite">
            <For
                each=move || notices.with(|n| n.entries().to_vec())
                key=|entry| entry.id
                children=move |entry| {
                    let id = entry.id;
                    let class = format!("notice {}", entry.notice.level.class());
                    view! {
                        <div class=class>
                            <span class="notice__text">{entry.notice.text}</span>
                            <button
                                class="notice__close"
                                title="Dismiss"
                                on:click=move |_| notices.update(|n| n.dismiss(id))
                            >
                                "✕"
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}
