//! Toast Host
//!
//! Renders the notification queue in a fixed corner container.

use leptos::prelude::*;

use crate::context::use_app_context;

#[component]
pub fn ToastHost() -> impl IntoView {
    let toasts = use_app_context().toasts;

    view! {
        <div class="toast-container">
            <For
                each=move || toasts.items.get()
                key=|t| t.id
                children=move |t| {
                    let id = t.id;
                    view! {
                        <div class=t.kind.css_class() role="status">
                            <p class="toast-message">{t.message.clone()}</p>
                            <button
                                class="toast-close"
                                aria-label="Close"
                                on:click=move |_| toasts.dismiss(id)
                            >
                                "×"
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}
