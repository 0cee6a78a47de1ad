//! Log Panel
//!
//! Collapsible footer showing the most recent log lines.

use console_logger::LogHandle;
use leptos::prelude::*;

#[component]
pub fn LogPanel() -> impl IntoView {
    let Some(log) = use_context::<LogHandle>() else {
        return ().into_any();
    };
    let (open, set_open) = signal(false);
    let lines = RwSignal::new(Vec::<String>::new());
    let log = StoredValue::new(log);

    let toggle = move |_| {
        if !open.get_untracked() {
            lines.set(log.with_value(LogHandle::recent_lines));
        }
        set_open.update(|v| *v = !*v);
    };

    view! {
        <footer class="log-panel">
            <button type="button" class="log-toggle" on:click=toggle>
                {move || if open.get() { "Hide log" } else { "Show log" }}
            </button>
            <Show when=move || open.get()>
                <pre class="log-lines">{move || lines.get().join("\n")}</pre>
            </Show>
        </footer>
    }
    .into_any()
}
