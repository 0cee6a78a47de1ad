use leptos::prelude::*;

/// Status options offered by every form
pub const STATUSES: &[(&str, &str)] = &[("active", "Active"), ("inactive", "Inactive")];

#[component]
pub fn StatusBadge(#[prop(into)] status: String) -> impl IntoView {
    let class = if status == "active" { "badge badge-active" } else { "badge badge-inactive" };
    view! { <span class=class>{status}</span> }
}

/// `<select>` bound to a status signal
#[component]
pub fn StatusSelect(value: RwSignal<String>) -> impl IntoView {
    view! {
        <select
            class="form-select"
            prop:value=move || value.get()
            on:change=move |ev| value.set(event_target_value(&ev))
        >
            {STATUSES.iter().map(|(v, label)| view! { <option value=*v>{*label}</option> }).collect_view()}
        </select>
    }
}
