//! Provider Modal
//!
//! Create/edit a provider together with its tier thresholds.

use std::collections::BTreeMap;

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::{use_data_service, DataService, ProviderInput};
use crate::components::{FormMode, Modal, StatusSelect, TierEditor};
use crate::context::use_app_context;
use crate::error::{ApiError, ApiResult};
use crate::models::Provider;
use crate::tiers::TierRows;

#[component]
pub fn ProviderModal(
    mode: FormMode<Provider>,
    #[prop(into)] on_close: Callback<()>,
    #[prop(into)] on_saved: Callback<()>,
) -> impl IntoView {
    let ctx = use_app_context();
    let api = use_data_service();
    let existing = mode.existing().cloned();

    let name = RwSignal::new(existing.as_ref().map(|p| p.company_name.clone()).unwrap_or_default());
    let details = RwSignal::new(existing.as_ref().and_then(|p| p.details.clone()).unwrap_or_default());
    let status = RwSignal::new(existing.as_ref().map(|p| p.status.clone()).unwrap_or_else(|| "active".to_string()));
    let tiers = RwSignal::new(TierRows::default());
    let tiers_ready = RwSignal::new(existing.is_none());
    let (saving, set_saving) = signal(false);

    if let Some(provider_id) = existing.as_ref().map(|p| p.id) {
        spawn_local(async move {
            match api.tier_thresholds(provider_id).await {
                Ok(data) => tiers.set(TierRows::from_thresholds(&data.thresholds)),
                Err(e) => tracing::warn!("Could not load tiers for provider {}: {}", provider_id, e),
            }
            tiers_ready.set(true);
        });
    }

    let title = mode.title("Provider");
    let mode = StoredValue::new(mode);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let input = ProviderInput {
            company_name: name.get().trim().to_string(),
            details: details.get(),
            status: status.get(),
        };
        if input.company_name.is_empty() {
            ctx.toasts.error(&ApiError::validation("Company name is required"));
            return;
        }
        let thresholds = tiers.get().thresholds();
        let mode = mode.get_value();
        set_saving.set(true);
        spawn_local(async move {
            let result = save_provider(api, &mode, &input, &thresholds).await;
            set_saving.set(false);
            match result {
                Ok(()) => {
                    ctx.toasts.success(mode.saved_message("Provider"));
                    on_saved.run(());
                }
                Err(e) => ctx.toasts.error(&e),
            }
        });
    };

    view! {
        <Modal title=title on_close=on_close>
            <form class="modal-form" on:submit=on_submit>
                <label class="form-label">
                    "Company name"
                    <input
                        type="text"
                        class="form-input"
                        prop:value=move || name.get()
                        on:input=move |ev| name.set(event_target_value(&ev))
                    />
                </label>
                <label class="form-label">
                    "Details"
                    <textarea
                        class="form-input"
                        rows="3"
                        prop:value=move || details.get()
                        on:input=move |ev| details.set(event_target_value(&ev))
                    ></textarea>
                </label>
                <label class="form-label">"Status" <StatusSelect value=status /></label>
                <Show when=move || tiers_ready.get() fallback=|| view! { <p class="hint">"Loading tiers…"</p> }>
                    <TierEditor rows=tiers />
                </Show>
                <div class="modal-actions">
                    <button type="button" class="btn-secondary" on:click=move |_| on_close.run(())>"Cancel"</button>
                    <button type="submit" class="btn-primary" disabled=move || saving.get()>"Save"</button>
                </div>
            </form>
        </Modal>
    }
}

async fn save_provider(
    api: DataService,
    mode: &FormMode<Provider>,
    input: &ProviderInput,
    thresholds: &BTreeMap<String, u64>,
) -> ApiResult<()> {
    let id = match mode {
        FormMode::Create => api.create::<Provider, _>(input).await?.id,
        FormMode::Edit(provider) => {
            api.update::<Provider, _>(provider.id, input).await?;
            provider.id
        }
    };
    api.save_tier_thresholds(id, thresholds).await
}
