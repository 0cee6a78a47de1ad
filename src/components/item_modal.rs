//! Item Modal
//!
//! Create/edit an item and the tier prices every linked provider offers.
//! Saving replaces all of the item's offers.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::{use_data_service, DataService, ItemInput};
use crate::components::{FormMode, Modal, OfferEditor, StatusSelect};
use crate::context::use_app_context;
use crate::error::{ApiError, ApiResult};
use crate::models::Item;
use crate::offers::{tier_slots, DraftLoad, OfferDraft};
use crate::store::{use_app_store, AppStateStoreFields};

#[component]
pub fn ItemModal(
    mode: FormMode<Item>,
    /// Process the item belongs to (the page's current process)
    process_id: Option<u32>,
    #[prop(into)] on_close: Callback<()>,
    #[prop(into)] on_saved: Callback<()>,
) -> impl IntoView {
    let ctx = use_app_context();
    let api = use_data_service();
    let store = use_app_store();
    let existing = mode.existing().cloned();

    let name = RwSignal::new(existing.as_ref().map(|i| i.item_name.clone()).unwrap_or_default());
    let description = RwSignal::new(existing.as_ref().and_then(|i| i.description.clone()).unwrap_or_default());
    let status = RwSignal::new(existing.as_ref().map(|i| i.status.clone()).unwrap_or_else(|| "active".to_string()));
    let draft = RwSignal::new(OfferDraft::default());
    let load = RwSignal::new(if existing.is_some() { DraftLoad::Loading } else { DraftLoad::Ready });
    let (saving, set_saving) = signal(false);

    let active_providers = Signal::derive(move || {
        store.providers().with(|all| all.iter().filter(|p| p.is_active()).cloned().collect::<Vec<_>>())
    });

    if let Some(item_id) = existing.as_ref().map(|i| i.id) {
        spawn_local(async move {
            match load_draft(api, item_id).await {
                Ok(loaded) => {
                    draft.set(loaded);
                    load.set(DraftLoad::Ready);
                }
                Err(e) => {
                    load.set(DraftLoad::Failed(e.to_string()));
                    ctx.toasts.error(&e);
                }
            }
        });
    }

    let title = mode.title("Item");
    let mode = StoredValue::new(mode);
    let process_id = existing.as_ref().and_then(|i| i.process_id).or(process_id);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if let Err(e) = load.with(DraftLoad::check) {
            ctx.toasts.error(&e);
            return;
        }
        let item_name = name.get().trim().to_string();
        if item_name.is_empty() {
            ctx.toasts.error(&ApiError::validation("Item name is required"));
            return;
        }
        let current = draft.get();
        if let Err(e) = current.validate() {
            ctx.toasts.error(&e);
            return;
        }
        let input = ItemInput {
            item_name,
            description: description.get(),
            status: status.get(),
            process_id,
            provider_ids: current.provider_ids(),
        };
        let mode = mode.get_value();
        set_saving.set(true);
        spawn_local(async move {
            let result = save_item(api, &mode, &input, &current).await;
            set_saving.set(false);
            match result {
                Ok(()) => {
                    ctx.toasts.success(mode.saved_message("Item"));
                    on_saved.run(());
                }
                Err(e) => ctx.toasts.error(&e),
            }
        });
    };

    view! {
        <Modal title=title on_close=on_close wide=true>
            <form class="modal-form" on:submit=on_submit>
                <label class="form-label">
                    "Item name"
                    <input
                        type="text"
                        class="form-input"
                        prop:value=move || name.get()
                        on:input=move |ev| name.set(event_target_value(&ev))
                    />
                </label>
                <label class="form-label">
                    "Description"
                    <textarea
                        class="form-input"
                        rows="2"
                        prop:value=move || description.get()
                        on:input=move |ev| description.set(event_target_value(&ev))
                    ></textarea>
                </label>
                <label class="form-label">"Status" <StatusSelect value=status /></label>
                <h3 class="section-title">"Provider pricing"</h3>
                {move || match load.get() {
                    DraftLoad::Loading => view! { <p class="muted">"Loading current offers..."</p> }.into_any(),
                    DraftLoad::Failed(reason) => view! {
                        <p class="validation-message">{format!("Offers could not be loaded: {}", reason)}</p>
                    }.into_any(),
                    DraftLoad::Ready => view! { <OfferEditor draft=draft providers=active_providers /> }.into_any(),
                }}
                <div class="modal-actions">
                    <button type="button" class="btn-secondary" on:click=move |_| on_close.run(())>"Cancel"</button>
                    <button type="submit" class="btn-primary" disabled=move || saving.get() || !load.with(DraftLoad::can_submit)>"Save"</button>
                </div>
            </form>
        </Modal>
    }
}

/// Linked providers, their tiers and current offers, fetched concurrently
async fn load_draft(api: DataService, item_id: u32) -> ApiResult<OfferDraft> {
    let providers = api.providers_for_item(item_id).await?;
    let loaded = futures::future::join_all(providers.iter().map(move |p| {
        let provider_id = p.id;
        async move {
            futures::join!(
                api.tier_thresholds(provider_id),
                api.offers_filtered(Some(item_id), Some(provider_id)),
            )
        }
    }))
    .await;

    let mut entries = Vec::with_capacity(providers.len());
    let mut offers = Vec::new();
    for (provider, (tiers, found)) in providers.into_iter().zip(loaded) {
        let tiers = tiers.unwrap_or_else(|e| {
            tracing::warn!("Tier thresholds unavailable for provider {}: {}", provider.id, e);
            Default::default()
        });
        offers.extend(found?);
        entries.push((provider, tier_slots(&tiers)));
    }
    Ok(OfferDraft::from_existing(&entries, &offers))
}

async fn save_item(api: DataService, mode: &FormMode<Item>, input: &ItemInput, draft: &OfferDraft) -> ApiResult<()> {
    let item_id = match mode {
        FormMode::Create => api.create::<Item, _>(input).await?.id,
        FormMode::Edit(item) => {
            api.update::<Item, _>(item.id, input).await?;
            item.id
        }
    };
    api.replace_item_offers(item_id, &draft.to_inputs(item_id, input.process_id)).await
}
